use std::path::{Path, PathBuf};

/// Template suffixes the collector accepts. Matching is case-sensitive.
pub const ACCEPTED_SUFFIXES: [&str; 2] = [".pptx", ".potx"];

/// A file attached to the form.
///
/// Only its name matters: the file gates submission and is never opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub path: Option<PathBuf>,
}

impl UploadedFile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            name,
            path: Some(path.to_path_buf()),
        }
    }

    pub fn has_accepted_suffix(&self) -> bool {
        ACCEPTED_SUFFIXES
            .iter()
            .any(|suffix| self.name.ends_with(suffix))
    }
}

/// How a file reached the form. Both routes share one validation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSource {
    Picker,
    Drop,
}
