use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;

/// Saves a packed deck somewhere the user can pick it up.
#[async_trait]
pub trait DeckWriter: Send + Sync {
    /// Persist `bytes` under `file_name` and return where they landed.
    async fn write(&self, file_name: &str, bytes: Vec<u8>) -> Result<PathBuf>;
}

/// Writes decks into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectoryWriter {
    dir: PathBuf,
}

impl DirectoryWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

#[async_trait]
impl DeckWriter for DirectoryWriter {
    async fn write(&self, file_name: &str, bytes: Vec<u8>) -> Result<PathBuf> {
        if !self.dir.as_os_str().is_empty() {
            tokio::fs::create_dir_all(&self.dir).await?;
        }

        let path = self.dir.join(file_name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}
