use crate::llm::Provider;
use crate::models::UploadedFile;

use super::preferences::SavedPreferences;
use super::status::{ResultPanel, StatusLine};

pub const SUBMIT_LABEL: &str = "Generate Presentation";
pub const SUBMIT_LABEL_BUSY: &str = "Generating...";
pub const INVALID_FILE_ALERT: &str = "Invalid file type. Please upload a .pptx or .potx file.";

/// Request-scoped state of the running front-end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// True only while one generation is in flight.
    pub is_processing: bool,
    pub uploaded_file: Option<UploadedFile>,
}

/// Field values of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub text: String,
    pub provider: Provider,
    pub credential: String,
    pub credential_visible: bool,
}

impl FormState {
    pub fn from_preferences(saved: &SavedPreferences) -> Self {
        Self {
            text: String::new(),
            provider: saved.provider,
            credential: saved.credential.clone(),
            credential_visible: false,
        }
    }

    /// Required fields are present.
    pub fn is_complete(&self) -> bool {
        !self.text.is_empty() && !self.credential.is_empty()
    }

    pub fn credential_display(&self) -> String {
        if self.credential_visible {
            self.credential.clone()
        } else {
            "•".repeat(self.credential.chars().count())
        }
    }
}

/// Submission is allowed only for a complete form with an accepted file and
/// nothing in flight.
pub fn can_submit(form: &FormState, session: &SessionState) -> bool {
    form.is_complete() && session.uploaded_file.is_some() && !session.is_processing
}

/// Snapshot of everything the front-end renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowView {
    pub text: String,
    pub provider: Provider,
    pub credential: String,
    pub file_name: Option<String>,
    pub drop_zone_visible: bool,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub result_area_visible: bool,
    pub status: Vec<StatusLine>,
    pub result: Option<ResultPanel>,
}
