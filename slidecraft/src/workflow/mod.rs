mod controller;
mod preferences;
mod session;
mod status;

pub use controller::{FileSelection, GenerationReport, SubmitOutcome, Workflow};
pub use preferences::{
    JsonFilePreferences, MemoryPreferences, PreferenceStore, SavedPreferences, API_KEY_PREF,
    PROVIDER_PREF,
};
pub use session::{
    can_submit, FormState, SessionState, WorkflowView, INVALID_FILE_ALERT, SUBMIT_LABEL,
    SUBMIT_LABEL_BUSY,
};
pub use status::{
    building_stage, ResultPanel, StatusKind, StatusLine, StatusReporter, GENERATION_FAILED,
    GENERATION_SUCCEEDED, STAGE_PARSING, STAGE_STRUCTURING,
};
