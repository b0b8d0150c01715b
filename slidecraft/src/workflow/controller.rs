use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{error, info, warn};

use crate::deck::DeckBuilder;
use crate::error::Result;
use crate::llm::{Provider, StructuringClient};
use crate::models::{FileSource, UploadedFile};

use super::preferences::{PreferenceStore, SavedPreferences};
use super::session::{
    can_submit, FormState, SessionState, WorkflowView, INVALID_FILE_ALERT, SUBMIT_LABEL,
    SUBMIT_LABEL_BUSY,
};
use super::status::{building_stage, StatusReporter, STAGE_PARSING, STAGE_STRUCTURING};

/// What a generation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub slide_count: usize,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submission is already in flight.
    Ignored,
    /// The form is not ready for submission.
    Invalid,
    Succeeded(GenerationReport),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelection {
    Accepted,
    /// Nothing changed; `alert` is for the user.
    Rejected { alert: String },
    /// A submission is in flight.
    Ignored,
}

#[derive(Debug, Default)]
struct WorkflowState {
    form: FormState,
    session: SessionState,
    status: StatusReporter,
}

/// Owns the form, the session and the status panel, and funnels every
/// mutation through a small set of named transitions.
///
/// Clones share state. The lock is never held across an await.
#[derive(Clone)]
pub struct Workflow {
    state: Arc<Mutex<WorkflowState>>,
    client: StructuringClient,
    deck: DeckBuilder,
    preferences: Arc<dyn PreferenceStore>,
}

/// Clears `is_processing` however the submission ends.
struct ProcessingGuard {
    state: Arc<Mutex<WorkflowState>>,
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.session.is_processing = false;
    }
}

impl Workflow {
    /// Create the controller and load saved preferences into the form.
    pub fn new(
        client: StructuringClient,
        deck: DeckBuilder,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        let saved = SavedPreferences::load(preferences.as_ref());
        let state = WorkflowState {
            form: FormState::from_preferences(&saved),
            ..WorkflowState::default()
        };

        Self {
            state: Arc::new(Mutex::new(state)),
            client,
            deck,
            preferences,
        }
    }

    fn lock(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.lock().form.text = text.into();
    }

    /// Update the credential and write it through to preferences.
    pub fn set_credential(&self, credential: impl Into<String>) -> Result<()> {
        let saved = {
            let mut state = self.lock();
            state.form.credential = credential.into();
            Self::saved_from(&state.form)
        };
        saved.save(self.preferences.as_ref())
    }

    /// Update the provider and write it through to preferences.
    pub fn set_provider(&self, provider: Provider) -> Result<()> {
        let saved = {
            let mut state = self.lock();
            state.form.provider = provider;
            Self::saved_from(&state.form)
        };
        saved.save(self.preferences.as_ref())
    }

    fn saved_from(form: &FormState) -> SavedPreferences {
        SavedPreferences {
            credential: form.credential.clone(),
            provider: form.provider,
        }
    }

    pub fn toggle_credential_visibility(&self) -> bool {
        let mut state = self.lock();
        state.form.credential_visible = !state.form.credential_visible;
        state.form.credential_visible
    }

    /// Attach a template file picked or dropped by the user.
    pub fn file_selected(&self, file: UploadedFile, source: FileSource) -> FileSelection {
        let mut state = self.lock();
        if state.session.is_processing {
            return FileSelection::Ignored;
        }

        if !file.has_accepted_suffix() {
            warn!(file = %file.name, ?source, "Rejected template file");
            return FileSelection::Rejected {
                alert: INVALID_FILE_ALERT.to_string(),
            };
        }

        info!(file = %file.name, ?source, "Template file attached");
        state.session.uploaded_file = Some(file);
        FileSelection::Accepted
    }

    pub fn file_cleared(&self) -> bool {
        let mut state = self.lock();
        if state.session.is_processing {
            return false;
        }
        state.session.uploaded_file = None;
        true
    }

    pub fn can_submit(&self) -> bool {
        let state = self.lock();
        can_submit(&state.form, &state.session)
    }

    pub fn is_processing(&self) -> bool {
        self.lock().session.is_processing
    }

    /// Run one generation: structure, parse, build.
    ///
    /// Every failure is caught here and turned into the error panel.
    pub async fn submit(&self) -> SubmitOutcome {
        let (text, provider, credential) = {
            let mut state = self.lock();
            if state.session.is_processing {
                warn!("Submission ignored: a generation is already running");
                return SubmitOutcome::Ignored;
            }
            if !can_submit(&state.form, &state.session) {
                return SubmitOutcome::Invalid;
            }

            state.session.is_processing = true;
            state.status.begin();
            (
                state.form.text.clone(),
                state.form.provider,
                state.form.credential.clone(),
            )
        };
        let _guard = ProcessingGuard {
            state: Arc::clone(&self.state),
        };

        let result = self.generate(&text, provider, &credential).await;

        let mut state = self.lock();
        match result {
            Ok(report) => {
                state.status.succeed(report.slide_count);
                SubmitOutcome::Succeeded(report)
            }
            Err(e) => {
                error!(provider = %provider, error = %e, "Generation failed");
                let message = e.to_string();
                state.status.fail(&message);
                SubmitOutcome::Failed(message)
            }
        }
    }

    async fn generate(
        &self,
        text: &str,
        provider: Provider,
        credential: &str,
    ) -> Result<GenerationReport> {
        self.stage(STAGE_STRUCTURING);
        let body = self.client.request(text, provider, credential).await?;

        self.stage(STAGE_PARSING);
        let slides = StructuringClient::extract_slides(&body, provider)?;

        self.stage(building_stage(slides.len()));
        let path = self.deck.generate(&slides).await?;

        Ok(GenerationReport {
            slide_count: slides.len(),
            path,
        })
    }

    fn stage(&self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.lock().status.stage(message);
    }

    /// Start over: drop transient state and reload saved preferences.
    ///
    /// Refused while a submission is in flight.
    pub fn reset(&self) -> bool {
        let saved = SavedPreferences::load(self.preferences.as_ref());

        let mut state = self.lock();
        if state.session.is_processing {
            return false;
        }

        *state = WorkflowState {
            form: FormState::from_preferences(&saved),
            ..WorkflowState::default()
        };
        true
    }

    pub fn view(&self) -> WorkflowView {
        let state = self.lock();

        WorkflowView {
            text: state.form.text.clone(),
            provider: state.form.provider,
            credential: state.form.credential_display(),
            file_name: state.session.uploaded_file.as_ref().map(|f| f.name.clone()),
            drop_zone_visible: state.session.uploaded_file.is_none(),
            submit_enabled: can_submit(&state.form, &state.session),
            submit_label: if state.session.is_processing {
                SUBMIT_LABEL_BUSY
            } else {
                SUBMIT_LABEL
            },
            result_area_visible: state.status.is_visible(),
            status: state.status.lines().to_vec(),
            result: state.status.result().cloned(),
        }
    }
}
