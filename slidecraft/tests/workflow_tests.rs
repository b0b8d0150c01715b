mod common;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use slidecraft::config::LlmConfig;
use slidecraft::deck::{DeckBuilder, DeckWriter, DirectoryWriter, DECK_FILE_NAME};
use slidecraft::error::{Result, SlideCraftError};
use slidecraft::llm::{Provider, StructuringClient, INVALID_FORMAT};
use slidecraft::models::{FileSource, UploadedFile};
use slidecraft::workflow::{
    FileSelection, JsonFilePreferences, MemoryPreferences, PreferenceStore, ResultPanel,
    SavedPreferences, StatusKind, StatusLine, SubmitOutcome, GENERATION_FAILED,
    GENERATION_SUCCEEDED, INVALID_FILE_ALERT, SUBMIT_LABEL, SUBMIT_LABEL_BUSY, Workflow,
};

use common::{envelope, fill_form, slide_texts, workflow, workflow_with_writer, TWO_SLIDES};

async fn mount_success(server: &MockServer, provider: Provider) {
    Mock::given(method("POST"))
        .and(path(common::provider_path(provider)))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(provider, TWO_SLIDES)))
        .expect(1)
        .mount(server)
        .await;
}

fn saved_preferences() -> Arc<dyn PreferenceStore> {
    let store = MemoryPreferences::new();
    SavedPreferences {
        credential: "test-key".to_string(),
        provider: Provider::Anthropic,
    }
    .save(&store)
    .unwrap();
    Arc::new(store)
}

struct FailingWriter;

#[async_trait]
impl DeckWriter for FailingWriter {
    async fn write(&self, _file_name: &str, _bytes: Vec<u8>) -> Result<PathBuf> {
        Err(SlideCraftError::Deck("disk full".to_string()))
    }
}

#[tokio::test]
async fn test_successful_generation_saves_deck_and_reports_slide_count() {
    let server = MockServer::start().await;
    mount_success(&server, Provider::OpenAi).await;
    let output = tempfile::tempdir().unwrap();

    let workflow = workflow(&server, output.path(), Arc::new(MemoryPreferences::new()));
    fill_form(&workflow, Provider::OpenAi);
    assert!(workflow.can_submit());

    let outcome = workflow.submit().await;

    let expected_path = output.path().join(DECK_FILE_NAME);
    match outcome {
        SubmitOutcome::Succeeded(report) => {
            assert_eq!(report.slide_count, 2);
            assert_eq!(report.path, expected_path);
        }
        other => panic!("Expected success, got {other:?}"),
    }

    let view = workflow.view();
    assert!(view.result_area_visible);
    assert_eq!(
        view.status,
        vec![StatusLine {
            kind: StatusKind::Success,
            message: GENERATION_SUCCEEDED.to_string(),
        }]
    );
    assert_eq!(
        view.result,
        Some(ResultPanel::Success {
            summary: "Your presentation with 2 slides is ready.".to_string(),
        })
    );
    assert_eq!(view.submit_label, SUBMIT_LABEL);
    assert!(!workflow.is_processing());

    let deck = std::fs::read(expected_path).unwrap();
    let slides = slide_texts(&deck);
    assert_eq!(slides.len(), 2);
    assert_eq!(slides[0], vec!["Intro", "hello", "world"]);
    assert_eq!(slides[1], vec!["Outro", "bye"]);
}

#[tokio::test]
async fn test_transport_failure_shows_error_panel() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::GOOGLE_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .expect(1)
        .mount(&server)
        .await;
    let output = tempfile::tempdir().unwrap();

    let workflow = workflow(&server, output.path(), Arc::new(MemoryPreferences::new()));
    fill_form(&workflow, Provider::Google);

    let outcome = workflow.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Failed("API Error (401): unauthorized".to_string())
    );
    let view = workflow.view();
    assert_eq!(view.status.len(), 1);
    assert_eq!(view.status[0].kind, StatusKind::Error);
    assert_eq!(view.status[0].message, GENERATION_FAILED);
    assert_eq!(
        view.result.as_ref().map(ResultPanel::summary),
        Some("Error: API Error (401): unauthorized")
    );
    assert!(!workflow.is_processing());
    assert!(!output.path().join(DECK_FILE_NAME).exists());
}

#[tokio::test]
async fn test_unparseable_reply_fails_before_building() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::ANTHROPIC_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(Provider::Anthropic, "No slides today, sorry.")),
        )
        .mount(&server)
        .await;
    let output = tempfile::tempdir().unwrap();

    let workflow = workflow(&server, output.path(), Arc::new(MemoryPreferences::new()));
    fill_form(&workflow, Provider::Anthropic);

    assert_eq!(
        workflow.submit().await,
        SubmitOutcome::Failed(INVALID_FORMAT.to_string())
    );
    assert!(!output.path().join(DECK_FILE_NAME).exists());
}

#[tokio::test]
async fn test_writer_failure_propagates_its_message() {
    let server = MockServer::start().await;
    mount_success(&server, Provider::OpenAi).await;

    let workflow = workflow_with_writer(
        &server,
        Arc::new(FailingWriter),
        Arc::new(MemoryPreferences::new()),
    );
    fill_form(&workflow, Provider::OpenAi);

    let outcome = workflow.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Failed("Deck error: disk full".to_string())
    );
    assert!(!workflow.is_processing());
}

#[tokio::test]
async fn test_incomplete_form_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let output = tempfile::tempdir().unwrap();

    let workflow = workflow(&server, output.path(), Arc::new(MemoryPreferences::new()));
    workflow.set_text("Some notes");
    workflow.set_credential("key").unwrap();

    assert!(!workflow.can_submit());
    assert!(!workflow.view().submit_enabled);
    assert_eq!(workflow.submit().await, SubmitOutcome::Invalid);
    assert!(!workflow.view().result_area_visible);
}

#[tokio::test]
async fn test_second_submit_while_pending_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::OPENAI_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(Provider::OpenAi, TWO_SLIDES))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let output = tempfile::tempdir().unwrap();

    let workflow = workflow(&server, output.path(), Arc::new(MemoryPreferences::new()));
    fill_form(&workflow, Provider::OpenAi);

    let (first, second) = tokio::join!(workflow.submit(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;

        let view = workflow.view();
        assert!(workflow.is_processing());
        assert!(!view.submit_enabled);
        assert_eq!(view.submit_label, SUBMIT_LABEL_BUSY);
        assert!(!workflow.file_cleared());
        assert!(!workflow.reset());
        assert_eq!(
            workflow.file_selected(UploadedFile::named("other.pptx"), FileSource::Picker),
            FileSelection::Ignored
        );

        workflow.submit().await
    });

    assert!(matches!(first, SubmitOutcome::Succeeded(_)));
    assert_eq!(second, SubmitOutcome::Ignored);
    assert_eq!(workflow.view().file_name.as_deref(), Some("template.pptx"));
}

#[tokio::test]
async fn test_rejected_file_keeps_previous_attachment() {
    let server = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();
    let workflow = workflow(&server, output.path(), Arc::new(MemoryPreferences::new()));

    assert_eq!(
        workflow.file_selected(UploadedFile::named("deck.pptx"), FileSource::Picker),
        FileSelection::Accepted
    );
    let before = workflow.view();
    assert!(!before.drop_zone_visible);

    let selection = workflow.file_selected(UploadedFile::named("deck.pdf"), FileSource::Drop);

    assert_eq!(
        selection,
        FileSelection::Rejected {
            alert: INVALID_FILE_ALERT.to_string(),
        }
    );
    assert_eq!(workflow.view(), before);
}

#[tokio::test]
async fn test_dropped_template_is_accepted_and_can_be_removed() {
    let server = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();
    let workflow = workflow(&server, output.path(), Arc::new(MemoryPreferences::new()));

    assert_eq!(
        workflow.file_selected(UploadedFile::named("brand.potx"), FileSource::Drop),
        FileSelection::Accepted
    );
    assert_eq!(workflow.view().file_name.as_deref(), Some("brand.potx"));

    assert!(workflow.file_cleared());
    let view = workflow.view();
    assert_eq!(view.file_name, None);
    assert!(view.drop_zone_visible);
}

#[tokio::test]
async fn test_start_over_after_success_restores_initial_view() {
    let server = MockServer::start().await;
    mount_success(&server, Provider::Anthropic).await;
    let output = tempfile::tempdir().unwrap();

    let workflow = workflow(&server, output.path(), saved_preferences());
    let initial = workflow.view();
    assert_eq!(initial.provider, Provider::Anthropic);
    assert_eq!(initial.credential, "••••••••");

    fill_form(&workflow, Provider::Anthropic);
    workflow.toggle_credential_visibility();
    assert!(matches!(
        workflow.submit().await,
        SubmitOutcome::Succeeded(_)
    ));

    assert!(workflow.reset());
    assert_eq!(workflow.view(), initial);

    assert!(workflow.reset());
    assert_eq!(workflow.view(), initial);
}

#[tokio::test]
async fn test_start_over_after_error_restores_initial_view() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;
    let output = tempfile::tempdir().unwrap();

    let workflow = workflow(&server, output.path(), saved_preferences());
    let initial = workflow.view();

    fill_form(&workflow, Provider::Anthropic);
    assert!(matches!(workflow.submit().await, SubmitOutcome::Failed(_)));

    assert!(workflow.reset());
    assert_eq!(workflow.view(), initial);
}

#[tokio::test]
async fn test_provider_and_credential_edits_are_persisted() {
    let server = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();
    let prefs_path = output.path().join("preferences.json");

    let first = workflow(
        &server,
        output.path(),
        Arc::new(JsonFilePreferences::open(&prefs_path).unwrap()),
    );
    first.set_provider(Provider::Google).unwrap();
    first.set_credential("persisted-key").unwrap();
    first.set_text("transient");

    let second = workflow(
        &server,
        output.path(),
        Arc::new(JsonFilePreferences::open(&prefs_path).unwrap()),
    );
    second.toggle_credential_visibility();
    let view = second.view();

    assert_eq!(view.provider, Provider::Google);
    assert_eq!(view.credential, "persisted-key");
    assert_eq!(view.text, "");
}

#[tokio::test]
async fn test_network_failure_does_not_expose_google_key() {
    let config = LlmConfig {
        google_url: Some(
            url::Url::parse("http://127.0.0.1:1/v1beta/models/gemini-pro:generateContent")
                .unwrap(),
        ),
        ..LlmConfig::default()
    };
    let output = tempfile::tempdir().unwrap();
    let workflow = Workflow::new(
        StructuringClient::new(&config).unwrap(),
        DeckBuilder::new(Arc::new(DirectoryWriter::new(output.path()))),
        Arc::new(MemoryPreferences::new()),
    );
    workflow.set_text("Some notes");
    workflow.set_provider(Provider::Google).unwrap();
    workflow.set_credential("SECRET-GOOGLE-KEY").unwrap();
    workflow.file_selected(UploadedFile::named("deck.pptx"), FileSource::Picker);

    let message = match workflow.submit().await {
        SubmitOutcome::Failed(message) => message,
        other => panic!("Expected failure, got {other:?}"),
    };

    assert!(message.starts_with("HTTP request error"), "{message}");
    assert!(!message.contains("SECRET-GOOGLE-KEY"), "{message}");
    let summary = workflow.view().result.unwrap().summary().to_string();
    assert!(!summary.contains("SECRET-GOOGLE-KEY"), "{summary}");
}

#[tokio::test]
async fn test_start_over_picks_up_preferences_changed_on_disk() {
    let server = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();
    let prefs_path = output.path().join("preferences.json");

    let workflow = workflow(
        &server,
        output.path(),
        Arc::new(JsonFilePreferences::open(&prefs_path).unwrap()),
    );
    assert_eq!(workflow.view().provider, Provider::OpenAi);

    let other = JsonFilePreferences::open(&prefs_path).unwrap();
    SavedPreferences {
        credential: "from-elsewhere".to_string(),
        provider: Provider::Anthropic,
    }
    .save(&other)
    .unwrap();

    assert!(workflow.reset());
    workflow.toggle_credential_visibility();
    let view = workflow.view();
    assert_eq!(view.provider, Provider::Anthropic);
    assert_eq!(view.credential, "from-elsewhere");
}
