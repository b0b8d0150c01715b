#![allow(dead_code)]

use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;

use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{json, Value};
use url::Url;
use wiremock::MockServer;

use slidecraft::config::LlmConfig;
use slidecraft::deck::{DeckBuilder, DeckWriter, DirectoryWriter};
use slidecraft::llm::{Provider, StructuringClient};
use slidecraft::models::{FileSource, UploadedFile};
use slidecraft::workflow::{FileSelection, PreferenceStore, Workflow};

pub const OPENAI_PATH: &str = "/v1/chat/completions";
pub const ANTHROPIC_PATH: &str = "/v1/messages";
pub const GOOGLE_PATH: &str = "/v1beta/models/gemini-pro:generateContent";

pub const TWO_SLIDES: &str = r#"Sure! Here you go:
[{"title":"Intro","content":"- hello\n- world"},{"title":"Outro","content":"- bye"}]
Let me know if you need more."#;

pub fn provider_path(provider: Provider) -> &'static str {
    match provider {
        Provider::OpenAi => OPENAI_PATH,
        Provider::Anthropic => ANTHROPIC_PATH,
        Provider::Google => GOOGLE_PATH,
    }
}

/// Point every provider at the mock server.
pub fn llm_config(server: &MockServer) -> LlmConfig {
    let url = |path: &str| Some(Url::parse(&format!("{}{path}", server.uri())).unwrap());

    LlmConfig {
        openai_url: url(OPENAI_PATH),
        anthropic_url: url(ANTHROPIC_PATH),
        google_url: url(GOOGLE_PATH),
    }
}

/// A success body shaped the way `provider` answers, carrying `text`.
pub fn envelope(provider: Provider, text: &str) -> Value {
    match provider {
        Provider::OpenAi => json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [
                {
                    "index": 0,
                    "message": { "role": "assistant", "content": text },
                    "finish_reason": "stop"
                }
            ]
        }),
        Provider::Anthropic => json!({
            "id": "msg_test",
            "type": "message",
            "role": "assistant",
            "content": [{ "type": "text", "text": text }],
            "stop_reason": "end_turn"
        }),
        Provider::Google => json!({
            "candidates": [
                {
                    "content": { "role": "model", "parts": [{ "text": text }] },
                    "finishReason": "STOP"
                }
            ]
        }),
    }
}

pub fn workflow_with_writer(
    server: &MockServer,
    writer: Arc<dyn DeckWriter>,
    preferences: Arc<dyn PreferenceStore>,
) -> Workflow {
    let client = StructuringClient::new(&llm_config(server)).unwrap();
    Workflow::new(client, DeckBuilder::new(writer), preferences)
}

pub fn workflow(
    server: &MockServer,
    output_dir: &Path,
    preferences: Arc<dyn PreferenceStore>,
) -> Workflow {
    workflow_with_writer(
        server,
        Arc::new(DirectoryWriter::new(output_dir)),
        preferences,
    )
}

/// Fill every field so the form can be submitted.
pub fn fill_form(workflow: &Workflow, provider: Provider) {
    workflow.set_text("Quarterly notes about the launch");
    workflow.set_provider(provider).unwrap();
    workflow.set_credential("test-key").unwrap();
    assert_eq!(
        workflow.file_selected(UploadedFile::named("template.pptx"), FileSource::Picker),
        FileSelection::Accepted
    );
}

/// Text runs of every slide, in slide order.
pub fn slide_texts(pptx: &[u8]) -> Vec<Vec<String>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(pptx)).unwrap();
    let slide_count = archive
        .file_names()
        .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
        .count();

    (1..=slide_count)
        .map(|n| {
            let mut xml = String::new();
            archive
                .by_name(&format!("ppt/slides/slide{n}.xml"))
                .unwrap()
                .read_to_string(&mut xml)
                .unwrap();
            text_runs(&xml)
        })
        .collect()
}

fn text_runs(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut texts = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => texts.push(String::from_utf8_lossy(e.as_ref()).into_owned()),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("Invalid slide XML: {e}"),
        }
        buf.clear();
    }
    texts
}
