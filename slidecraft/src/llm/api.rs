use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;

use crate::{
    config::LlmConfig,
    error::{Result, SlideCraftError},
    llm::prompts::slide_outline_prompt,
    llm::provider::{CredentialPlacement, Provider},
    models::SlideRecord,
};

pub const INVALID_FORMAT: &str = "Could not parse AI response. It might be an invalid format.";
pub const NO_SLIDE_DATA: &str = "AI returned no slide data.";

/// Sends text to one of the fixed providers and turns the reply into slides.
#[derive(Debug, Clone)]
pub struct StructuringClient {
    client: Client,
    config: LlmConfig,
}

impl StructuringClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder().build().map_err(|error| {
            SlideCraftError::Validation(format!("Failed to create LLM HTTP client: {error}"))
        })?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn endpoint(&self, provider: Provider) -> Result<url::Url> {
        self.config.endpoint(provider)
    }

    /// Dispatch exactly one request and return the decoded body untouched.
    pub async fn request(&self, text: &str, provider: Provider, credential: &str) -> Result<Value> {
        let profile = provider.profile();
        let endpoint = self.endpoint(provider)?;
        let body = (profile.build_body)(&slide_outline_prompt(text));

        tracing::debug!(provider = %provider, endpoint = %endpoint, "Sending structuring request");

        let mut request = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json");

        request = match profile.credential {
            CredentialPlacement::Bearer => request.bearer_auth(credential),
            CredentialPlacement::Header(name) => request.header(name, credential),
            CredentialPlacement::Query(name) => request.query(&[(name, credential)]),
        };

        for (name, value) in profile.extra_headers {
            request = request.header(*name, *value);
        }

        // reqwest errors print the request URL, which carries the Google key.
        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| SlideCraftError::Http(e.without_url()))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body_len = body.len(), "Provider rejected request");
            return Err(SlideCraftError::Transport {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response
            .text()
            .await
            .map_err(|e| SlideCraftError::Http(e.without_url()))?;
        tracing::debug!(response_len = raw.len(), "Structuring response received");

        serde_json::from_str(&raw).map_err(|e| {
            tracing::error!(response_preview = %raw.chars().take(100).collect::<String>(), error = %e, "Provider response is not JSON");
            SlideCraftError::Parse(INVALID_FORMAT.to_string())
        })
    }

    /// Pull the slide records out of a provider envelope.
    pub fn extract_slides(body: &Value, provider: Provider) -> Result<Vec<SlideRecord>> {
        let text = provider
            .generated_text(body)
            .ok_or_else(|| SlideCraftError::Parse(INVALID_FORMAT.to_string()))?;

        let json = extract_json_array(text)
            .ok_or_else(|| SlideCraftError::Parse(INVALID_FORMAT.to_string()))?;

        parse_slides(json)
    }
}

/// The substring from the first `[` to the last `]`, both included.
///
/// Models like to wrap the array in prose or code fences; everything outside
/// the outermost brackets is dropped.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (start <= end).then(|| &text[start..=end])
}

/// Decode a bracket-delimited JSON string into a non-empty list of slides.
pub fn parse_slides(json: &str) -> Result<Vec<SlideRecord>> {
    let value: Value = serde_json::from_str(json).map_err(|e| {
        tracing::error!(json_len = json.len(), error = %e, "Failed to parse slide array");
        SlideCraftError::Parse(INVALID_FORMAT.to_string())
    })?;

    match value.as_array() {
        Some(items) if !items.is_empty() => Ok(items.iter().map(SlideRecord::from_value).collect()),
        _ => Err(SlideCraftError::Parse(NO_SLIDE_DATA.to_string())),
    }
}
