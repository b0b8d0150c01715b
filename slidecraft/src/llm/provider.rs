use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};

use crate::error::SlideCraftError;

/// The fixed set of hosted models a deck can be structured by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Provider {
    #[default]
    OpenAi,
    Anthropic,
    Google,
}

/// Where the credential travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialPlacement {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// A dedicated header carrying the raw key.
    Header(&'static str),
    /// A query parameter carrying the raw key.
    Query(&'static str),
}

/// One step into a decoded JSON envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment {
    Key(&'static str),
    Index(usize),
}

/// Everything provider-specific about a structuring request.
#[derive(Clone, Copy)]
pub struct ProviderProfile {
    pub tag: &'static str,
    pub endpoint: &'static str,
    pub credential: CredentialPlacement,
    pub extra_headers: &'static [(&'static str, &'static str)],
    pub build_body: fn(&str) -> Value,
    pub text_path: &'static [PathSegment],
}

use PathSegment::{Index, Key};

const OPENAI: ProviderProfile = ProviderProfile {
    tag: "openai",
    endpoint: "https://api.openai.com/v1/chat/completions",
    credential: CredentialPlacement::Bearer,
    extra_headers: &[],
    build_body: openai_body,
    text_path: &[Key("choices"), Index(0), Key("message"), Key("content")],
};

const ANTHROPIC: ProviderProfile = ProviderProfile {
    tag: "anthropic",
    endpoint: "https://api.anthropic.com/v1/messages",
    credential: CredentialPlacement::Header("x-api-key"),
    extra_headers: &[("anthropic-version", "2023-06-01")],
    build_body: anthropic_body,
    text_path: &[Key("content"), Index(0), Key("text")],
};

const GOOGLE: ProviderProfile = ProviderProfile {
    tag: "google",
    endpoint:
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent",
    credential: CredentialPlacement::Query("key"),
    extra_headers: &[],
    build_body: google_body,
    text_path: &[
        Key("candidates"),
        Index(0),
        Key("content"),
        Key("parts"),
        Index(0),
        Key("text"),
    ],
};

fn user_messages(prompt: &str) -> Value {
    json!([{ "role": "user", "content": prompt }])
}

fn openai_body(prompt: &str) -> Value {
    json!({
        "model": "gpt-3.5-turbo",
        "messages": user_messages(prompt),
        "temperature": 0.5
    })
}

fn anthropic_body(prompt: &str) -> Value {
    json!({
        "model": "claude-3-haiku-20240307",
        "max_tokens": 4096,
        "messages": user_messages(prompt),
        "temperature": 0.5
    })
}

fn google_body(prompt: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }]
    })
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::OpenAi, Provider::Anthropic, Provider::Google];

    pub fn profile(self) -> &'static ProviderProfile {
        match self {
            Provider::OpenAi => &OPENAI,
            Provider::Anthropic => &ANTHROPIC,
            Provider::Google => &GOOGLE,
        }
    }

    pub fn tag(self) -> &'static str {
        self.profile().tag
    }

    /// Follow the provider's text path through a decoded response body.
    pub fn generated_text(self, body: &Value) -> Option<&str> {
        self.profile()
            .text_path
            .iter()
            .try_fold(body, |value, segment| match segment {
                Key(key) => value.get(key),
                Index(index) => value.get(index),
            })?
            .as_str()
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Provider {
    type Err = SlideCraftError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|provider| provider.tag() == tag)
            .ok_or_else(|| SlideCraftError::Validation(format!("Unsupported provider: {tag}")))
    }
}
