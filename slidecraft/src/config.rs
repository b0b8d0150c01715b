use std::env;
use std::path::PathBuf;

use url::Url;

use crate::error::Result;
use crate::llm::Provider;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub preferences: PreferencesConfig,
    pub output: OutputConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone)]
pub struct PreferencesConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

/// Endpoint overrides per provider. `None` means the built-in endpoint.
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub openai_url: Option<Url>,
    pub anthropic_url: Option<Url>,
    pub google_url: Option<Url>,
}

impl LlmConfig {
    pub fn endpoint_override(&self, provider: Provider) -> Option<&Url> {
        match provider {
            Provider::OpenAi => self.openai_url.as_ref(),
            Provider::Anthropic => self.anthropic_url.as_ref(),
            Provider::Google => self.google_url.as_ref(),
        }
    }

    /// Resolved endpoint for `provider`.
    pub fn endpoint(&self, provider: Provider) -> Result<Url> {
        match self.endpoint_override(provider) {
            Some(url) => Ok(url.clone()),
            None => Ok(Url::parse(provider.profile().endpoint)?),
        }
    }
}

fn default_home() -> PathBuf {
    match env::var("SLIDECRAFT_HOME") {
        Ok(home) if !home.is_empty() => PathBuf::from(home),
        _ => env::var("HOME")
            .map(|home| PathBuf::from(home).join(".slidecraft"))
            .unwrap_or_else(|_| PathBuf::from(".slidecraft")),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preferences: PreferencesConfig {
                path: parse_env_opt("SLIDECRAFT_PREFERENCES_PATH")
                    .unwrap_or_else(|| default_home().join("preferences.json")),
            },
            output: OutputConfig {
                dir: parse_env_or("SLIDECRAFT_OUTPUT_DIR", PathBuf::from(".")),
            },
            llm: LlmConfig {
                openai_url: parse_env_opt("SLIDECRAFT_OPENAI_URL"),
                anthropic_url: parse_env_opt("SLIDECRAFT_ANTHROPIC_URL"),
                google_url: parse_env_opt("SLIDECRAFT_GOOGLE_URL"),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
