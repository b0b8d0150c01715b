use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlideCraftError {
    /// Provider answered with a non-success status.
    #[error("API Error ({status}): {body}")]
    Transport { status: u16, body: String },

    #[error("{0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Deck error: {0}")]
    Deck(String),

    #[error("Preferences error: {0}")]
    Preferences(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl SlideCraftError {
    pub fn is_transport(&self) -> bool {
        matches!(self, SlideCraftError::Transport { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, SlideCraftError::Parse(_))
    }
}

pub type Result<T> = std::result::Result<T, SlideCraftError>;
