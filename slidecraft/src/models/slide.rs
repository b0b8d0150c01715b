use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Marker the model is asked to put in front of every bullet line.
pub const BULLET_MARKER: &str = "- ";

/// One slide of the outline returned by the model.
///
/// Records have no identity beyond their position; slide order is array order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SlideRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: String,
}

/// Any non-string value decodes to the empty string.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string).unwrap_or_default())
}

impl SlideRecord {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Lenient conversion from one element of the decoded array.
    ///
    /// Missing or non-string fields become empty strings so the deck can fall
    /// back to its placeholder text.
    pub fn from_value(value: &Value) -> Self {
        Self::deserialize(value).unwrap_or_default()
    }

    /// Bullet items of `content`, one per non-blank line, marker stripped.
    pub fn bullets(&self) -> Vec<&str> {
        self.content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.strip_prefix(BULLET_MARKER).unwrap_or(line).trim_start())
            .collect()
    }
}
