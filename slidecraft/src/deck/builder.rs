use std::path::PathBuf;
use std::sync::Arc;

use super::presentation::{Layout, Length, Presentation, TextOptions};
use super::writer::DeckWriter;
use crate::error::Result;
use crate::models::SlideRecord;

/// Name every generated deck is saved under.
pub const DECK_FILE_NAME: &str = "SlideCraft_Presentation.pptx";
pub const UNTITLED_SLIDE: &str = "Untitled Slide";
const TEXT_COLOR: &str = "363636";

fn title_options() -> TextOptions {
    TextOptions {
        x: Length::Inches(0.5),
        y: Length::Inches(0.25),
        w: Length::Percent(90.0),
        h: Length::Inches(1.0),
        font_size: 32,
        bold: true,
        color: TEXT_COLOR.to_string(),
        bullet: false,
    }
}

fn body_options() -> TextOptions {
    TextOptions {
        x: Length::Inches(0.5),
        y: Length::Inches(1.5),
        w: Length::Percent(90.0),
        h: Length::Inches(3.75),
        font_size: 18,
        bold: false,
        color: TEXT_COLOR.to_string(),
        bullet: true,
    }
}

/// Lay out one wide slide per record, in record order.
pub fn build_presentation(records: &[SlideRecord]) -> Presentation {
    let mut presentation = Presentation::new();
    presentation.set_layout(Layout::Wide);

    if let Some(first) = records.iter().find(|record| !record.title.is_empty()) {
        presentation.set_title(first.title.clone());
    }

    for record in records {
        let title = if record.title.is_empty() {
            UNTITLED_SLIDE
        } else {
            record.title.as_str()
        };

        presentation
            .add_slide()
            .add_text(title, title_options())
            .add_text(record.bullets().join("\n"), body_options());
    }

    presentation
}

/// Turns slide records into a saved `.pptx`.
#[derive(Clone)]
pub struct DeckBuilder {
    writer: Arc<dyn DeckWriter>,
}

impl DeckBuilder {
    pub fn new(writer: Arc<dyn DeckWriter>) -> Self {
        Self { writer }
    }

    /// Build and save the deck. Writer errors propagate untouched.
    pub async fn generate(&self, records: &[SlideRecord]) -> Result<PathBuf> {
        let presentation = build_presentation(records);
        let path = presentation
            .write_file(self.writer.as_ref(), DECK_FILE_NAME)
            .await?;

        tracing::info!(slides = records.len(), path = %path.display(), "Presentation saved");
        Ok(path)
    }
}
