mod builder;
mod presentation;
mod writer;

pub use builder::{build_presentation, DeckBuilder, DECK_FILE_NAME, UNTITLED_SLIDE};
pub use presentation::{Layout, Length, Presentation, Slide, TextBlock, TextOptions};
pub use writer::{DeckWriter, DirectoryWriter};
