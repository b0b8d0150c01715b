mod slide;
mod upload;

pub use slide::*;
pub use upload::*;
