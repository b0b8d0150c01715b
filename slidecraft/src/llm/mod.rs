mod api;
pub mod prompts;
mod provider;

pub use api::{extract_json_array, parse_slides, StructuringClient, INVALID_FORMAT, NO_SLIDE_DATA};
pub use provider::{CredentialPlacement, PathSegment, Provider, ProviderProfile};
