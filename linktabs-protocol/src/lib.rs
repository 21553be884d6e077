pub mod document;
#[cfg(feature = "http")]
pub mod http;
pub mod layout;
pub mod link;

pub use document::{Document, Item, Site, Tab};
pub use link::is_valid_url;
