pub mod element;
pub mod processor;
pub mod state;

pub use element::{DomElement, ElementLayout};
pub use processor::HtmlDocument;
pub use state::{PageSnapshot, SNAPSHOT_SCRIPT};
