pub mod browser;
pub mod core;
pub mod dom;
pub mod errors;
pub mod locator;
pub mod testing;
pub mod types;

#[cfg(feature = "chrome")]
pub use browser::ChromeBrowser;
pub use browser::LocatorSession;
pub use crate::core::{BrowserConfig, BrowserTrait, Config, DocumentQuery, Viewport};
pub use dom::{DomElement, HtmlDocument, PageSnapshot};
pub use errors::{LocatorError, Result};
pub use locator::{collect_locators, scan, Locator, SelectorFragment, StrategyKey, NO_LOCATORS_FOUND};
pub use types::*;
