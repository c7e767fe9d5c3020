//! Selector synthesis
//!
//! filter -> resolve -> name -> render, driven per element by [`scan`].

pub mod filter;
pub mod naming;
pub mod normalize;
pub mod render;
pub mod resolver;
pub mod scan;
pub mod strategy;

pub use filter::should_skip;
pub use naming::{base_name_for, NameAllocator};
pub use normalize::to_camel_case;
pub use render::{escape_double, escape_single, render, xpath_literal};
pub use resolver::{resolve, Resolution, SelectorSource};
pub use scan::{collect_locators, scan, Locator, NO_LOCATORS_FOUND};
pub use strategy::{SelectorFragment, StrategyKey};
