use crate::core::DocumentQuery;
use crate::dom::DomElement;
use crate::locator::strategy::{
    absolute_xpath, clean_text, nth_of_type, SelectorFragment, StrategyKey,
};
use std::fmt;

/// Text fallback needs more than this many characters.
const MIN_FALLBACK_TEXT_LEN: usize = 2;

/// What produced a resolved selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorSource {
    Strategy(StrategyKey),
    TextFallback,
    NthOfType,
    XPath,
}

impl fmt::Display for SelectorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorSource::Strategy(key) => write!(f, "{}", key),
            SelectorSource::TextFallback => f.write_str("text-fallback"),
            SelectorSource::NthOfType => f.write_str("nth-of-type"),
            SelectorSource::XPath => f.write_str("xpath"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub fragment: SelectorFragment,
    pub source: SelectorSource,
}

impl Resolution {
    fn new(fragment: SelectorFragment, source: SelectorSource) -> Self {
        Self { fragment, source }
    }

    /// Index of the first key in `order` whose text appears in the rendered
    /// selector, or `order.len()` when none does. `#email` names no key, so
    /// it ranks after `[name="q"]` under the default order.
    pub fn priority_rank(&self, order: &[StrategyKey]) -> usize {
        let selector = self.fragment.to_string();
        order
            .iter()
            .position(|key| selector.contains(key.key()))
            .unwrap_or(order.len())
    }

    /// Positional and absolute-path selectors break when markup shifts.
    pub fn is_brittle(&self) -> bool {
        matches!(self.source, SelectorSource::NthOfType | SelectorSource::XPath)
    }
}

/// Pick the best selector for `element`.
///
/// Strategies are tried in `order`; the first fragment that is unique in the
/// document wins (contains-text fragments skip the uniqueness query). After
/// that: short text, then `nth-of-type`, then an absolute XPath. `safe_only`
/// forbids the last two.
pub fn resolve<D: DocumentQuery + ?Sized>(
    document: &D,
    element: &DomElement<'_>,
    order: &[StrategyKey],
    safe_only: bool,
) -> Option<Resolution> {
    for key in order {
        let Some(fragment) = key.evaluate(element) else {
            continue;
        };
        if is_verified_unique(document, &fragment) {
            return Some(Resolution::new(fragment, SelectorSource::Strategy(*key)));
        }
    }

    if let Some(text) =
        clean_text(element).filter(|text| text.chars().count() > MIN_FALLBACK_TEXT_LEN)
    {
        let fragment = SelectorFragment::ContainsText {
            tag: element.tag_name(),
            text,
        };
        return Some(Resolution::new(fragment, SelectorSource::TextFallback));
    }

    if safe_only {
        return None;
    }

    if let Some(fragment) = nth_of_type(element) {
        if is_verified_unique(document, &fragment) {
            return Some(Resolution::new(fragment, SelectorSource::NthOfType));
        }
    }

    Some(Resolution::new(
        absolute_xpath(element),
        SelectorSource::XPath,
    ))
}

fn is_verified_unique<D: DocumentQuery + ?Sized>(document: &D, fragment: &SelectorFragment) -> bool {
    match fragment {
        SelectorFragment::Css(selector) => document.is_unique(selector),
        SelectorFragment::ContainsText { .. } | SelectorFragment::XPath(_) => true,
    }
}
