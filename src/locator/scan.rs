use crate::core::DocumentQuery;
use crate::locator::filter::should_skip;
use crate::locator::naming::{base_name_for, NameAllocator};
use crate::locator::render::render;
use crate::locator::resolver::resolve;
use crate::types::ScanRequest;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Returned by [`scan`] when no element produced a statement.
pub const NO_LOCATORS_FOUND: &str = "No valid locators found.";

/// One element's rendered locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    pub name: String,
    pub selector: String,
    /// Strategy key or fallback that produced `selector`.
    pub source: String,
    pub rank: usize,
    pub code: String,
}

/// Resolve, name and render every element worth a locator, ordered by each
/// selector's priority rank. Ties keep document order.
pub fn collect_locators<D: DocumentQuery + ?Sized>(
    document: &D,
    request: &ScanRequest,
) -> Vec<Locator> {
    let mut names = NameAllocator::new();
    let order = &request.priority_order;
    let mut locators = Vec::new();
    let mut skipped = 0usize;

    for element in document.elements() {
        if should_skip(&element) {
            skipped += 1;
            continue;
        }

        let Some(resolution) = resolve(document, &element, order, request.safe_only) else {
            debug!("No selector for <{}>", element.tag_name());
            continue;
        };
        let Some(base) = base_name_for(&element) else {
            debug!("No name for <{}> ({})", element.tag_name(), resolution.fragment);
            continue;
        };

        if resolution.is_brittle() {
            debug!(
                "Positional selector for <{}>: {}",
                element.tag_name(),
                resolution.fragment
            );
        }

        let name = names.allocate(&base);
        let code = render(
            &name,
            &resolution.fragment,
            request.language,
            request.framework,
            request.output_mode,
        );

        locators.push(Locator {
            rank: resolution.priority_rank(order),
            selector: resolution.fragment.to_string(),
            source: resolution.source.to_string(),
            name,
            code,
        });
    }

    // sort_by_key is stable
    locators.sort_by_key(|locator| locator.rank);

    info!(
        "Generated {} locators ({} elements filtered out)",
        locators.len(),
        skipped
    );
    locators
}

/// Newline-joined statements for `document`, or [`NO_LOCATORS_FOUND`].
pub fn scan<D: DocumentQuery + ?Sized>(document: &D, request: &ScanRequest) -> String {
    let locators = collect_locators(document, request);
    if locators.is_empty() {
        return NO_LOCATORS_FOUND.to_string();
    }

    locators
        .into_iter()
        .map(|locator| locator.code)
        .collect::<Vec<_>>()
        .join("\n")
}
