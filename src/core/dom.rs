use crate::dom::DomElement;

/// Read access to a document tree for the selector-synthesis engine.
///
/// Implementations enumerate elements in document order and evaluate CSS
/// selectors against the whole tree. The engine never mutates the document.
pub trait DocumentQuery {
    /// Every element in document order, root first.
    fn elements(&self) -> Vec<DomElement<'_>>;

    /// Number of elements matching `selector`, or `None` if it does not parse.
    fn count_matches(&self, selector: &str) -> Option<usize>;

    /// Exactly one match. Unparseable selectors are never unique.
    fn is_unique(&self, selector: &str) -> bool {
        self.count_matches(selector) == Some(1)
    }
}
