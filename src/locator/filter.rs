use crate::dom::DomElement;

/// Tags that never get a locator.
const IGNORED_TAGS: &[&str] = &[
    "script", "style", "meta", "link", "title", "head", "iframe", "svg", "path", "noscript", "g",
    "canvas", "img",
];

const INTERACTABLE_TAGS: &[&str] = &[
    "button", "input", "textarea", "select", "label", "a", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Attributes that make any element worth a locator.
const USEFUL_ATTRIBUTES: &[&str] = &[
    "data-testid",
    "id",
    "name",
    "placeholder",
    "aria-label",
    "role",
    "for",
];

/// Whether an element should be left out of the scan.
pub fn should_skip(element: &DomElement<'_>) -> bool {
    let tag = element.tag_name();

    if IGNORED_TAGS.contains(&tag.as_str()) {
        return true;
    }

    if element.is_hidden() || element.is_zero_size() {
        return true;
    }

    !is_useful(element, &tag)
}

fn is_useful(element: &DomElement<'_>, tag: &str) -> bool {
    INTERACTABLE_TAGS.contains(&tag)
        || USEFUL_ATTRIBUTES
            .iter()
            .any(|attribute| element.attr(attribute).is_some())
        // tabindex="" still counts
        || element.has_attr("tabindex")
}
