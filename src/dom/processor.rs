use crate::core::DocumentQuery;
use crate::dom::{DomElement, ElementLayout, PageSnapshot};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// Parsed HTML document, optionally paired with layout captured in a browser.
pub struct HtmlDocument {
    html: Html,
    layout: Option<Vec<ElementLayout>>,
}

impl HtmlDocument {
    /// Parse markup that was never rendered; visibility comes from markup heuristics.
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
            layout: None,
        }
    }

    /// Re-parse a captured page and attach its live layout.
    ///
    /// Layout is only trusted when the re-parsed tree has exactly the tag
    /// sequence the browser reported; otherwise markup heuristics are used.
    pub fn from_snapshot(snapshot: &PageSnapshot) -> Self {
        let mut document = Self::parse(&snapshot.html);
        if snapshot.layout.is_empty() {
            debug!("Snapshot of {} carries no layout", snapshot.url);
            return document;
        }

        let tags: Vec<String> = document
            .element_refs()
            .map(|element| element.value().name().to_ascii_lowercase())
            .collect();
        let aligned = tags.len() == snapshot.layout.len()
            && tags
                .iter()
                .zip(&snapshot.layout)
                .all(|(tag, entry)| entry.tag.is_empty() || entry.tag.eq_ignore_ascii_case(tag));

        if aligned {
            document.layout = Some(snapshot.layout.clone());
        } else {
            warn!(
                "Layout of {} does not line up with its markup ({} parsed vs {} captured elements), using markup heuristics",
                snapshot.url,
                tags.len(),
                snapshot.layout.len()
            );
        }
        document
    }

    pub fn has_live_layout(&self) -> bool {
        self.layout.is_some()
    }

    pub fn element_count(&self) -> usize {
        self.element_refs().count()
    }

    fn element_refs(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
    }
}

impl DocumentQuery for HtmlDocument {
    fn elements(&self) -> Vec<DomElement<'_>> {
        self.element_refs()
            .enumerate()
            .map(|(index, node)| {
                let element = DomElement::new(node);
                match self.layout.as_ref().and_then(|layout| layout.get(index)) {
                    Some(layout) => element.with_layout(layout),
                    None => element,
                }
            })
            .collect()
    }

    fn count_matches(&self, selector: &str) -> Option<usize> {
        match Selector::parse(selector) {
            Ok(selector) => Some(self.html.select(&selector).count()),
            Err(e) => {
                debug!("Selector {:?} does not parse: {:?}", selector, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><title>t</title></head><body>
        <button id="a">One</button>
        <button>Two</button>
    </body></html>"#;

    #[test]
    fn test_elements_in_document_order() {
        let document = HtmlDocument::parse(PAGE);
        let tags: Vec<String> = document.elements().iter().map(|e| e.tag_name()).collect();
        assert_eq!(tags, vec!["html", "head", "title", "body", "button", "button"]);
        assert_eq!(document.element_count(), 6);
    }

    #[test]
    fn test_count_matches() {
        let document = HtmlDocument::parse(PAGE);
        assert_eq!(document.count_matches("button"), Some(2));
        assert_eq!(document.count_matches("#a"), Some(1));
        assert!(document.is_unique("#a"));
        assert!(!document.is_unique("button"));
    }

    #[test]
    fn test_malformed_selector_is_not_unique() {
        let document = HtmlDocument::parse(PAGE);
        assert_eq!(document.count_matches("button:contains(\"One\")"), None);
        assert_eq!(document.count_matches("#1abc"), None);
        assert!(!document.is_unique("[[["));
    }

    #[test]
    fn test_snapshot_layout_is_applied_when_aligned() {
        let tags = ["html", "head", "title", "body", "button", "button"];
        let layout = tags
            .iter()
            .map(|tag| ElementLayout {
                tag: tag.to_string(),
                hidden: *tag == "button",
                zero_size: false,
            })
            .collect();
        let snapshot = PageSnapshot::new("https://x.test/".into(), "t".into(), PAGE.into())
            .with_layout(layout);

        let document = HtmlDocument::from_snapshot(&snapshot);
        assert!(document.has_live_layout());
        let buttons: Vec<_> = document
            .elements()
            .into_iter()
            .filter(|e| e.tag_name() == "button")
            .collect();
        assert!(buttons.iter().all(|b| b.is_hidden()));
    }

    #[test]
    fn test_misaligned_snapshot_falls_back_to_markup() {
        let layout = vec![ElementLayout {
            tag: "html".to_string(),
            hidden: false,
            zero_size: false,
        }];
        let snapshot = PageSnapshot::new("https://x.test/".into(), "t".into(), PAGE.into())
            .with_layout(layout);

        let document = HtmlDocument::from_snapshot(&snapshot);
        assert!(!document.has_live_layout());
        let first_button = document
            .elements()
            .into_iter()
            .find(|e| e.tag_name() == "button")
            .unwrap();
        assert!(!first_button.is_hidden());
    }
}
