use scraper::ElementRef;
use serde::{Deserialize, Serialize};

/// Visibility signals for one element.
///
/// Captured from the live page (`offsetParent`, `offsetWidth`/`offsetHeight`)
/// or derived from markup when no browser is involved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementLayout {
    #[serde(default)]
    pub tag: String,
    pub hidden: bool,
    pub zero_size: bool,
}

impl ElementLayout {
    /// Best-effort layout for markup that was never rendered.
    pub fn from_markup(element: &DomElement<'_>) -> Self {
        Self {
            tag: element.tag_name(),
            hidden: is_hidden_in_markup(element),
            zero_size: is_zero_size_in_markup(element),
        }
    }
}

/// Borrowed handle to one element of a parsed document.
#[derive(Debug, Clone, Copy)]
pub struct DomElement<'a> {
    node: ElementRef<'a>,
    hidden: bool,
    zero_size: bool,
}

impl<'a> DomElement<'a> {
    pub fn new(node: ElementRef<'a>) -> Self {
        let mut element = Self::new_unchecked(node);
        let layout = ElementLayout::from_markup(&element);
        element.hidden = layout.hidden;
        element.zero_size = layout.zero_size;
        element
    }

    // Skips the markup layout pass
    fn new_unchecked(node: ElementRef<'a>) -> Self {
        Self {
            node,
            hidden: false,
            zero_size: false,
        }
    }

    pub fn with_layout(mut self, layout: &ElementLayout) -> Self {
        self.hidden = layout.hidden;
        self.zero_size = layout.zero_size;
        self
    }

    pub fn tag_name(&self) -> String {
        self.node.value().name().to_ascii_lowercase()
    }

    /// Attribute value; empty values count as absent.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.value().attr(name).filter(|value| !value.is_empty())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.node.value().attr(name).is_some()
    }

    /// `type` of an input, lowercased, `text` when missing.
    pub fn input_type(&self) -> String {
        self.attr("type")
            .map(|value| value.trim().to_ascii_lowercase())
            .unwrap_or_else(|| "text".to_string())
    }

    /// Concatenated descendant text, like `Node.textContent`.
    pub fn text_content(&self) -> String {
        self.node.text().collect()
    }

    pub fn parent(&self) -> Option<DomElement<'a>> {
        self.node
            .parent()
            .and_then(ElementRef::wrap)
            .map(DomElement::new)
    }

    /// 1-based position among the parent element's element children.
    pub fn child_position(&self) -> Option<usize> {
        self.node.parent().and_then(ElementRef::wrap)?;
        let preceding = self
            .node
            .prev_siblings()
            .filter(|sibling| sibling.value().is_element())
            .count();
        Some(preceding + 1)
    }

    /// 1-based position among preceding element siblings with the same tag.
    pub fn type_position(&self) -> usize {
        let tag = self.node.value().name();
        let preceding = self
            .node
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .filter(|sibling| sibling.value().name() == tag)
            .count();
        preceding + 1
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_zero_size(&self) -> bool {
        self.zero_size
    }

    fn ancestors(&self) -> impl Iterator<Item = ElementRef<'a>> {
        self.node.ancestors().filter_map(ElementRef::wrap)
    }

    fn inline_style(&self, property: &str) -> Option<String> {
        let style = self.node.value().attr("style")?;
        style.split(';').find_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            if name.trim().eq_ignore_ascii_case(property) {
                Some(value.trim().to_ascii_lowercase())
            } else {
                None
            }
        })
    }
}

fn is_hidden_in_markup(element: &DomElement<'_>) -> bool {
    let tag = element.tag_name();

    // No offset parent for the root and body
    if matches!(tag.as_str(), "html" | "body") {
        return true;
    }

    if tag == "input" && element.input_type() == "hidden" {
        return true;
    }

    if element.has_attr("hidden") {
        return true;
    }

    let display_none = element
        .inline_style("display")
        .is_some_and(|value| value.starts_with("none"));
    let visibility_hidden = element
        .inline_style("visibility")
        .is_some_and(|value| value.starts_with("hidden"));
    if display_none || visibility_hidden {
        return true;
    }

    element.ancestors().any(|ancestor| {
        let value = ancestor.value();
        if matches!(value.name(), "head" | "template") || value.attr("hidden").is_some() {
            return true;
        }
        DomElement::new_unchecked(ancestor)
            .inline_style("display")
            .is_some_and(|display| display.starts_with("none"))
    })
}

fn is_zero_size_in_markup(element: &DomElement<'_>) -> bool {
    let style_zero = |property: &str| {
        element
            .inline_style(property)
            .is_some_and(|value| is_zero_length(&value))
    };
    let attr_zero = |name: &str| {
        element
            .node
            .value()
            .attr(name)
            .is_some_and(is_zero_length)
    };

    (style_zero("width") && style_zero("height")) || (attr_zero("width") && attr_zero("height"))
}

fn is_zero_length(value: &str) -> bool {
    let number = value
        .trim()
        .trim_end_matches("!important")
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%');
    number.parse::<f64>().is_ok_and(|n| n == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(html: &'a Html, css: &str) -> DomElement<'a> {
        let selector = Selector::parse(css).unwrap();
        DomElement::new(html.select(&selector).next().unwrap())
    }

    #[test]
    fn test_attributes_and_text() {
        let html = Html::parse_document(
            r#"<body><button id="go" class="">Go <b>now</b></button></body>"#,
        );
        let button = first(&html, "button");
        assert_eq!(button.tag_name(), "button");
        assert_eq!(button.attr("id"), Some("go"));
        assert_eq!(button.attr("class"), None);
        assert!(button.has_attr("class"));
        assert_eq!(button.text_content(), "Go now");
    }

    #[test]
    fn test_input_type_defaults_to_text() {
        let html = Html::parse_document(r#"<body><input id="a"><input type="CHECKBOX"></body>"#);
        assert_eq!(first(&html, "#a").input_type(), "text");
        assert_eq!(first(&html, "input[type]").input_type(), "checkbox");
    }

    #[test]
    fn test_positions() {
        let html = Html::parse_document(
            r#"<body><div><span>a</span><p>b</p><span id="target">c</span></div></body>"#,
        );
        let target = first(&html, "#target");
        assert_eq!(target.child_position(), Some(3));
        assert_eq!(target.type_position(), 2);
        assert_eq!(target.parent().unwrap().tag_name(), "div");
    }

    #[test]
    fn test_root_has_no_child_position() {
        let html = Html::parse_document("<body></body>");
        let root = DomElement::new(html.root_element());
        assert_eq!(root.tag_name(), "html");
        assert!(root.child_position().is_none());
    }

    #[test]
    fn test_markup_visibility() {
        let html = Html::parse_document(
            r#"<body>
                <div style="display: none"><button id="inner">x</button></div>
                <button id="attr" hidden>x</button>
                <input id="secret" type="hidden">
                <button id="shown">x</button>
                <span id="empty" style="width:0px; height: 0">x</span>
            </body>"#,
        );
        assert!(first(&html, "#inner").is_hidden());
        assert!(first(&html, "#attr").is_hidden());
        assert!(first(&html, "#secret").is_hidden());
        assert!(first(&html, "body").is_hidden());
        assert!(!first(&html, "#shown").is_hidden());
        assert!(first(&html, "#empty").is_zero_size());
        assert!(!first(&html, "#shown").is_zero_size());
    }

    #[test]
    fn test_layout_override() {
        let html = Html::parse_document(r#"<body><button>x</button></body>"#);
        let layout = ElementLayout {
            tag: "button".to_string(),
            hidden: true,
            zero_size: true,
        };
        let button = first(&html, "button").with_layout(&layout);
        assert!(button.is_hidden());
        assert!(button.is_zero_size());
    }
}
