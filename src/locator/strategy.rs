//! Selector strategies
//!
//! Each [`StrategyKey`] maps an element to an optional [`SelectorFragment`].
//! Strategies are pure; uniqueness is checked by the resolver.

use crate::dom::DomElement;
use crate::errors::LocatorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest text a contains-text fragment may carry.
pub const MAX_TEXT_LEN: usize = 50;

/// Tags whose text is a good primary locator.
const TEXT_TAGS: &[&str] = &["a", "button", "h1", "h2", "h3", "h4", "h5", "h6"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKey {
    #[serde(rename = "data-testid")]
    DataTestId,
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "placeholder")]
    Placeholder,
    #[serde(rename = "aria-label")]
    AriaLabel,
    #[serde(rename = "role")]
    Role,
    #[serde(rename = "for")]
    For,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "tag")]
    Tag,
    #[serde(rename = "nth-child")]
    NthChild,
}

impl StrategyKey {
    pub const ALL: [StrategyKey; 10] = [
        StrategyKey::DataTestId,
        StrategyKey::Id,
        StrategyKey::Name,
        StrategyKey::Placeholder,
        StrategyKey::AriaLabel,
        StrategyKey::Role,
        StrategyKey::For,
        StrategyKey::Text,
        StrategyKey::Tag,
        StrategyKey::NthChild,
    ];

    pub fn default_order() -> Vec<StrategyKey> {
        Self::ALL.to_vec()
    }

    pub fn key(&self) -> &'static str {
        match self {
            StrategyKey::DataTestId => "data-testid",
            StrategyKey::Id => "id",
            StrategyKey::Name => "name",
            StrategyKey::Placeholder => "placeholder",
            StrategyKey::AriaLabel => "aria-label",
            StrategyKey::Role => "role",
            StrategyKey::For => "for",
            StrategyKey::Text => "text",
            StrategyKey::Tag => "tag",
            StrategyKey::NthChild => "nth-child",
        }
    }

    /// Candidate fragment for `element`, if this strategy applies to it.
    pub fn evaluate(&self, element: &DomElement<'_>) -> Option<SelectorFragment> {
        match self {
            StrategyKey::Id => element
                .attr("id")
                .map(|id| SelectorFragment::Css(format!("#{}", css_escape(id)))),
            StrategyKey::DataTestId
            | StrategyKey::Name
            | StrategyKey::Placeholder
            | StrategyKey::AriaLabel
            | StrategyKey::Role
            | StrategyKey::For => {
                let attribute = self.key();
                element
                    .attr(attribute)
                    .map(|value| SelectorFragment::Css(attribute_selector(attribute, value)))
            }
            StrategyKey::Text => {
                let tag = element.tag_name();
                if !TEXT_TAGS.contains(&tag.as_str()) {
                    return None;
                }
                clean_text(element).map(|text| SelectorFragment::ContainsText { tag, text })
            }
            StrategyKey::Tag => Some(SelectorFragment::Css(element.tag_name())),
            StrategyKey::NthChild => element.child_position().map(|position| {
                SelectorFragment::Css(format!("{}:nth-child({})", element.tag_name(), position))
            }),
        }
    }
}

impl FromStr for StrategyKey {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LocatorError::unknown_key("strategy", s))
    }
}

impl fmt::Display for StrategyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A candidate locator string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorFragment {
    /// Evaluated as a CSS query.
    Css(String),
    /// Absolute path, evaluated as XPath.
    XPath(String),
    /// Resolved by the framework's runtime text search, never queried as CSS.
    ContainsText { tag: String, text: String },
}

impl fmt::Display for SelectorFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorFragment::Css(selector) => f.write_str(selector),
            SelectorFragment::XPath(path) => f.write_str(path),
            SelectorFragment::ContainsText { tag, text } => write!(
                f,
                "{}:contains(\"{}\")",
                tag,
                text.replace('\\', "\\\\").replace('"', "\\\"")
            ),
        }
    }
}

/// Trimmed text that is short, single-line and has at least one letter.
pub fn clean_text(element: &DomElement<'_>) -> Option<String> {
    let content = element.text_content();
    let text = content.trim();

    if text.is_empty() || text.chars().count() > MAX_TEXT_LEN {
        return None;
    }
    if text.contains('\n') || text.contains('\r') {
        return None;
    }
    if !text.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    Some(text.to_string())
}

/// `tag:nth-of-type(k)` among same-tag siblings; `None` for the root.
pub fn nth_of_type(element: &DomElement<'_>) -> Option<SelectorFragment> {
    element.parent()?;
    Some(SelectorFragment::Css(format!(
        "{}:nth-of-type({})",
        element.tag_name(),
        element.type_position()
    )))
}

/// Absolute XPath from the document root down to `element`.
pub fn absolute_xpath(element: &DomElement<'_>) -> SelectorFragment {
    let mut path = String::new();
    let mut current = Some(*element);

    while let Some(node) = current {
        path.insert_str(0, &format!("/{}[{}]", node.tag_name(), node.type_position()));
        current = node.parent();
    }

    SelectorFragment::XPath(path)
}

fn attribute_selector(attribute: &str, value: &str) -> String {
    format!("[{}=\"{}\"]", attribute, css_string(value))
}

// Body of a double-quoted CSS string.
fn css_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\a "),
            '\r' => escaped.push_str("\\d "),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape a value for use as a CSS identifier, following `CSS.escape`.
pub fn css_escape(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut escaped = String::with_capacity(s.len());

    for (index, &c) in chars.iter().enumerate() {
        let leading_digit = c.is_ascii_digit()
            && (index == 0 || (index == 1 && chars[0] == '-'));

        match c {
            '\0' => escaped.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => escaped.push_str(&format!("\\{:x} ", c as u32)),
            _ if leading_digit => escaped.push_str(&format!("\\{:x} ", c as u32)),
            '-' if index == 0 && chars.len() == 1 => escaped.push_str("\\-"),
            _ if c as u32 >= 0x80 || c == '-' || c == '_' || c.is_ascii_alphanumeric() => {
                escaped.push(c)
            }
            _ => {
                escaped.push('\\');
                escaped.push(c);
            }
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DocumentQuery;
    use crate::dom::HtmlDocument;

    fn with_element<F: FnOnce(&DomElement<'_>)>(body: &str, id_or_tag: &str, check: F) {
        let document = HtmlDocument::parse(&format!("<html><body>{}</body></html>", body));
        let elements = document.elements();
        let element = elements
            .iter()
            .find(|e| e.attr("id") == Some(id_or_tag) || e.tag_name() == id_or_tag)
            .expect("element present");
        check(element);
    }

    #[test]
    fn test_attribute_strategies() {
        with_element(
            r#"<input id="email" name="user[email]" data-testid="login-email" aria-label="Email" role="textbox">"#,
            "email",
            |e| {
                assert_eq!(StrategyKey::Id.evaluate(e), Some(SelectorFragment::Css("#email".into())));
                assert_eq!(
                    StrategyKey::DataTestId.evaluate(e).unwrap().to_string(),
                    r#"[data-testid="login-email"]"#
                );
                assert_eq!(
                    StrategyKey::Name.evaluate(e).unwrap().to_string(),
                    r#"[name="user[email]"]"#
                );
                assert_eq!(
                    StrategyKey::AriaLabel.evaluate(e).unwrap().to_string(),
                    r#"[aria-label="Email"]"#
                );
                assert_eq!(StrategyKey::Role.evaluate(e).unwrap().to_string(), r#"[role="textbox"]"#);
                assert_eq!(StrategyKey::For.evaluate(e), None);
            },
        );
    }

    #[test]
    fn test_quoted_attribute_values_stay_queryable() {
        let document = HtmlDocument::parse(
            r#"<html><body><input placeholder='Say "hi"'></body></html>"#,
        );
        let elements = document.elements();
        let input = elements.iter().find(|e| e.tag_name() == "input").unwrap();
        let fragment = StrategyKey::Placeholder.evaluate(input).unwrap();
        assert_eq!(fragment.to_string(), r#"[placeholder="Say \"hi\""]"#);
        assert!(document.is_unique(&fragment.to_string()));
    }

    #[test]
    fn test_text_strategy_only_for_clickables_and_headings() {
        with_element("<button>Submit Now</button>", "button", |e| {
            assert_eq!(
                StrategyKey::Text.evaluate(e),
                Some(SelectorFragment::ContainsText {
                    tag: "button".into(),
                    text: "Submit Now".into()
                })
            );
        });
        with_element("<label>Submit Now</label>", "label", |e| {
            assert_eq!(StrategyKey::Text.evaluate(e), None);
        });
    }

    #[test]
    fn test_clean_text_rules() {
        with_element("<button>  42 % </button>", "button", |e| assert_eq!(clean_text(e), None));
        with_element("<button>line one\nline two</button>", "button", |e| {
            assert_eq!(clean_text(e), None)
        });
        let long = "a".repeat(MAX_TEXT_LEN + 1);
        with_element(&format!("<button>{}</button>", long), "button", |e| {
            assert_eq!(clean_text(e), None)
        });
        with_element("<button>  OK </button>", "button", |e| {
            assert_eq!(clean_text(e).as_deref(), Some("OK"))
        });
    }

    #[test]
    fn test_structural_strategies() {
        with_element(
            r#"<ul><li>a</li><li id="second">b</li></ul>"#,
            "second",
            |e| {
                assert_eq!(StrategyKey::Tag.evaluate(e), Some(SelectorFragment::Css("li".into())));
                assert_eq!(
                    StrategyKey::NthChild.evaluate(e),
                    Some(SelectorFragment::Css("li:nth-child(2)".into()))
                );
                assert_eq!(nth_of_type(e), Some(SelectorFragment::Css("li:nth-of-type(2)".into())));
                assert_eq!(
                    absolute_xpath(e),
                    SelectorFragment::XPath("/html[1]/body[1]/ul[1]/li[2]".into())
                );
            },
        );
    }

    #[test]
    fn test_xpath_counts_only_same_tag_siblings() {
        with_element(
            r#"<div></div><p></p><div><span></span><a id="target">x</a></div>"#,
            "target",
            |e| {
                assert_eq!(absolute_xpath(e).to_string(), "/html[1]/body[1]/div[2]/a[1]");
            },
        );
    }

    #[test]
    fn test_contains_fragment_display() {
        let fragment = SelectorFragment::ContainsText {
            tag: "a".into(),
            text: r#"Say "hi""#.into(),
        };
        assert_eq!(fragment.to_string(), r#"a:contains("Say \"hi\"")"#);
    }

    #[test]
    fn test_css_escape() {
        assert_eq!(css_escape("email"), "email");
        assert_eq!(css_escape("user.name"), "user\\.name");
        assert_eq!(css_escape("1st"), "\\31 st");
        assert_eq!(css_escape("-"), "\\-");
        assert_eq!(css_escape("a b"), "a\\ b");
    }

    #[test]
    fn test_escaped_ids_are_queryable() {
        let document = HtmlDocument::parse(
            r#"<html><body><input id="user.name"><input id="1st"></body></html>"#,
        );
        assert!(document.is_unique(&format!("#{}", css_escape("user.name"))));
        assert!(document.is_unique(&format!("#{}", css_escape("1st"))));
    }

    #[test]
    fn test_strategy_keys_parse() {
        assert_eq!("data-testid".parse::<StrategyKey>().unwrap(), StrategyKey::DataTestId);
        assert_eq!("NTH-CHILD".parse::<StrategyKey>().unwrap(), StrategyKey::NthChild);
        assert!("class".parse::<StrategyKey>().is_err());
        let json = serde_json::to_string(&StrategyKey::AriaLabel).unwrap();
        assert_eq!(json, "\"aria-label\"");
    }
}
