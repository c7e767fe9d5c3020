use crate::dom::ElementLayout;
use crate::errors::{LocatorError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Script run inside the page to capture markup plus per-element layout.
///
/// Layout entries follow `querySelectorAll('*')` order, which is the same
/// pre-order walk `HtmlDocument` uses after re-parsing the markup.
pub const SNAPSHOT_SCRIPT: &str = r#"
    (function() {
        const layout = Array.from(document.querySelectorAll('*')).map(el => ({
            tag: el.tagName.toLowerCase(),
            hidden: el.offsetParent === null,
            zero_size: el.offsetWidth === 0 && el.offsetHeight === 0
        }));
        return JSON.stringify({
            url: window.location.href,
            title: document.title,
            html: document.documentElement.outerHTML,
            layout: layout
        });
    })()
"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub html: String,
    #[serde(default)]
    pub layout: Vec<ElementLayout>,
    #[serde(default = "chrono::Utc::now")]
    pub captured_at: chrono::DateTime<chrono::Utc>,
}

impl PageSnapshot {
    pub fn new(url: String, title: String, html: String) -> Self {
        Self {
            url,
            title,
            html,
            layout: Vec::new(),
            captured_at: chrono::Utc::now(),
        }
    }

    pub fn with_layout(mut self, layout: Vec<ElementLayout>) -> Self {
        self.layout = layout;
        self
    }

    /// Decode the value returned by [`SNAPSHOT_SCRIPT`].
    pub fn from_script_value(value: Value) -> Result<Self> {
        match value {
            Value::String(json) => Ok(serde_json::from_str(&json)?),
            Value::Object(_) => Ok(serde_json::from_value(value)?),
            Value::Null => Err(LocatorError::SnapshotFailed(
                "snapshot script returned nothing".to_string(),
            )),
            other => Err(LocatorError::SnapshotFailed(format!(
                "unexpected snapshot value: {}",
                other
            ))),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn element_count(&self) -> usize {
        self.layout.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_stringified_script_result() {
        let payload = json!({
            "url": "https://example.com/",
            "title": "Example",
            "html": "<html><head></head><body></body></html>",
            "layout": [
                { "tag": "html", "hidden": true, "zero_size": false },
                { "tag": "head", "hidden": true, "zero_size": true },
                { "tag": "body", "hidden": true, "zero_size": false }
            ]
        });
        let snapshot = PageSnapshot::from_script_value(Value::String(payload.to_string())).unwrap();
        assert_eq!(snapshot.url, "https://example.com/");
        assert_eq!(snapshot.title, "Example");
        assert_eq!(snapshot.element_count(), 3);
        assert!(snapshot.layout[1].zero_size);
    }

    #[test]
    fn test_decodes_object_without_layout() {
        let snapshot = PageSnapshot::from_script_value(json!({
            "url": "about:blank",
            "html": "<html></html>"
        }))
        .unwrap();
        assert!(snapshot.layout.is_empty());
        assert!(snapshot.title.is_empty());
    }

    #[test]
    fn test_rejects_missing_result() {
        let err = PageSnapshot::from_script_value(Value::Null).unwrap_err();
        assert!(matches!(err, LocatorError::SnapshotFailed(_)));
        assert!(PageSnapshot::from_script_value(json!(42)).is_err());
    }
}
