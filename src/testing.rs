use crate::core::{BrowserConfig, BrowserTrait, DocumentQuery};
use crate::dom::{ElementLayout, HtmlDocument, PageSnapshot, SNAPSHOT_SCRIPT};
use crate::errors::{LocatorError, Result};
use crate::locator::scan;
use crate::types::ScanRequest;
use async_trait::async_trait;
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::Mutex;

pub struct TestHelper;

impl TestHelper {
    /// Wrap `body` in a minimal page.
    pub fn page(body: &str) -> String {
        format!(
            "<html><head><title>Test</title></head><body>{}</body></html>",
            body
        )
    }

    pub fn document(body: &str) -> HtmlDocument {
        HtmlDocument::parse(&Self::page(body))
    }

    pub fn scan_page(body: &str, request: &ScanRequest) -> String {
        scan(&Self::document(body), request)
    }

    /// Output lines of a scan of `body`.
    pub fn statements(body: &str, request: &ScanRequest) -> Vec<String> {
        Self::scan_page(body, request)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// In-memory [`BrowserTrait`] serving one fixed page.
///
/// Understands the handful of scripts the session runs: `document.readyState`,
/// `document.title` and the snapshot script, whose layout is derived from the
/// markup.
pub struct StaticPageBrowser {
    html: String,
    ready_state: String,
    reachable: bool,
    launched: bool,
    current_url: Mutex<String>,
    visited: Mutex<Vec<String>>,
}

impl StaticPageBrowser {
    pub fn new(html: &str) -> Self {
        Self {
            html: html.to_string(),
            ready_state: "complete".to_string(),
            reachable: true,
            launched: false,
            current_url: Mutex::new("about:blank".to_string()),
            visited: Mutex::new(Vec::new()),
        }
    }

    pub fn with_ready_state(mut self, state: &str) -> Self {
        self.ready_state = state.to_string();
        self
    }

    /// Every navigation fails as if the host refused the connection.
    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().map(|v| v.clone()).unwrap_or_default()
    }

    fn url(&self) -> String {
        self.current_url
            .lock()
            .map(|url| url.clone())
            .unwrap_or_default()
    }

    fn title(&self) -> String {
        let html = Html::parse_document(&self.html);
        Selector::parse("title")
            .ok()
            .and_then(|selector| {
                html.select(&selector)
                    .next()
                    .map(|title| title.text().collect::<String>().trim().to_string())
            })
            .unwrap_or_default()
    }

    fn snapshot(&self) -> Result<Value> {
        let document = HtmlDocument::parse(&self.html);
        let layout = document
            .elements()
            .iter()
            .map(ElementLayout::from_markup)
            .collect();
        let snapshot =
            PageSnapshot::new(self.url(), self.title(), self.html.clone()).with_layout(layout);
        Ok(Value::String(serde_json::to_string(&snapshot)?))
    }
}

#[async_trait]
impl BrowserTrait for StaticPageBrowser {
    type TabHandle = ();

    async fn launch(&mut self, _config: &BrowserConfig) -> Result<()> {
        self.launched = true;
        Ok(())
    }

    async fn new_tab(&self) -> Result<Self::TabHandle> {
        Ok(())
    }

    async fn navigate(&self, _tab: &Self::TabHandle, url: &str) -> Result<()> {
        if !self.reachable {
            return Err(LocatorError::PageUnreachable(format!(
                "{}: connection refused",
                url
            )));
        }
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(url.to_string());
        }
        if let Ok(mut current) = self.current_url.lock() {
            *current = url.to_string();
        }
        Ok(())
    }

    async fn execute_script(&self, _tab: &Self::TabHandle, script: &str) -> Result<Value> {
        match script.trim() {
            "document.readyState" => Ok(Value::String(self.ready_state.clone())),
            "document.title" => Ok(Value::String(self.title())),
            s if s == SNAPSHOT_SCRIPT.trim() => self.snapshot(),
            other => Err(LocatorError::JavaScriptFailed(format!(
                "unsupported script: {}",
                other
            ))),
        }
    }

    async fn get_url(&self, _tab: &Self::TabHandle) -> Result<String> {
        Ok(self.url())
    }

    async fn get_title(&self, tab: &Self::TabHandle) -> Result<String> {
        let title = self.execute_script(tab, "document.title").await?;
        Ok(title.as_str().unwrap_or_default().to_string())
    }

    fn is_running(&self) -> bool {
        self.launched
    }

    async fn close(&mut self) -> Result<()> {
        self.launched = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_split_lines() {
        let lines = TestHelper::statements(
            r#"<input id="q"><button id="go">Go</button>"#,
            &ScanRequest::default(),
        );
        assert_eq!(
            lines,
            vec!["const qField = cy.get('#q');", "const goButton = cy.get('#go');"]
        );
    }

    #[test]
    fn test_static_browser_lifecycle() {
        let mut browser = StaticPageBrowser::new(&TestHelper::page("<a href='/'>Home</a>"));
        tokio_test::block_on(async {
            browser.launch(&BrowserConfig::default()).await.unwrap();
            assert!(browser.is_running());

            browser.navigate(&(), "https://example.com/").await.unwrap();
            assert_eq!(browser.get_title(&()).await.unwrap(), "Test");
            assert_eq!(browser.visited(), vec!["https://example.com/"]);

            let value = browser.execute_script(&(), SNAPSHOT_SCRIPT).await.unwrap();
            let snapshot = PageSnapshot::from_script_value(value).unwrap();
            assert_eq!(snapshot.url, "https://example.com/");
            assert_eq!(snapshot.element_count(), 5);
            assert!(HtmlDocument::from_snapshot(&snapshot).has_live_layout());

            assert!(browser.execute_script(&(), "window.alert(1)").await.is_err());
            browser.close().await.unwrap();
            assert!(!browser.is_running());
        });
    }
}
