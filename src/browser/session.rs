use crate::core::{BrowserConfig, BrowserTrait};
use crate::dom::{HtmlDocument, PageSnapshot, SNAPSHOT_SCRIPT};
use crate::errors::{LocatorError, Result};
use crate::locator::{collect_locators, scan, Locator};
use crate::types::ScanRequest;
use tracing::{info, warn};
use url::Url;

use super::navigation::{NavigationManager, NavigationResult};

/// One browser, one tab, scanned on demand.
pub struct LocatorSession<B: BrowserTrait> {
    browser: B,
    tab: B::TabHandle,
    config: BrowserConfig,
    session_id: String,
}

impl<B: BrowserTrait> LocatorSession<B> {
    pub async fn new(mut browser: B, config: BrowserConfig) -> Result<Self> {
        browser.launch(&config).await?;
        let tab = browser.new_tab().await?;
        let session_id = uuid::Uuid::new_v4().to_string();
        info!(session = %session_id, "Browser session started");

        Ok(Self {
            browser,
            tab,
            config,
            session_id,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    /// Navigate and wait for the document to finish loading.
    pub async fn open(&mut self, url: &str) -> Result<NavigationResult> {
        let parsed = Url::parse(url)?;

        if let Err(e) = self.browser.navigate(&self.tab, parsed.as_str()).await {
            warn!(session = %self.session_id, "Navigation to {} failed: {}", parsed, e);
            return Err(match e {
                LocatorError::PageUnreachable(reason) => LocatorError::PageUnreachable(reason),
                other => LocatorError::PageUnreachable(format!("{}: {}", parsed, other)),
            });
        }

        let result = NavigationManager::wait_for_ready_state(
            &self.browser,
            &self.tab,
            self.config.navigation_timeout_ms,
        )
        .await?;
        info!(
            session = %self.session_id,
            "Loaded {} in {}ms",
            result.url,
            result.duration_ms
        );
        Ok(result)
    }

    /// Markup plus live layout of the current page.
    pub async fn capture(&self) -> Result<PageSnapshot> {
        let value = self
            .browser
            .execute_script(&self.tab, SNAPSHOT_SCRIPT)
            .await?;
        let snapshot = PageSnapshot::from_script_value(value)?;
        info!(
            session = %self.session_id,
            "Captured {} ({} elements)",
            snapshot.url,
            snapshot.element_count()
        );
        Ok(snapshot)
    }

    pub async fn collect(&self, request: &ScanRequest) -> Result<Vec<Locator>> {
        let snapshot = self.capture().await?;
        let document = HtmlDocument::from_snapshot(&snapshot);
        Ok(collect_locators(&document, request))
    }

    /// Capture the current page and render its locators.
    pub async fn scan(&self, request: &ScanRequest) -> Result<String> {
        let snapshot = self.capture().await?;
        let document = HtmlDocument::from_snapshot(&snapshot);
        Ok(scan(&document, request))
    }

    pub async fn current_url(&self) -> Result<String> {
        self.browser.get_url(&self.tab).await
    }

    pub async fn title(&self) -> Result<String> {
        self.browser.get_title(&self.tab).await
    }

    pub async fn close(mut self) -> Result<()> {
        info!(session = %self.session_id, "Closing browser session");
        self.browser.close().await
    }
}

#[cfg(feature = "chrome")]
impl LocatorSession<super::ChromeBrowser> {
    /// Launch Chrome with `config`.
    pub async fn with_config(config: BrowserConfig) -> Result<Self> {
        Self::new(super::ChromeBrowser::new(), config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticPageBrowser;

    const PAGE: &str = r#"<html><head><title>Login</title></head><body>
        <input id="email" type="email">
        <button>Sign in</button>
    </body></html>"#;

    #[tokio::test]
    async fn test_open_capture_scan() {
        let mut session = LocatorSession::new(StaticPageBrowser::new(PAGE), BrowserConfig::default())
            .await
            .unwrap();
        let result = session.open("https://shop.test/login").await.unwrap();
        assert_eq!(result.url, "https://shop.test/login");
        assert_eq!(session.title().await.unwrap(), "Login");

        let output = session.scan(&ScanRequest::default()).await.unwrap();
        assert_eq!(
            output,
            "const emailField = cy.get('#email');\nconst signInButton = cy.contains(\"Sign in\");"
        );
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_navigation() {
        let mut session = LocatorSession::new(StaticPageBrowser::new(PAGE), BrowserConfig::default())
            .await
            .unwrap();
        let err = session.open("not a url").await.unwrap_err();
        assert!(matches!(err, LocatorError::InvalidUrl(_)));
        assert!(session.browser().visited().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_page() {
        let browser = StaticPageBrowser::new(PAGE).unreachable();
        let mut session = LocatorSession::new(browser, BrowserConfig::default())
            .await
            .unwrap();
        let err = session.open("https://down.test/").await.unwrap_err();
        assert!(matches!(err, LocatorError::PageUnreachable(_)));
        assert!(err.to_string().starts_with("Could not connect to the page"));
    }

    #[tokio::test]
    async fn test_sessions_have_distinct_ids() {
        let a = LocatorSession::new(StaticPageBrowser::new(PAGE), BrowserConfig::default())
            .await
            .unwrap();
        let b = LocatorSession::new(StaticPageBrowser::new(PAGE), BrowserConfig::default())
            .await
            .unwrap();
        assert_ne!(a.session_id(), b.session_id());
    }
}
