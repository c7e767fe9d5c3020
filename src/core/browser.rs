use crate::core::config::BrowserConfig;
use crate::errors::Result;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait BrowserTrait: Send + Sync {
    type TabHandle: Send + Sync;

    /// Launch a new browser instance
    async fn launch(&mut self, config: &BrowserConfig) -> Result<()>;

    /// Create a new tab/page
    async fn new_tab(&self) -> Result<Self::TabHandle>;

    /// Navigate to a URL
    async fn navigate(&self, tab: &Self::TabHandle, url: &str) -> Result<()>;

    /// Execute JavaScript in the page and return its result
    async fn execute_script(&self, tab: &Self::TabHandle, script: &str) -> Result<Value>;

    async fn get_url(&self, tab: &Self::TabHandle) -> Result<String>;

    async fn get_title(&self, tab: &Self::TabHandle) -> Result<String>;

    fn is_running(&self) -> bool;

    /// Close the browser
    async fn close(&mut self) -> Result<()>;
}
