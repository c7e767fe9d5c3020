use crate::core::BrowserTrait;
use crate::errors::{LocatorError, Result};
use std::time::{Duration, Instant};
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct NavigationManager;

impl NavigationManager {
    /// Poll `document.readyState` until the page reports `complete`.
    /// Script failures while the page is still swapping documents are retried.
    pub async fn wait_for_ready_state<B: BrowserTrait>(
        browser: &B,
        tab: &B::TabHandle,
        timeout_ms: u64,
    ) -> Result<NavigationResult> {
        let start_time = Instant::now();
        let timeout = Duration::from_millis(timeout_ms);
        let mut last_state = String::new();

        while start_time.elapsed() < timeout {
            match browser.execute_script(tab, "document.readyState").await {
                Ok(state) => {
                    last_state = state.as_str().unwrap_or_default().to_string();
                    if last_state == "complete" {
                        return Ok(NavigationResult {
                            url: browser.get_url(tab).await?,
                            ready_state: last_state,
                            duration_ms: start_time.elapsed().as_millis() as u64,
                        });
                    }
                }
                Err(e) => debug!("readyState poll failed: {}", e),
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }

        Err(LocatorError::TimeoutError(format!(
            "page not ready after {}ms (readyState: {})",
            timeout_ms,
            if last_state.is_empty() { "unknown" } else { last_state.as_str() }
        )))
    }
}

#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub url: String,
    pub ready_state: String,
    pub duration_ms: u64,
}
