//! Browser driver abstraction used by the page objects
//!
//! Selectors use Playwright syntax (CSS plus `:has-text("...")`). Actions that
//! target a single element act on the first match.

use std::time::Duration;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::E2eResult;

/// Element state to wait for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

/// Page load milestone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Load,
    #[serde(rename = "domcontentloaded")]
    DomContentLoaded,
    #[default]
    NetworkIdle,
}

/// One live browser page
#[async_trait]
pub trait Driver: Send + Sync {
    /// Navigate to an absolute URL
    async fn goto(&self, url: &str) -> E2eResult<()>;

    async fn wait_for_load_state(&self, state: LoadState) -> E2eResult<()>;

    async fn wait_for_selector(&self, selector: &str, state: WaitState, timeout: Duration) -> E2eResult<()>;

    /// Wait until the page URL equals `url`
    async fn wait_for_url(&self, url: &str, timeout: Duration) -> E2eResult<()>;

    /// Current page URL
    async fn url(&self) -> E2eResult<String>;

    async fn fill(&self, selector: &str, value: &str) -> E2eResult<()>;

    async fn click(&self, selector: &str) -> E2eResult<()>;

    async fn select_option(&self, selector: &str, value: &str) -> E2eResult<()>;

    /// Number of elements matching `selector`
    async fn count(&self, selector: &str) -> E2eResult<usize>;

    /// Text content of the first match, `None` when nothing matches
    async fn text_content(&self, selector: &str) -> E2eResult<Option<String>>;

    /// Text content of every match, in document order
    async fn all_text_contents(&self, selector: &str) -> E2eResult<Vec<String>>;

    /// Whether the first match is visible; `false` when nothing matches
    async fn is_visible(&self, selector: &str) -> E2eResult<bool>;

    /// Tear down the page and its browser context
    async fn close(&self) -> E2eResult<()>;
}
