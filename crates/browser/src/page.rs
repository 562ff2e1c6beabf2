//! The browser capability trait
//!
//! Everything the suite is allowed to do to the application goes through
//! [`Page`]. Interaction primitives auto-wait on their target (the driver
//! blocks until the element is actionable or the timeout expires), so
//! callers treat every method as a suspension point with a bounded wait.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BrowserResult;
use crate::selector::Selector;

/// Element state to wait for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

impl WaitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitState::Visible => "visible",
            WaitState::Hidden => "hidden",
            WaitState::Attached => "attached",
            WaitState::Detached => "detached",
        }
    }
}

/// Browser automation primitives.
///
/// Implemented by [`crate::playwright::PlaywrightPage`] for live runs and
/// [`crate::fake::FakePage`] for tests. All methods take `&self`; drivers
/// use interior mutability so one page can be threaded through a whole flow.
#[async_trait]
pub trait Page: Send + Sync {
    /// Navigate to an absolute URL and wait for the load to settle.
    async fn navigate(&self, url: &str) -> BrowserResult<()>;

    /// Wait for the current navigation to settle (network idle).
    async fn wait_for_load(&self) -> BrowserResult<()>;

    /// Replace the value of an input or textarea.
    async fn fill(&self, selector: &Selector, value: &str) -> BrowserResult<()>;

    /// Click an element, waiting up to `timeout_ms` for it to be actionable.
    async fn click(&self, selector: &Selector, timeout_ms: u64) -> BrowserResult<()>;

    /// Type text into an element key by key (triggers per-keystroke handlers).
    async fn type_text(&self, selector: &Selector, text: &str) -> BrowserResult<()>;

    /// Press a single key (e.g. "Enter", "Escape") on an element.
    async fn press(&self, selector: &Selector, key: &str) -> BrowserResult<()>;

    /// Select an option from a native `<select>` by its visible label.
    async fn select_option(&self, selector: &Selector, label: &str) -> BrowserResult<()>;

    /// Attach a local file to a file input.
    async fn set_input_files(&self, selector: &Selector, path: &Path) -> BrowserResult<()>;

    /// Wait until the element reaches `state`, up to `timeout_ms`.
    async fn wait_for(
        &self,
        selector: &Selector,
        state: WaitState,
        timeout_ms: u64,
    ) -> BrowserResult<()>;

    /// Whether the element is currently visible. Does not wait.
    async fn is_visible(&self, selector: &Selector) -> BrowserResult<bool>;

    /// The element's rendered text.
    async fn inner_text(&self, selector: &Selector) -> BrowserResult<String>;

    /// The page's current URL.
    async fn current_url(&self) -> BrowserResult<String>;

    /// Full HTML content of the page.
    async fn page_content(&self) -> BrowserResult<String>;

    /// Save a full-page screenshot to `path`.
    async fn screenshot(&self, path: &Path) -> BrowserResult<()>;
}
