//! Error types for browser automation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Playwright not found. Install with: npx playwright install")]
    DriverNotFound,

    #[error("Browser driver exited unexpectedly: {0}")]
    DriverExited(String),

    #[error("Driver protocol error: {0}")]
    Protocol(String),

    #[error("Timed out after {timeout_ms}ms waiting for {selector}")]
    WaitTimeout { selector: String, timeout_ms: u64 },

    #[error("{action} failed on {selector}: {reason}")]
    ActionFailed {
        action: String,
        selector: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type BrowserResult<T> = Result<T, BrowserError>;
