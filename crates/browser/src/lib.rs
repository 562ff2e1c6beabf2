//! Browser automation capability for the RSVP E2E suite
//!
//! The suite never touches a browser API directly; it talks to the [`Page`]
//! trait, whose primitives (navigate, fill, click, select, wait-for,
//! read-text, screenshot) carry bounded waits. Two implementations:
//!
//! - [`playwright::PlaywrightPage`] — a persistent Node/Playwright sidecar
//!   controlled over a JSON line protocol, one live page per handle.
//! - [`fake::FakePage`] — a scripted in-memory page with configurable signal
//!   latencies, used by the suite's own tests.

pub mod error;
pub mod fake;
pub mod page;
pub mod playwright;
pub mod selector;

pub use error::{BrowserError, BrowserResult};
pub use page::{Page, WaitState};
pub use playwright::{Browser, PlaywrightConfig, PlaywrightPage};
pub use selector::Selector;
