//! Outcome Reconciler
//!
//! The target application's confirmation behavior is inconsistent across
//! releases: sometimes a success toast, sometimes a silent redirect to the
//! list or detail view. The reconciler races the weak signals under one
//! deadline instead of waiting the full budget for a toast that may never
//! come. Toast wins within a poll tick; a matching redirect or a visible
//! list entry without a toast is accepted as ambiguous; an unrelated page
//! is never treated as success.

use std::time::{Duration, Instant};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use rsvp_browser::{Page, Selector};

use crate::error::{SuiteError, SuiteResult};
use crate::profile::ReconcileSignals;

/// Terminal classification of one record-submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// Explicit confirmation was observed.
    Success { identifier: Option<String> },

    /// Redirected or listed, but no explicit confirmation. Server-side
    /// acceptance is implied.
    AmbiguousSuccess,

    Failure { reason: String },
}

impl SubmissionOutcome {
    /// Whether the backend accepted the record (explicitly or implicitly).
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            SubmissionOutcome::Success { .. } | SubmissionOutcome::AmbiguousSuccess
        )
    }
}

pub struct Reconciler {
    success: Selector,
    list_url: Regex,
    detail_url: Regex,
    timeout: Duration,
    poll_interval: Duration,
}

impl Reconciler {
    pub fn new(signals: &ReconcileSignals) -> SuiteResult<Self> {
        Ok(Self {
            success: Selector::text(signals.success_text.clone()),
            list_url: Regex::new(&signals.list_url_pattern)?,
            detail_url: Regex::new(&signals.detail_url_pattern)?,
            timeout: Duration::from_millis(signals.timeout_ms),
            poll_interval: Duration::from_millis(100),
        })
    }

    /// Classify the result of a submission that just happened.
    ///
    /// `submitted_from` is the URL captured immediately before the submit
    /// click: a URL signal only counts when the location actually changed,
    /// since the form may already live on a URL matching the list pattern
    /// (a modal on the list page) or the detail pattern (a sub-event form
    /// on its parent's detail page).
    ///
    /// `listed_text`, when given, is the created entity's display name; its
    /// appearance on the page counts as implicit acceptance (list
    /// membership), same tier as a redirect.
    pub async fn reconcile<P: Page + ?Sized>(
        &self,
        page: &P,
        submitted_from: &str,
        listed_text: Option<&str>,
    ) -> SuiteResult<SubmissionOutcome> {
        let start = Instant::now();
        let deadline = start + self.timeout;

        loop {
            // Explicit confirmation outranks everything else in a tick.
            if page.is_visible(&self.success).await? {
                let url = page.current_url().await?;
                let identifier = self
                    .detail_url
                    .captures(&url)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string());
                debug!("Success toast after {:?}", start.elapsed());
                return Ok(SubmissionOutcome::Success { identifier });
            }

            let url = page.current_url().await?;
            if url != submitted_from
                && (self.detail_url.is_match(&url) || self.list_url.is_match(&url))
            {
                debug!("Redirect to {} after {:?}", url, start.elapsed());
                return Ok(SubmissionOutcome::AmbiguousSuccess);
            }

            if let Some(text) = listed_text {
                if page.is_visible(&Selector::text(text)).await? {
                    debug!("{:?} listed after {:?}", text, start.elapsed());
                    return Ok(SubmissionOutcome::AmbiguousSuccess);
                }
            }

            let now = Instant::now();
            if now >= deadline {
                let waited_ms = self.timeout.as_millis() as u64;
                let reason = SuiteError::ReconciliationTimeout { waited_ms }.to_string();
                return Ok(SubmissionOutcome::Failure { reason });
            }
            // Never sleep past the deadline; the elapsed wait must equal
            // the configured timeout, not overshoot it by a poll interval.
            tokio::time::sleep(self.poll_interval.min(deadline - now)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(timeout_ms: u64) -> ReconcileSignals {
        ReconcileSignals {
            success_text: "Client added successfully".to_string(),
            list_url_pattern: "/clients(\\?|$)".to_string(),
            detail_url_pattern: "/clients/(\\d+)$".to_string(),
            timeout_ms,
        }
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let mut bad = signals(1000);
        bad.detail_url_pattern = "(".to_string();
        assert!(matches!(
            Reconciler::new(&bad).err(),
            Some(SuiteError::Pattern(_))
        ));
    }

    #[test]
    fn identifier_comes_from_detail_capture() {
        let reconciler = Reconciler::new(&signals(1000)).unwrap();
        let caps = reconciler
            .detail_url
            .captures("https://app.test/clients/42")
            .unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "42");
    }

    #[test]
    fn outcome_acceptance() {
        assert!(SubmissionOutcome::Success { identifier: None }.is_accepted());
        assert!(SubmissionOutcome::AmbiguousSuccess.is_accepted());
        assert!(!SubmissionOutcome::Failure { reason: "x".into() }.is_accepted());
    }
}
