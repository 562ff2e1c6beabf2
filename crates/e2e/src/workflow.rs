//! Bulk Record Submission Workflow
//!
//! The loop at the center of the suite: authenticate once, then per fixture
//! row — position the browser, rewrite uniqueness-sensitive fields, drive
//! the creation form, classify the outcome. A failing record aborts only its
//! own remaining steps; the loop continues with the next record to maximize
//! fixture coverage per run.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use rsvp_browser::Page;

use crate::config::{AmbiguousPolicy, SuiteConfig};
use crate::error::SuiteResult;
use crate::fixture::RecordSource;
use crate::form::FormDriver;
use crate::profile::FormPlan;
use crate::reconcile::SubmissionOutcome;
use crate::record::{Domain, DomainRecord};
use crate::session::Session;
use crate::unique::UniqueStamper;

/// Result of one record-submission attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordReport {
    pub index: usize,
    pub display_name: String,
    pub passed: bool,
    pub warned: bool,
    pub duration_ms: u64,
    pub outcome: Option<SubmissionOutcome>,
    pub error: Option<String>,
    pub last_url: Option<String>,
    pub screenshot: Option<PathBuf>,
}

/// Aggregate of one fixture run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub domain: String,
    pub fixture: String,
    pub total: usize,
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub records: Vec<RecordReport>,
}

impl RunReport {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Write the report as pretty JSON into `dir`.
    pub fn write_json(&self, dir: &Path) -> SuiteResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("run-report-{}.json", self.domain));
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        info!("Report written to {}", path.display());
        Ok(path)
    }
}

/// Drives a whole fixture through one authenticated session.
pub struct BulkRunner<P: Page> {
    session: Session<P>,
    config: SuiteConfig,
    stamper: UniqueStamper,
}

impl<P: Page> BulkRunner<P> {
    pub fn new(session: Session<P>, config: SuiteConfig) -> Self {
        Self {
            session,
            config,
            stamper: UniqueStamper::new(),
        }
    }

    pub fn session(&self) -> &Session<P> {
        &self.session
    }

    /// Tear down the runner, returning the session.
    pub fn into_session(self) -> Session<P> {
        self.session
    }

    /// Submit every record in `fixture` through `plan`.
    ///
    /// Source-level failures (unreadable file, bad header) abort the run;
    /// per-record failures are recorded and the loop continues.
    pub async fn run(
        &mut self,
        domain: Domain,
        fixture: &Path,
        plan: &FormPlan,
    ) -> SuiteResult<RunReport> {
        let records = RecordSource::load(fixture, &domain.schema())?;
        let driver = FormDriver::new(plan.clone())?;

        let start = Instant::now();
        let mut reports = Vec::new();

        info!("Running {} fixture {}", domain, fixture.display());

        for (index, record) in records.enumerate() {
            let report = match record {
                Ok(record) => self.run_record(domain, &driver, index, record).await,
                Err(e) => {
                    // A malformed row fails that row only; later rows still
                    // get their shot.
                    error!("row {}: {}", index + 1, e);
                    RecordReport {
                        index,
                        display_name: format!("row {}", index + 1),
                        passed: false,
                        warned: false,
                        duration_ms: 0,
                        outcome: None,
                        error: Some(e.to_string()),
                        last_url: None,
                        screenshot: None,
                    }
                }
            };

            if report.passed {
                if report.warned {
                    warn!("~ {} (ambiguous, {} ms)", report.display_name, report.duration_ms);
                } else {
                    info!("✓ {} ({} ms)", report.display_name, report.duration_ms);
                }
            } else {
                error!(
                    "✗ {} - {}",
                    report.display_name,
                    report.error.as_deref().unwrap_or("unknown failure")
                );
            }
            reports.push(report);
        }

        let report = RunReport {
            domain: domain.to_string(),
            fixture: fixture.display().to_string(),
            total: reports.len(),
            passed: reports.iter().filter(|r| r.passed).count(),
            warned: reports.iter().filter(|r| r.warned).count(),
            failed: reports.iter().filter(|r| !r.passed).count(),
            duration_ms: start.elapsed().as_millis() as u64,
            records: reports,
        };

        info!(
            "{}: {} passed ({} ambiguous), {} failed ({} ms)",
            report.domain, report.passed, report.warned, report.failed, report.duration_ms
        );

        Ok(report)
    }

    /// One record, end to end. Never propagates record-level errors;
    /// failures come back inside the report.
    async fn run_record(
        &mut self,
        domain: Domain,
        driver: &FormDriver,
        index: usize,
        record: DomainRecord,
    ) -> RecordReport {
        let start = Instant::now();
        let record = self.stamper.make_unique(&record, domain.unique_fields());
        let display_name = record.get(domain.display_field()).to_string();

        let result = self.submit_positioned(domain, driver, &record).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(outcome) if outcome.is_accepted() => {
                let warned = matches!(outcome, SubmissionOutcome::AmbiguousSuccess)
                    && self.config.ambiguous_policy == AmbiguousPolicy::WarnedPass;
                RecordReport {
                    index,
                    display_name,
                    passed: true,
                    warned,
                    duration_ms,
                    outcome: Some(outcome),
                    error: None,
                    last_url: None,
                    screenshot: None,
                }
            }
            Ok(outcome) => {
                let reason = match &outcome {
                    SubmissionOutcome::Failure { reason } => reason.clone(),
                    _ => "unclassified outcome".to_string(),
                };
                let (last_url, screenshot) = self.capture_diagnostics(domain, index).await;
                RecordReport {
                    index,
                    display_name,
                    passed: false,
                    warned: false,
                    duration_ms,
                    outcome: Some(outcome),
                    error: Some(reason),
                    last_url,
                    screenshot,
                }
            }
            Err(e) => {
                let (last_url, screenshot) = self.capture_diagnostics(domain, index).await;
                RecordReport {
                    index,
                    display_name,
                    passed: false,
                    warned: false,
                    duration_ms,
                    outcome: None,
                    error: Some(e.to_string()),
                    last_url,
                    screenshot,
                }
            }
        }
    }

    /// Position the browser for `record`, then drive the form.
    async fn submit_positioned(
        &mut self,
        domain: Domain,
        driver: &FormDriver,
        record: &DomainRecord,
    ) -> SuiteResult<SubmissionOutcome> {
        match domain {
            Domain::Clients | Domain::Events => {
                self.session.navigate_to_list(domain).await?;
            }
            Domain::SubEvents => {
                // Sub-events are created on their parent's detail page.
                self.session.navigate_to_list(Domain::Events).await?;
                self.session
                    .open_event_detail(record.get("parentEvent"))
                    .await?;
            }
        }

        let listed = record.get(domain.display_field()).to_string();
        driver
            .submit(self.session.page(), record, Some(&listed))
            .await
    }

    /// Upload a whole client CSV through the list view's Import dialog and
    /// wait for the bulk confirmation banner.
    ///
    /// The server parses the file itself here; no per-record form driving
    /// and no uniqueness rewriting happens on this path.
    pub async fn import_clients_csv(&mut self, csv: &Path) -> SuiteResult<()> {
        use crate::pages::clients;
        use rsvp_browser::WaitState;

        if !csv.is_file() {
            return Err(crate::error::SuiteError::SourceUnreadable {
                path: csv.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }

        self.session.navigate_to_list(Domain::Clients).await?;
        let page = self.session.page();
        page.click(&clients::import_button(), self.config.nav_timeout_ms).await?;
        page.set_input_files(&clients::import_file_input(), csv).await?;

        match page
            .wait_for(
                &clients::bulk_import_success(),
                WaitState::Visible,
                self.config.nav_timeout_ms,
            )
            .await
        {
            Ok(()) => {
                info!("Bulk import of {} confirmed", csv.display());
                Ok(())
            }
            Err(rsvp_browser::BrowserError::WaitTimeout { timeout_ms, .. }) => {
                Err(crate::error::SuiteError::ReconciliationTimeout {
                    waited_ms: timeout_ms,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort capture of the last known URL and a page screenshot.
    async fn capture_diagnostics(
        &self,
        domain: Domain,
        index: usize,
    ) -> (Option<String>, Option<PathBuf>) {
        let page = self.session.page();
        let last_url = page.current_url().await.ok();

        let dir = self.config.output_dir.join("screenshots");
        if std::fs::create_dir_all(&dir).is_err() {
            return (last_url, None);
        }
        let path = dir.join(format!("{}-record-{}.png", domain, index));
        let screenshot = match page.screenshot(&path).await {
            Ok(()) => Some(path),
            Err(e) => {
                warn!("Screenshot capture failed: {}", e);
                None
            }
        };
        (last_url, screenshot)
    }
}
