//! RSVP E2E Test Suite
//!
//! Browser-driven end-to-end tests for the RSVP event management platform:
//! login, client management, event and sub-event management, with
//! CSV-driven bulk form submission at the center.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Bulk Record Submission Workflow             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  BulkRunner                                                 │
//! │    ├── Session ── authenticate() / navigate_to_list()       │
//! │    ├── RecordSource ── load(fixture) -> DomainRecord…       │
//! │    ├── UniqueStamper ── make_unique(record, fields)         │
//! │    ├── FormDriver ── submit(page, plan, record)             │
//! │    │     └── widget dispatch: text | date | native select   │
//! │    │         | overlay option list | type-ahead filter      │
//! │    └── Reconciler ── toast vs. redirect vs. list membership │
//! ├─────────────────────────────────────────────────────────────┤
//! │  rsvp-browser::Page  (Playwright sidecar | scripted fake)   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every UI interaction is a suspension point with a bounded wait; a step
//! that exceeds its budget fails that record, and the workflow moves on to
//! the next one.

pub mod config;
pub mod error;
pub mod fixture;
pub mod form;
pub mod pages;
pub mod profile;
pub mod reconcile;
pub mod record;
pub mod session;
pub mod unique;
pub mod workflow;

pub use config::{AmbiguousPolicy, SuiteConfig};
pub use error::{SuiteError, SuiteResult};
pub use fixture::RecordSource;
pub use form::FormDriver;
pub use profile::{FieldBinding, FormPlan, ReconcileSignals, WidgetKind};
pub use reconcile::{Reconciler, SubmissionOutcome};
pub use record::{Domain, DomainRecord};
pub use session::{Credentials, Session};
pub use unique::UniqueStamper;
pub use workflow::{BulkRunner, RecordReport, RunReport};
