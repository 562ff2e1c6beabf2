//! Error types for the suite

use std::path::PathBuf;

use thiserror::Error;

use rsvp_browser::BrowserError;

#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("Fixture unreadable: {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Fixture malformed: {0}")]
    SourceMalformed(String),

    #[error("Invalid credentials for {username}")]
    InvalidCredentials { username: String },

    #[error("Navigation timed out: {target} never became ready")]
    NavigationTimeout { target: String },

    #[error("Creation form never opened: {form}")]
    FormNeverOpened { form: String },

    #[error("Form field not found: {field}")]
    FieldNotFound { field: String },

    #[error("Submit control missing")]
    SubmitControlMissing,

    #[error("no success signal and no redirect within {waited_ms}ms")]
    ReconciliationTimeout { waited_ms: u64 },

    #[error("Invalid URL pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("Profile error: {0}")]
    Profile(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SuiteResult<T> = Result<T, SuiteError>;
