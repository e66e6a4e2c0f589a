//! Store error types.

use super::Revision;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or saving the ledger.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem access failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding or decoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The spreadsheet API could not be reached
    #[error("spreadsheet request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The spreadsheet API answered with an error status
    #[error("spreadsheet API returned {status}: {body}")]
    Remote { status: u16, body: String },

    /// The store exists but its content does not match the ledger schema
    #[error("malformed ledger at row {row}: {reason}")]
    Malformed { row: usize, reason: String },

    /// Someone else wrote between our load and our save
    #[error("ledger changed since it was read (expected {expected}, found {found})")]
    Conflict { expected: Revision, found: Revision },

    /// The backing resource is switched off or unreachable
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Store settings are unusable
    #[error("invalid store configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures worth retrying without user action.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Http(_) | Self::Unavailable(_) | Self::Conflict { .. }
        ) || matches!(self, Self::Remote { status, .. } if *status >= 500 || *status == 429)
    }
}
