//! Error types for loanbook

use thiserror::Error;

use crate::enforcement::Violations;
use crate::machine::{Action, TransitionError};
use crate::store::StoreError;

/// Main error type for desk operations.
///
/// No variant is fatal: a failed operation leaves the ledger unchanged and
/// can simply be retried.
#[derive(Error, Debug)]
pub enum Error {
    /// User-correctable input problems
    #[error("{action} rejected: {violations}")]
    Validation {
        action: Action,
        violations: Violations,
    },

    /// The requested transition does not apply to the current status
    #[error(transparent)]
    Transition(TransitionError),

    /// The store could not be read or written
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl Error {
    /// True when the user can fix the request and resubmit.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Transition(_))
    }
}

impl From<TransitionError> for Error {
    fn from(error: TransitionError) -> Self {
        match error {
            TransitionError::Rejected { action, violations } => {
                Self::Validation { action, violations }
            }
            other => Self::Transition(other),
        }
    }
}

/// Result type alias for desk operations
pub type Result<T> = std::result::Result<T, Error>;
