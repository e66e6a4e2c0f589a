//! State trait and the two state spaces of the loan ledger.
//!
//! A ledger has two views of "state": the per-record [`LoanStatus`] that is
//! persisted in the `status` column, and the derived [`EquipmentStatus`] of
//! the machine itself. Both implement [`State`] so guards can be written
//! against either.

use super::record::LoanRecord;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::str::FromStr;
use thiserror::Error;

/// Trait for state machine states.
///
/// All methods are pure - no side effects.
///
/// # Example
///
/// ```rust
/// use loanbook::core::{LoanStatus, State};
///
/// assert_eq!(LoanStatus::Borrowed.name(), "borrowed");
/// assert!(LoanStatus::Returned.is_final());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Name used for display, logging and persistence.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}

/// Lifecycle of a single loan record, as stored in the `status` column.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Borrowed,
    Returned,
}

impl State for LoanStatus {
    fn name(&self) -> &str {
        match self {
            Self::Borrowed => "borrowed",
            Self::Returned => "returned",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::Returned)
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("unknown loan status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for LoanStatus {
    type Err = UnknownStatus;

    /// Incidental whitespace around the stored value is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "borrowed" => Ok(Self::Borrowed),
            "returned" => Ok(Self::Returned),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Derived status of the tracked equipment.
///
/// `InUse` carries the open record so callers can show who has the machine
/// and where it went.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EquipmentStatus {
    Available,
    InUse { loan: LoanRecord },
}

impl EquipmentStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// The open loan, if the equipment is out.
    pub fn open_loan(&self) -> Option<&LoanRecord> {
        match self {
            Self::Available => None,
            Self::InUse { loan } => Some(loan),
        }
    }
}

impl State for EquipmentStatus {
    fn name(&self) -> &str {
        match self {
            Self::Available => "available",
            Self::InUse { .. } => "in_use",
        }
    }
}

impl fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
