//! The two ledger transitions and their errors.

use crate::core::{DataError, EquipmentStatus, Guard, LoanRecord, LoanTable};
use crate::enforcement::Violations;
use serde::Serialize;
use std::fmt;

/// A transition of the equipment status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Borrow,
    Return,
}

impl Action {
    /// Guard on the equipment status that must hold for this action.
    ///
    /// Borrowing needs the equipment free; returning needs an open loan.
    pub fn guard(&self) -> Guard<EquipmentStatus> {
        match self {
            Self::Borrow => Guard::new("equipment is available", |s: &EquipmentStatus| {
                s.is_available()
            }),
            Self::Return => Guard::new("equipment is in use", |s: &EquipmentStatus| {
                !s.is_available()
            }),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Borrow => f.write_str("borrow"),
            Self::Return => f.write_str("return"),
        }
    }
}

/// Errors that can occur during transitions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot {action} while equipment is {status}: requires {requires}")]
    Blocked {
        action: Action,
        status: String,
        requires: &'static str,
    },

    #[error("{action} rejected: {violations}")]
    Rejected {
        action: Action,
        violations: Violations,
    },
}

/// Result of a successful borrow.
#[derive(Clone, Debug, PartialEq)]
pub struct BorrowReceipt {
    pub table: LoanTable,
    /// The new open record.
    pub record: LoanRecord,
}

/// Result of a successful return.
#[derive(Clone, Debug, PartialEq)]
pub struct ReturnReceipt {
    pub table: LoanTable,
    /// The closed record as written.
    pub record: LoanRecord,
    /// Set when the duration could not be computed and was recorded as 0.
    pub anomaly: Option<DataError>,
}
