//! The loan record: one borrow-to-return cycle of the equipment.

use super::state::LoanStatus;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Storage format for every timestamp in the ledger (civil time, no zone).
pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Borrower category.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Doctor,
    NursePractitioner,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Doctor, Role::NursePractitioner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doctor => "doctor",
            Self::NursePractitioner => "nurse-practitioner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("unknown role '{0}' (expected 'doctor' or 'nurse-practitioner')")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "doctor" => Ok(Self::Doctor),
            "nurse-practitioner" => Ok(Self::NursePractitioner),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Problems found in stored data that do not block a transition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DataError {
    #[error("cannot parse stored timestamp '{value}' in column {column}")]
    UnparseableTimestamp { column: &'static str, value: String },

    #[error("returned_at {returned_at} is earlier than borrowed_at {borrowed_at}")]
    NegativeDuration {
        borrowed_at: String,
        returned_at: String,
    },
}

/// A stored civil timestamp.
///
/// The text is kept exactly as persisted so that a malformed value written
/// by hand survives a load/save cycle untouched; it is only interpreted when
/// a duration has to be computed.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stamp(String);

impl Stamp {
    pub fn from_local(at: DateTime<FixedOffset>) -> Self {
        Self(at.format(STAMP_FORMAT).to_string())
    }

    /// Wrap stored text without validating it.
    pub fn raw(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn parse(&self, column: &'static str) -> Result<NaiveDateTime, DataError> {
        NaiveDateTime::parse_from_str(self.0.trim(), STAMP_FORMAT).map_err(|_| {
            DataError::UnparseableTimestamp {
                column,
                value: self.0.clone(),
            }
        })
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Elapsed minutes between two civil timestamps, rounded to one decimal.
pub fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    let seconds = to.signed_duration_since(from).num_seconds() as f64;
    (seconds / 60.0 * 10.0).round() / 10.0
}

/// One row of the ledger.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LoanRecord {
    pub status: LoanStatus,
    pub role: Role,
    pub borrower: String,
    pub borrowed_at: Stamp,
    pub body_part: String,
    pub location: String,
    pub returner: Option<String>,
    pub returned_at: Option<Stamp>,
    pub duration_minutes: f64,
}

impl LoanRecord {
    /// A freshly borrowed record.
    pub fn open(
        role: Role,
        borrower: impl Into<String>,
        borrowed_at: Stamp,
        body_part: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            status: LoanStatus::Borrowed,
            role,
            borrower: borrower.into(),
            borrowed_at,
            body_part: body_part.into(),
            location: location.into(),
            returner: None,
            returned_at: None,
            duration_minutes: 0.0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == LoanStatus::Borrowed
    }

    /// Close the record, returning the updated copy.
    pub fn close(&self, returner: impl Into<String>, returned_at: Stamp, minutes: f64) -> Self {
        Self {
            status: LoanStatus::Returned,
            returner: Some(returner.into()),
            returned_at: Some(returned_at),
            duration_minutes: minutes,
            ..self.clone()
        }
    }
}
