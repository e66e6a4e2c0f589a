//! Requests checked by the policy.

use crate::core::Role;
use serde::{Deserialize, Serialize};

/// Input collected for a borrow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BorrowRequest {
    pub role: Role,
    pub borrower: String,
    pub body_part: String,
    pub location: String,
}

impl BorrowRequest {
    pub fn new(
        role: Role,
        borrower: impl Into<String>,
        body_part: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            role,
            borrower: borrower.into(),
            body_part: body_part.into(),
            location: location.into(),
        }
    }
}

/// Input collected for a return.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnRequest {
    /// Who brought the equipment back; the borrower when unset or blank.
    pub returner: Option<String>,
    /// Acknowledgment that the transducer was inspected and cleaned.
    pub inspected: bool,
}

impl ReturnRequest {
    pub fn new(returner: Option<String>, inspected: bool) -> Self {
        Self {
            returner,
            inspected,
        }
    }

    /// The explicit returner, ignoring blank input.
    pub fn override_name(&self) -> Option<&str> {
        self.returner
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    /// Resolve the returner against the open loan's borrower.
    pub fn returner_or<'a>(&'a self, borrower: &'a str) -> &'a str {
        self.override_name().unwrap_or(borrower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returner_defaults_to_borrower() {
        assert_eq!(ReturnRequest::new(None, true).returner_or("朱戈靖"), "朱戈靖");
        assert_eq!(
            ReturnRequest::new(Some("  ".to_string()), true).returner_or("朱戈靖"),
            "朱戈靖"
        );
        assert_eq!(
            ReturnRequest::new(Some("王淑芬".to_string()), true).returner_or("朱戈靖"),
            "王淑芬"
        );
    }
}
