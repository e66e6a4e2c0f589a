//! Borrow and return policy checks using Validation.

use crate::core::{is_unselected, Catalog, LoanRecord, Roster};
use crate::enforcement::context::{BorrowRequest, ReturnRequest};
use crate::enforcement::violations::ValidationError;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub type Checked = Validation<(), NonEmptyVec<ValidationError>>;

/// Extra borrow check supplied by the caller.
pub type BorrowCheck = Box<dyn Fn(&BorrowRequest) -> Checked + Send + Sync>;

/// Extra return check; sees the request and the loan being closed.
pub type ReturnCheck = Box<dyn Fn(&ReturnRequest, &LoanRecord) -> Checked + Send + Sync>;

/// Policy applied to borrow and return requests.
/// Every check runs, so a rejection lists all violations at once.
pub struct LoanPolicy {
    pub(crate) require_inspection: bool,
    pub(crate) require_roster: bool,
    pub(crate) roster: Roster,
    pub(crate) catalog: Catalog,
    pub(crate) borrow_checks: Vec<BorrowCheck>,
    pub(crate) return_checks: Vec<ReturnCheck>,
}

pub(crate) fn check<F>(ok: bool, error: F) -> Checked
where
    F: FnOnce() -> ValidationError,
{
    if ok {
        Validation::success(())
    } else {
        Validation::fail(error())
    }
}

impl LoanPolicy {
    /// Check a borrow request.
    pub fn enforce_borrow(&self, request: &BorrowRequest) -> Checked {
        let borrower = request.borrower.trim();
        let mut checks: Vec<Checked> = vec![
            check(!is_unselected(&request.location), || {
                ValidationError::MissingLocation
            }),
            check(!borrower.is_empty(), || ValidationError::MissingBorrower),
        ];

        if self.require_roster && !borrower.is_empty() {
            checks.push(check(self.roster.contains(request.role, borrower), || {
                ValidationError::UnknownBorrower {
                    role: request.role,
                    name: borrower.to_string(),
                }
            }));
        }

        checks.push(check(self.catalog.allows_body_part(&request.body_part), || {
            ValidationError::UnknownBodyPart(request.body_part.clone())
        }));

        if !is_unselected(&request.location) {
            checks.push(check(self.catalog.allows_location(&request.location), || {
                ValidationError::UnknownLocation(request.location.clone())
            }));
        }

        for check_fn in &self.borrow_checks {
            checks.push(check_fn(request));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Check a return request against the loan it closes.
    pub fn enforce_return(&self, request: &ReturnRequest, open: &LoanRecord) -> Checked {
        let mut checks: Vec<Checked> = Vec::new();

        if self.require_inspection {
            checks.push(check(request.inspected, || {
                ValidationError::InspectionNotConfirmed
            }));
        }

        if self.require_roster {
            if let Some(name) = request.override_name() {
                let known = name == open.borrower.trim() || self.roster.role_of(name).is_some();
                checks.push(check(known, || ValidationError::UnknownReturner {
                    name: name.to_string(),
                }));
            }
        }

        for check_fn in &self.return_checks {
            checks.push(check_fn(request, open));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn requires_inspection(&self) -> bool {
        self.require_inspection
    }
}

impl Default for LoanPolicy {
    fn default() -> Self {
        crate::enforcement::PolicyBuilder::new().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Role, Stamp, UNSELECTED_LOCATION};
    use crate::enforcement::builder::PolicyBuilder;

    fn roster() -> Roster {
        Roster {
            doctors: vec!["朱戈靖".to_string()],
            nurse_practitioners: vec!["王淑芬".to_string()],
        }
    }

    fn open_loan() -> LoanRecord {
        LoanRecord::open(
            Role::Doctor,
            "朱戈靖",
            Stamp::raw("2024-01-01 10:00:00"),
            "心臟 (Cardiac)",
            "6B",
        )
    }

    fn errors(result: Checked) -> Vec<ValidationError> {
        match result {
            Validation::Failure(errors) => errors.iter().cloned().collect(),
            Validation::Success(_) => Vec::new(),
        }
    }

    #[test]
    fn valid_borrow_passes() {
        let policy = PolicyBuilder::new().roster(roster()).build();
        let request = BorrowRequest::new(Role::Doctor, "朱戈靖", "心臟 (Cardiac)", "6B");
        assert!(policy.enforce_borrow(&request).is_success());
    }

    #[test]
    fn placeholder_location_is_rejected() {
        let policy = PolicyBuilder::new().roster(roster()).build();
        let request =
            BorrowRequest::new(Role::Doctor, "朱戈靖", "心臟 (Cardiac)", UNSELECTED_LOCATION);
        assert_eq!(
            errors(policy.enforce_borrow(&request)),
            vec![ValidationError::MissingLocation]
        );
    }

    #[test]
    fn borrow_accumulates_all_violations() {
        let policy = PolicyBuilder::new()
            .roster(roster())
            .catalog(Catalog {
                body_parts: vec!["心臟 (Cardiac)".to_string()],
                locations: vec!["6B".to_string()],
            })
            .require_borrow(|_| false, "ward is closed".to_string())
            .build();
        let request = BorrowRequest::new(Role::NursePractitioner, "朱戈靖", "膝蓋", "");

        let found = errors(policy.enforce_borrow(&request));
        assert_eq!(found.len(), 4);
        assert!(found.contains(&ValidationError::MissingLocation));
        assert!(found.contains(&ValidationError::UnknownBorrower {
            role: Role::NursePractitioner,
            name: "朱戈靖".to_string(),
        }));
        assert!(found.contains(&ValidationError::UnknownBodyPart("膝蓋".to_string())));
        assert!(found.contains(&ValidationError::Custom {
            message: "ward is closed".to_string(),
        }));
    }

    #[test]
    fn roster_check_can_be_disabled() {
        let policy = PolicyBuilder::new().require_roster(false).build();
        let request = BorrowRequest::new(Role::Doctor, "訪客", "心臟 (Cardiac)", "6B");
        assert!(policy.enforce_borrow(&request).is_success());
    }

    #[test]
    fn blank_borrower_is_missing_not_unknown() {
        let policy = PolicyBuilder::new().roster(roster()).build();
        let request = BorrowRequest::new(Role::Doctor, "  ", "心臟 (Cardiac)", "6B");
        assert_eq!(
            errors(policy.enforce_borrow(&request)),
            vec![ValidationError::MissingBorrower]
        );
    }

    #[test]
    fn return_requires_inspection_by_default() {
        let policy = PolicyBuilder::new().roster(roster()).build();
        let request = ReturnRequest::new(None, false);
        assert_eq!(
            errors(policy.enforce_return(&request, &open_loan())),
            vec![ValidationError::InspectionNotConfirmed]
        );
    }

    #[test]
    fn inspection_requirement_can_be_disabled() {
        let policy = PolicyBuilder::new()
            .roster(roster())
            .require_inspection(false)
            .build();
        let request = ReturnRequest::new(None, false);
        assert!(policy.enforce_return(&request, &open_loan()).is_success());
    }

    #[test]
    fn returner_override_must_be_known_staff() {
        let policy = PolicyBuilder::new().roster(roster()).build();

        let colleague = ReturnRequest::new(Some("王淑芬".to_string()), true);
        assert!(policy.enforce_return(&colleague, &open_loan()).is_success());

        let stranger = ReturnRequest::new(Some("訪客".to_string()), true);
        assert_eq!(
            errors(policy.enforce_return(&stranger, &open_loan())),
            vec![ValidationError::UnknownReturner {
                name: "訪客".to_string()
            }]
        );
    }

    #[test]
    fn custom_return_check_sees_open_loan() {
        let policy = PolicyBuilder::new()
            .require_roster(false)
            .require_return(
                |_req, open| open.location != "6B",
                "6B loans are returned by the charge nurse".to_string(),
            )
            .build();

        let result = policy.enforce_return(&ReturnRequest::new(None, true), &open_loan());
        assert!(result.is_failure());
    }
}
