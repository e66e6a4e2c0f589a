//! Builder API for loan policies.

use crate::core::{Catalog, LoanRecord, Roster};
use crate::enforcement::context::{BorrowRequest, ReturnRequest};
use crate::enforcement::rules::{check, BorrowCheck, LoanPolicy, ReturnCheck};
use crate::enforcement::violations::ValidationError;

/// Builder for [`LoanPolicy`].
///
/// Defaults: inspection acknowledgment required, roster enforced, empty
/// catalogs (any body part or unit accepted).
pub struct PolicyBuilder {
    require_inspection: bool,
    require_roster: bool,
    roster: Roster,
    catalog: Catalog,
    borrow_checks: Vec<BorrowCheck>,
    return_checks: Vec<ReturnCheck>,
}

impl PolicyBuilder {
    pub fn new() -> Self {
        Self {
            require_inspection: true,
            require_roster: true,
            roster: Roster::default(),
            catalog: Catalog::default(),
            borrow_checks: Vec::new(),
            return_checks: Vec::new(),
        }
    }

    pub fn require_inspection(mut self, required: bool) -> Self {
        self.require_inspection = required;
        self
    }

    pub fn require_roster(mut self, required: bool) -> Self {
        self.require_roster = required;
        self
    }

    pub fn roster(mut self, roster: Roster) -> Self {
        self.roster = roster;
        self
    }

    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Add a borrow predicate with an error message.
    pub fn require_borrow<F>(mut self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&BorrowRequest) -> bool + Send + Sync + 'static,
    {
        self.borrow_checks.push(Box::new(move |request: &BorrowRequest| {
            check(predicate(request), || ValidationError::Custom {
                message: error_msg.clone(),
            })
        }));
        self
    }

    /// Add a return predicate with an error message.
    pub fn require_return<F>(mut self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&ReturnRequest, &LoanRecord) -> bool + Send + Sync + 'static,
    {
        self.return_checks
            .push(Box::new(move |request: &ReturnRequest, open: &LoanRecord| {
                check(predicate(request, open), || ValidationError::Custom {
                    message: error_msg.clone(),
                })
            }));
        self
    }

    pub fn build(self) -> LoanPolicy {
        LoanPolicy {
            require_inspection: self.require_inspection,
            require_roster: self.require_roster,
            roster: self.roster,
            catalog: self.catalog,
            borrow_checks: self.borrow_checks,
            return_checks: self.return_checks,
        }
    }
}

impl Default for PolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
