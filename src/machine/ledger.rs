//! Pure ledger transitions.
//!
//! These functions take a table and return a new one; they never touch the
//! store. Time comes from an injected [`Clock`].

use crate::core::{
    minutes_between, Clock, DataError, EquipmentStatus, LoanRecord, LoanTable, Stamp, State,
};
use crate::enforcement::{BorrowRequest, LoanPolicy, ReturnRequest};
use crate::machine::transition::{Action, BorrowReceipt, ReturnReceipt, TransitionError};
use stillwater::validation::Validation;

/// Derive the equipment status from the table.
pub fn current_status(table: &LoanTable) -> EquipmentStatus {
    match table.open_loan() {
        Some(loan) => EquipmentStatus::InUse { loan: loan.clone() },
        None => EquipmentStatus::Available,
    }
}

fn blocked(action: Action, status: &EquipmentStatus) -> TransitionError {
    TransitionError::Blocked {
        action,
        status: status.name().to_string(),
        requires: action.guard().label(),
    }
}

fn guard(action: Action, status: &EquipmentStatus) -> Result<(), TransitionError> {
    if action.guard().check(status) {
        Ok(())
    } else {
        Err(blocked(action, status))
    }
}

/// Append a new open loan.
pub fn borrow(
    table: &LoanTable,
    policy: &LoanPolicy,
    request: &BorrowRequest,
    clock: &dyn Clock,
) -> Result<BorrowReceipt, TransitionError> {
    guard(Action::Borrow, &current_status(table))?;

    if let Validation::Failure(errors) = policy.enforce_borrow(request) {
        return Err(TransitionError::Rejected {
            action: Action::Borrow,
            violations: errors.into(),
        });
    }

    let record = LoanRecord::open(
        request.role,
        request.borrower.trim(),
        Stamp::from_local(clock.now()),
        request.body_part.trim(),
        request.location.trim(),
    );
    Ok(BorrowReceipt {
        table: table.record(record.clone()),
        record,
    })
}

/// Close the open loan.
///
/// An unreadable `borrowed_at`, or a return stamped before the borrow,
/// records a zero duration and reports the problem in the receipt.
pub fn return_loan(
    table: &LoanTable,
    policy: &LoanPolicy,
    request: &ReturnRequest,
    clock: &dyn Clock,
) -> Result<ReturnReceipt, TransitionError> {
    let status = current_status(table);
    guard(Action::Return, &status)?;
    let Some(open) = status.open_loan() else {
        return Err(blocked(Action::Return, &status));
    };

    if let Validation::Failure(errors) = policy.enforce_return(request, open) {
        return Err(TransitionError::Rejected {
            action: Action::Return,
            violations: errors.into(),
        });
    }

    let now = clock.now();
    let returned_at = Stamp::from_local(now);
    let (minutes, anomaly) = match open.borrowed_at.parse("borrowed_at") {
        Ok(borrowed) if now.naive_local() < borrowed => {
            let anomaly = DataError::NegativeDuration {
                borrowed_at: open.borrowed_at.to_string(),
                returned_at: returned_at.to_string(),
            };
            (0.0, Some(anomaly))
        }
        Ok(borrowed) => (minutes_between(borrowed, now.naive_local()), None),
        Err(err) => (0.0, Some(err)),
    };

    let returner = request.returner_or(&open.borrower).to_string();
    let record = open.close(returner, returned_at, minutes);
    let table = table
        .close_open(|_| record.clone())
        .ok_or_else(|| blocked(Action::Return, &EquipmentStatus::Available))?;

    Ok(ReturnReceipt {
        table,
        record,
        anomaly,
    })
}
