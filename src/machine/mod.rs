//! The loan state machine.
//!
//! Two transitions move the equipment between `available` and `in_use`:
//!
//! - **borrow** appends an open record (guard: available)
//! - **return** closes the open record in place (guard: in use)
//!
//! Both are pure functions over [`LoanTable`](crate::core::LoanTable); the
//! [`desk`](crate::desk) module wraps them with storage and serialization.

mod ledger;
mod transition;

pub use ledger::{borrow, current_status, return_loan};
pub use transition::{Action, BorrowReceipt, ReturnReceipt, TransitionError};
