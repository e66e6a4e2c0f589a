//! Loanbook: check-out/check-in ledger for a shared ward ultrasound machine.
//!
//! The ledger follows a "pure core, imperative shell" layout. The core is a
//! two-state machine (`available` / `in_use`) over an append-only table of
//! loan records. The shell persists that table as a whole through a
//! [`Store`](store::Store) and serializes every mutation.
//!
//! # Modules
//!
//! - [`core`]: records, statuses, guards, the loan table, ward time
//! - [`enforcement`]: borrow/return policy with accumulated violations
//! - [`machine`]: pure `current_status`, `borrow`, `return_loan`
//! - [`store`]: CSV file, spreadsheet and in-memory backends
//! - [`desk`]: the serialized load → transition → save loop
//!
//! # Example
//!
//! ```rust
//! use loanbook::core::{FixedClock, LoanTable, Role, Roster, State};
//! use loanbook::enforcement::{BorrowRequest, PolicyBuilder, ReturnRequest};
//! use loanbook::machine::{borrow, current_status, return_loan};
//!
//! let policy = PolicyBuilder::new()
//!     .roster(Roster {
//!         doctors: vec!["朱戈靖".to_string()],
//!         nurse_practitioners: vec![],
//!     })
//!     .build();
//! let clock = FixedClock::at("2024-01-01 10:00:00").unwrap();
//!
//! let request = BorrowRequest::new(Role::Doctor, "朱戈靖", "心臟 (Cardiac)", "6B");
//! let table = borrow(&LoanTable::new(), &policy, &request, &clock).unwrap().table;
//! assert_eq!(current_status(&table).name(), "in_use");
//!
//! clock.set("2024-01-01 10:15:30").unwrap();
//! let receipt = return_loan(&table, &policy, &ReturnRequest::new(None, true), &clock).unwrap();
//! assert_eq!(receipt.record.duration_minutes, 15.5);
//! assert_eq!(current_status(&receipt.table).name(), "available");
//! ```

pub mod config;
pub mod core;
pub mod desk;
pub mod enforcement;
pub mod error;
pub mod machine;
pub mod store;

// Re-export commonly used types
pub use crate::core::{EquipmentStatus, LoanRecord, LoanTable, Role, State};
pub use desk::{LoanDesk, UsageSummary};
pub use error::{Error, Result};
