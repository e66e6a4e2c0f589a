//! Validation-based policy for borrow and return requests.
//!
//! Checks are accumulated with Stillwater's `Validation` instead of stopping
//! at the first failure, so a rejected form reports every problem at once.
//!
//! # Example
//!
//! ```rust
//! use loanbook::core::{Role, Roster};
//! use loanbook::enforcement::{BorrowRequest, PolicyBuilder};
//!
//! let policy = PolicyBuilder::new()
//!     .roster(Roster {
//!         doctors: vec!["朱戈靖".to_string()],
//!         nurse_practitioners: vec![],
//!     })
//!     .require_inspection(true)
//!     .build();
//!
//! let request = BorrowRequest::new(Role::Doctor, "朱戈靖", "心臟 (Cardiac)", "6B");
//! assert!(policy.enforce_borrow(&request).is_success());
//! ```

pub mod builder;
pub mod context;
pub mod rules;
pub mod violations;

pub use builder::PolicyBuilder;
pub use context::{BorrowRequest, ReturnRequest};
pub use rules::{Checked, LoanPolicy};
pub use violations::{ValidationError, Violations};
