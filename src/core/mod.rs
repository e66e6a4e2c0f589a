//! Core ledger types and logic.
//!
//! This module contains the pure part of the ledger:
//! - the loan record, its roles and stored timestamps
//! - state definitions via the `State` trait and guard predicates
//! - the append-only loan table
//! - ward civil time, roster and catalogs
//!
//! Nothing in here performs I/O apart from reading the system clock.

mod clock;
mod guard;
mod history;
mod record;
mod roster;
mod state;

pub use clock::{now_local, ward_offset, Clock, FixedClock, SystemClock, WARD_OFFSET_SECONDS};
pub use guard::Guard;
pub use history::LoanTable;
pub use record::{
    minutes_between, DataError, LoanRecord, Role, Stamp, UnknownRole, STAMP_FORMAT,
};
pub use roster::{is_unselected, Catalog, Roster, UNSELECTED_LOCATION};
pub use state::{EquipmentStatus, LoanStatus, State, UnknownStatus};
