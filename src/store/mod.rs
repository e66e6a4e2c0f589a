//! Persistence for the loan table.
//!
//! A store only knows two operations: read the whole table and overwrite the
//! whole table. Saves carry the [`Revision`] the caller loaded so a store can
//! refuse a write that would clobber someone else's change.

use crate::core::LoanTable;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

pub mod codec;
mod csv_file;
pub mod error;
mod memory;
mod sheets;

pub use csv_file::CsvStore;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use sheets::SheetStore;

/// Fingerprint of a table, compared before every save.
///
/// A borrow adds a row and a return closes the open row, so every legal
/// transition changes the revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Revision {
    pub rows: usize,
    pub open: bool,
}

impl Revision {
    pub const EMPTY: Revision = Revision {
        rows: 0,
        open: false,
    };

    pub fn of(table: &LoanTable) -> Self {
        Self {
            rows: table.len(),
            open: table.open_loan().is_some(),
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.open { "open" } else { "closed" };
        write!(f, "{} rows, {}", self.rows, state)
    }
}

/// A loaded table together with the revision it was read at.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub table: LoanTable,
    pub revision: Revision,
}

impl Snapshot {
    pub fn new(table: LoanTable) -> Self {
        let revision = Revision::of(&table);
        Self { table, revision }
    }
}

/// Whole-table persistence.
#[async_trait]
pub trait Store: Send + Sync {
    /// Read every record in insertion order.
    ///
    /// A store that was never written is initialized with the canonical
    /// header and returned empty. A store that exists but cannot be decoded
    /// is an error, never an empty table.
    async fn load(&self) -> Result<Snapshot, StoreError>;

    /// Overwrite the store with `table` if it is still at `expected`.
    async fn save(&self, table: &LoanTable, expected: Revision) -> Result<Revision, StoreError>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

#[async_trait]
impl<T: Store + ?Sized> Store for Arc<T> {
    async fn load(&self) -> Result<Snapshot, StoreError> {
        (**self).load().await
    }

    async fn save(&self, table: &LoanTable, expected: Revision) -> Result<Revision, StoreError> {
        (**self).save(table, expected).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[async_trait]
impl<T: Store + ?Sized> Store for Box<T> {
    async fn load(&self) -> Result<Snapshot, StoreError> {
        (**self).load().await
    }

    async fn save(&self, table: &LoanTable, expected: Revision) -> Result<Revision, StoreError> {
        (**self).save(table, expected).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

pub(crate) fn ensure_revision(expected: Revision, found: Revision) -> Result<(), StoreError> {
    if expected == found {
        Ok(())
    } else {
        tracing::warn!(%expected, %found, "ledger changed between load and save");
        Err(StoreError::Conflict { expected, found })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LoanRecord, Role, Stamp};

    #[test]
    fn revision_changes_on_borrow_and_return() {
        let empty = LoanTable::new();
        let borrowed = empty.record(LoanRecord::open(
            Role::Doctor,
            "朱戈靖",
            Stamp::raw("2024-01-01 10:00:00"),
            "心臟 (Cardiac)",
            "6B",
        ));
        let returned = borrowed
            .close_open(|r| r.close("朱戈靖", Stamp::raw("2024-01-01 10:15:30"), 15.5))
            .unwrap();

        assert_eq!(Revision::of(&empty), Revision::EMPTY);
        assert_eq!(Revision::of(&borrowed), Revision { rows: 1, open: true });
        assert_eq!(Revision::of(&returned), Revision { rows: 1, open: false });
    }

    #[test]
    fn ensure_revision_reports_conflict() {
        let found = Revision { rows: 2, open: true };
        let err = ensure_revision(Revision::EMPTY, found).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
        assert!(err.is_transient());
    }
}
