//! Append-only loan history.
//!
//! The table is immutable: [`LoanTable::record`] and
//! [`LoanTable::close_open`] return a new table. Alongside the rows it keeps
//! an explicit slot for the open loan so status lookups never scan.

use super::record::LoanRecord;
use serde::{Deserialize, Serialize};

/// Ordered history of loan records, oldest first.
///
/// # Example
///
/// ```rust
/// use loanbook::core::{LoanRecord, LoanTable, Role, Stamp};
///
/// let table = LoanTable::new();
/// let table = table.record(LoanRecord::open(
///     Role::Doctor,
///     "朱戈靖",
///     Stamp::raw("2024-01-01 10:00:00"),
///     "心臟 (Cardiac)",
///     "6B",
/// ));
///
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.open_loan().map(|l| l.location.as_str()), Some("6B"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<LoanRecord>", into = "Vec<LoanRecord>")]
pub struct LoanTable {
    records: Vec<LoanRecord>,
    open: Option<usize>,
}

impl LoanTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from stored rows.
    ///
    /// Only the last row decides whether a loan is open; an older row still
    /// marked "borrowed" is history, not a second open loan.
    pub fn from_records(records: Vec<LoanRecord>) -> Self {
        let open = records
            .last()
            .filter(|r| r.is_open())
            .map(|_| records.len() - 1);
        Self { records, open }
    }

    /// Append a record, returning a new table.
    pub fn record(&self, record: LoanRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self::from_records(records)
    }

    /// Replace the open record with `update(open)`, returning a new table.
    ///
    /// Returns `None` when nothing is open.
    pub fn close_open<F>(&self, update: F) -> Option<Self>
    where
        F: FnOnce(&LoanRecord) -> LoanRecord,
    {
        let index = self.open?;
        let mut records = self.records.clone();
        records[index] = update(&records[index]);
        Some(Self::from_records(records))
    }

    pub fn open_loan(&self) -> Option<&LoanRecord> {
        self.open.map(|i| &self.records[i])
    }

    pub fn records(&self) -> &[LoanRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&LoanRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of recorded loan durations in minutes.
    pub fn total_minutes(&self) -> f64 {
        self.records.iter().map(|r| r.duration_minutes).sum()
    }
}

impl From<Vec<LoanRecord>> for LoanTable {
    fn from(records: Vec<LoanRecord>) -> Self {
        Self::from_records(records)
    }
}

impl From<LoanTable> for Vec<LoanRecord> {
    fn from(table: LoanTable) -> Self {
        table.records
    }
}
