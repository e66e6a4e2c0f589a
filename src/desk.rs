//! The loan desk: the single access point that mutates the ledger.
//!
//! Every store access holds one async mutex. A mutation runs load →
//! transition → save under it, so two requests in this process can never
//! interleave their read-modify-write cycles. Reads take it too, since the
//! first load of a new store writes the header. Writers in other processes
//! are caught by the store's revision check and surface as a conflict.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::core::{Clock, EquipmentStatus, LoanRecord, LoanTable, State, SystemClock};
use crate::enforcement::{BorrowRequest, LoanPolicy, ReturnRequest};
use crate::error::Result;
use crate::machine::{self, ReturnReceipt};
use crate::store::Store;

pub struct LoanDesk<S: Store> {
    store: S,
    policy: LoanPolicy,
    clock: Arc<dyn Clock>,
    access: Mutex<()>,
}

impl<S: Store> LoanDesk<S> {
    pub fn new(store: S, policy: LoanPolicy) -> Self {
        Self {
            store,
            policy,
            clock: Arc::new(SystemClock),
            access: Mutex::new(()),
        }
    }

    /// Replace the wall clock, e.g. with a `FixedClock` in tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> &LoanPolicy {
        &self.policy
    }

    /// Full history, oldest first.
    pub async fn table(&self) -> Result<LoanTable> {
        let _access = self.access.lock().await;
        Ok(self.store.load().await?.table)
    }

    pub async fn status(&self) -> Result<EquipmentStatus> {
        Ok(machine::current_status(&self.table().await?))
    }

    /// Check the equipment out. Returns the new open record.
    pub async fn borrow(&self, request: BorrowRequest) -> Result<LoanRecord> {
        let _access = self.access.lock().await;
        let snapshot = self.store.load().await?;

        let receipt = match machine::borrow(
            &snapshot.table,
            &self.policy,
            &request,
            self.clock.as_ref(),
        ) {
            Ok(receipt) => receipt,
            Err(err) => {
                tracing::info!(borrower = %request.borrower, error = %err, "borrow refused");
                return Err(err.into());
            }
        };

        if let Err(err) = self.store.save(&receipt.table, snapshot.revision).await {
            tracing::error!(store = %self.store.describe(), error = %err, "borrow not persisted");
            return Err(err.into());
        }

        let record = receipt.record;
        tracing::info!(
            borrower = %record.borrower,
            role = %record.role,
            location = %record.location,
            borrowed_at = %record.borrowed_at,
            "equipment borrowed"
        );
        Ok(record)
    }

    /// Check the equipment back in.
    pub async fn return_loan(&self, request: ReturnRequest) -> Result<ReturnReceipt> {
        let _access = self.access.lock().await;
        let snapshot = self.store.load().await?;

        let receipt = match machine::return_loan(
            &snapshot.table,
            &self.policy,
            &request,
            self.clock.as_ref(),
        ) {
            Ok(receipt) => receipt,
            Err(err) => {
                tracing::info!(error = %err, "return refused");
                return Err(err.into());
            }
        };

        if let Some(anomaly) = &receipt.anomaly {
            tracing::warn!(
                borrower = %receipt.record.borrower,
                borrowed_at = %receipt.record.borrowed_at,
                %anomaly,
                "duration recorded as 0 minutes; flag row for audit"
            );
        }

        if let Err(err) = self.store.save(&receipt.table, snapshot.revision).await {
            tracing::error!(store = %self.store.describe(), error = %err, "return not persisted");
            return Err(err.into());
        }

        tracing::info!(
            borrower = %receipt.record.borrower,
            returner = receipt.record.returner.as_deref().unwrap_or_default(),
            minutes = receipt.record.duration_minutes,
            "equipment returned"
        );
        Ok(receipt)
    }

    pub async fn summary(&self) -> Result<UsageSummary> {
        Ok(UsageSummary::of(&self.table().await?))
    }
}

/// Usage figures over the whole history.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UsageSummary {
    pub status: String,
    pub loans: usize,
    pub returned: usize,
    pub total_minutes: f64,
    /// Mean duration of returned loans; `None` before the first return.
    pub average_minutes: Option<f64>,
    pub by_location: BTreeMap<String, usize>,
    pub by_body_part: BTreeMap<String, usize>,
    pub by_borrower: BTreeMap<String, usize>,
}

impl UsageSummary {
    pub fn of(table: &LoanTable) -> Self {
        let mut by_location = BTreeMap::new();
        let mut by_body_part = BTreeMap::new();
        let mut by_borrower = BTreeMap::new();
        for record in table.records() {
            *by_location.entry(record.location.clone()).or_insert(0) += 1;
            *by_body_part.entry(record.body_part.clone()).or_insert(0) += 1;
            *by_borrower.entry(record.borrower.clone()).or_insert(0) += 1;
        }

        let returned = table.records().iter().filter(|r| !r.is_open()).count();
        let total_minutes = table.total_minutes();
        let average_minutes =
            (returned > 0).then(|| (total_minutes / returned as f64 * 10.0).round() / 10.0);

        Self {
            status: machine::current_status(table).name().to_string(),
            loans: table.len(),
            returned,
            total_minutes,
            average_minutes,
            by_location,
            by_body_part,
            by_borrower,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Role, Stamp};

    fn closed(borrower: &str, location: &str, minutes: f64) -> LoanRecord {
        LoanRecord::open(
            Role::Doctor,
            borrower,
            Stamp::raw("2024-01-01 10:00:00"),
            "心臟 (Cardiac)",
            location,
        )
        .close(borrower, Stamp::raw("2024-01-01 11:00:00"), minutes)
    }

    #[test]
    fn summary_of_empty_table() {
        let summary = UsageSummary::of(&LoanTable::new());
        assert_eq!(summary.status, "available");
        assert_eq!(summary.loans, 0);
        assert_eq!(summary.average_minutes, None);
        assert!(summary.by_location.is_empty());
    }

    #[test]
    fn summary_counts_and_averages() {
        let table = LoanTable::from_records(vec![
            closed("朱戈靖", "6B", 10.0),
            closed("王淑芬", "ICU", 25.0),
            closed("朱戈靖", "6B", 12.5),
        ]);
        let summary = UsageSummary::of(&table);

        assert_eq!(summary.loans, 3);
        assert_eq!(summary.returned, 3);
        assert_eq!(summary.total_minutes, 47.5);
        assert_eq!(summary.average_minutes, Some(15.8));
        assert_eq!(summary.by_location.get("6B"), Some(&2));
        assert_eq!(summary.by_borrower.get("王淑芬"), Some(&1));
        assert_eq!(summary.by_body_part.get("心臟 (Cardiac)"), Some(&3));
    }
}
