//! In-process store.

use super::{ensure_revision, Revision, Snapshot, Store, StoreError};
use crate::core::LoanTable;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Store kept in memory, used for tests and dry runs.
///
/// It can be switched to unreachable to exercise failure handling.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: Mutex<Option<LoanTable>>,
    unreachable: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    /// A store that was never initialized.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: LoanTable) -> Self {
        Self {
            table: Mutex::new(Some(table)),
            ..Self::default()
        }
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Current stored table, `None` before the first load or save.
    pub fn table(&self) -> Option<LoanTable> {
        self.slot().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<LoanTable>> {
        self.table.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn reachable(&self) -> Result<(), StoreError> {
        if self.unreachable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store switched off".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load(&self) -> Result<Snapshot, StoreError> {
        self.reachable()?;
        let mut slot = self.slot();
        let table = slot.get_or_insert_with(LoanTable::new).clone();
        Ok(Snapshot::new(table))
    }

    async fn save(&self, table: &LoanTable, expected: Revision) -> Result<Revision, StoreError> {
        self.reachable()?;
        let mut slot = self.slot();
        let found = slot.as_ref().map(Revision::of).unwrap_or(Revision::EMPTY);
        ensure_revision(expected, found)?;

        *slot = Some(table.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(Revision::of(table))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
