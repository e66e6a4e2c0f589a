//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions that decide whether a transition may
//! run from a given state. Each guard carries a short label used when a
//! blocked transition is reported.

use super::state::State;
use std::fmt;
use std::marker::PhantomData;

/// Pure predicate that determines if a transition can execute.
///
/// # Example
///
/// ```rust
/// use loanbook::core::{EquipmentStatus, Guard};
///
/// let available = Guard::new("equipment is available", |s: &EquipmentStatus| {
///     s.is_available()
/// });
///
/// assert!(available.check(&EquipmentStatus::Available));
/// assert_eq!(available.label(), "equipment is available");
/// ```
pub struct Guard<S: State> {
    label: &'static str,
    predicate: Box<dyn Fn(&S) -> bool + Send + Sync>,
    _phantom: PhantomData<S>,
}

impl<S: State> Guard<S> {
    /// Create a guard from a pure, thread-safe predicate.
    pub fn new<F>(label: &'static str, predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            label,
            predicate: Box::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// Check if the guard allows a transition from this state.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl<S: State> fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").field("label", &self.label).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::{LoanRecord, Role, Stamp};
    use crate::core::state::{EquipmentStatus, LoanStatus};

    fn in_use() -> EquipmentStatus {
        EquipmentStatus::InUse {
            loan: LoanRecord::open(
                Role::Doctor,
                "朱戈靖",
                Stamp::raw("2024-01-01 10:00:00"),
                "心臟 (Cardiac)",
                "6B",
            ),
        }
    }

    #[test]
    fn guard_allows_matching_states() {
        let guard = Guard::new("available", |s: &EquipmentStatus| s.is_available());

        assert!(guard.check(&EquipmentStatus::Available));
        assert!(!guard.check(&in_use()));
    }

    #[test]
    fn guard_can_inspect_state_payload() {
        let guard = Guard::new("out to 6B", |s: &EquipmentStatus| {
            s.open_loan().is_some_and(|l| l.location == "6B")
        });

        assert!(guard.check(&in_use()));
        assert!(!guard.check(&EquipmentStatus::Available));
    }

    #[test]
    fn guard_checks_non_final_record_states() {
        let guard = Guard::new("still open", |s: &LoanStatus| !s.is_final());

        assert!(guard.check(&LoanStatus::Borrowed));
        assert!(!guard.check(&LoanStatus::Returned));
    }

    #[test]
    fn guard_is_deterministic() {
        let state = in_use();
        let guard = Guard::new("in use", |s: &EquipmentStatus| !s.is_available());

        assert_eq!(guard.check(&state), guard.check(&state));
    }

    #[test]
    fn debug_shows_label() {
        let guard = Guard::new("available", |s: &EquipmentStatus| s.is_available());
        assert!(format!("{guard:?}").contains("available"));
    }
}
