//! Property-based tests for ledger transitions and persistence.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use loanbook::core::{DataError, FixedClock, LoanRecord, LoanTable, Role, Stamp, State, STAMP_FORMAT};
use loanbook::enforcement::{BorrowRequest, LoanPolicy, PolicyBuilder, ReturnRequest};
use loanbook::machine::{borrow, current_status, return_loan, TransitionError};
use loanbook::store::{CsvStore, MemoryStore, Revision, Store};
use loanbook::EquipmentStatus;
use proptest::prelude::*;

fn open_policy() -> LoanPolicy {
    PolicyBuilder::new().require_roster(false).build()
}

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap()
}

fn stamp_after(seconds: i64) -> String {
    (base_time() + Duration::seconds(seconds))
        .format(STAMP_FORMAT)
        .to_string()
}

prop_compose! {
    fn arbitrary_role()(doctor in any::<bool>()) -> Role {
        if doctor { Role::Doctor } else { Role::NursePractitioner }
    }
}

prop_compose! {
    fn arbitrary_text()(text in "[\\p{Han}A-Za-z0-9(),\"]{1,12}") -> String {
        text
    }
}

prop_compose! {
    fn arbitrary_closed()(
        role in arbitrary_role(),
        borrower in arbitrary_text(),
        body_part in arbitrary_text(),
        location in arbitrary_text(),
        start in 0i64..10_000_000,
        tenths in 0u32..100_000,
    ) -> LoanRecord {
        LoanRecord::open(role, borrower.clone(), Stamp::raw(stamp_after(start)), body_part, location)
            .close(borrower, Stamp::raw(stamp_after(start + 60)), f64::from(tenths) / 10.0)
    }
}

prop_compose! {
    fn arbitrary_table()(
        closed in prop::collection::vec(arbitrary_closed(), 0..6),
        open in prop::option::of((arbitrary_role(), arbitrary_text(), arbitrary_text())),
    ) -> LoanTable {
        let mut records = closed;
        if let Some((role, borrower, location)) = open {
            records.push(LoanRecord::open(
                role,
                borrower,
                Stamp::raw("2024-06-01 12:00:00"),
                "心臟 (Cardiac)",
                location,
            ));
        }
        LoanTable::from_records(records)
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn status_follows_last_row(table in arbitrary_table()) {
        let status = current_status(&table);
        let last_open = table.last().map(|r| r.is_open()).unwrap_or(false);
        prop_assert_eq!(status.name(), if last_open { "in_use" } else { "available" });
        prop_assert_eq!(status.open_loan(), table.last().filter(|r| r.is_open()));
    }

    #[test]
    fn borrow_opens_exactly_one_new_row(
        role in arbitrary_role(),
        borrower in arbitrary_text(),
        location in arbitrary_text(),
        seconds in 0i64..100_000_000,
    ) {
        let table = LoanTable::new();
        let clock = FixedClock::at(&stamp_after(seconds)).unwrap();
        let request = BorrowRequest::new(role, borrower.clone(), "腹部 (Abdomen)", location.clone());

        let next = borrow(&table, &open_policy(), &request, &clock).unwrap().table;

        prop_assert_eq!(next.len(), 1);
        prop_assert!(table.is_empty());
        let status = current_status(&next);
        let loan = status.open_loan().unwrap();
        prop_assert_eq!(&loan.borrower, &borrower);
        prop_assert_eq!(&loan.location, &location);
        prop_assert_eq!(loan.borrowed_at.as_str(), stamp_after(seconds));
    }

    #[test]
    fn return_makes_equipment_available(
        borrower in arbitrary_text(),
        start in 0i64..100_000_000,
        elapsed in 0i64..(30 * 24 * 3600),
    ) {
        let clock = FixedClock::at(&stamp_after(start)).unwrap();
        let request = BorrowRequest::new(Role::Doctor, borrower.clone(), "肺部 (Lung)", "ICU");
        let table = borrow(&LoanTable::new(), &open_policy(), &request, &clock).unwrap().table;

        clock.set(&stamp_after(start + elapsed)).unwrap();
        let receipt = return_loan(&table, &open_policy(), &ReturnRequest::new(None, true), &clock).unwrap();

        prop_assert_eq!(current_status(&receipt.table), EquipmentStatus::Available);
        prop_assert_eq!(receipt.table.len(), 1);
        prop_assert!(receipt.anomaly.is_none());
        prop_assert_eq!(receipt.record.returner.as_deref(), Some(borrower.as_str()));

        let expected = (elapsed as f64 / 60.0 * 10.0).round() / 10.0;
        prop_assert_eq!(receipt.record.duration_minutes, expected);
        prop_assert!(receipt.record.duration_minutes >= 0.0);
    }

    #[test]
    fn return_before_borrow_records_zero_with_anomaly(
        start in 600i64..100_000_000,
        skew in 1i64..600,
    ) {
        let clock = FixedClock::at(&stamp_after(start)).unwrap();
        let request = BorrowRequest::new(Role::Doctor, "朱戈靖", "肺部 (Lung)", "ICU");
        let table = borrow(&LoanTable::new(), &open_policy(), &request, &clock).unwrap().table;

        clock.set(&stamp_after(start - skew)).unwrap();
        let receipt = return_loan(&table, &open_policy(), &ReturnRequest::new(None, true), &clock).unwrap();

        prop_assert_eq!(receipt.record.duration_minutes.to_string(), "0");
        let negative = matches!(receipt.anomaly, Some(DataError::NegativeDuration { .. }));
        prop_assert!(negative);
    }

    #[test]
    fn placeholder_location_never_mutates(table in arbitrary_table(), borrower in arbitrary_text()) {
        prop_assume!(current_status(&table).is_available());
        let clock = FixedClock::at("2024-07-01 08:00:00").unwrap();
        let request = BorrowRequest::new(Role::Doctor, borrower, "心臟 (Cardiac)", "unselected");

        let result = borrow(&table, &open_policy(), &request, &clock);
        let rejected = matches!(result, Err(TransitionError::Rejected { .. }));
        prop_assert!(rejected);
    }

    #[test]
    fn uninspected_return_is_rejected(borrower in arbitrary_text()) {
        let clock = FixedClock::at("2024-07-01 08:00:00").unwrap();
        let request = BorrowRequest::new(Role::Doctor, borrower, "心臟 (Cardiac)", "6A");
        let table = borrow(&LoanTable::new(), &open_policy(), &request, &clock).unwrap().table;

        let result = return_loan(&table, &open_policy(), &ReturnRequest::new(None, false), &clock);
        let rejected = matches!(result, Err(TransitionError::Rejected { .. }));
        prop_assert!(rejected);
        let status = current_status(&table);
        prop_assert_eq!(status.name(), "in_use");
    }

    #[test]
    fn transitions_are_blocked_in_the_wrong_state(table in arbitrary_table()) {
        let clock = FixedClock::at("2024-07-01 08:00:00").unwrap();
        let policy = open_policy();

        if current_status(&table).is_available() {
            let result = return_loan(&table, &policy, &ReturnRequest::new(None, true), &clock);
            let blocked = matches!(result, Err(TransitionError::Blocked { .. }));
            prop_assert!(blocked);
        } else {
            let request = BorrowRequest::new(Role::Doctor, "陳柏宇", "心臟 (Cardiac)", "7A");
            let result = borrow(&table, &policy, &request, &clock);
            let blocked = matches!(result, Err(TransitionError::Blocked { .. }));
            prop_assert!(blocked);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn memory_store_round_trip(table in arbitrary_table()) {
        let loaded = runtime().block_on(async {
            let store = MemoryStore::new();
            store.save(&table, Revision::EMPTY).await.unwrap();
            store.load().await.unwrap()
        });
        prop_assert_eq!(current_status(&loaded.table), current_status(&table));
        prop_assert_eq!(loaded.revision, Revision::of(&table));
    }

    #[test]
    fn csv_store_round_trip(table in arbitrary_table()) {
        let dir = tempfile::TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("loans.csv"));
        let loaded = runtime().block_on(async {
            store.save(&table, Revision::EMPTY).await.unwrap();
            store.load().await.unwrap()
        });
        prop_assert_eq!(current_status(&loaded.table), current_status(&table));
        prop_assert_eq!(&loaded.table, &table);
    }
}
