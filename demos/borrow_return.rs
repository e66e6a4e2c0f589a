//! Borrow and Return
//!
//! This example walks one loan of the ward ultrasound through the desk.
//!
//! Key concepts:
//! - Validation collects every violation before anything is written
//! - Guards block a second borrow while the machine is in use
//! - Returns compute the duration from the stored borrow time
//! - An in-memory store and a fixed clock keep the run reproducible
//!
//! Run with: cargo run --example borrow_return

use std::sync::Arc;

use loanbook::core::{FixedClock, Roster, State};
use loanbook::enforcement::{BorrowRequest, PolicyBuilder, ReturnRequest};
use loanbook::store::MemoryStore;
use loanbook::{LoanDesk, Role};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("=== Ultrasound Loan Desk ===\n");

    let clock = Arc::new(FixedClock::at("2024-01-01 10:00:00")?);
    let policy = PolicyBuilder::new()
        .roster(Roster {
            doctors: vec!["朱戈靖".to_string()],
            nurse_practitioners: vec!["王淑芬".to_string()],
        })
        .build();
    let desk = LoanDesk::new(MemoryStore::new(), policy).with_clock(clock.clone());

    println!("Status: {}", desk.status().await?.name());

    // Unknown borrower and no unit picked: both are reported at once.
    let rejected = desk
        .borrow(BorrowRequest::new(Role::Doctor, "路人甲", "心臟 (Cardiac)", "unselected"))
        .await;
    if let Err(err) = rejected {
        println!("Rejected: {err}");
    }

    let loan = desk
        .borrow(BorrowRequest::new(Role::Doctor, "朱戈靖", "心臟 (Cardiac)", "6B"))
        .await?;
    println!(
        "Borrowed by {} at {} for {} in {}",
        loan.borrower, loan.borrowed_at, loan.body_part, loan.location
    );
    println!("Status: {}", desk.status().await?.name());

    let blocked = desk
        .borrow(BorrowRequest::new(Role::NursePractitioner, "王淑芬", "腹部 (Abdomen)", "ICU"))
        .await;
    if let Err(err) = blocked {
        println!("Blocked: {err}");
    }

    clock.set("2024-01-01 10:15:30")?;
    let receipt = desk.return_loan(ReturnRequest::new(None, true)).await?;
    println!(
        "Returned by {} after {} minutes",
        receipt.record.returner.as_deref().unwrap_or_default(),
        receipt.record.duration_minutes
    );

    let summary = desk.summary().await?;
    println!("\n=== Summary ===");
    println!("Status: {}", summary.status);
    println!("Loans: {} ({} returned)", summary.loans, summary.returned);
    println!("Total minutes: {}", summary.total_minutes);
    for (location, count) in &summary.by_location {
        println!("  {location}: {count}");
    }

    Ok(())
}
