//! loanbook CLI
//!
//! Front desk for the ward ultrasound ledger: check status, borrow, return,
//! and inspect history from the command line.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loanbook::config::{AppConfig, StoreBackend};
use loanbook::core::{EquipmentStatus, LoanRecord, Role, UNSELECTED_LOCATION};
use loanbook::enforcement::{BorrowRequest, ReturnRequest};
use loanbook::store::{CsvStore, MemoryStore, SheetStore, Store};
use loanbook::LoanDesk;

#[derive(Debug, Parser)]
#[command(name = "loanbook", version, about = "Ward ultrasound check-out ledger")]
struct Cli {
    /// Extra configuration file layered over config/default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show whether the equipment is available
    Status,
    /// Check the equipment out
    Borrow {
        #[arg(long)]
        role: Role,
        #[arg(long)]
        borrower: String,
        #[arg(long)]
        body_part: String,
        #[arg(long, default_value = UNSELECTED_LOCATION)]
        location: String,
    },
    /// Check the equipment back in
    Return {
        /// Defaults to the borrower
        #[arg(long)]
        returner: Option<String>,
        /// Confirm the transducer was inspected and cleaned
        #[arg(long)]
        inspected: bool,
    },
    /// List past loans, newest last
    History {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Usage totals per unit, body part and borrower
    Summary,
    /// List the staff allowed to borrow
    Roster,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_tracing(&config);

    let store: Box<dyn Store> = match config.store.backend {
        StoreBackend::Csv => Box::new(CsvStore::new(&config.store.csv.path)),
        StoreBackend::Sheets => Box::new(SheetStore::new(&config.store.sheets)?),
        StoreBackend::Memory => Box::new(MemoryStore::new()),
    };
    tracing::debug!(store = %store.describe(), "ledger store selected");

    let desk = LoanDesk::new(store, config.policy());

    match cli.command {
        Command::Status => {
            let status = desk.status().await?;
            emit(cli.json, &status, || describe_status(&status))?;
        }
        Command::Borrow {
            role,
            borrower,
            body_part,
            location,
        } => {
            let request = BorrowRequest::new(role, borrower, body_part, location);
            let record = desk.borrow(request).await?;
            emit(cli.json, &record, || {
                format!(
                    "Borrowed by {} ({}) at {} for {} -> {}",
                    record.borrower,
                    record.role,
                    record.borrowed_at,
                    record.body_part,
                    record.location
                )
            })?;
        }
        Command::Return {
            returner,
            inspected,
        } => {
            let receipt = desk.return_loan(ReturnRequest::new(returner, inspected)).await?;
            if let Some(anomaly) = &receipt.anomaly {
                eprintln!("warning: {anomaly}; duration recorded as 0 minutes");
            }
            let record = &receipt.record;
            emit(cli.json, record, || {
                format!(
                    "Returned by {} at {} after {} minutes",
                    record.returner.as_deref().unwrap_or(&record.borrower),
                    record
                        .returned_at
                        .as_ref()
                        .map(|s| s.as_str())
                        .unwrap_or_default(),
                    record.duration_minutes
                )
            })?;
        }
        Command::History { limit } => {
            let table = desk.table().await?;
            let records = table.records();
            let skip = limit.map_or(0, |n| records.len().saturating_sub(n));
            let records = &records[skip..];
            emit(cli.json, &records, || {
                records.iter().map(history_line).collect::<Vec<_>>().join("\n")
            })?;
        }
        Command::Summary => {
            let summary = desk.summary().await?;
            emit(cli.json, &summary, || {
                let mut lines = vec![
                    format!("status: {}", summary.status),
                    format!("loans: {} ({} returned)", summary.loans, summary.returned),
                    format!("total minutes: {}", summary.total_minutes),
                ];
                if let Some(avg) = summary.average_minutes {
                    lines.push(format!("average minutes: {avg}"));
                }
                for (location, count) in &summary.by_location {
                    lines.push(format!("  {location}: {count}"));
                }
                lines.join("\n")
            })?;
        }
        Command::Roster => {
            let roster = desk.policy().roster();
            emit(cli.json, roster, || {
                Role::ALL
                    .iter()
                    .map(|role| format!("{}: {}", role, roster.members(*role).join(", ")))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
    }

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("loanbook={}", config.logging.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn emit<T, F>(json: bool, value: &T, text: F) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn describe_status(status: &EquipmentStatus) -> String {
    match status {
        EquipmentStatus::Available => "available".to_string(),
        EquipmentStatus::InUse { loan } => format!(
            "in use by {} ({}) since {} at {}",
            loan.borrower, loan.role, loan.borrowed_at, loan.location
        ),
    }
}

fn history_line(record: &LoanRecord) -> String {
    format!(
        "{:<8} {:<19} {:<18} {:<10} {:<16} {} min",
        record.status,
        record.borrowed_at,
        record.borrower,
        record.location,
        record.body_part,
        record.duration_minutes
    )
}
