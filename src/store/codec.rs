//! Row codec shared by every table-shaped backend.
//!
//! The ledger is a header row followed by one row per loan, all cells text.
//! Row numbers in errors are 1-based and count the header, so they match
//! what a spreadsheet shows.

use super::StoreError;
use crate::core::{LoanRecord, LoanStatus, LoanTable, Role, Stamp, State};

/// Canonical column order.
pub const COLUMNS: [&str; 9] = [
    "status",
    "role",
    "borrower",
    "borrowed_at",
    "body_part",
    "location",
    "returner",
    "returned_at",
    "duration_minutes",
];

pub fn header() -> Vec<String> {
    COLUMNS.iter().map(|c| c.to_string()).collect()
}

pub fn encode(record: &LoanRecord) -> Vec<String> {
    vec![
        record.status.name().to_string(),
        record.role.as_str().to_string(),
        record.borrower.clone(),
        record.borrowed_at.as_str().to_string(),
        record.body_part.clone(),
        record.location.clone(),
        record.returner.clone().unwrap_or_default(),
        record
            .returned_at
            .as_ref()
            .map(|s| s.as_str().to_string())
            .unwrap_or_default(),
        record.duration_minutes.to_string(),
    ]
}

/// Header plus one row per record.
pub fn encode_table(table: &LoanTable) -> Vec<Vec<String>> {
    std::iter::once(header())
        .chain(table.records().iter().map(encode))
        .collect()
}

fn optional(cell: &str) -> Option<&str> {
    Some(cell.trim()).filter(|c| !c.is_empty())
}

/// Decode one data row. Short rows are padded with empty cells.
pub fn decode(row: usize, cells: &[String]) -> Result<LoanRecord, StoreError> {
    if cells.len() > COLUMNS.len() {
        return Err(StoreError::Malformed {
            row,
            reason: format!("expected {} cells, found {}", COLUMNS.len(), cells.len()),
        });
    }
    let cell = |i: usize| cells.get(i).map(String::as_str).unwrap_or("");
    let malformed = |reason: String| StoreError::Malformed { row, reason };

    let status: LoanStatus = cell(0).parse().map_err(|e| malformed(format!("{e}")))?;
    let role: Role = cell(1).parse().map_err(|e| malformed(format!("{e}")))?;
    let duration_minutes = match optional(cell(8)) {
        None => 0.0,
        Some(text) => match text.parse::<f64>() {
            Ok(minutes) if minutes.is_finite() && minutes >= 0.0 => minutes,
            _ => {
                return Err(malformed(format!(
                    "duration_minutes '{text}' is not a non-negative number"
                )))
            }
        },
    };

    Ok(LoanRecord {
        status,
        role,
        borrower: cell(2).trim().to_string(),
        borrowed_at: Stamp::raw(cell(3)),
        body_part: cell(4).trim().to_string(),
        location: cell(5).trim().to_string(),
        returner: optional(cell(6)).map(str::to_string),
        returned_at: optional(cell(7)).map(Stamp::raw),
        duration_minutes,
    })
}

/// Decode a whole table.
///
/// `Ok(None)` means the store was never initialized (no rows at all).
/// Any header other than the canonical one is malformed.
pub fn decode_table(rows: Vec<Vec<String>>) -> Result<Option<LoanTable>, StoreError> {
    let mut rows = rows.into_iter();
    let Some(head) = rows.next() else {
        return Ok(None);
    };

    let found: Vec<&str> = head.iter().map(|c| c.trim()).collect();
    if found != COLUMNS {
        return Err(StoreError::Malformed {
            row: 1,
            reason: format!("unexpected header [{}]", found.join(", ")),
        });
    }

    let mut records = Vec::new();
    for (i, cells) in rows.enumerate() {
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        records.push(decode(i + 2, &cells)?);
    }
    Ok(Some(LoanTable::from_records(records)))
}
