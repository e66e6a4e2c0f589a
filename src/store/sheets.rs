//! Ledger stored in a single spreadsheet worksheet.
//!
//! Talks to the spreadsheet values REST API: one `GET` to read the sheet and
//! a `PUT` from `A1` to overwrite it. Leftover rows below the new table are
//! cleared afterwards. Credentials are a bearer token obtained outside this
//! crate.

use super::{codec, ensure_revision, Revision, Snapshot, Store, StoreError};
use crate::config::SheetsConfig;
use crate::core::LoanTable;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

fn cell_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Spreadsheet worksheet store.
#[derive(Clone, Debug)]
pub struct SheetStore {
    client: Client,
    base_url: Url,
    spreadsheet_id: String,
    worksheet: String,
    access_token: Option<String>,
}

impl SheetStore {
    pub fn new(config: &SheetsConfig) -> Result<Self, StoreError> {
        if config.spreadsheet_id.trim().is_empty() {
            return Err(StoreError::Config("sheets.spreadsheet_id is empty".to_string()));
        }
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| StoreError::Config(format!("sheets.base_url: {e}")))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            spreadsheet_id: config.spreadsheet_id.clone(),
            worksheet: config.worksheet.clone(),
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// A1 range for the worksheet, optionally anchored at a cell.
    fn range(&self, cell: Option<&str>) -> String {
        let sheet = format!("'{}'", self.worksheet.replace('\'', "''"));
        match cell {
            Some(cell) => format!("{sheet}!{cell}"),
            None => sheet,
        }
    }

    fn values_url(&self, range: &str) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Config("sheets.base_url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn checked(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(StoreError::Remote {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Decoded table plus the number of rows the worksheet currently holds.
    async fn read(&self) -> Result<(Option<LoanTable>, usize), StoreError> {
        let url = self.values_url(&self.range(None))?;
        let response = self.authorize(self.client.get(url)).send().await?;
        let range: ValueRange = Self::checked(response).await?.json().await?;

        let rows: Vec<Vec<String>> = range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        let height = rows.len();
        Ok((codec::decode_table(rows)?, height))
    }

    /// Overwrite from A1, then blank any rows left below the new table.
    ///
    /// The update goes first: a failed request leaves the old rows in place
    /// rather than an emptied sheet.
    async fn write(&self, table: &LoanTable, previous_height: usize) -> Result<(), StoreError> {
        let rows = codec::encode_table(table);
        let height = rows.len();

        let mut update = self.values_url(&self.range(Some("A1")))?;
        update
            .query_pairs_mut()
            .append_pair("valueInputOption", "RAW");
        let body = json!({
            "majorDimension": "ROWS",
            "values": rows,
        });
        let response = self
            .authorize(self.client.put(update))
            .json(&body)
            .send()
            .await?;
        Self::checked(response).await?;

        if previous_height > height {
            let stale = format!("A{}:Z{}", height + 1, previous_height);
            let clear = self.values_url(&format!("{}:clear", self.range(Some(stale.as_str()))))?;
            let response = self
                .authorize(self.client.post(clear))
                .json(&json!({}))
                .send()
                .await?;
            Self::checked(response).await?;
        }

        tracing::debug!(worksheet = %self.worksheet, rows = table.len(), "worksheet written");
        Ok(())
    }
}

#[async_trait]
impl Store for SheetStore {
    async fn load(&self) -> Result<Snapshot, StoreError> {
        match self.read().await? {
            (Some(table), _) => Ok(Snapshot::new(table)),
            (None, _) => {
                // Only the header row is written, so rows another writer
                // appended in the meantime are left alone.
                let table = LoanTable::new();
                self.write(&table, 0).await?;
                tracing::info!(worksheet = %self.worksheet, "initialized empty worksheet");
                Ok(Snapshot::new(table))
            }
        }
    }

    async fn save(&self, table: &LoanTable, expected: Revision) -> Result<Revision, StoreError> {
        let (current, height) = self.read().await?;
        let found = current
            .as_ref()
            .map(Revision::of)
            .unwrap_or(Revision::EMPTY);
        ensure_revision(expected, found)?;

        self.write(table, height).await?;
        Ok(Revision::of(table))
    }

    fn describe(&self) -> String {
        format!("sheets:{}/{}", self.spreadsheet_id, self.worksheet)
    }
}
