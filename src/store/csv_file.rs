//! Ledger stored as a local CSV file.

use super::{codec, ensure_revision, Revision, Snapshot, Store, StoreError};
use crate::core::LoanTable;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// UTF-8 byte order mark, written so spreadsheet apps detect the encoding.
const BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSV file store.
///
/// Files are UTF-8 with a BOM. Writes go to a sibling `.tmp` file which is
/// then renamed over the ledger, so readers never see a half-written table.
#[derive(Clone, Debug)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when the file is missing or empty.
    async fn read(&self) -> Result<Option<LoanTable>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => parse(&bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    async fn write(&self, table: &LoanTable) -> Result<(), StoreError> {
        let bytes = render(table)?;
        self.create_parent().await?;

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), rows = table.len(), "ledger written");
        Ok(())
    }

    /// Write the header into a file that does not exist yet.
    ///
    /// The file is created exclusively, so a ledger written by someone else
    /// since our read is kept and returned instead. A file that exists but
    /// is empty is replaced through the normal write path.
    async fn initialize(&self) -> Result<LoanTable, StoreError> {
        let table = LoanTable::new();
        self.create_parent().await?;

        let created = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await;
        match created {
            Ok(mut file) => {
                let bytes = render(&table)?;
                file.write_all(&bytes)
                    .await
                    .map_err(|e| StoreError::io(&self.path, e))?;
                file.flush()
                    .await
                    .map_err(|e| StoreError::io(&self.path, e))?;
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if let Some(existing) = self.read().await? {
                    return Ok(existing);
                }
                self.write(&table).await?;
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        }

        tracing::info!(path = %self.path.display(), "initialized empty ledger");
        Ok(table)
    }

    async fn create_parent(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

fn parse(bytes: &[u8]) -> Result<Option<LoanTable>, StoreError> {
    let bytes = bytes.strip_prefix(BOM).unwrap_or(bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    codec::decode_table(rows)
}

fn render(table: &LoanTable) -> Result<Vec<u8>, StoreError> {
    let mut bytes = BOM.to_vec();
    {
        let mut writer = csv::Writer::from_writer(&mut bytes);
        for row in codec::encode_table(table) {
            writer.write_record(&row)?;
        }
        writer
            .flush()
            .map_err(|e| StoreError::io("<buffer>", e))?;
    }
    Ok(bytes)
}

#[async_trait]
impl Store for CsvStore {
    async fn load(&self) -> Result<Snapshot, StoreError> {
        let table = match self.read().await? {
            Some(table) => table,
            None => self.initialize().await?,
        };
        Ok(Snapshot::new(table))
    }

    async fn save(&self, table: &LoanTable, expected: Revision) -> Result<Revision, StoreError> {
        let found = self
            .read()
            .await?
            .map(|t| Revision::of(&t))
            .unwrap_or(Revision::EMPTY);
        ensure_revision(expected, found)?;

        self.write(table).await?;
        Ok(Revision::of(table))
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}
