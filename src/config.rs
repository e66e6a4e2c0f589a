//! Configuration management for loanbook

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::core::{Catalog, Roster};
use crate::enforcement::{LoanPolicy, PolicyBuilder};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Csv,
    Sheets,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CsvConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SheetsConfig {
    pub base_url: String,
    pub spreadsheet_id: String,
    pub worksheet: String,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub csv: CsvConfig,
    pub sheets: SheetsConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PolicyConfig {
    pub require_inspection: bool,
    pub require_roster: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub policy: PolicyConfig,
    pub roster: Roster,
    pub catalog: Catalog,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables.
    ///
    /// Layers, later wins: `config/default`, `config/{RUN_MODE}`, the
    /// explicit `file` if given, then `LOANBOOK__SECTION__KEY` variables.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        if let Some(file) = file {
            builder = builder.add_source(File::from(file).required(true));
        }

        let config = builder
            .add_source(environment())
            // Keep the spreadsheet token out of files
            .set_override_option(
                "store.sheets.access_token",
                env::var("SHEETS_ACCESS_TOKEN").ok(),
            )?
            .build()?;

        config.try_deserialize()
    }

    /// Policy described by the `policy`, `roster` and `catalog` sections.
    pub fn policy(&self) -> LoanPolicy {
        PolicyBuilder::new()
            .require_inspection(self.policy.require_inspection)
            .require_roster(self.policy.require_roster)
            .roster(self.roster.clone())
            .catalog(self.catalog.clone())
            .build()
    }
}

/// Keys whose environment values are comma-separated lists.
const LIST_KEYS: [&str; 4] = [
    "roster.doctors",
    "roster.nurse_practitioners",
    "catalog.body_parts",
    "catalog.locations",
];

/// `LOANBOOK__SECTION__KEY` variables; list keys take `a,b,c`.
fn environment() -> Environment {
    LIST_KEYS.iter().fold(
        Environment::with_prefix("LOANBOOK")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(","),
        |env, key| env.with_list_parse_key(key),
    )
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/ultrasound_loans.csv"),
        }
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sheets.googleapis.com".to_string(),
            spreadsheet_id: String::new(),
            worksheet: "loans".to_string(),
            access_token: None,
            timeout_secs: 10,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            require_inspection: true,
            require_roster: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
