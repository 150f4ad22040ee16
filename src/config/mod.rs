pub mod toml_config;

use crate::adapters::http::{DEFAULT_COLUMN, DEFAULT_TABLE};
use crate::core::report::OUTPUT_FORMATS;
use crate::core::ConfigProvider;
use crate::utils::error::{LookupError, Result};
use crate::utils::validation::{
    validate_identifier, validate_non_empty_string, validate_one_of, validate_path,
    validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
use clap::Parser;

/// Fully resolved settings for one lookup run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LookupConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub table: String,
    pub column: String,
    pub timeout_seconds: Option<u64>,
    pub fixture: Option<String>,
    pub format: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            table: DEFAULT_TABLE.to_string(),
            column: DEFAULT_COLUMN.to_string(),
            timeout_seconds: None,
            fixture: None,
            format: "json".to_string(),
        }
    }
}

impl ConfigProvider for LookupConfig {
    fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn table(&self) -> &str {
        &self.table
    }

    fn column(&self) -> &str {
        &self.column
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

impl Validate for LookupConfig {
    fn validate(&self) -> Result<()> {
        match (&self.base_url, &self.fixture) {
            (None, None) => {
                return Err(LookupError::MissingConfigError {
                    field: "base_url (or fixture)".to_string(),
                })
            }
            (Some(url), _) => validate_url("base_url", url)?,
            (None, Some(_)) => {}
        }

        if let Some(path) = &self.fixture {
            validate_path("fixture", path)?;
        }

        if let Some(key) = &self.api_key {
            validate_non_empty_string("api_key", key)?;
        }

        validate_identifier("table", &self.table)?;
        validate_identifier("column", &self.column)?;

        if let Some(secs) = self.timeout_seconds {
            validate_range("timeout_seconds", secs, 1, 300)?;
        }

        validate_one_of("format", &self.format.to_ascii_lowercase(), &OUTPUT_FORMATS)?;

        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "filter-lookup")]
#[command(about = "Find water filters that remove a given contaminant")]
pub struct CliConfig {
    /// Contaminant identifier to look up
    #[arg(long, short = 'c', allow_negative_numbers = true)]
    pub contaminant: i64,

    /// TOML config file; flags below override its values
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, env = "FILTER_LOOKUP_BASE_URL")]
    pub base_url: Option<String>,

    #[arg(long, env = "FILTER_LOOKUP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub table: Option<String>,

    #[arg(long)]
    pub column: Option<String>,

    /// Read filters from a local JSON array instead of the backend.
    /// Relative to the working directory; a `fixture` set in the config
    /// file is relative to that file.
    #[arg(long)]
    pub fixture: Option<String>,

    /// Output format: json, csv or tsv
    #[arg(long)]
    pub format: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Exit with an error instead of printing an empty result when the lookup fails
    #[arg(long)]
    pub strict: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn to_lookup_config(&self) -> Result<LookupConfig> {
        let mut config = match &self.config {
            Some(path) => toml_config::TomlConfig::from_file(path)?.into(),
            None => LookupConfig::default(),
        };

        if let Some(base_url) = &self.base_url {
            config.base_url = Some(base_url.clone());
        }
        if let Some(api_key) = &self.api_key {
            config.api_key = Some(api_key.clone());
        }
        if let Some(table) = &self.table {
            config.table = table.clone();
        }
        if let Some(column) = &self.column {
            config.column = column.clone();
        }
        if let Some(fixture) = &self.fixture {
            config.fixture = Some(fixture.clone());
        }
        if let Some(format) = &self.format {
            config.format = format.clone();
        }
        if self.timeout_seconds.is_some() {
            config.timeout_seconds = self.timeout_seconds;
        }

        Ok(config)
    }
}
