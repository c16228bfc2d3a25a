//! Settings for the transaction data access layer.
//!
//! Every key is optional; a missing key falls back to its default. Settings
//! are read from TOML through the `config` crate:
//!
//! ```toml
//! database = "bitcoin.db"
//! table = "UserTransactions"
//! dialect = "sqlite"
//! currency = "BTC"
//! annotation_precision = 8
//! pool_size = 4
//! ```

use std::path::Path;

use config::{Config, File, FileFormat};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::{LedgerlinkError, Result};

lazy_static! {
    // plain or dotted identifiers only, e.g. Bitcoin.dbo.UserTransactions
    static ref TABLE_NAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap();
}

/// How the row cap and the timestamp comparison are spelled.
///
/// Only [`Dialect::Sqlite`] can be executed: every [`ConnectionPool`](crate::pool::ConnectionPool)
/// hands out SQLite connections, so [`Settings::validate`] refuses `sqlserver`.
/// [`QueryBuilder`](crate::query::QueryBuilder) still renders its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `... LIMIT n` after the optional ORDER BY; `TxTime` is compared and
    /// ordered through `datetime()`.
    Sqlite,
    /// `SELECT TOP n ...`, `TxTime` used as stored.
    SqlServer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_dialect")]
    pub dialect: Dialect,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_annotation_precision")]
    pub annotation_precision: usize,
}

fn default_database() -> String { "transactions.db".to_string() }
fn default_pool_size() -> u32 { 4 }
fn default_table() -> String { "UserTransactions".to_string() }
fn default_dialect() -> Dialect { Dialect::Sqlite }
fn default_currency() -> String { "BTC".to_string() }
fn default_annotation_precision() -> usize { 8 }

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: default_database(),
            pool_size: default_pool_size(),
            table: default_table(),
            dialect: default_dialect(),
            currency: default_currency(),
            annotation_precision: default_annotation_precision(),
        }
    }
}

impl Settings {
    /// Reads settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(true))
            .build()?;
        Self::finish(config)
    }
    /// Reads settings from TOML text.
    pub fn parse(toml: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Self::finish(config)
    }
    fn finish(config: Config) -> Result<Self> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
    pub fn validate(&self) -> Result<()> {
        if !TABLE_NAME.is_match(&self.table) {
            return Err(LedgerlinkError::Config(format!(
                "'{}' is not a valid table identifier",
                self.table
            )));
        }
        if self.pool_size == 0 {
            return Err(LedgerlinkError::Config("pool_size must be positive".to_string()));
        }
        if self.dialect != Dialect::Sqlite {
            return Err(LedgerlinkError::Config(format!(
                "dialect {:?} cannot run on the SQLite connection pool",
                self.dialect
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(LedgerlinkError::Config("currency must not be empty".to_string()));
        }
        Ok(())
    }
}
