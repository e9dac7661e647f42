//! Spreadsheet-backed ledger.
//!
//! The store is reached through [`TabularStore`] so the Google Sheets client can
//! be replaced by the in-memory store for local runs and tests.
//! - `sheets` - Google Sheets v4 REST client
//! - `token` - OAuth access tokens for the Sheets client
//! - `memory` - in-process store
//! - `clients` - cached client name list
//! - `writer` - submission rows

pub mod clients;
pub mod memory;
pub mod sheets;
pub mod token;
pub mod writer;

pub use clients::ClientDirectory;
pub use memory::MemoryStore;
pub use sheets::SheetsStore;
pub use writer::{LedgerRow, LedgerWriter};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the external tabular store.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("the configured spreadsheet was not found")]
    SpreadsheetNotFound,
    #[error("sheet '{0}' was not found in the spreadsheet")]
    SheetNotFound(String),
    #[error("spreadsheet request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("spreadsheet API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("invalid spreadsheet credentials: {0}")]
    Credentials(String),
    #[error("could not obtain spreadsheet access token: {0}")]
    Token(String),
    /// The ledger row was written; only the client list update failed.
    #[error("request recorded; client list update failed: {0}")]
    ClientListUpdate(Box<LedgerError>),
}

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }

    pub fn as_text(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(t) => t.clone(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Titles of every sheet (tab) in the spreadsheet.
    async fn sheet_titles(&self) -> Result<Vec<String>, LedgerError>;
    /// Create an empty sheet.
    async fn add_sheet(&self, title: &str) -> Result<(), LedgerError>;
    /// Append one row after the last non-empty row of `sheet`.
    async fn append_row(&self, sheet: &str, row: &[CellValue]) -> Result<(), LedgerError>;
    /// All values of the first column of `sheet`, header included.
    async fn first_column(&self, sheet: &str) -> Result<Vec<String>, LedgerError>;
}

/// Create `sheet` with `header` as its first row unless it already exists.
/// Returns `true` when the sheet was created.
pub async fn ensure_sheet(
    store: &dyn TabularStore,
    sheet: &str,
    header: &[&str],
) -> Result<bool, LedgerError> {
    let titles = store.sheet_titles().await?;
    if titles.iter().any(|title| title == sheet) {
        return Ok(false);
    }

    store.add_sheet(sheet).await?;
    let header_row: Vec<CellValue> = header.iter().map(|h| CellValue::from(*h)).collect();
    store.append_row(sheet, &header_row).await?;
    log::warn!("Worksheet '{}' was created", sheet);
    Ok(true)
}
