use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CellValue, LedgerError, TabularStore};

/// Spreadsheet kept in process memory. Used when no spreadsheet is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sheets: Mutex<BTreeMap<String, Vec<Vec<CellValue>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every row in `sheet`, or `None` if it does not exist.
    pub async fn rows(&self, sheet: &str) -> Option<Vec<Vec<CellValue>>> {
        self.sheets.lock().await.get(sheet).cloned()
    }
}

#[async_trait]
impl TabularStore for MemoryStore {
    async fn sheet_titles(&self) -> Result<Vec<String>, LedgerError> {
        Ok(self.sheets.lock().await.keys().cloned().collect())
    }

    async fn add_sheet(&self, title: &str) -> Result<(), LedgerError> {
        self.sheets
            .lock()
            .await
            .entry(title.to_string())
            .or_default();
        Ok(())
    }

    async fn append_row(&self, sheet: &str, row: &[CellValue]) -> Result<(), LedgerError> {
        let mut sheets = self.sheets.lock().await;
        let rows = sheets
            .get_mut(sheet)
            .ok_or_else(|| LedgerError::SheetNotFound(sheet.to_string()))?;
        rows.push(row.to_vec());
        Ok(())
    }

    async fn first_column(&self, sheet: &str) -> Result<Vec<String>, LedgerError> {
        let sheets = self.sheets.lock().await;
        let rows = sheets
            .get(sheet)
            .ok_or_else(|| LedgerError::SheetNotFound(sheet.to_string()))?;
        Ok(rows
            .iter()
            .filter_map(|row| row.first().map(CellValue::as_text))
            .collect())
    }
}
