//! Client name list kept in the `clientes` sheet.
//!
//! Reads go through a process-wide cache; registering a new client appends it
//! to the sheet and drops the cached list so the next read re-fetches it.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use super::{ensure_sheet, CellValue, LedgerError, TabularStore};

pub const CLIENTS_SHEET: &str = "clientes";
const CLIENTS_HEADER: &[&str] = &["Cliente"];
const CLIENTS_CACHE_KEY: &str = "clients";
const CLIENTS_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

pub struct ClientDirectory {
    store: Arc<dyn TabularStore>,
    cache: Cache<String, Vec<String>>,
}

impl ClientDirectory {
    pub fn new(store: Arc<dyn TabularStore>) -> Self {
        let cache = Cache::builder()
            .time_to_live(CLIENTS_CACHE_TTL)
            .max_capacity(1)
            .build();
        Self { store, cache }
    }

    /// Client names without the header row. A missing sheet means no clients yet.
    pub async fn list(&self) -> Result<Vec<String>, LedgerError> {
        if let Some(cached) = self.cache.get(CLIENTS_CACHE_KEY).await {
            return Ok(cached);
        }

        let titles = self.store.sheet_titles().await?;
        let clients = if titles.iter().any(|t| t == CLIENTS_SHEET) {
            self.store
                .first_column(CLIENTS_SHEET)
                .await?
                .into_iter()
                .skip(1)
                .filter(|name| !name.trim().is_empty())
                .collect()
        } else {
            Vec::new()
        };

        self.cache
            .insert(CLIENTS_CACHE_KEY.to_string(), clients.clone())
            .await;
        log::debug!("Client list loaded ({} clients)", clients.len());
        Ok(clients)
    }

    /// Case-insensitive, whitespace-insensitive membership test.
    pub async fn contains(&self, name: &str) -> Result<bool, LedgerError> {
        let wanted = normalize(name);
        Ok(self.list().await?.iter().any(|c| normalize(c) == wanted))
    }

    /// Append `name` to the client sheet unless an equivalent name is already listed.
    /// Returns `true` when a row was appended.
    pub async fn register(&self, name: &str) -> Result<bool, LedgerError> {
        let name = name.trim();
        if name.is_empty() || self.contains(name).await? {
            return Ok(false);
        }

        ensure_sheet(self.store.as_ref(), CLIENTS_SHEET, CLIENTS_HEADER).await?;
        self.store
            .append_row(CLIENTS_SHEET, &[CellValue::from(name)])
            .await?;
        self.cache.invalidate(CLIENTS_CACHE_KEY).await;
        log::info!("Client '{}' added to the client list", name);
        Ok(true)
    }
}
