//! Shared application state handed to every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::RoleDirectory;
use crate::config::{AppConfig, SheetsAuth};
use crate::document::DocumentRenderer;
use crate::form::FormController;
use crate::ledger::token::{
    AccessTokenProvider, ServiceAccountKey, ServiceAccountTokenProvider, StaticTokenProvider,
};
use crate::ledger::{
    ClientDirectory, LedgerError, LedgerWriter, MemoryStore, SheetsStore, TabularStore,
};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub roles: RoleDirectory,
    pub clients: Arc<ClientDirectory>,
    pub controller: Arc<FormController>,
}

impl AppState {
    /// Build the state from configuration, connecting to the spreadsheet when one
    /// is configured and falling back to an in-memory ledger otherwise.
    pub fn new(config: AppConfig) -> Result<Self, LedgerError> {
        let store: Arc<dyn TabularStore> = match &config.sheets {
            Some(sheets) => {
                let http_client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
                let auth: Arc<dyn AccessTokenProvider> = match &sheets.auth {
                    SheetsAuth::ServiceAccount(path) => {
                        let key = ServiceAccountKey::from_file(path)?;
                        log::info!("Using service account {}", key.client_email);
                        Arc::new(ServiceAccountTokenProvider::new(key, http_client.clone())?)
                    }
                    SheetsAuth::StaticToken(token) => {
                        Arc::new(StaticTokenProvider::new(token.clone()))
                    }
                };
                log::info!("Ledger spreadsheet: {}", sheets.spreadsheet_id);
                Arc::new(SheetsStore::new(
                    sheets.api_base.clone(),
                    sheets.spreadsheet_id.clone(),
                    http_client,
                    auth,
                ))
            }
            None => Arc::new(MemoryStore::new()),
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: AppConfig, store: Arc<dyn TabularStore>) -> Self {
        let renderer = DocumentRenderer::new(config.template_path.clone(), &config.fonts_dir);
        Self::with_parts(config, store, renderer)
    }

    pub fn with_parts(
        config: AppConfig,
        store: Arc<dyn TabularStore>,
        renderer: DocumentRenderer,
    ) -> Self {
        if !renderer.template_path().exists() {
            log::warn!(
                "PDF template '{}' not found; submissions will fail until it is present",
                renderer.template_path().display()
            );
        }

        let roles = RoleDirectory::with_overrides(&config.roles);
        let clients = Arc::new(ClientDirectory::new(store.clone()));
        let writer = LedgerWriter::new(store, clients.clone());
        let controller = Arc::new(FormController::new(writer, renderer));

        Self {
            config: Arc::new(config),
            roles,
            clients,
            controller,
        }
    }
}
