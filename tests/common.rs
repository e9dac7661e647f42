#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use advance_request_server::auth::jwt::issue_identity_token;
use advance_request_server::config::AppConfig;
use advance_request_server::document::fonts::FontSet;
use advance_request_server::document::DocumentRenderer;
use advance_request_server::ledger::clients::CLIENTS_SHEET;
use advance_request_server::ledger::{CellValue, LedgerError, MemoryStore, TabularStore};
use advance_request_server::request::{Currency, PaymentRequest, Surcharge};
use advance_request_server::AppState;
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

pub const TEST_SECRET: &str = "test-secret";
pub const COMMERCIAL_EMAIL: &str = "sales1@tradingsolutions.com";
pub const ADMIN_EMAIL: &str = "pricing@tradingsol.com";
pub const INSIDE_EMAIL: &str = "insidesales@tradingsolutions.com";

/// A small multi-page template. Resources live on the page tree root so pages
/// inherit them, like most exported forms.
pub fn template_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids: Vec<Object> = Vec::new();
    for i in 0..page_count {
        let content = format!("BT /F1 12 Tf 72 720 Td (Template page {}) Tj ET", i + 1);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Write a template into `dir` and return its path.
pub fn write_template(dir: &Path, page_count: usize) -> PathBuf {
    let path = dir.join("Solicitud Anticipo-2.pdf");
    std::fs::write(&path, template_pdf(page_count)).unwrap();
    path
}

/// Decoded content of every page of `pdf`, in page order.
pub fn page_contents(pdf: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(pdf).unwrap();
    doc.get_pages()
        .into_values()
        .map(|id| String::from_utf8_lossy(&doc.get_page_content(id).unwrap()).into_owned())
        .collect()
}

pub fn test_config(template_path: PathBuf) -> AppConfig {
    AppConfig {
        jwt_secret: TEST_SECRET.to_string(),
        template_path,
        fonts_dir: PathBuf::from("/nonexistent/fonts"),
        ..AppConfig::default()
    }
}

pub fn test_state(store: Arc<dyn TabularStore>, template_path: PathBuf) -> AppState {
    let renderer = DocumentRenderer::with_fonts(template_path.clone(), FontSet::default());
    AppState::with_parts(test_config(template_path), store, renderer)
}

pub fn bearer(email: &str) -> (String, String) {
    let token = issue_identity_token(email, "Test User", TEST_SECRET).unwrap();
    ("Authorization".to_string(), format!("Bearer {}", token))
}

/// A request that passes every validation rule.
/// [`sample_request`] with a single USD surcharge and a rate that should not apply.
pub fn usd_only_request() -> PaymentRequest {
    let mut request = sample_request();
    request.exchange_rate = Some(4150.0);
    request.surcharges.insert(
        "40' Dry Standard".to_string(),
        vec![Surcharge::new("THC", Currency::Usd, 10.0)],
    );
    request
}

pub fn sample_request() -> PaymentRequest {
    let mut request = PaymentRequest {
        operation_number: "M-2024-118".to_string(),
        sales_rep: "Johnny Farah".to_string(),
        client: "Acme Logistics".to_string(),
        customer_name: "Laura Gómez".to_string(),
        customer_phone: "3001234567".to_string(),
        customer_email: "laura@acme.co".to_string(),
        container_types: vec!["40' Dry Standard".to_string()],
        service_types: vec!["Agenciamiento".to_string()],
        operation_type: "Importación".to_string(),
        exchange_rate: Some(4000.0),
        ..Default::default()
    };
    request.surcharges.insert(
        "40' Dry Standard".to_string(),
        vec![
            Surcharge::new("THC", Currency::Usd, 10.0),
            Surcharge::new("Bodegaje", Currency::Cop, 5000.0),
            Surcharge::new("BL Fee", Currency::Usd, 2.5),
        ],
    );
    request
}

/// Store whose every call fails like an unreachable API.
pub struct FailingStore;

#[async_trait::async_trait]
impl TabularStore for FailingStore {
    async fn sheet_titles(&self) -> Result<Vec<String>, LedgerError> {
        Err(unavailable())
    }

    async fn add_sheet(&self, _title: &str) -> Result<(), LedgerError> {
        Err(unavailable())
    }

    async fn append_row(&self, _sheet: &str, _row: &[CellValue]) -> Result<(), LedgerError> {
        Err(unavailable())
    }

    async fn first_column(&self, _sheet: &str) -> Result<Vec<String>, LedgerError> {
        Err(unavailable())
    }
}

/// Works like [`MemoryStore`] except that every write to the client sheet fails.
pub struct ClientSheetFailingStore {
    pub inner: MemoryStore,
}

impl ClientSheetFailingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
        }
    }
}

#[async_trait::async_trait]
impl TabularStore for ClientSheetFailingStore {
    async fn sheet_titles(&self) -> Result<Vec<String>, LedgerError> {
        self.inner.sheet_titles().await
    }

    async fn add_sheet(&self, title: &str) -> Result<(), LedgerError> {
        if title == CLIENTS_SHEET {
            return Err(unavailable());
        }
        self.inner.add_sheet(title).await
    }

    async fn append_row(&self, sheet: &str, row: &[CellValue]) -> Result<(), LedgerError> {
        if sheet == CLIENTS_SHEET {
            return Err(unavailable());
        }
        self.inner.append_row(sheet, row).await
    }

    async fn first_column(&self, sheet: &str) -> Result<Vec<String>, LedgerError> {
        self.inner.first_column(sheet).await
    }
}

fn unavailable() -> LedgerError {
    LedgerError::Api {
        status: 503,
        message: "backend unavailable".to_string(),
    }
}
