//! PDF rendering of a submitted request.
//!
//! An overlay page with the request fields is laid out ([`layout`]), encoded
//! as a content stream ([`content`]) and stamped onto the first page of the
//! static template ([`merge`]).

pub mod content;
pub mod fonts;
pub mod layout;
pub mod merge;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::request::{sales_rep, GrandTotal, PaymentRequest};
use fonts::FontSet;

pub const DOCUMENT_FILENAME: &str = "Solicitud de Anticipo.pdf";
pub const DOCUMENT_MIME: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("PDF template unavailable: {0}")]
    Template(String),
    #[error("PDF processing failed: {0}")]
    Pdf(String),
    #[error("PDF could not be written: {0}")]
    Output(String),
}

/// A rendered document, ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub filename: String,
    pub mime: &'static str,
    pub pdf: Vec<u8>,
}

pub struct DocumentRenderer {
    template_path: PathBuf,
    fonts: FontSet,
}

impl DocumentRenderer {
    /// Fonts are loaded once here; the template is read on every render.
    pub fn new(template_path: impl Into<PathBuf>, fonts_dir: &Path) -> Self {
        Self {
            template_path: template_path.into(),
            fonts: FontSet::load(fonts_dir),
        }
    }

    pub fn with_fonts(template_path: impl Into<PathBuf>, fonts: FontSet) -> Self {
        Self {
            template_path: template_path.into(),
            fonts,
        }
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    pub fn render(
        &self,
        request: &PaymentRequest,
        date: NaiveDate,
    ) -> Result<GeneratedDocument, DocumentError> {
        let total = if request.formatted_total.trim().is_empty() {
            GrandTotal::for_request(request).formatted()
        } else {
            request.formatted_total.trim().to_string()
        };

        let rep = sales_rep(request.sales_rep.trim());
        let overlay = layout::compose(request, &rep, date, &total, &self.fonts);

        let template = std::fs::read(&self.template_path).map_err(|e| {
            DocumentError::Template(format!("{}: {}", self.template_path.display(), e))
        })?;
        let pdf = merge::stamp_pages(&template, &[overlay], &self.fonts)?;

        log::info!(
            "Rendered '{}' for operation {} ({} bytes)",
            DOCUMENT_FILENAME,
            request.operation_number.trim(),
            pdf.len()
        );

        Ok(GeneratedDocument {
            filename: DOCUMENT_FILENAME.to_string(),
            mime: DOCUMENT_MIME,
            pdf,
        })
    }
}
