//! Submission pipeline: validate, write the ledger row, render the document.
//!
//! Any failing step aborts the ones after it. Nothing is retried.

use chrono::{DateTime, Utc};
use chrono_tz::America::Bogota;
use chrono_tz::Tz;
use thiserror::Error;
use uuid::Uuid;

use crate::document::{DocumentError, DocumentRenderer, GeneratedDocument};
use crate::ledger::{LedgerError, LedgerRow, LedgerWriter};
use crate::request::totals::needs_exchange_rate;
use crate::request::{GrandTotal, PaymentRequest, Subtotals, ValidationErrors, Validator};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Live totals shown while the form is being filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub total: GrandTotal,
    pub subtotals: Subtotals,
    pub needs_exchange_rate: bool,
}

/// Outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: Uuid,
    pub total: GrandTotal,
    pub ledger_row: LedgerRow,
    pub document: GeneratedDocument,
}

pub struct FormController {
    writer: LedgerWriter,
    renderer: DocumentRenderer,
}

impl FormController {
    pub fn new(writer: LedgerWriter, renderer: DocumentRenderer) -> Self {
        Self { writer, renderer }
    }

    pub fn quote(&self, request: &PaymentRequest) -> Quote {
        Quote {
            total: GrandTotal::for_request(request),
            subtotals: Subtotals::for_request(request),
            needs_exchange_rate: needs_exchange_rate(request.all_surcharges().map(|(_, s)| s)),
        }
    }

    pub async fn submit(&self, request: PaymentRequest) -> Result<Submission, SubmitError> {
        let now = Utc::now().with_timezone(&Bogota);
        self.submit_at(request, now).await
    }

    /// Same as [`submit`](Self::submit) with an explicit Bogotá timestamp.
    pub async fn submit_at(
        &self,
        mut request: PaymentRequest,
        now: DateTime<Tz>,
    ) -> Result<Submission, SubmitError> {
        request.validate().map_err(|errors| {
            log::info!(
                "Request {} rejected with {} validation error(s)",
                request.operation_number.trim(),
                errors.len()
            );
            SubmitError::Validation(errors)
        })?;

        // A rate only applies to mixed USD/COP requests.
        if !needs_exchange_rate(request.all_surcharges().map(|(_, s)| s)) {
            request.exchange_rate = None;
        }

        let total = GrandTotal::for_request(&request);
        request.formatted_total = total.formatted();

        let ledger_row = self.writer.append(&request, &now).await?;
        let document = self.renderer.render(&request, now.date_naive())?;

        let id = Uuid::new_v4();
        log::info!(
            "Submission {} completed for operation {} ({})",
            id,
            request.operation_number.trim(),
            request.formatted_total
        );

        Ok(Submission {
            id,
            total,
            ledger_row,
            document,
        })
    }
}
