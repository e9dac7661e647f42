//! Appends submitted requests to the `SOLICITUD DE ANTICIPO` sheet.

use std::sync::Arc;

use chrono::DateTime;
use chrono_tz::Tz;

use super::{ensure_sheet, CellValue, ClientDirectory, LedgerError, TabularStore};
use crate::request::totals::format_cost;
use crate::request::{PaymentRequest, Subtotals};

pub const LEDGER_SHEET: &str = "SOLICITUD DE ANTICIPO";

/// Column titles, in the same order as [`LedgerRow::cells`].
pub const LEDGER_HEADER: &[&str] = &[
    "Commercial",
    "Time",
    "Cliente",
    "Customer Name",
    "Customer Phone",
    "Customer Email",
    "Container Type",
    "Service Type",
    "Operation Type",
    "Reference",
    "Surcharges",
    "Total USD",
    "Total COP",
    "TRM",
    "Total en COP TRM",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One flattened ledger row.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub cells: Vec<CellValue>,
    pub subtotals: Subtotals,
}

impl LedgerRow {
    pub fn from_request(request: &PaymentRequest, timestamp: &DateTime<Tz>) -> Self {
        let surcharges = request
            .all_surcharges()
            .map(|(container, s)| {
                format!(
                    "{} - {}: {}",
                    container,
                    s.concept.trim(),
                    format_cost(s.cost, &s.currency)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let subtotals = Subtotals::for_request(request);

        let cells = vec![
            CellValue::from(request.sales_rep.trim()),
            CellValue::from(timestamp.format(TIMESTAMP_FORMAT).to_string()),
            CellValue::from(request.client.trim()),
            CellValue::from(request.customer_name.trim()),
            CellValue::from(request.customer_phone.trim()),
            CellValue::from(request.customer_email.trim()),
            CellValue::from(request.container_types.join("\n")),
            CellValue::from(request.service_types.join("\n")),
            CellValue::from(request.operation_type.trim()),
            CellValue::from(request.reference_text()),
            CellValue::from(surcharges),
            CellValue::from(subtotals.usd),
            CellValue::from(subtotals.cop),
            request
                .exchange_rate
                .map(CellValue::from)
                .unwrap_or_else(CellValue::empty),
            CellValue::from(request.formatted_total.as_str()),
        ];

        Self { cells, subtotals }
    }

    /// Cell under the header `column`.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        LEDGER_HEADER
            .iter()
            .position(|h| *h == column)
            .and_then(|i| self.cells.get(i))
    }
}

pub struct LedgerWriter {
    store: Arc<dyn TabularStore>,
    clients: Arc<ClientDirectory>,
}

impl LedgerWriter {
    pub fn new(store: Arc<dyn TabularStore>, clients: Arc<ClientDirectory>) -> Self {
        Self { store, clients }
    }

    /// Append `request` as one row, creating the sheet and header on first use,
    /// then add the client to the client list if it is new.
    ///
    /// A failure after the row is written comes back as
    /// [`LedgerError::ClientListUpdate`].
    pub async fn append(
        &self,
        request: &PaymentRequest,
        timestamp: &DateTime<Tz>,
    ) -> Result<LedgerRow, LedgerError> {
        ensure_sheet(self.store.as_ref(), LEDGER_SHEET, LEDGER_HEADER).await?;

        let row = LedgerRow::from_request(request, timestamp);
        self.store.append_row(LEDGER_SHEET, &row.cells).await?;
        log::info!(
            "Ledger row appended for operation {} ({})",
            request.operation_number.trim(),
            request.client.trim()
        );

        self.clients
            .register(&request.client)
            .await
            .map_err(|e| LedgerError::ClientListUpdate(Box::new(e)))?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Currency, Surcharge};
    use chrono::TimeZone;
    use chrono_tz::America::Bogota;

    #[test]
    fn test_header_and_row_have_same_width() {
        let request = PaymentRequest::default();
        let timestamp = Bogota.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap();
        let row = LedgerRow::from_request(&request, &timestamp);
        assert_eq!(row.cells.len(), LEDGER_HEADER.len());
        assert_eq!(
            row.get("Time"),
            Some(&CellValue::from("2024-05-02 09:30:00"))
        );
        assert_eq!(row.get("TRM"), Some(&CellValue::empty()));
    }

    #[test]
    fn test_surcharge_descriptions_are_newline_joined() {
        let mut request = PaymentRequest {
            container_types: vec!["Reefer 20'".to_string()],
            ..Default::default()
        };
        request.surcharges.insert(
            "Reefer 20'".to_string(),
            vec![
                Surcharge::new("THC", Currency::Usd, 10.0),
                Surcharge::new("Energía", Currency::Cop, 5000.0),
            ],
        );
        let timestamp = Bogota.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap();
        let row = LedgerRow::from_request(&request, &timestamp);

        assert_eq!(
            row.get("Surcharges"),
            Some(&CellValue::from(
                "Reefer 20' - THC: $10.00 USD\nReefer 20' - Energía: $5000.00 COP"
            ))
        );
    }
}
