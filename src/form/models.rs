use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::request::{Currency, SalesRep, ValidationError, ValidationErrors};

/// Option lists used to populate the request form.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FormOptions {
    pub sales_reps: Vec<SalesRep>,
    pub container_types: Vec<String>,
    pub service_types: Vec<String>,
    /// Known clients, in sheet order.
    pub clients: Vec<String>,
    /// Sentinel entry the form shows to offer adding a client.
    pub add_new_client_option: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewClientRequest {
    #[schema(example = "Comercializadora Andina S.A.S.")]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientResponse {
    pub name: String,
}

/// Running totals for the form's total field.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    /// Formatted grand total, e.g. `$1.234,50 COP`.
    pub total: String,
    pub amount: f64,
    pub currency: Currency,
    /// True when USD and COP surcharges are mixed.
    pub needs_exchange_rate: bool,
    pub usd_subtotal: f64,
    pub cop_subtotal: f64,
}

/// 422 body listing every violated rule.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub message: String,
    pub errors: Vec<ValidationError>,
    pub timestamp: String,
}

impl ValidationErrorResponse {
    pub fn from_errors(errors: &ValidationErrors) -> Self {
        Self {
            error: "ValidationError".to_string(),
            message: format!("{} validation error(s)", errors.len()),
            errors: errors.iter().cloned().collect(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
