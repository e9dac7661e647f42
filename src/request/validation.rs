//! Request validation.
//!
//! Every rule is checked; violations are collected in order so the form can
//! show all of them at once.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

use super::catalog::is_placeholder;
use super::model::PaymentRequest;
use super::totals::needs_exchange_rate;

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create error for empty required field
    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} is required.", label))
    }

    /// Create error for a selection left on its placeholder
    pub fn not_selected(field: &str, label: &str) -> Self {
        Self::new(field, format!("Please select a {}.", label))
    }

    pub fn none_selected(field: &str, label: &str) -> Self {
        Self::new(field, format!("Select at least one {}.", label))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Ordered collection of violations.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Messages in the order the rules were checked.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    /// Convert to Result - Ok if no errors, Err with the collection otherwise
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            write!(f, "\n{}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

/// Trait for validating request objects.
pub trait Validator {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

impl Validator for PaymentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_request(self).into_result()
    }
}

// ============================================================================
// Validation functions
// ============================================================================

/// Validate that a string is not empty after trimming
pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

/// Validate that a single-choice field is not left on a placeholder
pub fn validate_selected(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if is_placeholder(value) {
        errors.add(ValidationError::not_selected(field, label));
    }
}

/// Validate that a multi-choice field has at least one real entry
pub fn validate_any_selected(
    values: &[String],
    field: &str,
    label: &str,
    errors: &mut ValidationErrors,
) {
    if values.iter().all(|v| v.trim().is_empty()) {
        errors.add(ValidationError::none_selected(field, label));
    }
}

/// Run every rule against `request`.
pub fn validate_request(request: &PaymentRequest) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    validate_required(
        &request.operation_number,
        "operation_number",
        "Operation Number",
        &mut errors,
    );
    validate_selected(&request.sales_rep, "sales_rep", "Sales Rep", &mut errors);
    validate_selected(&request.client, "client", "Client", &mut errors);
    validate_required(
        &request.customer_name,
        "customer_name",
        "Customer Name",
        &mut errors,
    );
    validate_any_selected(
        &request.container_types,
        "container_types",
        "Container Type",
        &mut errors,
    );
    validate_any_selected(
        &request.service_types,
        "service_types",
        "Service Type",
        &mut errors,
    );
    validate_required(
        &request.operation_type,
        "operation_type",
        "Operation Type",
        &mut errors,
    );

    for (container, surcharges) in request.surcharge_groups() {
        for (i, surcharge) in surcharges.iter().enumerate() {
            let field = format!("surcharges.{}[{}]", container, i);
            let label = format!("Surcharge {} for {}", i + 1, container);

            if surcharge.concept.trim().is_empty() {
                errors.add(ValidationError::new(
                    format!("{field}.concept"),
                    format!("{label}: concept is required."),
                ));
            }
            if surcharge.parsed_currency().is_none() {
                errors.add(ValidationError::new(
                    format!("{field}.currency"),
                    format!("{label}: currency must be USD or COP."),
                ));
            }
            if !(surcharge.cost > 0.0) {
                errors.add(ValidationError::new(
                    format!("{field}.cost"),
                    format!("{label}: cost must be greater than zero."),
                ));
            }
        }
    }

    let mixed = needs_exchange_rate(request.all_surcharges().map(|(_, s)| s));
    if mixed && !request.exchange_rate.is_some_and(|rate| rate > 0.0) {
        errors.add(ValidationError::new(
            "exchange_rate",
            "Exchange rate (TRM) must be greater than zero when USD and COP surcharges are mixed.",
        ));
    }

    errors
}
