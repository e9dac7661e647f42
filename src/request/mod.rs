//! Advance payment request domain: data model, option catalog, totals and validation.

pub mod catalog;
pub mod model;
pub mod totals;
pub mod validation;

pub use catalog::{sales_rep, SalesRep};
pub use model::{PaymentRequest, Surcharge};
pub use totals::{Currency, GrandTotal, Subtotals};
pub use validation::{validate_request, ValidationError, ValidationErrors, Validator};
