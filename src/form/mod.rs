//! HTTP surface of the advance payment request form.

pub mod controller;
pub mod handlers;
pub mod models;

pub use controller::{FormController, Quote, SubmitError, Submission};
pub use handlers::config;
