use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::totals::Currency;

/// A priced line item attached to a container type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Surcharge {
    #[serde(default)]
    #[schema(example = "Flete marítimo")]
    pub concept: String,
    /// Kept as text so an unrecognized currency reaches validation.
    #[serde(default)]
    #[schema(example = "USD")]
    pub currency: String,
    #[serde(default)]
    #[schema(example = 150.0)]
    pub cost: f64,
}

impl Surcharge {
    pub fn new(concept: impl Into<String>, currency: Currency, cost: f64) -> Self {
        Self {
            concept: concept.into(),
            currency: currency.code().to_string(),
            cost,
        }
    }

    pub fn parsed_currency(&self) -> Option<Currency> {
        Currency::parse(&self.currency)
    }
}

/// An advance payment request as entered on the form.
///
/// Missing text fields deserialize as empty strings so that they fail validation
/// with a message instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PaymentRequest {
    /// Operation number.
    #[serde(default)]
    #[schema(example = "M-2024-118")]
    pub operation_number: String,
    #[serde(default)]
    #[schema(example = "Pedro Luis Bruges")]
    pub sales_rep: String,
    #[serde(default)]
    #[schema(example = "Comercializadora Andina S.A.S.")]
    pub client: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub container_types: Vec<String>,
    #[serde(default)]
    pub service_types: Vec<String>,
    #[serde(default)]
    pub operation_type: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Surcharges keyed by container type.
    #[serde(default)]
    pub surcharges: BTreeMap<String, Vec<Surcharge>>,
    /// USD → COP exchange rate (TRM).
    #[serde(default)]
    #[schema(example = 4150.0)]
    pub exchange_rate: Option<f64>,
    /// Filled in server-side before the request is persisted or rendered.
    #[serde(default)]
    pub formatted_total: String,
}

impl PaymentRequest {
    /// Surcharge groups in form order: selected containers first, then any
    /// remaining groups by key.
    pub fn surcharge_groups(&self) -> Vec<(&str, &[Surcharge])> {
        let mut groups: Vec<(&str, &[Surcharge])> = Vec::with_capacity(self.surcharges.len());

        for container in &self.container_types {
            if let Some(items) = self.surcharges.get(container) {
                if !groups.iter().any(|(name, _)| *name == container.as_str()) {
                    groups.push((container.as_str(), items.as_slice()));
                }
            }
        }
        for (container, items) in &self.surcharges {
            if !groups.iter().any(|(name, _)| *name == container.as_str()) {
                groups.push((container.as_str(), items.as_slice()));
            }
        }

        groups
    }

    /// Every surcharge paired with the container group it belongs to.
    pub fn all_surcharges(&self) -> impl Iterator<Item = (&str, &Surcharge)> {
        self.surcharge_groups()
            .into_iter()
            .flat_map(|(container, items)| items.iter().map(move |s| (container, s)))
    }

    pub fn reference_text(&self) -> &str {
        self.reference.as_deref().map(str::trim).unwrap_or("")
    }

    pub fn notes_text(&self) -> &str {
        self.notes.as_deref().map(str::trim).unwrap_or("")
    }
}
