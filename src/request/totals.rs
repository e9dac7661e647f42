//! Currency handling, subtotals and the formatted grand total.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::{PaymentRequest, Surcharge};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "COP")]
    Cop,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Cop => "COP",
        }
    }

    /// Exact match on the currency code, ignoring surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "USD" => Some(Currency::Usd),
            "COP" => Some(Currency::Cop),
            _ => None,
        }
    }
}

/// Per-currency sums of surcharge costs. No conversion is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct Subtotals {
    pub usd: f64,
    pub cop: f64,
}

impl Subtotals {
    pub fn of<'a>(surcharges: impl IntoIterator<Item = &'a Surcharge>) -> Self {
        surcharges
            .into_iter()
            .fold(Self::default(), |mut acc, surcharge| {
                match surcharge.parsed_currency() {
                    Some(Currency::Usd) => acc.usd += surcharge.cost,
                    Some(Currency::Cop) => acc.cop += surcharge.cost,
                    None => {}
                }
                acc
            })
    }

    pub fn for_request(request: &PaymentRequest) -> Self {
        Self::of(request.all_surcharges().map(|(_, s)| s))
    }
}

/// USD amounts only need converting when they are mixed with COP amounts.
pub fn needs_exchange_rate<'a>(surcharges: impl IntoIterator<Item = &'a Surcharge>) -> bool {
    let (mut usd, mut cop) = (false, false);
    for surcharge in surcharges {
        match surcharge.parsed_currency() {
            Some(Currency::Usd) => usd = true,
            Some(Currency::Cop) => cop = true,
            None => {}
        }
    }
    usd && cop
}

/// Grand total in the currency the request is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GrandTotal {
    pub amount: f64,
    pub currency: Currency,
}

impl GrandTotal {
    /// USD-only requests are quoted in USD; COP-only, mixed and empty ones in COP.
    /// Mixed requests convert USD at `exchange_rate` (missing rate counts as zero).
    pub fn for_request(request: &PaymentRequest) -> Self {
        let surcharges: Vec<&Surcharge> = request.all_surcharges().map(|(_, s)| s).collect();
        let convert = needs_exchange_rate(surcharges.iter().copied());
        let rate = request.exchange_rate.unwrap_or(0.0);

        let has = |currency: Currency| {
            surcharges
                .iter()
                .any(|s| s.parsed_currency() == Some(currency))
        };
        let currency = if has(Currency::Usd) && !has(Currency::Cop) {
            Currency::Usd
        } else {
            Currency::Cop
        };

        let total: f64 = surcharges
            .iter()
            .map(|s| match s.parsed_currency() {
                Some(Currency::Usd) if convert => s.cost * rate,
                _ => s.cost,
            })
            .sum();

        Self {
            amount: round_up_to_cent(total),
            currency,
        }
    }

    /// `$1.234,50 COP`
    pub fn formatted(&self) -> String {
        format_total(self.amount, self.currency)
    }
}

/// Round up to the next cent. The small epsilon keeps float noise such as
/// `0.30000000000000004` from bumping a whole cent.
pub fn round_up_to_cent(value: f64) -> f64 {
    ((value * 100.0) - 1e-6).ceil() / 100.0
}

/// Two decimals with `,` as thousands mark and `.` as decimal mark: `1,234.50`.
fn format_grouped(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

/// Swap the separators of [`format_grouped`]: `1.234,50`.
pub fn format_amount(value: f64) -> String {
    format_grouped(value)
        .chars()
        .map(|c| match c {
            ',' => '.',
            '.' => ',',
            other => other,
        })
        .collect()
}

pub fn format_total(amount: f64, currency: Currency) -> String {
    format!("${} {}", format_amount(amount), currency.code())
}

/// Line-item cost as shown in the document table and the ledger: `$12.50 USD`.
pub fn format_cost(cost: f64, currency: &str) -> String {
    format!("${:.2} {}", cost, currency.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grand_total_separator_swap() {
        assert_eq!(format_total(1234.5, Currency::Cop), "$1.234,50 COP");
        assert_eq!(format_total(1234.5, Currency::Usd), "$1.234,50 USD");
    }

    #[test]
    fn test_format_amount_groups() {
        assert_eq!(format_amount(0.0), "0,00");
        assert_eq!(format_amount(999.999), "1.000,00");
        assert_eq!(format_amount(1_234_567.891), "1.234.567,89");
        assert_eq!(format_amount(100.0), "100,00");
    }

    #[test]
    fn test_round_up_to_cent() {
        assert_eq!(round_up_to_cent(10.001), 10.01);
        assert_eq!(round_up_to_cent(12.5), 12.5);
        assert_eq!(round_up_to_cent(0.1 + 0.2), 0.3);
    }

    #[test]
    fn test_subtotals_ignore_exchange_rate() {
        let surcharges = vec![
            Surcharge::new("A", Currency::Usd, 10.0),
            Surcharge::new("B", Currency::Cop, 5000.0),
            Surcharge::new("C", Currency::Usd, 2.5),
        ];
        let subtotals = Subtotals::of(&surcharges);
        assert_eq!(subtotals.usd, 12.5);
        assert_eq!(subtotals.cop, 5000.0);
    }

    #[test]
    fn test_needs_exchange_rate_only_when_mixed() {
        let usd = Surcharge::new("A", Currency::Usd, 1.0);
        let cop = Surcharge::new("B", Currency::Cop, 1.0);
        assert!(!needs_exchange_rate([&usd]));
        assert!(!needs_exchange_rate([&cop]));
        assert!(needs_exchange_rate([&usd, &cop]));
        assert!(!needs_exchange_rate(std::iter::empty::<&Surcharge>()));
    }

    fn request_with(surcharges: Vec<Surcharge>, exchange_rate: Option<f64>) -> PaymentRequest {
        let mut request = PaymentRequest {
            exchange_rate,
            ..Default::default()
        };
        request.surcharges.insert("20' Dry".to_string(), surcharges);
        request
    }

    #[test]
    fn test_grand_total_currency_choice() {
        let usd_only = request_with(vec![Surcharge::new("A", Currency::Usd, 10.0)], Some(4150.0));
        let total = GrandTotal::for_request(&usd_only);
        assert_eq!(total.currency, Currency::Usd);
        assert_eq!(total.amount, 10.0);
        assert_eq!(total.formatted(), "$10,00 USD");

        let cop_only = request_with(vec![Surcharge::new("A", Currency::Cop, 5000.0)], None);
        assert_eq!(GrandTotal::for_request(&cop_only).currency, Currency::Cop);

        let empty = GrandTotal::for_request(&PaymentRequest::default());
        assert_eq!(empty.currency, Currency::Cop);
        assert_eq!(empty.amount, 0.0);
    }

    #[test]
    fn test_mixed_grand_total_converts_and_rounds_up() {
        let mixed = request_with(
            vec![
                Surcharge::new("A", Currency::Usd, 1.0005),
                Surcharge::new("B", Currency::Cop, 100.0),
            ],
            Some(10.0),
        );
        let total = GrandTotal::for_request(&mixed);
        assert_eq!(total.currency, Currency::Cop);
        assert_eq!(total.amount, 110.01);
        assert_eq!(total.formatted(), "$110,01 COP");
    }

    #[test]
    fn test_format_cost() {
        assert_eq!(format_cost(12.5, "USD"), "$12.50 USD");
        assert_eq!(format_cost(5000.0, "COP"), "$5000.00 COP");
    }
}
