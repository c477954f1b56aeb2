use serde::{Deserialize, Serialize};

/// A monthly price as it appears in the source files: a number, a label such as
/// `"Free"` or `"Custom"`, or anything else (null, bool) which carries no price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawPrice {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawPrice::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Exact, case-sensitive label match: `"custom"` is not `"Custom"`.
    pub fn is_label(&self, label: &str) -> bool {
        matches!(self, RawPrice::Text(s) if s == label)
    }
}

/// Canonical monthly price of a pricing tier.
///
/// Serializes to `0` for [`MonthlyPrice::Free`], the amount for [`MonthlyPrice::Amount`]
/// and the literal string `"Custom"` for [`MonthlyPrice::Custom`]. Amounts are never
/// negative; negative inputs collapse to `Free`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawPrice", into = "RawPrice")]
pub enum MonthlyPrice {
    Free,
    Amount(f64),
    #[default]
    Custom,
}

impl MonthlyPrice {
    pub fn from_amount(amount: f64) -> Self {
        if amount.is_finite() && amount > 0.0 {
            MonthlyPrice::Amount(amount)
        } else {
            MonthlyPrice::Free
        }
    }

    /// Numeric value per month; `None` for custom pricing.
    pub fn per_month(&self) -> Option<f64> {
        match self {
            MonthlyPrice::Free => Some(0.0),
            MonthlyPrice::Amount(n) => Some(*n),
            MonthlyPrice::Custom => None,
        }
    }

    /// Display label: `Free`, `Custom` or `$19/mo`.
    pub fn label(&self) -> String {
        match self {
            MonthlyPrice::Free => "Free".to_string(),
            MonthlyPrice::Custom => "Custom".to_string(),
            MonthlyPrice::Amount(n) => format!("${}/mo", format_amount(*n)),
        }
    }
}

pub fn format_amount(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{n:.2}")
    }
}

impl From<RawPrice> for MonthlyPrice {
    fn from(raw: RawPrice) -> Self {
        match raw {
            RawPrice::Number(n) => MonthlyPrice::from_amount(n),
            RawPrice::Text(s) => parse_label(&s),
            RawPrice::Other(_) => MonthlyPrice::Custom,
        }
    }
}

impl From<MonthlyPrice> for RawPrice {
    fn from(price: MonthlyPrice) -> Self {
        match price {
            MonthlyPrice::Free => RawPrice::Other(serde_json::Value::from(0)),
            MonthlyPrice::Amount(n) => RawPrice::Number(n),
            MonthlyPrice::Custom => RawPrice::Text("Custom".to_string()),
        }
    }
}

fn parse_label(s: &str) -> MonthlyPrice {
    let trimmed = s.trim();
    if trimmed.eq_ignore_ascii_case("free") {
        return MonthlyPrice::Free;
    }
    let numeric: String = trimmed
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    match numeric.parse::<f64>() {
        Ok(n) => MonthlyPrice::from_amount(n),
        Err(_) => MonthlyPrice::Custom,
    }
}
