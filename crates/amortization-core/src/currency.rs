//! Display-only currency labels. Amounts are never converted between currencies.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AmortizationError;
use crate::types::Money;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    #[default]
    Inr,
    Usd,
    Eur,
    Gbp,
    Jpy,
    Aud,
    Cad,
    Sgd,
    Cny,
    Aed,
}

/// Code, symbol and name of one display currency
#[derive(Debug, Clone, Serialize)]
pub struct CurrencyLabel {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 10] = [
        CurrencyCode::Inr,
        CurrencyCode::Usd,
        CurrencyCode::Eur,
        CurrencyCode::Gbp,
        CurrencyCode::Jpy,
        CurrencyCode::Aud,
        CurrencyCode::Cad,
        CurrencyCode::Sgd,
        CurrencyCode::Cny,
        CurrencyCode::Aed,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            CurrencyCode::Inr => "INR",
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Gbp => "GBP",
            CurrencyCode::Jpy => "JPY",
            CurrencyCode::Aud => "AUD",
            CurrencyCode::Cad => "CAD",
            CurrencyCode::Sgd => "SGD",
            CurrencyCode::Cny => "CNY",
            CurrencyCode::Aed => "AED",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencyCode::Inr => "₹",
            CurrencyCode::Usd => "$",
            CurrencyCode::Eur => "€",
            CurrencyCode::Gbp => "£",
            CurrencyCode::Jpy | CurrencyCode::Cny => "¥",
            CurrencyCode::Aud => "A$",
            CurrencyCode::Cad => "C$",
            CurrencyCode::Sgd => "S$",
            CurrencyCode::Aed => "د.إ",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CurrencyCode::Inr => "Indian Rupee",
            CurrencyCode::Usd => "US Dollar",
            CurrencyCode::Eur => "Euro",
            CurrencyCode::Gbp => "British Pound",
            CurrencyCode::Jpy => "Japanese Yen",
            CurrencyCode::Aud => "Australian Dollar",
            CurrencyCode::Cad => "Canadian Dollar",
            CurrencyCode::Sgd => "Singapore Dollar",
            CurrencyCode::Cny => "Chinese Yuan",
            CurrencyCode::Aed => "UAE Dirham",
        }
    }

    pub fn label(&self) -> CurrencyLabel {
        CurrencyLabel {
            code: self.code(),
            symbol: self.symbol(),
            name: self.name(),
        }
    }

    /// Format an amount as whole currency units with thousands separators, e.g. `₹9,650`.
    pub fn format_amount(&self, amount: Money) -> String {
        let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded < Decimal::ZERO { "-" } else { "" };
        let digits = rounded.abs().trunc().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        format!("{sign}{}{grouped}", self.symbol())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = AmortizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CurrencyCode::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AmortizationError::InvalidInput {
                field: "currency".into(),
                reason: format!("unknown currency code '{wanted}'"),
            })
    }
}
