use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmortizationError {
    #[error("Invalid term: {context}")]
    InvalidTerm { context: String },

    #[error("Non-amortizing loan: installment {installment} does not exceed first-period interest {first_period_interest}")]
    NonAmortizingLoan {
        installment: Decimal,
        first_period_interest: Decimal,
    },

    #[error("Invalid rate or principal: {field} — {reason}")]
    InvalidRateOrPrincipal { field: String, reason: String },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AmortizationError {
    fn from(e: serde_json::Error) -> Self {
        AmortizationError::SerializationError(e.to_string())
    }
}
