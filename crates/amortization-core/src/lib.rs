pub mod amortization;
pub mod currency;
pub mod error;
pub mod types;

#[cfg(feature = "charts")]
pub mod charts;

pub use amortization::{
    calculate_loan, generate_schedule, loan_term, monthly_installment, monthly_rate,
};
pub use currency::CurrencyCode;
pub use error::AmortizationError;
pub use types::*;

/// Standard result type for all amortization operations
pub type AmortizationResult<T> = Result<T, AmortizationError>;
