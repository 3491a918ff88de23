//! Fixed-rate annuity loan math: installment, term and period-by-period schedule.

pub mod calculator;
pub mod installment;
pub mod schedule;
pub mod term;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::AmortizationError;
use crate::types::{Percent, Rate};
use crate::AmortizationResult;

pub use calculator::{
    calculate_loan, whole_periods, LoanCalculation, LoanInput, LoanMode, TermBreakdown,
};
pub use installment::{
    calculate_installment, monthly_installment, InstallmentInput, InstallmentOutput,
};
pub use schedule::{
    build_schedule, generate_schedule, summarize, AmortizationSchedule, ScheduleEntry,
    ScheduleInput, ScheduleSummary,
};
pub use term::{calculate_term, loan_term, TermInput, TermOutput};

pub const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Longest schedule the engine will materialise (500 years of monthly periods).
pub const MAX_PERIODS: u32 = 6_000;

/// Relative balance drift (per unit of principal) absorbed silently by the clamp.
pub const DRIFT_TOLERANCE: Decimal = dec!(0.000000001);

/// Convert an annual percentage rate (10 = 10% p.a.) into a monthly decimal rate.
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / (MONTHS_PER_YEAR * dec!(100))
}

/// Unwrap a `checked_*` result, reporting overflow against the input field that drove it.
pub(crate) fn in_range(
    value: Option<Decimal>,
    field: &str,
    what: &str,
) -> AmortizationResult<Decimal> {
    value.ok_or_else(|| AmortizationError::InvalidInput {
        field: field.into(),
        reason: format!("{what} is outside the representable decimal range"),
    })
}

pub(crate) fn validate_principal(principal: Decimal) -> AmortizationResult<()> {
    if principal <= Decimal::ZERO {
        return Err(AmortizationError::InvalidRateOrPrincipal {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    Ok(())
}

pub(crate) fn validate_annual_rate(annual_rate_percent: Percent) -> AmortizationResult<()> {
    if annual_rate_percent < Decimal::ZERO {
        return Err(AmortizationError::InvalidRateOrPrincipal {
            field: "annual_rate_percent".into(),
            reason: "Annual interest rate cannot be negative".into(),
        });
    }
    Ok(())
}
