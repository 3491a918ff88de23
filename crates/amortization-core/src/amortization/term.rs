use log::debug;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::calculator::{whole_periods, TermBreakdown};
use super::{
    in_range, monthly_rate, validate_annual_rate, validate_principal, MONTHS_PER_YEAR,
};
use crate::error::AmortizationError;
use crate::types::*;
use crate::AmortizationResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub installment: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermOutput {
    /// Exact solver result
    pub term_months: Months,
    pub term_years: Years,
    /// Whole periods a schedule for this loan runs
    pub periods: u32,
    pub term_breakdown: TermBreakdown,
}

/// Number of monthly periods needed to repay `principal` with a fixed `installment`.
///
/// The result is fractional; callers decide how to round it before building a
/// schedule. Fails with [`AmortizationError::NonAmortizingLoan`] when the
/// installment does not exceed the first month's interest.
pub fn loan_term(
    principal: Money,
    annual_rate_percent: Percent,
    installment: Money,
) -> AmortizationResult<Months> {
    validate_principal(principal)?;
    validate_annual_rate(annual_rate_percent)?;

    let rate = monthly_rate(annual_rate_percent);
    let first_period_interest = in_range(
        principal.checked_mul(rate),
        "principal",
        "first month's interest",
    )?;

    if installment <= first_period_interest {
        return Err(AmortizationError::NonAmortizingLoan {
            installment,
            first_period_interest,
        });
    }

    if rate.is_zero() {
        return in_range(
            principal.checked_div(installment),
            "installment",
            "straight-line term",
        );
    }

    let ratio = in_range(
        installment.checked_div(installment - first_period_interest),
        "installment",
        "installment to amortizing share ratio",
    )?;
    let numerator = ratio.checked_ln().ok_or_else(|| AmortizationError::InvalidInput {
        field: "installment".into(),
        reason: format!("ln({ratio}) is undefined"),
    })?;
    let denominator = (Decimal::ONE + rate)
        .checked_ln()
        .filter(|d| !d.is_zero())
        .ok_or_else(|| AmortizationError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "rate too small to distinguish from zero".into(),
        })?;

    let months = in_range(numerator.checked_div(denominator), "installment", "term in months")?;
    debug!("term: P={principal} r={rate} E={installment} -> {months} months");
    Ok(months)
}

/// Term with its whole-period rounding, wrapped in the standard output envelope.
pub fn calculate_term(input: &TermInput) -> AmortizationResult<ComputationOutput<TermOutput>> {
    let start = Instant::now();

    let term_months = loan_term(input.principal, input.annual_rate_percent, input.installment)?;
    let periods = whole_periods(term_months)?;

    let output = TermOutput {
        term_months,
        term_years: term_months / MONTHS_PER_YEAR,
        periods,
        term_breakdown: TermBreakdown::from_periods(periods),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Inverted annuity: n = ln(E / (E - P * r)) / ln(1 + r), rounded up to whole periods",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}
