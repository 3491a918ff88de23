use log::debug;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{
    in_range, monthly_rate, validate_annual_rate, validate_principal, MONTHS_PER_YEAR,
};
use crate::error::AmortizationError;
use crate::types::*;
use crate::AmortizationResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub term_years: Years,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentOutput {
    pub installment: Money,
    pub monthly_rate: Rate,
    /// Period count implied by the term, possibly fractional
    pub term_months: Months,
    /// Installment times period count
    pub total_paid: Money,
    pub total_interest: Money,
}

/// Fixed monthly installment that repays `principal` over `term_years`.
///
/// `term_years` may be fractional; the resulting period count need not be a
/// whole number. A zero rate falls back to straight-line repayment, since the
/// annuity formula is 0/0 there.
pub fn monthly_installment(
    principal: Money,
    annual_rate_percent: Percent,
    term_years: Years,
) -> AmortizationResult<Money> {
    validate_principal(principal)?;
    validate_annual_rate(annual_rate_percent)?;

    let months = in_range(
        term_years.checked_mul(MONTHS_PER_YEAR),
        "term_years",
        "term in months",
    )?;
    if months <= Decimal::ZERO {
        return Err(AmortizationError::InvalidTerm {
            context: format!("term of {term_years} years gives {months} monthly periods"),
        });
    }

    let rate = monthly_rate(annual_rate_percent);
    let installment = installment_for_periods(principal, rate, months)?;
    debug!("installment: P={principal} r={rate} n={months} -> {installment}");
    Ok(installment)
}

/// Installment with lifetime totals, wrapped in the standard output envelope.
pub fn calculate_installment(
    input: &InstallmentInput,
) -> AmortizationResult<ComputationOutput<InstallmentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let installment =
        monthly_installment(input.principal, input.annual_rate_percent, input.term_years)?;
    let term_months = in_range(
        input.term_years.checked_mul(MONTHS_PER_YEAR),
        "term_years",
        "term in months",
    )?;
    if term_months.fract() != Decimal::ZERO {
        warnings.push(format!(
            "Term of {term_months} months is not a whole number of periods"
        ));
    }
    let total_paid = in_range(
        installment.checked_mul(term_months),
        "term_years",
        "total paid over the term",
    )?;

    let output = InstallmentOutput {
        installment,
        monthly_rate: monthly_rate(input.annual_rate_percent),
        term_months,
        total_paid,
        total_interest: total_paid - input.principal,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annuity installment: P * r / (1 - (1 + r)^-n)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Annuity payment for an already-validated principal, monthly rate and period count.
pub(crate) fn installment_for_periods(
    principal: Money,
    rate: Rate,
    months: Months,
) -> AmortizationResult<Money> {
    if rate.is_zero() {
        return in_range(
            principal.checked_div(months),
            "term_years",
            "straight-line installment",
        );
    }

    let growth = (Decimal::ONE + rate).checked_powd(months).ok_or_else(|| {
        AmortizationError::InvalidInput {
            field: "term_years".into(),
            reason: format!("compound factor (1 + {rate})^{months} is out of range"),
        }
    })?;

    // P * r * g / (g - 1), rearranged as P * r / (1 - 1/g) so large g cannot overflow
    let annuity_factor = Decimal::ONE - Decimal::ONE / growth;
    if annuity_factor <= Decimal::ZERO {
        return Err(AmortizationError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "rate too small to distinguish from zero over this term".into(),
        });
    }

    in_range(
        principal
            .checked_mul(rate)
            .and_then(|interest| interest.checked_div(annuity_factor)),
        "principal",
        "annuity installment",
    )
}
