use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{in_range, validate_principal, DRIFT_TOLERANCE, MAX_PERIODS};
use crate::error::AmortizationError;
use crate::types::*;
use crate::AmortizationResult;

/// One month of an amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub period: u32,
    pub installment: Money,
    pub principal: Money,
    pub interest: Money,
    pub balance: Money,
}

/// Aggregate totals over a schedule.
///
/// `total_principal` is the sum of the principal column, so it includes the
/// part of a final (or post-payoff) installment that exceeded the remaining
/// balance. That excess is reported separately as `overpayment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub periods: u32,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    /// Principal paid beyond the balance actually retired
    pub overpayment: Money,
}

/// A materialised schedule together with its totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub entries: Vec<ScheduleEntry>,
    pub summary: ScheduleSummary,
}

/// Input for building a schedule from an already-solved loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub principal: Money,
    pub monthly_rate: Rate,
    pub periods: u32,
    pub installment: Money,
}

/// Simulate the loan month by month.
///
/// Runs exactly `periods` periods. The balance is floored at zero, so a
/// caller passing an inconsistent tuple gets trailing zero-balance rows rather
/// than an early stop.
pub fn generate_schedule(
    principal: Money,
    monthly_rate: Rate,
    periods: u32,
    installment: Money,
) -> AmortizationResult<Vec<ScheduleEntry>> {
    let (entries, _) = simulate(principal, monthly_rate, periods, installment)?;
    Ok(entries)
}

/// Build a schedule with totals, wrapped in the standard output envelope.
pub fn build_schedule(
    input: &ScheduleInput,
) -> AmortizationResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();

    let (entries, warnings) = simulate(
        input.principal,
        input.monthly_rate,
        input.periods,
        input.installment,
    )?;
    let summary = summarize(input.principal, &entries)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-installment amortization schedule",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "monthly_rate": input.monthly_rate.to_string(),
            "periods": input.periods,
            "installment": input.installment.to_string(),
        }),
        warnings,
        elapsed,
        AmortizationSchedule { entries, summary },
    ))
}

/// Sum the principal, interest and installment columns of a schedule for a
/// loan of `principal`.
pub fn summarize(
    principal: Money,
    entries: &[ScheduleEntry],
) -> AmortizationResult<ScheduleSummary> {
    let total_principal = column_total(entries, "principal", |e| e.principal)?;
    let closing_balance = entries.last().map_or(principal, |e| e.balance);
    let retired = in_range(
        principal.checked_sub(closing_balance),
        "principal",
        "principal retired",
    )?;
    let overpayment = in_range(
        total_principal.checked_sub(retired),
        "principal",
        "overpayment",
    )?
    .max(Decimal::ZERO);

    Ok(ScheduleSummary {
        periods: entries.len() as u32,
        total_principal,
        total_interest: column_total(entries, "interest", |e| e.interest)?,
        total_paid: column_total(entries, "installment", |e| e.installment)?,
        overpayment,
    })
}

/// Checked sum of one schedule column.
pub(crate) fn column_total(
    entries: &[ScheduleEntry],
    column: &str,
    value: impl Fn(&ScheduleEntry) -> Money,
) -> AmortizationResult<Money> {
    entries.iter().try_fold(Decimal::ZERO, |total, entry| {
        in_range(total.checked_add(value(entry)), column, "column total")
    })
}

/// Core forward simulation. Returns the entries plus any drift warnings.
pub(crate) fn simulate(
    principal: Money,
    monthly_rate: Rate,
    periods: u32,
    installment: Money,
) -> AmortizationResult<(Vec<ScheduleEntry>, Vec<String>)> {
    validate_principal(principal)?;
    if monthly_rate < Decimal::ZERO {
        return Err(AmortizationError::InvalidRateOrPrincipal {
            field: "monthly_rate".into(),
            reason: "Monthly interest rate cannot be negative".into(),
        });
    }
    if periods == 0 {
        return Err(AmortizationError::InvalidTerm {
            context: "schedule requested with 0 periods".into(),
        });
    }
    if periods > MAX_PERIODS {
        return Err(AmortizationError::InvalidInput {
            field: "periods".into(),
            reason: format!("{periods} periods exceeds the maximum of {MAX_PERIODS}"),
        });
    }
    if installment <= Decimal::ZERO {
        return Err(AmortizationError::NonAmortizingLoan {
            installment,
            first_period_interest: in_range(
                principal.checked_mul(monthly_rate),
                "principal",
                "first month's interest",
            )?,
        });
    }

    debug!("schedule: P={principal} r={monthly_rate} n={periods} E={installment}");

    let drift_floor = principal * DRIFT_TOLERANCE;
    let mut warnings: Vec<String> = Vec::new();
    let mut entries = Vec::with_capacity(periods as usize);
    let mut balance = principal;
    let mut overshoot: Option<(u32, Money)> = None;
    let mut negative_principal_periods: u32 = 0;

    for period in 1..=periods {
        let interest = in_range(
            balance.checked_mul(monthly_rate),
            "principal",
            "monthly interest",
        )?;
        let principal_part = in_range(
            installment.checked_sub(interest),
            "installment",
            "principal component",
        )?;
        if principal_part < Decimal::ZERO {
            negative_principal_periods += 1;
        }

        let raw_balance = in_range(
            balance.checked_sub(principal_part),
            "principal",
            "remaining balance",
        )?;
        balance = if raw_balance < drift_floor {
            if raw_balance < -drift_floor && overshoot.is_none() {
                overshoot = Some((period, -raw_balance));
            }
            Decimal::ZERO
        } else {
            raw_balance
        };

        entries.push(ScheduleEntry {
            period,
            installment,
            principal: principal_part,
            interest,
            balance,
        });
    }

    if let Some((period, amount)) = overshoot {
        warn!("balance overshot zero by {amount} at period {period}; clamped");
        warnings.push(format!(
            "Period {period}: installment overpays the remaining balance by {amount}; balance clamped to 0"
        ));
    }
    if negative_principal_periods > 0 {
        warnings.push(format!(
            "{negative_principal_periods} period(s) have interest above the installment; the balance grows in those periods"
        ));
    }

    Ok((entries, warnings))
}
