use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::schedule::{simulate, summarize, ScheduleEntry, ScheduleSummary};
use super::{
    in_range, loan_term, monthly_installment, monthly_rate, MAX_PERIODS, MONTHS_PER_YEAR,
};
use crate::currency::CurrencyCode;
use crate::error::AmortizationError;
use crate::types::*;
use crate::AmortizationResult;

/// Solver term counts within this distance of a whole month are treated as whole.
const TERM_SNAP_TOLERANCE: Decimal = dec!(0.000001);

/// Which quantity the caller knows; the other one is solved for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanMode {
    /// Loan term in years is known; solve for the monthly installment
    Term { years: Years },
    /// Monthly installment is known; solve for the term
    Installment { amount: Money },
}

/// Input for a full loan calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub mode: LoanMode,
    /// Display label only; never used in the arithmetic. Unset means the
    /// caller's default, see [`LoanInput::with_default_currency`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
}

impl LoanInput {
    /// Fill in `currency` when the input did not name one.
    pub fn with_default_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency.get_or_insert(currency);
        self
    }
}

/// Whole years and leftover months of a period count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermBreakdown {
    pub years: u32,
    pub months: u32,
}

impl TermBreakdown {
    pub fn from_periods(periods: u32) -> Self {
        TermBreakdown {
            years: periods / 12,
            months: periods % 12,
        }
    }
}

/// Output of a full loan calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanCalculation {
    pub mode: LoanMode,
    pub currency: CurrencyCode,
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub monthly_rate: Rate,
    pub installment: Money,
    /// Exact (possibly fractional) term in months
    pub term_months: Months,
    pub term_years: Years,
    /// Whole periods in the schedule
    pub periods: u32,
    pub term_breakdown: TermBreakdown,
    pub schedule: Vec<ScheduleEntry>,
    pub summary: ScheduleSummary,
}

/// Solve for the missing quantity and build the full schedule.
///
/// A fractional term is rounded up to whole periods for the schedule; the
/// exact figure is kept in `term_months` for display.
pub fn calculate_loan(
    input: &LoanInput,
) -> AmortizationResult<ComputationOutput<LoanCalculation>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let rate = monthly_rate(input.annual_rate_percent);
    let (installment, term_months, methodology) = match &input.mode {
        LoanMode::Term { years } => (
            monthly_installment(input.principal, input.annual_rate_percent, *years)?,
            in_range(
                years.checked_mul(MONTHS_PER_YEAR),
                "term_years",
                "term in months",
            )?,
            "Annuity installment from principal, rate and term",
        ),
        LoanMode::Installment { amount } => (
            *amount,
            loan_term(input.principal, input.annual_rate_percent, *amount)?,
            "Loan term from principal, rate and installment (inverted annuity)",
        ),
    };

    let periods = whole_periods(term_months)?;
    if Decimal::from(periods) - term_months > TERM_SNAP_TOLERANCE {
        warnings.push(format!(
            "Term of {} months rounded up to {periods} periods; the final installment overpays",
            term_months.round_dp(4)
        ));
    }

    let (schedule, schedule_warnings) = simulate(input.principal, rate, periods, installment)?;
    warnings.extend(schedule_warnings);
    let summary = summarize(input.principal, &schedule)?;

    let output = LoanCalculation {
        mode: input.mode.clone(),
        currency: input.currency.unwrap_or_default(),
        principal: input.principal,
        annual_rate_percent: input.annual_rate_percent,
        monthly_rate: rate,
        installment,
        term_months,
        term_years: term_months / MONTHS_PER_YEAR,
        periods,
        term_breakdown: TermBreakdown::from_periods(periods),
        schedule,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_percent": input.annual_rate_percent.to_string(),
            "mode": input.mode,
            "rounding": "ceiling to whole monthly periods",
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Round a solver month count up to a schedulable number of periods.
pub fn whole_periods(term_months: Months) -> AmortizationResult<u32> {
    let nearest = term_months.round();
    let whole = if (term_months - nearest).abs() <= TERM_SNAP_TOLERANCE {
        nearest
    } else {
        term_months.ceil()
    };

    if whole <= Decimal::ZERO {
        return Err(AmortizationError::InvalidTerm {
            context: format!("{term_months} months rounds to no periods"),
        });
    }

    match whole.to_u32() {
        Some(periods) if periods <= MAX_PERIODS => Ok(periods),
        _ => Err(AmortizationError::InvalidInput {
            field: "term".into(),
            reason: format!("{whole} periods exceeds the maximum of {MAX_PERIODS}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn term_input() -> LoanInput {
        LoanInput {
            principal: dec!(1_000_000),
            annual_rate_percent: dec!(10),
            mode: LoanMode::Term { years: dec!(20) },
            currency: None,
        }
    }

    #[test]
    fn test_term_mode() {
        let result = calculate_loan(&term_input()).unwrap();
        let calc = &result.result;
        assert!((calc.installment - dec!(9650.22)).abs() < dec!(0.01));
        assert_eq!(calc.periods, 240);
        assert_eq!(calc.term_months, dec!(240));
        assert_eq!(calc.term_years, dec!(20));
        assert_eq!(calc.schedule.len(), 240);
        assert_eq!(calc.schedule[239].balance, Decimal::ZERO);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn test_installment_mode_recovers_term() {
        let emi = calculate_loan(&term_input()).unwrap().result.installment;
        let input = LoanInput {
            mode: LoanMode::Installment { amount: emi },
            ..term_input()
        };
        let calc = calculate_loan(&input).unwrap().result;
        assert_eq!(calc.periods, 240);
        assert_eq!(calc.term_breakdown, TermBreakdown { years: 20, months: 0 });
        assert!((calc.term_months - dec!(240)).abs() < dec!(0.01));
    }

    #[test]
    fn test_installment_mode_fractional_term_rounds_up() {
        // 10,000 at 0% paying 3,000 a month: 3.33 months -> 4 periods
        let input = LoanInput {
            principal: dec!(10_000),
            annual_rate_percent: Decimal::ZERO,
            mode: LoanMode::Installment { amount: dec!(3_000) },
            currency: Some(CurrencyCode::Usd),
        };
        let result = calculate_loan(&input).unwrap();
        let calc = &result.result;
        assert_eq!(calc.periods, 4);
        assert_eq!(calc.schedule.len(), 4);
        assert_eq!(calc.schedule[3].balance, Decimal::ZERO);
        assert!(result.warnings.iter().any(|w| w.contains("rounded up")));
        assert_eq!(calc.currency, CurrencyCode::Usd);
    }

    #[test]
    fn test_fractional_year_summary_reports_overpayment() {
        // 1.3 years = 15.6 months, scheduled over 16 periods
        let input = LoanInput {
            principal: dec!(100_000),
            annual_rate_percent: dec!(10),
            mode: LoanMode::Term { years: dec!(1.3) },
            currency: None,
        };
        let calc = calculate_loan(&input).unwrap().result;
        assert_eq!(calc.periods, 16);
        let summary = &calc.summary;
        assert!(summary.total_principal > dec!(100_000));
        assert!(summary.overpayment > Decimal::ZERO);
        let retired = summary.total_principal - summary.overpayment;
        assert!((retired - dec!(100_000)).abs() < dec!(0.000001), "retired {retired}");
    }

    #[test]
    fn test_non_amortizing_installment_mode() {
        let input = LoanInput {
            principal: dec!(100_000),
            annual_rate_percent: dec!(12),
            mode: LoanMode::Installment { amount: dec!(500) },
            currency: None,
        };
        assert!(matches!(
            calculate_loan(&input),
            Err(AmortizationError::NonAmortizingLoan { .. })
        ));
    }

    #[test]
    fn test_term_breakdown() {
        assert_eq!(
            TermBreakdown::from_periods(31),
            TermBreakdown { years: 2, months: 7 }
        );
        assert_eq!(
            TermBreakdown::from_periods(11),
            TermBreakdown { years: 0, months: 11 }
        );
    }

    #[test]
    fn test_whole_periods_snaps_solver_noise() {
        assert_eq!(whole_periods(dec!(240.0000000001)).unwrap(), 240);
        assert_eq!(whole_periods(dec!(239.9999999999)).unwrap(), 240);
        assert_eq!(whole_periods(dec!(30.6)).unwrap(), 31);
    }

    #[test]
    fn test_whole_periods_bounds() {
        assert!(matches!(
            whole_periods(Decimal::ZERO),
            Err(AmortizationError::InvalidTerm { .. })
        ));
        assert!(matches!(
            whole_periods(dec!(1_000_000)),
            Err(AmortizationError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_loan_input_from_json() {
        let input: LoanInput = serde_json::from_str(
            r#"{"principal": "250000", "annual_rate_percent": "6.5",
                "mode": {"term": {"years": "30"}}, "currency": "USD"}"#,
        )
        .unwrap();
        assert_eq!(input.mode, LoanMode::Term { years: dec!(30) });
        assert_eq!(input.currency, Some(CurrencyCode::Usd));
    }

    #[test]
    fn test_default_currency_fills_only_missing() {
        let unset = LoanInput {
            currency: None,
            ..term_input()
        };
        assert_eq!(
            unset.with_default_currency(CurrencyCode::Gbp).currency,
            Some(CurrencyCode::Gbp)
        );

        let named = LoanInput {
            currency: Some(CurrencyCode::Eur),
            ..term_input()
        };
        assert_eq!(
            named.with_default_currency(CurrencyCode::Gbp).currency,
            Some(CurrencyCode::Eur)
        );
    }

    #[test]
    fn test_unset_currency_defaults_in_output() {
        let calc = calculate_loan(&term_input()).unwrap().result;
        assert_eq!(calc.currency, CurrencyCode::Inr);
    }
}
