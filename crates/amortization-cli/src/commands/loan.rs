use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use amortization_core::amortization::{
    self, InstallmentInput, LoanInput, LoanMode, ScheduleInput, TermInput,
};
use amortization_core::charts;
use amortization_core::types::with_metadata;
use amortization_core::CurrencyCode;

use crate::input;

/// Arguments for the monthly installment calculation
#[derive(Args)]
pub struct InstallmentArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long, allow_hyphen_values = true)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (10 = 10% p.a.)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,

    /// Loan term in years (fractional allowed)
    #[arg(long, allow_hyphen_values = true)]
    pub years: Option<Decimal>,
}

pub fn run_installment(args: InstallmentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let installment_input: InstallmentInput =
        match input::read_structured(args.input.as_deref())? {
            Some(parsed) => parsed,
            None => InstallmentInput {
                principal: args
                    .principal
                    .ok_or("--principal is required (or provide --input)")?,
                annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
                term_years: args.years.ok_or("--years is required (or provide --input)")?,
            },
        };

    let result = amortization::calculate_installment(&installment_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the loan term calculation
#[derive(Args)]
pub struct TermArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long, allow_hyphen_values = true)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,

    /// Monthly installment the borrower can pay
    #[arg(long, allow_hyphen_values = true)]
    pub installment: Option<Decimal>,
}

pub fn run_term(args: TermArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let term_input: TermInput = match input::read_structured(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => TermInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            installment: args
                .installment
                .ok_or("--installment is required (or provide --input)")?,
        },
    };

    let result = amortization::calculate_term(&term_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for a raw schedule from an already-solved loan
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long, allow_hyphen_values = true)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,

    /// Number of monthly periods
    #[arg(long)]
    pub periods: Option<u32>,

    /// Fixed monthly installment
    #[arg(long, allow_hyphen_values = true)]
    pub installment: Option<Decimal>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: ScheduleInput = match input::read_structured(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
            ScheduleInput {
                principal: args
                    .principal
                    .ok_or("--principal is required (or provide --input)")?,
                monthly_rate: amortization::monthly_rate(rate),
                periods: args.periods.ok_or("--periods is required (or provide --input)")?,
                installment: args
                    .installment
                    .ok_or("--installment is required (or provide --input)")?,
            }
        }
    };

    let result = amortization::build_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Loan described by principal, rate and exactly one of term or installment
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long, allow_hyphen_values = true)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,

    /// Loan term in years; solves for the installment
    #[arg(long, allow_hyphen_values = true, conflicts_with = "installment")]
    pub years: Option<Decimal>,

    /// Monthly installment; solves for the term
    #[arg(long, allow_hyphen_values = true)]
    pub installment: Option<Decimal>,
}

impl LoanArgs {
    /// Build the calculation input from a file, stdin, or flags in that order.
    pub fn into_input(
        self,
        currency: CurrencyCode,
    ) -> Result<LoanInput, Box<dyn std::error::Error>> {
        if let Some(parsed) = input::read_structured::<LoanInput>(self.input.as_deref())? {
            return Ok(parsed.with_default_currency(currency));
        }

        let mode = match (self.years, self.installment) {
            (Some(years), None) => LoanMode::Term { years },
            (None, Some(amount)) => LoanMode::Installment { amount },
            _ => return Err("exactly one of --years or --installment is required".into()),
        };

        Ok(LoanInput {
            principal: self
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: self.rate.ok_or("--rate is required (or provide --input)")?,
            mode,
            currency: Some(currency),
        })
    }
}

pub fn run_calculate(
    args: LoanArgs,
    currency: CurrencyCode,
) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = args.into_input(currency)?;
    let result = amortization::calculate_loan(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_charts(
    args: LoanArgs,
    currency: CurrencyCode,
) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let loan_input = args.into_input(currency)?;
    let calculation = amortization::calculate_loan(&loan_input)?;
    let series = charts::chart_series(&calculation.result.schedule)?;

    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Chart series derived from the amortization schedule",
        &loan_input,
        calculation.warnings,
        elapsed,
        series,
    );
    Ok(serde_json::to_value(output)?)
}
