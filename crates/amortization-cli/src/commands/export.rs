use clap::Args;
use serde_json::Value;
use std::fs::File;
use std::io;
use std::path::PathBuf;

use amortization_core::amortization::{self, LoanCalculation, LoanMode};
use amortization_core::CurrencyCode;

use crate::commands::loan::LoanArgs;

/// Arguments for exporting a schedule as a spreadsheet-style CSV file
#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Output path (defaults to EMI_Schedule_<CODE>_<YYYY-MM-DD>.csv)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

pub fn run_export(
    args: ExportArgs,
    currency: CurrencyCode,
) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = args.loan.into_input(currency)?;
    let calculation = amortization::calculate_loan(&loan_input)?;
    let calc = &calculation.result;

    let path = args.file.unwrap_or_else(|| default_file_name(calc.currency));
    let file = File::create(&path)
        .map_err(|e| format!("Failed to create '{}': {}", path.display(), e))?;
    let rows = write_spreadsheet(file, calc)?;
    log::info!("wrote {rows} rows to {}", path.display());

    Ok(serde_json::json!({
        "result": {
            "file": path.display().to_string(),
            "rows": rows,
            "periods": calc.periods,
            "currency": calc.currency,
        },
        "warnings": calculation.warnings,
    }))
}

/// `EMI_Schedule_<CODE>_<YYYY-MM-DD>.csv` for today's date.
pub fn default_file_name(currency: CurrencyCode) -> PathBuf {
    let today = chrono::Local::now().format("%Y-%m-%d");
    PathBuf::from(format!("EMI_Schedule_{}_{}.csv", currency.code(), today))
}

/// Write loan details, the monthly breakdown and summary totals as one sheet.
/// Returns the number of records written.
pub fn write_spreadsheet<W: io::Write>(
    writer: W,
    calc: &LoanCalculation,
) -> Result<usize, Box<dyn std::error::Error>> {
    let money = |amount| calc.currency.format_amount(amount);
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    let mut rows = 0usize;
    let mut record = |fields: &[String]| -> Result<(), csv::Error> {
        rows += 1;
        wtr.write_record(fields)
    };

    record(&["EMI Schedule".into()])?;
    record(&[String::new()])?;
    record(&["Loan Details".into()])?;
    record(&["Principal Amount".into(), money(calc.principal)])?;
    record(&[
        "Interest Rate".into(),
        format!("{}% per annum", calc.annual_rate_percent.normalize()),
    ])?;
    match &calc.mode {
        LoanMode::Term { years } => {
            record(&["Loan Tenure".into(), format!("{} years", years.normalize())])?;
            record(&["Monthly EMI".into(), money(calc.installment)])?;
        }
        LoanMode::Installment { amount } => {
            record(&["Monthly EMI".into(), money(*amount)])?;
            record(&[
                "Loan Tenure".into(),
                format!(
                    "{} years {} months",
                    calc.term_breakdown.years, calc.term_breakdown.months
                ),
            ])?;
        }
    }
    record(&[String::new()])?;

    record(&["Monthly Breakdown".into()])?;
    record(&[
        "Month".into(),
        "EMI".into(),
        "Principal".into(),
        "Interest".into(),
        "Balance".into(),
    ])?;
    for entry in &calc.schedule {
        record(&[
            entry.period.to_string(),
            money(entry.installment),
            money(entry.principal),
            money(entry.interest),
            money(entry.balance),
        ])?;
    }
    record(&[String::new()])?;

    record(&["Summary".into()])?;
    record(&["Total Principal".into(), money(calc.principal)])?;
    record(&["Total Interest".into(), money(calc.summary.total_interest)])?;
    record(&["Total Amount".into(), money(calc.summary.total_paid)])?;

    wtr.flush()?;
    Ok(rows)
}
