mod commands;
mod input;
mod output;

use amortization_core::CurrencyCode;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::export::ExportArgs;
use commands::loan::{InstallmentArgs, LoanArgs, ScheduleArgs, TermArgs};

/// Fixed-rate loan installment, term and amortization schedule calculations
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "Fixed-rate loan installment, term and amortization schedule calculations",
    long_about = "A CLI for fixed-rate annuity loans with decimal precision. Solves for the \
                  monthly installment (EMI) or the loan term, builds the month-by-month \
                  amortization schedule, derives chart series and exports the schedule \
                  as a spreadsheet-style CSV. Set RUST_LOG=debug for diagnostics."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Currency label for displayed amounts (display only, no conversion)
    #[arg(long, default_value = "INR", global = true)]
    currency: CurrencyCode,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly installment from principal, rate and term
    Installment(InstallmentArgs),
    /// Loan term in months from principal, rate and installment
    Term(TermArgs),
    /// Amortization schedule for a solved loan (principal, rate, periods, installment)
    Schedule(ScheduleArgs),
    /// Solve for the missing quantity and build the full schedule
    Calculate(LoanArgs),
    /// Principal/interest/balance series for plotting
    Charts(LoanArgs),
    /// Export the schedule with summary totals to a CSV file
    Export(ExportArgs),
    /// List display currencies
    Currencies,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let currency = cli.currency;

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Installment(args) => commands::loan::run_installment(args),
        Commands::Term(args) => commands::loan::run_term(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Calculate(args) => commands::loan::run_calculate(args, currency),
        Commands::Charts(args) => commands::loan::run_charts(args, currency),
        Commands::Export(args) => commands::export::run_export(args, currency),
        Commands::Currencies => commands::currency::run_currencies(),
        Commands::Version => {
            println!("emi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            // A currency named in the input file wins over the flag
            let display_currency = value["result"]["currency"]
                .as_str()
                .and_then(|code| code.parse().ok())
                .unwrap_or(currency);
            output::format_output(&cli.output, &value, display_currency);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
