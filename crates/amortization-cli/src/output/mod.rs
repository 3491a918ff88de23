pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use amortization_core::CurrencyCode;
use serde_json::{Map, Value};

use crate::OutputFormat;

/// Result fields that hold money and get a currency label in human-facing output.
pub const MONEY_FIELDS: [&str; 9] = [
    "principal",
    "installment",
    "interest",
    "balance",
    "total_principal",
    "total_interest",
    "total_paid",
    "overpayment",
    "amount",
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value, currency: CurrencyCode) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value, currency),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// First field of the result object holding rows (an array of objects), if any.
pub fn row_field(result: &Map<String, Value>) -> Option<(&str, &[Value])> {
    result.iter().find_map(|(key, val)| match val {
        Value::Array(rows) if rows.first().is_some_and(Value::is_object) => {
            Some((key.as_str(), rows.as_slice()))
        }
        _ => None,
    })
}
