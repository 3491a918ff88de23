use amortization_core::CurrencyCode;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use tabled::{builder::Builder, Table};

use super::{row_field, MONEY_FIELDS};

/// Format output as tables, labelling money with the selected currency.
pub fn print_table(value: &Value, currency: CurrencyCode) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map, currency);
            } else {
                print_flat_object(map, currency);
            }
        }
        Value::Array(arr) => print_array_table(arr, currency),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>, currency: CurrencyCode) {
    match result {
        Value::Object(res_map) => {
            let rows = row_field(res_map);
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, val) in res_map {
                if rows.is_some_and(|(row_key, _)| row_key == key.as_str()) {
                    continue;
                }
                builder.push_record([key.as_str(), &format_cell(key, val, currency)]);
            }
            println!("{}", Table::from(builder));

            if let Some((_, rows)) = rows {
                println!();
                print_array_table(rows, currency);
            }
        }
        Value::Array(arr) => print_array_table(arr, currency),
        _ => print_flat_object(envelope, currency),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(map: &Map<String, Value>, currency: CurrencyCode) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_cell(key, val, currency)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value], currency: CurrencyCode) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(h.as_str())
                            .map(|v| format_cell(h, v, currency))
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

/// Money fields arrive as decimal strings; anything else is shown as-is.
fn format_cell(key: &str, value: &Value, currency: CurrencyCode) -> String {
    if MONEY_FIELDS.contains(&key) {
        if let Value::String(s) = value {
            if let Ok(amount) = Decimal::from_str(s) {
                return currency.format_amount(amount);
            }
        }
    }
    format_value(value)
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
