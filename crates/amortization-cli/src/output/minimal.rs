use serde_json::Value;

/// Print just the key answer value from the output.
///
/// A full calculation answers whichever quantity was solved for; other
/// results fall back to a priority list, then to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        let solved = match map.get("mode") {
            Some(Value::Object(mode)) if mode.contains_key("term") => Some("installment"),
            Some(Value::Object(mode)) if mode.contains_key("installment") => Some("term_months"),
            _ => None,
        };

        let priority_keys = ["installment", "term_months", "file", "total_paid"];
        for key in solved.iter().chain(priority_keys.iter()) {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
