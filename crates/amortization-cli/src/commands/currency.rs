use serde_json::Value;

use amortization_core::CurrencyCode;

/// List the display currencies with their symbols.
pub fn run_currencies() -> Result<Value, Box<dyn std::error::Error>> {
    let labels: Vec<_> = CurrencyCode::ALL.iter().map(|c| c.label()).collect();
    Ok(serde_json::json!({ "result": labels }))
}
