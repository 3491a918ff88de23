use napi::Result as NapiResult;
use napi_derive::napi;

use amortization_core::amortization;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Solvers
// ---------------------------------------------------------------------------

#[napi]
pub fn monthly_installment(input_json: String) -> NapiResult<String> {
    let input: amortization::InstallmentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::calculate_installment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn loan_term(input_json: String) -> NapiResult<String> {
    let input: amortization::TermInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::calculate_term(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

#[napi]
pub fn generate_schedule(input_json: String) -> NapiResult<String> {
    let input: amortization::ScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::build_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_loan(input_json: String) -> NapiResult<String> {
    let input: amortization::LoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::calculate_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn chart_series(input_json: String) -> NapiResult<String> {
    let input: amortization::LoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::calculate_loan(&input).map_err(to_napi_error)?;
    let series = amortization_core::charts::chart_series(&output.result.schedule)
        .map_err(to_napi_error)?;
    serde_json::to_string(&series).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

#[napi]
pub fn list_currencies() -> NapiResult<String> {
    let labels: Vec<_> = amortization_core::CurrencyCode::ALL
        .iter()
        .map(|c| c.label())
        .collect();
    serde_json::to_string(&labels).map_err(to_napi_error)
}

#[napi]
pub fn format_amount(amount: String, currency: String) -> NapiResult<String> {
    let amount: rust_decimal::Decimal = amount.trim().parse().map_err(to_napi_error)?;
    let currency: amortization_core::CurrencyCode = currency.parse().map_err(to_napi_error)?;
    Ok(currency.format_amount(amount))
}
