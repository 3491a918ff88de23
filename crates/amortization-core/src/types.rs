use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Currency-agnostic; the label is applied at display time.
pub type Money = Decimal;

/// Periodic rates expressed as decimals (0.01 = 1% per month).
pub type Rate = Decimal;

/// Annual rates as entered by the user (10 = 10% p.a.).
pub type Percent = Decimal;

/// Year counts, fractional years allowed
pub type Years = Decimal;

/// Month counts, fractional when produced by the term solver
pub type Months = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Wrap a computation result with its methodology, assumptions and warnings.
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
