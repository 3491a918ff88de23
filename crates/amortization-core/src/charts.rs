//! Time series derived from a schedule, ready for a plotting front end.

use serde::{Deserialize, Serialize};

use crate::amortization::schedule::{column_total, ScheduleEntry};
use crate::types::Money;
use crate::AmortizationResult;

/// Total principal against total interest over the life of the loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrincipalInterestSplit {
    pub total_principal: Money,
    pub total_interest: Money,
}

/// Per-period series plus the overall split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub principal: Vec<Money>,
    pub interest: Vec<Money>,
    pub balance: Vec<Money>,
    pub split: PrincipalInterestSplit,
}

pub fn chart_series(entries: &[ScheduleEntry]) -> AmortizationResult<ChartSeries> {
    Ok(ChartSeries {
        labels: entries.iter().map(|e| format!("Month {}", e.period)).collect(),
        principal: entries.iter().map(|e| e.principal).collect(),
        interest: entries.iter().map(|e| e.interest).collect(),
        balance: entries.iter().map(|e| e.balance).collect(),
        split: PrincipalInterestSplit {
            total_principal: column_total(entries, "principal", |e| e.principal)?,
            total_interest: column_total(entries, "interest", |e| e.interest)?,
        },
    })
}
