//! Quarterly budget allocations and their client-side aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::number::number_or_string;

/// One quarterly allocation for a dependency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: i64,
    #[serde(rename = "dependencia_id")]
    pub dependency_id: i64,
    #[serde(rename = "año")]
    pub year: i32,
    #[serde(rename = "trimestre")]
    pub quarter: u8,
    #[serde(rename = "monto_asignado", deserialize_with = "number_or_string")]
    pub amount: f64,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Budget {
    /// `created_at` parsed as RFC 3339, when present and well-formed.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Body of `POST dependencias/{id}/presupuestos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateBudgetRequest {
    #[serde(rename = "año")]
    pub year: i32,
    #[serde(rename = "trimestre")]
    pub quarter: u8,
    #[serde(rename = "monto_asignado")]
    pub amount: f64,
}

/// Budgets of one year plus their total and average.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetSummary {
    pub budgets: Vec<Budget>,
    pub total: f64,
    pub average: f64,
}

/// Keep the budgets whose year equals `year` and aggregate them.
///
/// The average of an empty selection is 0.
pub fn summarize(budgets: &[Budget], year: i32) -> BudgetSummary {
    let filtered: Vec<Budget> = budgets.iter().filter(|b| b.year == year).cloned().collect();
    let total: f64 = filtered.iter().map(|b| b.amount).sum();
    let average = if filtered.is_empty() {
        0.0
    } else {
        total / filtered.len() as f64
    };

    BudgetSummary {
        budgets: filtered,
        total,
        average,
    }
}

/// Map a free-text quarter label ("Q1 (Ene-Mar)", "Q3", ...) to 1..=4.
///
/// Anything that does not mention Q1, Q2 or Q3 becomes quarter 4,
/// including the empty string.
pub fn quarter_from_label(label: &str) -> u8 {
    if label.contains("Q1") {
        1
    } else if label.contains("Q2") {
        2
    } else if label.contains("Q3") {
        3
    } else {
        4
    }
}
