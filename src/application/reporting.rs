use serde::{Deserialize, Serialize};

use crate::domain::{Cents, Kind};

/// Per-category slice of one kind's total, sized for bar/pie charts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub kind: Kind,
    pub total: Cents,
    pub count: i64,
    /// Share of this kind's total, 0.0 to 100.0
    pub percentage: f64,
}

/// Headline numbers for a user's ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_income: Cents,
    pub total_expense: Cents,
    pub net: Cents,
}
