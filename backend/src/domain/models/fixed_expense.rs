//! Domain models for fixed (recurring) expenses and their per-month paid
//! status.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A recurring monthly obligation (rent, subscriptions).
///
/// The paid/unpaid flag does NOT live here: it is month-scoped and tracked
/// separately in [`MonthlyPaidStatus`], keyed by (expense id, year, month).
/// Grouping is an explicit optional field rather than a "Category: Item"
/// naming convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedExpense {
    /// Opaque identifier, stable across months
    pub id: String,
    pub name: String,
    pub parent_category: Option<String>,
    /// Amount in pesos
    pub amount: u64,
}

/// A fixed expense as entered in the editor or onboarding, before an id is
/// assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedExpenseInput {
    pub name: String,
    pub parent_category: Option<String>,
    pub amount: u64,
}

/// Paid status of one fixed expense for one calendar month.
///
/// Absence of a record for (expense id, year, month) means unpaid. The same
/// expense can be paid in March and unpaid in April.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPaidStatus {
    pub expense_id: String,
    pub year: i32,
    pub month: u32,
    pub paid: bool,
    /// When the expense was marked paid, if it is
    pub paid_at: Option<DateTime<FixedOffset>>,
}
