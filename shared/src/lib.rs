use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Author of a chat transcript message, for rendering purposes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MessageAuthor {
    User,
    Assistant,
}

/// A single message in the chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub author: MessageAuthor,
    /// Plain text content (may contain newlines and emoji)
    pub content: String,
    /// Timestamp with timezone (RFC 3339)
    pub timestamp: DateTime<FixedOffset>,
}

/// A fixed expense together with its paid status resolved for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedExpenseStatus {
    pub id: String,
    pub name: String,
    /// Optional grouping category ("Hogar", "Suscripciones", ...)
    pub parent_category: Option<String>,
    /// Amount in Colombian pesos (no sub-unit precision)
    pub amount: u64,
    pub paid: bool,
}

/// Per-category spending total for one month, used for breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: u64,
}

/// Dashboard projection of the budget state for one displayed month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub year: i32,
    pub month: u32,
    /// Monthly income in pesos
    pub income: u64,
    /// Monthly savings target, subtracted from available funds
    pub savings_target: u64,
    /// income - savings - all fixed (paid or not) - variable this month.
    /// May be negative when the user overspends.
    pub available: i64,
    /// Sum of fixed expenses still unpaid for this month
    pub pending_fixed_total: u64,
    /// Sum of variable expenses recorded this month
    pub variable_total: u64,
    pub fixed_expenses: Vec<FixedExpenseStatus>,
    /// Sorted by descending total
    pub category_totals: Vec<CategoryTotal>,
}

/// One fixed expense as entered during onboarding or in the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingFixedExpense {
    pub name: String,
    pub parent_category: Option<String>,
    pub amount: u64,
}

/// Payload produced by the onboarding flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingRequest {
    pub income: u64,
    pub savings_target: u64,
    pub fixed_expenses: Vec<OnboardingFixedExpense>,
}
