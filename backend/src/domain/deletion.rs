//! Deletion resolution: pick the single expense a delete request refers to.
//!
//! Operates on expenses ordered most-recent-first. First match wins - the
//! resolver never keeps scanning for a "better" match.

use crate::nlu::DeleteTarget;

use super::models::VariableExpense;

/// Extract a digit run from the search term as a candidate amount
/// ("el de 8.000" -> 8000).
fn extract_amount(term: &str) -> Option<u64> {
    let digits: String = term.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Resolve a delete target against the existing expenses
/// (most-recent-first). `None` means nothing matched - the caller reports
/// the unresolved term back to the user.
pub fn resolve<'a>(
    target: &DeleteTarget,
    expenses: &'a [VariableExpense],
) -> Option<&'a VariableExpense> {
    let term = match target {
        DeleteTarget::MostRecent => return expenses.first(),
        DeleteTarget::Search(term) if term.trim().is_empty() => return expenses.first(),
        DeleteTarget::Search(term) => term.trim(),
    };

    let term_lower = term.to_lowercase();
    let amount = extract_amount(term);

    expenses.iter().find(|expense| {
        expense.description.to_lowercase().contains(&term_lower)
            || amount.map_or(false, |a| expense.amount == a)
    })
}
