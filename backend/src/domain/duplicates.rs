//! Advisory duplicate detection for new expenses.
//!
//! A candidate is a duplicate when it was recorded the same calendar day AND
//! either description contains the other (case-insensitive) or the amount is
//! identical. Detection never blocks insertion - the orchestrator records the
//! new expense anyway and warns the user, who can "borrar último" if it was
//! an accident.

use chrono::NaiveDate;

use super::models::VariableExpense;

/// Find an existing same-day expense that looks like the one about to be
/// recorded.
pub fn find_duplicate<'a>(
    description: &str,
    amount: u64,
    today: NaiveDate,
    existing: &'a [VariableExpense],
) -> Option<&'a VariableExpense> {
    let new_lower = description.to_lowercase();
    existing.iter().find(|candidate| {
        if candidate.created_at.date_naive() != today {
            return false;
        }
        let candidate_lower = candidate.description.to_lowercase();
        let similar_description =
            candidate_lower.contains(&new_lower) || new_lower.contains(&candidate_lower);
        similar_description || candidate.amount == amount
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn expense(description: &str, amount: u64, day: u32) -> VariableExpense {
        let bogota = FixedOffset::west_opt(5 * 3600).unwrap();
        VariableExpense {
            id: format!("exp-{description}-{amount}"),
            description: description.to_string(),
            amount,
            category: crate::domain::categorizer::categorize(description),
            created_at: bogota.with_ymd_and_hms(2026, 3, day, 12, 30, 0).unwrap(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn same_day_same_description_and_amount() {
        let existing = vec![expense("Almuerzo", 15_000, 10)];
        let dup = find_duplicate("Almuerzo", 15_000, today(), &existing);
        assert_eq!(dup, Some(&existing[0]));
    }

    #[test]
    fn same_amount_alone_matches() {
        let existing = vec![expense("Almuerzo", 15_000, 10)];
        assert!(find_duplicate("Cena", 15_000, today(), &existing).is_some());
    }

    #[test]
    fn description_containment_either_way() {
        let existing = vec![expense("Almuerzo corrientazo", 15_000, 10)];
        assert!(find_duplicate("almuerzo", 8_000, today(), &existing).is_some());
        let existing = vec![expense("uber", 8_000, 10)];
        assert!(find_duplicate("Uber al trabajo", 12_000, today(), &existing).is_some());
    }

    #[test]
    fn different_day_never_matches() {
        let existing = vec![expense("Almuerzo", 15_000, 9)];
        assert!(find_duplicate("Almuerzo", 8_000, today(), &existing).is_none());
    }

    #[test]
    fn unrelated_expense_does_not_match() {
        let existing = vec![expense("Uber", 8_000, 10)];
        assert!(find_duplicate("Almuerzo", 15_000, today(), &existing).is_none());
    }
}
