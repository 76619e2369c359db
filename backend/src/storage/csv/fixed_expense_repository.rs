//! # CSV Fixed Expense Repository
//!
//! Stores the fixed expense set (rent, utilities, subscriptions) in
//! `fixed_expenses.csv`. The whole file is read and rewritten on every
//! mutation; the set is small enough that this stays cheap.

use std::fs::File;
use std::io::{BufReader, BufWriter};

use anyhow::{anyhow, Result};
use csv::{Reader, Writer};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::domain::models::FixedExpense;
use crate::storage::traits::FixedExpenseStorage;

use super::connection::CsvConnection;

/// CSV record structure for fixed expenses
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FixedExpenseRecord {
    id: String,
    name: String,
    parent_category: String,
    amount: u64,
}

impl From<&FixedExpense> for FixedExpenseRecord {
    fn from(expense: &FixedExpense) -> Self {
        FixedExpenseRecord {
            id: expense.id.clone(),
            name: expense.name.clone(),
            parent_category: expense.parent_category.clone().unwrap_or_default(),
            amount: expense.amount,
        }
    }
}

impl From<FixedExpenseRecord> for FixedExpense {
    fn from(record: FixedExpenseRecord) -> Self {
        FixedExpense {
            id: record.id,
            name: record.name,
            parent_category: if record.parent_category.is_empty() {
                None
            } else {
                Some(record.parent_category)
            },
            amount: record.amount,
        }
    }
}

/// CSV-based fixed expense repository
#[derive(Clone)]
pub struct FixedExpenseRepository {
    connection: CsvConnection,
}

impl FixedExpenseRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<FixedExpense>> {
        let path = self.connection.fixed_expenses_file_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut expenses = Vec::new();
        for result in csv_reader.deserialize::<FixedExpenseRecord>() {
            expenses.push(result?.into());
        }
        Ok(expenses)
    }

    fn write_all(&self, expenses: &[FixedExpense]) -> Result<()> {
        let path = self.connection.fixed_expenses_file_path();
        let temp_path = path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(temp_file));
            for expense in expenses {
                csv_writer.serialize(FixedExpenseRecord::from(expense))?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &path)?;
        debug!("Wrote {} fixed expenses to {:?}", expenses.len(), path);
        Ok(())
    }
}

impl FixedExpenseStorage for FixedExpenseRepository {
    fn list_fixed_expenses(&self) -> Result<Vec<FixedExpense>> {
        self.read_all()
    }

    fn store_fixed_expense(&self, expense: &FixedExpense) -> Result<()> {
        let mut expenses = self.read_all()?;
        expenses.push(expense.clone());
        self.write_all(&expenses)
    }

    fn update_fixed_expense(&self, expense: &FixedExpense) -> Result<()> {
        let mut expenses = self.read_all()?;
        let slot = expenses
            .iter_mut()
            .find(|e| e.id == expense.id)
            .ok_or_else(|| anyhow!("Fixed expense not found: {}", expense.id))?;
        *slot = expense.clone();
        self.write_all(&expenses)
    }

    fn replace_fixed_expenses(&self, expenses: &[FixedExpense]) -> Result<()> {
        self.write_all(expenses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (FixedExpenseRepository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection = CsvConnection::new(temp_dir.path()).expect("Failed to create connection");
        (FixedExpenseRepository::new(connection), temp_dir)
    }

    fn arriendo() -> FixedExpense {
        FixedExpense {
            id: "fixed-1".to_string(),
            name: "Arriendo".to_string(),
            parent_category: Some("Vivienda".to_string()),
            amount: 500_000,
        }
    }

    #[test]
    fn store_and_list_preserves_order() {
        let (repo, _temp_dir) = setup();
        repo.store_fixed_expense(&arriendo()).expect("store failed");
        repo.store_fixed_expense(&FixedExpense {
            id: "fixed-2".to_string(),
            name: "Internet".to_string(),
            parent_category: None,
            amount: 90_000,
        })
        .expect("store failed");

        let listed = repo.list_fixed_expenses().expect("list failed");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Arriendo");
        assert_eq!(listed[1].name, "Internet");
        assert_eq!(listed[1].parent_category, None);
    }

    #[test]
    fn update_changes_amount_in_place() {
        let (repo, _temp_dir) = setup();
        repo.store_fixed_expense(&arriendo()).expect("store failed");

        let mut updated = arriendo();
        updated.amount = 550_000;
        repo.update_fixed_expense(&updated).expect("update failed");

        let listed = repo.list_fixed_expenses().expect("list failed");
        assert_eq!(listed[0].amount, 550_000);
    }

    #[test]
    fn update_unknown_id_is_an_error() {
        let (repo, _temp_dir) = setup();
        assert!(repo.update_fixed_expense(&arriendo()).is_err());
    }

    #[test]
    fn replace_swaps_the_whole_set() {
        let (repo, _temp_dir) = setup();
        repo.store_fixed_expense(&arriendo()).expect("store failed");

        repo.replace_fixed_expenses(&[FixedExpense {
            id: "fixed-9".to_string(),
            name: "Gimnasio".to_string(),
            parent_category: None,
            amount: 80_000,
        }])
        .expect("replace failed");

        let listed = repo.list_fixed_expenses().expect("list failed");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Gimnasio");
    }
}
