//! # CSV Variable Expense Repository
//!
//! Stores day-to-day chat-registered expenses in `variable_expenses.csv`.
//! Timestamps are persisted as RFC 3339 with the Bogotá offset so the
//! local calendar date survives the roundtrip.
//!
//! ## CSV Format
//!
//! ```csv
//! id,description,amount,category,created_at
//! 3f2a...,Almuerzo,15000,Alimentación,2026-03-10T12:30:00-05:00
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};

use anyhow::Result;
use chrono::{DateTime, NaiveDate};
use csv::{Reader, Writer};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::domain::models::{Category, VariableExpense};
use crate::storage::traits::VariableExpenseStorage;

use super::connection::CsvConnection;

/// CSV record structure for variable expenses
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VariableExpenseRecord {
    id: String,
    description: String,
    amount: u64,
    category: String,
    created_at: String,
}

impl From<&VariableExpense> for VariableExpenseRecord {
    fn from(expense: &VariableExpense) -> Self {
        VariableExpenseRecord {
            id: expense.id.clone(),
            description: expense.description.clone(),
            amount: expense.amount,
            category: expense.category.to_string(),
            created_at: expense.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<VariableExpenseRecord> for VariableExpense {
    type Error = anyhow::Error;

    fn try_from(record: VariableExpenseRecord) -> Result<Self> {
        let category: Category = record
            .category
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;
        let created_at = DateTime::parse_from_rfc3339(&record.created_at)?;

        Ok(VariableExpense {
            id: record.id,
            description: record.description,
            amount: record.amount,
            category,
            created_at,
        })
    }
}

/// CSV-based variable expense repository
#[derive(Clone)]
pub struct VariableExpenseRepository {
    connection: CsvConnection,
}

impl VariableExpenseRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read all expenses, sorted most recent first. Rows that parse as CSV
    /// but not as a valid expense (bad category, bad timestamp) are skipped
    /// with a warning; a structurally broken file fails the whole read.
    fn read_all(&self) -> Result<Vec<VariableExpense>> {
        let path = self.connection.variable_expenses_file_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut expenses = Vec::new();
        for result in csv_reader.deserialize::<VariableExpenseRecord>() {
            let record = result?;
            match VariableExpense::try_from(record) {
                Ok(expense) => expenses.push(expense),
                Err(e) => {
                    warn!("Failed to parse variable expense record: {}. Skipping.", e);
                }
            }
        }

        expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(expenses)
    }

    fn write_all(&self, expenses: &[VariableExpense]) -> Result<()> {
        let path = self.connection.variable_expenses_file_path();
        let temp_path = path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(temp_file));
            for expense in expenses {
                csv_writer.serialize(VariableExpenseRecord::from(expense))?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &path)?;
        debug!("Wrote {} variable expenses to {:?}", expenses.len(), path);
        Ok(())
    }
}

impl VariableExpenseStorage for VariableExpenseRepository {
    fn store_variable_expense(&self, expense: &VariableExpense) -> Result<()> {
        let mut expenses = self.read_all()?;
        expenses.push(expense.clone());
        self.write_all(&expenses)
    }

    fn list_variable_expenses(&self, limit: Option<u32>) -> Result<Vec<VariableExpense>> {
        let mut expenses = self.read_all()?;
        if let Some(limit) = limit {
            expenses.truncate(limit as usize);
        }
        Ok(expenses)
    }

    fn list_variable_expenses_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<VariableExpense>> {
        let expenses = self
            .read_all()?
            .into_iter()
            .filter(|e| {
                let date = e.created_at.date_naive();
                date >= start && date <= end
            })
            .collect();
        Ok(expenses)
    }

    fn delete_variable_expense(&self, expense_id: &str) -> Result<bool> {
        let mut expenses = self.read_all()?;
        let before = expenses.len();
        expenses.retain(|e| e.id != expense_id);

        if expenses.len() == before {
            return Ok(false);
        }

        self.write_all(&expenses)?;
        Ok(true)
    }
}
