//! # CSV Monthly Status Repository
//!
//! Stores per-month paid flags for fixed expenses in
//! `monthly_statuses.csv`, keyed by (expense_id, year, month). A month
//! with no row for an expense means that expense is still unpaid there.

use std::fs::File;
use std::io::{BufReader, BufWriter};

use anyhow::Result;
use chrono::DateTime;
use csv::{Reader, Writer};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::domain::models::MonthlyPaidStatus;
use crate::storage::traits::MonthlyStatusStorage;

use super::connection::CsvConnection;

/// CSV record structure for monthly paid statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MonthlyStatusRecord {
    expense_id: String,
    year: i32,
    month: u32,
    paid: bool,
    paid_at: String,
}

impl From<&MonthlyPaidStatus> for MonthlyStatusRecord {
    fn from(status: &MonthlyPaidStatus) -> Self {
        MonthlyStatusRecord {
            expense_id: status.expense_id.clone(),
            year: status.year,
            month: status.month,
            paid: status.paid,
            paid_at: status
                .paid_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        }
    }
}

impl TryFrom<MonthlyStatusRecord> for MonthlyPaidStatus {
    type Error = anyhow::Error;

    fn try_from(record: MonthlyStatusRecord) -> Result<Self> {
        let paid_at = if record.paid_at.is_empty() {
            None
        } else {
            Some(DateTime::parse_from_rfc3339(&record.paid_at)?)
        };

        Ok(MonthlyPaidStatus {
            expense_id: record.expense_id,
            year: record.year,
            month: record.month,
            paid: record.paid,
            paid_at,
        })
    }
}

/// CSV-based monthly status repository
#[derive(Clone)]
pub struct MonthlyStatusRepository {
    connection: CsvConnection,
}

impl MonthlyStatusRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<MonthlyPaidStatus>> {
        let path = self.connection.monthly_statuses_file_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut statuses = Vec::new();
        for result in csv_reader.deserialize::<MonthlyStatusRecord>() {
            statuses.push(MonthlyPaidStatus::try_from(result?)?);
        }
        Ok(statuses)
    }

    fn write_all(&self, statuses: &[MonthlyPaidStatus]) -> Result<()> {
        let path = self.connection.monthly_statuses_file_path();
        let temp_path = path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(temp_file));
            for status in statuses {
                csv_writer.serialize(MonthlyStatusRecord::from(status))?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &path)?;
        debug!("Wrote {} monthly statuses to {:?}", statuses.len(), path);
        Ok(())
    }
}

impl MonthlyStatusStorage for MonthlyStatusRepository {
    fn get_month_statuses(&self, year: i32, month: u32) -> Result<Vec<MonthlyPaidStatus>> {
        let statuses = self
            .read_all()?
            .into_iter()
            .filter(|s| s.year == year && s.month == month)
            .collect();
        Ok(statuses)
    }

    fn upsert_status(&self, status: &MonthlyPaidStatus) -> Result<()> {
        let mut statuses = self.read_all()?;
        match statuses.iter_mut().find(|s| {
            s.expense_id == status.expense_id && s.year == status.year && s.month == status.month
        }) {
            Some(slot) => *slot = status.clone(),
            None => statuses.push(status.clone()),
        }
        self.write_all(&statuses)
    }

    fn delete_statuses_for_expenses(&self, expense_ids: &[String]) -> Result<()> {
        let mut statuses = self.read_all()?;
        statuses.retain(|s| !expense_ids.contains(&s.expense_id));
        self.write_all(&statuses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use tempfile::TempDir;

    fn setup() -> (MonthlyStatusRepository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection = CsvConnection::new(temp_dir.path()).expect("Failed to create connection");
        (MonthlyStatusRepository::new(connection), temp_dir)
    }

    fn paid(expense_id: &str, year: i32, month: u32) -> MonthlyPaidStatus {
        let bogota = FixedOffset::west_opt(5 * 3600).unwrap();
        MonthlyPaidStatus {
            expense_id: expense_id.to_string(),
            year,
            month,
            paid: true,
            paid_at: Some(bogota.with_ymd_and_hms(year, month, 5, 9, 0, 0).unwrap()),
        }
    }

    #[test]
    fn statuses_are_scoped_to_their_month() {
        let (repo, _temp_dir) = setup();
        repo.upsert_status(&paid("fixed-1", 2026, 3)).expect("upsert failed");
        repo.upsert_status(&paid("fixed-1", 2026, 4)).expect("upsert failed");

        let march = repo.get_month_statuses(2026, 3).expect("read failed");
        assert_eq!(march.len(), 1);
        assert_eq!(march[0].month, 3);
        assert!(march[0].paid);

        assert!(repo.get_month_statuses(2026, 5).expect("read failed").is_empty());
    }

    #[test]
    fn upsert_replaces_existing_key() {
        let (repo, _temp_dir) = setup();
        repo.upsert_status(&paid("fixed-1", 2026, 3)).expect("upsert failed");

        let mut unpaid = paid("fixed-1", 2026, 3);
        unpaid.paid = false;
        unpaid.paid_at = None;
        repo.upsert_status(&unpaid).expect("upsert failed");

        let march = repo.get_month_statuses(2026, 3).expect("read failed");
        assert_eq!(march.len(), 1);
        assert!(!march[0].paid);
        assert!(march[0].paid_at.is_none());
    }

    #[test]
    fn delete_removes_every_month_for_the_expense() {
        let (repo, _temp_dir) = setup();
        repo.upsert_status(&paid("fixed-1", 2026, 3)).expect("upsert failed");
        repo.upsert_status(&paid("fixed-1", 2026, 4)).expect("upsert failed");
        repo.upsert_status(&paid("fixed-2", 2026, 3)).expect("upsert failed");

        repo.delete_statuses_for_expenses(&["fixed-1".to_string()])
            .expect("delete failed");

        assert!(repo
            .get_month_statuses(2026, 4)
            .expect("read failed")
            .is_empty());
        let march = repo.get_month_statuses(2026, 3).expect("read failed");
        assert_eq!(march.len(), 1);
        assert_eq!(march[0].expense_id, "fixed-2");
    }
}
