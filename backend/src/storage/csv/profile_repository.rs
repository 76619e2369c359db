//! # CSV Profile Repository
//!
//! Stores the single budget profile as a one-row CSV file
//! (`profile.csv`). Reading an absent or empty file yields `None`, which
//! the chat layer interprets as "onboarding pending".

use std::fs::File;
use std::io::{BufReader, BufWriter};

use anyhow::Result;
use csv::{Reader, Writer};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::domain::models::BudgetProfile;
use crate::storage::traits::ProfileStorage;

use super::connection::CsvConnection;

/// CSV record structure for the budget profile
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProfileRecord {
    income: u64,
    savings_target: u64,
    onboarding_complete: bool,
}

impl From<&BudgetProfile> for ProfileRecord {
    fn from(profile: &BudgetProfile) -> Self {
        ProfileRecord {
            income: profile.income,
            savings_target: profile.savings_target,
            onboarding_complete: profile.onboarding_complete,
        }
    }
}

impl From<ProfileRecord> for BudgetProfile {
    fn from(record: ProfileRecord) -> Self {
        BudgetProfile {
            income: record.income,
            savings_target: record.savings_target,
            onboarding_complete: record.onboarding_complete,
        }
    }
}

/// CSV-based profile repository
#[derive(Clone)]
pub struct ProfileRepository {
    connection: CsvConnection,
}

impl ProfileRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }
}

impl ProfileStorage for ProfileRepository {
    fn get_profile(&self) -> Result<Option<BudgetProfile>> {
        let path = self.connection.profile_file_path();
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        match csv_reader.deserialize::<ProfileRecord>().next() {
            Some(record) => Ok(Some(record?.into())),
            None => Ok(None),
        }
    }

    fn store_profile(&self, profile: &BudgetProfile) -> Result<()> {
        let path = self.connection.profile_file_path();
        let temp_path = path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(temp_file));
            csv_writer.serialize(ProfileRecord::from(profile))?;
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &path)?;
        debug!("Stored budget profile to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (ProfileRepository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection = CsvConnection::new(temp_dir.path()).expect("Failed to create connection");
        (ProfileRepository::new(connection), temp_dir)
    }

    #[test]
    fn missing_file_yields_none() {
        let (repo, _temp_dir) = setup();
        assert!(repo.get_profile().expect("read failed").is_none());
    }

    #[test]
    fn store_then_get_roundtrips() {
        let (repo, _temp_dir) = setup();
        let profile = BudgetProfile {
            income: 2_000_000,
            savings_target: 200_000,
            onboarding_complete: true,
        };

        repo.store_profile(&profile).expect("store failed");
        let loaded = repo
            .get_profile()
            .expect("read failed")
            .expect("profile should exist");

        assert_eq!(loaded.income, 2_000_000);
        assert_eq!(loaded.savings_target, 200_000);
        assert!(loaded.onboarding_complete);
    }

    #[test]
    fn store_overwrites_previous_profile() {
        let (repo, _temp_dir) = setup();
        repo.store_profile(&BudgetProfile {
            income: 1_000_000,
            savings_target: 0,
            onboarding_complete: false,
        })
        .expect("store failed");
        repo.store_profile(&BudgetProfile {
            income: 3_000_000,
            savings_target: 500_000,
            onboarding_complete: true,
        })
        .expect("store failed");

        let loaded = repo.get_profile().expect("read failed").unwrap();
        assert_eq!(loaded.income, 3_000_000);
    }
}
