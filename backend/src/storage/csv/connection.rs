//! # CSV Connection
//!
//! A "connection" for the CSV backend is just the data directory. All
//! repositories created from it share that directory:
//!
//! ```text
//! data/
//! ├── profile.csv
//! ├── fixed_expenses.csv
//! ├── variable_expenses.csv
//! └── monthly_statuses.csv
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::info;

use crate::storage::traits::Connection;

use super::fixed_expense_repository::FixedExpenseRepository;
use super::monthly_status_repository::MonthlyStatusRepository;
use super::profile_repository::ProfileRepository;
use super::variable_expense_repository::VariableExpenseRepository;

/// Connection handle for the CSV storage backend
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection rooted at the given directory,
    /// creating the directory if it does not exist
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_directory = base_directory.as_ref().to_path_buf();
        if !base_directory.exists() {
            std::fs::create_dir_all(&base_directory)?;
            info!("Created data directory: {:?}", base_directory);
        }
        Ok(Self { base_directory })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn profile_file_path(&self) -> PathBuf {
        self.base_directory.join("profile.csv")
    }

    pub fn fixed_expenses_file_path(&self) -> PathBuf {
        self.base_directory.join("fixed_expenses.csv")
    }

    pub fn variable_expenses_file_path(&self) -> PathBuf {
        self.base_directory.join("variable_expenses.csv")
    }

    pub fn monthly_statuses_file_path(&self) -> PathBuf {
        self.base_directory.join("monthly_statuses.csv")
    }
}

impl Connection for CsvConnection {
    type ProfileRepository = ProfileRepository;
    type FixedExpenseRepository = FixedExpenseRepository;
    type VariableExpenseRepository = VariableExpenseRepository;
    type MonthlyStatusRepository = MonthlyStatusRepository;

    fn create_profile_repository(&self) -> Self::ProfileRepository {
        ProfileRepository::new(self.clone())
    }

    fn create_fixed_expense_repository(&self) -> Self::FixedExpenseRepository {
        FixedExpenseRepository::new(self.clone())
    }

    fn create_variable_expense_repository(&self) -> Self::VariableExpenseRepository {
        VariableExpenseRepository::new(self.clone())
    }

    fn create_monthly_status_repository(&self) -> Self::MonthlyStatusRepository {
        MonthlyStatusRepository::new(self.clone())
    }
}
