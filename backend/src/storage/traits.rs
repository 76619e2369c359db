//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::models::{BudgetProfile, FixedExpense, MonthlyPaidStatus, VariableExpense};

/// Trait defining the interface for budget profile storage operations
///
/// There is a single profile per data directory; `get_profile` returns
/// `None` until onboarding has stored one.
pub trait ProfileStorage: Send + Sync {
    /// Retrieve the budget profile, if one has been stored
    fn get_profile(&self) -> Result<Option<BudgetProfile>>;

    /// Store (or overwrite) the budget profile
    fn store_profile(&self, profile: &BudgetProfile) -> Result<()>;
}

/// Trait defining the interface for fixed expense storage operations
pub trait FixedExpenseStorage: Send + Sync {
    /// List all fixed expenses in insertion order
    fn list_fixed_expenses(&self) -> Result<Vec<FixedExpense>>;

    /// Store a new fixed expense
    fn store_fixed_expense(&self, expense: &FixedExpense) -> Result<()>;

    /// Update an existing fixed expense by id
    fn update_fixed_expense(&self, expense: &FixedExpense) -> Result<()>;

    /// Replace the whole fixed expense set (used by onboarding and
    /// re-onboarding)
    fn replace_fixed_expenses(&self, expenses: &[FixedExpense]) -> Result<()>;
}

/// Trait defining the interface for variable expense storage operations
pub trait VariableExpenseStorage: Send + Sync {
    /// Store a new variable expense
    fn store_variable_expense(&self, expense: &VariableExpense) -> Result<()>;

    /// List variable expenses ordered by created_at descending
    /// (most recent first)
    fn list_variable_expenses(&self, limit: Option<u32>) -> Result<Vec<VariableExpense>>;

    /// List variable expenses whose local date falls inside the inclusive
    /// range, most recent first
    fn list_variable_expenses_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<VariableExpense>>;

    /// Delete a variable expense by id
    /// Returns true if the expense was found and deleted, false otherwise
    fn delete_variable_expense(&self, expense_id: &str) -> Result<bool>;
}

/// Trait defining the interface for monthly paid-status storage operations
///
/// Paid flags are keyed by (expense_id, year, month) so each month starts
/// with every fixed expense unpaid.
pub trait MonthlyStatusStorage: Send + Sync {
    /// Get all paid statuses recorded for a specific month
    fn get_month_statuses(&self, year: i32, month: u32) -> Result<Vec<MonthlyPaidStatus>>;

    /// Insert or update the paid status for one expense in one month
    fn upsert_status(&self, status: &MonthlyPaidStatus) -> Result<()>;

    /// Delete every status row belonging to the given expense ids
    /// (used when the fixed expense set is replaced)
    fn delete_statuses_for_expenses(&self, expense_ids: &[String]) -> Result<()>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type and provides
/// factory methods for creating repositories, so the domain layer can work
/// with any storage backend without knowing the implementation details.
pub trait Connection: Send + Sync + Clone {
    /// Repositories are cheap handles over the connection, hence Clone
    type ProfileRepository: ProfileStorage + Clone;
    type FixedExpenseRepository: FixedExpenseStorage + Clone;
    type VariableExpenseRepository: VariableExpenseStorage + Clone;
    type MonthlyStatusRepository: MonthlyStatusStorage + Clone;

    fn create_profile_repository(&self) -> Self::ProfileRepository;
    fn create_fixed_expense_repository(&self) -> Self::FixedExpenseRepository;
    fn create_variable_expense_repository(&self) -> Self::VariableExpenseRepository;
    fn create_monthly_status_repository(&self) -> Self::MonthlyStatusRepository;
}
