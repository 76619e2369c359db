//! # Budget Service
//!
//! Domain service over the storage repositories. Owns every budget
//! calculation: available funds, pending fixed totals, monthly variable
//! totals and category breakdowns. All money values are whole Colombian
//! pesos.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use log::info;
use uuid::Uuid;

use shared::{BudgetSummary, CategoryTotal, FixedExpenseStatus, OnboardingRequest};

use crate::storage::traits::{
    Connection, FixedExpenseStorage, MonthlyStatusStorage, ProfileStorage, VariableExpenseStorage,
};

use super::categorizer;
use super::models::{
    BudgetProfile, FixedExpense, FixedExpenseInput, MonthlyPaidStatus, VariableExpense,
};

/// Domain service for budget state and calculations
#[derive(Clone)]
pub struct BudgetService<C: Connection> {
    profile_repository: C::ProfileRepository,
    fixed_expense_repository: C::FixedExpenseRepository,
    variable_expense_repository: C::VariableExpenseRepository,
    monthly_status_repository: C::MonthlyStatusRepository,
}

impl<C: Connection> BudgetService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            profile_repository: connection.create_profile_repository(),
            fixed_expense_repository: connection.create_fixed_expense_repository(),
            variable_expense_repository: connection.create_variable_expense_repository(),
            monthly_status_repository: connection.create_monthly_status_repository(),
        }
    }

    /// The stored profile, or a zeroed one when onboarding has not run
    pub fn profile_or_default(&self) -> Result<BudgetProfile> {
        Ok(self.profile_repository.get_profile()?.unwrap_or_default())
    }

    pub fn update_income(&self, income: u64) -> Result<()> {
        let mut profile = self.profile_or_default()?;
        profile.income = income;
        self.profile_repository.store_profile(&profile)
    }

    pub fn update_savings_target(&self, savings_target: u64) -> Result<()> {
        let mut profile = self.profile_or_default()?;
        profile.savings_target = savings_target;
        self.profile_repository.store_profile(&profile)
    }

    /// Persist the onboarding answers: profile plus the initial fixed
    /// expense set
    pub fn complete_onboarding(&self, request: OnboardingRequest) -> Result<()> {
        let inputs: Vec<FixedExpenseInput> = request
            .fixed_expenses
            .into_iter()
            .map(|e| FixedExpenseInput {
                name: e.name,
                parent_category: e.parent_category,
                amount: e.amount,
            })
            .collect();
        self.replace_fixed_expenses(inputs)?;

        let profile = BudgetProfile {
            income: request.income,
            savings_target: request.savings_target,
            onboarding_complete: true,
        };
        self.profile_repository.store_profile(&profile)?;
        info!(
            "Onboarding complete: income {} savings target {}",
            profile.income, profile.savings_target
        );
        Ok(())
    }

    /// Register a variable expense, categorizing it by keyword. Returns
    /// the stored record so the caller can report it back.
    pub fn add_variable_expense(&self, description: &str, amount: u64) -> Result<VariableExpense> {
        let expense = VariableExpense {
            id: Uuid::new_v4().to_string(),
            description: description.to_string(),
            amount,
            category: categorizer::categorize(description),
            created_at: super::bogota_now(),
        };
        self.variable_expense_repository
            .store_variable_expense(&expense)?;
        info!(
            "Registered expense \"{}\" for {} ({})",
            expense.description, expense.amount, expense.category
        );
        Ok(expense)
    }

    /// Returns true when the expense existed and was removed
    pub fn delete_variable_expense(&self, expense_id: &str) -> Result<bool> {
        self.variable_expense_repository
            .delete_variable_expense(expense_id)
    }

    /// Most recent variable expenses, newest first
    pub fn recent_expenses(&self, limit: u32) -> Result<Vec<VariableExpense>> {
        self.variable_expense_repository
            .list_variable_expenses(Some(limit))
    }

    /// Every stored variable expense, newest first
    pub fn all_expenses(&self) -> Result<Vec<VariableExpense>> {
        self.variable_expense_repository.list_variable_expenses(None)
    }

    /// All variable expenses recorded in the given month, newest first
    pub fn monthly_expenses(&self, year: i32, month: u32) -> Result<Vec<VariableExpense>> {
        let (start, end) = month_bounds(year, month)?;
        self.variable_expense_repository
            .list_variable_expenses_between(start, end)
    }

    /// Replace the whole fixed expense set, assigning fresh ids and
    /// dropping every paid status that referenced the replaced set
    pub fn replace_fixed_expenses(
        &self,
        inputs: Vec<FixedExpenseInput>,
    ) -> Result<Vec<FixedExpense>> {
        let old_ids: Vec<String> = self
            .fixed_expense_repository
            .list_fixed_expenses()?
            .into_iter()
            .map(|e| e.id)
            .collect();
        if !old_ids.is_empty() {
            self.monthly_status_repository
                .delete_statuses_for_expenses(&old_ids)?;
        }

        let expenses: Vec<FixedExpense> = inputs
            .into_iter()
            .map(|input| FixedExpense {
                id: Uuid::new_v4().to_string(),
                name: input.name,
                parent_category: input.parent_category,
                amount: input.amount,
            })
            .collect();
        self.fixed_expense_repository
            .replace_fixed_expenses(&expenses)?;
        Ok(expenses)
    }

    /// Flip the paid flag for one fixed expense in one month
    pub fn set_paid(&self, expense_id: &str, year: i32, month: u32, paid: bool) -> Result<()> {
        let status = MonthlyPaidStatus {
            expense_id: expense_id.to_string(),
            year,
            month,
            paid,
            paid_at: paid.then(super::bogota_now),
        };
        self.monthly_status_repository.upsert_status(&status)
    }

    /// Sum of the month's variable expenses
    pub fn variable_total(&self, year: i32, month: u32) -> Result<u64> {
        Ok(self
            .monthly_expenses(year, month)?
            .iter()
            .map(|e| e.amount)
            .sum())
    }

    /// Sum of fixed expenses not yet marked paid for the month
    pub fn pending_fixed_total(&self, year: i32, month: u32) -> Result<u64> {
        let statuses = self.monthly_status_repository.get_month_statuses(year, month)?;
        Ok(self
            .fixed_expense_repository
            .list_fixed_expenses()?
            .iter()
            .filter(|e| !statuses.iter().any(|s| s.expense_id == e.id && s.paid))
            .map(|e| e.amount)
            .sum())
    }

    /// Available funds for the month. All fixed expenses count against
    /// the budget whether paid yet or not; may be negative.
    pub fn compute_available(&self, year: i32, month: u32) -> Result<i64> {
        let profile = self.profile_or_default()?;
        let fixed_total: u64 = self
            .fixed_expense_repository
            .list_fixed_expenses()?
            .iter()
            .map(|e| e.amount)
            .sum();
        let variable_total = self.variable_total(year, month)?;

        Ok(profile.income as i64
            - profile.savings_target as i64
            - fixed_total as i64
            - variable_total as i64)
    }

    /// Full dashboard projection for one month
    pub fn summary(&self, year: i32, month: u32) -> Result<BudgetSummary> {
        let profile = self.profile_or_default()?;
        let fixed = self.fixed_expense_repository.list_fixed_expenses()?;
        let statuses = self.monthly_status_repository.get_month_statuses(year, month)?;
        let expenses = self.monthly_expenses(year, month)?;

        let fixed_expenses: Vec<FixedExpenseStatus> = fixed
            .iter()
            .map(|e| FixedExpenseStatus {
                id: e.id.clone(),
                name: e.name.clone(),
                parent_category: e.parent_category.clone(),
                amount: e.amount,
                paid: statuses
                    .iter()
                    .any(|s| s.expense_id == e.id && s.paid),
            })
            .collect();

        let fixed_total: u64 = fixed.iter().map(|e| e.amount).sum();
        let pending_fixed_total: u64 = fixed_expenses
            .iter()
            .filter(|e| !e.paid)
            .map(|e| e.amount)
            .sum();
        let variable_total: u64 = expenses.iter().map(|e| e.amount).sum();

        Ok(BudgetSummary {
            year,
            month,
            income: profile.income,
            savings_target: profile.savings_target,
            available: profile.income as i64
                - profile.savings_target as i64
                - fixed_total as i64
                - variable_total as i64,
            pending_fixed_total,
            variable_total,
            fixed_expenses,
            category_totals: category_totals(&expenses),
        })
    }

    /// Per-category totals for the month, biggest first
    pub fn category_totals(&self, year: i32, month: u32) -> Result<Vec<CategoryTotal>> {
        Ok(category_totals(&self.monthly_expenses(year, month)?))
    }
}

/// First and last calendar day of a month (both inclusive)
fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| anyhow!("invalid month: {year}-{month}"))?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .and_then(|first_of_next| first_of_next.pred_opt())
    .ok_or_else(|| anyhow!("invalid month: {year}-{month}"))?;
    Ok((start, end))
}

fn category_totals(expenses: &[VariableExpense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for expense in expenses {
        let label = expense.category.to_string();
        match totals.iter_mut().find(|t| t.category == label) {
            Some(entry) => entry.total += expense.amount,
            None => totals.push(CategoryTotal {
                category: label,
                total: expense.amount,
            }),
        }
    }
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}
