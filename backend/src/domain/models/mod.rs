//! Domain models for the budget engine.

pub mod fixed_expense;
pub mod profile;
pub mod variable_expense;

pub use fixed_expense::{FixedExpense, FixedExpenseInput, MonthlyPaidStatus};
pub use profile::BudgetProfile;
pub use variable_expense::{Category, VariableExpense};
