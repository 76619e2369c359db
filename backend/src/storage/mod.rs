//! # Storage Layer
//!
//! File-based persistence for the budgeting domain. The domain layer only
//! sees the traits in [`traits`]; the CSV backend in [`csv`] is the single
//! implementation today.

pub mod csv;
pub mod traits;

pub use traits::{
    Connection, FixedExpenseStorage, MonthlyStatusStorage, ProfileStorage, VariableExpenseStorage,
};
