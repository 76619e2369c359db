//! # CSV Storage Backend
//!
//! File-based storage using one CSV file per entity inside a single data
//! directory. Files are rewritten through a temp-file-then-rename so a
//! crash mid-write never leaves a truncated file behind.

pub mod connection;
pub mod fixed_expense_repository;
pub mod monthly_status_repository;
pub mod profile_repository;
pub mod variable_expense_repository;

pub use connection::CsvConnection;
pub use fixed_expense_repository::FixedExpenseRepository;
pub use monthly_status_repository::MonthlyStatusRepository;
pub use profile_repository::ProfileRepository;
pub use variable_expense_repository::VariableExpenseRepository;
