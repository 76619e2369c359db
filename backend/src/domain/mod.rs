//! # Domain Layer
//!
//! Budget rules and conversation flow, independent of any storage backend
//! or transport. Time is always Bogotá local time; "today" for duplicate
//! detection and monthly grouping means the Bogotá calendar date.

pub mod budget_service;
pub mod categorizer;
pub mod chat_service;
pub mod deletion;
pub mod duplicates;
pub mod format;
pub mod models;

pub use budget_service::BudgetService;
pub use chat_service::ChatService;

use chrono::{DateTime, FixedOffset, Utc};

/// UTC-5, no DST
pub fn bogota_offset() -> FixedOffset {
    FixedOffset::west_opt(5 * 3600).expect("valid offset")
}

/// Current time in Bogotá local time
pub fn bogota_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&bogota_offset())
}
