//! # Cuadro Backend
//!
//! Chat-first personal budgeting assistant for Colombian users. This crate
//! holds the whole message-understanding and ledger-mutation pipeline:
//!
//! - `nlu` - intent classification (remote service + local fallback) and
//!   Colombian amount normalization ("10k", "10 lucas", "diez mil")
//! - `domain` - budget state engine, categorizer, duplicate detection,
//!   deletion resolution, and the conversation orchestrator
//! - `storage` - storage traits plus a CSV-file implementation
//!
//! The UI (chat screen, onboarding wizard, dashboard) is a separate concern;
//! it talks to [`domain::chat_service::ChatService`] and
//! [`domain::budget_service::BudgetService`] through the DTOs in `shared`.

pub mod domain;
pub mod nlu;
pub mod storage;

pub use storage::csv::CsvConnection;
