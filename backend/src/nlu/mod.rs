//! # Natural-language understanding
//!
//! Classifies free-form chat messages ("Almuerzo 15000", "10k uber",
//! "borrar último") into typed intents. Two adapters implement the
//! [`IntentClassifier`] capability: [`openai::OpenAiClassifier`] calls the
//! remote language-understanding service, and [`fallback::FallbackClassifier`]
//! is the local regex path used when the service fails. The orchestrator
//! composes them as try-primary-then-fallback; a service failure is never
//! reported to the user as "no entendí".

pub mod amount;
pub mod fallback;
pub mod openai;

pub use fallback::FallbackClassifier;
pub use openai::OpenAiClassifier;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Target of a delete request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeleteTarget {
    /// Generic phrasing ("borrar último", "quita eso") - operate on the
    /// most recently recorded expense.
    MostRecent,
    /// Free text to match against existing descriptions/amounts.
    Search(String),
}

impl DeleteTarget {
    /// Map a raw search string to a target. Blank or "último"-like terms mean
    /// the most recent expense.
    pub fn from_term(term: &str) -> Self {
        let trimmed = term.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("ultimo") || trimmed == "último" {
            DeleteTarget::MostRecent
        } else {
            DeleteTarget::Search(trimmed.to_string())
        }
    }
}

/// The classified purpose of a chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// A spend to record. `amount` is always a resolved positive integer;
    /// when extraction is uncertain the classifier emits [`Intent::Unrecognized`]
    /// instead, never a zero-amount expense.
    Expense { description: String, amount: u64 },
    DeleteRequest { target: DeleteTarget },
    /// "¿cuánto llevo?" - how much have I spent / have left.
    BalanceQuery,
    Greeting,
    /// Safe default whenever the message does not clearly map to an intent.
    Unrecognized,
}

/// Recent-expense context sent to the classifier so that references like
/// "quita el uber" can resolve against a real prior entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseContext {
    pub description: String,
    pub amount: u64,
}

/// Classifier service failures. These trigger the local fallback path and are
/// never surfaced to the user as an error.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("classification service is not configured")]
    NotConfigured,
    #[error("network error calling classification service: {0}")]
    Network(String),
    #[error("classification service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unparseable classifier response: {0}")]
    MalformedResponse(String),
}

/// Capability: turn an utterance plus recent expense context into an intent.
///
/// `recent` holds up to the 10 most recent variable expenses,
/// most-recent-first.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(
        &self,
        message: &str,
        recent: &[ExpenseContext],
    ) -> Result<Intent, ClassifyError>;
}
