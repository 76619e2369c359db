//! Local fallback classifier.
//!
//! Used only when the remote classification service fails. It can recognize
//! expenses (any message with an extractable amount) and balance queries by
//! keyword; it has no delete detection - deleting by description requires
//! the primary path.

use async_trait::async_trait;

use super::amount::{normalize_amount, strip_amount_tokens};
use super::{ClassifyError, ExpenseContext, Intent, IntentClassifier};

/// Description used when stripping the amount leaves nothing.
const DEFAULT_DESCRIPTION: &str = "Gasto";

const BALANCE_KEYWORDS: [&str; 4] = ["gastado", "cuanto", "cuánto", "llevo"];

#[derive(Debug, Clone, Default)]
pub struct FallbackClassifier;

impl FallbackClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Pure local classification. Never fails; the safe default is
    /// [`Intent::Unrecognized`].
    pub fn classify_message(&self, message: &str) -> Intent {
        if let Some(amount) = normalize_amount(message) {
            let stripped = strip_amount_tokens(message);
            let description = if stripped.is_empty() {
                DEFAULT_DESCRIPTION.to_string()
            } else {
                stripped
            };
            return Intent::Expense { description, amount };
        }

        let lower = message.to_lowercase();
        if BALANCE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            return Intent::BalanceQuery;
        }

        Intent::Unrecognized
    }
}

#[async_trait]
impl IntentClassifier for FallbackClassifier {
    async fn classify(
        &self,
        message: &str,
        _recent: &[ExpenseContext],
    ) -> Result<Intent, ClassifyError> {
        Ok(self.classify_message(message))
    }
}
