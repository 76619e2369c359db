//! # Chat Service
//!
//! Conversation orchestrator: classifies each incoming message, runs the
//! matching budget operation and composes the Spanish reply. A chat turn
//! never surfaces an error to the caller; classifier failures fall back to
//! the regex classifier and persistence failures produce an apology reply.

use chrono::Datelike;
use log::{error, warn};
use uuid::Uuid;

use shared::{ChatMessage, MessageAuthor};

use crate::nlu::{
    DeleteTarget, ExpenseContext, FallbackClassifier, Intent, IntentClassifier,
};
use crate::storage::traits::Connection;

use super::budget_service::BudgetService;
use super::format::format_cop;
use super::{bogota_now, deletion, duplicates};

/// How many recent expenses are handed to the classifier as context
const CLASSIFIER_CONTEXT_SIZE: u32 = 10;

const REPLY_FAILURE: &str = "Epa, algo falló. ¿Le damos otra vez?";

const REPLY_UNRECOGNIZED: &str = "Epa, no te entendí bien. 🤔\n\n\
    Escríbeme algo como:\n\
    • \"Almuerzo 15000\"\n\
    • \"10k uber\"\n\
    • \"Gasté 5 lucas en café\"\n\
    • \"Borrar último gasto\"\n\n\
    O pregúntame \"¿cuánto llevo?\"";

/// Conversation orchestrator over a budget service
pub struct ChatService<C: Connection> {
    classifier: Box<dyn IntentClassifier>,
    fallback: FallbackClassifier,
    budget_service: BudgetService<C>,
    transcript: Vec<ChatMessage>,
}

impl<C: Connection> ChatService<C> {
    pub fn new(classifier: Box<dyn IntentClassifier>, budget_service: BudgetService<C>) -> Self {
        Self {
            classifier,
            fallback: FallbackClassifier::default(),
            budget_service,
            transcript: Vec::new(),
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Initial assistant greeting shown when a chat session starts
    pub fn welcome(&mut self) -> String {
        let now = bogota_now();
        let reply = match self
            .budget_service
            .compute_available(now.year(), now.month())
        {
            Ok(available) => format!(
                "¡Qué más, parcero! 👋\n\n\
                 Te quedan {} pa'l mes.\n\n\
                 Cuéntame en qué gastaste:\n\
                 • \"Almuerzo 15000\"\n\
                 • \"10k en uber\"\n\
                 • \"Gasté 5 lucas en café\"\n\n\
                 💡 Para borrar: \"borrar último\"",
                format_cop(available)
            ),
            Err(e) => {
                error!("Could not load budget state for greeting: {:#}", e);
                REPLY_FAILURE.to_string()
            }
        };
        self.record(MessageAuthor::Assistant, &reply);
        reply
    }

    /// Process one user message and produce the assistant reply
    pub async fn handle_message(&mut self, text: &str) -> String {
        self.record(MessageAuthor::User, text);

        let context = self.classifier_context();
        let intent = match self.classifier.classify(text, &context).await {
            Ok(intent) => intent,
            Err(e) => {
                warn!("Classifier unavailable ({}), using regex fallback", e);
                self.fallback.classify_message(text)
            }
        };

        let reply = match self.dispatch(intent) {
            Ok(reply) => reply,
            Err(e) => {
                error!("Chat turn failed: {:#}", e);
                REPLY_FAILURE.to_string()
            }
        };

        self.record(MessageAuthor::Assistant, &reply);
        reply
    }

    fn dispatch(&self, intent: Intent) -> anyhow::Result<String> {
        match intent {
            Intent::Expense {
                description,
                amount,
            } => self.register_expense(&description, amount),
            Intent::DeleteRequest { target } => self.delete_expense(&target),
            Intent::BalanceQuery => self.balance_reply(),
            Intent::Greeting => self.greeting_reply(),
            Intent::Unrecognized => Ok(REPLY_UNRECOGNIZED.to_string()),
        }
    }

    fn register_expense(&self, description: &str, amount: u64) -> anyhow::Result<String> {
        let now = bogota_now();
        let existing = self.budget_service.monthly_expenses(now.year(), now.month())?;
        let duplicate = duplicates::find_duplicate(description, amount, now.date_naive(), &existing)
            .map(|d| (d.description.clone(), d.amount));

        // Insert first, warn after: a repeated lunch is more common than a typo
        self.budget_service.add_variable_expense(description, amount)?;
        let available = self.budget_service.compute_available(now.year(), now.month())?;

        let mut reply = format!("✅ Listo, {} por {}", description, format_cop(amount as i64));
        if let Some((dup_description, dup_amount)) = duplicate {
            reply.push_str(&format!(
                "\n\n⚠️ Ojo: Ya tenías un gasto parecido hoy (\"{}\" por {}). \
                 Si fue error, escribe \"borrar último\".",
                dup_description,
                format_cop(dup_amount as i64)
            ));
        }
        reply.push_str(&format!(
            "\n\n📊 Te quedan {} pa'l mes.",
            format_cop(available)
        ));
        Ok(reply)
    }

    fn delete_expense(&self, target: &DeleteTarget) -> anyhow::Result<String> {
        let expenses = self.budget_service.all_expenses()?;
        if expenses.is_empty() {
            return Ok("No tienes gastos para borrar.".to_string());
        }

        let resolved = deletion::resolve(target, &expenses).cloned();
        let Some(expense) = resolved else {
            let term = match target {
                DeleteTarget::MostRecent => "último",
                DeleteTarget::Search(term) => term.as_str(),
            };
            return Ok(format!(
                "No encontré ningún gasto con \"{}\". ¿Cuál querías borrar?",
                term
            ));
        };

        self.budget_service.delete_variable_expense(&expense.id)?;
        let now = bogota_now();
        let available = self.budget_service.compute_available(now.year(), now.month())?;

        Ok(format!(
            "🗑️ Listo, borré \"{}\" por {}\n\n📊 Te quedan {} pa'l mes.",
            expense.description,
            format_cop(expense.amount as i64),
            format_cop(available)
        ))
    }

    fn balance_reply(&self) -> anyhow::Result<String> {
        let now = bogota_now();
        let variable_total = self.budget_service.variable_total(now.year(), now.month())?;
        let totals = self
            .budget_service
            .category_totals(now.year(), now.month())?;

        let mut reply = format!(
            "📊 Este mes llevas {} en gasticos variables.",
            format_cop(variable_total as i64)
        );
        if !totals.is_empty() {
            reply.push_str("\n\nAsí va la cosa:");
            for entry in totals {
                reply.push_str(&format!(
                    "\n• {}: {}",
                    entry.category,
                    format_cop(entry.total as i64)
                ));
            }
        }
        Ok(reply)
    }

    fn greeting_reply(&self) -> anyhow::Result<String> {
        let now = bogota_now();
        let available = self.budget_service.compute_available(now.year(), now.month())?;
        Ok(format!(
            "¡Qué más, parcero! 👋\n\n\
             Te quedan {} pa'l mes.\n\n\
             Cuéntame en qué gastaste, por ejemplo:\n\
             • \"Almuerzo 15000\"\n\
             • \"10k en uber\"\n\
             • \"Gasté 5 lucas en café\"\n\n\
             💡 Para borrar: \"borrar último\" o \"quitar el uber\"",
            format_cop(available)
        ))
    }

    fn classifier_context(&self) -> Vec<ExpenseContext> {
        match self.budget_service.recent_expenses(CLASSIFIER_CONTEXT_SIZE) {
            Ok(expenses) => expenses
                .into_iter()
                .map(|e| ExpenseContext {
                    description: e.description,
                    amount: e.amount,
                })
                .collect(),
            Err(e) => {
                warn!("Could not load recent expenses for context: {:#}", e);
                Vec::new()
            }
        }
    }

    fn record(&mut self, author: MessageAuthor, content: &str) {
        self.transcript.push(ChatMessage {
            id: Uuid::new_v4().to_string(),
            author,
            content: content.to_string(),
            timestamp: bogota_now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlu::ClassifyError;
    use crate::storage::csv::CsvConnection;
    use async_trait::async_trait;
    use shared::{OnboardingFixedExpense, OnboardingRequest};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Classifier stub that replays canned results
    struct StubClassifier {
        result: Result<Intent, ClassifyError>,
    }

    #[async_trait]
    impl IntentClassifier for StubClassifier {
        async fn classify(
            &self,
            _message: &str,
            _recent: &[ExpenseContext],
        ) -> Result<Intent, ClassifyError> {
            match &self.result {
                Ok(intent) => Ok(intent.clone()),
                Err(ClassifyError::NotConfigured) => Err(ClassifyError::NotConfigured),
                Err(_) => Err(ClassifyError::Network("stubbed".to_string())),
            }
        }
    }

    fn setup(intent: Result<Intent, ClassifyError>) -> (ChatService<CsvConnection>, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection = CsvConnection::new(temp_dir.path()).expect("Failed to create connection");
        let budget_service = BudgetService::new(Arc::new(connection));
        budget_service
            .complete_onboarding(OnboardingRequest {
                income: 2_000_000,
                savings_target: 200_000,
                fixed_expenses: vec![OnboardingFixedExpense {
                    name: "Arriendo".to_string(),
                    parent_category: None,
                    amount: 500_000,
                }],
            })
            .expect("onboarding failed");

        let service = ChatService::new(
            Box::new(StubClassifier { result: intent }),
            budget_service,
        );
        (service, temp_dir)
    }

    #[tokio::test]
    async fn expense_reply_confirms_and_shows_available() {
        let (mut chat, _temp_dir) = setup(Ok(Intent::Expense {
            description: "Almuerzo".to_string(),
            amount: 15_000,
        }));

        let reply = chat.handle_message("Almuerzo 15000").await;
        assert!(reply.contains("✅ Listo, Almuerzo por $15.000"), "{reply}");
        assert!(reply.contains("Te quedan $1.285.000 pa'l mes."), "{reply}");
        assert!(!reply.contains("⚠️"), "{reply}");
    }

    #[tokio::test]
    async fn repeated_expense_same_day_is_saved_but_flagged() {
        let (mut chat, _temp_dir) = setup(Ok(Intent::Expense {
            description: "Almuerzo".to_string(),
            amount: 15_000,
        }));

        chat.handle_message("Almuerzo 15000").await;
        let reply = chat.handle_message("Almuerzo 15000").await;
        assert!(reply.contains("⚠️ Ojo: Ya tenías un gasto parecido hoy"), "{reply}");
        // Both survived
        assert!(reply.contains("Te quedan $1.270.000 pa'l mes."), "{reply}");
    }

    #[tokio::test]
    async fn balance_query_lists_category_breakdown() {
        let (mut chat, _temp_dir) = setup(Err(ClassifyError::NotConfigured));

        // Fallback path: regex classifier handles both turns
        chat.handle_message("Almuerzo 15000").await;
        let reply = chat.handle_message("¿cuánto llevo?").await;
        assert!(
            reply.contains("📊 Este mes llevas $15.000 en gasticos variables."),
            "{reply}"
        );
        assert!(reply.contains("• Alimentación: $15.000"), "{reply}");
    }

    #[tokio::test]
    async fn delete_most_recent_restores_available() {
        let (mut chat, _temp_dir) = setup(Err(ClassifyError::NotConfigured));
        chat.handle_message("Uber 8000").await;

        let mut chat = ChatService::new(
            Box::new(StubClassifier {
                result: Ok(Intent::DeleteRequest {
                    target: DeleteTarget::MostRecent,
                }),
            }),
            chat.budget_service.clone(),
        );
        let reply = chat.handle_message("borrar último").await;
        assert!(reply.contains("🗑️ Listo, borré \"Uber\" por $8.000"), "{reply}");
        assert!(reply.contains("Te quedan $1.300.000 pa'l mes."), "{reply}");
    }

    #[tokio::test]
    async fn delete_with_no_expenses_says_so() {
        let (mut chat, _temp_dir) = setup(Ok(Intent::DeleteRequest {
            target: DeleteTarget::MostRecent,
        }));
        let reply = chat.handle_message("borrar último").await;
        assert_eq!(reply, "No tienes gastos para borrar.");
    }

    #[tokio::test]
    async fn delete_with_unknown_term_asks_back() {
        let (mut chat, _temp_dir) = setup(Err(ClassifyError::NotConfigured));
        chat.handle_message("Uber 8000").await;

        let mut chat = ChatService::new(
            Box::new(StubClassifier {
                result: Ok(Intent::DeleteRequest {
                    target: DeleteTarget::Search("cine".to_string()),
                }),
            }),
            chat.budget_service.clone(),
        );
        let reply = chat.handle_message("borrar el cine").await;
        assert_eq!(
            reply,
            "No encontré ningún gasto con \"cine\". ¿Cuál querías borrar?"
        );
    }

    #[tokio::test]
    async fn classifier_failure_falls_back_to_regex() {
        let (mut chat, _temp_dir) = setup(Err(ClassifyError::Network("down".to_string())));

        let reply = chat.handle_message("gasté 10 lucas en taxi").await;
        assert!(reply.contains("por $10.000"), "{reply}");
    }

    #[tokio::test]
    async fn unrecognized_message_gets_usage_help() {
        let (mut chat, _temp_dir) = setup(Ok(Intent::Unrecognized));
        let reply = chat.handle_message("jajaja").await;
        assert!(reply.contains("Epa, no te entendí bien."), "{reply}");
    }

    #[tokio::test]
    async fn welcome_reports_failure_when_storage_is_broken() {
        let (mut chat, temp_dir) = setup(Ok(Intent::Greeting));

        // Reading the profile now fails: the path exists but is a directory
        let profile_path = temp_dir.path().join("profile.csv");
        std::fs::remove_file(&profile_path).unwrap();
        std::fs::create_dir(&profile_path).unwrap();

        let reply = chat.welcome();
        assert_eq!(reply, REPLY_FAILURE);
        assert!(!reply.contains("$0"));
    }

    #[tokio::test]
    async fn transcript_records_both_sides() {
        let (mut chat, _temp_dir) = setup(Ok(Intent::Greeting));
        chat.handle_message("hola").await;

        let transcript = chat.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].author, MessageAuthor::User);
        assert_eq!(transcript[0].content, "hola");
        assert_eq!(transcript[1].author, MessageAuthor::Assistant);
        assert!(transcript[1].content.contains("¡Qué más, parcero!"));
    }
}
