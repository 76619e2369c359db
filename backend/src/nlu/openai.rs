//! Remote intent classification via the OpenAI chat-completions API.
//!
//! The model is asked for strict JSON (`tipo`/`categoria`/`monto`/`buscar`).
//! Anything that is not a 200 with parseable JSON intent - network error,
//! timeout, missing API key, markdown-wrapped garbage - is a
//! [`ClassifyError`], which sends the caller down the local fallback path.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use super::{ClassifyError, DeleteTarget, ExpenseContext, Intent, IntentClassifier};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT_SECS: u64 = 20;
const MAX_TOKENS: u32 = 150;
const TEMPERATURE: f32 = 0.1;

const SYSTEM_PROMPT: &str = r#"Eres un asistente financiero colombiano que ayuda a registrar gastos. Tu trabajo es extraer información de mensajes en lenguaje natural.

IMPORTANTE: Debes entender CUALQUIER formato de mensaje sobre gastos, sin importar el orden de las palabras.

Ejemplos:
- "Almuerzo 15000" → gasto
- "$10.000 en helados" → gasto
- "gasté 10 lucas en comida" → gasto
- "me comí un helado de diez mil" → gasto
- "¿cuánto llevo?" → consulta
- "resumen" → consulta
- "hola" → saludo
- "borrar último" → borrar (buscar: "")
- "quita el uber" → borrar (buscar: "uber")
- "elimina el gasto de 8000" → borrar (buscar: "8000")

Conversiones de dinero colombiano:
- "10k" = 10000
- "10 lucas" = 10000
- "10 mil" = 10000
- "diez mil" = 10000
- "$10.000" = 10000
- "1M" = 1000000
- "1 palo" = 1000000

Responde ÚNICAMENTE con JSON válido (sin markdown, sin ```):
{
  "tipo": "gasto" | "borrar" | "consulta" | "saludo" | "no_entendido",
  "categoria": "descripción corta del gasto (si es gasto)",
  "monto": número sin puntos ni símbolos (si es gasto),
  "buscar": "texto a buscar entre los gastos existentes (si es borrar, vacío para el último)"
}

Si no puedes extraer el monto con certeza, usa tipo "no_entendido"."#;

/// Connection settings for the classification service.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
}

impl OpenAiConfig {
    /// Read the configuration from the environment. `None` when no API key is
    /// set - the classifier then fails with `NotConfigured` on every call and
    /// the orchestrator runs on the local fallback alone.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        Some(Self {
            api_key,
            model: std::env::var("CUADRO_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            api_url: std::env::var("CUADRO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        })
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Wire format the model is instructed to produce.
#[derive(Debug, Deserialize)]
struct WireIntent {
    tipo: String,
    #[serde(default)]
    categoria: Option<String>,
    #[serde(default)]
    monto: Option<i64>,
    #[serde(default)]
    buscar: Option<String>,
}

/// Primary classifier adapter.
pub struct OpenAiClassifier {
    config: Option<OpenAiConfig>,
    client: reqwest::Client,
}

impl OpenAiClassifier {
    pub fn new(config: Option<OpenAiConfig>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    pub fn from_env() -> Self {
        Self::new(OpenAiConfig::from_env())
    }

    fn build_user_content(message: &str, recent: &[ExpenseContext]) -> String {
        if recent.is_empty() {
            return message.to_string();
        }
        let mut content = String::from("Gastos recientes (del más nuevo al más viejo):\n");
        for expense in recent.iter().take(10) {
            content.push_str(&format!("- {} (${})\n", expense.description, expense.amount));
        }
        content.push_str("\nMensaje: ");
        content.push_str(message);
        content
    }
}

/// Strip optional markdown fences the model sometimes wraps around the JSON.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open.strip_suffix("```").unwrap_or(without_open).trim()
}

/// Map the wire intent to the typed domain intent. A `gasto` without a
/// positive integer amount is a malformed response, not an expense.
fn map_intent(wire: WireIntent) -> Result<Intent, ClassifyError> {
    match wire.tipo.as_str() {
        "gasto" => {
            let amount = match wire.monto {
                Some(monto) if monto > 0 => monto as u64,
                _ => {
                    return Err(ClassifyError::MalformedResponse(format!(
                        "gasto sin monto válido: {:?}",
                        wire.monto
                    )))
                }
            };
            let description = wire
                .categoria
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "Gasto".to_string());
            Ok(Intent::Expense { description, amount })
        }
        "borrar" => {
            let term = wire.buscar.unwrap_or_default();
            Ok(Intent::DeleteRequest { target: DeleteTarget::from_term(&term) })
        }
        "consulta" => Ok(Intent::BalanceQuery),
        "saludo" => Ok(Intent::Greeting),
        "no_entendido" => Ok(Intent::Unrecognized),
        other => Err(ClassifyError::MalformedResponse(format!("tipo desconocido: {other}"))),
    }
}

#[async_trait]
impl IntentClassifier for OpenAiClassifier {
    async fn classify(
        &self,
        message: &str,
        recent: &[ExpenseContext],
    ) -> Result<Intent, ClassifyError> {
        let config = self.config.as_ref().ok_or(ClassifyError::NotConfigured)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|_| ClassifyError::NotConfigured)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let request_body = ChatCompletionRequest {
            model: config.model.clone(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: SYSTEM_PROMPT.to_string() },
                ChatMessage {
                    role: "user".to_string(),
                    content: Self::build_user_content(message, recent),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&config.api_url)
            .headers(headers)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassifyError::Network("timeout".to_string())
                } else {
                    ClassifyError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Classification service returned HTTP {}", status);
            let snippet: String = body.chars().take(200).collect();
            return Err(ClassifyError::Status { status: status.as_u16(), body: snippet });
        }

        let data: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ClassifyError::MalformedResponse(e.to_string()))?;

        let content = data
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| ClassifyError::MalformedResponse("respuesta vacía".to_string()))?;

        debug!("Classifier raw response: {}", content);

        let wire: WireIntent = serde_json::from_str(strip_code_fences(&content))
            .map_err(|e| ClassifyError::MalformedResponse(e.to_string()))?;

        map_intent(wire)
    }
}
