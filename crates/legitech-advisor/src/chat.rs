//! Chat and audit value types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Ai,
}

impl ChatRole {
    /// Role string the Gemini wire format expects.
    pub(crate) fn wire_role(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Ai => "model",
        }
    }
}

/// One message in a stored conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// One prior turn replayed to the model. The client holds the conversation;
/// the service is stateless and receives the full history on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl From<&ChatMessage> for ChatTurn {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            text: message.text.clone(),
        }
    }
}

/// Verdict from auditing evidence text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    pub compliant: bool,
    /// Short verdict headline ("Vencido", "Cumple Parcialmente", ...).
    pub verdict_title: String,
    /// Detailed technical analysis citing specific norms.
    pub analysis: String,
    /// Model confidence, 0 to 100.
    pub confidence: f64,
}

impl AuditResult {
    /// Verdict returned when the evidence could not be processed at all.
    pub fn failed() -> Self {
        Self {
            compliant: false,
            verdict_title: "Error de Análisis".to_string(),
            analysis: "No se pudo procesar el texto. Asegúrate de que el contenido sea legible."
                .to_string(),
            confidence: 0.0,
        }
    }
}
