//! The Gemini advisory client.

use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;

use legitech_core::{Industry, LawId};
use legitech_laws::{ImpactLevel, Law, LawAnalysis, LawStatus};

use crate::chat::{AuditResult, ChatTurn};
use crate::error::AdvisorError;
use crate::persona;
use crate::wire::{
    analysis_schema, audit_schema, discovery_schema, Content, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Configuration for the Gemini adapter.
#[derive(Clone)]
pub struct GeminiConfig {
    /// Base URL of the Gemini API.
    pub base_url: String,
    /// API key, sent as the `x-goog-api-key` header.
    pub api_key: String,
    /// Model name used in the request path.
    pub model: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Production configuration with default endpoint, model, and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Point the client at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// HTTP client for the Gemini `generateContent` API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::NotConfigured`] if the API key contains bytes
    /// that cannot appear in a header, or the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, AdvisorError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            reqwest::header::HeaderValue::from_str(&config.api_key).map_err(|_| {
                AdvisorError::NotConfigured {
                    reason: "invalid API key characters".into(),
                }
            })?,
        );
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| AdvisorError::NotConfigured {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
        })
    }

    // ─── Raw proxy ───────────────────────────────────────────────────────

    /// Free-form text generation. The one advisory operation whose errors
    /// surface to the caller instead of degrading.
    ///
    /// # Errors
    ///
    /// Transport, timeout, and malformed-payload failures map to the
    /// corresponding [`AdvisorError`] variants.
    pub async fn generate(&self, prompt: &str) -> Result<String, AdvisorError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text(prompt)],
            system_instruction: None,
            generation_config: None,
        };
        let response = self.send("generate", &request).await?;
        response
            .first_text()
            .ok_or_else(|| AdvisorError::InvalidResponse {
                reason: "response carried no text".into(),
            })
    }

    // ─── Degrading advisory surface ──────────────────────────────────────

    /// Discover one real, current regulation relevant to an industry.
    ///
    /// Any failure (transport, timeout, unparseable payload, missing
    /// required fields) logs and yields `None`; callers simply have no new
    /// law to add.
    pub async fn discover(&self, industry: Industry) -> Option<Law> {
        match self.try_discover(industry).await {
            Ok(law) => Some(law),
            Err(err) => {
                tracing::warn!(industry = %industry, error = %err, "regulatory discovery failed");
                None
            }
        }
    }

    /// Deep technical analysis of one named regulation. Never fails: on any
    /// error the returned patch labels the record as unanalyzed.
    pub async fn deep_analyze(&self, law_title: &str, industry: Industry) -> LawAnalysis {
        match self.try_analyze(law_title, industry).await {
            Ok(analysis) => analysis,
            Err(err) => {
                tracing::warn!(law = law_title, error = %err, "deep analysis failed");
                LawAnalysis::unavailable()
            }
        }
    }

    /// Audit raw evidence text. Never fails: on any error the verdict is
    /// non-compliant with zero confidence.
    pub async fn audit(&self, text: &str) -> AuditResult {
        match self.try_audit(text).await {
            Ok(verdict) => verdict,
            Err(err) => {
                tracing::warn!(error = %err, "evidence audit failed");
                AuditResult::failed()
            }
        }
    }

    /// One chat turn with full history replay. Never fails: on any error
    /// the reply is a fixed connection-error message.
    pub async fn chat(&self, history: &[ChatTurn], message: &str, context: Option<&str>) -> String {
        match self.try_chat(history, message, context).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(error = %err, "chat turn failed");
                "Error de conexión con el servicio de IA.".to_string()
            }
        }
    }

    // ─── Internals ───────────────────────────────────────────────────────

    async fn try_discover(&self, industry: Industry) -> Result<Law, AdvisorError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text(persona::discovery_prompt(industry))],
            system_instruction: None,
            generation_config: Some(GenerationConfig::structured_json(discovery_schema())),
        };
        let payload: DiscoveredRegulation = self.send_structured("discover", &request).await?;
        Ok(payload.into_law())
    }

    async fn try_analyze(
        &self,
        law_title: &str,
        industry: Industry,
    ) -> Result<LawAnalysis, AdvisorError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text(persona::analysis_prompt(
                law_title, industry,
            ))],
            system_instruction: None,
            generation_config: Some(GenerationConfig::structured_json(analysis_schema())),
        };
        self.send_structured("analyze", &request).await
    }

    async fn try_audit(&self, text: &str) -> Result<AuditResult, AdvisorError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text(persona::audit_prompt(text))],
            system_instruction: None,
            generation_config: Some(GenerationConfig::structured_json(audit_schema())),
        };
        self.send_structured("audit", &request).await
    }

    async fn try_chat(
        &self,
        history: &[ChatTurn],
        message: &str,
        context: Option<&str>,
    ) -> Result<String, AdvisorError> {
        let system = format!(
            "{}\n\n{}",
            persona::SYSTEM_INSTRUCTION,
            persona::context_instruction(context)
        );

        // Replay the full prior conversation in order, then the new message.
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| Content::text(turn.role.wire_role(), turn.text.clone()))
            .collect();
        contents.push(Content::user_text(message));

        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(Content::system(system)),
            generation_config: None,
        };
        let response = self.send("chat", &request).await?;
        Ok(response
            .first_text()
            .unwrap_or_else(|| "Lo siento, no pude procesar tu solicitud.".to_string()))
    }

    /// Send a request and decode the structured JSON the response schema
    /// asked for. The model returns it as the candidate's text part.
    async fn send_structured<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        request: &GenerateContentRequest,
    ) -> Result<T, AdvisorError> {
        let response = self.send(operation, request).await?;
        let text = response
            .first_text()
            .ok_or_else(|| AdvisorError::InvalidResponse {
                reason: format!("{operation}: response carried no text"),
            })?;
        serde_json::from_str(&text).map_err(|e| AdvisorError::InvalidResponse {
            reason: format!("{operation}: {e}"),
        })
    }

    async fn send(
        &self,
        operation: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AdvisorError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AdvisorError::Timeout
                } else {
                    AdvisorError::ServiceUnavailable {
                        reason: format!("{operation}: {e}"),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::ServiceUnavailable {
                reason: format!("{operation}: HTTP {status}: {body}"),
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| AdvisorError::InvalidResponse {
                reason: format!("{operation}: {e}"),
            })
    }
}

/// Structured payload returned by regulatory discovery.
#[derive(Debug, Deserialize)]
struct DiscoveredRegulation {
    title: String,
    description: String,
    category: Option<String>,
    iso_impact: Option<String>,
    impact_level: ImpactLevel,
    ai_summary: Option<String>,
    action_steps: Vec<String>,
    estimated_fine: String,
    deadline: String,
    compliance_progress: Option<u8>,
}

impl DiscoveredRegulation {
    fn into_law(self) -> Law {
        Law {
            id: LawId::new(),
            title: self.title,
            description: self.description,
            category: self.category.unwrap_or_else(|| "General".to_string()),
            iso_impact: self.iso_impact,
            impact_level: self.impact_level,
            status: LawStatus::Pendiente,
            date_added: Utc::now(),
            ai_summary: self.ai_summary,
            action_steps: Some(self.action_steps),
            estimated_fine: Some(self.estimated_fine),
            deadline: Some(self.deadline),
            // Zero means the model left the field unscored.
            compliance_progress: Some(
                self.compliance_progress
                    .filter(|p| *p > 0)
                    .unwrap_or(15)
                    .min(100),
            ),
        }
    }
}
