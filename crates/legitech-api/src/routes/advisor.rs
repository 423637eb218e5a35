//! # Advisory API
//!
//! Endpoints backed by the Gemini adapter.
//!
//! ## Endpoints
//!
//! - `POST /v1/generate` — Raw text generation proxy (public)
//! - `POST /v1/chat`     — Compliance chat with history replay (gated)
//! - `POST /v1/audit`    — Evidence text audit (gated)
//!
//! All three answer 503 when no advisor is configured. Chat and audit
//! otherwise always answer 200: upstream failures surface as the adapter's
//! fallback payloads, not as HTTP errors. The raw proxy is the exception
//! and maps upstream failures to 502.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use legitech_advisor::{AuditResult, ChatTurn, GeminiClient};

use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, Validate};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request for raw text generation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequest {
    pub prompt: String,
}

impl Validate for GenerateRequest {
    fn validate(&self) -> Result<(), String> {
        if self.prompt.trim().is_empty() {
            return Err("El prompt es requerido".to_string());
        }
        Ok(())
    }
}

/// Generated text.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateResponse {
    pub output: String,
}

/// One chat turn. The client owns the conversation and replays the full
/// history on every request; the service stores nothing.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// Prior turns in order, oldest first.
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub history: Vec<ChatTurn>,
    /// The new user message.
    pub message: String,
    /// Optional law title the user is currently inspecting.
    #[serde(default)]
    pub context: Option<String>,
}

impl Validate for ChatRequest {
    fn validate(&self) -> Result<(), String> {
        if self.message.trim().is_empty() {
            return Err("El mensaje es requerido".to_string());
        }
        Ok(())
    }
}

/// The assistant's reply.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub reply: String,
}

/// Request to audit evidence text.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AuditRequest {
    /// Raw text extracted from the document under review.
    pub text: String,
}

impl Validate for AuditRequest {
    fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("El texto de evidencia es requerido".to_string());
        }
        Ok(())
    }
}

/// Audit verdict.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuditResponse {
    pub compliant: bool,
    pub verdict_title: String,
    pub analysis: String,
    pub confidence: f64,
}

impl From<AuditResult> for AuditResponse {
    fn from(verdict: AuditResult) -> Self {
        Self {
            compliant: verdict.compliant,
            verdict_title: verdict.verdict_title,
            analysis: verdict.analysis,
            confidence: verdict.confidence,
        }
    }
}

// ---------------------------------------------------------------------------
// Routers
// ---------------------------------------------------------------------------

/// Public router: the raw generation proxy.
pub fn public_router() -> Router<AppState> {
    Router::new().route("/v1/generate", post(generate))
}

/// Entitlement-gated router: chat and evidence audit.
pub fn gated_router() -> Router<AppState> {
    Router::new()
        .route("/v1/chat", post(chat))
        .route("/v1/audit", post(audit))
}

fn require_advisor(state: &AppState) -> Result<&GeminiClient, AppError> {
    state
        .advisor
        .as_deref()
        .ok_or_else(|| AppError::ServiceUnavailable("Servicio de IA no configurado".to_string()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/generate — Raw text generation proxy.
#[utoipa::path(
    post,
    path = "/v1/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated text", body = GenerateResponse),
        (status = 400, description = "Missing prompt", body = crate::error::ErrorBody),
        (status = 502, description = "Upstream failure", body = crate::error::ErrorBody),
        (status = 503, description = "Advisor not configured", body = crate::error::ErrorBody),
    ),
    tag = "advisor"
)]
async fn generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let request = extract_validated_json(body)?;
    let advisor = require_advisor(&state)?;
    let output = advisor.generate(&request.prompt).await?;
    Ok(Json(GenerateResponse { output }))
}

/// POST /v1/chat — One compliance chat turn with history replay.
#[utoipa::path(
    post,
    path = "/v1/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply (possibly a fallback)", body = ChatResponse),
        (status = 403, description = "Entitlement denied", body = crate::error::ErrorBody),
        (status = 503, description = "Advisor not configured", body = crate::error::ErrorBody),
    ),
    tag = "advisor"
)]
async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let request = extract_validated_json(body)?;
    let advisor = require_advisor(&state)?;
    let reply = advisor
        .chat(&request.history, &request.message, request.context.as_deref())
        .await;
    Ok(Json(ChatResponse { reply }))
}

/// POST /v1/audit — Audit evidence text against current norms.
#[utoipa::path(
    post,
    path = "/v1/audit",
    request_body = AuditRequest,
    responses(
        (status = 200, description = "Audit verdict (possibly a failed fallback)", body = AuditResponse),
        (status = 403, description = "Entitlement denied", body = crate::error::ErrorBody),
        (status = 503, description = "Advisor not configured", body = crate::error::ErrorBody),
    ),
    tag = "advisor"
)]
async fn audit(
    State(state): State<AppState>,
    body: Result<Json<AuditRequest>, JsonRejection>,
) -> Result<Json<AuditResponse>, AppError> {
    let request = extract_validated_json(body)?;
    let advisor = require_advisor(&state)?;
    let verdict = advisor.audit(&request.text).await;
    Ok(Json(AuditResponse::from(verdict)))
}
