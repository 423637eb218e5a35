//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from legitech-core, legitech-auth, etc. to HTTP
//! status codes. Returns a flat JSON error body whose `error` field is
//! always a human-readable string; gate denials additionally carry a
//! `redirect` hint. Never exposes internal error details to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// JSON error response body.
///
/// All error responses use this shape. `details` carries extra context for
/// client errors; `redirect` is present only on entitlement denials and
/// names the page the client should send the user to.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            redirect: None,
        }
    }

    pub fn with_redirect(mut self, redirect: impl Into<String>) -> Self {
        self.redirect = Some(redirect.into());
        self
    }
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body could not be parsed or failed validation (400).
    #[error("{0}")]
    BadRequest(String),

    /// Authentication failure (401). Covers bad credentials at login and
    /// missing or invalid tokens elsewhere.
    #[error("{0}")]
    Unauthorized(String),

    /// Entitlement gate denial (403). Carries the redirect hint.
    #[error("{message}")]
    Forbidden {
        message: String,
        redirect: &'static str,
    },

    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),

    /// The advisory service returned an error or is unreachable (502).
    #[error("upstream advisory error: {0}")]
    Upstream(String),

    /// Service dependency not configured (503).
    #[error("{0}")]
    ServiceUnavailable(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Never expose internal/upstream error messages to clients.
        let message = match &self {
            Self::Internal(_) => "Error interno del servidor".to_string(),
            Self::Upstream(_) => "Error del servicio de asesoría".to_string(),
            other => other.to_string(),
        };

        // Log server-side errors for operator visibility.
        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Upstream(_) => tracing::error!(error = %self, "upstream advisory error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => {}
        }

        let mut body = ErrorBody::new(message);
        if let Self::Forbidden { redirect, .. } = &self {
            body = body.with_redirect(*redirect);
        }

        (status, Json(body)).into_response()
    }
}

impl From<legitech_core::ValidationError> for AppError {
    fn from(err: legitech_core::ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<legitech_auth::CredentialError> for AppError {
    fn from(err: legitech_auth::CredentialError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<legitech_auth::TokenError> for AppError {
    fn from(err: legitech_auth::TokenError) -> Self {
        match err {
            legitech_auth::TokenError::Invalid => {
                Self::Unauthorized("Sesión inválida o expirada".to_string())
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(format!("database error: {err}"))
    }
}

impl From<legitech_advisor::AdvisorError> for AppError {
    fn from(err: legitech_advisor::AdvisorError) -> Self {
        Self::Upstream(err.to_string())
    }
}
