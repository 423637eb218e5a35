//! Advisory adapter error types.

/// Errors from Gemini API calls.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    /// The client itself could not be constructed.
    #[error("advisor not configured: {reason}")]
    NotConfigured { reason: String },

    /// HTTP transport failure or non-2xx response.
    #[error("advisory service unavailable: {reason}")]
    ServiceUnavailable { reason: String },

    /// The request exceeded the client timeout.
    #[error("advisory request timed out")]
    Timeout,

    /// The upstream answered 2xx but the payload was unusable.
    #[error("advisory response rejected: {reason}")]
    InvalidResponse { reason: String },
}
