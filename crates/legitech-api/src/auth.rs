//! # Authentication & Entitlement Middleware
//!
//! Two layers guard the API surface:
//!
//! 1. `auth_middleware` verifies the Bearer JWT and injects a
//!    [`CallerIdentity`] into request extensions. Handlers extract it via
//!    the `FromRequestParts` impl.
//! 2. `entitlement_middleware` runs inside the auth layer on gated routes.
//!    It loads the caller's membership, applies lazy expiry (persisting the
//!    transition), and evaluates the gate. Denials answer 403 with a
//!    `redirect` hint; admins pass unconditionally.

use axum::extract::{Request, State};
use axum::http::{header, request::Parts};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use legitech_auth::verify_token;
use legitech_core::{Email, Role, UserId};
use legitech_entitlement::{evaluate, Entitlement};

use crate::db;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller, decoded from the session token.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub user_id: UserId,
    pub email: Email,
    pub role: Role,
}

/// Axum `FromRequestParts` implementation for `CallerIdentity`.
///
/// Extracts the identity that the auth middleware injected into extensions.
/// Returns 401 if no identity is present (middleware didn't run or failed).
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Sesión requerida".into()))
    }
}

/// Verify the Bearer token and inject the caller identity.
///
/// Token claims are self-contained; no store lookup happens here. A token
/// for a since-deleted user still authenticates until it expires, which is
/// the accepted trade-off of stateless sessions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let token = match bearer {
        Some(token) => token,
        None => {
            tracing::debug!("authentication failed: missing or non-Bearer authorization header");
            return unauthorized_response("Sesión requerida");
        }
    };

    let claims = match verify_token(&state.config.jwt_secret, token) {
        Ok(claims) => claims,
        Err(_) => {
            tracing::debug!("authentication failed: token rejected");
            return unauthorized_response("Sesión inválida o expirada");
        }
    };

    // The email inside a signed token was validated at issuance.
    let email = match Email::new(claims.email.clone()) {
        Ok(email) => email,
        Err(_) => {
            tracing::warn!("token carried an unparseable email claim");
            return unauthorized_response("Sesión inválida o expirada");
        }
    };

    request.extensions_mut().insert(CallerIdentity {
        user_id: claims.user_id(),
        email,
        role: claims.role,
    });
    next.run(request).await
}

/// Gate a route on membership entitlement.
///
/// Must be layered inside `auth_middleware`; a request that reaches this
/// without an identity is treated as unauthenticated.
pub async fn entitlement_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let caller = request.extensions().get::<CallerIdentity>().cloned();
    let role = caller.as_ref().map(|c| c.role);
    let now = Utc::now();

    // Lazy expiry: flip a lapsed record on read and persist the flip before
    // judging the request.
    let membership = match &caller {
        Some(caller) => {
            let mut membership = state.memberships.get(&caller.user_id);
            if let Some(m) = membership.as_mut() {
                if m.refresh(now) {
                    state.memberships.upsert(m.clone());
                    if let Some(pool) = &state.db {
                        if let Err(err) = db::memberships::upsert(pool, m).await {
                            tracing::error!(error = %err, "failed to persist membership expiry");
                        }
                    }
                    tracing::info!(user_id = %caller.user_id, "membership expired on read");
                }
            }
            membership
        }
        None => None,
    };

    let verdict = evaluate(role, membership.as_ref(), now);
    if verdict.grants_access() {
        return next.run(request).await;
    }

    tracing::debug!(verdict = %verdict, "entitlement gate denied request");
    denial_error(verdict).into_response()
}

fn unauthorized_response(message: &str) -> Response {
    AppError::Unauthorized(message.to_string()).into_response()
}

fn denial_error(verdict: Entitlement) -> AppError {
    match verdict {
        Entitlement::Unauthenticated => AppError::Unauthorized("Sesión requerida".to_string()),
        Entitlement::ExpiredMember => AppError::Forbidden {
            message: "Tu membresía ha expirado".to_string(),
            redirect: verdict.redirect_path().unwrap_or("/pricing"),
        },
        _ => AppError::Forbidden {
            message: "Se requiere una membresía activa".to_string(),
            redirect: verdict.redirect_path().unwrap_or("/pricing"),
        },
    }
}
