//! # Membership API
//!
//! Status and activation for the caller's own membership. Both endpoints
//! require a valid session but are NOT entitlement-gated: an expired member
//! must be able to see their status and buy a new membership.
//!
//! ## Endpoints
//!
//! - `GET  /v1/membership/status`   — Current membership, lazily expired
//! - `POST /v1/membership/activate` — Upsert an active membership

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use legitech_entitlement::{Membership, MembershipType};

use crate::auth::CallerIdentity;
use crate::db;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Membership status for the caller.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    /// Whether the membership currently grants access.
    pub is_member: bool,
    /// The record itself, if the caller has ever held one.
    #[schema(value_type = Option<Object>)]
    pub membership: Option<Membership>,
}

/// Request to activate a membership.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ActivateRequest {
    /// Tier to activate. Defaults to annual.
    #[serde(rename = "type", default)]
    #[schema(value_type = Option<String>)]
    pub membership_type: Option<MembershipType>,
}

/// The freshly activated membership.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivateResponse {
    #[schema(value_type = Object)]
    pub membership: Membership,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the membership router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/membership/status", get(status))
        .route("/v1/membership/activate", post(activate))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /v1/membership/status — Current membership with lazy expiry applied.
#[utoipa::path(
    get,
    path = "/v1/membership/status",
    responses(
        (status = 200, description = "Membership status", body = StatusResponse),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody),
    ),
    tag = "membership"
)]
async fn status(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<StatusResponse>, AppError> {
    let now = Utc::now();
    let mut membership = state.memberships.get(&caller.user_id);

    // Reads are the expiry mechanism: flip a lapsed record and persist it.
    if let Some(m) = membership.as_mut() {
        if m.refresh(now) {
            state.memberships.upsert(m.clone());
            if let Some(pool) = &state.db {
                db::memberships::upsert(pool, m).await?;
            }
            tracing::info!(user_id = %caller.user_id, "membership expired on read");
        }
    }

    let is_member = membership
        .as_ref()
        .is_some_and(|m| m.is_current(now));
    Ok(Json(StatusResponse {
        is_member,
        membership,
    }))
}

/// POST /v1/membership/activate — Upsert an active membership for the caller.
#[utoipa::path(
    post,
    path = "/v1/membership/activate",
    request_body = ActivateRequest,
    responses(
        (status = 200, description = "Membership activated", body = ActivateResponse),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody),
    ),
    tag = "membership"
)]
async fn activate(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<ActivateRequest>, JsonRejection>,
) -> Result<Json<ActivateResponse>, AppError> {
    let request = extract_json(body)?;
    let tier = request.membership_type.unwrap_or_default();

    let membership = Membership::activate(caller.user_id, tier, Utc::now());
    state.memberships.upsert(membership.clone());
    if let Some(pool) = &state.db {
        db::memberships::upsert(pool, &membership).await?;
    }
    tracing::info!(user_id = %caller.user_id, tier = %tier, "membership activated");

    Ok(Json(ActivateResponse { membership }))
}
