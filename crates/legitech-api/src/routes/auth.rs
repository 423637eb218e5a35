//! # Credential API
//!
//! Registration and login. Both endpoints are public and both return a
//! session token plus the public user representation.
//!
//! ## Endpoints
//!
//! - `POST /v1/auth/register` — Create an account (and its trial membership)
//! - `POST /v1/auth/login`    — Exchange credentials for a session token
//!
//! Login failures are deliberately uniform: an unknown email and a wrong
//! password produce the same 401 body, so the endpoint cannot be used to
//! probe which addresses are registered.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use legitech_auth::{hash_password, issue_session, verify_password};
use legitech_core::{Email, Role, UserId};
use legitech_entitlement::Membership;

use crate::db;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::{AppState, UserRecord};

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to register a new account.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    /// Validated and normalized at deserialization time.
    #[schema(value_type = String)]
    pub email: Email,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("El nombre es requerido".to_string());
        }
        if self.password.is_empty() {
            return Err("La contraseña es requerida".to_string());
        }
        Ok(())
    }
}

/// Request to log in.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public representation of a user. Never carries the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[schema(value_type = String)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for UserResponse {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: *record.id.as_uuid(),
            name: record.name.clone(),
            email: record.email.as_str().to_string(),
            role: record.role,
            created_at: record.created_at,
        }
    }
}

/// Session token plus the account it belongs to.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the credential router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/register", post(register))
        .route("/v1/auth/login", post(login))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/auth/register — Create an account and its trial membership.
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = SessionResponse),
        (status = 400, description = "Validation failure or duplicate email", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let request = extract_validated_json(body)?;

    let now = Utc::now();
    let password_hash = hash_password(&request.password)?;
    let record = UserRecord {
        id: UserId::new(),
        name: request.name.trim().to_string(),
        email: request.email,
        password_hash,
        role: Role::User,
        created_at: now,
    };
    let membership = Membership::trial(record.id, now);

    // The store insert is the uniqueness check; it holds the write lock.
    if !state.users.insert(record.clone()) {
        return Err(AppError::BadRequest("El email ya está registrado".to_string()));
    }
    state.memberships.upsert(membership.clone());

    if let Some(pool) = &state.db {
        db::users::insert_with_membership(pool, &record, &membership).await?;
    }

    let token = issue_session(
        &state.config.jwt_secret,
        record.id,
        &record.email,
        record.role,
    )?;
    tracing::info!(user_id = %record.id, "account registered");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token,
            user: UserResponse::from(&record),
        }),
    ))
}

/// POST /v1/auth/login — Exchange credentials for a session token.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued", body = SessionResponse),
        (status = 401, description = "Unknown email or wrong password", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    let request = crate::extractors::extract_json(body)?;

    let invalid = || AppError::Unauthorized("Credenciales inválidas".to_string());

    // A malformed email can't belong to an account; same uniform rejection.
    let email = Email::new(request.email).map_err(|_| invalid())?;
    let record = state.users.find_by_email(&email).ok_or_else(invalid)?;

    if !verify_password(&request.password, &record.password_hash) {
        return Err(invalid());
    }

    let token = issue_session(
        &state.config.jwt_secret,
        record.id,
        &record.email,
        record.role,
    )?;
    tracing::debug!(user_id = %record.id, "session issued");

    Ok(Json(SessionResponse {
        token,
        user: UserResponse::from(&record),
    }))
}
