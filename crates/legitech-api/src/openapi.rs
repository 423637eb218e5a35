//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LegiTech API",
        version = "0.1.0",
        description = "Credential, membership, regulatory monitoring, and AI advisory services for the LegiTech compliance platform.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Credentials
        crate::routes::auth::register,
        crate::routes::auth::login,
        // Membership
        crate::routes::membership::status,
        crate::routes::membership::activate,
        // Regulatory monitor
        crate::routes::laws::list_laws,
        crate::routes::laws::discover_law,
        crate::routes::laws::enrich_law,
        // Advisory
        crate::routes::advisor::generate,
        crate::routes::advisor::chat,
        crate::routes::advisor::audit,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::routes::auth::RegisterRequest,
        crate::routes::auth::LoginRequest,
        crate::routes::auth::UserResponse,
        crate::routes::auth::SessionResponse,
        crate::routes::membership::StatusResponse,
        crate::routes::membership::ActivateRequest,
        crate::routes::membership::ActivateResponse,
        crate::routes::laws::LawListResponse,
        crate::routes::laws::DiscoverRequest,
        crate::routes::laws::DiscoverResponse,
        crate::routes::laws::EnrichRequest,
        crate::routes::laws::EnrichResponse,
        crate::routes::advisor::GenerateRequest,
        crate::routes::advisor::GenerateResponse,
        crate::routes::advisor::ChatRequest,
        crate::routes::advisor::ChatResponse,
        crate::routes::advisor::AuditRequest,
        crate::routes::advisor::AuditResponse,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "membership", description = "Membership status and activation"),
        (name = "laws", description = "Regulatory monitoring and derived views"),
        (name = "advisor", description = "AI advisory endpoints"),
    )
)]
pub struct ApiDoc;

/// Router serving the OpenAPI document.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_spec))
}

async fn serve_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
