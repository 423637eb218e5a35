//! # legitech-api — Axum HTTP Services for the LegiTech Stack
//!
//! The HTTP surface over the LegiTech compliance platform: credential
//! issuance, membership entitlement, the regulatory monitor with its
//! derived views, and the AI advisory endpoints.
//!
//! ## API Surface
//!
//! | Prefix                  | Module                  | Guard                |
//! |-------------------------|-------------------------|----------------------|
//! | `/v1/auth/*`            | [`routes::auth`]        | public               |
//! | `/v1/generate`          | [`routes::advisor`]     | public               |
//! | `/v1/membership/*`      | [`routes::membership`]  | session              |
//! | `/v1/laws*`             | [`routes::laws`]        | session + membership |
//! | `/v1/chat`, `/v1/audit` | [`routes::advisor`]     | session + membership |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → CorsLayer → AuthMiddleware → EntitlementMiddleware → Handler
//! ```
//!
//! Health probes (`/health/*`) and the OpenAPI document are mounted outside
//! both guards.

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn_with_state;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    // Session + active membership (or admin) required.
    let gated = Router::new()
        .merge(routes::laws::router())
        .merge(routes::advisor::gated_router())
        .layer(from_fn_with_state(
            state.clone(),
            auth::entitlement_middleware,
        ));

    // Session required. The membership endpoints stay outside the gate so
    // expired members can still check status and re-activate.
    let authenticated = Router::new()
        .merge(routes::membership::router())
        .merge(gated)
        .layer(from_fn_with_state(state.clone(), auth::auth_middleware));

    let public = Router::new()
        .merge(routes::auth::router())
        .merge(routes::advisor::public_router())
        .merge(openapi::router());

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new()
        .merge(health)
        .merge(public)
        .merge(authenticated)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
