//! # legitech-api — Binary Entry Point
//!
//! Starts the Axum HTTP server. Binds to a configurable port (default 8080).
//!
//! ## Environment
//!
//! - `LEGITECH_JWT_SECRET` — required, at least 32 bytes; the process
//!   refuses to start without it.
//! - `DATABASE_URL` — optional; absent means memory-only mode.
//! - `GEMINI_API_KEY` — optional; absent means AI endpoints answer 503.
//! - `PORT` — optional, default 8080.

use legitech_api::state::{AppConfig, AppState};
use legitech_auth::SecretKey;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment. The signing secret has no
    // fallback: refusing to boot beats silently issuing forgeable sessions.
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let jwt_secret = std::env::var("LEGITECH_JWT_SECRET")
        .map_err(|_| anyhow::anyhow!("LEGITECH_JWT_SECRET must be set"))
        .and_then(|secret| {
            SecretKey::new(secret).map_err(|e| anyhow::anyhow!("LEGITECH_JWT_SECRET rejected: {e}"))
        })?;

    let config = AppConfig { port, jwt_secret };

    // Initialize database pool (optional — absent means memory-only).
    let db_pool = legitech_api::db::init_pool().await.map_err(|e| {
        tracing::error!("Database initialization failed: {e}");
        e
    })?;

    // Advisory client from environment.
    let advisor = match std::env::var("GEMINI_API_KEY") {
        Ok(api_key) => {
            let client =
                legitech_advisor::GeminiClient::new(legitech_advisor::GeminiConfig::new(api_key))?;
            tracing::info!("Advisory client configured");
            Some(client)
        }
        Err(_) => {
            tracing::warn!("GEMINI_API_KEY not set — AI endpoints will return 503.");
            None
        }
    };

    let state = AppState::new(config)
        .with_db(db_pool)
        .with_advisor(advisor);

    // Hydrate in-memory stores from the database (if connected).
    if let Some(pool) = state.db.clone() {
        legitech_api::db::hydrate_stores(&pool, &state).await.map_err(|e| {
            tracing::error!("Database hydration failed: {e}");
            e
        })?;
    }

    let app = legitech_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("LegiTech API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
