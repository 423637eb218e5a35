//! # Database Persistence Layer
//!
//! Postgres persistence for accounts and memberships via SQLx.
//!
//! The database layer is **optional**. When `DATABASE_URL` is set, users
//! and memberships are written through to PostgreSQL and the in-memory
//! stores are hydrated from it at startup. When absent, the API operates
//! in memory-only mode (suitable for development and testing).
//!
//! The law book and chat history are deliberately not persisted: the book
//! reseeds on restart and conversations live on the client.

pub mod memberships;
pub mod users;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in memory-only mode. \
                 Accounts will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Hydrate the in-memory stores from the database at startup.
pub async fn hydrate_stores(pool: &PgPool, state: &crate::state::AppState) -> Result<(), sqlx::Error> {
    let users = users::load_all(pool).await?;
    let memberships = memberships::load_all(pool).await?;
    tracing::info!(
        users = users.len(),
        memberships = memberships.len(),
        "hydrated stores from database"
    );
    state.users.hydrate(users);
    state.memberships.hydrate(memberships);
    Ok(())
}
