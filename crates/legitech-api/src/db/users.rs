//! User account persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `users` table.

use sqlx::PgPool;
use uuid::Uuid;

use chrono::{DateTime, Utc};

use legitech_core::{Email, Role, UserId};
use legitech_entitlement::Membership;

use crate::state::UserRecord;

/// Insert a new user and their trial membership in one transaction.
///
/// Registration either fully happens or doesn't: a crash between the two
/// inserts must not leave an account without its membership.
pub async fn insert_with_membership(
    pool: &PgPool,
    record: &UserRecord,
    membership: &Membership,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(record.id.as_uuid())
    .bind(&record.name)
    .bind(record.email.as_str())
    .bind(&record.password_hash)
    .bind(record.role.as_str())
    .bind(record.created_at)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO memberships (user_id, membership_type, status, start_date, end_date)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(membership.user_id.as_uuid())
    .bind(membership.membership_type.as_str())
    .bind(membership.status.as_str())
    .bind(membership.start_date)
    .bind(membership.end_date)
    .execute(&mut *tx)
    .await?;

    tx.commit().await
}

/// Load all users into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<UserRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, name, email, password_hash, role, created_at
         FROM users ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        match row.into_record() {
            Some(record) => records.push(record),
            None => {
                tracing::error!("skipping user row with invalid email during load_all");
            }
        }
    }
    Ok(records)
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_record(self) -> Option<UserRecord> {
        let email = match Email::new(&self.email) {
            Ok(email) => email,
            Err(err) => {
                tracing::warn!(user_id = %self.id, error = %err, "stored email failed validation");
                return None;
            }
        };
        Some(UserRecord {
            id: UserId::from_uuid(self.id),
            name: self.name,
            email,
            password_hash: self.password_hash,
            role: Role::parse_lossy(&self.role),
            created_at: self.created_at,
        })
    }
}
