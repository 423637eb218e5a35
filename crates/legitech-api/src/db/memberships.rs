//! Membership persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `memberships` table.
//! The table is keyed by user id, so an upsert is the only write path.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use legitech_core::UserId;
use legitech_entitlement::{Membership, MembershipStatus, MembershipType};

/// Insert or replace a user's membership.
pub async fn upsert(pool: &PgPool, membership: &Membership) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO memberships (user_id, membership_type, status, start_date, end_date)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (user_id) DO UPDATE SET
             membership_type = EXCLUDED.membership_type,
             status = EXCLUDED.status,
             start_date = EXCLUDED.start_date,
             end_date = EXCLUDED.end_date",
    )
    .bind(membership.user_id.as_uuid())
    .bind(membership.membership_type.as_str())
    .bind(membership.status.as_str())
    .bind(membership.start_date)
    .bind(membership.end_date)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all memberships into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Membership>, sqlx::Error> {
    let rows = sqlx::query_as::<_, MembershipRow>(
        "SELECT user_id, membership_type, status, start_date, end_date FROM memberships",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(MembershipRow::into_record).collect())
}

fn parse_membership_type(s: &str) -> MembershipType {
    match s {
        "free" => MembershipType::Free,
        "annual" => MembershipType::Annual,
        other => {
            tracing::warn!(
                membership_type = other,
                "unknown membership type in database, defaulting to annual"
            );
            MembershipType::Annual
        }
    }
}

fn parse_membership_status(s: &str) -> MembershipStatus {
    match s {
        "active" => MembershipStatus::Active,
        "expired" => MembershipStatus::Expired,
        other => {
            tracing::warn!(
                status = other,
                "unknown membership status in database, defaulting to expired"
            );
            MembershipStatus::Expired
        }
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct MembershipRow {
    user_id: Uuid,
    membership_type: String,
    status: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
}

impl MembershipRow {
    fn into_record(self) -> Membership {
        Membership {
            user_id: UserId::from_uuid(self.user_id),
            membership_type: parse_membership_type(&self.membership_type),
            status: parse_membership_status(&self.status),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}
