//! Repository for invitation operations.
//!
//! Invitations are cache-owned: the token is minted here, not on the
//! ledger. Acceptance and the resulting member row commit in one
//! transaction so a token can never be consumed without the membership
//! landing.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sqlx::SqlitePool;

use crate::entities::{InvitationEntity, STATUS_ACCEPTED, STATUS_PENDING};

const INVITATION_COLUMNS: &str = "token, circle_id, email, member_name, inviter_name, \
     status, created_at, expires_at, accepted_at, accepted_address";

/// Outcome of an acceptance attempt.
#[derive(Debug)]
pub enum AcceptOutcome {
    /// Token consumed; the invitation row as of acceptance.
    Accepted(InvitationEntity),
    /// No such token.
    NotFound,
    /// Token was already consumed.
    AlreadyAccepted,
    /// Token lapsed before acceptance.
    Expired,
}

/// Repository for invitation rows.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: SqlitePool,
}

impl InvitationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new pending invitation.
    pub async fn create(
        &self,
        circle_id: i64,
        token: &str,
        email: &str,
        member_name: &str,
        inviter_name: Option<&str>,
        expires_at: DateTime<Utc>,
    ) -> Result<InvitationEntity, sqlx::Error> {
        sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            INSERT INTO invitations (token, circle_id, email, member_name, inviter_name,
                                     status, created_at, expires_at)
            VALUES (?1, ?2, ?3, ?4, ?5, '{STATUS_PENDING}', ?6, ?7)
            RETURNING {INVITATION_COLUMNS}
            "#
        ))
        .bind(token)
        .bind(circle_id)
        .bind(email)
        .bind(member_name)
        .bind(inviter_name)
        .bind(Utc::now())
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
    }

    /// Finds an invitation by its token.
    pub async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<InvitationEntity>, sqlx::Error> {
        sqlx::query_as::<_, InvitationEntity>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE token = ?1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
    }

    /// Consumes a pending token and upserts the member row in one
    /// transaction.
    ///
    /// The guarded UPDATE makes the pending-to-accepted transition happen
    /// exactly once even under concurrent accepts; losers of the race see
    /// [`AcceptOutcome::AlreadyAccepted`]. The member's display name is the
    /// invitation's `member_name`, merged stickily.
    pub async fn accept(
        &self,
        token: &str,
        address: &str,
    ) -> Result<AcceptOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let updated = sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            UPDATE invitations
            SET status = '{STATUS_ACCEPTED}', accepted_at = ?2, accepted_address = ?3
            WHERE token = ?1 AND status = '{STATUS_PENDING}' AND expires_at > ?2
            RETURNING {INVITATION_COLUMNS}
            "#
        ))
        .bind(token)
        .bind(now)
        .bind(address)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(invitation) = updated else {
            let existing = sqlx::query_as::<_, InvitationEntity>(&format!(
                "SELECT {INVITATION_COLUMNS} FROM invitations WHERE token = ?1"
            ))
            .bind(token)
            .fetch_optional(&mut *tx)
            .await?;
            tx.rollback().await?;
            return Ok(match existing {
                None => AcceptOutcome::NotFound,
                Some(inv) if inv.is_accepted() => AcceptOutcome::AlreadyAccepted,
                Some(_) => AcceptOutcome::Expired,
            });
        };

        sqlx::query(
            r#"
            INSERT INTO members (circle_id, address, name, is_owner, tx_hash, joined_at)
            VALUES (?1, ?2, ?3, 0, NULL, ?4)
            ON CONFLICT(circle_id, address) DO UPDATE SET
                name = COALESCE(excluded.name, members.name)
            "#,
        )
        .bind(invitation.circle_id)
        .bind(address)
        .bind(&invitation.member_name)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(AcceptOutcome::Accepted(invitation))
    }

    /// Lists a circle's invitations, newest first.
    pub async fn list_by_circle(
        &self,
        circle_id: i64,
    ) -> Result<Vec<InvitationEntity>, sqlx::Error> {
        sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            SELECT {INVITATION_COLUMNS}
            FROM invitations
            WHERE circle_id = ?1
            ORDER BY created_at DESC
            "#
        ))
        .bind(circle_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Summary counts (pending / accepted / expired) for one circle.
    pub async fn summary_counts(&self, circle_id: i64) -> Result<(i64, i64, i64), sqlx::Error> {
        let row: (i64, i64, i64) = sqlx::query_as(&format!(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = '{STATUS_PENDING}' AND expires_at > ?2),
                COUNT(*) FILTER (WHERE status = '{STATUS_ACCEPTED}'),
                COUNT(*) FILTER (WHERE status = '{STATUS_PENDING}' AND expires_at <= ?2)
            FROM invitations
            WHERE circle_id = ?1
            "#
        ))
        .bind(circle_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Deletes expired, unconsumed invitations. Returns how many were
    /// removed.
    pub async fn delete_expired(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(&format!(
            "DELETE FROM invitations WHERE status = '{STATUS_PENDING}' AND expires_at < ?1"
        ))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

/// Generates an invitation token.
///
/// URL-safe characters only, avoiding the confusable ones (0, O, 1, l, I).
pub fn generate_invitation_token() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789";
    let mut rng = rand::thread_rng();

    (0..32)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Expiration a given number of days out.
pub fn calculate_expiration(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}
