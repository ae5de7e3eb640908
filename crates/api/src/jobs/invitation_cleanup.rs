//! Expired invitation purge job.
//!
//! Invitations are cache-owned, so deleting lapsed ones does not violate
//! the no-hard-delete rule that protects ledger-mirrored rows.

use persistence::repositories::InvitationRepository;
use sqlx::SqlitePool;
use tracing::info;

use super::scheduler::{Job, JobFrequency};

/// Deletes expired, unaccepted invitations on a schedule.
pub struct InvitationCleanupJob {
    pool: SqlitePool,
}

impl InvitationCleanupJob {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for InvitationCleanupJob {
    fn name(&self) -> &'static str {
        "invitation_cleanup"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> Result<(), String> {
        let removed = InvitationRepository::new(self.pool.clone())
            .delete_expired()
            .await
            .map_err(|e| format!("Failed to purge expired invitations: {}", e))?;

        if removed > 0 {
            info!(removed, "Purged expired invitations");
        }
        Ok(())
    }
}
