//! Cache-to-ledger reconciliation.
//!
//! Reads prefer the cache. A miss triggers exactly one bounded ledger
//! lookup; whatever comes back is written into the cache (self-healing)
//! before being returned. Gateway failures degrade to "not found" because
//! running without a ledger is a supported mode, but they are logged and
//! counted distinctly so an outage never masquerades as missing data.

use std::sync::Arc;

use persistence::entities::CircleEntity;
use persistence::repositories::CircleRepository;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::middleware::metrics::record_ledger_fallback;
use crate::services::ledger::{LedgerError, LedgerGateway};

/// Read-through circle lookup over the cache and an optional ledger
/// gateway.
#[derive(Clone)]
pub struct CircleReconciler {
    circles: CircleRepository,
    ledger: Option<Arc<dyn LedgerGateway>>,
}

impl CircleReconciler {
    pub fn new(pool: SqlitePool, ledger: Option<Arc<dyn LedgerGateway>>) -> Self {
        Self {
            circles: CircleRepository::new(pool),
            ledger,
        }
    }

    /// Looks up a circle, healing the cache from the ledger on a miss.
    ///
    /// Absence everywhere is an `Ok(None)`, not an error; only cache
    /// failures propagate.
    pub async fn get_circle(&self, id: i64) -> Result<Option<CircleEntity>, sqlx::Error> {
        if let Some(cached) = self.circles.find_by_id(id).await? {
            return Ok(Some(cached));
        }

        let Some(gateway) = &self.ledger else {
            // Cache-only mode: no gateway configured.
            return Ok(None);
        };

        match gateway.fetch_circle(id).await {
            Ok(Some(record)) => {
                record_ledger_fallback("hit");
                info!(circle_id = id, "Cache miss healed from ledger");
                let healed = self
                    .circles
                    .upsert(
                        record.id,
                        &record.name,
                        &record.owner,
                        record.wallet_key.as_deref(),
                        record.tx_hash.as_deref(),
                    )
                    .await?;
                Ok(Some(healed))
            }
            Ok(None) => {
                record_ledger_fallback("miss");
                Ok(None)
            }
            Err(err @ LedgerError::Timeout { .. }) => {
                record_ledger_fallback("timeout");
                warn!(
                    circle_id = id,
                    error = %err,
                    "Ledger lookup timed out; reporting not found"
                );
                Ok(None)
            }
            Err(err) => {
                record_ledger_fallback("error");
                warn!(
                    circle_id = id,
                    error = %err,
                    "Ledger lookup failed; reporting not found"
                );
                Ok(None)
            }
        }
    }
}
