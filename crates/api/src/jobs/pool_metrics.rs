//! Connection pool metrics job.

use persistence::metrics::record_pool_metrics;
use sqlx::SqlitePool;

use super::scheduler::{Job, JobFrequency};

/// Publishes pool gauges every minute.
pub struct PoolMetricsJob {
    pool: SqlitePool,
}

impl PoolMetricsJob {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(1)
    }

    async fn execute(&self) -> Result<(), String> {
        record_pool_metrics(&self.pool);
        Ok(())
    }
}
