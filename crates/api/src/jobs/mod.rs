//! Background jobs.

pub mod invitation_cleanup;
pub mod pool_metrics;
pub mod scheduler;

pub use invitation_cleanup::InvitationCleanupJob;
pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
