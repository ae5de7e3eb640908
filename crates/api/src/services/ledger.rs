//! Ledger gateway client.
//!
//! The ledger (and the RPC node fronting it) is the authoritative source of
//! truth for circles; this client only reads recorded state on cache
//! misses. Lookups are bounded: a fixed number of attempts with a fixed
//! inter-attempt delay and a per-attempt timeout, after which the caller
//! treats the circle as not found rather than hanging.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::config::LedgerConfig;

/// Errors that can occur during ledger lookups.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger gateway not configured")]
    NotConfigured,

    #[error("Ledger gateway did not respond within {attempts} attempts")]
    Timeout { attempts: u32 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status from ledger gateway: {0}")]
    Status(u16),

    #[error("Invalid circle record from ledger: {0}")]
    InvalidRecord(String),
}

/// A circle as recorded on the ledger.
///
/// This is the gateway's wire contract; records that fail [`validate`]
/// never reach the cache.
///
/// [`validate`]: LedgerCircleRecord::validate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerCircleRecord {
    pub id: i64,
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub wallet_key: Option<String>,
    #[serde(default)]
    pub tx_hash: Option<String>,
}

impl LedgerCircleRecord {
    /// Checks the record is sane enough to persist.
    pub fn validate(&self, expected_id: i64) -> Result<(), LedgerError> {
        if self.id != expected_id {
            return Err(LedgerError::InvalidRecord(format!(
                "id mismatch: asked for {}, got {}",
                expected_id, self.id
            )));
        }
        if self.name.trim().is_empty() {
            return Err(LedgerError::InvalidRecord("empty name".into()));
        }
        if self.owner.trim().is_empty() {
            return Err(LedgerError::InvalidRecord("empty owner".into()));
        }
        Ok(())
    }
}

/// Read access to ledger-recorded circle state.
///
/// The concrete transport is opaque to callers; tests substitute their own
/// implementation.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Fetches the recorded state of a circle. `Ok(None)` means the ledger
    /// has no such circle; errors mean the gateway could not answer.
    async fn fetch_circle(&self, id: i64) -> Result<Option<LedgerCircleRecord>, LedgerError>;
}

/// HTTP client for a ledger RPC node.
pub struct HttpLedgerGateway {
    client: Client,
    base_url: String,
    attempts: u32,
    retry_delay: Duration,
}

impl HttpLedgerGateway {
    /// Builds a gateway from configuration.
    pub fn from_config(config: &LedgerConfig) -> Result<Self, LedgerError> {
        if config.rpc_url.is_empty() {
            return Err(LedgerError::NotConfigured);
        }
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: config.rpc_url.trim_end_matches('/').to_string(),
            attempts: config.attempts.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    async fn request_circle(&self, id: i64) -> Result<Option<LedgerCircleRecord>, LedgerError> {
        let url = format!("{}/circles/{}", self.base_url, id);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(LedgerError::Status(response.status().as_u16()));
        }

        let record: LedgerCircleRecord = response.json().await?;
        record.validate(id)?;
        Ok(Some(record))
    }
}

#[async_trait]
impl LedgerGateway for HttpLedgerGateway {
    async fn fetch_circle(&self, id: i64) -> Result<Option<LedgerCircleRecord>, LedgerError> {
        let mut last_err = None;
        for attempt in 1..=self.attempts {
            match self.request_circle(id).await {
                Ok(found) => return Ok(found),
                Err(err) => {
                    warn!(
                        circle_id = id,
                        attempt,
                        error = %err,
                        "Ledger lookup attempt failed"
                    );
                    last_err = Some(err);
                    if attempt < self.attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        match last_err {
            Some(LedgerError::Http(e)) if e.is_timeout() => Err(LedgerError::Timeout {
                attempts: self.attempts,
            }),
            Some(err) => Err(err),
            None => Err(LedgerError::Timeout {
                attempts: self.attempts,
            }),
        }
    }
}
