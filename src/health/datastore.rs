//! # Datastore Probe
//!
//! Acquires one connection, validates it under a short timeout and releases
//! it before returning. The connection lives inside a [`ConnectionGuard`], so
//! release runs on every exit path: success, failed validation, error, panic
//! unwinding, and cancellation when a timeout drops the probe future.

use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::constants::{DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_VALIDATION_TIMEOUT};
use crate::error::DatastoreError;

/// Source of connections to the backing store.
#[async_trait]
pub trait Datastore: Send + Sync {
    async fn acquire_connection(&self) -> Result<Box<dyn DatastoreConnection>, DatastoreError>;
}

/// A single acquired connection.
#[async_trait]
pub trait DatastoreConnection: Send {
    /// Check the connection is usable within `timeout`.
    async fn is_valid(&mut self, timeout: Duration) -> Result<bool, DatastoreError>;

    /// Give the connection back. Must be idempotent.
    fn release(&mut self);
}

/// Owns an acquired connection and releases it on drop.
pub struct ConnectionGuard {
    connection: Box<dyn DatastoreConnection>,
}

impl ConnectionGuard {
    pub fn new(connection: Box<dyn DatastoreConnection>) -> Self {
        Self { connection }
    }

    pub fn connection(&mut self) -> &mut dyn DatastoreConnection {
        self.connection.as_mut()
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.connection.release();
    }
}

impl std::fmt::Debug for ConnectionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGuard").finish_non_exhaustive()
    }
}

/// Time budgets for one datastore probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatastoreProbeSettings {
    pub acquire_timeout: Duration,
    pub validation_timeout: Duration,
}

impl Default for DatastoreProbeSettings {
    fn default() -> Self {
        Self {
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            validation_timeout: DEFAULT_VALIDATION_TIMEOUT,
        }
    }
}

/// Outcome of probing a configured datastore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseProbe {
    pub connected: bool,
    pub error: Option<DatastoreError>,
    pub duration_ms: u64,
}

/// Probe `datastore` once. Never fails and never panics; every failure is
/// folded into the returned [`DatabaseProbe`].
pub async fn probe_datastore(
    datastore: &dyn Datastore,
    settings: &DatastoreProbeSettings,
) -> DatabaseProbe {
    let start = Instant::now();

    let outcome = AssertUnwindSafe(acquire_and_validate(datastore, settings))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(DatastoreError::Unexpected(super::panic_message(&*panic))));

    let duration_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(()) => {
            debug!(duration_ms = duration_ms, "Datastore probe successful");
            DatabaseProbe {
                connected: true,
                error: None,
                duration_ms,
            }
        }
        Err(error) => {
            warn!(
                category = error.category(),
                error = %error,
                duration_ms = duration_ms,
                "Datastore probe failed"
            );
            DatabaseProbe {
                connected: false,
                error: Some(error),
                duration_ms,
            }
        }
    }
}

async fn acquire_and_validate(
    datastore: &dyn Datastore,
    settings: &DatastoreProbeSettings,
) -> Result<(), DatastoreError> {
    let connection = tokio::time::timeout(settings.acquire_timeout, datastore.acquire_connection())
        .await
        .map_err(|_| DatastoreError::Timeout {
            operation: "connection acquisition",
            after: settings.acquire_timeout,
        })??;

    let mut guard = ConnectionGuard::new(connection);

    let valid = tokio::time::timeout(
        settings.validation_timeout,
        guard.connection().is_valid(settings.validation_timeout),
    )
    .await
    .map_err(|_| DatastoreError::Timeout {
        operation: "validation",
        after: settings.validation_timeout,
    })??;

    if valid {
        Ok(())
    } else {
        Err(DatastoreError::InvalidConnection)
    }
}
