//! # PostgreSQL Datastore
//!
//! [`Datastore`] over an sqlx [`PgPool`]. An idle pooled connection is reused
//! when one is available. Otherwise the probe opens a dedicated connection with
//! the pool's connect options, so a connect failure surfaces the driver's own
//! error at once instead of the pool's retry loop ending in `PoolTimedOut`.
//! Validation pings the connection. Release returns a pooled connection to the
//! pool and closes a dedicated one.

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnection, PgPoolOptions};
use sqlx::{Connection, PgPool, Postgres};
use std::time::Duration;
use tracing::debug;

use super::datastore::{Datastore, DatastoreConnection};
use crate::config::DatabaseProbeConfig;
use crate::error::{DatastoreError, Result};

/// PostgreSQL-backed datastore
#[derive(Debug, Clone)]
pub struct PgDatastore {
    pool: PgPool,
}

impl PgDatastore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a lazily-connecting pool; no connection is opened until the first probe.
    pub fn from_config(config: &DatabaseProbeConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(0)
            .acquire_timeout(config.acquire_timeout())
            .connect_lazy(&config.url)?;

        debug!(
            max_connections = config.max_connections,
            acquire_timeout_ms = config.acquire_timeout_ms,
            "PostgreSQL datastore configured"
        );

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Datastore for PgDatastore {
    async fn acquire_connection(&self) -> std::result::Result<Box<dyn DatastoreConnection>, DatastoreError> {
        let connection = match self.pool.try_acquire() {
            Some(pooled) => ProbeConnection::Pooled(pooled),
            None => {
                let options = self.pool.connect_options();
                ProbeConnection::Dedicated(PgConnection::connect_with(&options).await?)
            }
        };
        Ok(Box::new(PgProbeConnection {
            connection: Some(connection),
        }))
    }
}

enum ProbeConnection {
    Pooled(PoolConnection<Postgres>),
    Dedicated(PgConnection),
}

struct PgProbeConnection {
    connection: Option<ProbeConnection>,
}

#[async_trait]
impl DatastoreConnection for PgProbeConnection {
    async fn is_valid(&mut self, timeout: Duration) -> std::result::Result<bool, DatastoreError> {
        let Some(connection) = self.connection.as_mut() else {
            return Ok(false);
        };

        let ping = match connection {
            ProbeConnection::Pooled(pooled) => pooled.ping(),
            ProbeConnection::Dedicated(dedicated) => dedicated.ping(),
        };

        match tokio::time::timeout(timeout, ping).await {
            Ok(Ok(())) => Ok(true),
            Ok(Err(e)) => Err(DatastoreError::Validation(e.to_string())),
            Err(_) => Err(DatastoreError::Timeout {
                operation: "validation",
                after: timeout,
            }),
        }
    }

    fn release(&mut self) {
        match self.connection.take() {
            // Dropping a pooled connection returns it to the pool.
            Some(ProbeConnection::Pooled(_)) => debug!("PostgreSQL probe connection returned to pool"),
            Some(ProbeConnection::Dedicated(dedicated)) => {
                // Close politely when a runtime is around; dropping still closes the socket.
                if let Ok(handle) = tokio::runtime::Handle::try_current() {
                    handle.spawn(async move {
                        if let Err(e) = dedicated.close().await {
                            debug!(error = %e, "PostgreSQL probe connection close failed");
                        }
                    });
                }
                debug!("PostgreSQL probe connection closed");
            }
            None => {}
        }
    }
}
