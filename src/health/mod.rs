//! # Health Aggregation
//!
//! Collects liveness signals from the job executor, the datastore and an
//! optional frontend, and reduces them to one UP/DOWN verdict plus an ordered
//! detail report.
//!
//! - [`aggregator`] - orchestrates probes and computes the verdict
//! - [`job_executor`] - job executor capability and shared state handle
//! - [`datastore`] - scoped connection acquisition and validation
//! - [`postgres`] - PostgreSQL datastore over an sqlx pool
//! - [`frontend`] - frontend and extra detail contributors
//! - [`types`] - result and status types

pub mod aggregator;
pub mod datastore;
pub mod frontend;
pub mod job_executor;
pub mod postgres;
pub mod types;

pub use aggregator::{HealthAggregator, HealthAggregatorBuilder};
pub use datastore::{
    probe_datastore, ConnectionGuard, DatabaseProbe, Datastore, DatastoreConnection,
    DatastoreProbeSettings,
};
pub use frontend::{FrontendHealthContributor, HealthContributor, StaticFrontend, UnknownFrontend};
pub use job_executor::{JobExecutorProbe, JobExecutorState};
pub use postgres::PgDatastore;
pub use types::{HealthDetails, HealthResult, HealthStatus};

use std::any::Any;

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "probe panicked".to_string()
    }
}
