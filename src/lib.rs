#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Tasker Health
//!
//! Health aggregation for the Tasker workflow engine.
//!
//! ## Overview
//!
//! The engine depends on a background job executor, a PostgreSQL datastore,
//! the work queue fed by registered engines, and optionally a UI frontend.
//! This crate probes each of them on demand and reduces the signals to a
//! single UP/DOWN verdict plus an ordered detail report that health
//! endpoints can render directly.
//!
//! Each check is a fresh snapshot: nothing is cached, retried or persisted.
//!
//! ## Module Organization
//!
//! - [`health`] - probes, contributors and the aggregator
//! - [`report`] - rendering results for health endpoints
//! - [`config`] - layered configuration loading
//! - [`logging`] - tracing initialization and structured health events
//! - [`error`] - structured error handling
//! - [`constants`] - detail keys and defaults
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tasker_health::config::DatabaseProbeConfig;
//! use tasker_health::health::{HealthAggregator, JobExecutorState, PgDatastore};
//! use tasker_health::report::HealthReport;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = Arc::new(JobExecutorState::new());
//! let datastore = PgDatastore::from_config(&DatabaseProbeConfig::new(
//!     "postgresql://localhost/tasker_development",
//! ))?;
//!
//! let aggregator = HealthAggregator::builder()
//!     .job_executor(executor)
//!     .datastore(Arc::new(datastore))
//!     .version(tasker_health::constants::CRATE_VERSION)
//!     .build();
//!
//! let report = HealthReport::from_result(&aggregator.check().await);
//! println!("{} {}", report.http_status_code(), report.to_json());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod health;
pub mod logging;
pub mod report;

pub use config::{DatabaseProbeConfig, HealthServiceConfig};
pub use error::{DatastoreError, Result, TaskerHealthError};
pub use health::{
    HealthAggregator, HealthDetails, HealthResult, HealthStatus, JobExecutorProbe,
    JobExecutorState,
};
pub use report::HealthReport;

/// Dependencies reached by exported macros.
#[doc(hidden)]
pub mod __private {
    pub use chrono;
    pub use tracing;
}
