//! # Health Aggregator
//!
//! Runs the job-executor, datastore and frontend probes in a fixed order and
//! reduces them to one [`HealthResult`].
//!
//! ## Verdict
//!
//! Only the required subsystems decide the status:
//!
//! - `db_ok  = datastore absent  || connected`
//! - `job_ok = executor absent   || active`
//! - `UP` iff `db_ok && job_ok`
//!
//! An absent collaborator counts as satisfied so the aggregator stays usable in
//! deployments where that subsystem was never wired in. Note this also makes a
//! missing wiring look the same as a healthy subsystem.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tasker_health::health::{HealthAggregator, JobExecutorState};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let executor = Arc::new(JobExecutorState::new());
//! executor.start();
//! executor.register_engine("default");
//!
//! let aggregator = HealthAggregator::builder()
//!     .job_executor(executor)
//!     .version("0.1.0")
//!     .build();
//!
//! let result = aggregator.check().await;
//! assert!(result.is_up());
//! # }
//! ```

use chrono::Utc;
use serde_json::{Map, Value};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{error, warn};

use super::datastore::{probe_datastore, DatabaseProbe, Datastore, DatastoreProbeSettings};
use super::frontend::{FrontendHealthContributor, HealthContributor, UnknownFrontend};
use super::job_executor::JobExecutorProbe;
use super::panic_message;
use super::types::{HealthDetails, HealthResult, HealthStatus};
use crate::constants::{details, fields, report};
use crate::log_health;

/// Signals read from the job executor
#[derive(Debug, Clone, PartialEq, Eq)]
struct JobExecutorSignals {
    active: bool,
    engine_registered: bool,
    error: Option<String>,
}

/// Aggregates subsystem probes into one health verdict.
///
/// Holds only shared, read-only references to its collaborators; concurrent
/// `check()` calls share no mutable state.
pub struct HealthAggregator {
    job_executor: Option<Arc<dyn JobExecutorProbe>>,
    datastore: Option<Arc<dyn Datastore>>,
    frontend: Arc<dyn FrontendHealthContributor>,
    contributors: Vec<Arc<dyn HealthContributor>>,
    version: Option<String>,
    probe_settings: DatastoreProbeSettings,
}

impl std::fmt::Debug for HealthAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthAggregator")
            .field("job_executor", &self.job_executor.is_some())
            .field("datastore", &self.datastore.is_some())
            .field("contributors", &self.contributors.len())
            .field("version", &self.version)
            .field("probe_settings", &self.probe_settings)
            .finish()
    }
}

impl Default for HealthAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthAggregator {
    /// Aggregator with no collaborators wired in.
    pub fn new() -> Self {
        HealthAggregatorBuilder::default().build()
    }

    pub fn builder() -> HealthAggregatorBuilder {
        HealthAggregatorBuilder::default()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Take one health snapshot. Always returns a result; probe failures are
    /// reported as data, never as errors.
    pub async fn check(&self) -> HealthResult {
        let timestamp = Utc::now();
        log_health!(debug, "check_started");

        let mut result_details = HealthDetails::new();

        let job = self.probe_job_executor();
        let mut job_details = Map::new();
        job_details.insert(fields::ACTIVE.to_string(), Value::Bool(job.active));
        job_details.insert(
            fields::ENGINE_REGISTERED.to_string(),
            Value::Bool(job.engine_registered),
        );
        if let Some(error) = &job.error {
            job_details.insert(fields::ERROR.to_string(), Value::String(error.clone()));
        }
        result_details.insert(details::JOB_EXECUTOR.to_string(), Value::Object(job_details));

        let database = match &self.datastore {
            Some(datastore) => Some(probe_datastore(datastore.as_ref(), &self.probe_settings).await),
            None => None,
        };
        result_details.insert(details::DATABASE.to_string(), database_details(database.as_ref()));

        let mut queue = Map::new();
        queue.insert(
            fields::AVAILABLE.to_string(),
            Value::Bool(job.engine_registered),
        );
        result_details.insert(details::QUEUE.to_string(), Value::Object(queue));

        result_details.insert(
            details::FRONTEND.to_string(),
            Value::Object(self.frontend_details()),
        );

        for contributor in &self.contributors {
            append_contributor(contributor.as_ref(), &mut result_details);
        }

        let db_ok = database.as_ref().map_or(true, |probe| probe.connected);
        let job_ok = self.job_executor.is_none() || job.active;
        let status = HealthStatus::from_healthy(db_ok && job_ok);

        if status.is_up() {
            log_health!(debug, "check_completed", status: status.as_str());
        } else {
            log_health!(
                warn,
                "check_completed",
                status: status.as_str(),
                database_ok: db_ok,
                job_executor_ok: job_ok
            );
        }

        HealthResult::new(status, timestamp, self.version.clone(), result_details)
    }

    fn probe_job_executor(&self) -> JobExecutorSignals {
        let Some(executor) = &self.job_executor else {
            return JobExecutorSignals {
                active: false,
                engine_registered: false,
                error: None,
            };
        };

        let probed = catch_unwind(AssertUnwindSafe(|| {
            (executor.is_active(), executor.has_registered_engine())
        }));

        match probed {
            Ok((active, engine_registered)) => JobExecutorSignals {
                active,
                engine_registered,
                error: None,
            },
            Err(panic) => {
                let message = panic_message(&*panic);
                error!(error = %message, "Job executor probe panicked");
                JobExecutorSignals {
                    active: false,
                    engine_registered: false,
                    error: Some(format!("UnexpectedError: {message}")),
                }
            }
        }
    }

    fn frontend_details(&self) -> Map<String, Value> {
        match catch_unwind(AssertUnwindSafe(|| self.frontend.frontend_details())) {
            Ok(details) => details,
            Err(panic) => {
                let message = panic_message(&*panic);
                error!(error = %message, "Frontend contributor panicked");
                let mut details = UnknownFrontend::details();
                details.insert(
                    fields::ERROR.to_string(),
                    Value::String(format!("UnexpectedError: {message}")),
                );
                details
            }
        }
    }
}

fn append_contributor(contributor: &dyn HealthContributor, target: &mut HealthDetails) {
    let name = contributor.name().to_string();
    let reserved = details::CORE_KEYS.contains(&name.as_str())
        || report::RESERVED_KEYS.contains(&name.as_str());
    if reserved || target.contains_key(&name) {
        warn!(contributor = %name, "Skipping health contributor with a reserved or duplicate name");
        return;
    }

    let entry = match catch_unwind(AssertUnwindSafe(|| contributor.details())) {
        Ok(entry) => entry,
        Err(panic) => {
            let message = panic_message(&*panic);
            error!(contributor = %name, error = %message, "Health contributor panicked");
            let mut entry = UnknownFrontend::details();
            entry.insert(
                fields::ERROR.to_string(),
                Value::String(format!("UnexpectedError: {message}")),
            );
            entry
        }
    };
    target.insert(name, Value::Object(entry));
}

fn database_details(probe: Option<&DatabaseProbe>) -> Value {
    let mut database = Map::new();
    match probe {
        None => {
            database.insert(fields::CONNECTED.to_string(), Value::Bool(true));
        }
        Some(probe) => {
            database.insert(fields::CONNECTED.to_string(), Value::Bool(probe.connected));
            if let Some(error) = &probe.error {
                database.insert(
                    fields::ERROR.to_string(),
                    Value::String(error.classification()),
                );
            }
        }
    }
    Value::Object(database)
}

/// Builder for [`HealthAggregator`]
#[derive(Default)]
pub struct HealthAggregatorBuilder {
    job_executor: Option<Arc<dyn JobExecutorProbe>>,
    datastore: Option<Arc<dyn Datastore>>,
    frontend: Option<Arc<dyn FrontendHealthContributor>>,
    contributors: Vec<Arc<dyn HealthContributor>>,
    version: Option<String>,
    probe_settings: DatastoreProbeSettings,
}

impl HealthAggregatorBuilder {
    pub fn job_executor(mut self, job_executor: Arc<dyn JobExecutorProbe>) -> Self {
        self.job_executor = Some(job_executor);
        self
    }

    pub fn datastore(mut self, datastore: Arc<dyn Datastore>) -> Self {
        self.datastore = Some(datastore);
        self
    }

    pub fn frontend(mut self, frontend: Arc<dyn FrontendHealthContributor>) -> Self {
        self.frontend = Some(frontend);
        self
    }

    pub fn contributor(mut self, contributor: Arc<dyn HealthContributor>) -> Self {
        self.contributors.push(contributor);
        self
    }

    /// Build/release identifier reported with every result.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn probe_settings(mut self, settings: DatastoreProbeSettings) -> Self {
        self.probe_settings = settings;
        self
    }

    pub fn build(self) -> HealthAggregator {
        HealthAggregator {
            job_executor: self.job_executor,
            datastore: self.datastore,
            frontend: self.frontend.unwrap_or_else(|| Arc::new(UnknownFrontend)),
            contributors: self.contributors,
            version: self.version,
            probe_settings: self.probe_settings,
        }
    }
}
