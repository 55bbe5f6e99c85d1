//! Shared test doubles for the health integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tasker_health::health::{
    Datastore, DatastoreConnection, DatastoreProbeSettings, FrontendHealthContributor,
    HealthContributor, JobExecutorProbe,
};
use tasker_health::DatastoreError;

/// Job executor with fixed signals
#[derive(Debug, Clone, Copy)]
pub struct FakeExecutor {
    pub active: bool,
    pub registered: bool,
}

impl FakeExecutor {
    pub fn healthy() -> Self {
        Self {
            active: true,
            registered: true,
        }
    }

    pub fn stopped() -> Self {
        Self {
            active: false,
            registered: false,
        }
    }
}

impl JobExecutorProbe for FakeExecutor {
    fn is_active(&self) -> bool {
        self.active
    }

    fn has_registered_engine(&self) -> bool {
        self.registered
    }
}

/// How a [`FakeDatastore`] behaves when probed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatastoreBehavior {
    Healthy,
    Refused,
    Invalid,
    Hang,
    HangOnAcquire,
}

/// Datastore double that counts acquisitions and releases
#[derive(Debug)]
pub struct FakeDatastore {
    behavior: DatastoreBehavior,
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl FakeDatastore {
    pub fn new(behavior: DatastoreBehavior) -> Self {
        Self {
            behavior,
            acquired: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn acquisitions(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Datastore for FakeDatastore {
    async fn acquire_connection(&self) -> Result<Box<dyn DatastoreConnection>, DatastoreError> {
        match self.behavior {
            DatastoreBehavior::Refused => {
                return Err(DatastoreError::Acquire(
                    "Connection refused (os error 111)".to_string(),
                ));
            }
            DatastoreBehavior::HangOnAcquire => {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            _ => {}
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeConnection {
            behavior: self.behavior,
            released: self.released.clone(),
            open: true,
        }))
    }
}

struct FakeConnection {
    behavior: DatastoreBehavior,
    released: Arc<AtomicUsize>,
    open: bool,
}

#[async_trait]
impl DatastoreConnection for FakeConnection {
    async fn is_valid(&mut self, _timeout: Duration) -> Result<bool, DatastoreError> {
        match self.behavior {
            DatastoreBehavior::Healthy => Ok(true),
            DatastoreBehavior::Invalid => Ok(false),
            DatastoreBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(true)
            }
            DatastoreBehavior::Refused | DatastoreBehavior::HangOnAcquire => Err(DatastoreError::Unexpected(
                "refused datastore handed out a connection".to_string(),
            )),
        }
    }

    fn release(&mut self) {
        if self.open {
            self.open = false;
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Frontend whose details can be changed after a check ran
#[derive(Debug, Default)]
pub struct MutableFrontend {
    details: Mutex<Map<String, Value>>,
}

impl MutableFrontend {
    pub fn set(&self, key: &str, value: Value) {
        self.details.lock().insert(key.to_string(), value);
    }
}

impl FrontendHealthContributor for MutableFrontend {
    fn frontend_details(&self) -> Map<String, Value> {
        self.details.lock().clone()
    }
}

/// Named extra contributor with fixed details
pub struct NamedContributor {
    pub name: String,
    pub details: Map<String, Value>,
}

impl HealthContributor for NamedContributor {
    fn name(&self) -> &str {
        &self.name
    }

    fn details(&self) -> Map<String, Value> {
        self.details.clone()
    }
}

/// Frontend that panics whenever it is asked for details
pub struct PanickingFrontend;

impl FrontendHealthContributor for PanickingFrontend {
    fn frontend_details(&self) -> Map<String, Value> {
        panic!("frontend bundle missing")
    }
}

/// Extra contributor that panics whenever it is asked for details
pub struct PanickingContributor {
    pub name: String,
}

impl HealthContributor for PanickingContributor {
    fn name(&self) -> &str {
        &self.name
    }

    fn details(&self) -> Map<String, Value> {
        panic!("replication lag unavailable")
    }
}

/// Short budgets so timeout paths finish quickly
pub fn fast_probe_settings() -> DatastoreProbeSettings {
    DatastoreProbeSettings {
        acquire_timeout: Duration::from_millis(100),
        validation_timeout: Duration::from_millis(100),
    }
}
