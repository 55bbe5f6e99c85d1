//! # Job Executor Probe
//!
//! Read-only view of the background job executor: is it running, and is at
//! least one engine bound to it. [`JobExecutorState`] is the handle an executor
//! updates as it starts, stops and registers engines.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Signals the aggregator reads from the job executor. Both calls must be
/// non-blocking and free of side effects.
pub trait JobExecutorProbe: Send + Sync {
    /// Whether the executor is currently acquiring and running jobs.
    fn is_active(&self) -> bool;

    /// Whether at least one engine is registered with the executor.
    fn has_registered_engine(&self) -> bool;
}

/// Shared executor state
#[derive(Debug, Default)]
pub struct JobExecutorState {
    active: AtomicBool,
    engines: RwLock<Vec<String>>,
}

impl JobExecutorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) {
        if !self.active.swap(true, Ordering::AcqRel) {
            debug!("Job executor marked active");
        }
    }

    pub fn shutdown(&self) {
        if self.active.swap(false, Ordering::AcqRel) {
            debug!("Job executor marked inactive");
        }
    }

    /// Register an engine; registering the same name twice is a no-op.
    pub fn register_engine(&self, name: impl Into<String>) {
        let name = name.into();
        let mut engines = self.engines.write();
        if !engines.contains(&name) {
            debug!(engine = %name, "Engine registered with job executor");
            engines.push(name);
        }
    }

    /// Returns `true` when the engine was registered.
    pub fn unregister_engine(&self, name: &str) -> bool {
        let mut engines = self.engines.write();
        let before = engines.len();
        engines.retain(|engine| engine != name);
        let removed = engines.len() != before;
        if removed {
            debug!(engine = %name, "Engine unregistered from job executor");
        }
        removed
    }

    pub fn registered_engines(&self) -> Vec<String> {
        self.engines.read().clone()
    }
}

impl JobExecutorProbe for JobExecutorState {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn has_registered_engine(&self) -> bool {
        !self.engines.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = JobExecutorState::new();
        assert!(!state.is_active());
        assert!(!state.has_registered_engine());
    }

    #[test]
    fn test_start_and_shutdown() {
        let state = JobExecutorState::new();
        state.start();
        assert!(state.is_active());
        state.start();
        assert!(state.is_active());
        state.shutdown();
        assert!(!state.is_active());
    }

    #[test]
    fn test_engine_registration_is_idempotent() {
        let state = JobExecutorState::new();
        state.register_engine("default");
        state.register_engine("default");
        assert_eq!(state.registered_engines(), vec!["default".to_string()]);
        assert!(state.has_registered_engine());

        assert!(state.unregister_engine("default"));
        assert!(!state.unregister_engine("default"));
        assert!(!state.has_registered_engine());
    }
}
