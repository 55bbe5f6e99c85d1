//! # Health Report Rendering
//!
//! Translates a [`HealthResult`] into the shape health endpoints expose: an
//! up/down flag, an HTTP-style status code and a flat payload. No web
//! framework is involved; callers hand the rendered report to whatever
//! transport they serve.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::constants::report;
use crate::health::{HealthResult, HealthStatus};

pub const HTTP_OK: u16 = 200;
pub const HTTP_SERVICE_UNAVAILABLE: u16 = 503;

/// Rendered health report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    status: HealthStatus,
    details: Map<String, Value>,
}

impl HealthReport {
    /// Render a check result: `timestamp`, `version` when known, then every
    /// detail entry in result order.
    pub fn from_result(result: &HealthResult) -> Self {
        let status = HealthStatus::from_healthy(result.status().as_str().eq_ignore_ascii_case("UP"));

        let mut details = Map::new();
        details.insert(
            report::TIMESTAMP.to_string(),
            Value::String(result.timestamp().to_rfc3339()),
        );
        if let Some(version) = result.version() {
            details.insert(report::VERSION.to_string(), Value::String(version.to_string()));
        }
        for (key, value) in result.details() {
            details.insert(key.clone(), value.clone());
        }

        Self { status, details }
    }

    /// Report for a deployment with no aggregator wired in: always UP.
    pub fn unmonitored(engine_name: Option<&str>) -> Self {
        let report = Self {
            status: HealthStatus::Up,
            details: Map::new(),
        };
        match engine_name {
            Some(name) => report.with_engine_name(name),
            None => report,
        }
    }

    /// Put the engine name first in the payload.
    pub fn with_engine_name(mut self, name: &str) -> Self {
        let mut details = Map::with_capacity(self.details.len() + 1);
        details.insert(report::NAME.to_string(), Value::String(name.to_string()));
        for (key, value) in std::mem::take(&mut self.details) {
            if key != report::NAME {
                details.insert(key, value);
            }
        }
        self.details = details;
        self
    }

    pub fn status(&self) -> HealthStatus {
        self.status
    }

    pub fn is_up(&self) -> bool {
        self.status.is_up()
    }

    pub fn details(&self) -> &Map<String, Value> {
        &self.details
    }

    pub fn http_status_code(&self) -> u16 {
        if self.is_up() {
            HTTP_OK
        } else {
            HTTP_SERVICE_UNAVAILABLE
        }
    }

    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("status".to_string(), Value::String(self.status.to_string()));
        body.insert("details".to_string(), Value::Object(self.details.clone()));
        Value::Object(body)
    }
}
