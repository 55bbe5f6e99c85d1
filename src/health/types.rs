//! # Health Result Types
//!
//! Values produced by [`super::HealthAggregator::check`]. A [`HealthResult`]
//! is built once per check and never mutated afterwards; every accessor hands
//! out shared references or owned copies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Ordered detail mapping: subsystem name to nested value.
pub type HealthDetails = Map<String, Value>;

/// Overall verdict of a health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Up => "UP",
            HealthStatus::Down => "DOWN",
        }
    }

    /// Case-insensitive comparison against the literal `"UP"`.
    pub fn is_up(&self) -> bool {
        self.as_str().eq_ignore_ascii_case("UP")
    }

    pub fn from_healthy(healthy: bool) -> Self {
        if healthy {
            HealthStatus::Up
        } else {
            HealthStatus::Down
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HealthStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("UP") {
            Ok(HealthStatus::Up)
        } else if s.eq_ignore_ascii_case("DOWN") {
            Ok(HealthStatus::Down)
        } else {
            Err(format!("Unknown health status: {s}"))
        }
    }
}

/// Snapshot of system health at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResult {
    status: HealthStatus,
    timestamp: DateTime<Utc>,
    version: Option<String>,
    details: HealthDetails,
}

impl HealthResult {
    pub fn new(
        status: HealthStatus,
        timestamp: DateTime<Utc>,
        version: Option<String>,
        details: HealthDetails,
    ) -> Self {
        Self {
            status,
            timestamp,
            version,
            details,
        }
    }

    pub fn status(&self) -> HealthStatus {
        self.status
    }

    pub fn is_up(&self) -> bool {
        self.status.is_up()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn details(&self) -> &HealthDetails {
        &self.details
    }

    /// Detail entry for one subsystem.
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }

    /// Nested detail field, e.g. `detail_field("database", "connected")`.
    pub fn detail_field(&self, key: &str, field: &str) -> Option<&Value> {
        self.details.get(key).and_then(|value| value.get(field))
    }

    pub fn into_details(self) -> HealthDetails {
        self.details
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(serde_json::to_value(HealthStatus::Up).unwrap(), json!("UP"));
        assert_eq!(
            serde_json::to_value(HealthStatus::Down).unwrap(),
            json!("DOWN")
        );
        assert_eq!(HealthStatus::Down.to_string(), "DOWN");
    }

    #[test]
    fn test_status_parses_any_case() {
        assert_eq!("up".parse::<HealthStatus>().unwrap(), HealthStatus::Up);
        assert_eq!("Down".parse::<HealthStatus>().unwrap(), HealthStatus::Down);
        assert!("degraded".parse::<HealthStatus>().is_err());
        assert!(HealthStatus::Up.is_up());
        assert!(!HealthStatus::Down.is_up());
    }

    #[test]
    fn test_detail_field_lookup() {
        let mut details = HealthDetails::new();
        details.insert("database".to_string(), json!({"connected": true}));
        let result = HealthResult::new(HealthStatus::Up, Utc::now(), None, details);

        assert_eq!(
            result.detail_field("database", "connected"),
            Some(&json!(true))
        );
        assert!(result.detail_field("database", "error").is_none());
        assert!(result.detail("queue").is_none());
        assert!(result.version().is_none());
    }
}
