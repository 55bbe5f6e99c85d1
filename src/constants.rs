//! # Health Detail Constants
//!
//! Detail keys and defaults shared by the aggregator, the report adapter and
//! the binary. Key spelling is part of the wire contract consumed by external
//! health endpoints, so it stays camelCase.

use std::time::Duration;

/// Top-level detail keys, in the order they appear in every result.
pub mod details {
    pub const JOB_EXECUTOR: &str = "jobExecutor";
    pub const DATABASE: &str = "database";
    pub const QUEUE: &str = "queue";
    pub const FRONTEND: &str = "frontend";

    /// Keys that extra contributors may not claim.
    pub const CORE_KEYS: [&str; 4] = [JOB_EXECUTOR, DATABASE, QUEUE, FRONTEND];
}

/// Nested detail field names.
pub mod fields {
    pub const ACTIVE: &str = "active";
    pub const ENGINE_REGISTERED: &str = "engineRegistered";
    pub const CONNECTED: &str = "connected";
    pub const ERROR: &str = "error";
    pub const AVAILABLE: &str = "available";
    pub const OPERATIONAL: &str = "operational";
    pub const UNKNOWN: &str = "unknown";
}

/// Report payload keys added by the report adapter.
pub mod report {
    pub const NAME: &str = "name";
    pub const TIMESTAMP: &str = "timestamp";
    pub const VERSION: &str = "version";

    /// Keys the report adapter writes around the result details.
    pub const RESERVED_KEYS: [&str; 3] = [NAME, TIMESTAMP, VERSION];
}

pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_VALIDATION_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_CONNECTIONS: u32 = 2;

/// Crate version baked in at build time.
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");
