//! # Tracing Module
//!
//! Environment-aware console logging using the tracing ecosystem. Health checks
//! run inside containers and sidecars, so output goes to stdout only.
//!
//! - Environment detection from `TASKER_ENV` / `APP_ENV`
//! - Log level derived from the environment, overridable with `RUST_LOG`
//! - JSON output when `TASKER_LOG_FORMAT=json`
//! - TTY-aware ANSI colors
//! - `log_health!` for structured health-check events

use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console logging once per process.
///
/// Safe to call repeatedly and safe to call when a host application already
/// installed a global subscriber; in that case the existing one is kept.
pub fn init_tracing() {
    TRACING_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = build_filter(&environment);
        let use_ansi = IsTerminal::is_terminal(&std::io::stdout());
        let json = use_json_format();

        let console_layer = if json {
            fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(use_ansi)
                .with_filter(filter)
                .boxed()
        };

        if tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .is_err()
        {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        } else {
            tracing::info!(
                environment = %environment,
                ansi_colors = use_ansi,
                json_format = json,
                "Console logging initialized"
            );
        }
    });
}

fn build_filter(environment: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(get_log_level(environment)))
}

/// Current deployment environment.
pub fn get_environment() -> String {
    std::env::var("TASKER_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

fn use_json_format() -> bool {
    std::env::var("TASKER_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Structured logging for health-check events.
///
/// ```rust
/// # use tasker_health::log_health;
/// log_health!(debug, "check_started");
/// log_health!(warn, "datastore_probe_failed", error: "AcquireError: refused");
/// ```
#[macro_export]
macro_rules! log_health {
    ($level:ident, $operation:expr $(,)?) => {
        $crate::__private::tracing::$level!(
            operation = %$operation,
            timestamp = %$crate::__private::chrono::Utc::now().to_rfc3339(),
            "HEALTH_{}", $operation
        );
    };
    ($level:ident, $operation:expr, $($key:ident: $value:expr),+ $(,)?) => {
        $crate::__private::tracing::$level!(
            operation = %$operation,
            $($key = ?$value,)*
            timestamp = %$crate::__private::chrono::Utc::now().to_rfc3339(),
            "HEALTH_{}", $operation
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("test"), "debug");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("unknown"), "debug");
    }

    #[test]
    fn test_init_is_idempotent() {
        init_tracing();
        init_tracing();
        log_health!(debug, "logging_test", attempt: 2);
    }
}
