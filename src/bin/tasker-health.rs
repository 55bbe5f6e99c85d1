//! # Tasker Health Probe
//!
//! Runs one health check against the configured subsystems and prints the
//! rendered report as JSON. Exit code 0 means UP, 1 means DOWN and 2 means
//! the configuration could not be loaded.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{error, info};

use tasker_health::config::HealthServiceConfig;
use tasker_health::constants::CRATE_VERSION;
use tasker_health::health::{HealthAggregator, PgDatastore, StaticFrontend};
use tasker_health::logging;
use tasker_health::report::HealthReport;

#[derive(Parser)]
#[command(name = "tasker-health")]
#[command(about = "Check Tasker subsystem health")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file (YAML, TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_tracing();

    let config = match HealthServiceConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load health configuration");
            process::exit(2);
        }
    };

    match run(&config, cli.pretty).await {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(e) => {
            error!(error = %e, "Health check could not be set up");
            process::exit(2);
        }
    }
}

async fn run(config: &HealthServiceConfig, pretty: bool) -> Result<bool> {
    let aggregator = build_aggregator(config)?;
    let result = aggregator.check().await;

    let mut report = HealthReport::from_result(&result);
    if let Some(name) = &config.engine_name {
        report = report.with_engine_name(name);
    }

    info!(
        status = %report.status(),
        http_status = report.http_status_code(),
        "Health check complete"
    );

    let body = report.to_json();
    let rendered = if pretty {
        serde_json::to_string_pretty(&body)
    } else {
        serde_json::to_string(&body)
    }
    .context("Failed to serialize health report")?;
    println!("{rendered}");

    Ok(report.is_up())
}

fn build_aggregator(config: &HealthServiceConfig) -> Result<HealthAggregator> {
    let mut builder = HealthAggregator::builder().version(CRATE_VERSION);

    if let Some(database) = &config.database {
        let datastore =
            PgDatastore::from_config(database).context("Failed to configure PostgreSQL datastore")?;
        builder = builder
            .datastore(Arc::new(datastore))
            .probe_settings(database.probe_settings());
    }

    if let Some(frontend) = &config.frontend {
        builder = builder.frontend(Arc::new(StaticFrontend::new(frontend.clone())));
    }

    Ok(builder.build())
}
