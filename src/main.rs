//! HIVE-OS - Beehive Operational Intelligence
//!
//! Telemetry aggregation and advisory pipeline for IoT beehive monitors.
//!
//! # Usage
//!
//! ```bash
//! # One-shot run against recorded telemetry
//! hive-os --movements data/movements.json --environment data/environment.json
//!
//! # One-shot run against the live telemetry endpoint
//! hive-os --endpoint https://telemetry.example.com/hive
//!
//! # Serve the snapshot API for a dashboard
//! hive-os --endpoint https://telemetry.example.com/hive --serve
//! ```
//!
//! # Environment Variables
//!
//! - `HIVE_CONFIG`: Path to a TOML config file (default: ./hive_config.toml)
//! - `HIVE_ADVISORY_API_KEY`: Advisory backend API key (name configurable)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use hive_os::api::{self, ApiContext};
use hive_os::config::HiveConfig;
use hive_os::ingest::{EnvironmentSource, HttpTelemetrySource, MovementSource, ReplaySource};
use hive_os::llm::{DisabledBackend, LlmBackend, OpenAiCompatBackend};
use hive_os::pipeline::PipelineCoordinator;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "hive-os")]
#[command(about = "HIVE-OS Beehive Operational Intelligence")]
#[command(version)]
struct CliArgs {
    /// Replay movement records from a JSON file instead of the live endpoint
    #[arg(long, value_name = "FILE")]
    movements: Option<PathBuf>,

    /// Replay environment records from a JSON file instead of the live endpoint
    #[arg(long, value_name = "FILE")]
    environment: Option<PathBuf>,

    /// Telemetry HTTP endpoint (overrides the config file)
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// IANA time zone for date grouping (overrides the config file)
    #[arg(long, value_name = "ZONE")]
    timezone: Option<String>,

    /// Serve the snapshot API instead of printing a one-shot snapshot
    #[arg(long)]
    serve: bool,

    /// Override the server bind address (default: "0.0.0.0:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// Pretty-print the snapshot JSON in one-shot mode
    #[arg(long)]
    pretty: bool,
}

fn build_sources(
    args: &CliArgs,
    config: &HiveConfig,
) -> Result<(Arc<dyn MovementSource>, Arc<dyn EnvironmentSource>)> {
    match (&args.movements, &args.environment) {
        (Some(movements), Some(environment)) => {
            info!(
                movements = %movements.display(),
                environment = %environment.display(),
                "Using file replay sources"
            );
            Ok((
                Arc::new(ReplaySource::new(movements.clone())),
                Arc::new(ReplaySource::new(environment.clone())),
            ))
        }
        (None, None) => {
            let Some(endpoint) = args
                .endpoint
                .clone()
                .or_else(|| config.telemetry.endpoint.clone())
            else {
                bail!(
                    "no telemetry source configured: pass --movements/--environment \
                     files or an --endpoint URL (or set telemetry.endpoint in the config)"
                );
            };
            info!(endpoint = %endpoint, "Using HTTP telemetry source");
            let source = Arc::new(
                HttpTelemetrySource::new(
                    endpoint,
                    config.telemetry.movement_key.clone(),
                    config.telemetry.environment_key.clone(),
                    config.telemetry.environment_limit,
                )
                .context("failed to build HTTP telemetry source")?,
            );
            Ok((source.clone(), source))
        }
        _ => bail!("replay mode needs both --movements and --environment files"),
    }
}

fn build_backend(config: &HiveConfig) -> Result<Arc<dyn LlmBackend>> {
    match config.advisory_api_key() {
        Some(api_key) => {
            info!(
                model = %config.advisory.model,
                base_url = %config.advisory.base_url,
                "Advisory backend configured"
            );
            Ok(Arc::new(OpenAiCompatBackend::new(
                config.advisory.base_url.clone(),
                api_key,
                config.advisory.model.clone(),
                config.advisory.max_tokens,
                config.advisory.temperature,
            )?))
        }
        None => {
            warn!(
                key_env = %config.advisory.api_key_env,
                "No advisory API key in environment — advisories will be unavailable"
            );
            Ok(Arc::new(DisabledBackend))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    dotenvy::dotenv().ok();
    let args = CliArgs::parse();

    let mut config = HiveConfig::load();
    if let Some(zone) = &args.timezone {
        config.telemetry.timezone = zone.clone();
    }
    let tz = config.timezone()?;

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  HIVE-OS - Beehive Operational Intelligence");
    info!("  Zone: {} | Advisory model: {}", tz, config.advisory.model);
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let (movements, environment) = build_sources(&args, &config)?;
    let backend = build_backend(&config)?;
    let coordinator = PipelineCoordinator::new(tz);

    if args.serve {
        let addr = args.addr.unwrap_or_else(|| config.server.addr.clone());
        let context = Arc::new(ApiContext {
            coordinator,
            movements,
            environment,
            backend,
        });
        let app = api::router(context);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!(addr = %addr, "Snapshot API listening");
        axum::serve(listener, app)
            .await
            .context("snapshot API server failed")?;
        return Ok(());
    }

    let snapshot = coordinator
        .run(movements.as_ref(), environment.as_ref(), backend.as_ref())
        .await
        .context("pipeline run failed")?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };
    println!("{rendered}");

    Ok(())
}
