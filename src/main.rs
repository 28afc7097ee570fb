//! selfheal-api
//!
//! An instrumented service whose health can be degraded on demand, paired with
//! a remediation trigger, for testing an orchestrator's self-healing loop.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌───────────────────────────────────────────────────────┐
//!                   │                     SELFHEAL-API                       │
//!   Request         │  ┌────────────┐   ┌──────────────┐                     │
//!   ────────────────┼─▶│ request id │──▶│   latency    │──┐                  │
//!                   │  │  + trace   │   │  middleware  │  │                  │
//!                   │  └────────────┘   └──────┬───────┘  │                  │
//!                   │                          │ record   ▼                  │
//!                   │                          ▼      ┌────────────────────┐ │
//!                   │                   ┌───────────┐ │ /healthz /readyz   │ │
//!                   │                   │  metrics  │ │ /toggle-ready      │ │
//!                   │                   │ registry  │ │ /work /leak        │ │
//!                   │                   └─────▲─────┘ │ /metrics /restart  │ │
//!                   │      process collector ─┘       └─────────┬──────────┘ │
//!                   │                                           │ /restart   │
//!                   └───────────────────────────────────────────┼────────────┘
//!                                                               ▼
//!                                                  kubectl delete pod -l ...
//! ```

use std::path::PathBuf;

use clap::Parser;

use selfheal_api::config::{resolve_config, RuntimeFlavor};
use selfheal_api::lifecycle::startup;
use selfheal_api::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "selfheal-api")]
#[command(about = "Instrumented service for self-healing experiments", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "SELFHEAL_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(args.config.as_deref())?;

    init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address(),
        flavor = ?config.runtime.flavor,
        max_work_ms = config.load.max_work_ms,
        max_leak_mb = config.load.max_leak_mb,
        namespace = %config.remediation.namespace,
        selector = %config.remediation.selector,
        "Configuration loaded"
    );

    let runtime = match config.runtime.flavor {
        RuntimeFlavor::CurrentThread => tokio::runtime::Builder::new_current_thread(),
        RuntimeFlavor::MultiThread => tokio::runtime::Builder::new_multi_thread(),
    }
    .enable_all()
    .build()?;

    runtime.block_on(startup::serve(config))?;

    tracing::info!("Shutdown complete");
    Ok(())
}
