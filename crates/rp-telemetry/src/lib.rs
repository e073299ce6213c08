//! # RP Telemetry
//!
//! Observability for the rollup read path.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` with an `EnvFilter`, pretty or JSON output
//! - **Metrics**: Prometheus counters behind the resolver's `MetricsRecorder`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rp_telemetry::{init_telemetry, TelemetryConfig};
//! use std::sync::Arc;
//!
//! let (_guard, metrics) = init_telemetry(TelemetryConfig::from_env())?;
//! let service = StateResolverService::with_metrics(backends, config, metrics.clone())?;
//!
//! // Serve `metrics.gather()?` from the scrape endpoint.
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RP_SERVICE_NAME` | `rollup-read-path` | Service name in startup logs |
//! | `RP_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `RP_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `RP_JSON_LOGS` | `true` in containers | JSON log format |

mod config;
mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::PrometheusMetrics;
pub use tracing_setup::{init_tracing, TracingGuard};

use std::sync::Arc;
use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracerInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Initialize logging and build a metrics recorder.
///
/// The returned guard must be held for the lifetime of the application.
pub fn init_telemetry(
    config: TelemetryConfig,
) -> Result<(TracingGuard, Arc<PrometheusMetrics>), TelemetryError> {
    // Metrics first; they do not touch global state.
    let metrics = Arc::new(PrometheusMetrics::new()?);
    let guard = init_tracing(&config)?;
    Ok((guard, metrics))
}
