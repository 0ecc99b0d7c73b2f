//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Used when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVES: &str =
    "info,api_server=debug,pressroom_core=debug,pressroom_infra=debug,sea_orm=warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// `LOG_FORMAT` wins when set; otherwise production logs JSON.
    fn resolve(log_format: Option<&str>, rust_env: Option<&str>) -> Self {
        match log_format.map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(f) if !f.is_empty() => LogFormat::Pretty,
            _ => match rust_env {
                Some(env) if env.eq_ignore_ascii_case("production") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub format: LogFormat,
    pub service_name: String,
}

impl TelemetryConfig {
    /// Read `LOG_FORMAT`, `RUST_ENV` and `SERVICE_NAME`.
    pub fn from_env() -> Self {
        let log_format = std::env::var("LOG_FORMAT").ok();
        let rust_env = std::env::var("RUST_ENV").ok();

        Self {
            format: LogFormat::resolve(log_format.as_deref(), rust_env.as_deref()),
            service_name: std::env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "pressroom-api".to_string()),
        }
    }
}

pub fn init_telemetry(config: &TelemetryConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
    }

    tracing::info!(
        service = %config.service_name,
        format = ?config.format,
        "Telemetry initialized"
    );
}
