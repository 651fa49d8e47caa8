use std::net::SocketAddr;

use anyhow::{Result, anyhow};
use clap::Parser;
use url::Url;

/// CLI / env configuration parsed at process startup.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "album-service",
    about = "Album photo aggregation API backed by an upstream photo catalog",
    version,
    disable_help_subcommand = true
)]
struct CliConfig {
    /// Address to bind the HTTP server to (e.g., 0.0.0.0:8080)
    #[arg(long, env = "ALBUM_BIND_ADDR", default_value = "0.0.0.0:8080")]
    listen_addr: SocketAddr,

    /// Base URL of the upstream photo catalog API
    #[arg(
        long,
        env = "ALBUM_UPSTREAM_BASE_URL",
        default_value = "https://jsonplaceholder.typicode.com"
    )]
    upstream_base_url: Url,

    /// Optional OTLP (grpc) endpoint for OpenTelemetry trace export
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    otel_endpoint: Option<String>,

    /// Logical service name for telemetry (resource attribute)
    #[arg(long, env = "OTEL_SERVICE_NAME", default_value = "album-service")]
    otel_service_name: String,

    /// Disable OTLP trace export even if an endpoint is set
    #[arg(long, env = "ALBUM_OTEL_DISABLE_TRACES", default_value_t = false)]
    otel_disable_traces: bool,

    /// Deployment environment tag for telemetry (e.g., development, staging, prod)
    #[arg(long, env = "ALBUM_ENV", default_value = "development")]
    environment: String,

    /// Default log filter when RUST_LOG is not provided
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

/// Fully validated configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub upstream: UpstreamConfig,
    pub otel: OtelConfig,
    pub log: LogConfig,
    pub environment: String,
}

/// Upstream photo catalog configuration.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: Url,
}

/// OpenTelemetry exporter configuration.
#[derive(Debug, Clone)]
pub struct OtelConfig {
    pub endpoint: Option<String>,
    pub service_name: String,
    pub disable_traces: bool,
}

/// Structured logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
}

impl AppConfig {
    /// Parse CLI/env arguments and return a validated configuration.
    pub fn load() -> Result<Self> {
        let cli = CliConfig::parse();
        Self::try_from(cli)
    }
}

impl TryFrom<CliConfig> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(value: CliConfig) -> Result<Self> {
        ensure_http_url(&value.upstream_base_url)?;

        Ok(Self {
            listen_addr: value.listen_addr,
            upstream: UpstreamConfig {
                base_url: value.upstream_base_url,
            },
            environment: value.environment,
            otel: OtelConfig {
                endpoint: value.otel_endpoint,
                service_name: value.otel_service_name,
                disable_traces: value.otel_disable_traces,
            },
            log: LogConfig {
                level: value.log_level,
            },
        })
    }
}

fn ensure_http_url(url: &Url) -> Result<()> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!(
            "upstream base URL '{url}' must use the http or https scheme"
        ));
    }
    if url.host_str().is_none() {
        return Err(anyhow!("upstream base URL '{url}' is missing a host"));
    }
    Ok(())
}
