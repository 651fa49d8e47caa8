use anyhow::Result;
use opentelemetry::{KeyValue, global, trace::TracerProvider as _};
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::{self as sdk, resource::Resource};
use tracing::{info, warn};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

/// Installs the tracing subscriber and keeps the OTLP exporter alive until drop.
pub struct TelemetryGuard {
    tracer_provider: Option<sdk::trace::SdkTracerProvider>,
}

impl TelemetryGuard {
    pub fn init(config: &AppConfig) -> Result<Self> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.log.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        match build_trace_pipeline(config)? {
            Some(pipeline) => {
                tracing_subscriber::registry()
                    .with(pipeline.trace_layer)
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_target(false)
                            .with_file(false)
                            .with_line_number(false)
                            .json(),
                    )
                    .try_init()?;
                info!("OpenTelemetry trace export enabled (json stdout retained)");
                Ok(Self {
                    tracer_provider: Some(pipeline.tracer_provider),
                })
            }
            None => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_target(false)
                            .with_file(false)
                            .with_line_number(false)
                            .json(),
                    )
                    .try_init()?;
                Ok(Self {
                    tracer_provider: None,
                })
            }
        }
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            if let Err(err) = provider.shutdown() {
                warn!(error = ?err, "failed to shutdown tracer provider cleanly");
            }
        }
    }
}

struct TracePipeline {
    trace_layer: OpenTelemetryLayer<Registry, sdk::trace::Tracer>,
    tracer_provider: sdk::trace::SdkTracerProvider,
}

fn build_trace_pipeline(config: &AppConfig) -> Result<Option<TracePipeline>> {
    if config.otel.disable_traces {
        return Ok(None);
    }
    let endpoint = match &config.otel.endpoint {
        Some(endpoint) if !endpoint.trim().is_empty() => endpoint.clone(),
        _ => return Ok(None),
    };

    let resource = Resource::builder()
        .with_service_name(config.otel.service_name.clone())
        .with_attribute(KeyValue::new(
            "deployment.environment.name",
            config.environment.clone(),
        ))
        .build();

    let span_exporter = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = sdk::trace::SdkTracerProvider::builder()
        .with_resource(resource)
        .with_batch_exporter(span_exporter)
        .build();

    let tracer = provider.tracer(config.otel.service_name.clone());
    global::set_tracer_provider(provider.clone());

    Ok(Some(TracePipeline {
        trace_layer: tracing_opentelemetry::layer().with_tracer(tracer),
        tracer_provider: provider,
    }))
}
