//! Tracing subscriber and OpenTelemetry export.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::{Config, Tracer, TracerProvider};
use opentelemetry_sdk::{runtime, Resource};
use thiserror::Error;
use tracing::{warn, Subscriber};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogConfig, TelemetryConfig};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to build OTLP exporter: {0}")]
    Exporter(String),

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

/// Keeps the tracer provider alive; call [`TelemetryGuard::shutdown`] to flush.
pub struct TelemetryGuard {
    provider: Option<TracerProvider>,
}

impl TelemetryGuard {
    pub fn shutdown(self) {
        if let Some(provider) = self.provider {
            if let Err(err) = provider.shutdown() {
                warn!(error = %err, "failed to flush spans");
            }
        }
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `log.level`. Spans are exported over OTLP/gRPC when
/// `telemetry.otlp_endpoint` is set.
pub fn init_tracing(
    log: &LogConfig,
    telemetry: &TelemetryConfig,
) -> Result<TelemetryGuard, TelemetryError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let provider = match &telemetry.otlp_endpoint {
        Some(endpoint) => Some(init_provider(telemetry, endpoint)?),
        None => None,
    };

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(otel_layer(provider.as_ref(), &telemetry.service_name));

    let installed = if log.json {
        registry
            .with(fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    installed.map_err(|err| TelemetryError::Subscriber(err.to_string()))?;

    Ok(TelemetryGuard { provider })
}

fn init_provider(
    telemetry: &TelemetryConfig,
    endpoint: &str,
) -> Result<TracerProvider, TelemetryError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|err| TelemetryError::Exporter(err.to_string()))?;

    let resource = Resource::new(vec![KeyValue::new(
        "service.name",
        telemetry.service_name.clone(),
    )]);

    Ok(TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_config(Config::default().with_resource(resource))
        .build())
}

fn otel_layer<S>(
    provider: Option<&TracerProvider>,
    service_name: &str,
) -> Option<OpenTelemetryLayer<S, Tracer>>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    provider.map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(service_name.to_string()))
    })
}
