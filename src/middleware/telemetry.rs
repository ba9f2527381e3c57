use anyhow::Error;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{propagation::TraceContextPropagator, runtime, trace, Resource};
use std::str::FromStr;
use tonic::metadata::{MetadataKey, MetadataMap, MetadataValue};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::{Settings, TelemetryConfig};

const DEFAULT_FILTER: &str = "info";
const SERVICE_NAME: &str = "userdesk";

/// Installs the global subscriber: formatted logs filtered by `RUST_LOG`, plus
/// span export over OTLP when a receiver is configured.
pub fn init_tracer(settings: &Settings) -> Result<(), Error> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let otel_layer = match &settings.telemetry {
        Some(telemetry) => {
            let tracer = otlp_tracer(telemetry)?;
            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };

    let subscriber = Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(otel_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn otlp_tracer(telemetry: &TelemetryConfig) -> Result<trace::Tracer, Error> {
    let otlp_exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_metadata(headers(telemetry)?)
        .with_endpoint(&telemetry.receiver_url);

    // Spans are exported in batch
    global::set_text_map_propagator(TraceContextPropagator::new());
    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(otlp_exporter)
        .with_trace_config(
            trace::config().with_resource(Resource::new(vec![KeyValue::new(
                "service.name",
                SERVICE_NAME,
            )])),
        )
        .install_batch(runtime::Tokio)?;

    Ok(tracer)
}

fn headers(telemetry: &TelemetryConfig) -> Result<MetadataMap, Error> {
    let mut metadata = MetadataMap::new();
    if !telemetry.api_key.is_empty() {
        metadata.insert(
            MetadataKey::from_str("x-honeycomb-team")?,
            MetadataValue::from_str(&telemetry.api_key)?,
        );
    }

    Ok(metadata)
}
