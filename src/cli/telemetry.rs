//! Logging and optional trace export for the command-line client.
//!
//! Log lines go to stderr; stdout only carries command results. Spans are
//! exported over OTLP/gRPC when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.

use anyhow::Result;
use once_cell::sync::OnceCell;
use opentelemetry::{KeyValue, global, trace::TracerProvider as _};
use opentelemetry_otlp::{SpanExporter, WithExportConfig, WithTonicConfig};
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use std::{env, io, time::Duration};
use tonic::transport::ClientTlsConfig;
use tracing::{Level, debug};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};
use ulid::Ulid;

static TRACER_PROVIDER: OnceCell<SdkTracerProvider> = OnceCell::new();

const EXPORT_TIMEOUT: Duration = Duration::from_secs(3);

// Transport crates are noisy at debug and below.
const QUIET_DIRECTIVES: [&str; 4] = [
    "hyper=error",
    "hyper_util=error",
    "reqwest=warn",
    "opentelemetry_sdk=warn",
];

/// Where and as whom spans are exported.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OtlpSettings {
    endpoint: String,
    instance_id: String,
}

impl OtlpSettings {
    /// `None` unless `OTEL_EXPORTER_OTLP_ENDPOINT` is set and non-empty.
    fn from_env() -> Option<Self> {
        let endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok()?;
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return None;
        }

        if let Ok(protocol) = env::var("OTEL_EXPORTER_OTLP_PROTOCOL") {
            if protocol != "grpc" {
                debug!("OTEL_EXPORTER_OTLP_PROTOCOL='{protocol}' ignored, exporting over gRPC");
            }
        }

        Some(Self {
            endpoint: normalize_endpoint(endpoint),
            instance_id: env::var("OTEL_SERVICE_INSTANCE_ID")
                .unwrap_or_else(|_| Ulid::new().to_string()),
        })
    }

    fn resource(&self) -> Resource {
        Resource::builder_empty()
            .with_attributes([
                KeyValue::new("service.name", env!("CARGO_PKG_NAME")),
                KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
                KeyValue::new("service.instance.id", self.instance_id.clone()),
            ])
            .build()
    }

    fn exporter(&self) -> Result<SpanExporter> {
        let mut builder = SpanExporter::builder()
            .with_tonic()
            .with_endpoint(self.endpoint.clone())
            .with_timeout(EXPORT_TIMEOUT);

        if let Some(tls) = tls_config(&self.endpoint) {
            builder = builder.with_tls_config(tls);
        }

        Ok(builder.build()?)
    }

    fn install(self) -> Result<opentelemetry_sdk::trace::Tracer> {
        let exporter = self.exporter()?;

        let provider = SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .with_resource(self.resource())
            .build();

        let _ = TRACER_PROVIDER.set(provider.clone());
        global::set_tracer_provider(provider.clone());

        Ok(provider.tracer(env!("CARGO_PKG_NAME")))
    }
}

// A bare `host:port` gets https, the gRPC default.
fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("https://{}", endpoint.trim_end_matches('/'))
    }
}

// Host part of an https endpoint, checked against the collector certificate.
fn tls_domain(endpoint: &str) -> Option<&str> {
    endpoint
        .strip_prefix("https://")
        .and_then(|rest| rest.split('/').next())
        .and_then(|authority| authority.split(':').next())
        .filter(|host| !host.is_empty())
}

fn tls_config(endpoint: &str) -> Option<ClientTlsConfig> {
    tls_domain(endpoint).map(|host| {
        ClientTlsConfig::new()
            .domain_name(host.to_string())
            .with_native_roots()
    })
}

fn env_filter(level: Level) -> Result<EnvFilter> {
    let mut filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    for directive in QUIET_DIRECTIVES {
        filter = filter.add_directive(directive.parse()?);
    }
    Ok(filter)
}

/// Installs the global subscriber. `None` logs errors only.
///
/// # Errors
///
/// Returns an error if the exporter cannot be built or a global subscriber
/// is already installed.
pub fn init(verbosity_level: Option<Level>) -> Result<()> {
    let filter = env_filter(verbosity_level.unwrap_or(Level::ERROR))?;

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time();

    match OtlpSettings::from_env() {
        Some(settings) => {
            let tracer = settings.install()?;
            let subscriber = Registry::default()
                .with(fmt_layer)
                .with(tracing_opentelemetry::layer().with_tracer(tracer))
                .with(filter);
            tracing::subscriber::set_global_default(subscriber)?;
        }
        None => {
            let subscriber = Registry::default().with(fmt_layer).with(filter);
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    Ok(())
}

/// Flushes pending spans. Does nothing when export is off.
pub fn shutdown_tracer() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        debug!("flushing spans");
        if let Err(err) = provider.shutdown() {
            eprintln!("Failed to flush traces: {err}");
        }
    }
}
