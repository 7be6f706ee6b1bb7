use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the log layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Parses `LOG_FORMAT` style values; anything other than `json` is pretty.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Logging and trace export settings.
#[derive(Debug, Clone, Default)]
pub struct TelemetrySettings {
    pub log_format: LogFormat,
    pub otlp_endpoint: Option<String>,
}

impl TelemetrySettings {
    /// Reads `LOG_FORMAT` and `OTEL_EXPORTER_OTLP_ENDPOINT`.
    pub fn from_env() -> Self {
        let log_format = std::env::var("LOG_FORMAT")
            .map(|v| LogFormat::parse(&v))
            .unwrap_or_default();
        let otlp_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .filter(|endpoint| !endpoint.trim().is_empty());

        Self {
            log_format,
            otlp_endpoint,
        }
    }
}

/// RAII guard that shuts down the OpenTelemetry tracer provider on drop.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Failed to shutdown tracer provider: {e}");
        }
    }
}

/// Installs the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` (default `info`). Spans are exported over OTLP/HTTP
/// only when an endpoint is configured; the W3C trace context propagator is always
/// registered so outgoing calls carry the current trace.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(service_name: &str, settings: &TelemetrySettings) -> TelemetryGuard {
    opentelemetry::global::set_text_map_propagator(TraceContextPropagator::new());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (json_layer, pretty_layer) = match settings.log_format {
        LogFormat::Json => (
            Some(tracing_subscriber::fmt::layer().json().flatten_event(true)),
            None,
        ),
        LogFormat::Pretty => (None, Some(tracing_subscriber::fmt::layer())),
    };

    let (otel_layer, provider) = match settings.otlp_endpoint.as_deref() {
        Some(endpoint) => match build_tracer_provider(service_name, endpoint) {
            Ok(provider) => {
                let tracer = provider.tracer(service_name.to_owned());
                opentelemetry::global::set_tracer_provider(provider.clone());
                (
                    Some(tracing_opentelemetry::layer().with_tracer(tracer)),
                    Some(provider),
                )
            }
            Err(e) => {
                eprintln!("OTLP exporter disabled, failed to build it for {endpoint}: {e}");
                (None, None)
            }
        },
        None => (None, None),
    };

    Registry::default()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .with(otel_layer)
        .init();

    TelemetryGuard { provider }
}

fn build_tracer_provider(
    service_name: &str,
    endpoint: &str,
) -> Result<SdkTracerProvider, opentelemetry_otlp::ExporterBuildError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(
            opentelemetry_sdk::Resource::builder()
                .with_service_name(service_name.to_owned())
                .build(),
        )
        .build())
}
