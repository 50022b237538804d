//! # Campus Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the repository adapter
//! - Create the CMS service, rate limiter and license monitor
//! - Start the background sweeper and license poller
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_hex::{
    CmsService, HttpLicenseProvider, LicenseMonitor, RateLimiter, TokenIssuer, inbound::HttpServer,
};
use campus_repo::build_repo;

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("campus-cms"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // OpenTelemetry export only when a collector is configured
    let otel = match std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
        Ok(_) => Some(init_tracer()?),
        Err(_) => None,
    };
    let telemetry = otel
        .as_ref()
        .map(|(tracer, _)| tracing_opentelemetry::layer().with_tracer(tracer.clone()));

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,campus_app=debug,campus_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!(
        environment = %config.environment,
        "Starting campus CMS server on port {}",
        config.port
    );
    tracing::debug!(?config, "Loaded configuration");

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url).await?;

    let tokens = TokenIssuer::new(config.jwt_secret.as_bytes(), config.jwt_ttl);
    let service = CmsService::new(repo, tokens);

    // One limiter for the whole process, swept in the background
    let limiter = Arc::new(RateLimiter::default());
    let sweeper = limiter.clone().spawn_sweeper(config.sweep_every);

    let license = match &config.license_url {
        Some(url) => Arc::new(LicenseMonitor::new(Arc::new(HttpLicenseProvider::new(url.clone())))),
        None => {
            tracing::info!("LICENSE_STATUS_URL not set, license checks disabled");
            Arc::new(LicenseMonitor::disabled())
        }
    };
    let poller = license.clone().spawn_polling(config.license_poll_every);

    // Create and run the HTTP server
    let server = HttpServer::with_components(service, license, limiter, config.rate_limits());
    let addr = format!("0.0.0.0:{}", config.port);

    let result = server.run(&addr).await;

    sweeper.abort();
    poller.abort();

    // Ensure traces are flushed before exit
    if let Some((_, provider)) = otel {
        let _ = provider.shutdown();
    }
    result
}
