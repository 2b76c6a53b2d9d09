//! # Mailbox BFF
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Build the token verifier, session reader and service token signer
//! - Create the upstream mail client and the blog catalog
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mailbox_auth::{HmacSessionReader, JwtTokenVerifier, ServiceTokenSigner};
use mailbox_hex::inbound::{FixedWindowLimiter, HttpServer};
use mailbox_hex::{AuthMediator, MailboxService};
use mailbox_upstream::HttpMailApi;

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
    Ok((provider.tracer("mailbox-bff"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize OpenTelemetry tracing
    let (otel_tracer, otel_provider) = init_tracer()?;
    let telemetry = tracing_opentelemetry::layer().with_tracer(otel_tracer);

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mailbox_app=debug,mailbox_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting mailbox BFF on port {}", config.port);
    tracing::info!("Forwarding mailbox calls to {}", config.service_api_url);

    let mediator = AuthMediator::new(
        Arc::new(JwtTokenVerifier::new(&config.access_token_secret)),
        Arc::new(
            HmacSessionReader::new(config.nextauth_secret.clone())
                .with_cookie_name(config.session_cookie_name.clone()),
        ),
        ServiceTokenSigner::new(&config.nextauth_secret),
    );

    let mut api = HttpMailApi::new(&config.service_api_url, config.service_api_timeout)?;
    if let Some(key) = &config.service_api_key {
        api = api.with_api_key(key.clone());
    }

    let posts = config.load_posts()?;
    tracing::info!("Loaded {} blog posts", posts.len());

    let limiter = FixedWindowLimiter::new(config.rate_limit_requests, config.rate_limit_window);
    tracing::info!(
        "Rate limit: {} requests per {:?} per client address",
        limiter.max_requests(),
        limiter.window()
    );

    // Create and run the HTTP server
    let server = HttpServer::new(mediator, MailboxService::new(api), posts)
        .with_rate_limiter(limiter);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    let _ = otel_provider.shutdown();
    Ok(())
}
