//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use mailbox_types::{MailApi, PostCatalog};

use super::auth::auth_middleware;
use super::handlers::{self, AppState};
use super::rate_limit::{FixedWindowLimiter, rate_limit_middleware};
use crate::openapi::ApiDoc;
use crate::{AuthMediator, MailboxService};

/// HTTP Server for the mailbox BFF.
pub struct HttpServer<M: MailApi> {
    state: Arc<AppState<M>>,
    rate_limiter: Arc<FixedWindowLimiter>,
}

impl<M: MailApi> HttpServer<M> {
    /// Creates a new HTTP server with the default limit of 10 requests per minute.
    pub fn new(mediator: AuthMediator, mailbox: MailboxService<M>, posts: PostCatalog) -> Self {
        Self {
            state: Arc::new(AppState {
                mediator,
                mailbox,
                posts,
            }),
            rate_limiter: Arc::new(FixedWindowLimiter::default()),
        }
    }

    /// Replaces the rate limiter.
    pub fn with_rate_limiter(mut self, limiter: FixedWindowLimiter) -> Self {
        self.rate_limiter = Arc::new(limiter);
        self
    }

    /// Shared rate limiter, for inspection.
    pub fn rate_limiter(&self) -> Arc<FixedWindowLimiter> {
        self.rate_limiter.clone()
    }

    /// Builds the Axum router with all routes.
    ///
    /// Only `/mailbox` is rate limited and authenticated; the rate limit runs
    /// first so rejected callers never reach token verification.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        let mailbox = Router::new()
            .route(
                "/mailbox",
                get(handlers::read_mailbox::<M>).delete(handlers::delete_message::<M>),
            )
            .route_layer(middleware::from_fn_with_state(
                self.state.clone(),
                auth_middleware::<M>,
            ))
            .route_layer(middleware::from_fn_with_state(
                self.rate_limiter.clone(),
                rate_limit_middleware,
            ));

        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/posts", get(handlers::list_posts::<M>))
            .route("/api/posts/{slug}", get(handlers::get_post::<M>))
            .merge(mailbox)
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .layer(metrics)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
