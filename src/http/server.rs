//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the menu routes
//! - Wire up middleware (request ID, access log, request timeout)
//! - Bind the listener and serve until shutdown
//! - Bound the graceful drain with the configured grace window

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

use crate::config::{ListenerConfig, ServiceConfig};
use crate::http::handlers;
use crate::http::middleware::{access_log_middleware, AccessLog, AccessLogState, TracingAccessLog};
use crate::menu::MenuService;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub menu: Arc<MenuService>,
}

/// Fatal server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("in-flight requests did not finish within {0:?}")]
    ShutdownTimeout(Duration),
}

/// Bind the configured listen address.
pub async fn bind_listener(config: &ListenerConfig) -> Result<TcpListener, ServerError> {
    TcpListener::bind(&config.bind_address)
        .await
        .map_err(|source| ServerError::Bind {
            address: config.bind_address.clone(),
            source,
        })
}

/// HTTP server for the menu service.
pub struct MenuServer {
    router: Router,
    config: ServiceConfig,
}

impl MenuServer {
    /// Server over the seeded catalog, entropy-driven faults and the
    /// `tracing` access log.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_parts(config, MenuService::default(), Arc::new(TracingAccessLog))
    }

    /// Server with an explicit menu service and access log sink.
    pub fn with_parts(
        config: ServiceConfig,
        menu: MenuService,
        access_log: Arc<dyn AccessLog>,
    ) -> Self {
        let state = AppState {
            menu: Arc::new(menu),
        };
        let access_log = AccessLogState::new(access_log, config.observability.tracing_enabled);
        let router = Self::build_router(&config, state, access_log);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layer order, outermost first: request ID assignment, request ID
    /// propagation, access log, JSON timeout body, timeout.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState, access_log: AccessLogState) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/menu", get(handlers::list_menu))
            .route("/api/menu/", get(handlers::get_menu_item))
            .route("/api/menu/{*id}", get(handlers::get_menu_item))
            .fallback(handlers::not_found)
            .method_not_allowed_fallback(handlers::method_not_allowed)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::map_response(handlers::json_timeout))
            .layer(middleware::from_fn_with_state(access_log, access_log_middleware))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires (or its sender is dropped).
    ///
    /// After the signal, new connections are refused and in-flight requests
    /// get `timeouts.shutdown_grace_secs` to finish. Past that the remaining
    /// connections are dropped and `ServerError::ShutdownTimeout` returned.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            shutdown_grace_secs = grace.as_secs(),
            "HTTP server starting"
        );

        let (drain_tx, drain_rx) = oneshot::channel::<()>();
        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        let serve = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = drain_rx.await;
            })
            .into_future();
        tokio::pin!(serve);

        tokio::select! {
            result = &mut serve => {
                result?;
                tracing::info!("HTTP server stopped");
                return Ok(());
            }
            _ = shutdown.recv() => {}
        }

        tracing::info!(grace_secs = grace.as_secs(), "Draining in-flight requests");
        let _ = drain_tx.send(());

        match tokio::time::timeout(grace, serve).await {
            Ok(result) => {
                result?;
                tracing::info!("HTTP server stopped");
                Ok(())
            }
            Err(_) => {
                tracing::error!(grace_secs = grace.as_secs(), "Graceful shutdown window exceeded");
                Err(ServerError::ShutdownTimeout(grace))
            }
        }
    }
}
