//! Server lifecycle with deferred startup.
//!
//! `new()` allocates shared state, `start()` binds the TCP listener, and
//! `serve()` accepts connections until the shutdown future resolves. The
//! split lets callers learn the actual bound port (port 0 is supported)
//! before traffic starts.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::routing::{get, post};
use axum::Router;
use reqshape_core::Engine;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::NetworkConfig;
use super::handlers::{
    health_handler, liveness_handler, readiness_handler, submit_models_handler, validate_handler,
    AppState,
};
use super::middleware::build_http_layers;
use super::shutdown::ShutdownController;

/// How long `serve` waits for in-flight requests after the shutdown signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Owns the HTTP listener lifecycle for the `ReqShape` API.
pub struct NetworkModule {
    config: NetworkConfig,
    engine: Arc<Engine>,
    listener: Option<TcpListener>,
    shutdown: Arc<ShutdownController>,
}

impl NetworkModule {
    /// Creates the module without binding a port.
    #[must_use]
    pub fn new(config: NetworkConfig, engine: Arc<Engine>) -> Self {
        Self {
            config,
            engine,
            listener: None,
            shutdown: Arc::new(ShutdownController::new()),
        }
    }

    /// Shared handle to the shutdown controller, for health checks and for
    /// triggering shutdown from outside the serve loop.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Assembles the router with all routes and middleware.
    ///
    /// Routes:
    /// - `POST /models` -- learn a batch of model descriptions
    /// - `POST /validate` -- validate a request against a learned model
    /// - `GET /health` -- detailed health JSON
    /// - `GET /health/live`, `GET /health/ready` -- probes
    #[must_use]
    pub fn build_router(&self) -> Router {
        let state = AppState {
            engine: Arc::clone(&self.engine),
            shutdown: Arc::clone(&self.shutdown),
            config: Arc::new(self.config.clone()),
            start_time: Instant::now(),
        };

        Router::new()
            .route("/models", post(submit_models_handler))
            .route("/validate", post(validate_handler))
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .route("/health/ready", get(readiness_handler))
            .layer(build_http_layers(&self.config))
            .with_state(state)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which differs from the configured
    /// one when port 0 (OS-assigned) is used.
    ///
    /// # Errors
    ///
    /// Fails when the address cannot be bound.
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();
        info!(host = %self.config.host, port, "listener bound");
        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves requests until `shutdown` resolves, then drains.
    ///
    /// Transitions the health state to `Ready` when serving begins, to
    /// `Draining` when the shutdown future resolves, and to `Stopped` once
    /// every in-flight request completes (or logs a warning on drain
    /// timeout).
    ///
    /// # Errors
    ///
    /// Fails when `start()` was not called first, or on a fatal listener
    /// I/O error.
    pub async fn serve(mut self, shutdown: impl Future<Output = ()> + Send + 'static) -> anyhow::Result<()> {
        let Some(listener) = self.listener.take() else {
            anyhow::bail!("start() must be called before serve()");
        };
        let router = self.build_router();

        let controller = Arc::clone(&self.shutdown);
        let signal = async move {
            shutdown.await;
            controller.trigger_shutdown();
        };

        self.shutdown.set_ready();
        info!("serving HTTP connections");

        axum::serve(listener, router)
            .with_graceful_shutdown(signal)
            .await?;

        if !self.shutdown.wait_for_drain(DRAIN_TIMEOUT).await {
            warn!(
                in_flight = self.shutdown.in_flight_count(),
                "drain timeout expired with requests still in flight"
            );
        }
        Ok(())
    }
}
