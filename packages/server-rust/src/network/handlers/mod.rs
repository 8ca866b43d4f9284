//! HTTP handler definitions for the `ReqShape` server.
//!
//! Defines `AppState` (the shared state carried through axum extractors)
//! and re-exports the handler functions the router wires up.

pub mod health;
pub mod models;
pub mod validate;

pub use health::{health_handler, liveness_handler, readiness_handler};
pub use models::submit_models_handler;
pub use validate::validate_handler;

use std::sync::Arc;
use std::time::Instant;

use reqshape_core::Engine;

use super::config::NetworkConfig;
use super::shutdown::ShutdownController;

/// Shared application state passed to all handlers via `State` extraction.
///
/// Holds `Arc` references so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    /// The learning/validation engine.
    pub engine: Arc<Engine>,
    /// Graceful shutdown controller with health state and in-flight tracking.
    pub shutdown: Arc<ShutdownController>,
    /// Network configuration the server was started with.
    pub config: Arc<NetworkConfig>,
    /// Server start time, for uptime reporting.
    pub start_time: Instant,
}
