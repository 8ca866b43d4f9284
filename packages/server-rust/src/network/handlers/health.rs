//! Health, liveness, and readiness endpoint handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use super::AppState;
use crate::network::HealthState;

/// Returns detailed health information as JSON.
///
/// Always answers 200; the `state` field tells monitoring tools whether
/// the server is actually ready, draining, or stopped. `models` is the
/// number of (path, method) pairs learned so far.
pub async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "state": state.shutdown.health_state().as_str(),
        "models": state.engine.store().len(),
        "in_flight": state.shutdown.in_flight_count(),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// Liveness probe -- always 200.
///
/// Only asserts the process is running; a failed liveness probe triggers a
/// restart, so it must not depend on health state.
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe -- 200 when ready, 503 otherwise.
///
/// 503 during startup and while draining, which takes the instance out of
/// rotation without restarting it.
pub async fn readiness_handler(State(state): State<AppState>) -> StatusCode {
    if state.shutdown.health_state() == HealthState::Ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{NetworkConfig, ShutdownController};
    use reqshape_core::Engine;
    use std::sync::Arc;
    use std::time::Instant;

    fn test_state() -> AppState {
        AppState {
            engine: Arc::new(Engine::new()),
            shutdown: Arc::new(ShutdownController::new()),
            config: Arc::new(NetworkConfig::default()),
            start_time: Instant::now(),
        }
    }

    #[tokio::test]
    async fn health_reports_state_and_counters() {
        let state = test_state();
        state.shutdown.set_ready();

        let body = health_handler(State(state)).await.0;
        assert_eq!(body["state"], "ready");
        assert_eq!(body["models"], 0);
        assert_eq!(body["in_flight"], 0);
        assert!(body["uptime_secs"].is_number());
    }

    #[tokio::test]
    async fn health_reports_learned_model_count() {
        let state = test_state();
        let model = serde_json::from_value(serde_json::json!({
            "path": "/x", "method": "GET",
            "query_params": [], "headers": [], "body": [],
        }))
        .unwrap();
        state.engine.submit_models(&[model]);

        let body = health_handler(State(state)).await.0;
        assert_eq!(body["models"], 1);
    }

    #[tokio::test]
    async fn health_reports_in_flight_count() {
        let state = test_state();
        let _guard = state.shutdown.in_flight_guard();

        let body = health_handler(State(state)).await.0;
        assert_eq!(body["in_flight"], 1);
    }

    #[tokio::test]
    async fn liveness_is_always_ok() {
        assert_eq!(liveness_handler().await, StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_follows_the_state_machine() {
        let state = test_state();
        assert_eq!(
            readiness_handler(State(state.clone())).await,
            StatusCode::SERVICE_UNAVAILABLE
        );

        state.shutdown.set_ready();
        assert_eq!(readiness_handler(State(state.clone())).await, StatusCode::OK);

        state.shutdown.trigger_shutdown();
        assert_eq!(
            readiness_handler(State(state)).await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
