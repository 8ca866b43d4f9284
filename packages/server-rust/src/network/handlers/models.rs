//! Model submission endpoint.

use axum::extract::State;
use axum::Json;
use reqshape_core::Value;
use serde::Serialize;
use tracing::{info, warn};

use super::AppState;

/// Response body for a batch submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// Number of models learned from this batch.
    pub learned: usize,
    /// Items that were rejected, with their batch index and reason.
    pub rejected: Vec<RejectedItem>,
}

/// One rejected batch item, as reported to the caller.
#[derive(Debug, Serialize)]
pub struct RejectedItem {
    /// Index of the item in the submitted array.
    pub index: usize,
    /// Rejection reason.
    pub error: String,
}

/// Handles `POST /models`: learns a batch of model descriptions.
///
/// Items are independent -- a rejected item is logged and reported without
/// blocking the rest of the batch, so this answers 200 even when some
/// items failed to compile. Anything the engine accepted is immediately
/// retrievable for validation.
pub async fn submit_models_handler(
    State(state): State<AppState>,
    Json(descriptions): Json<Vec<Value>>,
) -> Json<SubmitResponse> {
    let _guard = state.shutdown.in_flight_guard();

    let report = state.engine.submit_models(&descriptions);
    for rejected in &report.rejected {
        warn!(index = rejected.index, error = %rejected.error, "rejected model submission");
    }
    info!(
        learned = report.learned.len(),
        rejected = report.rejected.len(),
        "processed model batch"
    );

    Json(SubmitResponse {
        learned: report.learned.len(),
        rejected: report
            .rejected
            .iter()
            .map(|item| RejectedItem {
                index: item.index,
                error: item.error.to_string(),
            })
            .collect(),
    })
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

    fn model(path: &str) -> Value {
        serde_json::from_value(serde_json::json!({
            "path": path, "method": "GET",
            "query_params": [{"name": "id", "required": true, "types": ["UUID"]}],
            "headers": [], "body": [],
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn batch_is_learned_and_counted() {
        let state = test_state();
        let response =
            submit_models_handler(State(state.clone()), Json(vec![model("/a"), model("/b")]))
                .await
                .0;

        assert_eq!(response.learned, 2);
        assert!(response.rejected.is_empty());
        assert_eq!(state.engine.store().len(), 2);
    }

    #[tokio::test]
    async fn rejected_items_are_reported_with_their_index() {
        let state = test_state();
        let bad: Value = serde_json::from_value(serde_json::json!({"method": "GET"})).unwrap();
        let response =
            submit_models_handler(State(state.clone()), Json(vec![model("/a"), bad]))
                .await
                .0;

        assert_eq!(response.learned, 1);
        assert_eq!(response.rejected.len(), 1);
        assert_eq!(response.rejected[0].index, 1);
        assert!(response.rejected[0].error.contains("malformed model"));
        assert_eq!(state.engine.store().len(), 1);
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let state = test_state();
        let response = submit_models_handler(State(state.clone()), Json(vec![])).await.0;

        assert_eq!(response.learned, 0);
        assert!(response.rejected.is_empty());
        assert!(state.engine.store().is_empty());
    }
}
