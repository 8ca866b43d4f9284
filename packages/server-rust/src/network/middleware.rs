//! Tower middleware stack applied to every HTTP request.
//!
//! Ordering is outer-to-inner: the first layer listed processes the
//! request first on the way in and the response last on the way out.

use axum::http::header::HeaderName;
use axum::http::{Method, StatusCode};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::config::NetworkConfig;

/// The composed layer type produced by [`build_http_layers`].
///
/// Spelled out so the function signature stays readable; each layer wraps
/// the next in a `Stack`.
type HttpLayers = tower::layer::util::Stack<
    PropagateRequestIdLayer,
    tower::layer::util::Stack<
        TimeoutLayer,
        tower::layer::util::Stack<
            CorsLayer,
            tower::layer::util::Stack<
                TraceLayer<
                    tower_http::classify::SharedClassifier<
                        tower_http::classify::ServerErrorsAsFailures,
                    >,
                >,
                tower::layer::util::Stack<
                    SetRequestIdLayer<MakeRequestUuid>,
                    tower::layer::util::Identity,
                >,
            >,
        >,
    >,
>;

/// Builds the HTTP middleware stack from the network configuration.
///
/// Outermost to innermost:
/// 1. `SetRequestId` -- stamps a UUID v4 `x-request-id` on every request
/// 2. `Trace` -- structured request/response spans
/// 3. `CORS` -- origin allowlist from the configuration
/// 4. `Timeout` -- answers 408 when a request exceeds the configured limit
/// 5. `PropagateRequestId` -- copies `x-request-id` onto the response
#[must_use]
pub fn build_http_layers(config: &NetworkConfig) -> HttpLayers {
    let x_request_id = HeaderName::from_static("x-request-id");

    ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config.cors_origins))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(PropagateRequestIdLayer::new(x_request_id))
        .into_inner()
}

/// CORS layer from the configured origin list; `"*"` anywhere in the list
/// means any origin.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| o.parse().ok()))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
