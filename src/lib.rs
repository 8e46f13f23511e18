use axum::{
    Router,
    http::HeaderName,
    middleware,
    response::{Html, Response},
    routing::get,
};

use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core gateway components.
pub mod config;
pub mod gate;
pub mod identity;
pub mod interceptor;
pub mod models;

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use identity::{HttpIdentityClient, IdentityState, MockIdentityService};

/// AppState
///
/// Implements the **Unified State Pattern**. This is the single, thread-safe,
/// and immutable container holding all essential gateway services and
/// configuration, shared across all incoming requests. Note that nothing in
/// here is mutable: the gateway holds no per-session state, so every request
/// is evaluated fresh.
#[derive(Clone)]
pub struct AppState {
    /// Identity Layer: Abstracts the external session lookup.
    pub identity: IdentityState,
    /// Configuration: The loaded, immutable environment configuration.
    pub config: AppConfig,
}

/// create_router
///
/// Assembles the gateway's routing structure, applies the route guard and the
/// global middleware stack, and registers the application state.
///
/// The guard wraps every route, including the fallback; its own prefix
/// configuration decides which paths are actually intercepted, so public
/// routes still skip the identity lookup entirely.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // A simple, unauthenticated endpoint for monitoring and load balancer checks.
        .route("/health", get(|| async { "ok" }))
        // Everything else stands in for the fronted marketplace application.
        // In deployment the gateway sits in front of it; requests the guard
        // allows through land here.
        .fallback(app_stub)
        // The route guard enforces the access-control contract before any
        // page logic runs.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            interceptor::route_guard,
        ))
        // Apply the Unified State to all routes.
        .with_state(state);

    // 3. Observability, Correlation, and Fail-Closed Layers (Applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Fail-closed boundary: a panic anywhere below becomes the
                // generic 403, never a torn connection or a silent pass-through.
                .layer(CatchPanicLayer::custom(handle_panic))
                // 3b. Request ID Generation: a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3c. Request Tracing: wraps the request/response lifecycle in a
                // tracing span carrying the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3d. Request ID Propagation: returns the x-request-id header
                // to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// app_stub
///
/// Placeholder for the marketplace application behind the gateway. Kept
/// deliberately minimal: the pages themselves are an external collaborator,
/// and integration tests only need a distinguishable 200 on Allow.
async fn app_stub() -> Html<&'static str> {
    Html("ok")
}

/// handle_panic
///
/// Converts any panic escaping the router into the same 403 response as a
/// denied verdict, with a non-specific reason. The real cause goes to the
/// logs only.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    tracing::error!(%detail, "request evaluation panicked, failing closed");
    interceptor::forbidden_page(interceptor::GENERIC_FAILURE_REASON)
}

/// trace_span_logger
///
/// Helper function used by `TraceLayer` to customize span creation. It
/// extracts the `x-request-id` header (if present) and includes it in the
/// structured logging metadata alongside the HTTP method and URI, so every
/// log line for a single request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
