pub mod dto;
pub mod problem;
pub mod routes;
pub mod state;
pub mod trace;

use crate::interface::http::state::AppState;
use axum::Router;

/// Builds the full HTTP app: feed reads plus health, readiness, and
/// metrics, wrapped in tracing middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::ready::router())
        .merge(routes::metrics::router())
        .merge(routes::activity::router())
        .layer(axum::middleware::from_fn(trace::request_log_middleware))
        .layer(axum::middleware::from_fn(trace::trace_id_middleware))
        .with_state(state)
}
