//! Router assembly.

mod common;
mod resources;

pub use common::common_routes;
pub use resources::{order_routes, user_routes};

use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Full application: common routes at the root, resources under `/api/v1`.
pub fn app(state: AppState, body_limit: usize) -> Router {
    let api = Router::new()
        .merge(user_routes(state.clone()))
        .merge(order_routes(state.clone()));

    Router::new()
        .merge(common_routes(state))
        .nest("/api/v1", api)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
}
