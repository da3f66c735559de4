//! Resource routes, mounted under `/api/v1`.

use crate::handlers::{
    create_order, create_user, delete_order, delete_user, list_orders, list_users, read_order,
    read_user, update_order, update_user,
};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(read_user).put(update_user).delete(delete_user),
        )
        .with_state(state)
}

pub fn order_routes(state: AppState) -> Router {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route(
            "/orders/:id",
            get(read_order).put(update_order).delete(delete_order),
        )
        .with_state(state)
}
