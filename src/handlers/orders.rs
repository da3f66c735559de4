//! Order handlers. Orders are always returned with their line items.

use crate::error::AppError;
use crate::extractors::{EntityId, JsonBody};
use crate::model::{NewOrder, Order, OrderPatch};
use crate::response::{created, ok_message};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};

/// GET /orders
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, AppError> {
    let orders = state
        .repo
        .list_orders()
        .await
        .map_err(AppError::storage("failed to get orders"))?;
    Ok(Json(orders))
}

/// POST /orders. The order and its items are stored atomically.
pub async fn create_order(
    State(state): State<AppState>,
    JsonBody(order): JsonBody<NewOrder>,
) -> Result<impl IntoResponse, AppError> {
    let order = state
        .repo
        .create_order(&order)
        .await
        .map_err(AppError::storage("failed to create order"))?;
    tracing::info!(order_id = order.order_id, items = order.items.len(), "order created");
    Ok(created(order))
}

/// GET /orders/:id. A bad id is reported as `invalid order ID` on this route.
pub async fn read_order(
    id: Result<EntityId, AppError>,
    State(state): State<AppState>,
) -> Result<Json<Order>, AppError> {
    let EntityId(id) = id.map_err(|_| AppError::BadRequest("invalid order ID".into()))?;
    let order = state
        .repo
        .get_order(id)
        .await
        .map_err(AppError::storage("failed to get order"))?
        .ok_or_else(|| AppError::NotFound("order not found".into()))?;
    Ok(Json(order))
}

/// PUT /orders/:id
///
/// Writes the order's scalar fields, then each submitted item by its `lineItemId`, one
/// statement at a time. Items are not checked against the order in the path. The first
/// failure ends the request; statements that already ran stay applied.
pub async fn update_order(
    EntityId(id): EntityId,
    State(state): State<AppState>,
    JsonBody(patch): JsonBody<OrderPatch>,
) -> Result<impl IntoResponse, AppError> {
    state
        .repo
        .update_order(id, &patch)
        .await
        .map_err(AppError::storage("failed to update order"))?;

    for item in &patch.items {
        let Some(item_id) = item.line_item_id else {
            tracing::debug!(order_id = id, "item without lineItemId skipped");
            continue;
        };
        state
            .repo
            .update_item(item_id, item)
            .await
            .map_err(AppError::storage("failed to update item"))?;
    }

    Ok(ok_message("order and items updated"))
}

/// DELETE /orders/:id. Items and order are removed in one transaction.
pub async fn delete_order(
    EntityId(id): EntityId,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .repo
        .delete_order(id)
        .await
        .map_err(AppError::storage("failed to delete order"))?;
    tracing::debug!(id, deleted, "order delete");
    Ok(ok_message("order and related items deleted"))
}
