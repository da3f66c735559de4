//! User handlers: list (with email filter), create, read, update, delete.

use crate::error::AppError;
use crate::extractors::{EntityId, JsonBody};
use crate::model::{NewUser, User, UserPatch};
use crate::response::{created, ok_message};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
    pub email: Option<String>,
}

/// GET /users?email=<substr>
pub async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Vec<User>>, AppError> {
    let email = filter.email.as_deref().filter(|e| !e.is_empty());
    let users = state
        .repo
        .list_users(email)
        .await
        .map_err(AppError::storage("failed to get users"))?;
    Ok(Json(users))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(user): JsonBody<NewUser>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .repo
        .create_user(&user)
        .await
        .map_err(AppError::storage("failed to create user"))?;
    tracing::info!(id = user.id, "user created");
    Ok(created(user))
}

/// GET /users/:id
pub async fn read_user(
    EntityId(id): EntityId,
    State(state): State<AppState>,
) -> Result<Json<User>, AppError> {
    let user = state
        .repo
        .get_user(id)
        .await
        .map_err(AppError::storage("failed to get user"))?
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;
    Ok(Json(user))
}

/// PUT /users/:id. Responds 200 whether or not a row matched.
pub async fn update_user(
    EntityId(id): EntityId,
    State(state): State<AppState>,
    JsonBody(patch): JsonBody<UserPatch>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state
        .repo
        .update_user(id, &patch)
        .await
        .map_err(AppError::storage("failed to update user"))?;
    tracing::debug!(id, updated, "user update");
    Ok(ok_message("user updated"))
}

/// DELETE /users/:id. Responds 200 whether or not a row matched.
pub async fn delete_user(
    EntityId(id): EntityId,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .repo
        .delete_user(id)
        .await
        .map_err(AppError::storage("failed to delete user"))?;
    tracing::debug!(id, deleted, "user delete");
    Ok(ok_message("user deleted"))
}
