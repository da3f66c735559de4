//! Response body helpers.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

/// Plain `{"message": ...}` body used for acknowledgements and errors.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn ok_message(message: &str) -> (StatusCode, Json<MessageBody>) {
    (
        StatusCode::OK,
        Json(MessageBody {
            message: message.to_string(),
        }),
    )
}
