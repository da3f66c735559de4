//! Request extractors shared by the resource handlers.

pub mod id;
pub mod json;

pub use id::{parse_id, EntityId};
pub use json::JsonBody;
