//! HTTP handlers for the user and order resources.

pub mod orders;
pub mod users;
pub use orders::*;
pub use users::*;
