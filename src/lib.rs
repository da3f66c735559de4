//! Orders API: REST backend for users and orders with line items.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;

pub use config::{Settings, StorageBackend};
pub use error::{AppError, ConfigError, StoreError};
pub use routes::app;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables, MemoryRepository, PgRepository, Repository};
