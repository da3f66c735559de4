//! Persistence behind the handlers: a [`Repository`] trait with PostgreSQL and in-memory backends.

mod memory;
mod postgres;
mod schema;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;
pub use schema::{ensure_database_exists, ensure_tables};

use crate::error::StoreError;
use crate::model::{Item, ItemPatch, NewOrder, NewUser, Order, OrderPatch, User, UserPatch};
use async_trait::async_trait;

/// Storage operations used by the HTTP handlers.
///
/// Mutations that address a row by id return the number of rows they touched; callers
/// decide whether zero is an error. Order creation and order deletion are atomic.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Cheap liveness probe used by `/ready`.
    async fn ping(&self) -> Result<(), StoreError>;

    /// All users ordered by id; `email` keeps only users whose email contains it.
    async fn list_users(&self, email: Option<&str>) -> Result<Vec<User>, StoreError>;
    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError>;
    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn update_user(&self, id: i64, patch: &UserPatch) -> Result<u64, StoreError>;
    async fn delete_user(&self, id: i64) -> Result<u64, StoreError>;

    /// All orders ordered by id, items loaded.
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError>;
    /// Inserts the order and its items as one unit.
    async fn create_order(&self, order: &NewOrder) -> Result<Order, StoreError>;
    async fn get_order(&self, id: i64) -> Result<Option<Order>, StoreError>;
    /// Writes the present scalar fields of `patch`; `patch.items` is ignored here.
    async fn update_order(&self, id: i64, patch: &OrderPatch) -> Result<u64, StoreError>;
    /// Updates one item by its own id, regardless of which order owns it.
    async fn update_item(&self, item_id: i64, patch: &ItemPatch) -> Result<u64, StoreError>;
    /// Deletes the order's items then the order in one transaction. Returns orders deleted.
    async fn delete_order(&self, id: i64) -> Result<u64, StoreError>;
    async fn items_for_order(&self, order_id: i64) -> Result<Vec<Item>, StoreError>;
}
