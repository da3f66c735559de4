//! PostgreSQL repository. Identifiers are fixed; all values go through bind parameters.

use super::Repository;
use crate::error::StoreError;
use crate::model::{Item, ItemPatch, NewOrder, NewUser, Order, OrderPatch, User, UserPatch};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;

const USER_COLUMNS: &str = "id, username, email";
const ORDER_COLUMNS: &str = "order_id, customer_name, ordered_at";
const ITEM_COLUMNS: &str = "item_id, item_code, description, quantity, order_id";

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads the items of all `orders` with one query and attaches them in item id order.
    async fn attach_items(&self, orders: &mut [Order]) -> Result<(), StoreError> {
        if orders.is_empty() {
            return Ok(());
        }
        let ids: Vec<i64> = orders.iter().map(|o| o.order_id).collect();
        let sql = format!(
            "SELECT {} FROM items WHERE order_id = ANY($1) ORDER BY item_id",
            ITEM_COLUMNS
        );
        tracing::debug!(sql = %sql, orders = ids.len(), "query");
        let items: Vec<Item> = sqlx::query_as(&sql)
            .bind(&ids[..])
            .fetch_all(&self.pool)
            .await?;
        let mut by_order: HashMap<i64, Vec<Item>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }
        for order in orders.iter_mut() {
            order.items = by_order.remove(&order.order_id).unwrap_or_default();
        }
        Ok(())
    }
}

/// `LIKE` pattern matching any value that contains `needle` literally.
pub(crate) fn like_contains(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl Repository for PgRepository {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_users(&self, email: Option<&str>) -> Result<Vec<User>, StoreError> {
        let users: Vec<User> = match email {
            Some(needle) => {
                let sql = format!(
                    "SELECT {} FROM users WHERE email LIKE $1 ESCAPE '\\' ORDER BY id",
                    USER_COLUMNS
                );
                let pattern = like_contains(needle);
                tracing::debug!(sql = %sql, pattern = %pattern, "query");
                sqlx::query_as(&sql)
                    .bind(pattern)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
                tracing::debug!(sql = %sql, "query");
                sqlx::query_as(&sql).fetch_all(&self.pool).await?
            }
        };
        Ok(users)
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (username, email) VALUES ($1, $2) RETURNING {}",
            USER_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let created: User = sqlx::query_as(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let user: Option<User> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_user(&self, id: i64, patch: &UserPatch) -> Result<u64, StoreError> {
        let sql = "UPDATE users SET username = COALESCE($1, username), email = COALESCE($2, email) WHERE id = $3";
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(sql)
            .bind(patch.username.as_deref())
            .bind(patch.email.as_deref())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_user(&self, id: i64) -> Result<u64, StoreError> {
        let sql = "DELETE FROM users WHERE id = $1";
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        let sql = format!("SELECT {} FROM orders ORDER BY order_id", ORDER_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let mut orders: Vec<Order> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        self.attach_items(&mut orders).await?;
        Ok(orders)
    }

    async fn create_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        let ordered_at = order.ordered_at.unwrap_or_else(Utc::now);
        let order_sql = format!(
            "INSERT INTO orders (customer_name, ordered_at) VALUES ($1, $2) RETURNING {}",
            ORDER_COLUMNS
        );
        let item_sql = format!(
            "INSERT INTO items (item_code, description, quantity, order_id) VALUES ($1, $2, $3, $4) RETURNING {}",
            ITEM_COLUMNS
        );
        tracing::debug!(sql = %order_sql, items = order.items.len(), "query (tx)");

        let mut tx = self.pool.begin().await?;
        let mut created: Order = sqlx::query_as(&order_sql)
            .bind(&order.customer_name)
            .bind(ordered_at)
            .fetch_one(&mut *tx)
            .await?;
        for item in &order.items {
            let row: Item = sqlx::query_as(&item_sql)
                .bind(&item.item_code)
                .bind(&item.description)
                .bind(i64::from(item.quantity))
                .bind(created.order_id)
                .fetch_one(&mut *tx)
                .await?;
            created.items.push(row);
        }
        tx.commit().await?;
        Ok(created)
    }

    async fn get_order(&self, id: i64) -> Result<Option<Order>, StoreError> {
        let sql = format!("SELECT {} FROM orders WHERE order_id = $1", ORDER_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let order: Option<Order> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match order {
            Some(mut order) => {
                order.items = self.items_for_order(order.order_id).await?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    async fn update_order(&self, id: i64, patch: &OrderPatch) -> Result<u64, StoreError> {
        let sql = "UPDATE orders SET customer_name = COALESCE($1, customer_name), ordered_at = COALESCE($2, ordered_at) WHERE order_id = $3";
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(sql)
            .bind(patch.customer_name.as_deref())
            .bind(patch.ordered_at)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn update_item(&self, item_id: i64, patch: &ItemPatch) -> Result<u64, StoreError> {
        let sql = "UPDATE items SET item_code = COALESCE($1, item_code), description = COALESCE($2, description), quantity = COALESCE($3, quantity) WHERE item_id = $4";
        tracing::debug!(sql = %sql, item_id, "query");
        let result = sqlx::query(sql)
            .bind(patch.item_code.as_deref())
            .bind(patch.description.as_deref())
            .bind(patch.quantity.map(i64::from))
            .bind(item_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_order(&self, id: i64) -> Result<u64, StoreError> {
        tracing::debug!(id, "delete order (tx)");
        let mut tx = self.pool.begin().await?;
        let items = sqlx::query("DELETE FROM items WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let orders = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;
        tracing::debug!(id, items, orders, "order deleted");
        Ok(orders)
    }

    async fn items_for_order(&self, order_id: i64) -> Result<Vec<Item>, StoreError> {
        let sql = format!(
            "SELECT {} FROM items WHERE order_id = $1 ORDER BY item_id",
            ITEM_COLUMNS
        );
        tracing::debug!(sql = %sql, order_id, "query");
        let items: Vec<Item> = sqlx::query_as(&sql)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }
}
