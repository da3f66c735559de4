//! In-process repository. All tables live behind one lock, so every operation is atomic.

use super::Repository;
use crate::error::StoreError;
use crate::model::{Item, ItemPatch, NewOrder, NewUser, Order, OrderPatch, User, UserPatch};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    /// Orders are stored without items; `items` is the source of truth for those.
    orders: BTreeMap<i64, Order>,
    items: BTreeMap<i64, Item>,
    last_user_id: i64,
    last_order_id: i64,
    last_item_id: i64,
}

impl Tables {
    fn items_of(&self, order_id: i64) -> Vec<Item> {
        self.items
            .values()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect()
    }

    fn with_items(&self, order: &Order) -> Order {
        let mut order = order.clone();
        order.items = self.items_of(order.order_id);
        order
    }
}

/// Ids start at 1 and are never reused, like a `BIGSERIAL` column.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables.write().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn ping(&self) -> Result<(), StoreError> {
        self.read().map(|_| ())
    }

    async fn list_users(&self, email: Option<&str>) -> Result<Vec<User>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .users
            .values()
            .filter(|u| email.map_or(true, |needle| u.email.contains(needle)))
            .cloned()
            .collect())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError> {
        let mut tables = self.write()?;
        tables.last_user_id += 1;
        let created = User {
            id: tables.last_user_id,
            username: user.username.clone(),
            email: user.email.clone(),
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn update_user(&self, id: i64, patch: &UserPatch) -> Result<u64, StoreError> {
        let mut tables = self.write()?;
        match tables.users.get_mut(&id) {
            Some(user) => {
                patch.apply(user);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_user(&self, id: i64) -> Result<u64, StoreError> {
        Ok(self.write()?.users.remove(&id).map_or(0, |_| 1))
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        let tables = self.read()?;
        let mut by_order: HashMap<i64, Vec<Item>> = HashMap::new();
        for item in tables.items.values() {
            by_order.entry(item.order_id).or_default().push(item.clone());
        }
        Ok(tables
            .orders
            .values()
            .map(|o| {
                let mut order = o.clone();
                order.items = by_order.remove(&o.order_id).unwrap_or_default();
                order
            })
            .collect())
    }

    async fn create_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        let mut tables = self.write()?;
        tables.last_order_id += 1;
        let order_id = tables.last_order_id;
        let mut created = Order {
            order_id,
            customer_name: order.customer_name.clone(),
            ordered_at: order.ordered_at.unwrap_or_else(Utc::now),
            items: Vec::new(),
        };
        tables.orders.insert(order_id, created.clone());
        for item in &order.items {
            tables.last_item_id += 1;
            let row = Item {
                item_id: tables.last_item_id,
                item_code: item.item_code.clone(),
                description: item.description.clone(),
                quantity: i64::from(item.quantity),
                order_id,
            };
            tables.items.insert(row.item_id, row.clone());
            created.items.push(row);
        }
        Ok(created)
    }

    async fn get_order(&self, id: i64) -> Result<Option<Order>, StoreError> {
        let tables = self.read()?;
        Ok(tables.orders.get(&id).map(|o| tables.with_items(o)))
    }

    async fn update_order(&self, id: i64, patch: &OrderPatch) -> Result<u64, StoreError> {
        let mut tables = self.write()?;
        match tables.orders.get_mut(&id) {
            Some(order) => {
                patch.apply(order);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn update_item(&self, item_id: i64, patch: &ItemPatch) -> Result<u64, StoreError> {
        let mut tables = self.write()?;
        match tables.items.get_mut(&item_id) {
            Some(item) => {
                patch.apply(item);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_order(&self, id: i64) -> Result<u64, StoreError> {
        let mut tables = self.write()?;
        tables.items.retain(|_, item| item.order_id != id);
        Ok(tables.orders.remove(&id).map_or(0, |_| 1))
    }

    async fn items_for_order(&self, order_id: i64) -> Result<Vec<Item>, StoreError> {
        Ok(self.read()?.items_of(order_id))
    }
}
