use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: i64,
    pub customer_name: String,
    pub ordered_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub items: Vec<Item>,
}

/// One line item of an order. `order_id` is the back-reference and never leaves the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "lineItemId")]
    pub item_id: i64,
    pub item_code: String,
    pub description: String,
    pub quantity: i64,
    #[serde(skip)]
    pub order_id: i64,
}

/// Body of `POST /orders`. `orderedAt` defaults to the time of creation.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub ordered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<NewItem>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    #[serde(default)]
    pub item_code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: u32,
}

/// Body of `PUT /orders/:id`: scalar order fields plus item patches keyed by `lineItemId`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub ordered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<ItemPatch>,
}

impl OrderPatch {
    pub fn apply(&self, order: &mut Order) {
        if let Some(name) = &self.customer_name {
            order.customer_name = name.clone();
        }
        if let Some(at) = self.ordered_at {
            order.ordered_at = at;
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default)]
    pub line_item_id: Option<i64>,
    #[serde(default)]
    pub item_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl ItemPatch {
    pub fn apply(&self, item: &mut Item) {
        if let Some(code) = &self.item_code {
            item.item_code = code.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(quantity) = self.quantity {
            item.quantity = i64::from(quantity);
        }
    }
}
