//! Resource types and their request payloads.

mod order;
mod user;

pub use order::{Item, ItemPatch, NewItem, NewOrder, Order, OrderPatch};
pub use user::{NewUser, User, UserPatch};
