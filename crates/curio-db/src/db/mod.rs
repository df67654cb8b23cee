//! Database repositories for data access layer
//!
//! Items are the only persisted entity. `ItemRepository` is the PostgreSQL
//! implementation; `InMemoryItemStore` backs tests and local development.

pub mod item;
pub mod memory;

pub use item::{create_item_store, ItemRepository, ItemStore};
pub use memory::InMemoryItemStore;
