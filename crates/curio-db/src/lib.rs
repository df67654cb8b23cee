//! Curio persistence layer
//!
//! The `ItemStore` trait and its PostgreSQL and in-memory implementations.

pub mod db;

pub use db::{create_item_store, InMemoryItemStore, ItemRepository, ItemStore};
