//! Item lifecycle and media handling, kept free of HTTP types so they can be
//! unit tested directly.

pub mod items;
pub mod media_coordinator;

pub use items::ItemService;
pub use media_coordinator::ItemMediaCoordinator;
