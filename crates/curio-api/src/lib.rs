//! Curio API Library
//!
//! This crate provides the HTTP handlers, authentication, item services and
//! application setup.

mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
mod utils;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::{ItemMediaCoordinator, ItemService};
pub use state::AppState;
