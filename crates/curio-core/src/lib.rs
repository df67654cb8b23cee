//! Curio Core Library
//!
//! This crate provides the domain models, error types, configuration and the
//! access policy shared by every Curio component.

pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, CloudCredentials, Config, ItemStoreKind, MediaSettings};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use policy::{AccessAction, AccessPolicy};
pub use storage_types::MediaBackendKind;
