//! Curio Storage Library
//!
//! This crate provides the media backend abstraction and its implementations:
//! a Cloudinary-compatible hosted backend and a local filesystem backend.
//!
//! # Key format
//!
//! Uploaded files are stored as `{folder}/{uuid}{extension}`. Folders must not
//! contain `..` segments; leading and trailing `/` are stripped. Key
//! generation is centralized in the `keys` module so both backends agree.

#[cfg(feature = "backend-cloud")]
pub mod cloud;
pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "backend-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "backend-cloud")]
pub use cloud::CloudMediaBackend;
pub use curio_core::MediaBackendKind;
pub use factory::create_media_backend;
#[cfg(feature = "backend-local")]
pub use local::LocalMediaBackend;
pub use traits::{MediaBackend, StorageError, StorageResult};
