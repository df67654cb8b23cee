//! Data models for the application
//!
//! Items, the media values projected onto them, and the per-request identity.

mod item;
mod media;
mod user;

pub use item::*;
pub use media::*;
pub use user::*;
