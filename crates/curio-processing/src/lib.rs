//! Upload inspection for Curio
//!
//! Content sniffing from leading bytes and the size/type validator applied to
//! every upload before it reaches a media backend.

pub mod sniff;
pub mod validator;

pub use sniff::{detect_mime, SNIFF_LEN};
pub use validator::{MediaValidator, ValidatedMedia, ValidationError, ALLOWED_CONTENT_TYPES};
