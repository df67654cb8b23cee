//! API constants.
//!
//! Every item route is mounted under [`API_PREFIX`]. Handler path annotations
//! repeat the literal because utoipa needs compile-time strings.

/// API base path prefix (version-independent)
pub const API_BASE: &str = "/api";

/// Current API version segment
pub const API_VERSION: &str = "v1";

/// Versioned prefix for item routes
pub const API_PREFIX: &str = "/api/v1";
