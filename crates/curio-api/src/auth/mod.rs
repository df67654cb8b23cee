pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::{generate_access_token, validate_token, Claims, JwtConfig};
pub use middleware::{auth_middleware, AuthState};
pub use models::CurrentUser;
