use crate::auth::jwt::{validate_token, JwtConfig};
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use curio_core::AppError;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtConfig,
}

impl AuthState {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt: JwtConfig::new(jwt_secret),
        }
    }
}

/// Resolve the bearer token into a `Requester` stored in request extensions.
///
/// Any missing or invalid token ends the request with 401 before a handler runs.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            tracing::debug!("Missing authorization header");
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        tracing::debug!("Invalid authorization header format");
        return HttpAppError(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    };

    match validate_token(token.trim(), &auth_state.jwt) {
        Ok(claims) => {
            let requester = claims.requester();
            tracing::debug!(
                user_id = %requester.id,
                is_superuser = requester.is_superuser,
                "Request authenticated"
            );
            request.extensions_mut().insert(requester);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Token validation failed");
            HttpAppError(AppError::Unauthorized(
                "Could not validate credentials".to_string(),
            ))
            .into_response()
        }
    }
}
