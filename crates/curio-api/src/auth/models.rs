use crate::error::HttpAppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use curio_core::models::Requester;
use curio_core::AppError;

/// Authenticated requester, placed in request extensions by `auth_middleware`.
///
/// Extracted from parts rather than via `Extension` so it composes with
/// `Multipart` bodies.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Requester);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Requester>()
            .copied()
            .map(CurrentUser)
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized(
                    "Missing requester context".to_string(),
                ))
            })
    }
}
