use crate::auth::models::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::items::{DEFAULT_LIMIT, DEFAULT_SKIP};
use crate::state::AppState;
use crate::utils::upload::read_upload_file;
use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use curio_core::models::{Item, ItemCreate, ItemUpdate, ItemsPublic, Message, UploadResult};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ListQuery {
    #[serde(default = "default_skip")]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_skip() -> i64 {
    DEFAULT_SKIP
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

#[utoipa::path(
    get,
    path = "/api/v1/items",
    tag = "items",
    params(ListQuery),
    responses(
        (status = 200, description = "Items visible to the caller", body = ItemsPublic),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %requester.id, operation = "list_items"))]
pub async fn list_items(
    CurrentUser(requester): CurrentUser,
    Query(query): Query<ListQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ItemsPublic>, HttpAppError> {
    let page = state
        .items
        .list(&requester, query.skip, query.limit)
        .await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    tag = "items",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item found", body = Item),
        (status = 403, description = "Not enough permissions", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %requester.id, item_id = %id, operation = "get_item"))]
pub async fn get_item(
    CurrentUser(requester): CurrentUser,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Item>, HttpAppError> {
    Ok(Json(state.items.get(&requester, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/items",
    tag = "items",
    request_body = ItemCreate,
    responses(
        (status = 200, description = "Item created", body = Item),
        (status = 400, description = "Invalid item", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, input), fields(user_id = %requester.id, operation = "create_item"))]
pub async fn create_item(
    CurrentUser(requester): CurrentUser,
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<ItemCreate>,
) -> Result<Json<Item>, HttpAppError> {
    Ok(Json(state.items.create(&requester, input).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/items/{id}",
    tag = "items",
    params(("id" = Uuid, Path, description = "Item ID")),
    request_body = ItemUpdate,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 400, description = "Invalid item", body = ErrorResponse),
        (status = 403, description = "Not enough permissions", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, patch), fields(user_id = %requester.id, item_id = %id, operation = "update_item"))]
pub async fn update_item(
    CurrentUser(requester): CurrentUser,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    ValidatedJson(patch): ValidatedJson<ItemUpdate>,
) -> Result<Json<Item>, HttpAppError> {
    Ok(Json(state.items.update(&requester, id, patch).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    tag = "items",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item deleted", body = Message),
        (status = 403, description = "Not enough permissions", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %requester.id, item_id = %id, operation = "delete_item"))]
pub async fn delete_item(
    CurrentUser(requester): CurrentUser,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Message>, HttpAppError> {
    Ok(Json(state.items.delete(&requester, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/items/upload-media",
    tag = "items",
    request_body(content_type = "multipart/form-data", description = "Single `file` field"),
    responses(
        (status = 200, description = "Media uploaded", body = UploadResult),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Unsupported media type", body = ErrorResponse),
        (status = 502, description = "Media backend failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = %requester.id, operation = "upload_media"))]
pub async fn upload_media(
    CurrentUser(requester): CurrentUser,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResult>, HttpAppError> {
    let file = read_upload_file(multipart, state.media.max_size_bytes()).await?;
    Ok(Json(state.items.upload_media(&requester, file).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/items/{id}/media",
    tag = "items",
    params(("id" = Uuid, Path, description = "Item ID")),
    request_body(content_type = "multipart/form-data", description = "Single `file` field"),
    responses(
        (status = 200, description = "Media attached", body = Item),
        (status = 403, description = "Not enough permissions", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Unsupported media type", body = ErrorResponse),
        (status = 502, description = "Media backend failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = %requester.id, item_id = %id, operation = "add_item_media"))]
pub async fn add_item_media(
    CurrentUser(requester): CurrentUser,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<Item>, HttpAppError> {
    let file = read_upload_file(multipart, state.media.max_size_bytes()).await?;
    Ok(Json(state.items.add_media(&requester, id, file).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}/media",
    tag = "items",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Media removed", body = Item),
        (status = 403, description = "Not enough permissions", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %requester.id, item_id = %id, operation = "remove_item_media"))]
pub async fn remove_item_media(
    CurrentUser(requester): CurrentUser,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Item>, HttpAppError> {
    Ok(Json(state.items.remove_media(&requester, id).await?))
}
