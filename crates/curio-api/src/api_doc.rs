//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use curio_core::models;

/// Registers the bearer JWT scheme referenced by every item route
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Curio API",
        version = "0.1.0",
        description = "Items with owner-based access control and an attached image or video. All item endpoints are versioned under /api/v1/ and require a bearer token."
    ),
    paths(
        handlers::items::list_items,
        handlers::items::get_item,
        handlers::items::create_item,
        handlers::items::update_item,
        handlers::items::delete_item,
        handlers::items::upload_media,
        handlers::items::add_item_media,
        handlers::items::remove_item_media,
    ),
    components(
        schemas(
            models::Item,
            models::ItemCreate,
            models::ItemUpdate,
            models::ItemsPublic,
            models::ItemMediaType,
            models::Message,
            models::UploadResult,
            handlers::items::ListQuery,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "items", description = "Item management and media attachment")
    )
)]
pub struct ApiDoc;
