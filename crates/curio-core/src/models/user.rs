use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Identity of the caller for one request.
///
/// Supplied by the authentication layer; the core never looks users up itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Requester {
    pub id: Uuid,
    pub is_superuser: bool,
}

impl Requester {
    pub fn user(id: Uuid) -> Self {
        Self {
            id,
            is_superuser: false,
        }
    }

    pub fn superuser(id: Uuid) -> Self {
        Self {
            id,
            is_superuser: true,
        }
    }
}
