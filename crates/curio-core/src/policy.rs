//! Owner-based access control for items.
//!
//! A requester may act on an item when they own it or are a superuser. The
//! policy is pure; callers fetch the item first so a missing item surfaces as
//! not-found before any permission decision is made.

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{ItemFilter, Requester};

/// Message returned to callers denied by the policy
pub const PERMISSION_DENIED: &str = "Not enough permissions";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessAction {
    Read,
    Write,
    Delete,
}

impl AccessAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessAction::Read => "read",
            AccessAction::Write => "write",
            AccessAction::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy;

impl AccessPolicy {
    pub fn new() -> Self {
        Self
    }

    fn is_owner_or_superuser(requester: &Requester, owner_id: Uuid) -> bool {
        requester.is_superuser || requester.id == owner_id
    }

    pub fn can_read(&self, requester: &Requester, owner_id: Uuid) -> bool {
        Self::is_owner_or_superuser(requester, owner_id)
    }

    pub fn can_write(&self, requester: &Requester, owner_id: Uuid) -> bool {
        Self::is_owner_or_superuser(requester, owner_id)
    }

    pub fn can_delete(&self, requester: &Requester, owner_id: Uuid) -> bool {
        Self::is_owner_or_superuser(requester, owner_id)
    }

    /// Filter for listing: superusers see everything, everyone else only their own items.
    pub fn list_scope(&self, requester: &Requester) -> ItemFilter {
        if requester.is_superuser {
            ItemFilter { owner_id: None }
        } else {
            ItemFilter {
                owner_id: Some(requester.id),
            }
        }
    }

    /// Check `action` and turn a denial into `AppError::Forbidden`.
    pub fn authorize(
        &self,
        requester: &Requester,
        owner_id: Uuid,
        action: AccessAction,
    ) -> Result<(), AppError> {
        let allowed = match action {
            AccessAction::Read => self.can_read(requester, owner_id),
            AccessAction::Write => self.can_write(requester, owner_id),
            AccessAction::Delete => self.can_delete(requester, owner_id),
        };

        if allowed {
            Ok(())
        } else {
            Err(AppError::Forbidden(PERMISSION_DENIED.to_string()))
        }
    }
}
