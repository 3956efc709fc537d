//! User models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::access::AuthContext;
use super::permission::PermissionCheck;
use crate::types::Language;

/// A user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// Legacy role name, used only when `role_id` does not resolve
    pub role: String,
    pub role_id: Option<Uuid>,
    pub preferred_language: Language,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// The authorization-relevant view of a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserAccess {
    pub user_id: Uuid,
    pub role: String,
    pub role_id: Option<Uuid>,
    /// Permissions joined through `role_id`; empty when unset or unresolvable
    pub permissions: Vec<PermissionCheck>,
}

impl UserAccess {
    pub fn auth_context(&self) -> AuthContext {
        AuthContext::resolve(Some(&self.role), self.permissions.clone())
    }
}
