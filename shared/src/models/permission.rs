//! Permission models and the authorization predicate

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Protected resource categories
pub mod resources {
    pub const SURAT: &str = "surat";
    pub const BAYARAN: &str = "bayaran";
    pub const FAIL: &str = "fail";
    pub const PENGGUNA: &str = "pengguna";
    pub const LAPORAN: &str = "laporan";
}

/// Operations that can be granted on a resource
pub mod actions {
    pub const VIEW: &str = "view";
    pub const CREATE: &str = "create";
    pub const EDIT: &str = "edit";
    pub const DELETE: &str = "delete";
    pub const EXPORT: &str = "export";
    pub const SHARE: &str = "share";
    pub const MANAGE_ROLES: &str = "manage_roles";
}

/// A seeded permission. The `(resource, action)` pair is unique.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Permission {
    pub id: Uuid,
    pub resource: String,
    pub action: String,
    pub display_name: String,
    pub description: Option<String>,
}

/// A single `(resource, action)` pair to check or grant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PermissionCheck {
    pub resource: String,
    pub action: String,
}

impl PermissionCheck {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }
}

/// Anything that names a resource and an action
pub trait ResourceAction {
    fn resource(&self) -> &str;
    fn action(&self) -> &str;
}

impl ResourceAction for Permission {
    fn resource(&self) -> &str {
        &self.resource
    }

    fn action(&self) -> &str {
        &self.action
    }
}

impl ResourceAction for PermissionCheck {
    fn resource(&self) -> &str {
        &self.resource
    }

    fn action(&self) -> &str {
        &self.action
    }
}

impl From<&Permission> for PermissionCheck {
    fn from(permission: &Permission) -> Self {
        Self::new(permission.resource.clone(), permission.action.clone())
    }
}

/// Error parsing a `resource:action` string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PermissionParseError {
    #[error("permission must have the form resource:action, got {0:?}")]
    Malformed(String),
}

impl FromStr for PermissionCheck {
    type Err = PermissionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((resource, action))
                if !resource.is_empty() && !action.is_empty() && !action.contains(':') =>
            {
                Ok(Self::new(resource, action))
            }
            _ => Err(PermissionParseError::Malformed(s.to_string())),
        }
    }
}

impl fmt::Display for PermissionCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

/// Check whether a resolved permission set grants `check`.
///
/// Matches are exact on both resource and action. There is no wildcard or
/// hierarchy; an empty set denies everything.
pub fn has_permission<P: ResourceAction>(permissions: &[P], check: &PermissionCheck) -> bool {
    permissions
        .iter()
        .any(|p| p.resource() == check.resource && p.action() == check.action)
}
