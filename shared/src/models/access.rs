//! Authorization context and named access rules
//!
//! Accounts created before roles were introduced carry only a legacy role
//! string. Accounts with a resolvable `role_id` carry a permission set. An
//! [`AuthContext`] is resolved once per request and every screen checks a
//! named [`AccessRule`], so the legacy fallback for a logical permission is
//! defined in exactly one place.

use serde::{Deserialize, Serialize};

use super::permission::{actions, has_permission, resources, PermissionCheck};
use super::role::system_roles;

/// Legacy role strings granted administrative access
pub const PRIVILEGED_LEGACY_ROLES: &[&str] = &[
    system_roles::SEMUA,
    "Super Admin",
    system_roles::ADMIN,
];

/// How a user's access is decided. Exactly one path is active per check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AuthContext {
    /// No resolvable role permissions; decide by the legacy role string
    LegacyRole(String),
    /// Permissions joined through the user's role
    ResolvedPermissions(Vec<PermissionCheck>),
}

impl AuthContext {
    /// Pick the authorization path for a user.
    ///
    /// A non-empty resolved permission set is authoritative. Otherwise the
    /// legacy role string is used (an absent role resolves to an empty string,
    /// which no allow-list contains).
    pub fn resolve(legacy_role: Option<&str>, permissions: Vec<PermissionCheck>) -> Self {
        if permissions.is_empty() {
            AuthContext::LegacyRole(legacy_role.unwrap_or_default().to_string())
        } else {
            AuthContext::ResolvedPermissions(permissions)
        }
    }

    pub fn allows(&self, rule: &AccessRule) -> bool {
        match self {
            AuthContext::ResolvedPermissions(permissions) => {
                has_permission(permissions, &rule.check())
            }
            AuthContext::LegacyRole(role) => rule.legacy_roles.contains(&role.as_str()),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, AuthContext::LegacyRole(_))
    }
}

/// A logical permission together with the legacy roles that imply it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRule {
    pub resource: &'static str,
    pub action: &'static str,
    pub legacy_roles: &'static [&'static str],
}

impl AccessRule {
    pub fn check(&self) -> PermissionCheck {
        PermissionCheck::new(self.resource, self.action)
    }
}

/// Access rules used by the API surfaces
pub mod rules {
    use super::*;

    const ADMINS: &[&str] = PRIVILEGED_LEGACY_ROLES;
    const SURAT_EDITORS: &[&str] = &[
        system_roles::SEMUA,
        "Super Admin",
        system_roles::ADMIN,
        system_roles::PERLADANGAN,
    ];
    const BAYARAN_EDITORS: &[&str] = &[
        system_roles::SEMUA,
        "Super Admin",
        system_roles::ADMIN,
        system_roles::KEWANGAN,
    ];
    const STAFF: &[&str] = &[
        system_roles::SEMUA,
        "Super Admin",
        system_roles::ADMIN,
        system_roles::PERLADANGAN,
        system_roles::KEWANGAN,
        system_roles::PENGGUNA,
    ];

    const fn rule(
        resource: &'static str,
        action: &'static str,
        legacy_roles: &'static [&'static str],
    ) -> AccessRule {
        AccessRule {
            resource,
            action,
            legacy_roles,
        }
    }

    pub const VIEW_SURAT: AccessRule = rule(resources::SURAT, actions::VIEW, STAFF);
    pub const CREATE_SURAT: AccessRule = rule(resources::SURAT, actions::CREATE, SURAT_EDITORS);
    pub const EDIT_SURAT: AccessRule = rule(resources::SURAT, actions::EDIT, SURAT_EDITORS);
    pub const DELETE_SURAT: AccessRule = rule(resources::SURAT, actions::DELETE, ADMINS);
    pub const EXPORT_SURAT: AccessRule = rule(resources::SURAT, actions::EXPORT, SURAT_EDITORS);

    pub const VIEW_BAYARAN: AccessRule = rule(resources::BAYARAN, actions::VIEW, STAFF);
    pub const CREATE_BAYARAN: AccessRule =
        rule(resources::BAYARAN, actions::CREATE, BAYARAN_EDITORS);
    pub const EDIT_BAYARAN: AccessRule = rule(resources::BAYARAN, actions::EDIT, BAYARAN_EDITORS);
    pub const DELETE_BAYARAN: AccessRule = rule(resources::BAYARAN, actions::DELETE, ADMINS);
    pub const EXPORT_BAYARAN: AccessRule =
        rule(resources::BAYARAN, actions::EXPORT, BAYARAN_EDITORS);

    pub const VIEW_FAIL: AccessRule = rule(resources::FAIL, actions::VIEW, STAFF);
    pub const CREATE_FAIL: AccessRule = rule(resources::FAIL, actions::CREATE, SURAT_EDITORS);
    pub const EDIT_FAIL: AccessRule = rule(resources::FAIL, actions::EDIT, SURAT_EDITORS);
    pub const DELETE_FAIL: AccessRule = rule(resources::FAIL, actions::DELETE, ADMINS);

    pub const VIEW_USERS: AccessRule = rule(resources::PENGGUNA, actions::VIEW, ADMINS);
    pub const CREATE_USERS: AccessRule = rule(resources::PENGGUNA, actions::CREATE, ADMINS);
    pub const MANAGE_ROLES: AccessRule = rule(resources::PENGGUNA, actions::MANAGE_ROLES, ADMINS);

    pub const VIEW_REPORTS: AccessRule = rule(resources::LAPORAN, actions::VIEW, STAFF);
    pub const SHARE_REPORT: AccessRule = rule(resources::LAPORAN, actions::SHARE, ADMINS);

    pub const ALL: &[AccessRule] = &[
        VIEW_SURAT,
        CREATE_SURAT,
        EDIT_SURAT,
        DELETE_SURAT,
        EXPORT_SURAT,
        VIEW_BAYARAN,
        CREATE_BAYARAN,
        EDIT_BAYARAN,
        DELETE_BAYARAN,
        EXPORT_BAYARAN,
        VIEW_FAIL,
        CREATE_FAIL,
        EDIT_FAIL,
        DELETE_FAIL,
        VIEW_USERS,
        CREATE_USERS,
        MANAGE_ROLES,
        VIEW_REPORTS,
        SHARE_REPORT,
    ];

    /// Look up the rule guarding `resource:action`
    pub fn find(resource: &str, action: &str) -> Option<AccessRule> {
        ALL.iter()
            .find(|r| r.resource == resource && r.action == action)
            .copied()
    }
}
