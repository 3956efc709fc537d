//! Role models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::permission::{actions, resources, Permission, PermissionCheck};

/// Machine names of the roles seeded at setup
pub mod system_roles {
    /// Full access ("Super Admin")
    pub const SEMUA: &str = "semua";
    pub const ADMIN: &str = "admin";
    pub const PERLADANGAN: &str = "PERLADANGAN";
    pub const KEWANGAN: &str = "KEWANGAN";
    pub const PENGGUNA: &str = "pengguna";

    pub const ALL: &[&str] = &[SEMUA, ADMIN, PERLADANGAN, KEWANGAN, PENGGUNA];
}

/// A named bundle of permissions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Role {
    pub id: Uuid,
    /// Machine identifier, unique and immutable after creation
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub is_system_role: bool,
    #[serde(default)]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub permissions: Vec<Permission>,
}

/// Join row between a role and a permission
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RolePermission {
    pub role_id: Uuid,
    pub permission_id: Uuid,
}

/// Mutable attributes of a role. The machine name is never part of an update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleUpdate {
    pub display_name: Option<String>,
    pub description: Option<String>,
}

impl RoleUpdate {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.description.is_none()
    }

    /// Apply the update, returning whether anything changed
    pub fn apply(&self, role: &mut Role) -> bool {
        let mut changed = false;
        if let Some(display_name) = &self.display_name {
            if *display_name != role.display_name {
                role.display_name = display_name.clone();
                changed = true;
            }
        }
        if let Some(description) = &self.description {
            if role.description.as_ref() != Some(description) {
                role.description = Some(description.clone());
                changed = true;
            }
        }
        changed
    }
}

impl Role {
    /// System roles can never be deleted
    pub fn is_deletable(&self) -> bool {
        !self.is_system_role
    }

    /// Only custom roles allow editing the permission set
    pub fn permissions_editable(&self) -> bool {
        !self.is_system_role
    }
}

/// Default permission bundles for the seeded system roles
pub fn default_roles() -> Vec<(&'static str, &'static str, Vec<PermissionCheck>)> {
    use actions::*;
    use resources::*;

    let all_actions = |resource: &str, acts: &[&str]| -> Vec<PermissionCheck> {
        acts.iter()
            .map(|a| PermissionCheck::new(resource, *a))
            .collect()
    };

    let full_access: Vec<PermissionCheck> = [
        all_actions(SURAT, &[VIEW, CREATE, EDIT, DELETE, EXPORT]),
        all_actions(BAYARAN, &[VIEW, CREATE, EDIT, DELETE, EXPORT]),
        all_actions(FAIL, &[VIEW, CREATE, EDIT, DELETE]),
        all_actions(PENGGUNA, &[VIEW, CREATE, MANAGE_ROLES]),
        all_actions(LAPORAN, &[VIEW, SHARE]),
    ]
    .concat();

    vec![
        (system_roles::SEMUA, "Super Admin", full_access.clone()),
        (system_roles::ADMIN, "Pentadbir", full_access),
        (
            system_roles::PERLADANGAN,
            "Perladangan",
            [
                all_actions(SURAT, &[VIEW, CREATE, EDIT, DELETE, EXPORT]),
                all_actions(FAIL, &[VIEW, CREATE, EDIT, DELETE]),
                all_actions(BAYARAN, &[VIEW]),
                all_actions(LAPORAN, &[VIEW]),
            ]
            .concat(),
        ),
        (
            system_roles::KEWANGAN,
            "Kewangan",
            [
                all_actions(BAYARAN, &[VIEW, CREATE, EDIT, DELETE, EXPORT]),
                all_actions(SURAT, &[VIEW]),
                all_actions(FAIL, &[VIEW]),
                all_actions(LAPORAN, &[VIEW, SHARE]),
            ]
            .concat(),
        ),
        (
            system_roles::PENGGUNA,
            "Pengguna",
            [
                all_actions(SURAT, &[VIEW]),
                all_actions(BAYARAN, &[VIEW]),
                all_actions(FAIL, &[VIEW]),
                all_actions(LAPORAN, &[VIEW]),
            ]
            .concat(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::permission::has_permission;

    fn role(is_system_role: bool) -> Role {
        Role {
            id: Uuid::new_v4(),
            name: "kerani".to_string(),
            display_name: "Kerani".to_string(),
            description: None,
            is_system_role,
            permissions: Vec::new(),
        }
    }

    #[test]
    fn test_system_roles_not_deletable() {
        assert!(!role(true).is_deletable());
        assert!(role(false).is_deletable());
    }

    #[test]
    fn test_empty_update_is_noop() {
        let mut r = role(false);
        let before = r.clone();
        assert!(!RoleUpdate::default().apply(&mut r));
        assert_eq!(r.display_name, before.display_name);
        assert_eq!(r.name, before.name);
    }

    #[test]
    fn test_update_never_touches_name() {
        let mut r = role(true);
        let update = RoleUpdate {
            display_name: Some("Kerani Kanan".to_string()),
            description: Some("Urusan surat".to_string()),
        };
        assert!(update.apply(&mut r));
        assert_eq!(r.name, "kerani");
        assert_eq!(r.display_name, "Kerani Kanan");
        // Re-applying the same values is idempotent
        assert!(!update.apply(&mut r));
    }

    #[test]
    fn test_default_roles_cover_system_names() {
        let roles = default_roles();
        let names: Vec<&str> = roles.iter().map(|(n, _, _)| *n).collect();
        assert_eq!(names, system_roles::ALL);

        let (_, _, kewangan) = roles
            .iter()
            .find(|(n, _, _)| *n == system_roles::KEWANGAN)
            .unwrap();
        assert!(has_permission(kewangan, &PermissionCheck::new("bayaran", "edit")));
        assert!(!has_permission(kewangan, &PermissionCheck::new("surat", "edit")));
    }

    #[test]
    fn test_default_roles_have_unique_pairs() {
        for (name, _, perms) in default_roles() {
            let mut sorted = perms.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), perms.len(), "duplicate pair in {}", name);
        }
    }
}
