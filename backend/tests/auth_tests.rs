//! Authentication and authorization tests
//!
//! Property-based and unit tests for:
//! - Property 1: Permission exactness
//! - Property 2: Authorization path selection (permissions vs legacy role)
//! - Role mutation rules and input validation

use proptest::prelude::*;
use shared::{
    actions, default_roles, has_permission, resources, rules, system_roles, validate_email,
    validate_password, validate_role_name, AccessRule, AuthContext, PermissionCheck, Role,
    RoleUpdate, PRIVILEGED_LEGACY_ROLES,
};
use uuid::Uuid;

// ============================================================================
// Property Test Strategies
// ============================================================================

fn resource_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(resources::SURAT.to_string()),
        Just(resources::BAYARAN.to_string()),
        Just(resources::FAIL.to_string()),
        Just(resources::PENGGUNA.to_string()),
        Just(resources::LAPORAN.to_string()),
    ]
}

fn action_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(actions::VIEW.to_string()),
        Just(actions::CREATE.to_string()),
        Just(actions::EDIT.to_string()),
        Just(actions::DELETE.to_string()),
        Just(actions::EXPORT.to_string()),
        Just(actions::SHARE.to_string()),
        Just(actions::MANAGE_ROLES.to_string()),
    ]
}

fn check_strategy() -> impl Strategy<Value = PermissionCheck> {
    (resource_strategy(), action_strategy()).prop_map(|(r, a)| PermissionCheck::new(r, a))
}

fn permission_set_strategy() -> impl Strategy<Value = Vec<PermissionCheck>> {
    prop::collection::vec(check_strategy(), 0..12)
}

/// Legacy role strings, including ones no rule mentions
fn legacy_role_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(system_roles::SEMUA.to_string()),
        Just("Super Admin".to_string()),
        Just(system_roles::ADMIN.to_string()),
        Just(system_roles::PERLADANGAN.to_string()),
        Just(system_roles::KEWANGAN.to_string()),
        Just(system_roles::PENGGUNA.to_string()),
        "[a-z]{3,10}",
    ]
}

fn all_rules() -> Vec<AccessRule> {
    rules::ALL.to_vec()
}

fn system_role(name: &str) -> Role {
    Role {
        id: Uuid::new_v4(),
        name: name.to_string(),
        display_name: name.to_string(),
        description: None,
        is_system_role: true,
        permissions: Vec::new(),
    }
}

// ============================================================================
// Property 1: Permission exactness
// ============================================================================

proptest! {
    /// `has_permission` is true iff an exact (resource, action) pair is present
    #[test]
    fn test_permission_exactness(
        permissions in permission_set_strategy(),
        check in check_strategy(),
    ) {
        let expected = permissions
            .iter()
            .any(|p| p.resource == check.resource && p.action == check.action);
        prop_assert_eq!(has_permission(&permissions, &check), expected);
    }

    /// Case or prefix variants of a granted pair never match
    #[test]
    fn test_no_fuzzy_matching(check in check_strategy()) {
        let granted = vec![check.clone()];
        let upper = PermissionCheck::new(check.resource.to_uppercase(), check.action.clone());
        let prefix = PermissionCheck::new(check.resource.clone(), format!("{}_all", check.action));

        prop_assert!(has_permission(&granted, &check));
        prop_assert!(!has_permission(&granted, &upper));
        prop_assert!(!has_permission(&granted, &prefix));
    }

    /// `resource:action` strings parse back to the same pair
    #[test]
    fn test_permission_string_form(check in check_strategy()) {
        let parsed: PermissionCheck = check.to_string().parse().unwrap();
        prop_assert_eq!(parsed, check);
    }
}

#[test]
fn test_view_does_not_imply_edit() {
    let permissions = vec![PermissionCheck::new("bayaran", "view")];
    assert!(has_permission(&permissions, &PermissionCheck::new("bayaran", "view")));
    assert!(!has_permission(&permissions, &PermissionCheck::new("bayaran", "edit")));
}

#[test]
fn test_empty_permission_set_denies_everything() {
    let permissions: Vec<PermissionCheck> = Vec::new();
    for rule in all_rules() {
        assert!(!has_permission(&permissions, &rule.check()));
    }
}

#[test]
fn test_malformed_permission_strings() {
    for bad in ["", "surat", ":view", "surat:", "surat:view:extra"] {
        assert!(bad.parse::<PermissionCheck>().is_err(), "{bad:?} should not parse");
    }
}

// ============================================================================
// Property 2: Authorization path selection
// ============================================================================

proptest! {
    /// With a non-empty permission set the legacy role has no influence
    #[test]
    fn test_permissions_are_authoritative(
        permissions in prop::collection::vec(check_strategy(), 1..12),
        role in legacy_role_strategy(),
    ) {
        let with_role = AuthContext::resolve(Some(&role), permissions.clone());
        let without_role = AuthContext::resolve(None, permissions.clone());

        prop_assert!(!with_role.is_legacy());
        for rule in all_rules() {
            let expected = has_permission(&permissions, &rule.check());
            prop_assert_eq!(with_role.allows(&rule), expected);
            prop_assert_eq!(without_role.allows(&rule), expected);
        }
    }

    /// Without permissions the decision comes from the rule's legacy roles
    #[test]
    fn test_legacy_fallback(role in legacy_role_strategy()) {
        let context = AuthContext::resolve(Some(&role), Vec::new());

        prop_assert!(context.is_legacy());
        for rule in all_rules() {
            prop_assert_eq!(
                context.allows(&rule),
                rule.legacy_roles.contains(&role.as_str())
            );
        }
    }
}

#[test]
fn test_privileged_legacy_roles_pass_every_rule() {
    for role in PRIVILEGED_LEGACY_ROLES {
        let context = AuthContext::resolve(Some(role), Vec::new());
        for rule in all_rules() {
            assert!(context.allows(&rule), "{role} should pass {rule:?}");
        }
    }
}

#[test]
fn test_rule_lookup() {
    assert_eq!(rules::find("bayaran", "edit"), Some(rules::EDIT_BAYARAN));
    assert_eq!(rules::find("bayaran", "approve"), None);
    for rule in rules::ALL {
        assert_eq!(rules::find(rule.resource, rule.action), Some(*rule));
    }
}

#[test]
fn test_legacy_finance_role() {
    let context = AuthContext::resolve(Some(system_roles::KEWANGAN), Vec::new());
    assert!(context.allows(&rules::EDIT_BAYARAN));
    assert!(context.allows(&rules::VIEW_SURAT));
    assert!(!context.allows(&rules::EDIT_SURAT));
    assert!(!context.allows(&rules::MANAGE_ROLES));
}

#[test]
fn test_absent_role_without_permissions_denies() {
    let context = AuthContext::resolve(None, Vec::new());
    assert_eq!(context, AuthContext::LegacyRole(String::new()));
    assert!(all_rules().iter().all(|rule| !context.allows(rule)));
}

#[test]
fn test_seeded_roles_cover_legacy_grants() {
    // Migrating a legacy account to its seeded role never loses access
    for (name, _, permissions) in default_roles() {
        let resolved = AuthContext::resolve(Some(name), permissions);
        let legacy = AuthContext::resolve(Some(name), Vec::new());
        for rule in all_rules() {
            if legacy.allows(&rule) {
                assert!(resolved.allows(&rule), "{name} loses {rule:?}");
            }
        }
    }
}

// ============================================================================
// Role mutation rules
// ============================================================================

#[test]
fn test_system_roles_are_protected() {
    for name in system_roles::ALL {
        let role = system_role(name);
        assert!(!role.is_deletable());
        assert!(!role.permissions_editable());
    }

    let custom = Role {
        is_system_role: false,
        ..system_role("penyemak")
    };
    assert!(custom.is_deletable());
    assert!(custom.permissions_editable());
}

#[test]
fn test_empty_role_update_is_noop() {
    let mut role = system_role("penyemak");
    let before = role.clone();

    assert!(RoleUpdate::default().is_empty());
    assert!(!RoleUpdate::default().apply(&mut role));
    assert_eq!(role.display_name, before.display_name);
    assert_eq!(role.description, before.description);
}

#[test]
fn test_role_update_reports_changes() {
    let mut role = system_role("penyemak");
    let update = RoleUpdate {
        display_name: Some("Penyemak Dokumen".to_string()),
        description: None,
    };
    assert!(update.apply(&mut role));
    assert_eq!(role.display_name, "Penyemak Dokumen");
    assert_eq!(role.name, "penyemak");

    // Applying the same values again changes nothing
    assert!(!update.apply(&mut role));
}

// ============================================================================
// Input validation
// ============================================================================

proptest! {
    #[test]
    fn test_valid_role_names_accepted(name in "[a-z][a-z0-9_]{1,40}") {
        prop_assert!(validate_role_name(&name).is_ok());
    }

    #[test]
    fn test_role_names_with_spaces_rejected(a in "[a-z]{2,10}", b in "[a-z]{2,10}") {
        let name = format!("{} {}", a, b);
        prop_assert!(validate_role_name(&name).is_err());
    }

    #[test]
    fn test_valid_emails_accepted(email in "[a-z]{5,10}@[a-z]{3,8}\\.(com|my|gov\\.my)") {
        prop_assert!(validate_email(&email).is_ok());
    }

    #[test]
    fn test_short_passwords_rejected(password in "[a-zA-Z0-9]{0,7}") {
        prop_assert!(validate_password(&password).is_err());
    }
}

#[test]
fn test_role_name_length_bounds() {
    assert!(validate_role_name("a").is_err());
    assert!(validate_role_name("ab").is_ok());
    assert!(validate_role_name(&"a".repeat(50)).is_ok());
    assert!(validate_role_name(&"a".repeat(51)).is_err());
}
