//! Role management service for custom roles and permissions

use serde::Deserialize;
use shared::{validate_role_name, Permission, Role, RoleUpdate};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Role service for managing custom roles
#[derive(Clone)]
pub struct RoleService {
    db: PgPool,
}

/// Input for creating a custom role
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoleInput {
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Replacement permission set for a custom role
#[derive(Debug, Deserialize)]
pub struct UpdateRolePermissionsInput {
    pub permission_ids: Vec<Uuid>,
}

const ROLE_COLUMNS: &str = "id, name, display_name, description, is_system_role";

impl RoleService {
    /// Create a new RoleService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All roles, system roles first
    pub async fn get_roles(&self) -> AppResult<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(&format!(
            "SELECT {} FROM roles ORDER BY is_system_role DESC, name ASC",
            ROLE_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(roles)
    }

    /// Get a role by ID with its permissions
    pub async fn get_role_with_permissions(&self, role_id: Uuid) -> AppResult<Role> {
        let mut role = self.find_role(role_id).await?;

        role.permissions = sqlx::query_as::<_, Permission>(
            r#"
            SELECT p.id, p.resource, p.action, p.display_name, p.description
            FROM permissions p
            JOIN role_permissions rp ON rp.permission_id = p.id
            WHERE rp.role_id = $1
            ORDER BY p.resource, p.action
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.db)
        .await?;

        Ok(role)
    }

    /// Get all available permissions
    pub async fn get_all_permissions(&self) -> AppResult<Vec<Permission>> {
        let permissions = sqlx::query_as::<_, Permission>(
            r#"
            SELECT id, resource, action, display_name, description
            FROM permissions
            ORDER BY resource, action
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(permissions)
    }

    /// Create a custom role with no permissions
    pub async fn create_role(&self, input: CreateRoleInput) -> AppResult<Role> {
        input.validate()?;
        validate_role_name(&input.name).map_err(|msg| {
            AppError::validation("name", msg, "Nama peranan tidak sah")
        })?;

        // Check if role name already exists
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM roles WHERE LOWER(name) = LOWER($1)",
        )
        .bind(&input.name)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(duplicate_name());
        }

        let role = sqlx::query_as::<_, Role>(&format!(
            r#"
            INSERT INTO roles (name, display_name, description, is_system_role)
            VALUES ($1, $2, $3, false)
            RETURNING {}
            "#,
            ROLE_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.display_name)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match &e {
            // Lost a race against a concurrent create
            sqlx::Error::Database(db) if db.is_unique_violation() => duplicate_name(),
            _ => AppError::from(e),
        })?;

        tracing::info!(role_id = %role.id, name = %role.name, "role created");

        Ok(role)
    }

    /// Update display name and description. The machine name is never
    /// changed; an empty update returns the role untouched.
    pub async fn update_role(&self, role_id: Uuid, update: RoleUpdate) -> AppResult<Role> {
        let mut role = self.get_role_with_permissions(role_id).await?;

        if !update.apply(&mut role) {
            return Ok(role);
        }

        sqlx::query("UPDATE roles SET display_name = $1, description = $2 WHERE id = $3")
            .bind(&role.display_name)
            .bind(&role.description)
            .bind(role_id)
            .execute(&self.db)
            .await?;

        tracing::info!(role_id = %role_id, "role updated");

        Ok(role)
    }

    /// Replace the full permission set of a custom role.
    ///
    /// The old set is deleted and the new one inserted in one transaction.
    /// If any statement fails the transaction is rolled back and the role
    /// keeps its previous permissions.
    pub async fn update_role_permissions(
        &self,
        role_id: Uuid,
        permission_ids: Vec<Uuid>,
    ) -> AppResult<Role> {
        let role = self.find_role(role_id).await?;
        if !role.permissions_editable() {
            return Err(AppError::validation(
                "role_id",
                "System role permissions cannot be changed",
                "Kebenaran peranan sistem tidak boleh diubah",
            ));
        }

        let mut permission_ids = permission_ids;
        permission_ids.sort();
        permission_ids.dedup();

        // Validate permission IDs exist
        if !permission_ids.is_empty() {
            let valid_count = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM permissions WHERE id = ANY($1)",
            )
            .bind(&permission_ids)
            .fetch_one(&self.db)
            .await?;

            if valid_count != permission_ids.len() as i64 {
                return Err(AppError::validation(
                    "permission_ids",
                    "One or more permission IDs are invalid",
                    "Satu atau lebih ID kebenaran tidak sah",
                ));
            }
        }

        self.replace_permissions(role_id, &permission_ids).await?;

        tracing::info!(
            role_id = %role_id,
            count = permission_ids.len(),
            "role permissions replaced"
        );

        self.get_role_with_permissions(role_id).await
    }

    /// Swap the permission rows of a role. A failure at any step rolls
    /// back to the previous set.
    async fn replace_permissions(&self, role_id: Uuid, permission_ids: &[Uuid]) -> AppResult<()> {
        self.write_permission_rows(role_id, permission_ids)
            .await
            .map_err(|e| {
                tracing::error!(role_id = %role_id, error = %e, "permission replace rolled back");
                AppError::RolePermissionsNotReplaced(e.to_string())
            })
    }

    async fn write_permission_rows(
        &self,
        role_id: Uuid,
        permission_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut *tx)
            .await?;

        for permission_id in permission_ids {
            sqlx::query("INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2)")
                .bind(role_id)
                .bind(permission_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await
    }

    /// Delete a custom role.
    ///
    /// Returns `false` when the role is a system role: the delete statement
    /// itself excludes system roles, so neither the role nor its permission
    /// rows are touched.
    pub async fn delete_role(&self, role_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM roles
            WHERE id = $1
              AND is_system_role = false
              AND NOT EXISTS (SELECT 1 FROM users WHERE role_id = $1)
            "#,
        )
        .bind(role_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!(role_id = %role_id, "role deleted");
            return Ok(true);
        }

        let role = self.find_role(role_id).await?;
        if role.is_system_role {
            tracing::warn!(role_id = %role_id, name = %role.name, "refused to delete system role");
            return Ok(false);
        }

        // Check if any users are assigned to this role
        let user_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role_id = $1")
                .bind(role_id)
                .fetch_one(&self.db)
                .await?;

        Err(AppError::Conflict {
            resource: "role".to_string(),
            message: format!("Cannot delete role: {} users are assigned to it", user_count),
            message_ms: format!(
                "Peranan tidak boleh dipadam: {} pengguna menggunakan peranan ini",
                user_count
            ),
        })
    }

    async fn find_role(&self, role_id: Uuid) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(&format!("SELECT {} FROM roles WHERE id = $1", ROLE_COLUMNS))
            .bind(role_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Role".to_string()))
    }
}

fn duplicate_name() -> AppError {
    AppError::Conflict {
        resource: "role".to_string(),
        message: "Role with this name already exists".to_string(),
        message_ms: "Peranan dengan nama ini sudah wujud".to_string(),
    }
}
