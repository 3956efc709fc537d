//! User account management

use bcrypt::{hash, DEFAULT_COST};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::{system_roles, validate_email, validate_password, Language, User};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::config::BootstrapConfig;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub password: String,
    /// Legacy role name; defaults to `pengguna`
    pub role: Option<String>,
    pub role_id: Option<Uuid>,
    pub preferred_language: Option<Language>,
}

#[derive(Debug, Deserialize)]
pub struct AssignRoleInput {
    /// `None` clears the assignment, leaving the legacy role in effect
    pub role_id: Option<Uuid>,
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    role: String,
    role_id: Option<Uuid>,
    preferred_language: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            name: row.name,
            role: row.role,
            role_id: row.role_id,
            preferred_language: Language::from_code(&row.preferred_language),
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

const USER_COLUMNS: &str =
    "id, email, name, role, role_id, preferred_language, is_active, created_at";

impl UserService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY name ASC",
            USER_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    pub async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .map(User::from)
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    pub async fn create_user(&self, input: CreateUserInput) -> AppResult<User> {
        input.validate()?;
        validate_email(&input.email)
            .map_err(|msg| AppError::validation("email", msg, "E-mel tidak sah"))?;
        validate_password(&input.password)
            .map_err(|msg| AppError::validation("password", msg, "Kata laluan terlalu lemah"))?;

        let existing =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE LOWER(email) = LOWER($1)")
                .bind(&input.email)
                .fetch_one(&self.db)
                .await?;
        if existing > 0 {
            return Err(AppError::Conflict {
                resource: "email".to_string(),
                message: "A user with this email already exists".to_string(),
                message_ms: "Pengguna dengan e-mel ini sudah wujud".to_string(),
            });
        }

        if let Some(role_id) = input.role_id {
            self.ensure_role_exists(role_id).await?;
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;
        let role = input
            .role
            .unwrap_or_else(|| system_roles::PENGGUNA.to_string());
        let language = input.preferred_language.unwrap_or_default();

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (email, password_hash, name, role, role_id, preferred_language)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&input.email)
        .bind(&password_hash)
        .bind(&input.name)
        .bind(&role)
        .bind(input.role_id)
        .bind(language.code())
        .fetch_one(&self.db)
        .await?;

        tracing::info!(user_id = %row.id, role = %row.role, "user created");

        Ok(row.into())
    }

    pub async fn assign_role(&self, user_id: Uuid, role_id: Option<Uuid>) -> AppResult<User> {
        if let Some(role_id) = role_id {
            self.ensure_role_exists(role_id).await?;
        }

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET role_id = $1 WHERE id = $2 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(role_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        tracing::info!(user_id = %user_id, role_id = ?role_id, "role assigned");

        Ok(row.into())
    }

    /// Create the configured administrator when no users exist yet
    pub async fn bootstrap_admin(&self, bootstrap: &BootstrapConfig) -> AppResult<Option<User>> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;
        if count > 0 {
            return Ok(None);
        }

        let admin_role_id =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM roles WHERE name = $1")
                .bind(system_roles::ADMIN)
                .fetch_optional(&self.db)
                .await?;

        let user = self
            .create_user(CreateUserInput {
                email: bootstrap.admin_email.clone(),
                name: bootstrap.admin_name.clone(),
                password: bootstrap.admin_password.clone(),
                role: Some(system_roles::ADMIN.to_string()),
                role_id: admin_role_id,
                preferred_language: None,
            })
            .await?;

        tracing::info!(email = %user.email, "bootstrap administrator created");

        Ok(Some(user))
    }

    async fn ensure_role_exists(&self, role_id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM roles WHERE id = $1)")
                .bind(role_id)
                .fetch_one(&self.db)
                .await?;
        if exists {
            Ok(())
        } else {
            Err(AppError::validation(
                "role_id",
                "Role does not exist",
                "Peranan tidak wujud",
            ))
        }
    }
}
