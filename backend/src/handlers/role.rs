//! Role administration handlers. Every route requires `pengguna:manage_roles`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use shared::{rules, Permission, Role, RoleUpdate};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::{AuthUser, CurrentUser};
use crate::services::role::{CreateRoleInput, UpdateRolePermissionsInput};
use crate::services::RoleService;
use crate::AppState;

#[derive(Serialize)]
pub struct RolesResponse {
    pub roles: Vec<Role>,
}

#[derive(Serialize)]
pub struct PermissionsResponse {
    pub permissions: Vec<Permission>,
}

fn role_admin(state: &AppState, user: &AuthUser) -> AppResult<RoleService> {
    user.require(&rules::MANAGE_ROLES)?;
    Ok(RoleService::new(state.db.clone()))
}

pub async fn list_roles(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<RolesResponse>> {
    let roles = role_admin(&state, &user)?.get_roles().await?;
    Ok(Json(RolesResponse { roles }))
}

pub async fn get_role(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(role_id): Path<Uuid>,
) -> AppResult<Json<Role>> {
    let role = role_admin(&state, &user)?
        .get_role_with_permissions(role_id)
        .await?;
    Ok(Json(role))
}

/// The full seeded permission catalogue
pub async fn list_permissions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<PermissionsResponse>> {
    let permissions = role_admin(&state, &user)?.get_all_permissions().await?;
    Ok(Json(PermissionsResponse { permissions }))
}

pub async fn create_role(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateRoleInput>,
) -> AppResult<(StatusCode, Json<Role>)> {
    let role = role_admin(&state, &user)?.create_role(input).await?;
    tracing::info!(user_id = %user.user_id, role = %role.name, "role created");
    Ok((StatusCode::CREATED, Json(role)))
}

/// Change display name or description. The machine name is not accepted.
pub async fn update_role(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(role_id): Path<Uuid>,
    Json(update): Json<RoleUpdate>,
) -> AppResult<Json<Role>> {
    let role = role_admin(&state, &user)?
        .update_role(role_id, update)
        .await?;
    Ok(Json(role))
}

pub async fn update_role_permissions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(role_id): Path<Uuid>,
    Json(input): Json<UpdateRolePermissionsInput>,
) -> AppResult<Json<Role>> {
    let role = role_admin(&state, &user)?
        .update_role_permissions(role_id, input.permission_ids)
        .await?;
    Ok(Json(role))
}

/// Delete a custom role. System roles answer 409 and are left untouched.
pub async fn delete_role(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(role_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if role_admin(&state, &user)?.delete_role(role_id).await? {
        return Ok(StatusCode::NO_CONTENT);
    }

    Err(AppError::Conflict {
        resource: "role".to_string(),
        message: "System roles cannot be deleted".to_string(),
        message_ms: "Peranan sistem tidak boleh dipadam".to_string(),
    })
}
