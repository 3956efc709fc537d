//! User administration handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{rules, User};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::user::{AssignRoleInput, CreateUserInput};
use crate::services::UserService;
use crate::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<User>>> {
    user.require(&rules::VIEW_USERS)?;

    let users = UserService::new(state.db.clone()).list_users().await?;
    Ok(Json(users))
}

pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateUserInput>,
) -> AppResult<(StatusCode, Json<User>)> {
    user.require(&rules::CREATE_USERS)?;

    let created = UserService::new(state.db.clone()).create_user(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Point a user at a role, or clear the assignment
pub async fn assign_user_role(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(input): Json<AssignRoleInput>,
) -> AppResult<Json<User>> {
    user.require(&rules::MANAGE_ROLES)?;

    let updated = UserService::new(state.db.clone())
        .assign_role(user_id, input.role_id)
        .await?;
    Ok(Json(updated))
}
