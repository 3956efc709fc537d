//! Login, token refresh, logout and the current session

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use shared::{AuthContext, User};
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::auth::AuthTokens;
use crate::services::{AuthService, UserService};
use crate::AppState;

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Body of `/auth/refresh` and `/auth/logout`
#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user: User,
    /// The authorization path in effect for this session
    pub access: AuthContext,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthTokens>> {
    body.validate()?;

    let tokens = AuthService::new(state.db.clone(), &state.config)
        .login(&body.email, &body.password)
        .await?;
    Ok(Json(tokens))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> AppResult<Json<AuthTokens>> {
    let tokens = AuthService::new(state.db.clone(), &state.config)
        .refresh_token(&body.refresh_token)
        .await?;
    Ok(Json(tokens))
}

pub async fn logout(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> AppResult<StatusCode> {
    AuthService::new(state.db.clone(), &state.config)
        .logout(&body.refresh_token)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Profile and resolved access of the caller
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<MeResponse>> {
    let profile = UserService::new(state.db.clone())
        .get_user(user.user_id)
        .await?;

    Ok(Json(MeResponse {
        user: profile,
        access: user.auth_context().clone(),
    }))
}
