//! File index handlers

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::{rules, run_list_query_with, FailField, FailRecord, PaginatedResponse, SortDirection};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::fail::FailInput;
use crate::services::listing::controls_from_params;
use crate::AppState;

pub async fn list_fail(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<PaginatedResponse<FailRecord>>> {
    user.require(&rules::VIEW_FAIL)?;

    let records = state.fail_service().all().await?;
    let controls = controls_from_params(&params, FailField::NoFail, SortDirection::Asc);
    let result = run_list_query_with(
        records.as_slice(),
        &controls,
        &state.config.listing.query_options(),
    );

    Ok(Json(result.page_response()))
}

pub async fn get_fail(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<FailRecord>> {
    user.require(&rules::VIEW_FAIL)?;
    Ok(Json(state.fail_service().get(id).await?))
}

pub async fn create_fail(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<FailInput>,
) -> AppResult<(StatusCode, Json<FailRecord>)> {
    user.require(&rules::CREATE_FAIL)?;
    let record = state.fail_service().create(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_fail(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<FailInput>,
) -> AppResult<Json<FailRecord>> {
    user.require(&rules::EDIT_FAIL)?;
    Ok(Json(state.fail_service().update(id, input).await?))
}

pub async fn delete_fail(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    user.require(&rules::DELETE_FAIL)?;
    state.fail_service().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
