//! Correspondence (surat) handlers

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use shared::{rules, run_list_query_with, PaginatedResponse, SortDirection, Surat, SuratField};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::listing::{controls_from_params, export_to_csv};
use crate::services::surat::SuratInput;
use crate::AppState;

/// One page of the surat list
pub async fn list_surat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<PaginatedResponse<Surat>>> {
    user.require(&rules::VIEW_SURAT)?;

    let records = state.surat_service().all().await?;
    let controls = controls_from_params(&params, SuratField::Id, SortDirection::Desc);
    let result = run_list_query_with(
        records.as_slice(),
        &controls,
        &state.config.listing.query_options(),
    );

    Ok(Json(result.page_response()))
}

/// Every matching surat as CSV, ignoring pagination
pub async fn export_surat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    user.require(&rules::EXPORT_SURAT)?;

    let records = state.surat_service().all().await?;
    let controls = controls_from_params(&params, SuratField::Id, SortDirection::Desc);
    let result = run_list_query_with(
        records.as_slice(),
        &controls,
        &state.config.listing.query_options(),
    );
    let csv = export_to_csv(&result.filtered)?;

    tracing::info!(user_id = %user.user_id, rows = result.total_items, "surat exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"surat.csv\""),
        ],
        csv,
    ))
}

pub async fn get_surat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Surat>> {
    user.require(&rules::VIEW_SURAT)?;
    Ok(Json(state.surat_service().get(id).await?))
}

pub async fn create_surat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<SuratInput>,
) -> AppResult<(StatusCode, Json<Surat>)> {
    user.require(&rules::CREATE_SURAT)?;
    let surat = state.surat_service().create(input).await?;
    Ok((StatusCode::CREATED, Json(surat)))
}

pub async fn update_surat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<SuratInput>,
) -> AppResult<Json<Surat>> {
    user.require(&rules::EDIT_SURAT)?;
    Ok(Json(state.surat_service().update(id, input).await?))
}

pub async fn delete_surat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    user.require(&rules::DELETE_SURAT)?;
    state.surat_service().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
