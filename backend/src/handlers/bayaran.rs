//! Payment (bayaran) handlers

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{
    rules, run_list_query_with, sum_amount, Bayaran, BayaranField, PaginatedResponse,
    SortDirection,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::bayaran::BayaranInput;
use crate::services::listing::{controls_from_params, export_to_csv};
use crate::AppState;

#[derive(Serialize)]
pub struct BayaranListResponse {
    #[serde(flatten)]
    pub page: PaginatedResponse<Bayaran>,
    /// Sum of `amaun` over every matching row, not just this page
    pub total_amaun: Decimal,
}

/// One page of the payment list. Without a date filter only the
/// configured default year is shown.
pub async fn list_bayaran(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<BayaranListResponse>> {
    user.require(&rules::VIEW_BAYARAN)?;

    let records = state.bayaran_service().all().await?;
    let controls = controls_from_params(&params, BayaranField::Id, SortDirection::Desc);
    let result = run_list_query_with(
        records.as_slice(),
        &controls,
        &state.config.listing.bayaran_query_options(),
    );

    Ok(Json(BayaranListResponse {
        total_amaun: sum_amount(result.filtered.iter().copied()),
        page: result.page_response(),
    }))
}

pub async fn export_bayaran(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    user.require(&rules::EXPORT_BAYARAN)?;

    let records = state.bayaran_service().all().await?;
    let controls = controls_from_params(&params, BayaranField::Id, SortDirection::Desc);
    let result = run_list_query_with(
        records.as_slice(),
        &controls,
        &state.config.listing.bayaran_query_options(),
    );
    let csv = export_to_csv(&result.filtered)?;

    tracing::info!(user_id = %user.user_id, rows = result.total_items, "bayaran exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"bayaran.csv\""),
        ],
        csv,
    ))
}

pub async fn get_bayaran(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Bayaran>> {
    user.require(&rules::VIEW_BAYARAN)?;
    Ok(Json(state.bayaran_service().get(id).await?))
}

pub async fn create_bayaran(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<BayaranInput>,
) -> AppResult<(StatusCode, Json<Bayaran>)> {
    user.require(&rules::CREATE_BAYARAN)?;
    let bayaran = state.bayaran_service().create(input).await?;
    Ok((StatusCode::CREATED, Json(bayaran)))
}

pub async fn update_bayaran(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<BayaranInput>,
) -> AppResult<Json<Bayaran>> {
    user.require(&rules::EDIT_BAYARAN)?;
    Ok(Json(state.bayaran_service().update(id, input).await?))
}

pub async fn delete_bayaran(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    user.require(&rules::DELETE_BAYARAN)?;
    state.bayaran_service().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
