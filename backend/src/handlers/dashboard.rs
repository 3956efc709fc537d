//! Dashboard handler

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use shared::rules;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::dashboard::{DashboardService, DashboardSummary};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Year for the monthly payment totals
    pub year: Option<i32>,
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardSummary>> {
    user.require(&rules::VIEW_REPORTS)?;

    let year = query
        .year
        .or(state.config.listing.bayaran_query_options().default_year)
        .unwrap_or_else(|| Utc::now().year());

    let surat = state.surat_service().all().await?;
    let bayaran = state.bayaran_service().all().await?;
    let fail = state.fail_service().all().await?;

    Ok(Json(DashboardService::summarize(&surat, &bayaran, &fail, year)))
}
