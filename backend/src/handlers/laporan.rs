//! Shareable report handlers
//!
//! `create_share_link` is protected. `get_shared_report` is public: the
//! signed token is the only credential.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use shared::{
    rules, run_list_query_with, BayaranField, FailField, ListControls, ListRecord, QueryOptions,
    ReportKind, SuratField,
};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::share::{CreateShareInput, CreatedShareLink};
use crate::services::ShareService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SharedReportQuery {
    pub page: Option<u32>,
}

#[derive(Serialize)]
pub struct SharedReport {
    pub kind: ReportKind,
    pub title: Option<String>,
    pub expires_at: DateTime<Utc>,
    /// Paginated rows computed from the current records
    pub report: serde_json::Value,
}

pub async fn create_share_link(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateShareInput>,
) -> AppResult<(StatusCode, Json<CreatedShareLink>)> {
    user.require(&rules::SHARE_REPORT)?;
    user.require(match input.kind {
        ReportKind::Surat => &rules::VIEW_SURAT,
        ReportKind::Bayaran => &rules::VIEW_BAYARAN,
        ReportKind::Fail => &rules::VIEW_FAIL,
    })?;

    let service = ShareService::new(state.db.clone(), &state.config.share);
    let link = service.create_link(user.user_id, input).await?;

    Ok((StatusCode::CREATED, Json(link)))
}

/// Render a shared report from its stored controls
pub async fn get_shared_report(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<SharedReportQuery>,
) -> AppResult<Json<SharedReport>> {
    let service = ShareService::new(state.db.clone(), &state.config.share);
    let link = service.resolve(&token).await?;
    let listing = &state.config.listing;

    let report = match link.kind {
        ReportKind::Surat => {
            let controls = stored_controls::<SuratField>(&link.controls, query.page)?;
            let records = state.surat_service().all().await?;
            page_json(records.as_slice(), &controls, &listing.query_options())?
        }
        ReportKind::Bayaran => {
            let controls = stored_controls::<BayaranField>(&link.controls, query.page)?;
            let records = state.bayaran_service().all().await?;
            page_json(records.as_slice(), &controls, &listing.bayaran_query_options())?
        }
        ReportKind::Fail => {
            let controls = stored_controls::<FailField>(&link.controls, query.page)?;
            let records = state.fail_service().all().await?;
            page_json(records.as_slice(), &controls, &listing.query_options())?
        }
    };

    tracing::debug!(link_id = %link.id, kind = link.kind.as_str(), "shared report viewed");

    Ok(Json(SharedReport {
        kind: link.kind,
        title: link.title,
        expires_at: link.expires_at,
        report,
    }))
}

fn stored_controls<F>(value: &serde_json::Value, page: Option<u32>) -> AppResult<ListControls<F>>
where
    F: Copy + Eq + DeserializeOwned,
{
    let controls: ListControls<F> = serde_json::from_value(value.clone())
        .map_err(|e| AppError::Internal(format!("Stored report controls are invalid: {}", e)))?;
    Ok(match page {
        Some(page) => controls.with_page(page),
        None => controls,
    })
}

fn page_json<R>(
    records: &[R],
    controls: &ListControls<R::Field>,
    options: &QueryOptions,
) -> AppResult<serde_json::Value>
where
    R: ListRecord + Clone + Serialize,
{
    let result = run_list_query_with(records, controls, options);
    serde_json::to_value(result.page_response())
        .map_err(|e| AppError::Internal(format!("Report serialization failed: {}", e)))
}
