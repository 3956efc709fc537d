//! Liveness and snapshot status

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the database answers, `degraded` otherwise
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
    /// Record collections with a fresh in-memory snapshot
    pub cached: Vec<&'static str>,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();

    let caches = &state.caches;
    let mut cached = Vec::with_capacity(3);
    for (name, fresh) in [
        (caches.surat.name(), caches.surat.fresh().await.is_some()),
        (caches.bayaran.name(), caches.bayaran.fresh().await.is_some()),
        (caches.fail.name(), caches.fail.fresh().await.is_some()),
    ] {
        if fresh {
            cached.push(name);
        }
    }

    Json(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        cached,
    })
}
