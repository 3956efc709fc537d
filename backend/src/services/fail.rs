//! File and locker index

use std::sync::Arc;

use serde::Deserialize;
use shared::{validate_display_date, FailRecord};
use sqlx::PgPool;
use validator::Validate;

use super::cache::SnapshotCache;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct FailService {
    db: PgPool,
    cache: SnapshotCache<FailRecord>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FailInput {
    #[validate(length(min = 1, max = 100))]
    pub no_fail: String,
    #[validate(length(min = 1, max = 500))]
    pub tajuk: String,
    pub lokasi: Option<String>,
    pub no_loker: Option<String>,
    pub status: Option<String>,
    pub tarikh_buka: Option<String>,
}

impl FailInput {
    fn check(&self) -> AppResult<()> {
        self.validate()?;
        if let Some(value) = self.tarikh_buka.as_deref().filter(|v| !v.trim().is_empty()) {
            validate_display_date(value).map_err(|msg| {
                AppError::validation("tarikh_buka", msg, "Tarikh mesti dalam format DD/MM/YYYY")
            })?;
        }
        Ok(())
    }
}

const FAIL_COLUMNS: &str =
    "id, no_fail, tajuk, lokasi, no_loker, status, tarikh_buka, created_at, updated_at";

fn duplicate_no_fail(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict {
            resource: "no_fail".to_string(),
            message: "A file with this number already exists".to_string(),
            message_ms: "Fail dengan nombor ini sudah wujud".to_string(),
        },
        _ => AppError::from(e),
    }
}

impl FailService {
    pub fn new(db: PgPool, cache: SnapshotCache<FailRecord>) -> Self {
        Self { db, cache }
    }

    pub async fn all(&self) -> AppResult<Arc<Vec<FailRecord>>> {
        self.cache.get_or_load(|| self.load_all()).await
    }

    pub async fn refresh(&self) -> AppResult<usize> {
        let records = self.load_all().await?;
        Ok(self.cache.store(records).await.len())
    }

    async fn load_all(&self) -> AppResult<Vec<FailRecord>> {
        let records = sqlx::query_as::<_, FailRecord>(&format!(
            "SELECT {} FROM fail_index ORDER BY id DESC",
            FAIL_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(records)
    }

    pub async fn get(&self, id: i64) -> AppResult<FailRecord> {
        sqlx::query_as::<_, FailRecord>(&format!(
            "SELECT {} FROM fail_index WHERE id = $1",
            FAIL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Fail".to_string()))
    }

    pub async fn create(&self, input: FailInput) -> AppResult<FailRecord> {
        input.check()?;

        let record = sqlx::query_as::<_, FailRecord>(&format!(
            r#"
            INSERT INTO fail_index (no_fail, tajuk, lokasi, no_loker, status, tarikh_buka)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            FAIL_COLUMNS
        ))
        .bind(&input.no_fail)
        .bind(&input.tajuk)
        .bind(&input.lokasi)
        .bind(&input.no_loker)
        .bind(&input.status)
        .bind(&input.tarikh_buka)
        .fetch_one(&self.db)
        .await
        .map_err(duplicate_no_fail)?;

        self.cache.invalidate().await;
        tracing::info!(fail_id = record.id, no_fail = %record.no_fail, "fail created");

        Ok(record)
    }

    pub async fn update(&self, id: i64, input: FailInput) -> AppResult<FailRecord> {
        input.check()?;

        let record = sqlx::query_as::<_, FailRecord>(&format!(
            r#"
            UPDATE fail_index
            SET no_fail = $1, tajuk = $2, lokasi = $3, no_loker = $4, status = $5,
                tarikh_buka = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING {}
            "#,
            FAIL_COLUMNS
        ))
        .bind(&input.no_fail)
        .bind(&input.tajuk)
        .bind(&input.lokasi)
        .bind(&input.no_loker)
        .bind(&input.status)
        .bind(&input.tarikh_buka)
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(duplicate_no_fail)?
        .ok_or_else(|| AppError::NotFound("Fail".to_string()))?;

        self.cache.invalidate().await;
        tracing::info!(fail_id = id, "fail updated");

        Ok(record)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM fail_index WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Fail".to_string()));
        }

        self.cache.invalidate().await;
        tracing::info!(fail_id = id, "fail deleted");

        Ok(())
    }
}
