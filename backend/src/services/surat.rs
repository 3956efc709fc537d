//! Correspondence (surat) records

use std::sync::Arc;

use serde::Deserialize;
use shared::{validate_display_date, Surat};
use sqlx::PgPool;
use validator::Validate;

use super::cache::SnapshotCache;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct SuratService {
    db: PgPool,
    cache: SnapshotCache<Surat>,
}

/// Create or full-replace input for a surat
#[derive(Debug, Deserialize, Validate)]
pub struct SuratInput {
    pub no_rujukan: Option<String>,
    pub tarikh_surat: Option<String>,
    pub tarikh_terima: Option<String>,
    pub daripada: Option<String>,
    #[validate(length(min = 1, max = 1000))]
    pub perkara: String,
    pub kategori: Option<String>,
    pub unit: Option<String>,
    pub status: Option<String>,
    pub ditugaskan_kepada: Option<String>,
    pub no_fail: Option<String>,
    pub catatan: Option<String>,
}

impl SuratInput {
    fn check(&self) -> AppResult<()> {
        self.validate()?;
        for (field, value) in [
            ("tarikh_surat", &self.tarikh_surat),
            ("tarikh_terima", &self.tarikh_terima),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                validate_display_date(value).map_err(|msg| {
                    AppError::validation(field, msg, "Tarikh mesti dalam format DD/MM/YYYY")
                })?;
            }
        }
        Ok(())
    }
}

const SURAT_COLUMNS: &str = "id, no_rujukan, tarikh_surat, tarikh_terima, daripada, perkara, \
    kategori, unit, status, ditugaskan_kepada, no_fail, catatan, created_at, updated_at";

impl SuratService {
    pub fn new(db: PgPool, cache: SnapshotCache<Surat>) -> Self {
        Self { db, cache }
    }

    /// The current snapshot of every surat
    pub async fn all(&self) -> AppResult<Arc<Vec<Surat>>> {
        self.cache.get_or_load(|| self.load_all()).await
    }

    /// Reload the snapshot from the database
    pub async fn refresh(&self) -> AppResult<usize> {
        let records = self.load_all().await?;
        Ok(self.cache.store(records).await.len())
    }

    async fn load_all(&self) -> AppResult<Vec<Surat>> {
        let records = sqlx::query_as::<_, Surat>(&format!(
            "SELECT {} FROM surat ORDER BY id DESC",
            SURAT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(records)
    }

    pub async fn get(&self, id: i64) -> AppResult<Surat> {
        sqlx::query_as::<_, Surat>(&format!("SELECT {} FROM surat WHERE id = $1", SURAT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Surat".to_string()))
    }

    pub async fn create(&self, input: SuratInput) -> AppResult<Surat> {
        input.check()?;

        let surat = sqlx::query_as::<_, Surat>(&format!(
            r#"
            INSERT INTO surat (no_rujukan, tarikh_surat, tarikh_terima, daripada, perkara,
                               kategori, unit, status, ditugaskan_kepada, no_fail, catatan)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            SURAT_COLUMNS
        ))
        .bind(&input.no_rujukan)
        .bind(&input.tarikh_surat)
        .bind(&input.tarikh_terima)
        .bind(&input.daripada)
        .bind(&input.perkara)
        .bind(&input.kategori)
        .bind(&input.unit)
        .bind(&input.status)
        .bind(&input.ditugaskan_kepada)
        .bind(&input.no_fail)
        .bind(&input.catatan)
        .fetch_one(&self.db)
        .await?;

        self.cache.invalidate().await;
        tracing::info!(surat_id = surat.id, "surat created");

        Ok(surat)
    }

    pub async fn update(&self, id: i64, input: SuratInput) -> AppResult<Surat> {
        input.check()?;

        let surat = sqlx::query_as::<_, Surat>(&format!(
            r#"
            UPDATE surat
            SET no_rujukan = $1, tarikh_surat = $2, tarikh_terima = $3, daripada = $4,
                perkara = $5, kategori = $6, unit = $7, status = $8,
                ditugaskan_kepada = $9, no_fail = $10, catatan = $11, updated_at = NOW()
            WHERE id = $12
            RETURNING {}
            "#,
            SURAT_COLUMNS
        ))
        .bind(&input.no_rujukan)
        .bind(&input.tarikh_surat)
        .bind(&input.tarikh_terima)
        .bind(&input.daripada)
        .bind(&input.perkara)
        .bind(&input.kategori)
        .bind(&input.unit)
        .bind(&input.status)
        .bind(&input.ditugaskan_kepada)
        .bind(&input.no_fail)
        .bind(&input.catatan)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Surat".to_string()))?;

        self.cache.invalidate().await;
        tracing::info!(surat_id = id, "surat updated");

        Ok(surat)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM surat WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Surat".to_string()));
        }

        self.cache.invalidate().await;
        tracing::info!(surat_id = id, "surat deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(tarikh_terima: Option<&str>) -> SuratInput {
        SuratInput {
            no_rujukan: Some("JKR/100/2/1".to_string()),
            tarikh_surat: None,
            tarikh_terima: tarikh_terima.map(str::to_string),
            daripada: Some("Pejabat Daerah".to_string()),
            perkara: "Mesyuarat Tapak".to_string(),
            kategori: None,
            unit: None,
            status: None,
            ditugaskan_kepada: None,
            no_fail: None,
            catatan: None,
        }
    }

    #[test]
    fn test_display_dates_checked() {
        assert!(input(Some("05/03/2025")).check().is_ok());
        assert!(input(None).check().is_ok());
        assert!(input(Some("")).check().is_ok());
        assert!(matches!(
            input(Some("2025-03-05")).check(),
            Err(AppError::Validation { field, .. }) if field == "tarikh_terima"
        ));
    }

    #[test]
    fn test_perkara_required() {
        let mut i = input(None);
        i.perkara = String::new();
        assert!(i.check().is_err());
    }
}
