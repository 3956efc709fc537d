//! Payment (bayaran) records

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{validate_amount, validate_display_date, Bayaran};
use sqlx::PgPool;
use validator::Validate;

use super::cache::SnapshotCache;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct BayaranService {
    db: PgPool,
    cache: SnapshotCache<Bayaran>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BayaranInput {
    pub no_baucar: Option<String>,
    pub penerima: Option<String>,
    #[validate(length(min = 1, max = 1000))]
    pub perkara: String,
    pub kategori: Option<String>,
    pub unit: Option<String>,
    pub no_kontrak: Option<String>,
    pub amaun: Decimal,
    pub status: Option<String>,
    pub tarikh_terima: Option<String>,
    pub tarikh_lulus: Option<String>,
    pub tarikh_bayar: Option<String>,
    pub catatan: Option<String>,
}

impl BayaranInput {
    fn check(&self) -> AppResult<()> {
        self.validate()?;
        validate_amount(self.amaun)
            .map_err(|msg| AppError::validation("amaun", msg, "Amaun tidak sah"))?;
        for (field, value) in [
            ("tarikh_terima", &self.tarikh_terima),
            ("tarikh_lulus", &self.tarikh_lulus),
            ("tarikh_bayar", &self.tarikh_bayar),
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

const BAYARAN_COLUMNS: &str = "id, no_baucar, penerima, perkara, kategori, unit, no_kontrak, \
    amaun, status, tarikh_terima, tarikh_lulus, tarikh_bayar, catatan, created_at, updated_at";

impl BayaranService {
    pub fn new(db: PgPool, cache: SnapshotCache<Bayaran>) -> Self {
        Self { db, cache }
    }

    pub async fn all(&self) -> AppResult<Arc<Vec<Bayaran>>> {
        self.cache.get_or_load(|| self.load_all()).await
    }

    pub async fn refresh(&self) -> AppResult<usize> {
        let records = self.load_all().await?;
        Ok(self.cache.store(records).await.len())
    }

    async fn load_all(&self) -> AppResult<Vec<Bayaran>> {
        let records = sqlx::query_as::<_, Bayaran>(&format!(
            "SELECT {} FROM bayaran ORDER BY id DESC",
            BAYARAN_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(records)
    }

    pub async fn get(&self, id: i64) -> AppResult<Bayaran> {
        sqlx::query_as::<_, Bayaran>(&format!(
            "SELECT {} FROM bayaran WHERE id = $1",
            BAYARAN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Bayaran".to_string()))
    }

    pub async fn create(&self, input: BayaranInput) -> AppResult<Bayaran> {
        input.check()?;

        let bayaran = sqlx::query_as::<_, Bayaran>(&format!(
            r#"
            INSERT INTO bayaran (no_baucar, penerima, perkara, kategori, unit, no_kontrak, amaun,
                                 status, tarikh_terima, tarikh_lulus, tarikh_bayar, catatan)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            BAYARAN_COLUMNS
        ))
        .bind(&input.no_baucar)
        .bind(&input.penerima)
        .bind(&input.perkara)
        .bind(&input.kategori)
        .bind(&input.unit)
        .bind(&input.no_kontrak)
        .bind(input.amaun)
        .bind(&input.status)
        .bind(&input.tarikh_terima)
        .bind(&input.tarikh_lulus)
        .bind(&input.tarikh_bayar)
        .bind(&input.catatan)
        .fetch_one(&self.db)
        .await?;

        self.cache.invalidate().await;
        tracing::info!(bayaran_id = bayaran.id, amaun = %bayaran.amaun, "bayaran created");

        Ok(bayaran)
    }

    pub async fn update(&self, id: i64, input: BayaranInput) -> AppResult<Bayaran> {
        input.check()?;

        let bayaran = sqlx::query_as::<_, Bayaran>(&format!(
            r#"
            UPDATE bayaran
            SET no_baucar = $1, penerima = $2, perkara = $3, kategori = $4, unit = $5,
                no_kontrak = $6, amaun = $7, status = $8, tarikh_terima = $9,
                tarikh_lulus = $10, tarikh_bayar = $11, catatan = $12, updated_at = NOW()
            WHERE id = $13
            RETURNING {}
            "#,
            BAYARAN_COLUMNS
        ))
        .bind(&input.no_baucar)
        .bind(&input.penerima)
        .bind(&input.perkara)
        .bind(&input.kategori)
        .bind(&input.unit)
        .bind(&input.no_kontrak)
        .bind(input.amaun)
        .bind(&input.status)
        .bind(&input.tarikh_terima)
        .bind(&input.tarikh_lulus)
        .bind(&input.tarikh_bayar)
        .bind(&input.catatan)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Bayaran".to_string()))?;

        self.cache.invalidate().await;
        tracing::info!(bayaran_id = id, "bayaran updated");

        Ok(bayaran)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM bayaran WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Bayaran".to_string()));
        }

        self.cache.invalidate().await;
        tracing::info!(bayaran_id = id, "bayaran deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(amaun: Decimal) -> BayaranInput {
        BayaranInput {
            no_baucar: Some("B0001".to_string()),
            penerima: Some("Syarikat Maju".to_string()),
            perkara: "Bekalan baja".to_string(),
            kategori: None,
            unit: None,
            no_kontrak: None,
            amaun,
            status: None,
            tarikh_terima: Some("02/01/2025".to_string()),
            tarikh_lulus: None,
            tarikh_bayar: None,
            catatan: None,
        }
    }

    #[test]
    fn test_amount_rules() {
        assert!(input(Decimal::new(125050, 2)).check().is_ok());
        assert!(input(Decimal::new(-1, 0)).check().is_err());
        assert!(input(Decimal::new(1001, 3)).check().is_err());
    }

    #[test]
    fn test_bad_approval_date() {
        let mut i = input(Decimal::ONE);
        i.tarikh_lulus = Some("1/2".to_string());
        assert!(matches!(
            i.check(),
            Err(AppError::Validation { field, .. }) if field == "tarikh_lulus"
        ));
    }
}
