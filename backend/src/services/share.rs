//! Public report links
//!
//! A link token is `<uuid>.<signature>` where the signature is the
//! URL-safe base64 HMAC-SHA256 of the uuid under the share secret. The
//! signature is checked before the database is consulted.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64, Engine as _};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use shared::{BayaranField, FailField, ListControls, ReportKind, ShareLink, SuratField};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::ShareConfig;
use crate::error::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct ShareService {
    db: PgPool,
    secret: String,
    expiry_days: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateShareInput {
    pub kind: ReportKind,
    pub title: Option<String>,
    /// Control bundle of the list screen being shared
    pub controls: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct CreatedShareLink {
    pub token: String,
    pub kind: ReportKind,
    pub expires_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct ShareLinkRow {
    id: Uuid,
    kind: String,
    title: Option<String>,
    controls: serde_json::Value,
    created_by: Uuid,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ShareLinkRow> for ShareLink {
    type Error = AppError;

    fn try_from(row: ShareLinkRow) -> AppResult<Self> {
        let kind = ReportKind::parse(&row.kind)
            .ok_or_else(|| AppError::Internal(format!("Unknown report kind {}", row.kind)))?;
        Ok(ShareLink {
            id: row.id,
            kind,
            title: row.title,
            controls: row.controls,
            created_by: row.created_by,
            expires_at: row.expires_at,
            created_at: row.created_at,
        })
    }
}

/// Check that stored controls deserialize for the given list
pub fn validate_controls(kind: ReportKind, controls: &serde_json::Value) -> AppResult<()> {
    let result = match kind {
        ReportKind::Surat => {
            serde_json::from_value::<ListControls<SuratField>>(controls.clone()).map(|_| ())
        }
        ReportKind::Bayaran => {
            serde_json::from_value::<ListControls<BayaranField>>(controls.clone()).map(|_| ())
        }
        ReportKind::Fail => {
            serde_json::from_value::<ListControls<FailField>>(controls.clone()).map(|_| ())
        }
    };
    result.map_err(|e| {
        AppError::validation(
            "controls",
            &format!("Invalid list controls: {}", e),
            "Tetapan senarai tidak sah",
        )
    })
}

impl ShareService {
    pub fn new(db: PgPool, config: &ShareConfig) -> Self {
        Self {
            db,
            secret: config.secret.clone(),
            expiry_days: config.expiry_days,
        }
    }

    pub async fn create_link(
        &self,
        created_by: Uuid,
        input: CreateShareInput,
    ) -> AppResult<CreatedShareLink> {
        validate_controls(input.kind, &input.controls)?;

        let id = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::days(self.expiry_days);

        sqlx::query(
            r#"
            INSERT INTO share_links (id, kind, title, controls, created_by, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(input.kind.as_str())
        .bind(&input.title)
        .bind(&input.controls)
        .bind(created_by)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        tracing::info!(
            link_id = %id,
            kind = input.kind.as_str(),
            user_id = %created_by,
            "share link created"
        );

        Ok(CreatedShareLink {
            token: sign_token(&self.secret, id)?,
            kind: input.kind,
            expires_at,
        })
    }

    /// Verify a token and load its link; expired links are refused
    pub async fn resolve(&self, token: &str) -> AppResult<ShareLink> {
        let id = verify_token(&self.secret, token)?;

        let row = sqlx::query_as::<_, ShareLinkRow>(
            r#"
            SELECT id, kind, title, controls, created_by, expires_at, created_at
            FROM share_links
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidShareToken)?;

        let link = ShareLink::try_from(row)?;
        if link.is_expired(Utc::now()) {
            return Err(AppError::ShareLinkExpired);
        }
        Ok(link)
    }
}

fn mac(secret: &str) -> AppResult<HmacSha256> {
    HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| AppError::Internal("Failed to create HMAC".to_string()))
}

pub fn sign_token(secret: &str, id: Uuid) -> AppResult<String> {
    let mut mac = mac(secret)?;
    mac.update(id.to_string().as_bytes());
    Ok(format!("{}.{}", id, BASE64.encode(mac.finalize().into_bytes())))
}

pub fn verify_token(secret: &str, token: &str) -> AppResult<Uuid> {
    let (id, signature) = token.split_once('.').ok_or(AppError::InvalidShareToken)?;
    let id = Uuid::parse_str(id).map_err(|_| AppError::InvalidShareToken)?;
    let signature = BASE64
        .decode(signature)
        .map_err(|_| AppError::InvalidShareToken)?;

    let mut mac = mac(secret)?;
    mac.update(id.to_string().as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| AppError::InvalidShareToken)?;

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let id = Uuid::new_v4();
        let token = sign_token("rahsia", id).unwrap();
        assert!(token.starts_with(&id.to_string()));
        assert_eq!(verify_token("rahsia", &token).unwrap(), id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign_token("rahsia", Uuid::new_v4()).unwrap();
        assert!(matches!(
            verify_token("lain", &token),
            Err(AppError::InvalidShareToken)
        ));
    }

    #[test]
    fn test_swapped_id_rejected() {
        let token = sign_token("rahsia", Uuid::new_v4()).unwrap();
        let (_, signature) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", Uuid::new_v4(), signature);
        assert!(verify_token("rahsia", &forged).is_err());
    }

    #[test]
    fn test_malformed_tokens() {
        let bad_signature = format!("{}.!!!", Uuid::new_v4());
        for token in ["", "abc", "not-a-uuid.sig", bad_signature.as_str()] {
            assert!(verify_token("rahsia", token).is_err(), "{}", token);
        }
    }

    #[test]
    fn test_validate_controls_by_kind() {
        let surat = serde_json::json!({
            "search": "#12",
            "sort": { "field": "perkara", "direction": "asc" }
        });
        assert!(validate_controls(ReportKind::Surat, &surat).is_ok());
        // `perkara` exists on bayaran too, `daripada` does not
        let bad = serde_json::json!({ "sort": { "field": "daripada" } });
        assert!(validate_controls(ReportKind::Bayaran, &bad).is_err());
        assert!(validate_controls(ReportKind::Fail, &serde_json::json!([])).is_err());
    }
}
