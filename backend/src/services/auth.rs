//! Sessions: password login, access tokens and refresh-token rotation
//!
//! Access tokens are JWTs carrying the legacy role string and the
//! `resource:action` pairs joined through the user's role, so a request can
//! be authorized without touching the database. Refresh tokens are opaque
//! and only their SHA-256 digest is stored.

use bcrypt::verify;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::{Config, JwtConfig};
use crate::error::{AppError, AppResult};

/// Access token payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Legacy role string, used when `permissions` is empty
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    /// `resource:action` pairs joined through `role_id`
    #[serde(default)]
    pub permissions: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// The parts of a user row a session is issued for
#[derive(Debug, sqlx::FromRow)]
struct SessionSubject {
    id: Uuid,
    role: String,
    role_id: Option<Uuid>,
}

#[derive(Debug, sqlx::FromRow)]
struct Credentials {
    id: Uuid,
    password_hash: String,
    is_active: bool,
}

/// Decode and validate an access token
pub fn decode_claims(token: &str, secret: &str) -> AppResult<Claims> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    match decode::<Claims>(token, &key, &Validation::default()) {
        Ok(data) => Ok(data.claims),
        Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Err(AppError::TokenExpired),
        Err(_) => Err(AppError::InvalidToken),
    }
}

fn digest_hex(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt: config.jwt.clone(),
        }
    }

    /// Check email and password and open a session
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthTokens> {
        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT id, password_hash, is_active FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        if !credentials.is_active {
            return Err(AppError::Unauthorized {
                message: "Account is disabled".to_string(),
                message_ms: "Akaun telah dinyahaktifkan".to_string(),
            });
        }

        let matches = verify(password, &credentials.password_hash)
            .map_err(|e| AppError::Internal(format!("Password check failed: {}", e)))?;
        if !matches {
            tracing::debug!(user_id = %credentials.id, "wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let subject = sqlx::query_as::<_, SessionSubject>(
            r#"
            UPDATE users SET last_login_at = NOW()
            WHERE id = $1
            RETURNING id, role, role_id
            "#,
        )
        .bind(credentials.id)
        .fetch_one(&self.db)
        .await?;

        let tokens = self.open_session(&subject).await?;
        tracing::info!(user_id = %subject.id, "user logged in");
        Ok(tokens)
    }

    /// Exchange a refresh token for a new session. The presented token is
    /// revoked in the same statement that validates it, so it can be used
    /// at most once.
    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthTokens> {
        let subject = sqlx::query_as::<_, SessionSubject>(
            r#"
            WITH used AS (
                UPDATE refresh_tokens SET revoked_at = NOW()
                WHERE token_hash = $1
                  AND revoked_at IS NULL
                  AND expires_at > NOW()
                RETURNING user_id
            )
            SELECT u.id, u.role, u.role_id
            FROM used JOIN users u ON u.id = used.user_id
            WHERE u.is_active = true
            "#,
        )
        .bind(digest_hex(refresh_token))
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized {
            message: "Refresh token is invalid or expired".to_string(),
            message_ms: "Token penyegaran tidak sah atau tamat tempoh".to_string(),
        })?;

        self.open_session(&subject).await
    }

    /// Revoke a refresh token. Unknown or already revoked tokens are ignored.
    pub async fn logout(&self, refresh_token: &str) -> AppResult<()> {
        let revoked = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW() WHERE token_hash = $1 AND revoked_at IS NULL",
        )
        .bind(digest_hex(refresh_token))
        .execute(&self.db)
        .await?
        .rows_affected();

        tracing::debug!(revoked, "refresh token revoked");
        Ok(())
    }

    async fn open_session(&self, subject: &SessionSubject) -> AppResult<AuthTokens> {
        let permissions = self.role_permissions(subject.role_id).await?;
        let access_token = self.sign_access_token(subject, permissions)?;

        let refresh_token = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO refresh_tokens (user_id, token_hash, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(subject.id)
        .bind(digest_hex(&refresh_token))
        .bind(Utc::now() + Duration::seconds(self.jwt.refresh_token_expiry))
        .execute(&self.db)
        .await?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_token_expiry,
        })
    }

    /// `resource:action` pairs granted by a role. Empty when the user has no
    /// role or the role no longer exists.
    async fn role_permissions(&self, role_id: Option<Uuid>) -> AppResult<Vec<String>> {
        let Some(role_id) = role_id else {
            return Ok(Vec::new());
        };

        let permissions = sqlx::query_scalar::<_, String>(
            r#"
            SELECT p.resource || ':' || p.action
            FROM role_permissions rp
            JOIN permissions p ON p.id = rp.permission_id
            WHERE rp.role_id = $1
            ORDER BY p.resource, p.action
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.db)
        .await?;

        Ok(permissions)
    }

    fn sign_access_token(
        &self,
        subject: &SessionSubject,
        permissions: Vec<String>,
    ) -> AppResult<String> {
        let issued = Utc::now();
        let claims = Claims {
            sub: subject.id.to_string(),
            role: subject.role.clone(),
            role_id: subject.role_id.map(|id| id.to_string()),
            permissions,
            exp: (issued + Duration::seconds(self.jwt.access_token_expiry)).timestamp(),
            iat: issued.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Could not sign access token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(exp_offset: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: Uuid::new_v4().to_string(),
            role: "KEWANGAN".to_string(),
            role_id: None,
            permissions: vec!["bayaran:edit".to_string()],
            exp: now + exp_offset,
            iat: now,
        }
    }

    #[test]
    fn test_digest_is_stable_hex() {
        let a = digest_hex("token");
        assert_eq!(a, digest_hex("token"));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, digest_hex("token2"));
    }

    #[test]
    fn test_decode_round_trip() {
        let token = sign(&claims(3600), "secret");
        let decoded = decode_claims(&token, "secret").unwrap();
        assert_eq!(decoded.role, "KEWANGAN");
        assert_eq!(decoded.permissions, vec!["bayaran:edit".to_string()]);
        assert!(decoded.role_id.is_none());
    }

    #[test]
    fn test_decode_wrong_secret() {
        let token = sign(&claims(3600), "secret");
        assert!(matches!(
            decode_claims(&token, "other"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_decode_expired() {
        let token = sign(&claims(-3600), "secret");
        assert!(matches!(
            decode_claims(&token, "secret"),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn test_claims_without_permissions_decode() {
        // Tokens issued to legacy accounts omit role_id
        let json = r#"{"sub":"u","role":"admin","exp":1,"iat":0}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert!(claims.permissions.is_empty());
        assert!(claims.role_id.is_none());
    }
}
