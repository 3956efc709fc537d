//! Authentication middleware
//!
//! JWT authentication and access-rule checks

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use shared::{AccessRule, AuthContext, PermissionCheck};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::auth::{decode_claims, Claims};
use crate::AppState;

/// Authenticated user information extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    /// Legacy role name
    pub role: String,
    pub role_id: Option<Uuid>,
    pub permissions: Vec<PermissionCheck>,
    context: AuthContext,
}

impl AuthUser {
    pub fn from_claims(claims: Claims) -> AppResult<Self> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;
        let role_id = match claims.role_id.as_deref() {
            Some(id) => Some(Uuid::parse_str(id).map_err(|_| AppError::InvalidToken)?),
            None => None,
        };

        // Unparseable entries are dropped rather than rejecting the token
        let permissions: Vec<PermissionCheck> = claims
            .permissions
            .iter()
            .filter_map(|p| p.parse().ok())
            .collect();

        let context = AuthContext::resolve(Some(&claims.role), permissions.clone());

        Ok(Self {
            user_id,
            role: claims.role,
            role_id,
            permissions,
            context,
        })
    }

    /// The authorization path chosen for this request
    pub fn auth_context(&self) -> &AuthContext {
        &self.context
    }

    pub fn can(&self, rule: &AccessRule) -> bool {
        self.context.allows(rule)
    }

    /// Fail with 403 unless the rule allows this user
    pub fn require(&self, rule: &AccessRule) -> AppResult<()> {
        if self.can(rule) {
            Ok(())
        } else {
            tracing::debug!(
                user_id = %self.user_id,
                resource = rule.resource,
                action = rule.action,
                legacy = self.context.is_legacy(),
                "access denied"
            );
            Err(AppError::InsufficientPermissions)
        }
    }
}

/// Authentication middleware that validates JWT tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extract Authorization header
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing or invalid Authorization header".to_string(),
            message_ms: "Pengesahan diperlukan".to_string(),
        })?;

    let claims = decode_claims(token, &state.config.jwt.secret)?;
    let auth_user = AuthUser::from_claims(claims)?;

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extractor for authenticated user
/// Use this in handlers to get the current user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized {
                message: "Authentication required".to_string(),
                message_ms: "Sila log masuk terlebih dahulu".to_string(),
            })
    }
}
