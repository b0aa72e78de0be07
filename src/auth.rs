use axum::{
    extract::{FromRef, FromRequestParts, Request},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::{
    config::{AppConfig, Env},
    error::AppError,
    models::ADMINISTRATOR_ROLE,
    repository::RepositoryState,
};

/// Claims
///
/// The JWT payload issued by the main application's login flow.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user's numeric id, as a string.
    pub sub: String,
    /// Expiration Time (exp): tokens past this instant are rejected.
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
}

/// AuthUser
///
/// The resolved identity of the current actor. The role comes from the store on
/// every request, so a demoted administrator loses access immediately.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub role: String,
}

impl AuthUser {
    pub fn is_administrator(&self) -> bool {
        self.role == ADMINISTRATOR_ROLE
    }
}

/// AuthUser Extractor Implementation
///
/// 1. Local Bypass: in `Env::Local`, an `x-user-id` header names the actor directly.
/// 2. Token Validation: otherwise a `Bearer` JWT is required and its `exp` checked.
/// 3. DB Lookup: the user must still exist; its current role is loaded.
///
/// Rejection: `AppError::Unauthorized` (401) on any credential failure, and
/// `AppError::Store` if the lookup itself fails.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        if config.env == Env::Local {
            let bypass_id = parts
                .headers
                .get("x-user-id")
                .and_then(|value| value.to_str().ok())
                .and_then(|raw| raw.parse::<i64>().ok());

            if let Some(user_id) = bypass_id {
                if let Some(user) = repo.get_user(user_id).await? {
                    return Ok(AuthUser {
                        id: user.id,
                        role: user.role,
                    });
                }
            }
        }
        // Production, or a failed bypass: fall through to JWT validation.

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
            tracing::debug!("rejected bearer token: {:?}", e.kind());
            AppError::Unauthorized
        })?;

        let user_id: i64 = token_data
            .claims
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized)?;

        // The token may outlive the account.
        let user = repo
            .get_user(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthUser {
            id: user.id,
            role: user.role,
        })
    }
}

/// require_administrator
///
/// Guard layered over every `/admin` route. Resolves the actor, then refuses
/// anyone who is not an administrator with 403 before the handler (and any
/// data query) runs. The decision is made per request and never cached.
pub async fn require_administrator(
    user: AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.is_administrator() {
        tracing::warn!(user_id = user.id, "administrator access denied");
        return Err(AppError::Forbidden);
    }
    Ok(next.run(request).await)
}
