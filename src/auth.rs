use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    backend::BackendState,
    config::AppConfig,
    error::ApiError,
    guard::{AdminSession, SessionGuard},
};

/// Claims
///
/// Payload of a Supabase-issued access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the auth user's UUID.
    pub sub: Uuid,
    /// Expiration Time (exp).
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Audience; Supabase sets "authenticated" for signed-in users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// AdminUser Extractor Result
///
/// The resolved identity of a request that passed the session guard.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AdminSession);

/// AdminUser Extractor Implementation
///
/// Runs the `SessionGuard` against the request's bearer token:
/// 1. Reuses a result already stored in the request extensions (the admin
///    middleware runs first), so one request costs one guard round trip.
/// 2. Otherwise resolves the session and checks the role allow-list.
///
/// Rejection: 401 without a usable session, 403 without a qualifying role, 502
/// when the backend could not answer.
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    BackendState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AdminUser>() {
            return Ok(user.clone());
        }

        let backend = BackendState::from_ref(state);
        let config = AppConfig::from_ref(state);

        let guard = SessionGuard::new(&backend, config.allowed_roles.clone());
        let admin = guard.authorize(bearer_token(&parts.headers)).await?;

        let user = AdminUser(admin);
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
