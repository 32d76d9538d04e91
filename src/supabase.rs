use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode};
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::Claims,
    backend::{AuthProvider, BackendError, DataStore},
    models::{BlogPost, BlogPostChanges, NewBlogPost, Role, Session, SessionUser, UserRole},
};

const POSTS_TABLE: &str = "blog_posts";
const ROLES_TABLE: &str = "user_roles";
const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// SupabaseClient
///
/// HTTP client for a Supabase project:
/// - **Auth** (GoTrue) under `/auth/v1` for sign-up, password sign-in and logout.
/// - **Data** (PostgREST) under `/rest/v1` for `user_roles` and `blog_posts`.
///
/// Current-session resolution verifies the access token locally with the
/// project's JWT secret instead of calling the server.
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    decoding_key: DecodingKey,
}

impl SupabaseClient {
    pub fn new(base_url: &str, anon_key: &str, jwt_secret: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Attaches the project key and the bearer (the user's token, or the anon key
    /// for anonymous auth calls).
    fn authorize(&self, request: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer.unwrap_or(&self.anon_key))
    }

    /// decode_session
    ///
    /// Verifies `access_token` (signature, expiry, audience) and turns its claims
    /// into a `Session`. Any verification failure means "no session".
    pub fn decode_session(&self, access_token: &str) -> Option<Session> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.set_audience(&[AUTHENTICATED_AUDIENCE]);

        let token_data = match decode::<Claims>(access_token, &self.decoding_key, &validation) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!("access token rejected: {:?}", e.kind());
                return None;
            }
        };

        let claims = token_data.claims;
        Some(Session {
            access_token: access_token.to_string(),
            refresh_token: None,
            expires_at: DateTime::from_timestamp(claims.exp as i64, 0),
            user: SessionUser {
                id: claims.sub,
                email: claims.email,
            },
        })
    }
}

/// ErrorPayload
///
/// The union of the error shapes GoTrue and PostgREST return.
#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    msg: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// Passes successful responses through; turns error responses into
/// `BackendError::Api` carrying the service's own message.
async fn check(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let payload: ErrorPayload = serde_json::from_str(&text).unwrap_or_default();
    let message = payload
        .msg
        .or(payload.error_description)
        .or(payload.message)
        .or(payload.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if text.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                text
            }
        });

    Err(BackendError::api(status.as_u16(), message))
}

async fn send(request: RequestBuilder) -> Result<Response, BackendError> {
    let response = request
        .send()
        .await
        .map_err(|e| BackendError::Network(e.to_string()))?;
    check(response).await
}

/// TokenResponse
///
/// Body of a successful `/token?grant_type=password` call.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    user: SessionUser,
}

impl From<TokenResponse> for Session {
    fn from(token: TokenResponse) -> Self {
        let expires_at = token
            .expires_at
            .and_then(|at| DateTime::from_timestamp(at, 0))
            .or_else(|| token.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)));
        Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at,
            user: token.user,
        }
    }
}

/// Builds a PostgREST `in.(...)` filter with quoted values.
fn in_filter(roles: &[Role]) -> String {
    let quoted: Vec<String> = roles
        .iter()
        .map(|role| format!("\"{}\"", role.as_str().replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

#[async_trait]
impl AuthProvider for SupabaseClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), BackendError> {
        let mut request = self
            .authorize(self.http.post(self.auth_url("signup")), None)
            .json(&serde_json::json!({ "email": email, "password": password }));
        if let Some(redirect) = redirect_to {
            request = request.query(&[("redirect_to", redirect)]);
        }
        send(request).await?;
        Ok(())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let request = self
            .authorize(self.http.post(self.auth_url("token")), None)
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({ "email": email, "password": password }));
        let token = send(request)
            .await?
            .json::<TokenResponse>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(token.into())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let request = self.authorize(self.http.post(self.auth_url("logout")), Some(access_token));
        send(request).await?;
        Ok(())
    }

    async fn get_session(&self, access_token: &str) -> Result<Option<Session>, BackendError> {
        Ok(self.decode_session(access_token))
    }
}

#[async_trait]
impl DataStore for SupabaseClient {
    async fn select_user_roles(
        &self,
        access_token: &str,
        user_id: Uuid,
        roles: &[Role],
    ) -> Result<Vec<UserRole>, BackendError> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }
        let request = self
            .authorize(self.http.get(self.rest_url(ROLES_TABLE)), Some(access_token))
            .query(&[
                ("select", "user_id,role".to_string()),
                ("user_id", format!("eq.{}", user_id)),
                ("role", in_filter(roles)),
            ]);
        send(request)
            .await?
            .json::<Vec<UserRole>>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn list_posts(&self, access_token: &str) -> Result<Vec<BlogPost>, BackendError> {
        let request = self
            .authorize(self.http.get(self.rest_url(POSTS_TABLE)), Some(access_token))
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        send(request)
            .await?
            .json::<Vec<BlogPost>>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn insert_post(&self, access_token: &str, post: NewBlogPost) -> Result<(), BackendError> {
        let request = self
            .authorize(self.http.post(self.rest_url(POSTS_TABLE)), Some(access_token))
            .header("Prefer", "return=minimal")
            .json(&[post]);
        send(request).await?;
        Ok(())
    }

    async fn update_post(
        &self,
        access_token: &str,
        id: &str,
        changes: BlogPostChanges,
    ) -> Result<(), BackendError> {
        let request = self
            .authorize(self.http.patch(self.rest_url(POSTS_TABLE)), Some(access_token))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(&changes);
        send(request).await?;
        Ok(())
    }

    async fn delete_post(&self, access_token: &str, id: &str) -> Result<(), BackendError> {
        let request = self
            .authorize(self.http.delete(self.rest_url(POSTS_TABLE)), Some(access_token))
            .query(&[("id", format!("eq.{}", id))]);
        send(request).await?;
        Ok(())
    }
}
