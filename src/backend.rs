use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{BlogPost, BlogPostChanges, NewBlogPost, Role, Session, UserRole};

/// BackendError
///
/// Any failure reported by, or on the way to, the hosted backend. The display
/// form is the human-readable message that gets passed through to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The service answered with an error payload.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never completed (DNS, connect, TLS, timeout).
    #[error("{0}")]
    Network(String),

    /// The service answered but the body could not be understood.
    #[error("unexpected response from backend: {0}")]
    Decode(String),
}

impl BackendError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        BackendError::Api {
            status,
            message: message.into(),
        }
    }

    /// The message a user should see.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

// 1. AuthProvider Contract
/// AuthProvider
///
/// Password-based authentication owned by the external service.
///
/// **Send + Sync + async_trait** keep `Arc<dyn AuthProvider>` usable across Axum's
/// task boundaries.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Creates an account. The provider may email a confirmation link pointing at
    /// `redirect_to`. Never signs the user in.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), BackendError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;

    /// Resolves the session behind an access token. `Ok(None)` means there is no
    /// usable session (missing, expired, or revoked).
    async fn get_session(&self, access_token: &str) -> Result<Option<Session>, BackendError>;
}

// 2. DataStore Contract
/// DataStore
///
/// The two tables this crate touches. Every call carries the caller's access
/// token so the backend's row-level policies apply.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// `user_roles` rows for `user_id` whose role is in `roles`.
    async fn select_user_roles(
        &self,
        access_token: &str,
        user_id: Uuid,
        roles: &[Role],
    ) -> Result<Vec<UserRole>, BackendError>;

    /// Every `blog_posts` row, newest `created_at` first.
    async fn list_posts(&self, access_token: &str) -> Result<Vec<BlogPost>, BackendError>;

    async fn insert_post(&self, access_token: &str, post: NewBlogPost)
    -> Result<(), BackendError>;

    async fn update_post(
        &self,
        access_token: &str,
        id: &str,
        changes: BlogPostChanges,
    ) -> Result<(), BackendError>;

    async fn delete_post(&self, access_token: &str, id: &str) -> Result<(), BackendError>;
}

/// BackendState
///
/// The pair of ports shared through the application state.
#[derive(Clone)]
pub struct BackendState {
    pub auth: Arc<dyn AuthProvider>,
    pub store: Arc<dyn DataStore>,
}

impl BackendState {
    pub fn new(auth: Arc<dyn AuthProvider>, store: Arc<dyn DataStore>) -> Self {
        Self { auth, store }
    }

    /// Uses one object for both ports (the Supabase client and the in-memory
    /// backend implement both).
    pub fn from_shared<B>(backend: Arc<B>) -> Self
    where
        B: AuthProvider + DataStore + 'static,
    {
        Self {
            auth: backend.clone(),
            store: backend,
        }
    }
}
