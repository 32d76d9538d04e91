use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    backend::{AuthProvider, BackendError, BackendState, DataStore},
    models::{Role, Session},
};

/// AdminSession
///
/// A session that has passed the role check, plus the qualifying roles found.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminSession {
    pub session: Session,
    pub roles: Vec<Role>,
}

impl AdminSession {
    pub fn user_id(&self) -> Uuid {
        self.session.user.id
    }

    pub fn access_token(&self) -> &str {
        &self.session.access_token
    }
}

/// GuardError
///
/// Why the admin view may not be shown. Backend failures are kept apart from a
/// denial so an outage never reads as "you are not an admin".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GuardError {
    #[error("no active session")]
    Unauthenticated,

    #[error("user {0} has no admin role")]
    AccessDenied(Uuid),

    #[error("could not verify admin access: {0}")]
    Backend(#[from] BackendError),
}

/// SessionGuard
///
/// Gatekeeper for the admin view: session first, then role membership.
#[derive(Clone)]
pub struct SessionGuard {
    auth: Arc<dyn AuthProvider>,
    store: Arc<dyn DataStore>,
    allowed_roles: Vec<Role>,
}

impl SessionGuard {
    pub fn new(backend: &BackendState, allowed_roles: Vec<Role>) -> Self {
        Self {
            auth: backend.auth.clone(),
            store: backend.store.clone(),
            allowed_roles,
        }
    }

    pub fn allowed_roles(&self) -> &[Role] {
        &self.allowed_roles
    }

    /// authorize
    ///
    /// Resolves the session behind `access_token` and confirms the user holds one
    /// of the allowed roles. No retries.
    pub async fn authorize(&self, access_token: Option<&str>) -> Result<AdminSession, GuardError> {
        let token = match access_token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(GuardError::Unauthenticated),
        };

        let session = self
            .auth
            .get_session(token)
            .await
            .inspect_err(|e| tracing::warn!("session lookup failed: {}", e))?
            .ok_or(GuardError::Unauthenticated)?;

        let user_id = session.user.id;
        let rows = self
            .store
            .select_user_roles(&session.access_token, user_id, &self.allowed_roles)
            .await
            .inspect_err(|e| tracing::warn!(%user_id, "role lookup failed: {}", e))?;

        // Rows outside the allow-list never count, whatever the store returned.
        let roles: Vec<Role> = rows
            .into_iter()
            .filter(|row| row.user_id == user_id && self.allowed_roles.contains(&row.role))
            .map(|row| row.role)
            .collect();

        if roles.is_empty() {
            tracing::info!(%user_id, "admin access denied");
            return Err(GuardError::AccessDenied(user_id));
        }

        tracing::debug!(%user_id, ?roles, "admin access granted");
        Ok(AdminSession { session, roles })
    }
}
