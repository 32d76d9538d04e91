use std::sync::Arc;
use thiserror::Error;

use crate::{
    backend::{AuthProvider, BackendError},
    models::Session,
    notify::{Notification, Route},
    validation::{CredentialsValidator, FieldError},
};

const INVALID_CREDENTIALS_MARKER: &str = "Invalid login credentials";
const ALREADY_REGISTERED_MARKER: &str = "already registered";

/// AuthMode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// AuthSuccess
#[derive(Debug, Clone, PartialEq)]
pub enum AuthSuccess {
    SignedIn(Session),
    Registered,
}

impl AuthSuccess {
    pub fn notification(&self) -> Notification {
        match self {
            AuthSuccess::SignedIn(_) => Notification::login_succeeded(),
            AuthSuccess::Registered => Notification::registered(),
        }
    }
}

/// AuthFailure
///
/// Sign-in and sign-up failures, with the two provider messages that get
/// friendlier wording split out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthFailure {
    #[error("{}", .0.message)]
    Validation(FieldError),

    #[error("invalid login credentials")]
    InvalidCredentials,

    #[error("email already registered")]
    AlreadyRegistered,

    #[error(transparent)]
    Backend(BackendError),
}

impl AuthFailure {
    fn from_sign_in(error: BackendError) -> Self {
        if error.message().contains(INVALID_CREDENTIALS_MARKER) {
            AuthFailure::InvalidCredentials
        } else {
            AuthFailure::Backend(error)
        }
    }

    fn from_sign_up(error: BackendError) -> Self {
        if error.message().contains(ALREADY_REGISTERED_MARKER) {
            AuthFailure::AlreadyRegistered
        } else {
            AuthFailure::Backend(error)
        }
    }

    pub fn notification(&self) -> Notification {
        match self {
            AuthFailure::Validation(error) => Notification::validation_failed(error.message.clone()),
            AuthFailure::InvalidCredentials => Notification::invalid_credentials(),
            AuthFailure::AlreadyRegistered => Notification::already_registered(),
            AuthFailure::Backend(error) => Notification::backend_error(error.message()),
        }
    }
}

/// Authenticator
///
/// Validates credentials locally, then signs in or signs up at the provider.
#[derive(Clone)]
pub struct Authenticator {
    provider: Arc<dyn AuthProvider>,
    validator: CredentialsValidator,
    redirect_to: Option<String>,
}

impl Authenticator {
    /// `redirect_to` is the link target of the confirmation email sent on sign-up.
    pub fn new(provider: Arc<dyn AuthProvider>, redirect_to: Option<String>) -> Self {
        Self {
            provider,
            validator: CredentialsValidator::default(),
            redirect_to,
        }
    }

    fn validate(&self, email: &str, password: &str) -> Result<(), AuthFailure> {
        self.validator
            .validate(email, password)
            .into_result()
            .map_err(AuthFailure::Validation)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthFailure> {
        let email = email.trim();
        self.validate(email, password)?;

        let session = self
            .provider
            .sign_in_with_password(email, password)
            .await
            .map_err(AuthFailure::from_sign_in)?;

        tracing::info!(user_id = %session.user.id, "signed in");
        Ok(session)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthFailure> {
        let email = email.trim();
        self.validate(email, password)?;

        self.provider
            .sign_up(email, password, self.redirect_to.as_deref())
            .await
            .map_err(AuthFailure::from_sign_up)?;

        tracing::info!("account registered");
        Ok(())
    }

    pub async fn authenticate(
        &self,
        mode: AuthMode,
        email: &str,
        password: &str,
    ) -> Result<AuthSuccess, AuthFailure> {
        match mode {
            AuthMode::Login => self.sign_in(email, password).await.map(AuthSuccess::SignedIn),
            AuthMode::Register => self
                .sign_up(email, password)
                .await
                .map(|()| AuthSuccess::Registered),
        }
    }

    /// Resolves an existing session, if any. Provider errors count as "no session".
    pub async fn current_session(&self, access_token: &str) -> Option<Session> {
        self.provider
            .get_session(access_token)
            .await
            .inspect_err(|e| tracing::warn!("session lookup failed: {}", e))
            .ok()
            .flatten()
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        self.provider.sign_out(access_token).await
    }
}

/// AuthEntry
///
/// State of the login/register page: the form, the mode toggle, and what the
/// page should do next.
pub struct AuthEntry {
    authenticator: Authenticator,
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    loading: bool,
    session: Option<Session>,
    navigation: Option<Route>,
    notifications: Vec<Notification>,
}

impl AuthEntry {
    pub fn new(authenticator: Authenticator) -> Self {
        Self {
            authenticator,
            mode: AuthMode::Login,
            email: String::new(),
            password: String::new(),
            loading: false,
            session: None,
            navigation: None,
            notifications: Vec::new(),
        }
    }

    /// On page load: a viewer who already has a session goes straight to admin.
    pub async fn mount(&mut self, access_token: Option<&str>) {
        let Some(token) = access_token else {
            return;
        };
        if let Some(session) = self.authenticator.current_session(token).await {
            self.session = Some(session);
            self.navigation = Some(Route::Admin);
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
    }

    /// Submits the form in the current mode. Sign-in success navigates to admin;
    /// sign-up success switches to login mode without signing in.
    pub async fn submit(&mut self) {
        self.loading = true;
        let outcome = self
            .authenticator
            .authenticate(self.mode, &self.email, &self.password)
            .await;
        self.loading = false;

        match outcome {
            Ok(success) => {
                self.notifications.push(success.notification());
                match success {
                    AuthSuccess::SignedIn(session) => {
                        self.session = Some(session);
                        self.navigation = Some(Route::Admin);
                    }
                    AuthSuccess::Registered => self.mode = AuthMode::Login,
                }
            }
            Err(failure) => self.notifications.push(failure.notification()),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn navigation(&self) -> Option<Route> {
        self.navigation
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}
