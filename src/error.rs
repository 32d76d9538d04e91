use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    backend::BackendError,
    guard::GuardError,
    login::AuthFailure,
    notify::{Notification, Route},
    posts::{PostError, PostOperation},
};

/// ErrorBody
///
/// JSON body of every error response: the notification to show, plus where to go
/// when the failure implies a navigation.
#[derive(Debug, Clone, Serialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorBody {
    #[serde(flatten)]
    pub notification: Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Route>,
}

/// ApiError
///
/// A failed request: status code plus the user-facing notification.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub notification: Notification,
    pub redirect: Option<Route>,
}

impl ApiError {
    pub fn new(status: StatusCode, notification: Notification) -> Self {
        Self {
            status,
            notification,
            redirect: None,
        }
    }

    pub fn redirect_to(mut self, route: Route) -> Self {
        self.redirect = Some(route);
        self
    }

    /// Maps a post facade failure for `operation`.
    pub fn from_post(error: PostError, operation: PostOperation) -> Self {
        let status = match &error {
            PostError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PostError::Backend(e) => backend_status(e),
            PostError::ConfirmationDeclined => StatusCode::PRECONDITION_REQUIRED,
        };
        let notification = error
            .notification(operation)
            .unwrap_or_else(Notification::delete_not_confirmed);
        Self::new(status, notification)
    }
}

/// A rejected token stays 401 so the client signs in again; other client errors
/// reported by the backend are 400; anything else is a bad gateway.
fn backend_status(error: &BackendError) -> StatusCode {
    match error {
        BackendError::Api { status: 401, .. } => StatusCode::UNAUTHORIZED,
        BackendError::Api { status, .. } if (400..500).contains(status) => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl From<GuardError> for ApiError {
    fn from(error: GuardError) -> Self {
        match error {
            GuardError::Unauthenticated => ApiError::new(
                StatusCode::UNAUTHORIZED,
                Notification::destructive("Login Diperlukan", "Silakan login terlebih dahulu"),
            )
            .redirect_to(Route::Login),
            GuardError::AccessDenied(_) => {
                ApiError::new(StatusCode::FORBIDDEN, Notification::access_denied())
                    .redirect_to(Route::Home)
            }
            GuardError::Backend(_) => {
                ApiError::new(StatusCode::BAD_GATEWAY, Notification::access_check_failed())
            }
        }
    }
}

impl From<AuthFailure> for ApiError {
    fn from(failure: AuthFailure) -> Self {
        let status = match &failure {
            AuthFailure::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AuthFailure::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthFailure::AlreadyRegistered => StatusCode::CONFLICT,
            AuthFailure::Backend(e) => backend_status(e),
        };
        ApiError::new(status, failure.notification())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            notification: self.notification,
            redirect: self.redirect,
        };
        (self.status, Json(body)).into_response()
    }
}
