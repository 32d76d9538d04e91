use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Unauthenticated endpoints: the health probe and the auth entry
/// (login, register, logout).
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/login
        // Validates credentials, then signs in at the auth provider.
        .route("/auth/login", post(handlers::login))
        // POST /auth/register
        // Validates credentials, then signs up. No auto-login.
        .route("/auth/register", post(handlers::register))
        // POST /auth/logout
        // Ends the bearer's session, if any.
        .route("/auth/logout", post(handlers::logout))
}
