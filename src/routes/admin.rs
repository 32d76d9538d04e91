use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, put},
};

/// Admin Router Module
///
/// The blog-management API. Nested under `/admin` and wrapped in the admin
/// middleware, so every route here has already passed the session guard; the
/// `AdminUser` extractor in each handler reuses that result.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/session
        // Who passed the guard, and with which roles.
        .route("/session", get(handlers::get_admin_session))
        // GET/POST /admin/posts
        // List every post (newest first) or create one.
        .route(
            "/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        // PUT/DELETE /admin/posts/{id}
        // Update a post, or delete it once `?confirm=true` is given.
        .route(
            "/posts/{id}",
            put(handlers::update_post).delete(handlers::delete_post),
        )
        // GET /admin/slug?title=...
        // Slug preview for the editor.
        .route("/slug", get(handlers::preview_slug))
}
