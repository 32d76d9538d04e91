use crate::{
    AppState,
    auth::{AdminUser, bearer_token},
    error::{ApiError, ErrorBody},
    models::{
        AdminSessionResponse, CredentialsRequest, LoginResponse, MessageResponse, PostForm,
        PostListResponse, SlugResponse,
    },
    notify::{Notification, Route},
    posts::{Confirmation, PostOperation},
    slug::generate_slug,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;

// --- Query Structs ---

/// DeleteParams
///
/// The delete prompt's answer travels as `?confirm=true`; anything else counts as
/// declined.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct DeleteParams {
    pub confirm: Option<bool>,
}

/// SlugQuery
#[derive(Deserialize, utoipa::IntoParams)]
pub struct SlugQuery {
    #[serde(default)]
    pub title: String,
}

// --- Auth Handlers ---

/// login
///
/// [Public Route] Validates the credentials and signs in at the auth provider.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 401, description = "Wrong email or password", body = ErrorBody),
        (status = 422, description = "Invalid input", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let session = state
        .authenticator
        .sign_in(&payload.email, &payload.password)
        .await?;
    Ok(Json(LoginResponse {
        session,
        notification: Notification::login_succeeded(),
        redirect: Route::Admin,
    }))
}

/// register
///
/// [Public Route] Creates an account. Does not sign in; the client switches back
/// to the login form.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Registered", body = MessageResponse),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 422, description = "Invalid input", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state
        .authenticator
        .sign_up(&payload.email, &payload.password)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Notification::registered().into()),
    ))
}

/// logout
///
/// [Public Route] Ends the bearer's session at the provider. Always succeeds from
/// the client's point of view.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Signed out"))
)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        if let Err(e) = state.authenticator.sign_out(token).await {
            tracing::warn!("sign out failed: {}", e);
        }
    }
    StatusCode::NO_CONTENT
}

// --- Admin Handlers ---

/// get_admin_session
///
/// [Admin Route] Reports who passed the session guard and with which roles.
#[utoipa::path(
    get,
    path = "/admin/session",
    responses(
        (status = 200, description = "Authorized", body = AdminSessionResponse),
        (status = 401, description = "No session", body = ErrorBody),
        (status = 403, description = "No admin role", body = ErrorBody)
    )
)]
pub async fn get_admin_session(AdminUser(admin): AdminUser) -> Json<AdminSessionResponse> {
    Json(AdminSessionResponse {
        user_id: admin.user_id(),
        email: admin.session.user.email.clone(),
        roles: admin.roles.clone(),
    })
}

/// list_posts
///
/// [Admin Route] Every post, newest first, with the rendered list rows.
#[utoipa::path(
    get,
    path = "/admin/posts",
    responses(
        (status = 200, description = "All posts", body = PostListResponse),
        (status = 502, description = "Backend failure", body = ErrorBody)
    )
)]
pub async fn list_posts(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
) -> Result<Json<PostListResponse>, ApiError> {
    let posts = state
        .posts
        .list(&admin)
        .await
        .map_err(|e| ApiError::from_post(e, PostOperation::List))?;
    Ok(Json(PostListResponse::new(posts)))
}

/// create_post
///
/// [Admin Route] Validates the form and inserts it with the caller as author.
#[utoipa::path(
    post,
    path = "/admin/posts",
    request_body = PostForm,
    responses(
        (status = 201, description = "Created", body = MessageResponse),
        (status = 422, description = "Validation failed", body = ErrorBody)
    )
)]
pub async fn create_post(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(form): Json<PostForm>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state
        .posts
        .create(&admin, &form)
        .await
        .map_err(|e| ApiError::from_post(e, PostOperation::Create))?;
    Ok((
        StatusCode::CREATED,
        Json(Notification::post_created().into()),
    ))
}

/// update_post
///
/// [Admin Route] Validates the form and rewrites the post's editable fields.
#[utoipa::path(
    put,
    path = "/admin/posts/{id}",
    params(("id" = String, Path, description = "Post ID")),
    request_body = PostForm,
    responses(
        (status = 200, description = "Updated", body = MessageResponse),
        (status = 422, description = "Validation failed", body = ErrorBody)
    )
)]
pub async fn update_post(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<PostForm>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .posts
        .update(&admin, &id, &form)
        .await
        .map_err(|e| ApiError::from_post(e, PostOperation::Update))?;
    Ok(Json(Notification::post_updated().into()))
}

/// delete_post
///
/// [Admin Route] Deletes a post. Requires `?confirm=true`; without it nothing is
/// sent to the backend and the answer is 428.
#[utoipa::path(
    delete,
    path = "/admin/posts/{id}",
    params(("id" = String, Path, description = "Post ID"), DeleteParams),
    responses(
        (status = 204, description = "Deleted"),
        (status = 428, description = "Not confirmed", body = ErrorBody),
        (status = 502, description = "Backend failure", body = ErrorBody)
    )
)]
pub async fn delete_post(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode, ApiError> {
    let confirmation = Confirmation::from(params.confirm.unwrap_or(false));
    state
        .posts
        .delete(&admin, &id, confirmation)
        .await
        .map_err(|e| ApiError::from_post(e, PostOperation::Delete))?;
    Ok(StatusCode::NO_CONTENT)
}

/// preview_slug
///
/// [Admin Route] The slug the editor would derive from `title`.
#[utoipa::path(
    get,
    path = "/admin/slug",
    params(SlugQuery),
    responses((status = 200, description = "Slug", body = SlugResponse))
)]
pub async fn preview_slug(
    _admin: AdminUser,
    Query(query): Query<SlugQuery>,
) -> Json<SlugResponse> {
    Json(SlugResponse {
        slug: generate_slug(&query.title),
    })
}
