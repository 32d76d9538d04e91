use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::notify::{Notification, Route};

// --- Core Records (Mapped to the hosted tables) ---

/// BlogPost
///
/// A row of the remote `blog_posts` table. `id` and `created_at` are assigned by the
/// backend; `author_id` is fixed at creation to the session user and never changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct BlogPost {
    /// Opaque identifier issued by the backend.
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub content: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub author_id: Option<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// NewBlogPost
///
/// Insert payload. `id` and `created_at` are omitted so the backend assigns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBlogPost {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub published: bool,
    pub author_id: Uuid,
}

/// BlogPostChanges
///
/// Update payload. Carries every editable column and nothing else, so an update can
/// never touch `author_id` or `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPostChanges {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub published: bool,
}

/// Role
///
/// A role name from the `user_roles` table. Only membership in the configured
/// allow-list is ever checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Role(pub String);

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Role(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn admin() -> Self {
        Role::new("admin")
    }

    pub fn owner() -> Self {
        Role::new("owner")
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// UserRole
///
/// Association of a user with a role name (`user_roles` row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRole {
    pub user_id: Uuid,
    pub role: Role,
}

// --- Session ---

/// SessionUser
///
/// The identity part of a session as issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Session
///
/// An authenticated user context. The access token is what every data call
/// presents to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub expires_at: Option<DateTime<Utc>>,
    pub user: SessionUser,
}

// --- Form & View Schemas ---

/// PostForm
///
/// The editor's pending record, exactly as typed. Empty `excerpt` and
/// `cover_image` mean "absent".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub published: bool,
}

impl PostForm {
    /// Fills a form from an existing record; absent optional fields become "".
    pub fn from_post(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.excerpt.clone().unwrap_or_default(),
            content: post.content.clone(),
            cover_image: post.cover_image.clone().unwrap_or_default(),
            published: post.published,
        }
    }

    pub(crate) fn optional_excerpt(&self) -> Option<String> {
        non_empty(&self.excerpt)
    }

    pub(crate) fn optional_cover_image(&self) -> Option<String> {
        non_empty(&self.cover_image)
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub const STATUS_PUBLISHED: &str = "Dipublikasi";
pub const STATUS_DRAFT: &str = "Draft";

/// List dates are shown in WIB (UTC+7), the business's local time.
pub const DISPLAY_UTC_OFFSET_HOURS: i64 = 7;

/// PostSummary
///
/// One row of the admin post list: what the list view renders next to the
/// edit/delete affordances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub published: bool,
    /// "Dipublikasi" or "Draft".
    pub status: String,
    /// Creation date in WIB, id-ID short form, e.g. `5/3/2026`.
    pub created_on: String,
}

impl From<&BlogPost> for PostSummary {
    fn from(post: &BlogPost) -> Self {
        let status = if post.published {
            STATUS_PUBLISHED
        } else {
            STATUS_DRAFT
        };
        let local = post.created_at.naive_utc() + Duration::hours(DISPLAY_UTC_OFFSET_HOURS);
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            published: post.published,
            status: status.to_string(),
            created_on: format!("{}/{}/{}", local.day(), local.month(), local.year()),
        }
    }
}

// --- Request / Response Payloads ---

/// CredentialsRequest
///
/// Login and registration input. The password is forwarded to the auth provider
/// and never stored or logged here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// AdminSessionResponse
///
/// What `GET /admin/session` reports about an authorized viewer.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AdminSessionResponse {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub roles: Vec<Role>,
}

/// PostListResponse
///
/// Full records for the editor plus the rendered rows for the list view,
/// both in descending creation order.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PostListResponse {
    pub posts: Vec<BlogPost>,
    pub rows: Vec<PostSummary>,
}

impl PostListResponse {
    pub fn new(posts: Vec<BlogPost>) -> Self {
        let rows = posts.iter().map(PostSummary::from).collect();
        Self { posts, rows }
    }
}

/// SlugResponse
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SlugResponse {
    pub slug: String,
}

/// MessageResponse
///
/// Success body for mutations: the notification to show.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MessageResponse {
    pub notification: Notification,
}

impl From<Notification> for MessageResponse {
    fn from(notification: Notification) -> Self {
        Self { notification }
    }
}

/// LoginResponse
///
/// A fresh session plus the welcome notification and the next route.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub session: Session,
    pub notification: Notification,
    pub redirect: Route,
}
