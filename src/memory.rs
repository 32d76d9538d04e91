use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    backend::{AuthProvider, BackendError, DataStore},
    models::{BlogPost, BlogPostChanges, NewBlogPost, Role, Session, SessionUser, UserRole},
};

const SESSION_TTL_HOURS: i64 = 1;

#[derive(Debug, Clone)]
struct Account {
    id: Uuid,
    email: String,
    password: String,
}

#[derive(Debug, Clone)]
struct StoredPost {
    seq: u64,
    post: BlogPost,
}

#[derive(Debug, Default)]
struct Inner {
    accounts: Vec<Account>,
    sessions: HashMap<String, Session>,
    roles: Vec<UserRole>,
    posts: Vec<StoredPost>,
    next_seq: u64,
}

/// MemoryBackend
///
/// In-process stand-in for the hosted backend: accounts, sessions, `user_roles`
/// and `blog_posts` kept in memory. Used for local development without a
/// Supabase project and as the default fixture in tests.
///
/// Error messages mirror the hosted service's wording so the friendly-message
/// mapping behaves the same against either backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    inner: RwLock<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an account directly (no sign-up flow) and returns its id.
    pub async fn create_account(&self, email: &str, password: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.write().await.accounts.push(Account {
            id,
            email: email.to_string(),
            password: password.to_string(),
        });
        id
    }

    pub async fn grant_role(&self, user_id: Uuid, role: Role) {
        self.inner.write().await.roles.push(UserRole { user_id, role });
    }

    /// Issues a session for an existing account without a password check.
    pub async fn issue_session(&self, user_id: Uuid) -> Option<Session> {
        let mut inner = self.inner.write().await;
        let email = inner
            .accounts
            .iter()
            .find(|account| account.id == user_id)
            .map(|account| account.email.clone())?;
        Some(inner.open_session(user_id, Some(email)))
    }

    /// Number of stored sessions, expired ones included until the next sign-in
    /// prunes them.
    pub async fn session_count(&self) -> usize {
        self.inner.read().await.sessions.len()
    }

    /// Moves session `access_token` to an expiry in the past.
    pub async fn expire_session(&self, access_token: &str) {
        if let Some(session) = self.inner.write().await.sessions.get_mut(access_token) {
            session.expires_at = Some(Utc::now() - Duration::seconds(1));
        }
    }

    /// Seeds a post as if it had been inserted earlier.
    pub async fn seed_post(&self, post: BlogPost) {
        let mut inner = self.inner.write().await;
        let seq = inner.bump_seq();
        inner.posts.push(StoredPost { seq, post });
    }
}

impl Inner {
    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn open_session(&mut self, user_id: Uuid, email: Option<String>) -> Session {
        let now = Utc::now();
        self.sessions
            .retain(|_, session| session.expires_at.is_none_or(|at| at > now));

        let session = Session {
            access_token: Uuid::new_v4().simple().to_string(),
            refresh_token: Some(Uuid::new_v4().simple().to_string()),
            expires_at: Some(now + Duration::hours(SESSION_TTL_HOURS)),
            user: SessionUser { id: user_id, email },
        };
        self.sessions
            .insert(session.access_token.clone(), session.clone());
        session
    }

    fn live_session(&self, access_token: &str) -> Option<&Session> {
        self.sessions
            .get(access_token)
            .filter(|session| session.expires_at.is_none_or(|at| at > Utc::now()))
    }

    fn require_session(&self, access_token: &str) -> Result<(), BackendError> {
        match self.live_session(access_token) {
            Some(_) => Ok(()),
            None => Err(BackendError::api(401, "JWT expired")),
        }
    }
}

#[async_trait]
impl AuthProvider for MemoryBackend {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        _redirect_to: Option<&str>,
    ) -> Result<(), BackendError> {
        let mut inner = self.inner.write().await;
        if inner
            .accounts
            .iter()
            .any(|account| account.email.eq_ignore_ascii_case(email))
        {
            return Err(BackendError::api(422, "User already registered"));
        }
        inner.accounts.push(Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password: password.to_string(),
        });
        Ok(())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let mut inner = self.inner.write().await;
        let account = inner
            .accounts
            .iter()
            .find(|account| account.email.eq_ignore_ascii_case(email) && account.password == password)
            .cloned()
            .ok_or_else(|| BackendError::api(400, "Invalid login credentials"))?;
        Ok(inner.open_session(account.id, Some(account.email)))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        self.inner.write().await.sessions.remove(access_token);
        Ok(())
    }

    async fn get_session(&self, access_token: &str) -> Result<Option<Session>, BackendError> {
        Ok(self.inner.read().await.live_session(access_token).cloned())
    }
}

#[async_trait]
impl DataStore for MemoryBackend {
    async fn select_user_roles(
        &self,
        access_token: &str,
        user_id: Uuid,
        roles: &[Role],
    ) -> Result<Vec<UserRole>, BackendError> {
        let inner = self.inner.read().await;
        inner.require_session(access_token)?;
        Ok(inner
            .roles
            .iter()
            .filter(|row| row.user_id == user_id && roles.contains(&row.role))
            .cloned()
            .collect())
    }

    async fn list_posts(&self, access_token: &str) -> Result<Vec<BlogPost>, BackendError> {
        let inner = self.inner.read().await;
        inner.require_session(access_token)?;
        let mut stored: Vec<&StoredPost> = inner.posts.iter().collect();
        // Newest first; insertion order breaks timestamp ties.
        stored.sort_by(|a, b| {
            b.post
                .created_at
                .cmp(&a.post.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(stored.into_iter().map(|s| s.post.clone()).collect())
    }

    async fn insert_post(&self, access_token: &str, post: NewBlogPost) -> Result<(), BackendError> {
        let mut inner = self.inner.write().await;
        inner.require_session(access_token)?;
        if inner.posts.iter().any(|s| s.post.slug == post.slug) {
            return Err(BackendError::api(
                409,
                "duplicate key value violates unique constraint \"blog_posts_slug_key\"",
            ));
        }
        let seq = inner.bump_seq();
        inner.posts.push(StoredPost {
            seq,
            post: BlogPost {
                id: Uuid::new_v4().to_string(),
                title: post.title,
                slug: post.slug,
                excerpt: post.excerpt,
                content: post.content,
                cover_image: post.cover_image,
                published: post.published,
                author_id: Some(post.author_id),
                created_at: Utc::now(),
            },
        });
        Ok(())
    }

    async fn update_post(
        &self,
        access_token: &str,
        id: &str,
        changes: BlogPostChanges,
    ) -> Result<(), BackendError> {
        let mut inner = self.inner.write().await;
        inner.require_session(access_token)?;
        // Like a filtered PATCH: matching nothing is not an error.
        if let Some(stored) = inner.posts.iter_mut().find(|s| s.post.id == id) {
            let post = &mut stored.post;
            post.title = changes.title;
            post.slug = changes.slug;
            post.excerpt = changes.excerpt;
            post.content = changes.content;
            post.cover_image = changes.cover_image;
            post.published = changes.published;
        }
        Ok(())
    }

    async fn delete_post(&self, access_token: &str, id: &str) -> Result<(), BackendError> {
        let mut inner = self.inner.write().await;
        inner.require_session(access_token)?;
        inner.posts.retain(|s| s.post.id != id);
        Ok(())
    }
}
