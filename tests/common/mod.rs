#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use kopi_keliling_admin::{
    BackendError, BackendState, DataStore, MemoryBackend,
    models::{BlogPost, BlogPostChanges, NewBlogPost, Role, Session, UserRole},
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use uuid::Uuid;

// --- FLAKY STORE ---

// Wraps the in-memory store, counts every call that reaches it, and fails the
// operations named in `failing` with the error registered for them.
pub struct FlakyStore {
    pub inner: Arc<MemoryBackend>,
    pub calls: AtomicUsize,
    pub failing: Mutex<Vec<(&'static str, BackendError)>>,
}

impl FlakyStore {
    pub fn new(inner: Arc<MemoryBackend>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            failing: Mutex::new(Vec::new()),
        }
    }

    pub fn fail(&self, op: &'static str) {
        self.fail_with(op, BackendError::Network(format!("{} unavailable", op)));
    }

    pub fn fail_with(&self, op: &'static str, error: BackendError) {
        self.failing.lock().unwrap().push((op, error));
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self, op: &'static str) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failing = self.failing.lock().unwrap();
        match failing.iter().find(|(name, _)| *name == op) {
            Some((_, error)) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataStore for FlakyStore {
    async fn select_user_roles(
        &self,
        access_token: &str,
        user_id: Uuid,
        roles: &[Role],
    ) -> Result<Vec<UserRole>, BackendError> {
        self.enter("roles")?;
        self.inner.select_user_roles(access_token, user_id, roles).await
    }

    async fn list_posts(&self, access_token: &str) -> Result<Vec<BlogPost>, BackendError> {
        self.enter("list")?;
        self.inner.list_posts(access_token).await
    }

    async fn insert_post(&self, access_token: &str, post: NewBlogPost) -> Result<(), BackendError> {
        self.enter("insert")?;
        self.inner.insert_post(access_token, post).await
    }

    async fn update_post(
        &self,
        access_token: &str,
        id: &str,
        changes: BlogPostChanges,
    ) -> Result<(), BackendError> {
        self.enter("update")?;
        self.inner.update_post(access_token, id, changes).await
    }

    async fn delete_post(&self, access_token: &str, id: &str) -> Result<(), BackendError> {
        self.enter("delete")?;
        self.inner.delete_post(access_token, id).await
    }
}

// --- FIXTURE ---

pub const ADMIN_EMAIL: &str = "admin@kopikeliling.com";
pub const ADMIN_PASSWORD: &str = "rahasia123";
pub const VISITOR_EMAIL: &str = "tamu@kopikeliling.com";
pub const VISITOR_PASSWORD: &str = "tamu12345";

pub struct Fixture {
    pub memory: Arc<MemoryBackend>,
    pub store: Arc<FlakyStore>,
    pub backend: BackendState,
    pub admin_id: Uuid,
    pub admin: Session,
    pub visitor_id: Uuid,
    pub visitor: Session,
}

// One admin (role "admin") and one signed-in user without any role.
pub async fn fixture() -> Fixture {
    let memory = Arc::new(MemoryBackend::new());

    let admin_id = memory.create_account(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    memory.grant_role(admin_id, Role::admin()).await;
    let admin = memory.issue_session(admin_id).await.unwrap();

    let visitor_id = memory.create_account(VISITOR_EMAIL, VISITOR_PASSWORD).await;
    let visitor = memory.issue_session(visitor_id).await.unwrap();

    let store = Arc::new(FlakyStore::new(memory.clone()));
    let backend = BackendState::new(memory.clone(), store.clone());

    Fixture {
        memory,
        store,
        backend,
        admin_id,
        admin,
        visitor_id,
        visitor,
    }
}

pub fn allowed_roles() -> Vec<Role> {
    vec![Role::admin(), Role::owner()]
}

pub fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 8, 30, 0).unwrap()
}

pub fn sample_post(id: &str, title: &str, created_at: DateTime<Utc>) -> BlogPost {
    BlogPost {
        id: id.to_string(),
        title: title.to_string(),
        slug: kopi_keliling_admin::slug::generate_slug(title),
        excerpt: Some(format!("Ringkasan {}", title)),
        content: format!("Isi lengkap {}", title),
        cover_image: None,
        published: false,
        author_id: Some(Uuid::from_u128(7)),
        created_at,
    }
}
