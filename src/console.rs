use crate::{
    backend::BackendState,
    editor::{PostEditor, Submission},
    guard::{AdminSession, GuardError, SessionGuard},
    models::{BlogPost, PostSummary, Role},
    notify::{Notification, Route},
    posts::{Confirmation, PostOperation, PostService},
};

/// Viewer
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Viewer {
    /// Guard not run yet, or it did not pass.
    #[default]
    Pending,
    Authorized(AdminSession),
}

/// AdminConsole
///
/// Headless model of the admin page. It owns the guard result, the loaded post
/// list, the editor form, pending notifications and the navigation target, and
/// runs the whole workflow: guard → list → edit/submit → re-list.
///
/// Every action before authorization is ignored.
pub struct AdminConsole {
    guard: SessionGuard,
    posts: PostService,
    backend: BackendState,
    viewer: Viewer,
    list: Vec<BlogPost>,
    editor: PostEditor,
    notifications: Vec<Notification>,
    navigation: Option<Route>,
}

impl AdminConsole {
    pub fn new(backend: BackendState, allowed_roles: Vec<Role>) -> Self {
        Self {
            guard: SessionGuard::new(&backend, allowed_roles),
            posts: PostService::new(backend.store.clone()),
            backend,
            viewer: Viewer::Pending,
            list: Vec::new(),
            editor: PostEditor::new(),
            notifications: Vec::new(),
            navigation: None,
        }
    }

    // --- Lifecycle ---

    /// mount
    ///
    /// Runs the session guard once. No session → login; no qualifying role →
    /// access-denied notice and home; backend failure → error notice, stay put;
    /// authorized → initial post fetch.
    pub async fn mount(&mut self, access_token: Option<&str>) {
        match self.guard.authorize(access_token).await {
            Ok(admin) => {
                self.viewer = Viewer::Authorized(admin);
                self.refresh().await;
            }
            Err(GuardError::Unauthenticated) => {
                self.navigation = Some(Route::Login);
            }
            Err(GuardError::AccessDenied(_)) => {
                self.notifications.push(Notification::access_denied());
                self.navigation = Some(Route::Home);
            }
            Err(GuardError::Backend(_)) => {
                self.notifications.push(Notification::access_check_failed());
            }
        }
    }

    /// Re-fetches the list. On failure the previous list stays.
    pub async fn refresh(&mut self) {
        let Viewer::Authorized(admin) = &self.viewer else {
            return;
        };
        match self.posts.list(admin).await {
            Ok(posts) => self.list = posts,
            Err(e) => self.notify_failure(&e, PostOperation::List),
        }
    }

    pub async fn logout(&mut self) {
        if let Viewer::Authorized(admin) = &self.viewer {
            if let Err(e) = self.backend.auth.sign_out(admin.access_token()).await {
                tracing::warn!("sign out failed: {}", e);
            }
        }
        self.viewer = Viewer::Pending;
        self.list.clear();
        self.editor.reset();
        self.navigation = Some(Route::Home);
    }

    // --- Editing ---

    pub fn editor(&self) -> &PostEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut PostEditor {
        &mut self.editor
    }

    /// Loads post `id` from the current list into the editor. Returns false when
    /// the id is not in the list.
    pub fn begin_edit(&mut self, id: &str) -> bool {
        match self.list.iter().find(|post| post.id == id) {
            Some(post) => {
                self.editor.begin_edit(post);
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editor.reset();
    }

    /// submit
    ///
    /// Creates or updates from the editor form. On success the form resets and the
    /// list is re-fetched; on failure the form is kept as typed.
    pub async fn submit(&mut self) {
        let Viewer::Authorized(admin) = &self.viewer else {
            return;
        };

        let (result, operation) = match self.editor.submission() {
            Submission::Create(form) => (self.posts.create(admin, form).await, PostOperation::Create),
            Submission::Update { id, form } => {
                (self.posts.update(admin, id, form).await, PostOperation::Update)
            }
        };

        match result {
            Ok(()) => {
                self.notifications.push(match operation {
                    PostOperation::Update => Notification::post_updated(),
                    _ => Notification::post_created(),
                });
                self.editor.reset();
                self.refresh().await;
            }
            Err(e) => self.notify_failure(&e, operation),
        }
    }

    /// delete
    ///
    /// Deletes post `id` once confirmed, then re-fetches. A declined prompt does
    /// nothing at all.
    pub async fn delete(&mut self, id: &str, confirmation: Confirmation) {
        let Viewer::Authorized(admin) = &self.viewer else {
            return;
        };
        match self.posts.delete(admin, id, confirmation).await {
            Ok(()) => {
                self.notifications.push(Notification::post_deleted());
                if self.editor.editing_id() == Some(id) {
                    self.editor.reset();
                }
                self.refresh().await;
            }
            Err(e) => self.notify_failure(&e, PostOperation::Delete),
        }
    }

    fn notify_failure(&mut self, error: &crate::posts::PostError, operation: PostOperation) {
        if let Some(notification) = error.notification(operation) {
            self.notifications.push(notification);
        }
    }

    // --- View ---

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn is_authorized(&self) -> bool {
        matches!(self.viewer, Viewer::Authorized(_))
    }

    pub fn posts(&self) -> &[BlogPost] {
        &self.list
    }

    /// The rendered list rows, newest first.
    pub fn summaries(&self) -> Vec<PostSummary> {
        self.list.iter().map(PostSummary::from).collect()
    }

    pub fn navigation(&self) -> Option<Route> {
        self.navigation
    }

    /// Drains the pending notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}
