use std::sync::Arc;
use thiserror::Error;

use crate::{
    backend::{BackendError, DataStore},
    guard::AdminSession,
    models::{BlogPost, BlogPostChanges, NewBlogPost, PostForm},
    notify::Notification,
    validation::{BlogPostValidator, FieldError},
};

/// Confirmation
///
/// The user's answer to the delete prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

/// PostError
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PostError {
    /// First failing validation rule; nothing was sent.
    #[error("{}", .0.message)]
    Validation(FieldError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The user declined the delete prompt; nothing was sent.
    #[error("delete not confirmed")]
    ConfirmationDeclined,
}

/// PostOperation
///
/// Which facade call failed; decides the generic failure copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOperation {
    List,
    Create,
    Update,
    Delete,
}

impl PostError {
    /// The notification shown when `operation` fails with this error, or `None`
    /// when the failure is silent (a declined delete).
    pub fn notification(&self, operation: PostOperation) -> Option<Notification> {
        match (self, operation) {
            (PostError::ConfirmationDeclined, _) => None,
            (PostError::Validation(error), _) => {
                Some(Notification::validation_failed(error.message.clone()))
            }
            (PostError::Backend(_), PostOperation::List) => Some(Notification::list_failed()),
            (PostError::Backend(_), PostOperation::Delete) => Some(Notification::delete_failed()),
            (PostError::Backend(e), PostOperation::Create | PostOperation::Update) => {
                Some(Notification::backend_error(e.message()))
            }
        }
    }
}

/// PostService
///
/// Facade over the remote `blog_posts` table. Every mutation is validated (where it
/// carries content) before anything goes over the wire.
#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn DataStore>,
    validator: BlogPostValidator,
}

impl PostService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            validator: BlogPostValidator::default(),
        }
    }

    /// list
    ///
    /// All posts, newest first. No pagination.
    pub async fn list(&self, viewer: &AdminSession) -> Result<Vec<BlogPost>, PostError> {
        let posts = self
            .store
            .list_posts(viewer.access_token())
            .await
            .inspect_err(|e| tracing::error!("list_posts error: {}", e))?;
        Ok(posts)
    }

    /// create
    ///
    /// Validates `form` and inserts it with the viewer as author.
    pub async fn create(&self, viewer: &AdminSession, form: &PostForm) -> Result<(), PostError> {
        self.validate(form)?;

        let post = NewBlogPost {
            title: form.title.clone(),
            slug: form.slug.clone(),
            excerpt: form.optional_excerpt(),
            content: form.content.clone(),
            cover_image: form.optional_cover_image(),
            published: form.published,
            author_id: viewer.user_id(),
        };

        self.store
            .insert_post(viewer.access_token(), post)
            .await
            .inspect_err(|e| tracing::error!("insert_post error: {}", e))?;

        tracing::info!(user_id = %viewer.user_id(), slug = %form.slug, "blog post created");
        Ok(())
    }

    /// update
    ///
    /// Validates `form` and rewrites the editable columns of post `id`. Author and
    /// creation time are left alone.
    pub async fn update(
        &self,
        viewer: &AdminSession,
        id: &str,
        form: &PostForm,
    ) -> Result<(), PostError> {
        self.validate(form)?;

        let changes = BlogPostChanges {
            title: form.title.clone(),
            slug: form.slug.clone(),
            excerpt: form.optional_excerpt(),
            content: form.content.clone(),
            cover_image: form.optional_cover_image(),
            published: form.published,
        };

        self.store
            .update_post(viewer.access_token(), id, changes)
            .await
            .inspect_err(|e| tracing::error!(post_id = %id, "update_post error: {}", e))?;

        tracing::info!(user_id = %viewer.user_id(), post_id = %id, "blog post updated");
        Ok(())
    }

    /// delete
    ///
    /// Removes post `id`, but only once the user has confirmed.
    pub async fn delete(
        &self,
        viewer: &AdminSession,
        id: &str,
        confirmation: Confirmation,
    ) -> Result<(), PostError> {
        if confirmation == Confirmation::Declined {
            return Err(PostError::ConfirmationDeclined);
        }

        self.store
            .delete_post(viewer.access_token(), id)
            .await
            .inspect_err(|e| tracing::error!(post_id = %id, "delete_post error: {}", e))?;

        tracing::info!(user_id = %viewer.user_id(), post_id = %id, "blog post deleted");
        Ok(())
    }

    fn validate(&self, form: &PostForm) -> Result<(), PostError> {
        self.validator
            .validate(form)
            .into_result()
            .map_err(PostError::Validation)
    }
}
