use crate::{
    models::{BlogPost, PostForm},
    slug::generate_slug,
};

/// EditorMode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Create,
    Edit { id: String },
}

/// Submission
///
/// What a submit of the current form should do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Submission<'a> {
    Create(&'a PostForm),
    Update { id: &'a str, form: &'a PostForm },
}

/// PostEditor
///
/// Client-side form state for creating or editing one post. Pure state
/// transitions; validation only happens when the form is submitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostEditor {
    mode: EditorMode,
    form: PostForm,
}

impl PostEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &PostForm {
        &self.form
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn editing_id(&self) -> Option<&str> {
        match &self.mode {
            EditorMode::Edit { id } => Some(id),
            EditorMode::Create => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id().is_some()
    }

    /// Sets the title and regenerates the slug from it. A slug typed by hand is
    /// overwritten by the next title change.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title = title.into();
        self.form.slug = generate_slug(&self.form.title);
    }

    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.form.slug = slug.into();
    }

    pub fn set_excerpt(&mut self, excerpt: impl Into<String>) {
        self.form.excerpt = excerpt.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.form.content = content.into();
    }

    pub fn set_cover_image(&mut self, url: impl Into<String>) {
        self.form.cover_image = url.into();
    }

    pub fn set_published(&mut self, published: bool) {
        self.form.published = published;
    }

    /// Enters edit mode for `post`, copying every field into the form.
    pub fn begin_edit(&mut self, post: &BlogPost) {
        self.mode = EditorMode::Edit {
            id: post.id.clone(),
        };
        self.form = PostForm::from_post(post);
    }

    /// Clears the form to empty defaults and leaves edit mode.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn submission(&self) -> Submission<'_> {
        match &self.mode {
            EditorMode::Create => Submission::Create(&self.form),
            EditorMode::Edit { id } => Submission::Update {
                id,
                form: &self.form,
            },
        }
    }
}
