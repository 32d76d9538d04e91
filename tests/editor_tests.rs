use kopi_keliling_admin::{
    editor::{EditorMode, PostEditor, Submission},
    models::PostForm,
};

mod common;
use common::{day, sample_post};

#[test]
fn test_title_change_regenerates_slug() {
    let mut editor = PostEditor::new();

    editor.set_title("Kopi Susu Premium!");

    assert_eq!(editor.form().slug, "kopi-susu-premium");
}

#[test]
fn test_manual_slug_is_overwritten_by_next_title_change() {
    let mut editor = PostEditor::new();
    editor.set_title("Kopi Susu");
    editor.set_slug("slug-pilihan-saya");
    assert_eq!(editor.form().slug, "slug-pilihan-saya");

    editor.set_title("Kopi Susu Aren");

    assert_eq!(editor.form().slug, "kopi-susu-aren");
}

#[test]
fn test_begin_edit_copies_every_field_and_blanks_absent_ones() {
    let mut editor = PostEditor::new();
    let mut post = sample_post("p-9", "Es Kopi", day(2026, 6, 1));
    post.excerpt = None;
    post.published = true;

    editor.begin_edit(&post);

    assert_eq!(
        *editor.mode(),
        EditorMode::Edit {
            id: "p-9".to_string()
        }
    );
    let form = editor.form();
    assert_eq!(form.title, "Es Kopi");
    assert_eq!(form.slug, post.slug);
    assert_eq!(form.excerpt, "");
    assert_eq!(form.content, post.content);
    assert_eq!(form.cover_image, "");
    assert!(form.published);
}

#[test]
fn test_submission_follows_mode() {
    let mut editor = PostEditor::new();
    editor.set_title("Kopi");
    assert!(matches!(editor.submission(), Submission::Create(form) if form.title == "Kopi"));

    editor.begin_edit(&sample_post("p-1", "Teh", day(2026, 6, 1)));
    match editor.submission() {
        Submission::Update { id, form } => {
            assert_eq!(id, "p-1");
            assert_eq!(form.title, "Teh");
        }
        other => panic!("expected update, got {:?}", other),
    }
}

#[test]
fn test_reset_returns_to_empty_create_form() {
    let mut editor = PostEditor::new();
    editor.begin_edit(&sample_post("p-1", "Teh", day(2026, 6, 1)));
    editor.set_cover_image("https://example.com/teh.jpg");

    editor.reset();

    assert_eq!(*editor.form(), PostForm::default());
    assert_eq!(*editor.mode(), EditorMode::Create);
    assert!(!editor.is_editing());
}
