use kopi_keliling_admin::{
    AdminSession, Confirmation, PostService, SessionGuard,
    models::PostForm,
    notify::Notification,
    posts::{PostError, PostOperation},
    validation::Field,
};

mod common;
use common::{Fixture, allowed_roles, day, fixture, sample_post};

async fn admin_session(fx: &Fixture) -> AdminSession {
    SessionGuard::new(&fx.backend, allowed_roles())
        .authorize(Some(&fx.admin.access_token))
        .await
        .unwrap()
}

fn form(title: &str) -> PostForm {
    PostForm {
        title: title.to_string(),
        slug: kopi_keliling_admin::slug::generate_slug(title),
        excerpt: String::new(),
        content: format!("Cerita tentang {}", title),
        cover_image: String::new(),
        published: false,
    }
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let fx = fixture().await;
    fx.memory.seed_post(sample_post("old", "Lama", day(2026, 1, 1))).await;
    fx.memory.seed_post(sample_post("new", "Baru", day(2026, 9, 1))).await;
    fx.memory.seed_post(sample_post("mid", "Tengah", day(2026, 5, 1))).await;
    let admin = admin_session(&fx).await;

    let posts = PostService::new(fx.store.clone()).list(&admin).await.unwrap();
    let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}

#[tokio::test]
async fn test_create_sets_author_and_normalizes_optional_fields() {
    let fx = fixture().await;
    let admin = admin_session(&fx).await;
    let service = PostService::new(fx.store.clone());

    let mut input = form("Kopi Susu Premium");
    input.excerpt = "Manis dan creamy".to_string();
    service.create(&admin, &input).await.unwrap();

    let posts = service.list(&admin).await.unwrap();
    assert_eq!(posts.len(), 1);
    let created = &posts[0];
    assert_eq!(created.author_id, Some(fx.admin_id));
    assert_eq!(created.slug, "kopi-susu-premium");
    assert_eq!(created.excerpt.as_deref(), Some("Manis dan creamy"));
    assert_eq!(created.cover_image, None, "empty cover image is stored as absent");
    assert!(!created.published);
}

#[tokio::test]
async fn test_oversized_content_is_rejected_before_any_call() {
    let fx = fixture().await;
    let admin = admin_session(&fx).await;
    let calls_before = fx.store.calls();

    let mut input = form("Terlalu Panjang");
    input.content = "k".repeat(50_001);
    let result = PostService::new(fx.store.clone()).create(&admin, &input).await;

    match result {
        Err(PostError::Validation(error)) => {
            assert_eq!(error.field, Field::Content);
            assert_eq!(error.message, "Konten terlalu panjang");
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(fx.store.calls(), calls_before, "no network call on invalid input");
}

#[tokio::test]
async fn test_empty_title_is_rejected_before_any_call() {
    let fx = fixture().await;
    let admin = admin_session(&fx).await;
    let calls_before = fx.store.calls();

    let mut input = form("");
    input.slug = "ada-slug".to_string();
    let result = PostService::new(fx.store.clone()).create(&admin, &input).await;

    let error = result.unwrap_err();
    assert_eq!(error.to_string(), "Judul harus diisi");
    assert_eq!(
        error.notification(PostOperation::Create),
        Some(Notification::validation_failed("Judul harus diisi"))
    );
    assert_eq!(fx.store.calls(), calls_before);
}

#[tokio::test]
async fn test_update_keeps_author_and_creation_time() {
    let fx = fixture().await;
    let original = sample_post("p-1", "Kopi Lama", day(2026, 2, 14));
    fx.memory.seed_post(original.clone()).await;
    let admin = admin_session(&fx).await;
    let service = PostService::new(fx.store.clone());

    let mut input = form("Kopi Baru");
    input.published = true;
    service.update(&admin, "p-1", &input).await.unwrap();

    let updated = &service.list(&admin).await.unwrap()[0];
    assert_eq!(updated.title, "Kopi Baru");
    assert_eq!(updated.slug, "kopi-baru");
    assert!(updated.published);
    assert_eq!(updated.excerpt, None, "cleared excerpt is written as absent");
    assert_eq!(updated.author_id, original.author_id);
    assert_eq!(updated.created_at, original.created_at);
}

#[tokio::test]
async fn test_update_validates_like_create() {
    let fx = fixture().await;
    fx.memory.seed_post(sample_post("p-1", "Kopi", day(2026, 2, 14))).await;
    let admin = admin_session(&fx).await;
    let calls_before = fx.store.calls();

    let mut input = form("Kopi");
    input.cover_image = "bukan url".to_string();
    let result = PostService::new(fx.store.clone())
        .update(&admin, "p-1", &input)
        .await;

    assert!(matches!(result, Err(PostError::Validation(ref e)) if e.message == "URL gambar tidak valid"));
    assert_eq!(fx.store.calls(), calls_before);
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let fx = fixture().await;
    fx.memory.seed_post(sample_post("p-1", "Kopi", day(2026, 2, 14))).await;
    let admin = admin_session(&fx).await;
    let calls_before = fx.store.calls();
    let service = PostService::new(fx.store.clone());

    let result = service.delete(&admin, "p-1", Confirmation::Declined).await;

    assert_eq!(result, Err(PostError::ConfirmationDeclined));
    assert_eq!(result.unwrap_err().notification(PostOperation::Delete), None);
    assert_eq!(fx.store.calls(), calls_before);
    assert_eq!(service.list(&admin).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_confirmed_delete_removes_post() {
    let fx = fixture().await;
    fx.memory.seed_post(sample_post("p-1", "Kopi", day(2026, 2, 14))).await;
    fx.memory.seed_post(sample_post("p-2", "Teh", day(2026, 2, 15))).await;
    let admin = admin_session(&fx).await;
    let service = PostService::new(fx.store.clone());

    service.delete(&admin, "p-1", Confirmation::from(true)).await.unwrap();

    let ids: Vec<String> = service.list(&admin).await.unwrap().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec!["p-2".to_string()]);
}

#[tokio::test]
async fn test_backend_errors_map_to_operation_copy() {
    let fx = fixture().await;
    let admin = admin_session(&fx).await;
    let service = PostService::new(fx.store.clone());

    fx.store.fail("list");
    let list_err = service.list(&admin).await.unwrap_err();
    assert_eq!(list_err.notification(PostOperation::List), Some(Notification::list_failed()));

    fx.store.fail("insert");
    let insert_err = service.create(&admin, &form("Kopi")).await.unwrap_err();
    // Create/update pass the backend's own message through.
    assert_eq!(
        insert_err.notification(PostOperation::Create),
        Some(Notification::destructive("Error", "insert unavailable"))
    );

    fx.store.fail("delete");
    let delete_err = service
        .delete(&admin, "p-1", Confirmation::Confirmed)
        .await
        .unwrap_err();
    assert_eq!(
        delete_err.notification(PostOperation::Delete),
        Some(Notification::delete_failed())
    );
}

#[tokio::test]
async fn test_backend_constraint_message_is_passed_through() {
    let fx = fixture().await;
    let admin = admin_session(&fx).await;
    let service = PostService::new(fx.store.clone());

    service.create(&admin, &form("Kopi Tubruk")).await.unwrap();
    let duplicate = service.create(&admin, &form("Kopi Tubruk")).await.unwrap_err();

    let notification = duplicate.notification(PostOperation::Create).unwrap();
    assert_eq!(notification.title, "Error");
    assert!(notification.description.contains("duplicate key value"));
}
