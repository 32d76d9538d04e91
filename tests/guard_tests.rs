use kopi_keliling_admin::{GuardError, SessionGuard, models::Role};

mod common;
use common::{allowed_roles, fixture};

#[tokio::test]
async fn test_missing_token_is_unauthenticated() {
    let fx = fixture().await;
    let guard = SessionGuard::new(&fx.backend, allowed_roles());

    assert_eq!(guard.authorize(None).await, Err(GuardError::Unauthenticated));
    assert_eq!(guard.authorize(Some("")).await, Err(GuardError::Unauthenticated));
    // No role query without a session.
    assert_eq!(fx.store.calls(), 0);
}

#[tokio::test]
async fn test_unknown_token_is_unauthenticated() {
    let fx = fixture().await;
    let guard = SessionGuard::new(&fx.backend, allowed_roles());

    let result = guard.authorize(Some("not-a-session")).await;
    assert_eq!(result, Err(GuardError::Unauthenticated));
}

#[tokio::test]
async fn test_admin_role_is_granted() {
    let fx = fixture().await;
    let guard = SessionGuard::new(&fx.backend, allowed_roles());

    let admin = guard
        .authorize(Some(&fx.admin.access_token))
        .await
        .expect("admin should pass the guard");
    assert_eq!(admin.user_id(), fx.admin_id);
    assert_eq!(admin.roles, vec![Role::admin()]);
}

#[tokio::test]
async fn test_owner_role_is_granted() {
    let fx = fixture().await;
    fx.memory.grant_role(fx.visitor_id, Role::owner()).await;
    let guard = SessionGuard::new(&fx.backend, allowed_roles());

    let owner = guard.authorize(Some(&fx.visitor.access_token)).await.unwrap();
    assert_eq!(owner.roles, vec![Role::owner()]);
}

#[tokio::test]
async fn test_valid_session_without_role_is_denied() {
    let fx = fixture().await;
    let guard = SessionGuard::new(&fx.backend, allowed_roles());

    let result = guard.authorize(Some(&fx.visitor.access_token)).await;
    assert_eq!(result, Err(GuardError::AccessDenied(fx.visitor_id)));
}

#[tokio::test]
async fn test_role_outside_allow_list_is_denied() {
    let fx = fixture().await;
    fx.memory.grant_role(fx.visitor_id, Role::new("editor")).await;
    let guard = SessionGuard::new(&fx.backend, allowed_roles());

    let result = guard.authorize(Some(&fx.visitor.access_token)).await;
    assert!(matches!(result, Err(GuardError::AccessDenied(_))));
}

#[tokio::test]
async fn test_custom_allow_list() {
    let fx = fixture().await;
    fx.memory.grant_role(fx.visitor_id, Role::new("editor")).await;
    let guard = SessionGuard::new(&fx.backend, vec![Role::new("editor")]);

    assert!(guard.authorize(Some(&fx.visitor.access_token)).await.is_ok());
    // "admin" is not in this allow-list.
    assert!(matches!(
        guard.authorize(Some(&fx.admin.access_token)).await,
        Err(GuardError::AccessDenied(_))
    ));
}

#[tokio::test]
async fn test_role_query_failure_is_not_access_denied() {
    let fx = fixture().await;
    fx.store.fail("roles");
    let guard = SessionGuard::new(&fx.backend, allowed_roles());

    let result = guard.authorize(Some(&fx.admin.access_token)).await;
    assert!(
        matches!(result, Err(GuardError::Backend(_))),
        "transient failure must not read as denial, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_signed_out_session_is_unauthenticated() {
    use kopi_keliling_admin::AuthProvider;

    let fx = fixture().await;
    fx.memory.sign_out(&fx.admin.access_token).await.unwrap();
    let guard = SessionGuard::new(&fx.backend, allowed_roles());

    let result = guard.authorize(Some(&fx.admin.access_token)).await;
    assert_eq!(result, Err(GuardError::Unauthenticated));
}
