mod support;

use std::sync::Arc;

use serde_json::json;
use service::api::ApiError;
use service::controllers::{ControllerError, NoticeKind};
use service::guard::Route;
use service::storage::{FileStorage, LocalStorage, ACCESS_TOKEN_KEY, STATE_KEY, USER_SNAPSHOT_KEY};
use support::{login_body, policy_json, StubBackend};
use uuid::Uuid;

#[tokio::test]
async fn login_persists_token_then_session_and_routes_home() -> anyhow::Result<()> {
    let stub = StubBackend::start().await?;
    stub.on("POST", "/auth/login", 200, login_body("1", "user"));
    let (app, storage) = stub.app().await?;

    let nav = app.login("john@x.com", "secret").await?;
    assert_eq!(nav.route, Route::Dashboard);
    assert_eq!(nav.route.path(), "/dashboard");
    assert_eq!(nav.notice.description, "Welcome back, John!");

    let session = app.store().session();
    assert!(session.is_authenticated);
    assert_eq!(session.user.map(|u| u.id).as_deref(), Some("1"));
    assert_eq!(storage.get_item(ACCESS_TOKEN_KEY).await?.as_deref(), Some("T"));

    let snapshot: serde_json::Value = serde_json::from_str(&storage.get_item(USER_SNAPSHOT_KEY).await?.unwrap())?;
    assert_eq!(snapshot["id"], "1");
    let doc: serde_json::Value = serde_json::from_str(&storage.get_item(STATE_KEY).await?.unwrap())?;
    assert_eq!(doc["state"]["user"]["id"], "1");
    assert_eq!(doc["state"]["isAuthenticated"], true);

    let hits = stub.hits();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].body.as_ref().unwrap()["email"], "john@x.com");
    assert!(hits[0].authorization.is_none());
    Ok(())
}

#[tokio::test]
async fn admin_login_lands_on_admin_dashboard() -> anyhow::Result<()> {
    let stub = StubBackend::start().await?;
    stub.on("POST", "/auth/login", 200, login_body("9", "admin"));
    let (app, _storage) = stub.app().await?;
    assert_eq!(app.login("aida@x.com", "pw").await?.route, Route::AdminDashboard);
    Ok(())
}

#[tokio::test]
async fn failed_login_leaves_session_anonymous() -> anyhow::Result<()> {
    let stub = StubBackend::start().await?;
    stub.on("POST", "/auth/login", 401, json!({ "message": "Invalid credentials" }));
    let (app, storage) = stub.app().await?;

    let err = app.login("john@x.com", "wrong").await.unwrap_err();
    assert!(matches!(err, ControllerError::Api(ApiError::RequestFailed { status: 401, .. })));
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(err.code(), Some(2003));
    assert!(!app.store().is_authenticated());
    assert_eq!(storage.get_item(ACCESS_TOKEN_KEY).await?, None);
    Ok(())
}

#[tokio::test]
async fn bad_credentials_on_relogin_keep_existing_session() -> anyhow::Result<()> {
    let stub = StubBackend::start().await?;
    let (app, storage) = stub.signed_in_app().await?;
    stub.on("POST", "/auth/login", 401, json!({ "message": "Invalid credentials" }));

    let err = app.login("other@x.com", "wrong").await.unwrap_err();
    assert!(matches!(&err, ControllerError::Api(e) if e.is_unauthorized()));

    let session = app.store().session();
    assert!(session.is_authenticated);
    assert_eq!(session.user.map(|u| u.id).as_deref(), Some("1"));
    assert_eq!(storage.get_item(ACCESS_TOKEN_KEY).await?.as_deref(), Some("T"));
    assert!(storage.get_item(USER_SNAPSHOT_KEY).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn invalid_login_form_never_reaches_backend() -> anyhow::Result<()> {
    let stub = StubBackend::start().await?;
    let (app, _storage) = stub.app().await?;
    let err = app.login("not-an-email", "secret").await.unwrap_err();
    assert!(matches!(err, ControllerError::Validation(_)));
    assert!(stub.hits().is_empty());
    Ok(())
}

#[tokio::test]
async fn logout_clears_locally_even_if_server_fails() -> anyhow::Result<()> {
    let stub = StubBackend::start().await?;
    let (app, storage) = stub.signed_in_app().await?;
    stub.on("POST", "/auth/logout", 500, json!({ "message": "down" }));

    let nav = app.logout().await?;
    assert_eq!(nav.route, Route::Login);
    assert_eq!(nav.notice.kind, NoticeKind::Warning);

    let session = app.store().session();
    assert!(session.user.is_none());
    assert!(!session.is_authenticated);
    assert_eq!(storage.get_item(ACCESS_TOKEN_KEY).await?, None);
    assert_eq!(storage.get_item(USER_SNAPSHOT_KEY).await?, None);

    let logout = stub.hits().into_iter().find(|h| h.path == "/auth/logout").unwrap();
    assert_eq!(logout.authorization.as_deref(), Some("Bearer T"));
    Ok(())
}

#[tokio::test]
async fn logout_success_notice() -> anyhow::Result<()> {
    let stub = StubBackend::start().await?;
    let (app, _storage) = stub.signed_in_app().await?;
    stub.on("POST", "/auth/logout", 200, json!({ "message": "ok" }));

    let nav = app.logout().await?;
    assert_eq!(nav.notice.kind, NoticeKind::Success);
    assert_eq!(nav.notice.title, "Logout successful");
    Ok(())
}

#[tokio::test]
async fn scoped_fetch_reads_user_id_from_persisted_document() -> anyhow::Result<()> {
    let stub = StubBackend::start().await?;
    let (app, storage) = stub.signed_in_app().await?;

    // persisted document loses its user while the live store keeps one
    storage
        .set_item(STATE_KEY, r#"{"state":{"user":null,"isAuthenticated":true,"policies":[],"claims":[]},"version":0}"#.into())
        .await?;
    assert!(app.store().current_user().is_some());

    let err = app.api().my_policies().await.unwrap_err();
    assert!(matches!(err, ApiError::UserIdMissing));
    assert_eq!(err.to_string(), "User ID not found");
    assert_eq!(stub.hits_for("GET", "/policies/user/1"), 0);
    Ok(())
}

#[tokio::test]
async fn rejected_token_clears_session() -> anyhow::Result<()> {
    let stub = StubBackend::start().await?;
    let (app, storage) = stub.signed_in_app().await?;
    stub.on("GET", "/policies/user/1", 401, json!({ "message": "Token expired" }));

    let err = app.policies().await.unwrap_err();
    assert!(matches!(&err, ControllerError::Api(e) if e.is_unauthorized()));
    assert!(!app.store().is_authenticated());
    assert_eq!(storage.get_item(ACCESS_TOKEN_KEY).await?, None);

    // guarded pages now redirect
    let err = app.policies().await.unwrap_err();
    assert!(matches!(err, ControllerError::Redirect(Route::Login)));
    Ok(())
}

#[tokio::test]
async fn state_survives_restart_on_file_storage() -> anyhow::Result<()> {
    let stub = StubBackend::start().await?;
    stub.on("POST", "/auth/login", 200, login_body("1", "user"));
    stub.on(
        "GET",
        "/policies/user/1",
        200,
        json!([policy_json("p1", "ACTIVE", "2025-01-01", "2026-01-01")]),
    );

    let path = std::env::temp_dir().join(format!("zurince_restart_{}.json", Uuid::new_v4()));
    let mut cfg = stub.config();
    cfg.storage.path = path.to_string_lossy().into_owned();

    let first = service::runtime::bootstrap(&cfg).await?;
    first.login("john@x.com", "secret").await?;
    first.policies().await?;
    let before = first.store().snapshot();
    drop(first);

    let second = service::runtime::bootstrap(&cfg).await?;
    assert_eq!(second.store().snapshot(), before);
    assert_eq!(second.store().policies().len(), 1);
    assert!(second.api().access_token().await.is_ok());

    let reopened: Arc<dyn LocalStorage> = Arc::new(FileStorage::open(&path).await?);
    assert_eq!(reopened.get_item(ACCESS_TOKEN_KEY).await?.as_deref(), Some("T"));

    let _ = tokio::fs::remove_file(&path).await;
    Ok(())
}
