//! Integration tests for provider-initiated backchannel logout.

use http::StatusCode;

use crate::helpers::{TestApp, make_logout_token};

#[tokio::test]
async fn test_backchannel_logout_removes_session() {
    let app = TestApp::new().await;
    let cookie = app.login_as(serde_json::json!({"sub": "user-1"})).await;

    let token = make_logout_token("user-1");
    let response = app
        .post_form(
            "/auth/backchannel-logout",
            &format!("logout_token={token}"),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "success");

    assert!(!app.state.sessions.contains("user-1"));

    // The browser still has its cookie identity but the session is gone.
    let user = app.get("/api/user", Some(&cookie)).await;
    assert_eq!(user.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_backchannel_logout_is_idempotent() {
    let app = TestApp::new().await;
    app.login_as(serde_json::json!({"sub": "user-1"})).await;

    let token = make_logout_token("user-1");
    for _ in 0..2 {
        let response = app
            .post_form(
                "/auth/backchannel-logout",
                &format!("logout_token={token}"),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["status"], "success");
    }
}

#[tokio::test]
async fn test_backchannel_logout_flips_session_status() {
    let app = TestApp::new().await;
    let cookie = app.login_as(serde_json::json!({"sub": "user-1"})).await;

    let before = app.get("/api/session-status", Some(&cookie)).await;
    assert_eq!(before.body["authenticated"], true);
    assert_eq!(before.body["sessionActive"], true);

    let token = make_logout_token("user-1");
    app.post_form(
        "/auth/backchannel-logout",
        &format!("logout_token={token}"),
        None,
    )
    .await;

    let after = app.get("/api/session-status", Some(&cookie)).await;
    assert_eq!(after.body["authenticated"], true);
    assert_eq!(after.body["sessionActive"], false);
}

#[tokio::test]
async fn test_backchannel_logout_requires_token_field() {
    let app = TestApp::new().await;
    let response = app
        .post_form("/auth/backchannel-logout", "unrelated=1", None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION");
}

#[tokio::test]
async fn test_backchannel_logout_rejects_garbage_token() {
    let app = TestApp::new().await;
    let response = app
        .post_form(
            "/auth/backchannel-logout",
            "logout_token=not-a-jwt",
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "MALFORMED_TOKEN");
}

#[tokio::test]
async fn test_backchannel_probe_answers_get() {
    let app = TestApp::new().await;
    let response = app.get("/auth/backchannel-logout", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["message"].is_string());
}
