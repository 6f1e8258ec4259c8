//! Integration tests for the SSE event stream.

use axum::body::{Body, BodyDataStream};
use futures::StreamExt;
use http::{Request, StatusCode, header};
use tower::ServiceExt;

use crate::helpers::{COOKIE_NAME, TestApp, make_logout_token};

/// Opens `/api/events` and returns the live body stream after asserting the
/// greeting frame.
async fn open_stream(app: &TestApp, cookie: &str) -> BodyDataStream {
    let request = Request::builder()
        .uri("/api/events")
        .header(header::COOKIE, format!("{COOKIE_NAME}={cookie}"))
        .body(Body::empty())
        .expect("build request");

    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("send request");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream")
    );

    let mut stream = response.into_body().into_data_stream();
    let first = stream.next().await.expect("greeting frame").expect("chunk");
    assert!(String::from_utf8_lossy(&first).contains("data: connected"));
    stream
}

async fn next_frame(stream: &mut BodyDataStream) -> String {
    let chunk = stream.next().await.expect("next frame").expect("chunk");
    String::from_utf8_lossy(&chunk).to_string()
}

#[tokio::test]
async fn test_stream_requires_identity() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .uri("/api/events")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_stream_greets_then_delivers_published_events() {
    let app = TestApp::new().await;
    let cookie = app.login_as(serde_json::json!({"sub": "user-1"})).await;

    let mut stream = open_stream(&app, &cookie).await;
    assert_eq!(app.state.events.subscriber_count("user-1"), 1);

    let delivered = app.state.events.publish("user-1", "session_invalidated").await;
    assert_eq!(delivered, 1);
    assert!(next_frame(&mut stream).await.contains("data: session_invalidated"));
}

#[tokio::test]
async fn test_backchannel_logout_reaches_every_stream() {
    let app = TestApp::new().await;
    let cookie = app.login_as(serde_json::json!({"sub": "user-1"})).await;

    let mut first = open_stream(&app, &cookie).await;
    let mut second = open_stream(&app, &cookie).await;
    assert_eq!(app.state.events.subscriber_count("user-1"), 2);

    let token = make_logout_token("user-1");
    let response = app
        .post_form(
            "/auth/backchannel-logout",
            &format!("logout_token={token}"),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    assert!(next_frame(&mut first).await.contains("data: session_invalidated"));
    assert!(next_frame(&mut second).await.contains("data: session_invalidated"));
}

#[tokio::test]
async fn test_dropped_stream_unsubscribes() {
    let app = TestApp::new().await;
    let cookie = app.login_as(serde_json::json!({"sub": "user-1"})).await;

    let stream = open_stream(&app, &cookie).await;
    assert_eq!(app.state.events.subscriber_count("user-1"), 1);
    drop(stream);

    // The drop guard runs synchronously, but the publish-side eviction also
    // covers the closed channel; either way the subscriber set empties.
    app.state.events.publish("user-1", "session_invalidated").await;
    assert_eq!(app.state.events.subscriber_count("user-1"), 0);
}

#[tokio::test]
async fn test_stream_opened_after_logout_still_subscribes() {
    let app = TestApp::new().await;
    let cookie = app.login_as(serde_json::json!({"sub": "user-1"})).await;

    let token = make_logout_token("user-1");
    app.post_form(
        "/auth/backchannel-logout",
        &format!("logout_token={token}"),
        None,
    )
    .await;

    // Session is gone but the cookie identity remains; the stream opens fine.
    let _stream = open_stream(&app, &cookie).await;
    assert_eq!(app.state.events.subscriber_count("user-1"), 1);
}
