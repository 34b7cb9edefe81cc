//! Integration tests for the admin session gate.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::json;

use donghang_integration_tests::TestApp;

// =============================================================================
// Login / status / logout
// =============================================================================

#[tokio::test]
async fn test_login_sets_http_only_cookie() {
    let mut app = TestApp::new();

    let response = app.login().await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json, json!({ "success": true }));

    let cookie = response.set_cookie().unwrap();
    assert!(cookie.starts_with("dh_admin=v1."));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    let status = app.request(Method::GET, "/api/admin/auth", None).await;
    assert_eq!(status.json, json!({ "authenticated": true }));
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let mut app = TestApp::new();

    let response = app.login_with("not the password").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json["error"], "비밀번호가 올바르지 않습니다.");
    assert!(response.set_cookie().is_none());

    let status = app.request(Method::GET, "/api/admin/auth", None).await;
    assert_eq!(status.json, json!({ "authenticated": false }));
}

#[tokio::test]
async fn test_missing_password_is_rejected() {
    let app = TestApp::new();
    let response = app
        .request(Method::POST, "/api/admin/auth", Some(&json!({})))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_status_when_anonymous() {
    let app = TestApp::new();
    let status = app.request(Method::GET, "/api/admin/auth", None).await;
    assert_eq!(status.status, StatusCode::OK);
    assert_eq!(status.json, json!({ "authenticated": false }));
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let mut app = TestApp::new();
    app.login().await;

    let response = app.request(Method::DELETE, "/api/admin/auth", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json, json!({ "success": true }));

    let cookie = response.set_cookie().unwrap();
    assert!(cookie.starts_with("dh_admin=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_logout_when_anonymous_succeeds() {
    let app = TestApp::new();
    let response = app.request(Method::DELETE, "/api/admin/auth", None).await;
    assert_eq!(response.status, StatusCode::OK);
}

// =============================================================================
// Inbox guard
// =============================================================================

#[tokio::test]
async fn test_inbox_requires_session_and_changes_nothing() {
    let mut app = TestApp::new();
    let created = app.submit("홍길동", "010-1234-5678", "상담 요청합니다").await;
    let id = created.json["id"].as_str().unwrap().to_string();

    for response in [
        app.list().await,
        app.mark_read(&id).await,
        app.delete(&id).await,
    ] {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.json["error"], "인증이 필요합니다.");
    }

    app.login().await;
    let list = app.list().await;
    assert_eq!(list.json.as_array().unwrap().len(), 1);
    assert_eq!(list.json[0]["isRead"], false);
}

#[tokio::test]
async fn test_unauthorized_check_runs_before_body_parsing() {
    let app = TestApp::new();
    let response = app
        .request_raw(Method::PATCH, "/api/inquiries", "{broken")
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_forged_and_tampered_cookies_are_rejected() {
    let mut app = TestApp::new();
    app.login().await;
    let list = app.list().await;
    assert_eq!(list.status, StatusCode::OK);

    for cookie in [
        "dh_admin=v1.9999999999.deadbeef",
        "dh_admin=garbage",
        "dh_admin=",
        "other=v1.1.00",
    ] {
        app.set_cookie_header(Some(cookie));
        assert_eq!(app.list().await.status, StatusCode::UNAUTHORIZED, "{cookie}");
    }
}

#[tokio::test]
async fn test_session_from_other_deployment_is_rejected() {
    let mut first = TestApp::new();
    let login = first.login().await;
    let cookie = login.set_cookie().unwrap().split(';').next().unwrap().to_string();

    // Same password, so the derived key matches and the cookie is valid
    let mut second = TestApp::new();
    second.set_cookie_header(Some(&cookie));
    assert_eq!(second.list().await.status, StatusCode::OK);

    let mut tampered = cookie.clone();
    let last = tampered.pop();
    tampered.push(if last == Some('0') { '1' } else { '0' });
    second.set_cookie_header(Some(&tampered));
    assert_eq!(second.list().await.status, StatusCode::UNAUTHORIZED);
}
