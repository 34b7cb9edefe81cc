//! Integration test harness for the Donghang site.
//!
//! Drives the real router from `donghang_site::app` in-process with
//! `tower::ServiceExt::oneshot`, backed by a `MemoryInquiryStore` (or a
//! [`FailingInquiryStore`] for outage tests). No server or database is
//! needed; [`webhook_receiver`] stands in for the chat webhook.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p donghang-integration-tests
//! ```

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, header},
    routing::post,
};
use secrecy::SecretString;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use donghang_core::{InquiryId, NewInquiry};
use donghang_site::config::{AdminConfig, SiteConfig, StoreConfig};
use donghang_site::db::{InquiryRow, InquiryStore, MemoryInquiryStore, StoreError};
use donghang_site::state::AppState;

/// Admin password used by every test app.
pub const ADMIN_PASSWORD: &str = "test-admin-password";

/// A router over an in-memory store, plus the cookie jar of one browser.
pub struct TestApp {
    router: Router,
    /// Direct handle on the rows, for asserting "no record was created".
    pub store: MemoryInquiryStore,
    cookie: Option<String>,
}

/// What a test sees of a response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, `Value::Null` for empty or non-JSON bodies.
    pub json: Value,
    pub text: String,
}

impl TestResponse {
    /// The `Set-Cookie` header, if any.
    #[must_use]
    pub fn set_cookie(&self) -> Option<&str> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// App with notifications disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::with_webhook(None)
    }

    /// App posting notifications to `webhook_url`.
    #[must_use]
    pub fn with_webhook(webhook_url: Option<&str>) -> Self {
        let store = MemoryInquiryStore::new();
        let backend = Arc::new(store.clone());
        Self::build(store, backend, webhook_url)
    }

    /// App whose store rejects every call, posting notifications to
    /// `webhook_url`. `store` stays empty.
    #[must_use]
    pub fn with_failing_store(webhook_url: Option<&str>) -> Self {
        Self::build(
            MemoryInquiryStore::new(),
            Arc::new(FailingInquiryStore),
            webhook_url,
        )
    }

    fn build(
        store: MemoryInquiryStore,
        backend: Arc<dyn InquiryStore>,
        webhook_url: Option<&str>,
    ) -> Self {
        let state = AppState::new(test_config(webhook_url), backend);

        Self {
            router: donghang_site::app(state),
            store,
            cookie: None,
        }
    }

    /// Send a request with this app's cookie, if it has one.
    ///
    /// # Panics
    ///
    /// Panics if the request can't be built or the router fails.
    pub async fn request(&self, method: Method, uri: &str, body: Option<&Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        self.send(request).await
    }

    /// Send a raw JSON-typed body (for malformed payloads).
    ///
    /// # Panics
    ///
    /// Panics if the request can't be built or the router fails.
    pub async fn request_raw(&self, method: Method, uri: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .expect("valid request");

        self.send(request).await
    }

    /// Log in with `password` and keep the session cookie on success.
    pub async fn login_with(&mut self, password: &str) -> TestResponse {
        let response = self
            .request(
                Method::POST,
                "/api/admin/auth",
                Some(&serde_json::json!({ "password": password })),
            )
            .await;

        if response.status.is_success() {
            self.cookie = response
                .set_cookie()
                .and_then(|c| c.split(';').next())
                .map(str::to_owned);
        }
        response
    }

    /// Log in with the correct password.
    pub async fn login(&mut self) -> TestResponse {
        self.login_with(ADMIN_PASSWORD).await
    }

    /// Replace the cookie header sent with each request.
    pub fn set_cookie_header(&mut self, cookie: Option<&str>) {
        self.cookie = cookie.map(str::to_owned);
    }

    /// Submit an inquiry through the public API.
    pub async fn submit(&self, name: &str, phone: &str, inquiry: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/inquiry",
            Some(&serde_json::json!({ "name": name, "phone": phone, "inquiry": inquiry })),
        )
        .await
    }

    /// Fetch the inbox as JSON.
    pub async fn list(&self) -> TestResponse {
        self.request(Method::GET, "/api/inquiries", None).await
    }

    /// Mark an inquiry as read.
    pub async fn mark_read(&self, id: &str) -> TestResponse {
        self.request(
            Method::PATCH,
            "/api/inquiries",
            Some(&serde_json::json!({ "id": id, "action": "markAsRead" })),
        )
        .await
    }

    /// Delete an inquiry.
    pub async fn delete(&self, id: &str) -> TestResponse {
        self.request(Method::DELETE, &format!("/api/inquiries?id={id}"), None)
            .await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            json,
            text,
        }
    }
}

/// Store whose every call fails the way an unavailable REST API does.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingInquiryStore;

/// Detail carried by [`FailingInquiryStore`] errors; must never reach clients.
pub const STORE_FAILURE_DETAIL: &str = "upstream connection refused";

impl FailingInquiryStore {
    fn error() -> StoreError {
        StoreError::Api {
            status: 503,
            message: STORE_FAILURE_DETAIL.to_string(),
        }
    }
}

#[async_trait]
impl InquiryStore for FailingInquiryStore {
    async fn insert(&self, _new: &NewInquiry) -> Result<InquiryRow, StoreError> {
        Err(Self::error())
    }

    async fn list(&self) -> Result<Vec<InquiryRow>, StoreError> {
        Err(Self::error())
    }

    async fn mark_read(&self, _id: InquiryId) -> Result<bool, StoreError> {
        Err(Self::error())
    }

    async fn delete(&self, _id: InquiryId) -> Result<bool, StoreError> {
        Err(Self::error())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(Self::error())
    }
}

/// Start a local webhook that forwards each posted JSON body to a channel and
/// answers with `status`. Returns the webhook URL.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn webhook_receiver(status: StatusCode) -> (String, mpsc::UnboundedReceiver<Value>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let router = Router::new()
        .route(
            "/webhook",
            post(
                move |State(tx): State<mpsc::UnboundedSender<Value>>, Json(body): Json<Value>| async move {
                    // Receiver may be gone once the test has its answer
                    tx.send(body).ok();
                    status
                },
            ),
        )
        .with_state(tx);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local port");
    let addr = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    (format!("http://{addr}/webhook"), rx)
}

/// Configuration for tests: in-memory store, fixed password, no Sentry.
#[must_use]
pub fn test_config(webhook_url: Option<&str>) -> SiteConfig {
    SiteConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        site_name: "동행콜센터".to_string(),
        // Unused: the memory store is injected directly
        store: StoreConfig::Postgres {
            database_url: SecretString::from("postgres://unused".to_string()),
        },
        admin: AdminConfig {
            password: SecretString::from(ADMIN_PASSWORD.to_string()),
            session_secret: None,
            secure_cookies: false,
        },
        notify_webhook_url: webhook_url.map(|url| SecretString::from(url.to_string())),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}
