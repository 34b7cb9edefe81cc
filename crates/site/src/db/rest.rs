//! Hosted REST backend (PostgREST dialect, as served by Supabase).
//!
//! Every mutating call asks for `Prefer: return=representation`, so the
//! response body says whether a row matched: an empty array means no row with
//! that id existed.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use donghang_core::{InquiryId, NewInquiry};

use super::{InquiryRow, InsertInquiryRow, InquiryStore, StoreError};

/// Table name under `/rest/v1`.
const TABLE: &str = "inquiries";

/// Inquiry store that talks to a hosted REST API with an API key.
#[derive(Clone)]
pub struct RestInquiryStore {
    client: reqwest::Client,
    table_url: Url,
}

impl std::fmt::Debug for RestInquiryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestInquiryStore")
            .field("table_url", &self.table_url.as_str())
            .finish_non_exhaustive()
    }
}

impl RestInquiryStore {
    /// Create a new REST store client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(base_url: &Url, api_key: &SecretString) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();

        let key = api_key.expose_secret();
        let mut apikey = HeaderValue::from_str(key)
            .map_err(|e| StoreError::Config(format!("Invalid API key format: {e}")))?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| StoreError::Config(format!("Invalid API key format: {e}")))?;
        bearer.set_sensitive(true);

        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            table_url: table_url(base_url)?,
        })
    }

    /// URL of the table endpoint, filtered to a single id.
    fn url_for_id(&self, id: InquiryId) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }
}

/// `{base}/rest/v1/inquiries`, regardless of a trailing slash on `base`.
fn table_url(base_url: &Url) -> Result<Url, StoreError> {
    let base = base_url.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}/rest/v1/{TABLE}"))
        .map_err(|e| StoreError::Config(format!("Invalid store URL: {e}")))
}

/// Turn a non-success status into `StoreError::Api`, otherwise decode JSON.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let status = response.status();

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(StoreError::Api {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| StoreError::DataCorruption(e.to_string()))
}

#[async_trait]
impl InquiryStore for RestInquiryStore {
    #[instrument(skip(self, new))]
    async fn insert(&self, new: &NewInquiry) -> Result<InquiryRow, StoreError> {
        let response = self
            .request(Method::POST, self.table_url.clone())
            .header("Prefer", "return=representation")
            .json(&InsertInquiryRow::from(new))
            .send()
            .await?;

        let rows: Vec<InquiryRow> = read_json(response).await?;
        let row = rows.into_iter().next().ok_or_else(|| {
            StoreError::DataCorruption("insert returned no representation".to_string())
        })?;

        debug!(inquiry_id = %row.id, "Inquiry row inserted");
        Ok(row)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<InquiryRow>, StoreError> {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");

        let response = self.request(Method::GET, url).send().await?;
        read_json(response).await
    }

    #[instrument(skip(self), fields(inquiry_id = %id))]
    async fn mark_read(&self, id: InquiryId) -> Result<bool, StoreError> {
        let response = self
            .request(Method::PATCH, self.url_for_id(id))
            .header("Prefer", "return=representation")
            .json(&serde_json::json!({ "is_read": true }))
            .send()
            .await?;

        let rows: Vec<InquiryRow> = read_json(response).await?;
        Ok(!rows.is_empty())
    }

    #[instrument(skip(self), fields(inquiry_id = %id))]
    async fn delete(&self, id: InquiryId) -> Result<bool, StoreError> {
        let response = self
            .request(Method::DELETE, self.url_for_id(id))
            .header("Prefer", "return=representation")
            .send()
            .await?;

        let rows: Vec<InquiryRow> = read_json(response).await?;
        Ok(!rows.is_empty())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("select", "id")
            .append_pair("limit", "1");

        let response = self.request(Method::GET, url).send().await?;
        let _: Vec<serde_json::Value> = read_json(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Json, Router, extract::State, http::StatusCode, routing::any};
    use serde_json::{Value, json};
    use tokio::sync::mpsc;

    use super::*;

    /// What the hosted API saw of one request.
    #[derive(Debug)]
    struct Seen {
        method: String,
        query: String,
        apikey: Option<String>,
        authorization: Option<String>,
        prefer: Option<String>,
        body: String,
    }

    #[derive(Clone)]
    struct FakeApi {
        tx: mpsc::UnboundedSender<Seen>,
        status: StatusCode,
        body: Value,
    }

    async fn answer(
        State(api): State<FakeApi>,
        method: axum::http::Method,
        uri: axum::http::Uri,
        headers: axum::http::HeaderMap,
        body: String,
    ) -> (StatusCode, Json<Value>) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };

        api.tx
            .send(Seen {
                method: method.to_string(),
                query: uri.query().unwrap_or_default().to_owned(),
                apikey: header("apikey"),
                authorization: header("authorization"),
                prefer: header("prefer"),
                body,
            })
            .unwrap();

        (api.status, Json(api.body))
    }

    /// Serve the table endpoint locally, answering every call with `status`
    /// and `body`.
    async fn fake_api(
        status: StatusCode,
        body: Value,
    ) -> (RestInquiryStore, mpsc::UnboundedReceiver<Seen>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let router = Router::new()
            .route("/rest/v1/inquiries", any(answer))
            .with_state(FakeApi { tx, status, body });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        (store(&format!("http://{addr}")), rx)
    }

    fn row_json() -> Value {
        json!({
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "name": "홍길동",
            "phone": "010-1234-5678",
            "inquiry": "상담 요청합니다",
            "is_read": false,
            "created_at": "2026-03-01T09:30:00+00:00"
        })
    }

    fn new_inquiry() -> NewInquiry {
        NewInquiry::validate(
            Some("홍길동"),
            Some("010-1234-5678"),
            Some("상담 요청합니다"),
        )
        .unwrap()
    }

    fn id() -> InquiryId {
        InquiryId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap()
    }

    #[tokio::test]
    async fn test_insert_sends_credentials_and_returns_row() {
        let (store, mut rx) = fake_api(StatusCode::CREATED, json!([row_json()])).await;

        let row = store.insert(&new_inquiry()).await.unwrap();
        assert_eq!(row.id, id());
        assert_eq!(row.name, "홍길동");
        assert!(!row.is_read);

        let seen = rx.recv().await.unwrap();
        assert_eq!(seen.method, "POST");
        assert_eq!(seen.apikey.as_deref(), Some("anon-key"));
        assert_eq!(seen.authorization.as_deref(), Some("Bearer anon-key"));
        assert_eq!(seen.prefer.as_deref(), Some("return=representation"));

        let sent: Value = serde_json::from_str(&seen.body).unwrap();
        assert_eq!(sent["phone"], "010-1234-5678");
        assert_eq!(sent["is_read"], false);
    }

    #[tokio::test]
    async fn test_insert_without_representation_is_corruption() {
        let (store, _rx) = fake_api(StatusCode::CREATED, json!([])).await;

        let result = store.insert(&new_inquiry()).await;
        assert!(matches!(result, Err(StoreError::DataCorruption(_))));
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let (store, mut rx) = fake_api(StatusCode::OK, json!([row_json()])).await;

        let rows = store.list().await.unwrap();
        assert_eq!(rows.len(), 1);

        let seen = rx.recv().await.unwrap();
        assert_eq!(seen.method, "GET");
        assert!(seen.query.contains("order=created_at.desc"));
        assert_eq!(seen.apikey.as_deref(), Some("anon-key"));
    }

    #[tokio::test]
    async fn test_missing_row_is_reported_as_false() {
        let (store, mut rx) = fake_api(StatusCode::OK, json!([])).await;

        assert!(!store.mark_read(id()).await.unwrap());
        let seen = rx.recv().await.unwrap();
        assert_eq!(seen.method, "PATCH");
        assert_eq!(seen.query, "id=eq.67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert_eq!(seen.prefer.as_deref(), Some("return=representation"));
        assert_eq!(
            serde_json::from_str::<Value>(&seen.body).unwrap(),
            json!({ "is_read": true })
        );

        assert!(!store.delete(id()).await.unwrap());
        let seen = rx.recv().await.unwrap();
        assert_eq!(seen.method, "DELETE");
        assert_eq!(seen.prefer.as_deref(), Some("return=representation"));
    }

    #[tokio::test]
    async fn test_matched_row_is_reported_as_true() {
        let (store, _rx) = fake_api(StatusCode::OK, json!([row_json()])).await;

        assert!(store.mark_read(id()).await.unwrap());
        assert!(store.delete(id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_error_status_becomes_api_error() {
        let (store, _rx) = fake_api(
            StatusCode::UNAUTHORIZED,
            json!({ "message": "Invalid API key" }),
        )
        .await;

        match store.list().await {
            Err(StoreError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert!(message.contains("Invalid API key"));
            }
            other => panic!("expected API error, got {other:?}"),
        }
        assert!(matches!(
            store.delete(id()).await,
            Err(StoreError::Api { status: 401, .. })
        ));
        assert!(matches!(store.ping().await, Err(StoreError::Api { .. })));
    }

    #[tokio::test]
    async fn test_ping_succeeds_on_empty_table() {
        let (store, mut rx) = fake_api(StatusCode::OK, json!([])).await;

        store.ping().await.unwrap();
        assert!(rx.recv().await.unwrap().query.contains("limit=1"));
    }

    fn store(base: &str) -> RestInquiryStore {
        RestInquiryStore::new(
            &Url::parse(base).unwrap(),
            &SecretString::from("anon-key".to_string()),
        )
        .unwrap()
    }

    #[test]
    fn test_table_url() {
        for base in ["https://abc.supabase.co", "https://abc.supabase.co/"] {
            assert_eq!(
                store(base).table_url.as_str(),
                "https://abc.supabase.co/rest/v1/inquiries"
            );
        }
    }

    #[test]
    fn test_url_for_id_uses_eq_filter() {
        let store = store("https://abc.supabase.co");
        let id = InquiryId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let url = store.url_for_id(id);

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![(
                "id".to_string(),
                "eq.67e55044-10b1-426f-9247-bb680e5fe0c8".to_string()
            )]
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let store = store("https://abc.supabase.co");
        let debug_output = format!("{store:?}");
        assert!(debug_output.contains("abc.supabase.co"));
        assert!(!debug_output.contains("anon-key"));
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        let result = RestInquiryStore::new(
            &Url::parse("https://abc.supabase.co").unwrap(),
            &SecretString::from("bad\nkey".to_string()),
        );
        assert!(matches!(result, Err(StoreError::Config(_))));
    }
}
