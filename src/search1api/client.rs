use super::{Dispatch, Endpoint};
use crate::config::Config;
use crate::error::{Result, Search1ApiError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const CONNECT_TIMEOUT: u64 = 10;
const INVALID_TOKEN_DETAIL: &str = "Invalid token";

/// Authenticated JSON client for the Search1API service. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key.trim())).map_err(|_| {
            Search1ApiError::ConfigInvalid("API key contains characters not allowed in an HTTP header".into())
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(concat!("search1api-mcp/", env!("CARGO_PKG_VERSION"))));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT.min(config.timeout_secs)))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Search1ApiError::ConfigInvalid(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Single POST attempt; never retried.
    pub async fn post(&self, endpoint: Endpoint, payload: &Value) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint.path());
        let start = Instant::now();

        let resp = self.client.post(&url).json(payload).send().await.map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| self.transport_error(e))?;

        debug!(
            "POST {} -> {} in {}ms",
            endpoint,
            status.as_u16(),
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            let err = classify_failure(status.as_u16(), String::from_utf8_lossy(&body).into_owned());
            warn!("Search1API {} failed: {}", endpoint, err);
            return Err(err);
        }

        serde_json::from_slice(&body).map_err(|e| Search1ApiError::Decode {
            message: e.to_string(),
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> Search1ApiError {
        if e.is_timeout() { Search1ApiError::Timeout(self.timeout_secs) } else { Search1ApiError::Network(e) }
    }
}

#[async_trait]
impl Dispatch for ApiClient {
    async fn send(&self, endpoint: Endpoint, payload: Value) -> Result<Value> {
        self.post(endpoint, &payload).await
    }
}

/// Only a 403 whose JSON `detail` reads "Invalid token" is an authentication
/// failure; other 403 causes stay generic.
fn classify_failure(status: u16, body: String) -> Search1ApiError {
    if status == 403 && is_invalid_token(&body) {
        return Search1ApiError::Authentication("Invalid API token".into());
    }
    Search1ApiError::Http { status, message: body }
}

fn is_invalid_token(body: &str) -> bool {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(|d| d == INVALID_TOKEN_DETAIL))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, timeout_secs: u64) -> ApiClient {
        let config = Config::resolve_with(Some("test_api_key".into()), |_| None)
            .unwrap()
            .with_api_url(&server.uri())
            .unwrap()
            .with_timeout(timeout_secs)
            .unwrap();
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn classifies_invalid_token_only_on_403() {
        let body = r#"{"detail": "Invalid token"}"#;
        assert!(classify_failure(403, body.into()).is_authentication());
        assert!(matches!(classify_failure(401, body.into()), Search1ApiError::Http { status: 401, .. }));
        assert!(matches!(
            classify_failure(403, r#"{"detail": "Quota exceeded"}"#.into()),
            Search1ApiError::Http { status: 403, .. }
        ));
        assert!(matches!(classify_failure(403, "Forbidden".into()), Search1ApiError::Http { status: 403, .. }));
    }

    #[test]
    fn rejects_key_unusable_as_header() {
        let config = Config::resolve_with(Some("bad\nkey".into()), |_| None).unwrap();
        let err = ApiClient::new(&config).unwrap_err();
        assert!(matches!(err, Search1ApiError::ConfigInvalid(_)));
    }

    #[tokio::test]
    async fn posts_authenticated_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("authorization", "Bearer test_api_key"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"query": "rust"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .expect(1)
            .mount(&server)
            .await;

        let body = client_for(&server, 5).post(Endpoint::Search, &json!({"query": "rust"})).await.unwrap();
        assert_eq!(body, json!({"results": []}));
    }

    #[tokio::test]
    async fn invalid_token_is_an_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/news"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({"detail": "Invalid token"})))
            .mount(&server)
            .await;

        let err = client_for(&server, 5).post(Endpoint::News, &json!({"query": "q"})).await.unwrap_err();
        assert!(err.is_authentication(), "got {err:?}");
    }

    #[tokio::test]
    async fn other_forbidden_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({"detail": "Plan does not include news"})))
            .mount(&server)
            .await;

        let err = client_for(&server, 5).post(Endpoint::News, &json!({"query": "q"})).await.unwrap_err();
        match err {
            Search1ApiError::Http { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("Plan does not include news"));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = client_for(&server, 5).post(Endpoint::Crawl, &json!({"url": "https://example.com"})).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn malformed_success_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server, 5).post(Endpoint::Search, &json!({"query": "q"})).await.unwrap_err();
        match err {
            Search1ApiError::Decode { body, .. } => assert_eq!(body, "<html>oops</html>"),
            other => panic!("expected Decode error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_utf8_success_body_is_decode_error() {
        let server = MockServer::start().await;
        let mut raw = br#"{"title": ""#.to_vec();
        raw.extend_from_slice(&[0xff, 0xfe]);
        raw.extend_from_slice(br#""}"#);
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(raw, "application/json"))
            .mount(&server)
            .await;

        let err = client_for(&server, 5).post(Endpoint::Search, &json!({"query": "q"})).await.unwrap_err();
        assert!(matches!(err, Search1ApiError::Decode { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"results": []}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, 1).post(Endpoint::Search, &json!({"query": "q"})).await.unwrap_err();
        assert!(matches!(err, Search1ApiError::Timeout(1)), "got {err:?}");
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = Config::resolve_with(Some("test_api_key".into()), |_| None)
            .unwrap()
            .with_api_url(&format!("http://127.0.0.1:{port}"))
            .unwrap()
            .with_timeout(5)
            .unwrap();
        let client = ApiClient::new(&config).unwrap();

        let err = client.post(Endpoint::Search, &json!({"query": "q"})).await.unwrap_err();
        assert!(matches!(err, Search1ApiError::Network(_)), "got {err:?}");
    }
}
