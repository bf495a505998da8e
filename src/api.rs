// Remote hotel search API: wire types, errors, and the reqwest-backed client

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{config::ClientConfig, hotel::HotelRecord};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("API error: {status_code} - {message}")]
    ApiResponseError {
        status_code: u16,
        message: String,
        is_retryable: bool,
    },

    #[error("Decode error: {0}")]
    DecodeError(String),
}

impl ApiError {
    // Worth trying again later: the service was unreachable, slow, or failing on its side
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::NetworkError(_) | ApiError::Timeout(_) => true,
            ApiError::ApiResponseError { is_retryable, .. } => *is_retryable,
            ApiError::DecodeError(_) => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

// Body of `POST /search`. Optional fields are left out of the JSON when unset.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchParams {
    pub checkin_date: NaiveDate,
    pub checkout_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_stars: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_reviews: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adults: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<u32>,
}

impl SearchParams {
    pub fn new(checkin_date: NaiveDate, checkout_date: NaiveDate) -> Self {
        Self {
            checkin_date,
            checkout_date,
            location: None,
            max_price: None,
            min_stars: None,
            min_reviews: None,
            adults: None,
            rooms: None,
            children: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    #[serde(default)]
    pub results_count: usize,
    #[serde(default)]
    pub hotels: Vec<HotelRecord>,
    #[serde(default, deserialize_with = "lenient_echo")]
    pub search_params: Option<SearchEcho>,
}

// The echo is informational only; a malformed one must not fail the response
fn lenient_echo<'de, D>(deserializer: D) -> Result<Option<SearchEcho>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

impl SearchResponse {
    pub fn ok(hotels: Vec<HotelRecord>) -> Self {
        Self {
            success: true,
            results_count: hotels.len(),
            hotels,
            search_params: None,
        }
    }

    pub fn unsuccessful() -> Self {
        Self {
            success: false,
            results_count: 0,
            hotels: vec![],
            search_params: None,
        }
    }
}

// The backend's echo of the request it actually ran.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchEcho {
    pub checkin_date: Option<String>,
    pub checkout_date: Option<String>,
    pub location: Option<String>,
    pub adults: Option<u32>,
    pub rooms: Option<u32>,
    pub children: Option<u32>,
    pub filters: Option<EchoFilters>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EchoFilters {
    pub max_price: Option<f64>,
    pub min_stars: Option<u8>,
    pub min_reviews: Option<u32>,
}

#[async_trait]
pub trait HotelApi: Send + Sync + 'static {
    // Single best-effort search, no retry
    async fn search(&self, params: SearchParams) -> Result<SearchResponse, ApiError>;

    // Ok(false) for a non-2xx answer, Err only if the service was unreachable
    async fn health(&self) -> Result<bool, ApiError>;
}

pub struct HttpHotelApi {
    client: reqwest::Client,
    base_url: String,
    timeout_ms: Option<u64>,
}

impl HttpHotelApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_ms: config.timeout_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ApiError {
        match self.timeout_ms {
            Some(ms) if err.is_timeout() => ApiError::Timeout(ms),
            _ if err.is_decode() => ApiError::DecodeError(err.to_string()),
            _ => ApiError::NetworkError(err.to_string()),
        }
    }
}

#[async_trait]
impl HotelApi for HttpHotelApi {
    async fn search(&self, params: SearchParams) -> Result<SearchResponse, ApiError> {
        let url = format!("{}/search", self.base_url);
        debug!(%url, ?params, "sending search request");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&params)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %message, "search request rejected");
            return Err(ApiError::ApiResponseError {
                status_code: status.as_u16(),
                message,
                is_retryable: status.is_server_error(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        serde_json::from_slice::<SearchResponse>(&body)
            .map_err(|e| ApiError::DecodeError(e.to_string()))
    }

    async fn health(&self) -> Result<bool, ApiError> {
        let url = format!("{}/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        debug!(status = response.status().as_u16(), "health check answered");
        Ok(response.status().is_success())
    }
}

// Programmable in-memory backend for exercising the orchestrator
pub mod mock_server {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    pub enum MockReply {
        Respond(SearchResponse),
        Fail(ApiError),
    }

    pub enum HealthMode {
        Healthy,
        Unhealthy,
        Unreachable,
    }

    struct Scripted {
        reply: MockReply,
        delay: Duration,
    }

    pub struct MockHotelApi {
        replies: Mutex<VecDeque<Scripted>>,
        health: Mutex<HealthMode>,
        received: Mutex<Vec<SearchParams>>,
        search_count: AtomicUsize,
        health_count: AtomicUsize,
    }

    impl Default for MockHotelApi {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockHotelApi {
        pub fn new() -> Self {
            Self {
                replies: Mutex::new(VecDeque::new()),
                health: Mutex::new(HealthMode::Healthy),
                received: Mutex::new(Vec::new()),
                search_count: AtomicUsize::new(0),
                health_count: AtomicUsize::new(0),
            }
        }

        pub fn push_reply(&self, reply: MockReply) {
            self.push_delayed_reply(reply, Duration::ZERO);
        }

        // Replies are handed out in push order, each after its own delay
        pub fn push_delayed_reply(&self, reply: MockReply, delay: Duration) {
            self.replies.lock().push_back(Scripted { reply, delay });
        }

        pub fn set_health(&self, mode: HealthMode) {
            *self.health.lock() = mode;
        }

        pub fn received(&self) -> Vec<SearchParams> {
            self.received.lock().clone()
        }

        pub fn search_count(&self) -> usize {
            self.search_count.load(Ordering::SeqCst)
        }

        pub fn health_count(&self) -> usize {
            self.health_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HotelApi for MockHotelApi {
        async fn search(&self, params: SearchParams) -> Result<SearchResponse, ApiError> {
            self.search_count.fetch_add(1, Ordering::SeqCst);
            self.received.lock().push(params);

            let scripted = self.replies.lock().pop_front();
            let Some(Scripted { reply, delay }) = scripted else {
                return Ok(SearchResponse::ok(vec![]));
            };

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match reply {
                MockReply::Respond(response) => Ok(response),
                MockReply::Fail(err) => Err(err),
            }
        }

        async fn health(&self) -> Result<bool, ApiError> {
            self.health_count.fetch_add(1, Ordering::SeqCst);
            match *self.health.lock() {
                HealthMode::Healthy => Ok(true),
                HealthMode::Unhealthy => Ok(false),
                HealthMode::Unreachable => {
                    Err(ApiError::NetworkError("Service unavailable".to_string()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_hotels;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tokio_test::{assert_err, assert_ok};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // Serves exactly one HTTP exchange with a canned reply and hands back
    // the raw request it received.
    async fn one_shot_server(status: &'static str, body: String) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];

            // read headers, then as much body as Content-Length announces
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw);
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let content_length = text[..head_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if raw.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
            }

            let reply = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let _ = tx.send(String::from_utf8_lossy(&raw).into_owned());
        });

        (format!("http://{addr}"), rx)
    }

    fn client_for(base_url: String) -> HttpHotelApi {
        HttpHotelApi::new(&ClientConfig {
            base_url,
            timeout_ms: Some(5_000),
        })
        .unwrap()
    }

    #[test]
    fn test_search_params_skip_unset_fields() {
        let mut params = SearchParams::new(date(2025, 7, 1), date(2025, 7, 5));
        params.max_price = Some(1000.0);
        params.adults = Some(2);
        params.rooms = Some(1);

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "checkin_date": "2025-07-01",
                "checkout_date": "2025-07-05",
                "max_price": 1000.0,
                "adults": 2,
                "rooms": 1,
            })
        );
    }

    #[test]
    fn test_decode_full_response() {
        let body = serde_json::json!({
            "success": true,
            "search_params": {
                "checkin_date": "2025-07-01",
                "checkout_date": "2025-07-05",
                "location": "Seattle, United States",
                "adults": 2,
                "rooms": 1,
                "children": 0,
                "filters": { "max_price": 250, "min_stars": 4 }
            },
            "results_count": 6,
            "hotels": sample_hotels(),
        });

        let response: SearchResponse = serde_json::from_value(body).unwrap();
        assert!(response.success);
        assert_eq!(response.results_count, 6);
        assert_eq!(response.hotels, sample_hotels());

        let echo = response.search_params.unwrap();
        assert_eq!(echo.location.as_deref(), Some("Seattle, United States"));
        let filters = echo.filters.unwrap();
        assert_eq!(filters.max_price, Some(250.0));
        assert_eq!(filters.min_stars, Some(4));
        assert_eq!(filters.min_reviews, None);
    }

    #[test]
    fn test_decode_response_with_null_echo_fields() {
        let body = serde_json::json!({
            "success": true,
            "search_params": {
                "checkin_date": "2025-07-01",
                "checkout_date": "2025-07-05",
                "location": null,
                "adults": 2,
                "rooms": 1,
                "children": null,
                "filters": { "max_price": 1000, "min_stars": null }
            },
            "results_count": 6,
            "hotels": sample_hotels(),
        });

        let response: SearchResponse = serde_json::from_value(body).unwrap();
        assert!(response.success);
        assert_eq!(response.hotels.len(), 6);
        let echo = response.search_params.unwrap();
        assert_eq!(echo.location, None);
        assert_eq!(echo.children, None);
        assert_eq!(echo.adults, Some(2));
    }

    #[test]
    fn test_malformed_echo_does_not_fail_response() {
        let body = serde_json::json!({
            "success": true,
            "search_params": { "adults": "two", "filters": [] },
            "results_count": 6,
            "hotels": sample_hotels(),
        });

        let response: SearchResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.hotels.len(), 6);
        assert_eq!(response.search_params, None);

        let bare = serde_json::json!({ "success": false, "search_params": null });
        let response: SearchResponse = serde_json::from_value(bare).unwrap();
        assert!(!response.success);
        assert_eq!(response.search_params, None);
    }

    #[test]
    fn test_retryable_errors() {
        assert!(ApiError::NetworkError("refused".to_string()).is_retryable());
        assert!(ApiError::Timeout(5_000).is_retryable());
        assert!(!ApiError::DecodeError("bad".to_string()).is_retryable());
        assert!(!ApiError::ApiResponseError {
            status_code: 400,
            message: "bad request".to_string(),
            is_retryable: false,
        }
        .is_retryable());
    }

    #[tokio::test]
    async fn test_http_search_posts_json() {
        let reply = serde_json::to_string(&SearchResponse::ok(sample_hotels())).unwrap();
        let (base_url, request) = one_shot_server("200 OK", reply).await;
        let api = client_for(format!("{base_url}/"));
        assert_eq!(api.base_url(), base_url);

        let mut params = SearchParams::new(date(2025, 7, 1), date(2025, 7, 5));
        params.location = Some("Seattle, United States".to_string());

        let response = assert_ok!(api.search(params).await);
        assert!(response.success);
        assert_eq!(response.hotels.len(), 6);

        let raw = request.await.unwrap();
        assert!(raw.starts_with("POST /search HTTP/1.1"));
        assert!(raw.contains(r#""location":"Seattle, United States""#));
        assert!(raw.contains(r#""checkin_date":"2025-07-01""#));
    }

    #[tokio::test]
    async fn test_http_search_non_2xx() {
        let (base_url, _request) =
            one_shot_server("503 Service Unavailable", "\"down\"".to_string()).await;
        let api = client_for(base_url);

        let err = assert_err!(
            api.search(SearchParams::new(date(2025, 7, 1), date(2025, 7, 5)))
                .await
        );
        match err {
            ApiError::ApiResponseError {
                status_code,
                is_retryable,
                ..
            } => {
                assert_eq!(status_code, 503);
                assert!(is_retryable);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_search_bad_body() {
        let (base_url, _request) = one_shot_server("200 OK", "{\"oops\": 1}".to_string()).await;
        let api = client_for(base_url);

        let err = assert_err!(
            api.search(SearchParams::new(date(2025, 7, 1), date(2025, 7, 5)))
                .await
        );
        assert!(matches!(err, ApiError::DecodeError(_)));
    }

    #[tokio::test]
    async fn test_http_health() {
        let (base_url, request) = one_shot_server("200 OK", "{}".to_string()).await;
        assert!(assert_ok!(client_for(base_url).health().await));
        assert!(request.await.unwrap().starts_with("GET /health HTTP/1.1"));

        let (base_url, _request) =
            one_shot_server("500 Internal Server Error", "{}".to_string()).await;
        assert!(!assert_ok!(client_for(base_url).health().await));
    }

    #[tokio::test]
    async fn test_http_unreachable() {
        // bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = client_for(format!("http://{addr}"));
        let err = assert_err!(api.health().await);
        assert!(matches!(err, ApiError::NetworkError(_)));
    }
}
