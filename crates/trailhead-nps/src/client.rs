//! Async HTTP client for the provider's `/parks` endpoint.

use std::{sync::Arc, time::Duration};

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};
use trailhead_core::{
  park::RawPark,
  source::{FetchError, Page, ParkSource},
};

use crate::{Error, Result, limiter::RateLimiter};

pub const DEFAULT_BASE_URL: &str = "https://developer.nps.gov/api/v1";

/// Connection settings for the provider API.
#[derive(Debug, Clone)]
pub struct NpsConfig {
  pub base_url:         String,
  pub api_key:          String,
  /// Records requested per page (`limit`).
  pub page_size:        u32,
  /// Minimum delay between the starts of two requests.
  pub request_interval: Duration,
  pub timeout:          Duration,
}

impl NpsConfig {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      base_url:         DEFAULT_BASE_URL.to_owned(),
      api_key:          api_key.into(),
      page_size:        100,
      request_interval: Duration::from_millis(500),
      timeout:          Duration::from_secs(30),
    }
  }
}

/// Async HTTP client for the provider API.
///
/// Cheap to clone — the inner [`reqwest::Client`] and the rate limiter are
/// shared between clones.
#[derive(Clone)]
pub struct NpsClient {
  client:  Client,
  config:  NpsConfig,
  limiter: Arc<RateLimiter>,
}

impl NpsClient {
  pub fn new(config: NpsConfig) -> Result<Self> {
    if config.page_size == 0 {
      return Err(Error::InvalidConfig("page_size must be at least 1".into()));
    }
    let client = Client::builder().timeout(config.timeout).build()?;
    let limiter = Arc::new(RateLimiter::new(config.request_interval));
    Ok(Self { client, config, limiter })
  }

  pub fn page_size(&self) -> u32 { self.config.page_size }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }
}

/// Network-level failures are retryable; a request we could not even build,
/// or a body we could not decode, is not.
fn classify(err: reqwest::Error) -> FetchError {
  if err.is_builder() || err.is_decode() {
    FetchError::fatal(err)
  } else {
    FetchError::transient(err)
  }
}

impl ParkSource for NpsClient {
  /// `GET /parks?stateCode=<partition>&limit=<page_size>&start=<offset>`
  async fn fetch_page(&self, partition: &str, offset: u32) -> Result<Page, FetchError> {
    self.limiter.acquire().await;
    debug!(partition, offset, "GET /parks");

    let resp = self
      .client
      .get(self.url("/parks"))
      .header("X-Api-Key", &self.config.api_key)
      .query(&[
        ("stateCode", partition.to_owned()),
        ("limit", self.config.page_size.to_string()),
        ("start", offset.to_string()),
      ])
      .send()
      .await
      .map_err(classify)?;

    let status = resp.status();
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
      return Err(FetchError::transient(format!("GET /parks → {status}")));
    }
    if !status.is_success() {
      return Err(FetchError::fatal(format!("GET /parks → {status}")));
    }

    let body = resp.bytes().await.map_err(classify)?;
    let envelope: Envelope = serde_json::from_slice(&body).map_err(FetchError::fatal)?;
    Ok(envelope.into_page(partition, offset, self.config.page_size))
  }
}

// ─── Wire envelope ───────────────────────────────────────────────────────────

/// The provider sends `total` as a string; accept a number too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Total {
  Number(u64),
  Text(String),
}

impl Total {
  fn value(&self) -> Option<u64> {
    match self {
      Total::Number(n) => Some(*n),
      Total::Text(s) => s.trim().parse().ok(),
    }
  }
}

#[derive(Debug, Deserialize)]
struct Envelope {
  #[serde(default)]
  total: Option<Total>,
  #[serde(default)]
  data:  Option<Vec<RawPark>>,
  #[serde(default)]
  error: Option<serde_json::Value>,
}

impl Envelope {
  /// An error envelope, or one without `data`, is an empty last page.
  fn into_page(self, partition: &str, offset: u32, page_size: u32) -> Page {
    if let Some(error) = &self.error {
      warn!(partition, offset, %error, "provider returned an error envelope");
      return Page::default();
    }
    let records = self.data.unwrap_or_default();
    if records.is_empty() {
      return Page::default();
    }

    let received = records.len() as u64;
    let has_more = match self.total.as_ref().and_then(Total::value) {
      Some(total) => u64::from(offset) + received < total,
      None        => received >= u64::from(page_size),
    };
    Page { records, has_more }
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
  };
  use serde_json::json;
  use tokio::net::TcpListener;

  use super::*;

  async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{addr}")
  }

  fn client(base_url: String, page_size: u32) -> NpsClient {
    NpsClient::new(NpsConfig {
      base_url,
      page_size,
      request_interval: Duration::ZERO,
      timeout: Duration::from_secs(5),
      ..NpsConfig::new("test-key")
    })
    .unwrap()
  }

  const CODES: [&str; 3] = ["acad", "yose", "zion"];

  /// Serves `CODES` for any state, paginated by `limit`/`start`, and rejects
  /// requests without the expected key.
  async fn parks(
    Query(q): Query<HashMap<String, String>>,
    headers: HeaderMap,
  ) -> axum::response::Response {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("test-key") {
      return StatusCode::FORBIDDEN.into_response();
    }
    let limit: usize = q["limit"].parse().unwrap();
    let start: usize = q["start"].parse().unwrap();
    let state = q["stateCode"].clone();
    let data: Vec<_> = CODES
      .iter()
      .skip(start)
      .take(limit)
      .map(|code| json!({ "parkCode": code, "fullName": code, "states": state }))
      .collect();
    Json(json!({ "total": CODES.len().to_string(), "limit": limit.to_string(),
                 "start": start.to_string(), "data": data }))
      .into_response()
  }

  #[tokio::test]
  async fn paginates_with_total() {
    let base = serve(Router::new().route("/parks", get(parks))).await;
    let c = client(base, 2);

    let first = c.fetch_page("CA", 0).await.unwrap();
    assert_eq!(first.records.len(), 2);
    assert!(first.has_more);
    assert_eq!(first.records[0].park_code, "acad");
    assert_eq!(first.records[0].states, "CA");

    let second = c.fetch_page("CA", 2).await.unwrap();
    assert_eq!(second.records.len(), 1);
    assert!(!second.has_more);
  }

  #[tokio::test]
  async fn missing_total_falls_back_to_page_size() {
    let router = Router::new().route(
      "/parks",
      get(|| async { Json(json!({ "data": [{ "parkCode": "a" }, { "parkCode": "b" }] })) }),
    );
    let base = serve(router).await;

    assert!(client(base.clone(), 2).fetch_page("CA", 0).await.unwrap().has_more);
    assert!(!client(base, 3).fetch_page("CA", 0).await.unwrap().has_more);
  }

  #[tokio::test]
  async fn error_or_empty_envelope_is_zero_records() {
    let router = Router::new()
      .route("/parks", get(|| async { Json(json!({ "error": { "code": "API_KEY_INVALID" } })) }))
      .route("/empty/parks", get(|| async { Json(json!({ "total": "0" })) }));
    let base = serve(router).await;

    let page = client(base.clone(), 10).fetch_page("CA", 0).await.unwrap();
    assert!(page.records.is_empty());
    assert!(!page.has_more);

    let page = client(format!("{base}/empty"), 10).fetch_page("CA", 0).await.unwrap();
    assert!(page.records.is_empty());
    assert!(!page.has_more);
  }

  #[tokio::test]
  async fn server_errors_are_transient() {
    let router = Router::new()
      .route("/parks", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
      .route("/busy/parks", get(|| async { StatusCode::TOO_MANY_REQUESTS }));
    let base = serve(router).await;

    let err = client(base.clone(), 10).fetch_page("CA", 0).await.unwrap_err();
    assert!(err.is_transient(), "{err}");
    let err = client(format!("{base}/busy"), 10).fetch_page("CA", 0).await.unwrap_err();
    assert!(err.is_transient(), "{err}");
  }

  #[tokio::test]
  async fn rejected_key_is_fatal() {
    let base = serve(Router::new().route("/parks", get(parks))).await;
    let c = NpsClient::new(NpsConfig {
      base_url: base,
      request_interval: Duration::ZERO,
      ..NpsConfig::new("wrong-key")
    })
    .unwrap();

    let err = c.fetch_page("CA", 0).await.unwrap_err();
    assert!(matches!(err, FetchError::Fatal(_)), "{err}");
  }

  #[tokio::test]
  async fn malformed_body_is_fatal() {
    let router = Router::new()
      .route("/parks", get(|| async { "<html>not json</html>" }))
      .route("/shape/parks", get(|| async { Json(json!({ "data": "nope" })) }));
    let base = serve(router).await;

    let err = client(base.clone(), 10).fetch_page("CA", 0).await.unwrap_err();
    assert!(matches!(err, FetchError::Fatal(_)), "{err}");
    let err = client(format!("{base}/shape"), 10).fetch_page("CA", 0).await.unwrap_err();
    assert!(matches!(err, FetchError::Fatal(_)), "{err}");
  }

  #[tokio::test]
  async fn connection_refused_is_transient() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{addr}"), 10)
      .fetch_page("CA", 0)
      .await
      .unwrap_err();
    assert!(err.is_transient(), "{err}");
  }

  #[tokio::test]
  async fn clones_share_one_request_interval() {
    let base = serve(Router::new().route("/parks", get(parks))).await;
    let interval = Duration::from_millis(50);
    let c = NpsClient::new(NpsConfig {
      base_url: base,
      request_interval: interval,
      ..NpsConfig::new("test-key")
    })
    .unwrap();
    let other = c.clone();

    let start = tokio::time::Instant::now();
    c.fetch_page("CA", 0).await.unwrap();
    other.fetch_page("NV", 0).await.unwrap();
    c.fetch_page("OR", 0).await.unwrap();

    assert!(start.elapsed() >= interval * 2, "requests burst: {:?}", start.elapsed());
  }

  #[test]
  fn zero_page_size_is_rejected() {
    let result = NpsClient::new(NpsConfig { page_size: 0, ..NpsConfig::new("k") });
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
  }
}
