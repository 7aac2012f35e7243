//! Outbound page fetching.
//!
//! A fetch either yields the document body or a [`FetchError`]. Callers are
//! expected to degrade (URL-derived headline, no body) rather than abort.

use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use reqwest::{header::CONTENT_TYPE, Client};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Sent on every request; some news sites refuse the default client string.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Timeout fetching: {0}")]
    Timeout(String),

    #[error("HTTP {status} for: {url}")]
    Status { status: u16, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the document at `url` and return its decoded body.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

/// Single GET per call, no retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: FetcherConfig) -> nt_core::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = url::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;

        debug!("Fetching {}", parsed);
        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Fetching {} returned {}", url, status);
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Http(e)
            }
        })?;
        debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(decode_body(content_type.as_deref(), &bytes))
    }
}

/// Decode with the `Content-Type` charset, then a `<meta>` charset near the
/// top of the document, then UTF-8. A byte order mark overrides all three.
fn decode_body(content_type: Option<&str>, bytes: &[u8]) -> String {
    let encoding = content_type
        .and_then(charset_label)
        .or_else(|| meta_charset(bytes))
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

/// `text/html; charset=ISO-8859-1` and `<meta charset="utf-8">` alike.
fn charset_label(text: &str) -> Option<String> {
    let lower = text.to_ascii_lowercase();
    let start = lower.find("charset=")? + "charset=".len();
    let label: String = lower[start..]
        .trim_start_matches(|c: char| c == '"' || c == '\'')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();
    (!label.is_empty()).then_some(label)
}

/// Browsers only prescan the first 1024 bytes for a charset declaration.
fn meta_charset(bytes: &[u8]) -> Option<String> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]);
    let meta = head.to_ascii_lowercase().find("<meta")?;
    charset_label(&head[meta..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::{header, HeaderMap, StatusCode}, routing::get, Router};
    use std::net::SocketAddr;

    async fn spawn_server() -> SocketAddr {
        let app = Router::new()
            .route("/article", get(|| async { "<html><h1>Hello</h1></html>" }))
            .route(
                "/agent",
                get(|headers: HeaderMap| async move {
                    headers
                        .get("user-agent")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string()
                }),
            )
            .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "gone") }))
            .route(
                "/latin1",
                get(|| async {
                    (
                        [(header::CONTENT_TYPE, "text/html")],
                        b"<html><head><meta charset=\"iso-8859-1\"></head><h1>Caf\xe9 reopens</h1></html>".to_vec(),
                    )
                }),
            )
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let addr = spawn_server().await;
        let fetcher = HttpFetcher::new(FetcherConfig::default()).unwrap();

        let body = fetcher.fetch(&format!("http://{}/article", addr)).await.unwrap();
        assert!(body.contains("<h1>Hello</h1>"));
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_user_agent() {
        let addr = spawn_server().await;
        let fetcher = HttpFetcher::new(FetcherConfig::default()).unwrap();

        let agent = fetcher.fetch(&format!("http://{}/agent", addr)).await.unwrap();
        assert_eq!(agent, BROWSER_USER_AGENT);
    }

    #[tokio::test]
    async fn test_fetch_honours_meta_charset() {
        let addr = spawn_server().await;
        let fetcher = HttpFetcher::new(FetcherConfig::default()).unwrap();

        let body = fetcher.fetch(&format!("http://{}/latin1", addr)).await.unwrap();
        assert!(body.contains("<h1>Café reopens</h1>"), "body was {}", body);
    }

    #[test]
    fn test_decode_body_charset_order() {
        let latin1 = b"<meta charset='utf-8'><p>Se\xf1or</p>";
        assert_eq!(
            decode_body(Some("text/html; charset=ISO-8859-1"), latin1),
            "<meta charset='utf-8'><p>Señor</p>"
        );
        assert_eq!(
            decode_body(None, "<p>Señor</p>".as_bytes()),
            "<p>Señor</p>"
        );
        assert_eq!(
            decode_body(
                Some("text/html"),
                b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\"><p>\x93quoted\x94</p>"
            ),
            "<meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\"><p>\u{201c}quoted\u{201d}</p>"
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_failure() {
        let addr = spawn_server().await;
        let fetcher = HttpFetcher::new(FetcherConfig::default()).unwrap();

        let result = fetcher.fetch(&format!("http://{}/missing", addr)).await;
        assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_timeout_is_failure() {
        let addr = spawn_server().await;
        let fetcher = HttpFetcher::new(FetcherConfig {
            timeout: Duration::from_millis(200),
            ..FetcherConfig::default()
        })
        .unwrap();

        let result = fetcher.fetch(&format!("http://{}/slow", addr)).await;
        assert!(matches!(result, Err(FetchError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_malformed_url_is_failure() {
        let fetcher = HttpFetcher::new(FetcherConfig::default()).unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HttpFetcher::new(FetcherConfig::default()).unwrap();
        let result = fetcher.fetch(&format!("http://{}/article", addr)).await;
        assert!(matches!(result, Err(FetchError::Http(_))));
    }
}
