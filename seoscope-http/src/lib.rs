//! Single-shot page fetcher with safe logging and typed failure classes.
//!
//! - One `GET` per call, no retries
//! - 4xx/5xx responses become [`FetchError::Http`]; DNS, connect, timeout and
//!   body-read failures become [`FetchError::Transport`]
//! - Redacts sensitive query params in logs
//! - Optional *raw* request/response logging via `SEOSCOPE_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```no_run
//! # async fn demo() -> Result<(), seoscope_http::FetchError> {
//! let client = seoscope_http::HttpClient::new()?;
//! let page = client.fetch_page("https://example.com").await?;
//! println!("{} bytes of {:?}", page.body.len(), page.content_type);
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated, trace level), final errors,
//! and (optionally) raw request/response lines (target `http.raw`).

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::Client;
use std::env;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

pub use reqwest::StatusCode;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "SEOSCOPE_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)
const SNIPPET_MAX: usize = 500;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug. The query string is
/// rendered from the redacted pairs, never from the raw URL.
fn make_curl(url: &Url, user_agent: &str) -> String {
    let (host_path, query) = redact_query(url);
    let mut target = format!("{}://{}", url.scheme(), host_path);
    if !query.is_empty() {
        let q: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        target.push('?');
        target.push_str(&q.join("&"));
    }
    format!(
        "curl -XGET -H 'User-Agent: {}' '{}'",
        user_agent.replace('\'', r"'\''"),
        target.replace('\'', r"'\''")
    )
}

/// Redact sensitive headers for logging
fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let mut val = v.to_str().unwrap_or("").to_string();
            if key.eq_ignore_ascii_case("set-cookie") || key.eq_ignore_ascii_case("authorization")
            {
                val = "<redacted>".into();
            }
            (key, val)
        })
        .collect()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("client build failed: {0}")]
    Build(String),
    /// DNS, connect, timeout, TLS or body-read failure; no usable response.
    #[error("transport error: {cause}")]
    Transport { cause: String },
    /// The server answered with a 4xx/5xx status.
    #[error("HTTP {status} from {url}")]
    Http { status: StatusCode, url: String },
}

impl FetchError {
    /// Status code for [`FetchError::Http`], `None` for every other class.
    ///
    /// ```
    /// use seoscope_http::{FetchError, StatusCode};
    ///
    /// let err = FetchError::Http {
    ///     status: StatusCode::NOT_FOUND,
    ///     url: "https://example.com/missing".into(),
    /// };
    /// assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    /// assert!(!err.is_transport());
    /// ```
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport { .. })
    }
}

// ==============================
// Fetched page
// ==============================

/// Successful response: body decoded as text plus the declared content type.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects.
    pub url: Url,
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchedPage {
    /// True when no content type was declared or it names HTML.
    pub fn looks_like_html(&self) -> bool {
        match &self.content_type {
            None => true,
            Some(ct) => {
                let ct = ct.to_ascii_lowercase();
                ct.contains("html")
            }
        }
    }
}

/// Anything that can turn a URL into a [`FetchedPage`].
///
/// The analysis pipeline only sees this trait, so tests can swap in canned
/// pages without a network.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

// ==============================
// Client
// ==============================

/// Construction-time settings for [`HttpClient`].
#[derive(Clone, Debug)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            user_agent: format!("seoscope/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    user_agent: String,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client with [`FetchSettings::default`].
    ///
    /// ```no_run
    /// use seoscope_http::{FetchError, HttpClient};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new()?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(10));
    /// # Ok::<(), FetchError>(())
    /// ```
    pub fn new() -> Result<Self, FetchError> {
        Self::from_settings(&FetchSettings::default())
    }

    pub fn from_settings(settings: &FetchSettings) -> Result<Self, FetchError> {
        let inner = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Build(e.to_string()))?;
        Ok(Self {
            inner,
            user_agent: settings.user_agent.clone(),
            default_timeout: settings.timeout,
        })
    }

    /// Override the whole-request timeout.
    ///
    /// ```no_run
    /// use seoscope_http::{FetchError, HttpClient};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new()?.with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Duration::from_secs(2));
    /// # Ok::<(), FetchError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// Parse `raw` and fetch it. Only `http` and `https` are accepted.
    pub async fn fetch_page(&self, raw: &str) -> Result<FetchedPage, FetchError> {
        let url = parse_http_url(raw)?;
        self.get(&url).await
    }

    async fn get(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let req_id = Uuid::new_v4();
        let timeout = self.default_timeout;
        let (host_path, redacted_q) = redact_query(url);

        tracing::debug!(
            req_id=%req_id,
            method="GET",
            host_path=%host_path,
            query=?redacted_q,
            timeout_ms=timeout.as_millis() as u64,
            "http.request.start"
        );

        if raw_enabled() {
            let curl = make_curl(url, &self.user_agent);
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        // ----- Send -----
        let t0 = Instant::now();
        let mut resp = match self.inner.get(url.clone()).timeout(timeout).send().await {
            Ok(resp) => resp,
            Err(err) => {
                let cause = describe_transport(&err);
                tracing::warn!(
                    req_id=%req_id,
                    host_path=%host_path,
                    timed_out=err.is_timeout(),
                    cause=%cause,
                    "http.network_error.send"
                );
                return Err(FetchError::Transport { cause });
            }
        };

        let status = resp.status();
        let final_url = resp.url().clone();
        let headers = resp.headers().clone();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Status decides the outcome; an error body is only sampled for the log.
        if status.is_client_error() || status.is_server_error() {
            let snippet = match resp.chunk().await {
                Ok(Some(first)) => snip_body(&String::from_utf8_lossy(&first)),
                Ok(None) => String::new(),
                Err(err) => format!("<body unavailable: {}>", describe_transport(&err)),
            };
            tracing::warn!(
                req_id=%req_id,
                %status,
                url=%final_url,
                duration_ms=t0.elapsed().as_millis() as u64,
                body_snippet=%snippet,
                "http.error"
            );
            return Err(FetchError::Http {
                status,
                url: final_url.to_string(),
            });
        }

        let body = match resp.text().await {
            Ok(body) => body,
            Err(err) => {
                let cause = describe_transport(&err);
                tracing::warn!(
                    req_id=%req_id,
                    %status,
                    timed_out=err.is_timeout(),
                    cause=%cause,
                    "http.network_error.body"
                );
                return Err(FetchError::Transport { cause });
            }
        };
        let dur_ms = t0.elapsed().as_millis() as u64;

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=body.len(),
            content_type=?content_type,
            final_url=%final_url,
            "http.response.headers"
        );

        if raw_enabled() {
            let hdrs = redact_headers(&headers);
            let mut text = body.clone();
            let truncated = text.len() > RAW_MAX_BODY;
            if truncated {
                truncate_at_char_boundary(&mut text, RAW_MAX_BODY);
            }
            tracing::info!(
                target:"http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                headers=?hdrs,
                body=%text,
                truncated
            );
        }

        tracing::trace!(
            req_id=%req_id,
            body_snippet=%snip_body(&body),
            "http.response.body_snippet"
        );

        Ok(FetchedPage {
            url: final_url,
            status,
            content_type,
            body,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        self.get(url).await
    }
}

// ==============================
// Helpers
// ==============================

/// Parse an absolute `http`/`https` URL.
///
/// ```
/// use seoscope_http::parse_http_url;
///
/// assert!(parse_http_url("https://example.com/a?b=c").is_ok());
/// assert!(parse_http_url("ftp://example.com").is_err());
/// assert!(parse_http_url("not a url").is_err());
/// ```
pub fn parse_http_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw.trim()).map_err(|e| FetchError::Url(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::Url(format!(
            "{raw}: unsupported scheme `{other}`"
        ))),
    }
}

fn describe_transport(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}

fn truncate_at_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut cut = max;
    while cut > 0 && !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
}

fn snip_body(body: &str) -> String {
    let mut snip = body.to_string();
    if snip.len() > SNIPPET_MAX {
        truncate_at_char_boundary(&mut snip, SNIPPET_MAX);
        snip.push_str("...");
    }
    snip
}

fn redact_query(url: &Url) -> (String, Vec<(String, String)>) {
    // Return "host + path" string and redacted query list for logging
    let host_path = format!("{}{}", url.host_str().unwrap_or("-"), url.path());
    let redacted = url
        .query_pairs()
        .map(|(k, v)| {
            let k = k.to_string();
            let v = v.to_string();
            let is_secret = matches!(
                k.to_ascii_lowercase().as_str(),
                "access_token"
                    | "authorization"
                    | "auth"
                    | "key"
                    | "api_key"
                    | "token"
                    | "secret"
                    | "client_secret"
                    | "password"
            );
            (k, if is_secret { "<redacted>".into() } else { v })
        })
        .collect::<Vec<_>>();
    (host_path, redacted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_secret_query_params() {
        let url = Url::parse("https://example.com/page?q=shoes&api_key=sk-123&Token=abc").unwrap();
        let (host_path, pairs) = redact_query(&url);
        assert_eq!(host_path, "example.com/page");
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "shoes".to_string()),
                ("api_key".to_string(), "<redacted>".to_string()),
                ("Token".to_string(), "<redacted>".to_string()),
            ]
        );
    }

    #[test]
    fn curl_line_never_contains_secrets() {
        let url = Url::parse("https://example.com/p?token=hunter2&x=1").unwrap();
        let curl = make_curl(&url, "seoscope/test");
        assert!(!curl.contains("hunter2"));
        assert!(curl.contains("token=<redacted>"));
        assert!(curl.contains("x=1"));
        assert!(curl.starts_with("curl -XGET"));
    }

    #[test]
    fn snippet_truncates_on_char_boundary() {
        let body = "é".repeat(400);
        let snip = snip_body(&body);
        assert!(snip.ends_with("..."));
        assert!(snip.len() <= SNIPPET_MAX + 3);
    }

    #[test]
    fn html_detection_from_content_type() {
        let mut page = FetchedPage {
            url: Url::parse("https://example.com").unwrap(),
            status: StatusCode::OK,
            content_type: Some("text/html; charset=utf-8".into()),
            body: String::new(),
        };
        assert!(page.looks_like_html());
        page.content_type = Some("application/json".into());
        assert!(!page.looks_like_html());
        page.content_type = None;
        assert!(page.looks_like_html());
    }

    #[test]
    fn rejects_non_http_schemes() {
        let err = parse_http_url("mailto:someone@example.com").unwrap_err();
        assert!(matches!(err, FetchError::Url(_)));
    }
}
