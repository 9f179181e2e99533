use std::sync::Arc;

use seoscope_http::{FetchError, HttpClient, PageFetcher, parse_http_url};
use url::Url;
use uuid::Uuid;

use crate::checks::{Thresholds, check_headings, check_meta_description, check_title};
use crate::document::Document;
use crate::keywords::KeywordSet;
use crate::report::Report;

/// Fetch + parse + check pipeline.
///
/// Cheap to clone; the fetcher is shared. Each [`Analyzer::analyze`] call is
/// independent and keeps no state between runs.
#[derive(Clone)]
pub struct Analyzer {
    fetcher: Arc<dyn PageFetcher>,
    thresholds: Thresholds,
    default_scheme: String,
}

impl Analyzer {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            thresholds: Thresholds::default(),
            default_scheme: "https".to_string(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_default_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.default_scheme = scheme.into();
        self
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Fetch `raw_url` and run all three checks against it.
    ///
    /// A fetch failure is returned as-is and no checks run.
    pub async fn analyze(&self, raw_url: &str, keywords: &KeywordSet) -> Result<Report, FetchError> {
        let analysis_id = Uuid::new_v4();
        let url = normalize_url(raw_url, &self.default_scheme)?;

        tracing::info!(
            %analysis_id,
            url=%url,
            keywords=keywords.len(),
            "analysis.start"
        );

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(
                    %analysis_id,
                    url=%url,
                    status=?err.status(),
                    transport=err.is_transport(),
                    error=%err,
                    "analysis.fetch_failed"
                );
                return Err(err);
            }
        };

        if !page.looks_like_html() {
            tracing::warn!(
                %analysis_id,
                content_type=?page.content_type,
                "analysis.non_html_content"
            );
        }

        let report = evaluate(page.url.as_str(), &page.body, keywords, &self.thresholds);
        for verdict in report.verdicts() {
            tracing::info!(
                %analysis_id,
                check=?verdict.check,
                verdict=%verdict,
                "analysis.verdict"
            );
        }
        tracing::info!(%analysis_id, clean=report.is_clean(), "analysis.done");

        Ok(report)
    }
}

/// Parse `html` and run the three checks. Synchronous so the parsed tree
/// never lives across an `.await`.
pub fn evaluate(url: &str, html: &str, keywords: &KeywordSet, thresholds: &Thresholds) -> Report {
    let doc = Document::parse(html);
    Report {
        url: url.to_string(),
        title: check_title(&doc, keywords, thresholds),
        meta_description: check_meta_description(&doc, keywords, thresholds),
        headings: check_headings(&doc, keywords),
    }
}

/// Prepend `default_scheme` when `raw` carries no scheme, then parse.
///
/// ```
/// use seoscope_web::normalize_url;
///
/// let url = normalize_url("example.com/about", "https").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
///
/// let url = normalize_url("http://example.com", "https").unwrap();
/// assert_eq!(url.scheme(), "http");
/// ```
pub fn normalize_url(raw: &str, default_scheme: &str) -> Result<Url, FetchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FetchError::Url("empty URL".into()));
    }
    if trimmed.contains("://") {
        parse_http_url(trimmed)
    } else {
        parse_http_url(&format!("{default_scheme}://{trimmed}"))
    }
}

/// One-shot analysis with a default client and thresholds.
///
/// `keywords` is newline-separated; the result is the three-line report.
pub async fn analyze(url: &str, keywords: &str) -> Result<String, FetchError> {
    let client = HttpClient::new()?;
    let analyzer = Analyzer::new(Arc::new(client));
    let report = analyzer.analyze(url, &KeywordSet::parse(keywords)).await?;
    Ok(report.to_string())
}
