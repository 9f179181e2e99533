use std::fmt;

use seoscope_http::FetchError;
use serde::Serialize;

use crate::checks::Verdict;

/// The three verdicts for one page, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Final URL the page was served from.
    pub url: String,
    pub title: Verdict,
    pub meta_description: Verdict,
    pub headings: Verdict,
}

impl Report {
    pub fn verdicts(&self) -> [&Verdict; 3] {
        [&self.title, &self.meta_description, &self.headings]
    }

    /// True when no check flagged a problem.
    pub fn is_clean(&self) -> bool {
        self.verdicts().iter().all(|v| !v.has_deficiency())
    }
}

/// One verdict per line: Title, Meta Description, Headings.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}\n{}",
            self.title, self.meta_description, self.headings
        )
    }
}

/// Render either arm of an analysis for display.
pub fn render_outcome(outcome: &Result<Report, FetchError>) -> String {
    match outcome {
        Ok(report) => report.to_string(),
        Err(err) => format!("Fetch failed: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::Thresholds;
    use crate::keywords::KeywordSet;
    use seoscope_http::StatusCode;

    fn sample() -> Report {
        crate::analyze::evaluate(
            "https://example.com/",
            "<title>short</title><h1>seo</h1>",
            &KeywordSet::parse("seo"),
            &Thresholds::default(),
        )
    }

    #[test]
    fn displays_three_lines_in_fixed_order() {
        let text = sample().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Title: Too Short",
                "Meta Description: Not Found",
                "Headings: Contain all keywords",
            ]
        );
    }

    #[test]
    fn clean_only_without_deficiencies() {
        assert!(!sample().is_clean());
    }

    #[test]
    fn renders_fetch_failure_reason() {
        let err = FetchError::Http {
            status: StatusCode::NOT_FOUND,
            url: "https://example.com/missing".into(),
        };
        let rendered = render_outcome(&Err(err));
        assert!(rendered.starts_with("Fetch failed: HTTP 404"));
    }

    #[test]
    fn renders_report_when_fetch_succeeded() {
        assert_eq!(render_outcome(&Ok(sample())), sample().to_string());
    }

    #[test]
    fn serializes_structured_verdicts() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["title"]["check"], "title");
        assert_eq!(json["title"]["findings"][0], "too_short");
        assert_eq!(json["meta_description"]["findings"][0], "not_found");
        assert!(json["headings"].get("length").is_none());
    }
}
