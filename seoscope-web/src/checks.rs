//! The three on-page heuristics.
//!
//! Each check reads a [`Document`] and a [`KeywordSet`] and returns a
//! [`Verdict`]. Checks are pure: they share no state and can run in any
//! order.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::document::Document;
use crate::keywords::KeywordSet;

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Length bounds, in characters. A length equal to a bound passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    pub title_min: usize,
    pub title_max: usize,
    pub meta_min: usize,
    pub meta_max: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            title_min: 40,
            title_max: 60,
            meta_min: 70,
            meta_max: 160,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Title,
    MetaDescription,
    Headings,
}

impl CheckKind {
    pub fn label(self) -> &'static str {
        match self {
            CheckKind::Title => "Title",
            CheckKind::MetaDescription => "Meta Description",
            CheckKind::Headings => "Headings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Finding {
    TooShort,
    TooLong,
    /// Title: fewer than half the keywords appear as whole words.
    NotEnoughKeywords,
    /// Meta description: at least one keyword is not a whole word.
    MissingKeywords,
    NotFound,
    ContainsAllKeywords,
    LacksSomeKeywords,
}

impl Finding {
    pub fn text(self) -> &'static str {
        match self {
            Finding::TooShort => "Too Short",
            Finding::TooLong => "Too Long",
            Finding::NotEnoughKeywords => "Doesn't include enough keywords",
            Finding::MissingKeywords => "Doesn't include all keywords",
            Finding::NotFound => "Not Found",
            Finding::ContainsAllKeywords => "Contain all keywords",
            Finding::LacksSomeKeywords => "Do not contain all keywords",
        }
    }

    /// Whether this finding flags a problem on the page.
    pub fn is_deficiency(self) -> bool {
        !matches!(self, Finding::ContainsAllKeywords)
    }
}

/// Outcome of one check.
///
/// Displays as the check label, a colon, then each finding separated by a
/// single space, e.g. `Title: Too Short Doesn't include enough keywords`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub check: CheckKind,
    pub findings: Vec<Finding>,
    /// Measured character length, for the title and meta checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
}

impl Verdict {
    fn new(check: CheckKind, findings: Vec<Finding>, length: Option<usize>) -> Self {
        Self {
            check,
            findings,
            length,
        }
    }

    pub fn has_deficiency(&self) -> bool {
        self.findings.iter().any(|f| f.is_deficiency())
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.check.label())?;
        for finding in &self.findings {
            write!(f, " {}", finding.text())?;
        }
        Ok(())
    }
}

fn length_finding(length: usize, min: usize, max: usize) -> Option<Finding> {
    if length < min {
        Some(Finding::TooShort)
    } else if length > max {
        Some(Finding::TooLong)
    } else {
        None
    }
}

/// Title length and whole-word keyword coverage.
///
/// A missing `<title>` counts as length 0 with no words.
pub fn check_title(doc: &Document, keywords: &KeywordSet, thresholds: &Thresholds) -> Verdict {
    let text = doc
        .first_by_tag("title")
        .map(Document::text_of)
        .unwrap_or_default();
    let length = text.chars().count();

    let mut findings = Vec::new();
    if let Some(f) = length_finding(length, thresholds.title_min, thresholds.title_max) {
        findings.push(f);
    }

    let upper = text.to_uppercase();
    let words: HashSet<&str> = upper.split_whitespace().collect();
    let matched = keywords.iter().filter(|kw| words.contains(kw)).count();
    if matched < keywords.len() / 2 {
        findings.push(Finding::NotEnoughKeywords);
    }

    Verdict::new(CheckKind::Title, findings, Some(length))
}

/// Meta description presence, length, and whole-word keyword coverage.
pub fn check_meta_description(
    doc: &Document,
    keywords: &KeywordSet,
    thresholds: &Thresholds,
) -> Verdict {
    let Some(meta) = doc.find_by_attr("meta", "name", "description") else {
        return Verdict::new(CheckKind::MetaDescription, vec![Finding::NotFound], None);
    };
    let content = meta.value().attr("content").unwrap_or_default();
    let length = content.chars().count();

    let mut findings = Vec::new();
    if let Some(f) = length_finding(length, thresholds.meta_min, thresholds.meta_max) {
        findings.push(f);
    }

    let upper = content.to_uppercase();
    let words: HashSet<&str> = upper.split_whitespace().collect();
    if keywords.iter().any(|kw| !words.contains(kw)) {
        findings.push(Finding::MissingKeywords);
    }

    Verdict::new(CheckKind::MetaDescription, findings, Some(length))
}

/// Substring keyword coverage across `h1`..`h6`, stopping at the first
/// heading after which every keyword has been seen.
pub fn check_headings(doc: &Document, keywords: &KeywordSet) -> Verdict {
    let mut seen = vec![false; keywords.len()];
    let mut remaining = keywords.len();

    for heading in doc.all_by_tags(&HEADING_TAGS) {
        let text = Document::text_of(heading);
        if !text.is_empty() {
            let upper = text.to_uppercase();
            for (idx, kw) in keywords.iter().enumerate() {
                if !seen[idx] && upper.contains(kw) {
                    seen[idx] = true;
                    remaining -= 1;
                }
            }
        }
        if remaining == 0 {
            return Verdict::new(
                CheckKind::Headings,
                vec![Finding::ContainsAllKeywords],
                None,
            );
        }
    }

    Verdict::new(CheckKind::Headings, vec![Finding::LacksSomeKeywords], None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(head: &str, body: &str) -> Document {
        Document::parse(&format!(
            "<html><head>{head}</head><body>{body}</body></html>"
        ))
    }

    /// Title of exactly `len` characters that starts with `words`.
    fn padded(words: &str, len: usize) -> String {
        let mut s = words.to_string();
        if s.chars().count() < len {
            s.push(' ');
        }
        while s.chars().count() < len {
            s.push('x');
        }
        assert_eq!(s.chars().count(), len);
        s
    }

    fn title_verdict(title_len: usize, keywords: &str) -> String {
        let doc = page(&format!("<title>{}</title>", padded("SEO tool", title_len)), "");
        check_title(&doc, &KeywordSet::parse(keywords), &Thresholds::default()).to_string()
    }

    fn meta_verdict(content: &str, keywords: &str) -> String {
        let doc = page(
            &format!(r#"<meta name="description" content="{content}">"#),
            "",
        );
        check_meta_description(&doc, &KeywordSet::parse(keywords), &Thresholds::default())
            .to_string()
    }

    fn headings_verdict(headings: &[&str], keywords: &str) -> String {
        let body: String = headings.iter().map(|h| format!("<h2>{h}</h2>")).collect();
        check_headings(&page("", &body), &KeywordSet::parse(keywords)).to_string()
    }

    #[test]
    fn title_within_bounds_with_keywords_is_clean() {
        for len in [40, 50, 60] {
            assert_eq!(title_verdict(len, "seo\ntool"), "Title:");
        }
    }

    #[test]
    fn title_length_boundaries() {
        assert_eq!(title_verdict(39, "seo"), "Title: Too Short");
        assert_eq!(title_verdict(61, "seo"), "Title: Too Long");
    }

    #[test]
    fn missing_title_is_too_short_without_panicking() {
        let doc = page("", "<h1>No title here</h1>");
        let verdict = check_title(&doc, &KeywordSet::parse("a\nb"), &Thresholds::default());
        assert_eq!(verdict.length, Some(0));
        assert_eq!(
            verdict.to_string(),
            "Title: Too Short Doesn't include enough keywords"
        );
    }

    #[test]
    fn title_keyword_match_is_whole_word() {
        // "SEOTOOL" must not satisfy either keyword.
        let doc = page(&format!("<title>{}</title>", padded("SEOTOOL", 45)), "");
        let verdict = check_title(&doc, &KeywordSet::parse("seo\ntool"), &Thresholds::default());
        assert_eq!(verdict.findings, vec![Finding::NotEnoughKeywords]);
    }

    #[test]
    fn title_needs_half_of_keywords_rounded_down() {
        // 1 of 3 matched; 3 / 2 == 1, so coverage is enough.
        assert_eq!(title_verdict(45, "seo\nalpha\nbeta"), "Title:");
        // 1 of 4 matched; 4 / 2 == 2.
        assert_eq!(
            title_verdict(45, "seo\nalpha\nbeta\ngamma"),
            "Title: Doesn't include enough keywords"
        );
    }

    #[test]
    fn title_with_no_keywords_never_flags_coverage() {
        assert_eq!(title_verdict(45, ""), "Title:");
    }

    #[test]
    fn missing_meta_description_short_circuits() {
        let doc = page("<title>x</title>", "");
        let verdict =
            check_meta_description(&doc, &KeywordSet::parse("seo"), &Thresholds::default());
        assert_eq!(verdict.to_string(), "Meta Description: Not Found");
        assert_eq!(verdict.length, None);
    }

    #[test]
    fn meta_length_boundaries() {
        assert_eq!(meta_verdict(&padded("seo", 69), "seo"), "Meta Description: Too Short");
        assert_eq!(meta_verdict(&padded("seo", 70), "seo"), "Meta Description:");
        assert_eq!(meta_verdict(&padded("seo", 160), "seo"), "Meta Description:");
        assert_eq!(meta_verdict(&padded("seo", 161), "seo"), "Meta Description: Too Long");
    }

    /// `len` characters: "SEO " then `fill` repeated.
    fn multibyte(len: usize, fill: char) -> String {
        let mut s = String::from("SEO ");
        while s.chars().count() < len {
            s.push(fill);
        }
        s
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let title = multibyte(40, 'é');
        assert!(title.len() > 40);
        let doc = page(&format!("<title>{title}</title>"), "");
        let verdict = check_title(&doc, &KeywordSet::parse("seo"), &Thresholds::default());
        assert_eq!(verdict.length, Some(40));
        assert_eq!(verdict.to_string(), "Title:");

        let doc = page(&format!("<title>{}</title>", multibyte(39, 'é')), "");
        assert_eq!(
            check_title(&doc, &KeywordSet::parse("seo"), &Thresholds::default()).to_string(),
            "Title: Too Short"
        );

        assert_eq!(meta_verdict(&multibyte(70, 'ü'), "seo"), "Meta Description:");
        assert_eq!(
            meta_verdict(&multibyte(69, '日'), "seo"),
            "Meta Description: Too Short"
        );
    }

    #[test]
    fn meta_requires_every_keyword() {
        let only_seo = padded("SEO", 100);
        assert_eq!(
            meta_verdict(&only_seo, "seo\ntool"),
            "Meta Description: Doesn't include all keywords"
        );

        let both = padded("SEO tool", 100);
        assert_eq!(meta_verdict(&both, "seo\ntool"), "Meta Description:");
    }

    #[test]
    fn meta_reports_missing_keywords_once() {
        let verdict = meta_verdict(&padded("nothing", 10), "a\nb\nc");
        assert_eq!(
            verdict,
            "Meta Description: Too Short Doesn't include all keywords"
        );
    }

    #[test]
    fn meta_without_content_attribute_counts_as_empty() {
        let doc = page(r#"<meta name="description">"#, "");
        let verdict = check_meta_description(&doc, &KeywordSet::default(), &Thresholds::default());
        assert_eq!(verdict.to_string(), "Meta Description: Too Short");
        assert_eq!(verdict.length, Some(0));
    }

    #[test]
    fn headings_cover_all_keywords() {
        assert_eq!(
            headings_verdict(&["Alpha Guide", "Beta Intro"], "alpha\nbeta"),
            "Headings: Contain all keywords"
        );
    }

    #[test]
    fn headings_missing_keywords() {
        assert_eq!(
            headings_verdict(&["Gamma Guide"], "alpha\nbeta"),
            "Headings: Do not contain all keywords"
        );
    }

    #[test]
    fn heading_match_is_substring() {
        assert_eq!(
            headings_verdict(&["Alphabetical order"], "alpha"),
            "Headings: Contain all keywords"
        );
    }

    #[test]
    fn headings_scan_mixed_levels_and_nested_text() {
        let doc = page(
            "",
            "<h4>about <b>beta</b></h4><p>alpha</p><h1>Alpha</h1>",
        );
        let verdict = check_headings(&doc, &KeywordSet::parse("alpha\nbeta"));
        assert_eq!(verdict.findings, vec![Finding::ContainsAllKeywords]);
    }

    #[test]
    fn no_headings_never_contain_keywords() {
        assert_eq!(
            headings_verdict(&[], ""),
            "Headings: Do not contain all keywords"
        );
    }

    #[test]
    fn checks_leave_keywords_untouched() {
        let keywords = KeywordSet::parse("alpha\nbeta");
        let before = keywords.clone();
        let doc = page("", "<h1>Alpha</h1><h2>Beta</h2>");

        let first = check_headings(&doc, &keywords);
        let second = check_headings(&doc, &keywords);

        assert_eq!(keywords, before);
        assert_eq!(first, second);
    }

    #[test]
    fn deficiency_flags() {
        let clean = Verdict::new(CheckKind::Headings, vec![Finding::ContainsAllKeywords], None);
        let short = Verdict::new(CheckKind::Title, vec![Finding::TooShort], Some(3));
        assert!(!clean.has_deficiency());
        assert!(short.has_deficiency());
    }
}
