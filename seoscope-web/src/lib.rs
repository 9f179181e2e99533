//! Page analysis: parse fetched HTML and run the on-page heuristics.
//!
//! - [`document`]: thin query API over the `scraper` HTML tree
//! - [`keywords`]: uppercase-normalized keyword set built from user text
//! - [`checks`]: title, meta-description and heading checks
//! - [`report`]: verdict aggregation and text rendering
//! - [`analyze`]: fetch + parse + checks pipeline
//!
//! ```rust
//! use seoscope_web::{KeywordSet, Thresholds, evaluate};
//!
//! let html = r#"<html><head>
//!   <title>Rust SEO Tool</title>
//!   </head><body><h1>Rust tooling</h1></body></html>"#;
//! let report = evaluate("https://example.com", html, &KeywordSet::parse("rust"), &Thresholds::default());
//!
//! assert_eq!(report.title.to_string(), "Title: Too Short");
//! assert_eq!(report.meta_description.to_string(), "Meta Description: Not Found");
//! assert_eq!(report.headings.to_string(), "Headings: Contain all keywords");
//! ```

pub mod analyze;
pub mod checks;
pub mod document;
pub mod keywords;
pub mod report;

pub use analyze::{Analyzer, analyze, evaluate, normalize_url};
pub use checks::{CheckKind, Finding, Thresholds, Verdict};
pub use document::Document;
pub use keywords::KeywordSet;
pub use report::{Report, render_outcome};
