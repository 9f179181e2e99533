use serde::Serialize;

/// Ordered, uppercase-normalized keywords to look for on a page.
///
/// Built fresh for every analysis and never mutated by the checks.
/// Blank lines are dropped and surrounding whitespace trimmed; duplicates
/// are kept and counted individually, as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    /// One keyword per line of `text`.
    ///
    /// ```
    /// use seoscope_web::KeywordSet;
    ///
    /// let set = KeywordSet::parse("seo\n  Rust tools \n\n");
    /// assert_eq!(set.as_slice(), ["SEO", "RUST TOOLS"]);
    /// ```
    pub fn parse(text: &str) -> Self {
        text.lines().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|raw| raw.as_ref().trim().to_uppercase())
                .filter(|kw| !kw.is_empty())
                .collect(),
        )
    }
}
