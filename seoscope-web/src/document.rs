use scraper::{ElementRef, Html};

/// Parsed HTML page.
///
/// Wraps [`scraper::Html`] and exposes the handful of lookups the checks
/// need. Element names are compared lowercase, which is how html5ever
/// stores them. `Html` is not `Send`, so a `Document` must not be held
/// across an `.await`.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// All elements in document order.
    fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
    }

    /// First element named `tag`.
    ///
    /// ```
    /// use seoscope_web::Document;
    ///
    /// let doc = Document::parse("<title>One</title><title>Two</title>");
    /// let title = doc.first_by_tag("title").map(Document::text_of);
    /// assert_eq!(title.as_deref(), Some("One"));
    /// ```
    pub fn first_by_tag(&self, tag: &str) -> Option<ElementRef<'_>> {
        self.elements().find(|el| el.value().name() == tag)
    }

    /// First element named `tag` whose `attr` equals `value` exactly.
    pub fn find_by_attr(&self, tag: &str, attr: &str, value: &str) -> Option<ElementRef<'_>> {
        self.elements()
            .find(|el| el.value().name() == tag && el.value().attr(attr) == Some(value))
    }

    /// Every element whose name is in `tags`, in document order.
    pub fn all_by_tags<'a>(&'a self, tags: &'a [&'a str]) -> impl Iterator<Item = ElementRef<'a>> {
        self.elements()
            .filter(move |el| tags.contains(&el.value().name()))
    }

    /// Concatenated text of `el` and its descendants, untrimmed.
    pub fn text_of(el: ElementRef<'_>) -> String {
        el.text().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!doctype html>
<html>
  <head>
    <title>Shop  Shoes</title>
    <meta name="viewport" content="width=device-width">
    <meta name="description" content="Hand made shoes">
  </head>
  <body>
    <h2>Second <em>level</em></h2>
    <h1>Top</h1>
    <p>Not a heading</p>
    <h6>Deep</h6>
  </body>
</html>"#;

    #[test]
    fn finds_first_element_by_tag() {
        let doc = Document::parse(PAGE);
        let title = doc.first_by_tag("title").expect("title present");
        assert_eq!(Document::text_of(title), "Shop  Shoes");
        assert!(doc.first_by_tag("table").is_none());
    }

    #[test]
    fn finds_element_by_attribute_value() {
        let doc = Document::parse(PAGE);
        let meta = doc
            .find_by_attr("meta", "name", "description")
            .expect("description meta");
        assert_eq!(meta.value().attr("content"), Some("Hand made shoes"));
        assert!(doc.find_by_attr("meta", "name", "keywords").is_none());
    }

    #[test]
    fn attribute_match_is_exact() {
        let doc = Document::parse(r#"<meta name="Description" content="x">"#);
        assert!(doc.find_by_attr("meta", "name", "description").is_none());
    }

    #[test]
    fn collects_tag_set_in_document_order() {
        let doc = Document::parse(PAGE);
        let tags = ["h1", "h2", "h3", "h4", "h5", "h6"];
        let texts: Vec<String> = doc.all_by_tags(&tags).map(Document::text_of).collect();
        assert_eq!(texts, vec!["Second level", "Top", "Deep"]);
    }

    #[test]
    fn tolerates_malformed_markup() {
        let doc = Document::parse("<title>Unclosed<h1>Heading");
        assert!(doc.first_by_tag("title").is_some());
    }
}
