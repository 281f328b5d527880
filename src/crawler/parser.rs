//! HTML parser for extracting email sources
//!
//! This module turns an HTML document into the two things the resolver looks
//! at:
//! - `mailto:` anchor targets, in document order
//! - The visible text of the page, whitespace-collapsed

use scraper::{Html, Selector};

/// Elements whose text is never shown to a reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that start a new line of text when rendered
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "dd", "div", "dl", "dt", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p",
    "pre", "section", "table", "td", "th", "title", "tr", "ul",
];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// `href` values of anchors using the mailto scheme
    pub mailto_targets: Vec<String>,

    /// Visible text with runs of whitespace collapsed to one space
    pub text: String,
}

/// Parses HTML content and extracts mailto targets and visible text
///
/// # Example
///
/// ```
/// use email_enricher::crawler::parse_html;
///
/// let html = r#"<p>Reach us at <a href="mailto:hi@acme.com">hi@acme.com</a></p>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.mailto_targets, vec!["mailto:hi@acme.com"]);
/// assert_eq!(parsed.text, "Reach us at hi@acme.com");
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        mailto_targets: extract_mailto_targets(&document),
        text: extract_visible_text(&document),
    }
}

/// Collects anchors whose target begins with `mailto:` (case-insensitive)
fn extract_mailto_targets(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| {
            href.get(..7)
                .map(|scheme| scheme.eq_ignore_ascii_case("mailto:"))
                .unwrap_or(false)
        })
        .map(str::to_string)
        .collect()
}

/// Concatenates visible text nodes
///
/// Text inside hidden elements is skipped and block-level elements are
/// separated by a space so adjacent paragraphs do not run together.
fn extract_visible_text(document: &Html) -> String {
    let mut raw = String::new();

    for node in document.root_element().descendants() {
        if let Some(element) = node.value().as_element() {
            if BLOCK_ELEMENTS.contains(&element.name()) {
                raw.push(' ');
            }
            continue;
        }

        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|element| HIDDEN_ELEMENTS.contains(&element.name()))
                .unwrap_or(false)
        });

        if !hidden {
            raw.push_str(text);
        }
    }

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
