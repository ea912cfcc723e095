//! HTML parser for extracting page data and links
//!
//! This module handles parsing HTML content to extract:
//! - Page title and meta description
//! - Headings, images and paragraphs for the stored record
//! - Outbound links, exactly as written in the markup

use scraper::{ElementRef, Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    /// The page title (from the first `<title>` tag)
    pub title: Option<String>,

    /// Content of `<meta name="description">`
    pub meta_description: Option<String>,

    /// Text of every `<h1>`, then every `<h2>`, and so on down to `<h6>`
    pub headings: Vec<String>,

    /// `src` of every `<img>`, unresolved
    pub images: Vec<String>,

    /// Text of every `<p>`
    pub paragraphs: Vec<String>,

    /// `href` of every `<a>`, unresolved
    pub links: Vec<String>,
}

/// Parses HTML content and extracts record fields and links
///
/// Parsing is lenient: malformed markup yields whatever the HTML5 parser
/// recovers, never an error. Text content is trimmed; attribute values
/// (`href`, `src`) are returned as written.
///
/// # Example
///
/// ```
/// use crawlcraft::crawler::parse_html;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["/page".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ExtractedPage {
    let document = Html::parse_document(html);

    ExtractedPage {
        title: extract_title(&document),
        meta_description: extract_meta_description(&document),
        headings: extract_headings(&document),
        images: collect_attr(&document, "img[src]", "src"),
        paragraphs: collect_text(&document, "p"),
        links: collect_attr(&document, "a[href]", "href"),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(element_text)
        .filter(|s| !s.is_empty())
}

fn extract_meta_description(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[name="description"]"#).ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
}

/// Headings are grouped by level, not document order
fn extract_headings(document: &Html) -> Vec<String> {
    (1..=6)
        .flat_map(|level| collect_text(document, &format!("h{}", level)))
        .collect()
}

fn collect_text(document: &Html, css: &str) -> Vec<String> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).map(element_text).collect(),
        Err(_) => Vec::new(),
    }
}

fn collect_attr(document: &Html, css: &str, attr: &str) -> Vec<String> {
    match Selector::parse(css) {
        Ok(selector) => document
            .select(&selector)
            .filter_map(|element| element.value().attr(attr))
            .map(str::to_string)
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
