//! Link extraction from fetched HTML
//!
//! The document is parsed with `scraper` (html5ever), which recovers from
//! malformed markup the way browsers do, so a broken region can lose links
//! but never aborts extraction of the rest of the document.

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts the distinct admitted anchor targets of one document
///
/// Every `<a href>` is passed through `filter` together with `base`, which
/// must be the document's final (post-redirect) URL. Only the URLs the
/// filter admits are returned.
///
/// # Example
///
/// ```
/// use harvest::crawler::extract_links;
/// use harvest::url::{FilterConfig, UrlFilter};
/// use url::Url;
///
/// let filter = UrlFilter::new(FilterConfig::default());
/// let base = Url::parse("http://site.example/").unwrap();
/// let html = r#"<a href="/a">A</a><a href="/a#top">A again</a>"#;
///
/// let links = extract_links(html, &base, |base, href| filter.filter(base, href));
/// assert_eq!(links.len(), 1);
/// assert!(links.contains("http://site.example/a"));
/// ```
pub fn extract_links<F>(html: &str, base: &Url, filter: F) -> HashSet<String>
where
    F: Fn(&Url, &str) -> Option<String>,
{
    let document = Html::parse_document(html);
    let mut links = HashSet::new();

    let anchors = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return links,
    };

    for element in document.select(&anchors) {
        if let Some(href) = element.value().attr("href") {
            if let Some(url) = filter(base, href) {
                links.insert(url);
            }
        }
    }

    links
}
