use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use harvest::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the seed's host with any `www.` removed
///
/// This names the crawl's output file and is recorded as the crawl's
/// allowed domain.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use harvest::url::host_stem;
///
/// let url = Url::parse("https://www.example.com/start").unwrap();
/// assert_eq!(host_stem(&url), Some("example.com".to_string()));
/// ```
pub fn host_stem(url: &Url) -> Option<String> {
    let host = extract_domain(url)?;
    let host = host.replace("www.", "");
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain() {
        let url = Url::parse("https://sub.example.com/path").unwrap();
        assert_eq!(extract_domain(&url), Some("sub.example.com".to_string()));
    }

    #[test]
    fn test_extract_domain_without_host() {
        let url = Url::parse("mailto:someone@example.com").unwrap();
        assert_eq!(extract_domain(&url), None);
    }

    #[test]
    fn test_host_stem_strips_www() {
        let url = Url::parse("http://WWW.Example.com/").unwrap();
        assert_eq!(host_stem(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_host_stem_keeps_port() {
        let url = Url::parse("http://127.0.0.1:8081/").unwrap();
        assert_eq!(host_stem(&url), Some("127.0.0.1:8081".to_string()));
    }
}
