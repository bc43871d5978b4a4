use crate::config::FilterSection;
use std::collections::HashSet;
use url::Url;

/// Substrings that reject a URL when the configuration does not override them
pub const DEFAULT_DENYLIST: &[&str] = &[
    "web.archive.org",
    "plugins",
    ":8080",
    "moodle",
    "kalendarz",
    "password",
    "mobile",
    "query",
    "calendar",
    "ajax",
    "Zaloguj",
    "reddit.",
    "source=",
    "rozmiar=",
    "ssid=",
    "f_ov",
    "Facebook=",
    "cookies",
    "add",
    "cart",
    "comment",
    "reply",
    "en_US",
    "/login",
    "/logowanie",
    "producer_",
    "register",
    "orderby",
    "tumblr.",
    "redirect",
    "linkedin.",
    "facebook.",
    "instagram.",
    "youtube.",
    "twitter.",
    "whatsapp.",
    "pinterest.",
    "login.",
    "google.",
    "wykop.",
    "drukuj/",
    "pliki/",
];

/// Login and account pages, matched against the lowercased URL; not configurable
pub const AUTH_PATTERNS: &[&str] = &[
    "login",
    "signin",
    "auth",
    "logon",
    "signon",
    "logowanie",
    "rejestracja",
];

pub const DEFAULT_SCHEMES: &[&str] = &["http", "https"];

pub const DEFAULT_FILETYPES: &[&str] = &[
    ".html", ".htm", ".php", ".asp", ".aspx", ".jsp", ".cgi", "",
];

/// Admission rules for discovered links
///
/// `None` for a set means "no restriction" for that dimension.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    pub allowed_schemes: Option<HashSet<String>>,
    pub allowed_filetypes: Option<HashSet<String>>,
    /// Carried for reporting only; admission never consults it
    pub allowed_domains: Option<HashSet<String>>,
    pub denylist: Vec<String>,
}

impl FilterConfig {
    /// Builds the rules for one crawl from the configured filter section
    ///
    /// Missing entries fall back to the built-in defaults. `domain` is
    /// recorded as the allowed domain of the crawl.
    pub fn from_section(section: &FilterSection, domain: &str) -> Self {
        let owned = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>();

        let schemes = section
            .allowed_schemes
            .clone()
            .unwrap_or_else(|| owned(DEFAULT_SCHEMES));
        let filetypes = section
            .allowed_filetypes
            .clone()
            .unwrap_or_else(|| owned(DEFAULT_FILETYPES));
        let denylist = section
            .denylist
            .clone()
            .unwrap_or_else(|| owned(DEFAULT_DENYLIST));

        Self {
            allowed_schemes: Some(schemes.into_iter().collect()),
            allowed_filetypes: Some(filetypes.into_iter().collect()),
            allowed_domains: Some(HashSet::from([domain.to_string()])),
            denylist,
        }
    }
}

/// Pure link filter: resolves, defragments and admits or rejects candidate links
#[derive(Debug, Clone)]
pub struct UrlFilter {
    config: FilterConfig,
}

impl UrlFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Resolves `raw_href` against `base` and returns the admitted absolute URL
    ///
    /// The fragment is stripped before any check. Returns `None` when the
    /// href contains whitespace, cannot be resolved, or when:
    /// - the scheme is not allowed
    /// - a denylisted substring appears anywhere in the URL
    /// - an auth pattern appears anywhere in the lowercased URL
    /// - the path suffix is not an allowed filetype
    ///
    /// # Examples
    ///
    /// ```
    /// use harvest::url::{FilterConfig, UrlFilter};
    /// use url::Url;
    ///
    /// let filter = UrlFilter::new(FilterConfig::default());
    /// let base = Url::parse("http://site.example/dir/").unwrap();
    /// assert_eq!(
    ///     filter.filter(&base, "page#top"),
    ///     Some("http://site.example/dir/page".to_string())
    /// );
    /// ```
    pub fn filter(&self, base: &Url, raw_href: &str) -> Option<String> {
        // Resolution percent-encodes spaces, so whitespace is only visible here
        if raw_href.chars().any(char::is_whitespace) {
            return None;
        }

        let mut resolved = base.join(raw_href).ok()?;
        resolved.set_fragment(None);

        let candidate = resolved.as_str();

        if let Some(schemes) = &self.config.allowed_schemes {
            if !schemes.contains(resolved.scheme()) {
                return None;
            }
        }

        if self
            .config
            .denylist
            .iter()
            .any(|pattern| candidate.contains(pattern.as_str()))
        {
            return None;
        }

        let lowered = candidate.to_lowercase();
        if AUTH_PATTERNS.iter().any(|pattern| lowered.contains(pattern)) {
            return None;
        }

        if let Some(filetypes) = &self.config.allowed_filetypes {
            if !filetypes.contains(path_suffix(resolved.path())) {
                return None;
            }
        }

        Some(candidate.to_string())
    }
}

/// Returns the extension of the last path segment, dot included
///
/// Trailing slashes are ignored, names starting with a dot have no
/// extension, and paths without one yield `""`.
pub fn path_suffix(path: &str) -> &str {
    let name = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("");

    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => &name[idx..],
        _ => "",
    }
}
