//! HTTP cache control module
//!
//! Decides which caching headers a response gets from the request path, and
//! handles `Last-Modified` / `If-Modified-Since` revalidation.

use hyper::header::{HeaderName, HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use hyper::Response;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Path suffixes that must always be fetched fresh
pub const NO_CACHE_EXTENSIONS: [&str; 3] = [".js", ".css", ".json"];

/// Max-age granted to every other resource (1 hour)
pub const DEFAULT_MAX_AGE: u32 = 3600;

/// Cache control policy for a single response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Never cache; always revalidate with the server
    NoStore,
    /// Public cache with specified max-age (seconds)
    Public(u32),
}

impl CachePolicy {
    /// Classify a request path by its suffix.
    ///
    /// The match is exact and case-sensitive against the whole string, so a
    /// query string after the extension (`/app.js?v=2`) falls through to the
    /// public policy. The server passes hyper's path-and-query, which never
    /// contains a fragment: `/app.js#top` on the wire is classified as `.js`.
    pub fn for_path(path: &str) -> Self {
        if NO_CACHE_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            Self::NoStore
        } else {
            Self::Public(DEFAULT_MAX_AGE)
        }
    }

    /// Headers to append, in send order
    pub fn headers(self) -> Vec<(HeaderName, HeaderValue)> {
        match self {
            Self::NoStore => vec![
                (
                    CACHE_CONTROL,
                    HeaderValue::from_static("no-cache, no-store, must-revalidate"),
                ),
                (PRAGMA, HeaderValue::from_static("no-cache")),
                (EXPIRES, HeaderValue::from_static("0")),
            ],
            Self::Public(max_age) => vec![(CACHE_CONTROL, public_max_age(max_age))],
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::Public(DEFAULT_MAX_AGE)
    }
}

fn public_max_age(max_age: u32) -> HeaderValue {
    HeaderValue::from_str(&format!("public, max-age={max_age}"))
        .unwrap_or_else(|_| HeaderValue::from_static("public, max-age=3600"))
}

/// Supplies extra response headers for a request path.
///
/// Composed with the static file handler: the handler builds the response,
/// then every header returned here is appended just before it is sent.
pub trait HeaderDecorator: Send + Sync {
    fn headers_for(&self, path: &str) -> Vec<(HeaderName, HeaderValue)>;
}

/// Suffix-based cache policy: no-store for code/config files, one hour otherwise
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionCachePolicy;

impl HeaderDecorator for ExtensionCachePolicy {
    fn headers_for(&self, path: &str) -> Vec<(HeaderName, HeaderValue)> {
        CachePolicy::for_path(path).headers()
    }
}

/// Append the decorator's headers to a finished response.
///
/// Uses `append`, never `insert`: headers already present stay untouched.
pub fn decorate_response<B>(decorator: &dyn HeaderDecorator, path: &str, resp: &mut Response<B>) {
    let headers = resp.headers_mut();
    for (name, value) in decorator.headers_for(path) {
        headers.append(name, value);
    }
}

/// Format a file modification time as an HTTP date
pub fn last_modified_value(modified: SystemTime) -> String {
    httpdate::fmt_http_date(modified)
}

/// Check whether a conditional GET can be answered with 304.
///
/// `If-None-Match` takes precedence, and since no entity tags are issued its
/// presence disables the date check. Unparsable dates are ignored.
pub fn is_not_modified(
    if_modified_since: Option<&str>,
    if_none_match: Option<&str>,
    modified: SystemTime,
) -> bool {
    if if_none_match.is_some() {
        return false;
    }
    let Some(since) = if_modified_since.and_then(|h| httpdate::parse_http_date(h.trim()).ok())
    else {
        return false;
    };
    truncate_to_secs(modified) <= since
}

/// HTTP dates have one-second resolution
fn truncate_to_secs(time: SystemTime) -> SystemTime {
    time.duration_since(UNIX_EPOCH)
        .map_or(time, |d| UNIX_EPOCH + Duration::from_secs(d.as_secs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::CONTENT_TYPE;

    fn header_pairs(path: &str) -> Vec<(String, String)> {
        ExtensionCachePolicy
            .headers_for(path)
            .into_iter()
            .map(|(n, v)| (n.to_string(), v.to_str().unwrap().to_string()))
            .collect()
    }

    #[test]
    fn test_no_cache_extensions() {
        let expected = vec![
            (
                "cache-control".to_string(),
                "no-cache, no-store, must-revalidate".to_string(),
            ),
            ("pragma".to_string(), "no-cache".to_string()),
            ("expires".to_string(), "0".to_string()),
        ];
        for path in ["/app.js", "/css/site.css", "/data/config.json", "/a.b.js"] {
            assert_eq!(header_pairs(path), expected, "path {path}");
        }
    }

    #[test]
    fn test_public_extensions() {
        let expected = vec![(
            "cache-control".to_string(),
            "public, max-age=3600".to_string(),
        )];
        for path in ["/logo.png", "/", "/index.html", "/docs/", "/jsx", "/file.mjs", "/js"] {
            assert_eq!(header_pairs(path), expected, "path {path}");
        }
    }

    #[test]
    fn test_suffix_match_is_case_sensitive() {
        assert_eq!(CachePolicy::for_path("/APP.JS"), CachePolicy::Public(3600));
        assert_eq!(CachePolicy::for_path("/style.Css"), CachePolicy::Public(3600));
        assert_eq!(CachePolicy::for_path("/style.css"), CachePolicy::NoStore);
    }

    #[test]
    fn test_query_string_is_part_of_the_path() {
        assert_eq!(CachePolicy::for_path("/app.js?v=2"), CachePolicy::Public(3600));
        assert_eq!(CachePolicy::for_path("/get?file=x.json"), CachePolicy::NoStore);
    }

    #[test]
    fn test_policy_is_stable() {
        let first = header_pairs("/bundle.js");
        for _ in 0..10 {
            assert_eq!(header_pairs("/other/bundle.js"), first);
        }
    }

    #[test]
    fn test_custom_max_age() {
        let headers = CachePolicy::Public(60).headers();
        assert_eq!(headers[0].1, "public, max-age=60");
        assert_eq!(CachePolicy::default(), CachePolicy::Public(3600));
    }

    #[test]
    fn test_decorate_keeps_existing_headers() {
        let mut resp = Response::builder()
            .header(CONTENT_TYPE, "text/css")
            .body(())
            .unwrap();
        decorate_response(&ExtensionCachePolicy, "/site.css", &mut resp);

        let headers = resp.headers();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/css");
        assert_eq!(
            headers.get(CACHE_CONTROL).unwrap(),
            "no-cache, no-store, must-revalidate"
        );
        assert_eq!(headers.get(PRAGMA).unwrap(), "no-cache");
        assert_eq!(headers.get(EXPIRES).unwrap(), "0");
        assert_eq!(headers.len(), 4);
    }

    #[test]
    fn test_is_not_modified() {
        let modified = UNIX_EPOCH + Duration::from_millis(784_111_777_500);
        let same = "Sun, 06 Nov 1994 08:49:37 GMT";
        let earlier = "Sun, 06 Nov 1994 08:49:36 GMT";

        assert!(is_not_modified(Some(same), None, modified));
        assert!(!is_not_modified(Some(earlier), None, modified));
        assert!(!is_not_modified(Some(same), Some("\"abc\""), modified));
        assert!(!is_not_modified(Some("yesterday"), None, modified));
        assert!(!is_not_modified(None, None, modified));
    }

    #[test]
    fn test_last_modified_value() {
        let modified = UNIX_EPOCH + Duration::from_secs(784_111_777);
        assert_eq!(last_modified_value(modified), "Sun, 06 Nov 1994 08:49:37 GMT");
    }
}
