//! Request path translation
//!
//! Maps a URL path onto the document root without ever leaving it.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

/// A request path resolved against the document root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedPath {
    /// Filesystem location under the root
    pub fs_path: PathBuf,
    /// Whether the request path ended with `/`
    pub trailing_slash: bool,
    /// Percent-decoded request path, for display
    pub decoded: String,
}

/// Translate a URL path (query and fragment already removed or not) into a
/// filesystem path under `root`.
///
/// Segments are percent-decoded; empty and `.` segments are dropped and `..`
/// pops the previous segment but never climbs above the root.
pub fn translate_path(root: &Path, request_path: &str) -> TranslatedPath {
    let path = request_path
        .split_once('?')
        .map_or(request_path, |(p, _)| p);
    let path = path.split_once('#').map_or(path, |(p, _)| p);

    let trailing_slash = path.trim_end().ends_with('/');
    let decoded = percent_decode_str(path).decode_utf8_lossy().into_owned();

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            // Drive prefixes or platform separators inside one segment
            s if Path::new(s).components().count() != 1 => {}
            s => segments.push(s),
        }
    }

    let mut fs_path = root.to_path_buf();
    fs_path.extend(segments);

    TranslatedPath {
        fs_path,
        trailing_slash,
        decoded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fs_path(request: &str) -> PathBuf {
        translate_path(Path::new("/srv/www"), request).fs_path
    }

    #[test]
    fn test_plain_paths() {
        assert_eq!(fs_path("/"), PathBuf::from("/srv/www"));
        assert_eq!(fs_path("/app.js"), PathBuf::from("/srv/www/app.js"));
        assert_eq!(fs_path("/css//site.css"), PathBuf::from("/srv/www/css/site.css"));
    }

    #[test]
    fn test_query_and_fragment_stripped() {
        assert_eq!(fs_path("/app.js?v=2"), PathBuf::from("/srv/www/app.js"));
        assert_eq!(fs_path("/page.html#top"), PathBuf::from("/srv/www/page.html"));
    }

    #[test]
    fn test_percent_decoding() {
        let t = translate_path(Path::new("/srv/www"), "/my%20docs/r%C3%A9sum%C3%A9.txt");
        assert_eq!(t.fs_path, PathBuf::from("/srv/www/my docs/résumé.txt"));
        assert_eq!(t.decoded, "/my docs/résumé.txt");
    }

    #[test]
    fn test_parent_segments_stay_inside_root() {
        assert_eq!(fs_path("/../../etc/passwd"), PathBuf::from("/srv/www/etc/passwd"));
        assert_eq!(fs_path("/a/b/../c"), PathBuf::from("/srv/www/a/c"));
        assert_eq!(fs_path("/%2e%2e/secret"), PathBuf::from("/srv/www/secret"));
        assert_eq!(fs_path("/./x/./y"), PathBuf::from("/srv/www/x/y"));
    }

    #[test]
    fn test_trailing_slash() {
        assert!(translate_path(Path::new("."), "/docs/").trailing_slash);
        assert!(translate_path(Path::new("."), "/docs/?q=1").trailing_slash);
        assert!(!translate_path(Path::new("."), "/docs").trailing_slash);
    }
}
