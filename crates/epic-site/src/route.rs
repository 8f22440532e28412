use std::path::PathBuf;

use percent_encoding::percent_decode_str;

use crate::config::SiteConfig;

/// What a request path maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// A page file under the pages directory, to be rendered.
    Page(PathBuf),
    /// No page matched; look the cleaned path up among the static files.
    Static(String),
}

/// Lexically clean a rooted URL path.
///
/// Repeated slashes and `.` segments are removed and `..` removes the segment
/// before it. `..` at the root stays at the root, so the result never climbs
/// out of the directory it is later joined onto. A trailing slash is kept.
#[must_use]
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                let _ = segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    let mut cleaned = format!("/{}", segments.join("/"));
    if path.ends_with('/') && !cleaned.ends_with('/') {
        cleaned.push('/');
    }
    cleaned
}

/// Decode and clean a request path.
///
/// `/` is served as `/index.html`.
#[must_use]
pub fn normalize_request_path(raw: &str) -> String {
    let decoded = percent_decode_str(raw).decode_utf8_lossy();
    if decoded.is_empty() || decoded == "/" {
        return "/index.html".to_string();
    }
    clean_path(&decoded)
}

/// The page file a cleaned path would be rendered from, relative to the
/// pages directory.
///
/// Directory paths map to their `index.html`; any other path gains an
/// `.html` suffix unless it already has one.
#[must_use]
pub fn page_file_for(cleaned: &str) -> String {
    let relative = cleaned.trim_start_matches('/');
    if relative.is_empty() || relative.ends_with('/') {
        format!("{relative}index.html")
    } else if relative.ends_with(".html") {
        relative.to_string()
    } else {
        format!("{relative}.html")
    }
}

/// Work out whether a request is for a page or a static file.
///
/// A page wins whenever its file exists; everything else falls through to
/// the static directory.
#[must_use]
pub fn resolve_route(config: &SiteConfig, request_path: &str) -> Route {
    let cleaned = normalize_request_path(request_path);
    let page = config.pages_dir().join(page_file_for(&cleaned));
    if page.is_file() {
        Route::Page(page)
    } else {
        Route::Static(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("/a//b/./c"), "/a/b/c");
        assert_eq!(clean_path("/a/b/../c"), "/a/c");
        assert_eq!(clean_path("/../../etc/passwd"), "/etc/passwd");
        assert_eq!(clean_path("/blog/"), "/blog/");
        assert_eq!(clean_path("/blog/.."), "/");
        assert_eq!(clean_path(""), "/");
    }

    #[test]
    fn test_normalize_request_path() {
        assert_eq!(normalize_request_path("/"), "/index.html");
        assert_eq!(normalize_request_path(""), "/index.html");
        assert_eq!(normalize_request_path("/about%20us"), "/about us");
        assert_eq!(normalize_request_path("/%2e%2e/secret"), "/secret");
    }

    #[test]
    fn test_page_file_for() {
        assert_eq!(page_file_for("/index.html"), "index.html");
        assert_eq!(page_file_for("/about"), "about.html");
        assert_eq!(page_file_for("/blog/"), "blog/index.html");
        assert_eq!(page_file_for("/"), "index.html");
        assert_eq!(page_file_for("/style.css"), "style.css.html");
    }
}
