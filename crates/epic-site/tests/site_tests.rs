//! Integration tests for routing, page rendering and static export against a
//! site laid out in a temporary directory.

use std::fs;
use std::path::Path;

use epic_site::{GenerateError, Route, Site, SiteConfig, SiteError, generate, respond};
use http_body_util::BodyExt;
use hyper::StatusCode;
use hyper::header::CONTENT_TYPE;
use tempfile::TempDir;

const DOCUMENT: &str = "<html><head>{{ head }}</head><body>{{ page }}</body></html>";

/// Helper to write a file, creating parent directories
fn write(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A small site with a home page, a nested index page and some static files
fn fixture() -> (TempDir, Site) {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "document.html", DOCUMENT.as_bytes());
    write(
        root,
        "pages/index.html",
        b"<head><meta charset=utf-8></head><template>Home</template>",
    );
    write(root, "pages/about.html", b"<template>About</template>");
    write(root, "pages/blog/index.html", b"<template>Posts</template>");
    write(root, "pages/broken.html", b"<template>ok\xFF</template>");
    write(root, "static/style.css", b"body { margin: 0 }");
    write(root, "static/docs/index.html", b"static docs");
    let site = Site::new(SiteConfig::new(root));
    (dir, site)
}

async fn body_of(response: hyper::Response<http_body_util::Full<bytes::Bytes>>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[test]
fn test_root_resolves_to_index_page() {
    let (dir, site) = fixture();
    assert_eq!(
        site.resolve("/"),
        Route::Page(dir.path().join("pages").join("index.html"))
    );
}

#[test]
fn test_extensionless_path_resolves_to_page() {
    let (dir, site) = fixture();
    let expected = Route::Page(dir.path().join("pages").join("about.html"));
    assert_eq!(site.resolve("/about"), expected);
    assert_eq!(site.resolve("/about.html"), expected);
    assert_eq!(site.resolve("//x/../about"), expected);
}

#[test]
fn test_trailing_slash_resolves_to_directory_index() {
    let (dir, site) = fixture();
    assert_eq!(
        site.resolve("/blog/"),
        Route::Page(dir.path().join("pages").join("blog").join("index.html"))
    );
}

#[test]
fn test_unknown_path_falls_through_to_static() {
    let (_dir, site) = fixture();
    assert_eq!(site.resolve("/style.css"), Route::Static("/style.css".to_string()));
    assert_eq!(site.resolve("/blog"), Route::Static("/blog".to_string()));
}

#[test]
fn test_render_page() {
    let (dir, site) = fixture();
    let html = site
        .render_page(&dir.path().join("pages").join("index.html"))
        .unwrap();
    assert_eq!(
        html,
        r#"<html><head><meta charset="utf-8"></head><body>Home</body></html>"#
    );
}

#[test]
fn test_render_page_reports_invalid_utf8() {
    let (dir, site) = fixture();
    let err = site
        .render_page(&dir.path().join("pages").join("broken.html"))
        .unwrap_err();
    assert!(matches!(err, SiteError::Ssr(_)));
    assert!(err.to_string().starts_with("html: invalid UTF-8"));
}

#[test]
fn test_missing_document_is_io_error() {
    let (dir, site) = fixture();
    fs::remove_file(dir.path().join("document.html")).unwrap();
    let err = site
        .render_page(&dir.path().join("pages").join("about.html"))
        .unwrap_err();
    assert!(matches!(err, SiteError::Io { .. }));
    assert!(err.to_string().starts_with("open "));
}

#[tokio::test]
async fn test_respond_page() {
    let (_dir, site) = fixture();
    let response = respond(&site, "/about");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
    assert_eq!(
        body_of(response).await,
        "<html><head></head><body>About</body></html>"
    );
}

#[tokio::test]
async fn test_respond_page_error_writes_raw_message() {
    let (_dir, site) = fixture();
    let response = respond(&site, "/broken");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_of(response).await,
        "html: invalid UTF-8 sequence at byte offset 12"
    );
}

#[tokio::test]
async fn test_respond_static_file() {
    let (_dir, site) = fixture();
    let response = respond(&site, "/style.css");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/css; charset=utf-8");
    assert_eq!(body_of(response).await, "body { margin: 0 }");
}

#[tokio::test]
async fn test_respond_static_directory_index() {
    let (_dir, site) = fixture();
    let response = respond(&site, "/docs/");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_of(response).await, "static docs");
}

#[tokio::test]
async fn test_respond_not_found() {
    let (_dir, site) = fixture();
    let response = respond(&site, "/missing.png");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_of(response).await, "404 page not found");
}

#[tokio::test]
async fn test_respond_cannot_escape_static_dir() {
    let (_dir, site) = fixture();
    let response = respond(&site, "/../document.html");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_generate_writes_pages_and_static_files() {
    let (dir, site) = fixture();
    fs::remove_file(dir.path().join("pages").join("broken.html")).unwrap();
    let out = TempDir::new().unwrap();

    let report = generate(&site, out.path()).unwrap();
    assert_eq!(report.pages, 3);
    assert_eq!(report.static_files, 2);

    assert_eq!(
        fs::read_to_string(out.path().join("about.html")).unwrap(),
        "<html><head></head><body>About</body></html>"
    );
    assert_eq!(
        fs::read_to_string(out.path().join("blog").join("index.html")).unwrap(),
        "<html><head></head><body>Posts</body></html>"
    );
    assert_eq!(
        fs::read_to_string(out.path().join("style.css")).unwrap(),
        "body { margin: 0 }"
    );
}

#[test]
fn test_generate_page_overrides_static_file() {
    let (dir, site) = fixture();
    fs::remove_file(dir.path().join("pages").join("broken.html")).unwrap();
    write(dir.path(), "static/about.html", b"stale");
    let out = TempDir::new().unwrap();

    let _ = generate(&site, out.path()).unwrap();
    assert_eq!(
        fs::read_to_string(out.path().join("about.html")).unwrap(),
        "<html><head></head><body>About</body></html>"
    );
}

#[test]
fn test_generate_stops_at_broken_page() {
    let (_dir, site) = fixture();
    let out = TempDir::new().unwrap();
    let err = generate(&site, out.path()).unwrap_err();
    match err {
        GenerateError::Page { page, .. } => assert_eq!(page, Path::new("broken.html")),
        other => panic!("Expected Page error, got {other:?}"),
    }
}

#[test]
fn test_generate_skips_non_html_page_files() {
    let (dir, site) = fixture();
    fs::remove_file(dir.path().join("pages").join("broken.html")).unwrap();
    write(dir.path(), "pages/notes.txt", b"draft");
    let out = TempDir::new().unwrap();

    let report = generate(&site, out.path()).unwrap();
    assert_eq!(report.pages, 3);
    assert!(!out.path().join("notes.txt").exists());
}
