use std::path::{Path, PathBuf};

/// Default site root, relative to the working directory.
pub const DEFAULT_SITE_ROOT: &str = "site";

/// Where a site's pieces live on disk.
///
/// By default everything sits under one root:
///
/// ```text
/// <root>/document.html   shared document template
/// <root>/pages/          page files, one per route
/// <root>/static/         served as-is when no page matches
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    root: PathBuf,
    pages_dir: PathBuf,
    static_dir: PathBuf,
    document_path: PathBuf,
}

impl SiteConfig {
    /// Use the standard layout beneath `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            pages_dir: root.join("pages"),
            static_dir: root.join("static"),
            document_path: root.join("document.html"),
            root,
        }
    }

    /// Read page files from `dir` instead of `<root>/pages`.
    #[must_use]
    pub fn with_pages_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pages_dir = dir.into();
        self
    }

    /// Serve static files from `dir` instead of `<root>/static`.
    #[must_use]
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    /// Load the document template from `path` instead of `<root>/document.html`.
    #[must_use]
    pub fn with_document_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.document_path = path.into();
        self
    }

    /// The site root the default layout was derived from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one page file per route.
    #[must_use]
    pub fn pages_dir(&self) -> &Path {
        &self.pages_dir
    }

    /// Directory served as-is when no page matches.
    #[must_use]
    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    /// The shared document template.
    #[must_use]
    pub fn document_path(&self) -> &Path {
        &self.document_path
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SITE_ROOT)
    }
}
