use std::io;
use std::path::{Path, PathBuf};

use epic_ssr::{DocumentTemplate, SsrError, TemplateError, ssr_document};
use thiserror::Error;

use crate::config::SiteConfig;
use crate::route::{Route, resolve_route};
use crate::static_files::StaticFile;

/// Rendering a page failed.
///
/// The message is what the visitor sees, so it is the underlying error text
/// with no extra wrapping.
#[derive(Debug, Error)]
pub enum SiteError {
    /// Reading the document template or a page file failed.
    #[error("open {}: {source}", path.display())]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// Why the read failed.
        #[source]
        source: io::Error,
    },
    /// The document template is broken.
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// The page file could not be tokenized.
    #[error(transparent)]
    Ssr(#[from] SsrError),
}

impl SiteError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A site on disk.
///
/// Nothing is cached: every render reads the document template and the page
/// again, so edits show up on the next request.
#[derive(Debug, Clone)]
pub struct Site {
    config: SiteConfig,
}

impl Site {
    /// A site laid out as `config` describes.
    #[must_use]
    pub const fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    /// Where the site's files live.
    #[must_use]
    pub const fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Map a request path to a page or a static file.
    #[must_use]
    pub fn resolve(&self, request_path: &str) -> Route {
        resolve_route(&self.config, request_path)
    }

    /// Read and parse the shared document template.
    ///
    /// # Errors
    ///
    /// [`SiteError::Io`] if the file cannot be read, [`SiteError::Template`]
    /// if it does not parse.
    pub fn load_document(&self) -> Result<DocumentTemplate, SiteError> {
        let path = self.config.document_path();
        let source = std::fs::read_to_string(path).map_err(|err| SiteError::io(path, err))?;
        Ok(DocumentTemplate::parse(&path.display().to_string(), &source)?)
    }

    /// Render one page file into the document template.
    ///
    /// # Errors
    ///
    /// Any failure reading the files, parsing the template, partitioning the
    /// page or rendering the result.
    pub fn render_page(&self, page: &Path) -> Result<String, SiteError> {
        let document = self.load_document()?;
        self.render_with(&document, page)
    }

    /// Render one page file into an already loaded document template.
    ///
    /// # Errors
    ///
    /// As [`Site::render_page`], minus loading the template.
    pub fn render_with(&self, document: &DocumentTemplate, page: &Path) -> Result<String, SiteError> {
        let page_html = std::fs::read(page).map_err(|err| SiteError::io(page, err))?;
        let fragments = ssr_document(&page_html)?;
        tracing::debug!(
            page = %page.display(),
            head_len = fragments.head.len(),
            page_len = fragments.page.len(),
            "partitioned page"
        );
        Ok(document.render(&fragments)?)
    }

    /// Look a cleaned path up in the static directory.
    ///
    /// # Errors
    ///
    /// I/O failures other than the file not existing.
    pub fn open_static(&self, cleaned: &str) -> io::Result<Option<StaticFile>> {
        StaticFile::open(self.config.static_dir(), cleaned)
    }
}
