use std::io;
use std::path::{Path, PathBuf};

use epic_common::warning::clear_warnings;
use thiserror::Error;
use walkdir::WalkDir;

use crate::site::{Site, SiteError};

/// Default output directory for `epic generate`.
pub const DEFAULT_OUT_DIR: &str = "dist";

/// What a static export produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// Pages rendered through the document template.
    pub pages: usize,
    /// Files copied unchanged from the static directory.
    pub static_files: usize,
}

/// The export stopped at the first problem.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Walking a source directory or writing the output failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A page failed to render.
    #[error("rendering {}: {source}", page.display())]
    Page {
        /// The page file, relative to the pages directory.
        page: PathBuf,
        /// Why rendering failed.
        #[source]
        source: SiteError,
    },
}

/// Write the whole site to `out_dir` for static hosting.
///
/// Static files are copied first, then every `.html` file under the pages
/// directory is rendered to the same relative path. A page therefore replaces
/// a static file of the same name, as it would when serving. A missing
/// pages or static directory counts as empty.
///
/// # Errors
///
/// Stops at the first file that cannot be read, rendered or written.
pub fn generate(site: &Site, out_dir: &Path) -> Result<GenerateReport, GenerateError> {
    clear_warnings();
    let mut report = GenerateReport::default();
    let config = site.config();

    for (source, relative) in files_under(config.static_dir())? {
        let target = out_dir.join(&relative);
        create_parent(&target)?;
        let _ = std::fs::copy(&source, &target).map_err(|err| io_error(&target, err))?;
        tracing::debug!(file = %relative.display(), "copied static file");
        report.static_files += 1;
    }

    let document = site.load_document().map_err(|source| GenerateError::Page {
        page: PathBuf::from(config.document_path()),
        source,
    })?;

    for (source, relative) in files_under(config.pages_dir())? {
        if source.extension().is_none_or(|ext| ext != "html") {
            continue;
        }
        let html = site
            .render_with(&document, &source)
            .map_err(|err| GenerateError::Page {
                page: relative.clone(),
                source: err,
            })?;

        let target = out_dir.join(&relative);
        create_parent(&target)?;
        std::fs::write(&target, html).map_err(|err| io_error(&target, err))?;
        tracing::info!(page = %relative.display(), "rendered page");
        report.pages += 1;
    }

    Ok(report)
}

/// Every regular file below `dir`, paired with its path relative to `dir`,
/// in a stable order.
fn files_under(dir: &Path) -> Result<Vec<(PathBuf, PathBuf)>, GenerateError> {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "directory not found, skipping");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(dir).to_path_buf();
            GenerateError::Io {
                path,
                source: err.into(),
            }
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(dir) {
            files.push((entry.path().to_path_buf(), relative.to_path_buf()));
        }
    }
    Ok(files)
}

fn create_parent(target: &Path) -> Result<(), GenerateError> {
    match target.parent() {
        Some(parent) => std::fs::create_dir_all(parent).map_err(|err| io_error(parent, err)),
        None => Ok(()),
    }
}

fn io_error(path: &Path, source: io::Error) -> GenerateError {
    GenerateError::Io {
        path: path.to_path_buf(),
        source,
    }
}
