use std::io;
use std::path::Path;

/// A file read from the static directory, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFile {
    content_type: String,
    contents: Vec<u8>,
}

impl StaticFile {
    /// Look up a cleaned request path beneath `static_dir`.
    ///
    /// A directory is served through its `index.html`. Returns `Ok(None)` when
    /// nothing is there.
    ///
    /// # Errors
    ///
    /// Any I/O failure other than the file not existing.
    pub fn open(static_dir: &Path, cleaned: &str) -> io::Result<Option<Self>> {
        let mut path = static_dir.to_path_buf();
        path.extend(cleaned.split('/').filter(|segment| !segment.is_empty()));
        if path.is_dir() {
            path.push("index.html");
        }

        let contents = match std::fs::read(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };

        Ok(Some(Self {
            content_type: content_type_for(&path),
            contents,
        }))
    }

    /// MIME type guessed from the file extension.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Take the file's bytes.
    #[must_use]
    pub fn into_contents(self) -> Vec<u8> {
        self.contents
    }
}

/// Guess a `Content-Type` header value from a path's extension.
///
/// Text types are labelled UTF-8; unknown extensions are
/// `application/octet-stream`.
#[must_use]
pub fn content_type_for(path: &Path) -> String {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() == mime_guess::mime::TEXT && mime.get_param("charset").is_none() {
        format!("{mime}; charset=utf-8")
    } else {
        mime.to_string()
    }
}
