use epic_html::{HTMLTokenizer, Token, TokenizeError};
use serde::Serialize;
use thiserror::Error;

/// The two pieces cut out of a page file.
///
/// Field names double as the template variables `head` and `page`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Fragments {
    /// Everything captured inside `<head>`, wrapper tags removed.
    pub head: String,
    /// Everything captured inside `<template>`, wrapper tags removed.
    pub page: String,
}

/// The page could not be tokenized to the end.
///
/// The fragments gathered before the failure are kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source}")]
pub struct SsrError {
    source: TokenizeError,
    partial: Fragments,
}

impl SsrError {
    /// Fragments accumulated before the tokenizer gave up.
    #[must_use]
    pub const fn partial(&self) -> &Fragments {
        &self.partial
    }

    /// Take the partial fragments, dropping the error.
    #[must_use]
    pub fn into_partial(self) -> Fragments {
        self.partial
    }

    /// The tokenizer failure.
    #[must_use]
    pub const fn tokenize_error(&self) -> &TokenizeError {
        &self.source
    }
}

/// Which region the scanner believes it is in.
///
/// A single slot: opening a region while inside another replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanContext {
    None,
    InHead,
    InTemplate,
}

impl ScanContext {
    fn opened_by(token: &Token) -> Option<Self> {
        match token {
            Token::StartTag { name, .. } if name == "head" => Some(Self::InHead),
            Token::StartTag { name, .. } if name == "template" => Some(Self::InTemplate),
            _ => None,
        }
    }
}

/// Split page HTML into its head and page fragments.
///
/// Tokens between a `<head>` start tag and the next end tag of any name go
/// to [`Fragments::head`]; tokens between a `<template>` start tag and the
/// next end tag go to [`Fragments::page`]. The wrapper start tag and the end
/// tag that closes the region are both dropped, as is everything outside the
/// two regions. Regions do not nest, so `<template><span>X</span></template>`
/// yields the page `<span>X`.
///
/// # Errors
///
/// Returns [`SsrError`] if the input is not valid UTF-8. The error carries
/// whatever was captured before the bad byte.
pub fn ssr_document(page_html: &[u8]) -> Result<Fragments, SsrError> {
    let mut context = ScanContext::None;
    let mut fragments = Fragments::default();

    for token in HTMLTokenizer::new(page_html) {
        if let Token::Error(source) = token {
            return Err(SsrError {
                source,
                partial: fragments,
            });
        }

        if let Some(opened) = ScanContext::opened_by(&token) {
            context = opened;
            continue;
        }

        if token.is_end_tag() {
            context = ScanContext::None;
            continue;
        }

        match context {
            ScanContext::InHead => fragments.head.push_str(&token.to_string()),
            ScanContext::InTemplate => fragments.page.push_str(&token.to_string()),
            ScanContext::None => {}
        }
    }

    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opened_by_ignores_self_closing_and_end_tags() {
        let self_closing = Token::SelfClosingTag {
            name: "head".to_string(),
            attributes: Vec::new(),
        };
        assert_eq!(ScanContext::opened_by(&self_closing), None);

        let mut end = Token::new_end_tag();
        for c in "template".chars() {
            end.append_to_tag_name(c);
        }
        assert_eq!(ScanContext::opened_by(&end), None);
    }

    #[test]
    fn test_error_display_is_tokenizer_message() {
        let err = ssr_document(b"<head>ok\xFE").unwrap_err();
        assert_eq!(
            err.to_string(),
            "html: invalid UTF-8 sequence at byte offset 8"
        );
        assert_eq!(err.tokenize_error(), &TokenizeError::InvalidUtf8 { offset: 8 });
        assert_eq!(err.into_partial().head, "ok");
    }
}
