//! Server-side rendering of epic pages.
//!
//! A page file carries its own `<head>` contents and its body inside a
//! `<template>` element. [`ssr_document`] cuts those two regions out of the
//! token stream, and [`DocumentTemplate`] injects them into the shared
//! `document.html` shell.
//!
//! ```
//! use epic_ssr::{DocumentTemplate, ssr_document};
//!
//! let fragments = ssr_document(b"<head><meta charset=utf-8><template><p>Body").unwrap();
//! let document = DocumentTemplate::parse(
//!     "doc",
//!     "<html><head>{{ head }}</head><body>{{ page }}</body></html>",
//! )
//! .unwrap();
//! assert_eq!(
//!     document.render(&fragments).unwrap(),
//!     r#"<html><head><meta charset="utf-8"></head><body><p>Body</body></html>"#,
//! );
//! ```

/// Rendering fragments into the shared document shell.
pub mod document;
/// The head/page token partitioner.
pub mod partition;

pub use document::{DocumentTemplate, TemplateError};
pub use partition::{Fragments, SsrError, ssr_document};
