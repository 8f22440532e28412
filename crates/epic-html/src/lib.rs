//! Streaming HTML tokenizer for the epic site tool.
//!
//! # Scope
//!
//! This crate implements a pull-based tokenizer modeled on
//! [WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
//! - Data, raw text (RCDATA/RAWTEXT/script data collapsed into one state) and
//!   PLAINTEXT states
//! - Tag, attribute, comment and DOCTYPE states
//! - UTF-8 validation: invalid input surfaces as a [`Token::Error`] once the
//!   tokenizer reaches the bad byte
//!
//! Every token renders back to HTML through its `Display` impl, so callers can
//! cut a document into pieces without building a tree.
//!
//! # Not Implemented
//!
//! - Character reference decoding (references pass through as literal text)
//! - Script data escape states
//! - CDATA sections (treated as bogus comments)
//! - Tree construction

/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use tokenizer::{Attribute, HTMLTokenizer, Token, TokenizeError};
