//! HTML tokenizer module.
//!
//! Implements a subset of [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard, exposed as an [`Iterator`] of [`Token`]s.

/// HTML tokenizer state machine implementation.
pub mod core;
/// Helper methods for tokenizer state transitions.
pub mod helpers;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::HTMLTokenizer;
pub use token::{Attribute, Token, TokenizeError};
