//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", "Reconsume in")
//! - Input/character handling ("Consume the next input character")
//! - Token emission ("Emit the current token"), including text coalescing
//! - Raw text helpers for `<script>`, `<style>`, `<title>` and friends
//! - Attribute helpers for duplicate detection

use epic_common::warning::warn_once;

use super::core::{HTMLTokenizer, TokenizerState};
use super::token::Token;

/// Elements whose contents are tokenized as raw text up to the matching end tag.
///
/// Covers the RCDATA (`title`, `textarea`), RAWTEXT and script data elements.
/// `noscript` is included because scripting is always assumed to be enabled.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "noscript", "script", "style", "textarea", "title", "xmp",
];

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer<'_> {
    /// "Switch to the X state"
    ///
    /// The next character will be consumed on the next step.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// The same character will be processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl HTMLTokenizer<'_> {
    /// "Consume the next input character"
    ///
    /// Returns None once the valid input is exhausted.
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    /// "If the next few characters are..."
    #[must_use]
    pub(super) fn next_few_characters_are(&self, target: &str) -> bool {
        self.input[self.current_pos..].starts_with(target)
    }

    /// "ASCII case-insensitive match for the word 'DOCTYPE'"
    #[must_use]
    pub(super) fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        self.input
            .get(self.current_pos..self.current_pos + target.len())
            .is_some_and(|next| next.eq_ignore_ascii_case(target))
    }

    /// Consume the given ASCII string from the input.
    /// Caller must have already verified the characters are present.
    pub(super) const fn consume_string(&mut self, target: &str) {
        self.current_pos += target.len();
    }

    /// [ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// Includes CR: input is not newline-normalized, so CR can reach tag states.
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\r' | '\x0C')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer<'_> {
    /// "Emit the current token"
    ///
    /// Pending text is flushed first so tokens stay in source order. Emitting a
    /// start tag for a raw text element switches the tokenizer into the raw text
    /// state, which the tree builder would otherwise do.
    pub(super) fn emit_token(&mut self) {
        let Some(mut token) = self.current_token.take() else {
            return;
        };
        token.remove_duplicate_attributes();
        self.flush_text();

        if let Token::StartTag { ref name, .. } = token {
            if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                self.switch_to(TokenizerState::RawText);
            } else if name == "plaintext" {
                self.switch_to(TokenizerState::Plaintext);
            }
            self.last_start_tag_name = Some(name.clone());
        }
        self.ready.push_back(token);
    }

    /// "Emit the current input character as a character token."
    ///
    /// Characters accumulate into a single text token until something else is
    /// emitted.
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.pending_text.push(c);
    }

    /// Move accumulated characters into the output as one [`Token::Text`].
    pub(super) fn flush_text(&mut self) {
        if !self.pending_text.is_empty() {
            let data = std::mem::take(&mut self.pending_text);
            self.ready.push_back(Token::Text { data });
        }
    }

    /// "Emit an end-of-file token."
    ///
    /// End of file is the end of iteration rather than a token of its own.
    pub(super) fn emit_eof_token(&mut self) {
        self.flush_text();
        self.finished = true;
    }

    /// "This is an eof-in-tag parse error. Emit an end-of-file token."
    ///
    /// The unfinished tag is dropped.
    pub(super) fn eof_in_tag(&mut self) {
        self.log_parse_error("eof-in-tag");
        self.current_token = None;
        self.emit_eof_token();
    }

    /// "This is an eof-in-comment parse error. Emit the current comment token.
    /// Emit an end-of-file token."
    pub(super) fn eof_in_comment(&mut self) {
        self.log_parse_error("eof-in-comment");
        self.emit_token();
        self.emit_eof_token();
    }

    pub(super) fn append_to_tag_name(&mut self, c: char) {
        if let Some(ref mut token) = self.current_token {
            token.append_to_tag_name(c);
        }
    }

    pub(super) fn append_to_attribute_name(&mut self, c: char) {
        if let Some(ref mut token) = self.current_token {
            token.append_to_current_attribute_name(c);
        }
    }

    pub(super) fn append_to_attribute_value(&mut self, c: char) {
        if let Some(ref mut token) = self.current_token {
            token.append_to_current_attribute_value(c);
        }
    }

    pub(super) fn append_to_comment(&mut self, s: &str) {
        if let Some(ref mut token) = self.current_token {
            token.append_to_comment(s);
        }
    }
}

// =============================================================================
// Raw Text Helpers
// =============================================================================

impl HTMLTokenizer<'_> {
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    ///
    /// Used to determine if `</style>` should close the current `<style>` element.
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        match (&self.last_start_tag_name, &self.current_token) {
            (Some(last_start_tag), Some(Token::EndTag { name, .. })) => name == last_start_tag,
            _ => false,
        }
    }

    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    ///
    /// "Anything else":
    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS character
    /// token, and a character token for each of the characters in the temporary
    /// buffer... Reconsume in the RAWTEXT state."
    pub(super) fn emit_raw_text_end_tag_name_anything_else(&mut self) {
        self.pending_text.push_str("</");
        let buffer = std::mem::take(&mut self.temporary_buffer);
        self.pending_text.push_str(&buffer);
        self.current_token = None;
        self.reconsume_in(TokenizerState::RawText);
    }
}

// =============================================================================
// Attribute Helpers
// =============================================================================

impl HTMLTokenizer<'_> {
    /// "When the user agent leaves the attribute name state... if there is
    /// already an attribute on the token with the exact same name, then this
    /// is a duplicate-attribute parse error and the new attribute must be
    /// removed from the token."
    ///
    /// Only the parse error is reported here. The duplicate still has a value to
    /// read, so it is removed when the tag is emitted.
    pub(super) fn check_duplicate_attribute(&self) {
        let is_duplicate = self
            .current_token
            .as_ref()
            .is_some_and(Token::current_attribute_name_is_duplicate);

        if is_duplicate {
            self.log_parse_error("duplicate-attribute");
        }
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl HTMLTokenizer<'_> {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Parse errors are not fatal; they are reported through the deduplicating
    /// warning channel and tokenization continues.
    pub(super) fn log_parse_error(&self, code: &str) {
        tracing::debug!(code, offset = self.current_pos, state = %self.state, "parse error");
        warn_once("HTML Tokenizer", &self.parse_error_message(code));
    }

    /// One message per error code and state, so a page full of the same
    /// mistake logs a single warning.
    fn parse_error_message(&self, code: &str) -> String {
        format!("{code} parse error ({} state)", self.state)
    }
}
