//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", "Reconsume in")
//! - Token emission ("Emit the current token")
//! - RCDATA/RAWTEXT/script end tag helpers
//! - Parse error reporting

use std::mem;

use canopy_common::warning::warn_once;

use super::core::{DoctypeBuilder, HTMLTokenizer, TokenizerState};
use super::token::{TagBuilder, TagKind, Token};
use crate::error::{ErrorKind, ParseIssue};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
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

    /// Consume `word`, which a lookahead just matched.
    pub(super) fn consume_word(&mut self, word: &str) {
        self.input.consume_matched(word);
        self.stats.characters += word.len();
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// The tokenizer's whitespace set: tab, LF, FF and space. CR never
    /// reaches the tokenizer.
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Emit the current input character as a character token."
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.queue.push_back(Token::Character { data: c });
    }

    /// "Emit an end-of-file token."
    ///
    /// Nothing is produced after it.
    pub(super) fn emit_eof_token(&mut self) {
        self.queue.push_back(Token::EndOfFile);
        self.finished = true;
    }

    /// "Emit the current tag token."
    ///
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    /// "When an end tag token is emitted with attributes, that is an
    /// end-tag-with-attributes parse error. When an end tag token is emitted
    /// with its self-closing flag set, that is an end-tag-with-trailing-solidus
    /// parse error."
    pub(super) fn emit_current_tag(&mut self) {
        let tag = mem::replace(&mut self.current_tag, TagBuilder::new(TagKind::Start));
        let (token, had_attributes, had_trailing_solidus) = tag.finish();
        if had_attributes {
            self.parse_error(ErrorKind::EndTagWithAttributes);
        }
        if had_trailing_solidus {
            self.parse_error(ErrorKind::EndTagWithTrailingSolidus);
        }
        // "The last start tag token emitted is used ... in the RCDATA, RAWTEXT,
        // and script data states."
        if let Token::StartTag { ref name, .. } = token {
            self.last_start_tag_name = Some(name.clone());
        }
        self.queue.push_back(token);
    }

    /// "Emit the current comment token."
    pub(super) fn emit_current_comment(&mut self) {
        let data = mem::take(&mut self.current_comment);
        self.queue.push_back(Token::Comment { data });
    }

    /// "Emit the current DOCTYPE token."
    pub(super) fn emit_current_doctype(&mut self) {
        let doctype = mem::take(&mut self.current_doctype);
        let DoctypeBuilder {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } = doctype;
        self.queue.push_back(Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        });
    }
}

// =============================================================================
// RCDATA/RAWTEXT Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any. If no start tag has been emitted from this tokenizer,
    /// then no end tag token is appropriate."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        self.current_tag.kind == TagKind::End
            && self
                .last_start_tag_name
                .as_deref()
                .is_some_and(|last| last == self.current_tag.name)
    }

    /// "Anything else" in the RCDATA, RAWTEXT, script data and script data
    /// escaped end tag name states:
    ///
    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS character
    /// token, and a character token for each of the characters in the temporary
    /// buffer (in the order they were added to the buffer). Reconsume in the
    /// ... state."
    pub(super) fn emit_end_tag_name_anything_else(&mut self, text_state: TokenizerState) {
        // STEP 1: "Emit a U+003C LESS-THAN SIGN character token"
        self.emit_character_token('<');
        // STEP 2: "Emit a U+002F SOLIDUS character token"
        self.emit_character_token('/');
        // STEP 3: "Emit a character token for each of the characters in the temporary buffer"
        let buffer = mem::take(&mut self.temporary_buffer);
        for c in buffer.chars() {
            self.emit_character_token(c);
        }
        // STEP 4: Discard the current end tag token
        self.current_tag = TagBuilder::new(TagKind::Start);
        // STEP 5: "Reconsume in the ... state"
        self.reconsume_in(text_state);
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Records a parse error at the current input position. Parse errors in
    /// HTML are not fatal: the tokenizer recovers and continues.
    pub(super) fn parse_error(&mut self, code: ErrorKind) {
        let position = self.input.position();
        self.errors.push(ParseIssue { code, position });
        self.stats.errors += 1;
        let _ = warn_once("HTML Tokenizer", &format!("parse error: {code}"));
    }
}
