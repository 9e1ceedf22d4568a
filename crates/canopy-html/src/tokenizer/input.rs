//! Decoded input stream for the tokenizer.
//!
//! The stream is append-only: callers push chunks as they arrive and mark the
//! end of the stream once. The tokenizer never looks behind its cursor, so
//! consumed text is dropped periodically to keep long streams bounded.

use crate::error::Position;

/// Consumed bytes are dropped once at least this many have accumulated.
const COMPACT_THRESHOLD: usize = 64 * 1024;

/// Result of asking the stream for its next character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Next {
    /// A character was consumed.
    Char(char),
    /// The stream is closed and fully consumed.
    Eof,
    /// Nothing is buffered yet, but the stream is still open.
    NeedMoreInput,
}

/// Result of a lookahead match against a fixed ASCII word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatchResult {
    /// The word is next in the input.
    Matched,
    /// The word is definitely not next in the input.
    NoMatch,
    /// The buffered input is a prefix of the word; more input decides.
    NeedMoreInput,
}

/// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
#[derive(Debug, Default)]
pub(crate) struct InputStream {
    buffer: String,
    cursor: usize,
    end_of_stream: bool,
    /// The last pushed chunk ended in CR, so a leading LF in the next chunk
    /// belongs to the same newline.
    pending_cr: bool,
    /// Position of the next character to be consumed.
    next_position: Position,
    /// Position of the most recently consumed character.
    current_position: Position,
}

impl InputStream {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// "Before the tokenization stage, the input stream must be preprocessed
    /// by normalizing newlines. Thus, newlines in HTML DOMs are represented by
    /// U+000A LF characters, and there are never any U+000D CR characters in
    /// the input to the tokenization stage."
    ///
    /// "To normalize newlines in a string, replace every U+000D CR U+000A LF
    /// code point pair with a single U+000A LF code point, and then replace
    /// every remaining U+000D CR code point with a U+000A LF code point."
    pub(crate) fn push_str(&mut self, text: &str) {
        if self.end_of_stream {
            return;
        }
        self.compact();
        self.buffer.reserve(text.len());
        for c in text.chars() {
            match c {
                '\r' => {
                    self.buffer.push('\n');
                    self.pending_cr = true;
                }
                '\n' if self.pending_cr => {
                    self.pending_cr = false;
                }
                c => {
                    self.buffer.push(c);
                    self.pending_cr = false;
                }
            }
        }
    }

    /// Mark the end of the stream. Further pushes are ignored.
    pub(crate) const fn close(&mut self) {
        self.end_of_stream = true;
    }

    /// Consume the next input character.
    pub(crate) fn next_char(&mut self) -> Next {
        match self.buffer[self.cursor..].chars().next() {
            Some(c) => {
                self.cursor += c.len_utf8();
                self.advance_position(c);
                Next::Char(c)
            }
            None if self.end_of_stream => {
                self.current_position = self.next_position;
                Next::Eof
            }
            None => Next::NeedMoreInput,
        }
    }

    /// Check whether `word` comes next, without consuming anything.
    ///
    /// "If the next few characters are..." lookahead. `word` must be ASCII.
    pub(crate) fn lookahead(&self, word: &str, case_insensitive: bool) -> MatchResult {
        let rest = self.buffer[self.cursor..].as_bytes();
        for (i, expected) in word.bytes().enumerate() {
            let Some(&actual) = rest.get(i) else {
                return if self.end_of_stream {
                    MatchResult::NoMatch
                } else {
                    MatchResult::NeedMoreInput
                };
            };
            let same = if case_insensitive {
                actual.eq_ignore_ascii_case(&expected)
            } else {
                actual == expected
            };
            if !same {
                return MatchResult::NoMatch;
            }
        }
        MatchResult::Matched
    }

    /// Consume `word`, which a preceding [`lookahead`](Self::lookahead)
    /// reported as [`MatchResult::Matched`].
    pub(crate) fn consume_matched(&mut self, word: &str) {
        for _ in 0..word.len() {
            let _ = self.next_char();
        }
    }

    /// Position of the current input character (the last one consumed).
    pub(crate) const fn position(&self) -> Position {
        self.current_position
    }

    fn advance_position(&mut self, c: char) {
        self.current_position = self.next_position;
        self.next_position.offset += 1;
        if c == '\n' {
            self.next_position.line += 1;
            self.next_position.column = 1;
        } else {
            self.next_position.column += 1;
        }
    }

    fn compact(&mut self) {
        if self.cursor >= COMPACT_THRESHOLD {
            let _ = self.buffer.drain(..self.cursor);
            self.cursor = 0;
        }
    }
}
