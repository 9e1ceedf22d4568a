//! HTML tokenizer module.
//!
//! Implements [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard.
//!
//! The tokenizer is resumable: input arrives in chunks through
//! [`HTMLTokenizer::feed`], and [`HTMLTokenizer::next_token`] returns `None`
//! when it needs more input. All partial state lives in the tokenizer, so a
//! chunk boundary can fall anywhere, including inside a tag name, a comment
//! or a character reference.

/// Character reference states per § 13.2.5.72 - § 13.2.5.80.
mod character_reference;
/// HTML tokenizer state machine implementation.
mod core;
/// Helper methods for tokenizer state transitions and emission.
mod helpers;
mod input;
/// Named character reference lookup table per § 13.5.
pub mod named_character_references;
/// Token types produced by the tokenizer.
mod token;

pub use self::core::{HTMLTokenizer, TokenizerConfig, TokenizerState, TokenizerStats};
pub use self::token::{Attribute, Token};

/// Tokenize a complete input from the data state.
///
/// No tree builder is attached, so start tags such as `<title>` do not switch
/// the tokenizer into RCDATA. Parse errors are discarded; use
/// [`HTMLTokenizer`] directly to collect them.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new(TokenizerConfig::default());
    tokenizer.feed(input);
    tokenizer.end();
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next_token() {
        tokens.push(token);
    }
    tokens
}
