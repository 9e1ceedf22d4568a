//! Error-tolerant, incremental HTML parsing.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Every tokenizer state, including script data, CDATA and the character
//!     reference states
//!   - Resumable: input may arrive in chunks split at any character
//!
//! - **HTML Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All 23 insertion modes and the rules for foreign content
//!   - Foster parenting, the adoption agency algorithm, templates, framesets
//!     and quirks mode
//!
//! - **Fragment parsing** ([WHATWG § 13.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments))
//!
//! Parsing never fails on malformed markup. Recoverable errors are collected
//! as [`ParseIssue`]s next to the tree; [`ParseError`] is only returned when a
//! [`ParseLimits`] bound is exceeded.
//!
//! # Not Implemented
//!
//! - Script execution and `document.write`
//! - Encoding sniffing: input is already-decoded text

/// Parser options and resource limits.
pub mod config;
/// Streaming and one-shot entry points.
pub mod driver;
/// Parse errors, recoverable and fatal.
pub mod error;
/// HTML tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use config::{ParseLimits, ParserConfig};
pub use driver::{
    Document, Fragment, Parser, parse_document, parse_document_chunks, parse_document_with,
    parse_fragment, parse_fragment_with,
};
pub use error::{ErrorKind, ParseError, ParseIssue, Position, Resource};
pub use parser::{InsertionMode, TreeBuilder};
pub use tokenizer::{Attribute, HTMLTokenizer, Token, TokenizerState};
