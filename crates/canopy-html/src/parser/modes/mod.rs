//! The insertion mode rules.
//!
//! [§ 13.2.6.4 The rules for parsing tokens in HTML content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml)
//!
//! Each mode is an `impl TreeBuilder` method returning a [`Flow`]. Modes are
//! grouped by the part of the document they build.
//!
//! [`Flow`]: super::core::Flow

mod after;
mod body;
mod document;
mod foreign;
mod select;
mod table;
mod template;

/// "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE
/// FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020
/// SPACE"
pub(super) const fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}
