//! Parse errors.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! Two tiers exist. Recoverable parse errors ([`ParseIssue`]) are recorded and
//! parsing continues with the standard recovery. [`ParseError`] is fatal and
//! only raised when a configured resource limit is exceeded.

use serde::Serialize;
use strum_macros::Display;
use thiserror::Error;

/// A location in the (newline-normalized) input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    /// Number of characters consumed before this position.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl Position {
    /// The position before the first character.
    pub const START: Self = Self {
        offset: 0,
        line: 1,
        column: 1,
    };
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// The tokenizer codes are the ones the standard names. Tree construction
/// errors are not named by the standard; they get descriptive codes here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    // ===== Tokenizer =====
    /// "abrupt-closing-of-empty-comment"
    AbruptClosingOfEmptyComment,
    /// "abrupt-doctype-public-identifier"
    AbruptDoctypePublicIdentifier,
    /// "abrupt-doctype-system-identifier"
    AbruptDoctypeSystemIdentifier,
    /// "absence-of-digits-in-numeric-character-reference"
    AbsenceOfDigitsInNumericCharacterReference,
    /// "cdata-in-html-content"
    CdataInHtmlContent,
    /// "character-reference-outside-unicode-range"
    CharacterReferenceOutsideUnicodeRange,
    /// "control-character-in-input-stream"
    ControlCharacterInInputStream,
    /// "control-character-reference"
    ControlCharacterReference,
    /// "duplicate-attribute"
    DuplicateAttribute,
    /// "end-tag-with-attributes"
    EndTagWithAttributes,
    /// "end-tag-with-trailing-solidus"
    EndTagWithTrailingSolidus,
    /// "eof-before-tag-name"
    EofBeforeTagName,
    /// "eof-in-cdata"
    EofInCdata,
    /// "eof-in-comment"
    EofInComment,
    /// "eof-in-doctype"
    EofInDoctype,
    /// "eof-in-script-html-comment-like-text"
    EofInScriptHtmlCommentLikeText,
    /// "eof-in-tag"
    EofInTag,
    /// "incorrectly-closed-comment"
    IncorrectlyClosedComment,
    /// "incorrectly-opened-comment"
    IncorrectlyOpenedComment,
    /// "invalid-character-sequence-after-doctype-name"
    InvalidCharacterSequenceAfterDoctypeName,
    /// "invalid-first-character-of-tag-name"
    InvalidFirstCharacterOfTagName,
    /// "missing-attribute-value"
    MissingAttributeValue,
    /// "missing-doctype-name"
    MissingDoctypeName,
    /// "missing-doctype-public-identifier"
    MissingDoctypePublicIdentifier,
    /// "missing-doctype-system-identifier"
    MissingDoctypeSystemIdentifier,
    /// "missing-end-tag-name"
    MissingEndTagName,
    /// "missing-quote-before-doctype-public-identifier"
    MissingQuoteBeforeDoctypePublicIdentifier,
    /// "missing-quote-before-doctype-system-identifier"
    MissingQuoteBeforeDoctypeSystemIdentifier,
    /// "missing-semicolon-after-character-reference"
    MissingSemicolonAfterCharacterReference,
    /// "missing-whitespace-after-doctype-public-keyword"
    MissingWhitespaceAfterDoctypePublicKeyword,
    /// "missing-whitespace-after-doctype-system-keyword"
    MissingWhitespaceAfterDoctypeSystemKeyword,
    /// "missing-whitespace-before-doctype-name"
    MissingWhitespaceBeforeDoctypeName,
    /// "missing-whitespace-between-attributes"
    MissingWhitespaceBetweenAttributes,
    /// "missing-whitespace-between-doctype-public-and-system-identifiers"
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
    /// "nested-comment"
    NestedComment,
    /// "noncharacter-character-reference"
    NoncharacterCharacterReference,
    /// "noncharacter-in-input-stream"
    NoncharacterInInputStream,
    /// "non-void-html-element-start-tag-with-trailing-solidus"
    NonVoidHtmlElementStartTagWithTrailingSolidus,
    /// "null-character-reference"
    NullCharacterReference,
    /// "surrogate-character-reference"
    SurrogateCharacterReference,
    /// "unexpected-character-after-doctype-system-identifier"
    UnexpectedCharacterAfterDoctypeSystemIdentifier,
    /// "unexpected-character-in-attribute-name"
    UnexpectedCharacterInAttributeName,
    /// "unexpected-character-in-unquoted-attribute-value"
    UnexpectedCharacterInUnquotedAttributeValue,
    /// "unexpected-equals-sign-before-attribute-name"
    UnexpectedEqualsSignBeforeAttributeName,
    /// "unexpected-null-character"
    UnexpectedNullCharacter,
    /// "unexpected-question-mark-instead-of-tag-name"
    UnexpectedQuestionMarkInsteadOfTagName,
    /// "unexpected-solidus-in-tag"
    UnexpectedSolidusInTag,
    /// "unknown-named-character-reference"
    UnknownNamedCharacterReference,

    // ===== Tree construction =====
    /// A document started without a DOCTYPE.
    MissingDoctype,
    /// A DOCTYPE token after the initial insertion mode.
    UnexpectedDoctype,
    /// A DOCTYPE other than `<!DOCTYPE html>` or the legacy-compat form.
    NonConformingDoctype,
    /// A start tag that is not allowed in the current insertion mode.
    UnexpectedStartTag,
    /// An end tag with no matching open element, or not allowed here.
    UnexpectedEndTag,
    /// Non-whitespace text where only whitespace is allowed.
    UnexpectedCharacter,
    /// An element was closed while other elements above it were still open.
    EndTagNotCurrentNode,
    /// A formatting element was closed out of order.
    MisnestedFormattingElement,
    /// Text or elements were moved out of a table.
    FosterParentedContent,
    /// End of input while non-optional elements were still open.
    EofWithUnclosedElements,
    /// End of input inside a raw text or RCDATA element.
    EofInText,
}

/// A recoverable parse error: what went wrong and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParseIssue {
    /// The error code.
    pub code: ErrorKind,
    /// Input position at which the error was detected.
    pub position: Position,
}

/// The resource a [`ParseError::ResourceExhausted`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    /// Depth of the stack of open elements.
    NestingDepth,
    /// Number of tokens handed to the tree builder.
    TokenCount,
    /// Number of times a single token was reprocessed.
    Reprocessing,
}

/// Fatal parse failure. Malformed markup never produces one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A configured limit was exceeded; the parse was abandoned.
    #[error("resource exhausted: {resource} exceeded the limit of {limit} (at line {}, column {})", .position.line, .position.column)]
    ResourceExhausted {
        /// Which limit was hit.
        resource: Resource,
        /// The configured limit.
        limit: usize,
        /// Input position when the limit was hit.
        position: Position,
    },
}
