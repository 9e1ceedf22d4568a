//! Parser configuration.

use serde::Deserialize;

/// Hard bounds on the work a single parse may do.
///
/// Exceeding any of them aborts the parse with
/// [`ParseError::ResourceExhausted`](crate::ParseError::ResourceExhausted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseLimits {
    /// Maximum depth of the stack of open elements.
    pub max_nesting_depth: usize,
    /// Maximum number of tokens handed to the tree builder.
    pub max_tokens: usize,
    /// Maximum number of times a single token may be reprocessed.
    ///
    /// End of file inside nested templates is reprocessed once per template,
    /// so this should stay above `max_nesting_depth`.
    pub max_reprocess: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_nesting_depth: 512,
            max_tokens: 50_000_000,
            max_reprocess: 1024,
        }
    }
}

/// Options for a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    ///
    /// "The scripting flag is set to "enabled" if scripting was enabled for
    /// the Document with which the parser is associated when the parser was
    /// created, and "disabled" otherwise."
    ///
    /// Nothing is executed either way; the flag only changes how `noscript`
    /// is parsed.
    pub scripting: bool,
    /// Resource limits.
    pub limits: ParseLimits,
}
