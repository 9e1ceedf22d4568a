//! HTML tree construction.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)

/// The adoption agency algorithm.
mod adoption;
/// Insertion modes and the parser state flags.
mod context;
/// The tree builder and the steps shared by every insertion mode.
mod core;
/// SVG and MathML adjustments and integration points.
pub mod foreign_content;
/// The list of active formatting elements.
mod formatting;
/// Per-mode token rules.
mod modes;
/// Quirks mode selection from the DOCTYPE.
mod quirks;
/// The stack of open elements.
mod stack;

pub use self::context::{FragmentContext, InsertionMode, ParserContext};
pub use self::core::TreeBuilder;
pub use self::formatting::{ActiveFormattingElements, FormattingEntry};
pub use self::quirks::quirks_mode_for_doctype;
pub use self::stack::{OpenElementsStack, ScopeKind};
