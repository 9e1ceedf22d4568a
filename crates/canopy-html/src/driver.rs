//! Entry points: the streaming [`Parser`] and the one-shot helpers built on
//! it.
//!
//! The driver owns the tokenizer and the tree builder and moves tokens from
//! one to the other. After each token it applies the tokenizer state the
//! builder asked for and tells the tokenizer whether CDATA sections are
//! allowed, so the tokenizer never looks at the tree.

use canopy_common::warning::clear_warnings;
use canopy_dom::{DomTree, Namespace, NodeId};
use log::debug;

use crate::config::ParserConfig;
use crate::error::{ParseError, ParseIssue};
use crate::parser::TreeBuilder;
use crate::tokenizer::{HTMLTokenizer, TokenizerConfig, TokenizerStats};

/// A parsed document.
#[derive(Debug)]
pub struct Document {
    /// The tree, rooted at [`NodeId::ROOT`].
    pub tree: DomTree,
    /// Recoverable parse errors, in input order.
    pub errors: Vec<ParseIssue>,
    /// Tokenizer counters.
    pub stats: TokenizerStats,
}

/// The result of the fragment parsing algorithm.
#[derive(Debug)]
pub struct Fragment {
    /// The tree the fragment was built in.
    pub tree: DomTree,
    /// The synthetic `html` root; its children are the fragment.
    pub root: NodeId,
    /// Recoverable parse errors, in input order.
    pub errors: Vec<ParseIssue>,
}

impl Fragment {
    /// [§ 13.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// "Return root's children, in tree order."
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        self.tree.children(self.root)
    }
}

/// An incremental HTML parser.
///
/// Input arrives through [`feed`](Self::feed) in chunks of any size; a chunk
/// boundary may fall anywhere. The tree is the same as for a single call with
/// the whole input.
#[derive(Debug)]
pub struct Parser {
    tokenizer: HTMLTokenizer,
    builder: TreeBuilder,
    failed: Option<ParseError>,
}

impl Parser {
    /// A parser for a complete document.
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        clear_warnings();
        Self {
            tokenizer: HTMLTokenizer::new(TokenizerConfig::default()),
            builder: TreeBuilder::new(config),
            failed: None,
        }
    }

    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// A parser for the fragment parsing algorithm, with a context element
    /// named `context_tag` in `namespace`.
    #[must_use]
    pub fn for_fragment(config: ParserConfig, context_tag: &str, namespace: Namespace) -> Self {
        clear_warnings();
        let mut builder = TreeBuilder::for_fragment(config, context_tag, namespace);
        let mut tokenizer = HTMLTokenizer::new(TokenizerConfig::default());
        if let Some(state) = builder.take_tokenizer_state() {
            tokenizer.set_state(state);
        }
        tokenizer.set_cdata_allowed(builder.cdata_allowed());
        Self {
            tokenizer,
            builder,
            failed: None,
        }
    }

    /// Parse the next chunk of input.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::ResourceExhausted`] once a limit is exceeded.
    /// Every later call returns the same error.
    pub fn feed(&mut self, chunk: &str) -> Result<(), ParseError> {
        self.tokenizer.feed(chunk);
        self.pump()
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        self.builder.tree()
    }

    /// Signal the end of input and return the document.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::ResourceExhausted`] if a limit was exceeded.
    pub fn finish(mut self) -> Result<Document, ParseError> {
        self.end()?;
        let stats = self.tokenizer.stats();
        let (tree, errors) = self.builder.into_parts();
        debug!(
            "parsed document: {} tokens, {} nodes, {} parse errors",
            stats.tokens,
            tree.len(),
            errors.len()
        );
        Ok(Document {
            tree,
            errors,
            stats,
        })
    }

    /// Signal the end of input and return the fragment.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::ResourceExhausted`] if a limit was exceeded.
    pub fn finish_fragment(mut self) -> Result<Fragment, ParseError> {
        self.end()?;
        let (tree, errors) = self.builder.into_parts();
        let root = tree.document_element().unwrap_or(NodeId::ROOT);
        debug!(
            "parsed fragment: {} nodes, {} parse errors",
            tree.children(root).len(),
            errors.len()
        );
        Ok(Fragment { tree, root, errors })
    }

    fn end(&mut self) -> Result<(), ParseError> {
        self.tokenizer.end();
        self.pump()
    }

    /// Hand every token the tokenizer can produce from the buffered input to
    /// the tree builder.
    fn pump(&mut self) -> Result<(), ParseError> {
        if let Some(error) = &self.failed {
            return Err(error.clone());
        }
        while let Some(token) = self.tokenizer.next_token() {
            self.builder.record_issues(self.tokenizer.take_errors());
            self.builder.set_position(self.tokenizer.position());
            if let Err(error) = self.builder.process_token(&token) {
                self.failed = Some(error.clone());
                return Err(error);
            }
            if let Some(state) = self.builder.take_tokenizer_state() {
                self.tokenizer.set_state(state);
            }
            self.tokenizer
                .set_cdata_allowed(self.builder.cdata_allowed());
        }
        self.builder.record_issues(self.tokenizer.take_errors());
        Ok(())
    }
}

/// Parse a complete document with the default configuration.
///
/// # Errors
///
/// Returns [`ParseError::ResourceExhausted`] if a limit was exceeded.
pub fn parse_document(input: &str) -> Result<Document, ParseError> {
    parse_document_with(input, ParserConfig::default())
}

/// Parse a complete document.
///
/// # Errors
///
/// Returns [`ParseError::ResourceExhausted`] if a limit was exceeded.
pub fn parse_document_with(input: &str, config: ParserConfig) -> Result<Document, ParseError> {
    let mut parser = Parser::new(config);
    parser.feed(input)?;
    parser.finish()
}

/// Parse a document delivered in chunks, with the default configuration.
///
/// # Errors
///
/// Returns [`ParseError::ResourceExhausted`] if a limit was exceeded.
pub fn parse_document_chunks<I, S>(chunks: I) -> Result<Document, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = Parser::new(ParserConfig::default());
    for chunk in chunks {
        parser.feed(chunk.as_ref())?;
    }
    parser.finish()
}

/// Parse `input` as the contents of a `context_tag` element in `namespace`,
/// with the default configuration.
///
/// # Errors
///
/// Returns [`ParseError::ResourceExhausted`] if a limit was exceeded.
pub fn parse_fragment(
    input: &str,
    context_tag: &str,
    namespace: Namespace,
) -> Result<Fragment, ParseError> {
    parse_fragment_with(input, context_tag, namespace, ParserConfig::default())
}

/// Parse `input` as the contents of a `context_tag` element in `namespace`.
///
/// # Errors
///
/// Returns [`ParseError::ResourceExhausted`] if a limit was exceeded.
pub fn parse_fragment_with(
    input: &str,
    context_tag: &str,
    namespace: Namespace,
    config: ParserConfig,
) -> Result<Fragment, ParseError> {
    let mut parser = Parser::for_fragment(config, context_tag, namespace);
    parser.feed(input)?;
    parser.finish_fragment()
}
