//! The tree builder: state, dispatch and the shared tree construction steps.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! The per-mode rules live in [`super::modes`]; this file holds what every
//! mode uses: the dispatcher, node creation and insertion, foster parenting,
//! formatting reconstruction and the insertion mode reset.

use std::mem;

use canopy_common::warning::warn_once;
use canopy_dom::{DomTree, ElementData, Namespace, NodeId, NodeType};
use log::{debug, trace};

use super::context::{FragmentContext, InsertionMode, ParserContext};
use super::foreign_content;
use super::formatting::{ActiveFormattingElements, FormattingEntry};
use super::stack::{OpenElementsStack, ScopeKind};
use crate::config::{ParseLimits, ParserConfig};
use crate::error::{ErrorKind, ParseError, ParseIssue, Position, Resource};
use crate::tokenizer::{Attribute, Token, TokenizerState};

/// What the dispatcher does after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// The token has been fully handled.
    Done,
    /// "Reprocess the token": run it again under the (already switched)
    /// insertion mode.
    Reprocess,
}

/// "The adjusted insertion location": a parent and an optional child to
/// insert before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InsertionPoint {
    pub(crate) parent: NodeId,
    pub(crate) before: Option<NodeId>,
}

impl InsertionPoint {
    /// Inside `parent`, after its last child.
    const fn append(parent: NodeId) -> Self {
        Self {
            parent,
            before: None,
        }
    }
}

/// [§ 13.2.6.2 Special](https://html.spec.whatwg.org/multipage/parsing.html#special)
///
/// HTML members of the special category.
const SPECIAL_HTML: &[&str] = &[
    "address", "applet", "area", "article", "aside", "base", "basefont", "bgsound",
    "blockquote", "body", "br", "button", "caption", "center", "col", "colgroup", "dd",
    "details", "dir", "div", "dl", "dt", "embed", "fieldset", "figcaption", "figure", "footer",
    "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup",
    "hr", "html", "iframe", "img", "input", "keygen", "li", "link", "listing", "main",
    "marquee", "menu", "meta", "nav", "noembed", "noframes", "noscript", "object", "ol", "p",
    "param", "plaintext", "pre", "script", "search", "section", "select", "source", "style",
    "summary", "table", "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "title",
    "tr", "track", "ul", "wbr", "xmp",
];

/// "The elements in the formatting category are: a, b, big, code, em, font,
/// i, nobr, s, small, strike, strong, tt, u."
pub(crate) const FORMATTING_ELEMENTS: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt",
    "u",
];

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// [§ 13.2.6.2 Special](https://html.spec.whatwg.org/multipage/parsing.html#special)
///
/// "The following elements have varying levels of special parsing rules"
pub(crate) fn is_special(element: &ElementData) -> bool {
    element.is_one_of(Namespace::Html, SPECIAL_HTML)
        || element.is_one_of(
            Namespace::MathMl,
            &["mi", "mo", "mn", "ms", "mtext", "annotation-xml"],
        )
        || element.is_one_of(Namespace::Svg, &["foreignObject", "desc", "title"])
}

/// The HTML tree builder.
///
/// Receives tokens one at a time through [`TreeBuilder::process_token`] and
/// builds a [`DomTree`]. It never sees raw text: the driver owns the
/// tokenizer and applies the state switches the builder asks for.
#[derive(Debug)]
pub struct TreeBuilder {
    pub(crate) tree: DomTree,
    pub(crate) stack: OpenElementsStack,
    pub(crate) formatting: ActiveFormattingElements,
    pub(crate) ctx: ParserContext,
    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    ///
    /// "the pending table character tokens list"
    pub(crate) pending_table_text: Vec<char>,
    errors: Vec<ParseIssue>,
    position: Position,
    limits: ParseLimits,
    tokens_processed: usize,
    fatal: Option<ParseError>,
    tokenizer_state: Option<TokenizerState>,
    stopped: bool,
}

impl TreeBuilder {
    /// A builder for a full document.
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        Self {
            tree: DomTree::new(),
            stack: OpenElementsStack::new(),
            formatting: ActiveFormattingElements::new(),
            ctx: ParserContext::new(config.scripting),
            pending_table_text: Vec::new(),
            errors: Vec::new(),
            position: Position::START,
            limits: config.limits,
            tokens_processed: 0,
            fatal: None,
            tokenizer_state: None,
            stopped: false,
        }
    }

    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// A builder for the fragment parsing algorithm with the given context
    /// element. The tokenizer state the context selects is available from
    /// [`TreeBuilder::take_tokenizer_state`] before the first token.
    #[must_use]
    pub fn for_fragment(config: ParserConfig, context_tag: &str, namespace: Namespace) -> Self {
        let mut builder = Self::new(config);
        let tag_name = context_tag.to_ascii_lowercase();

        // "Create a new Element node context element" standing in for the
        // caller's element. It is never attached to the tree.
        let element = builder.create_element(&tag_name, &[], namespace);

        // STEP 4: "Set the state of the HTML parser's tokenization stage as
        //          follows, switching on the context element:"
        if namespace == Namespace::Html {
            builder.tokenizer_state = match tag_name.as_str() {
                "title" | "textarea" => Some(TokenizerState::RCDATA),
                "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
                    Some(TokenizerState::RAWTEXT)
                }
                "script" => Some(TokenizerState::ScriptData),
                "noscript" if config.scripting => Some(TokenizerState::RAWTEXT),
                "plaintext" => Some(TokenizerState::PLAINTEXT),
                _ => None,
            };
        }

        // STEP 5: "Let root be the result of creating an element given
        //          document, "html", and the HTML namespace."
        // STEP 6: "Append the element root to the Document node created above."
        // STEP 7: "Set up the parser's stack of open elements so that it
        //          contains just the single element root."
        let root = builder.create_element("html", &[], Namespace::Html);
        builder.tree.append_child(NodeId::ROOT, root);
        builder.stack.push(root);

        // STEP 8: "If the context element is a template element, then push
        //          "in template" onto the stack of template insertion modes so
        //          that it is the new current template insertion mode."
        if namespace == Namespace::Html && tag_name == "template" {
            builder.ctx.template_modes.push(InsertionMode::InTemplate);
        }

        builder.ctx.fragment_context = Some(FragmentContext {
            element,
            tag_name,
            namespace,
        });

        // STEP 10: "Reset the parser's insertion mode appropriately."
        builder.reset_insertion_mode_appropriately();
        builder
    }

    /// The document being built.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The stack of open elements.
    #[must_use]
    pub const fn open_elements(&self) -> &OpenElementsStack {
        &self.stack
    }

    /// The list of active formatting elements.
    #[must_use]
    pub const fn active_formatting_elements(&self) -> &ActiveFormattingElements {
        &self.formatting
    }

    /// The parser state flags.
    #[must_use]
    pub const fn context(&self) -> &ParserContext {
        &self.ctx
    }

    /// The current insertion mode.
    #[must_use]
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.ctx.insertion_mode
    }

    /// Parse errors recorded so far, in order.
    #[must_use]
    pub fn errors(&self) -> &[ParseIssue] {
        &self.errors
    }

    /// Whether the end-of-file token has been fully processed.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Set the input position used for errors reported from now on.
    pub const fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Append issues found elsewhere (the tokenizer) to the error list.
    pub fn record_issues(&mut self, issues: impl IntoIterator<Item = ParseIssue>) {
        self.errors.extend(issues);
    }

    /// A tokenizer state switch requested by the last token, if any.
    ///
    /// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#generic-rcdata-element-parsing-algorithm)
    /// "Switch the tokenizer to the RCDATA state."
    pub const fn take_tokenizer_state(&mut self) -> Option<TokenizerState> {
        self.tokenizer_state.take()
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// "If there is an adjusted current node and it is not an element in the
    /// HTML namespace", a `<![CDATA[` opens a CDATA section.
    #[must_use]
    pub fn cdata_allowed(&self) -> bool {
        self.adjusted_current_node()
            .and_then(|node| self.tree.as_element(node))
            .is_some_and(|element| element.namespace != Namespace::Html)
    }

    /// The tree and the errors, consuming the builder.
    #[must_use]
    pub fn into_parts(self) -> (DomTree, Vec<ParseIssue>) {
        (self.tree, self.errors)
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
    ///
    /// "As each token is emitted from the tokenizer, the user agent must
    /// follow the appropriate steps from the following list, known as the
    /// tree construction dispatcher"
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::ResourceExhausted`] when a configured limit is
    /// exceeded. The builder refuses further tokens afterwards.
    pub fn process_token(&mut self, token: &Token) -> Result<(), ParseError> {
        if let Some(error) = &self.fatal {
            return Err(error.clone());
        }
        if self.stopped {
            return Ok(());
        }

        self.tokens_processed += 1;
        if self.tokens_processed > self.limits.max_tokens {
            return Err(self.abort(Resource::TokenCount, self.limits.max_tokens));
        }

        // [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
        // "If the next token is a U+000A LINE FEED (LF) character token, then
        //  ignore that token and move on to the next one. (Newlines at the
        //  start of pre blocks are ignored as an authoring convenience.)"
        if mem::take(&mut self.ctx.skip_next_newline)
            && matches!(token, Token::Character { data: '\n' })
        {
            return Ok(());
        }

        if let Token::StartTag {
            name,
            self_closing: true,
            ..
        } = token
            && self.use_insertion_mode_rules(token)
            && !VOID_ELEMENTS.contains(&name.as_str())
        {
            self.parse_error(ErrorKind::NonVoidHtmlElementStartTagWithTrailingSolidus);
        }

        let mut reprocessed = 0;
        loop {
            let flow = self.dispatch(token);
            if let Some(error) = &self.fatal {
                return Err(error.clone());
            }
            match flow {
                Flow::Done => return Ok(()),
                Flow::Reprocess => {
                    reprocessed += 1;
                    if reprocessed > self.limits.max_reprocess {
                        return Err(self.abort(Resource::Reprocessing, self.limits.max_reprocess));
                    }
                    trace!(
                        "reprocessing {token} in {} mode",
                        self.ctx.insertion_mode
                    );
                }
            }
        }
    }

    fn abort(&mut self, resource: Resource, limit: usize) -> ParseError {
        let error = ParseError::ResourceExhausted {
            resource,
            limit,
            position: self.position,
        };
        debug!("aborting parse: {error}");
        self.fatal = Some(error.clone());
        error
    }

    fn dispatch(&mut self, token: &Token) -> Flow {
        if self.use_insertion_mode_rules(token) {
            self.process_using(self.ctx.insertion_mode, token)
        } else {
            self.in_foreign_content(token)
        }
    }

    /// The tree construction dispatcher's first half: whether `token` is
    /// handled by the current insertion mode rather than the rules for
    /// foreign content.
    fn use_insertion_mode_rules(&self, token: &Token) -> bool {
        // "If the stack of open elements is empty"
        let Some(node) = self.adjusted_current_node() else {
            return true;
        };
        let Some(element) = self.tree.as_element(node) else {
            return true;
        };
        // "If the adjusted current node is an element in the HTML namespace"
        if element.namespace == Namespace::Html {
            return true;
        }
        // "If the adjusted current node is a MathML text integration point and
        //  the token is a start tag whose tag name is neither "mglyph" nor
        //  "malignmark""
        // "If the adjusted current node is a MathML text integration point and
        //  the token is a character token"
        if foreign_content::is_mathml_text_integration_point(element) {
            match token {
                Token::StartTag { name, .. } if name != "mglyph" && name != "malignmark" => {
                    return true;
                }
                Token::Character { .. } => return true,
                _ => {}
            }
        }
        // "If the adjusted current node is a MathML annotation-xml element and
        //  the token is a start tag whose tag name is "svg""
        if element.is_one_of(Namespace::MathMl, &["annotation-xml"])
            && matches!(token, Token::StartTag { name, .. } if name == "svg")
        {
            return true;
        }
        // "If the adjusted current node is an HTML integration point and the
        //  token is a start tag"
        // "If the adjusted current node is an HTML integration point and the
        //  token is a character token"
        if foreign_content::is_html_integration_point(element)
            && matches!(token, Token::StartTag { .. } | Token::Character { .. })
        {
            return true;
        }
        // "If the token is an end-of-file token"
        token.is_eof()
    }

    /// "Process the token using the rules for the "X" insertion mode."
    pub(crate) fn process_using(&mut self, mode: InsertionMode, token: &Token) -> Flow {
        match mode {
            InsertionMode::Initial => self.initial_mode(token),
            InsertionMode::BeforeHtml => self.before_html_mode(token),
            InsertionMode::BeforeHead => self.before_head_mode(token),
            InsertionMode::InHead => self.in_head_mode(token),
            InsertionMode::InHeadNoscript => self.in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.after_head_mode(token),
            InsertionMode::InBody => self.in_body_mode(token),
            InsertionMode::Text => self.text_mode(token),
            InsertionMode::InTable => self.in_table_mode(token),
            InsertionMode::InTableText => self.in_table_text_mode(token),
            InsertionMode::InCaption => self.in_caption_mode(token),
            InsertionMode::InColumnGroup => self.in_column_group_mode(token),
            InsertionMode::InTableBody => self.in_table_body_mode(token),
            InsertionMode::InRow => self.in_row_mode(token),
            InsertionMode::InCell => self.in_cell_mode(token),
            InsertionMode::InSelect => self.in_select_mode(token),
            InsertionMode::InSelectInTable => self.in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.in_template_mode(token),
            InsertionMode::AfterBody => self.after_body_mode(token),
            InsertionMode::InFrameset => self.in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.after_after_frameset_mode(token),
        }
    }

    /// Switch the insertion mode.
    pub(crate) fn switch_mode(&mut self, mode: InsertionMode) {
        if self.ctx.insertion_mode != mode {
            trace!("insertion mode: {} -> {mode}", self.ctx.insertion_mode);
        }
        self.ctx.insertion_mode = mode;
    }

    /// Ask the driver to switch the tokenizer state before the next token.
    pub(crate) const fn switch_tokenizer(&mut self, state: TokenizerState) {
        self.tokenizer_state = Some(state);
    }

    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    pub(crate) fn parse_error(&mut self, code: ErrorKind) {
        self.errors.push(ParseIssue {
            code,
            position: self.position,
        });
        let _ = warn_once("HTML Parser", &format!("parse error: {code}"));
    }

    /// [§ 13.2.7 The end](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    ///
    /// "Pop all the nodes off the stack of open elements."
    pub(crate) fn stop_parsing(&mut self) {
        self.stack.truncate(0);
        self.stopped = true;
        trace!("parsing stopped");
    }
}

// =============================================================================
// Node queries
// =============================================================================

impl TreeBuilder {
    /// "The current node is the bottommost node in this stack of open elements."
    pub(crate) fn current_node(&self) -> Option<NodeId> {
        self.stack.current_node()
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#adjusted-current-node)
    ///
    /// "The adjusted current node is the context element if the parser was
    /// created as part of the HTML fragment parsing algorithm and the stack
    /// of open elements has only one element in it (fragment case); otherwise,
    /// the adjusted current node is the current node."
    pub(crate) fn adjusted_current_node(&self) -> Option<NodeId> {
        match &self.ctx.fragment_context {
            Some(context) if self.stack.len() == 1 => Some(context.element),
            _ => self.current_node(),
        }
    }

    /// Whether `node` is an HTML element named `tag`.
    pub(crate) fn node_is(&self, node: NodeId, tag: &str) -> bool {
        self.tree.as_element(node).is_some_and(|e| e.is_html(tag))
    }

    /// Whether `node` is an HTML element with one of the names in `tags`.
    pub(crate) fn node_is_one_of(&self, node: NodeId, tags: &[&str]) -> bool {
        self.tree
            .as_element(node)
            .is_some_and(|e| e.is_one_of(Namespace::Html, tags))
    }

    /// Whether the current node is an HTML element named `tag`.
    pub(crate) fn current_is(&self, tag: &str) -> bool {
        self.current_node().is_some_and(|node| self.node_is(node, tag))
    }

    /// Whether the current node is an HTML element with one of the names in `tags`.
    pub(crate) fn current_is_one_of(&self, tags: &[&str]) -> bool {
        self.current_node()
            .is_some_and(|node| self.node_is_one_of(node, tags))
    }

    /// "...has an element in ... scope"
    pub(crate) fn in_scope(&self, tag: &str, kind: ScopeKind) -> bool {
        self.stack.has_in_scope(&self.tree, tag, kind)
    }

    /// "Generate implied end tags", optionally "except for" one name.
    pub(crate) fn generate_implied_end_tags(&mut self, excluding: Option<&str>) {
        self.stack.generate_implied_end_tags(&self.tree, excluding);
    }

    /// "Pop elements from the stack of open elements until a `tag` element has
    /// been popped from the stack."
    pub(crate) fn pop_until(&mut self, tag: &str) {
        self.stack.pop_until_tag(&self.tree, tag);
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    ///
    /// The standard's list of elements that may stay open at the end of the
    /// body without a parse error.
    pub(crate) fn has_unclosed_required_elements(&self) -> bool {
        const MAY_REMAIN_OPEN: &[&str] = &[
            "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td",
            "tfoot", "th", "thead", "tr", "body", "html",
        ];
        self.stack
            .as_slice()
            .iter()
            .any(|&node| !self.node_is_one_of(node, MAY_REMAIN_OPEN))
    }
}

// =============================================================================
// Creating and inserting nodes
// =============================================================================

impl TreeBuilder {
    /// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "The appropriate place for inserting a node, optionally using a
    /// particular override target, is the position in an element returned by
    /// running the following steps:"
    pub(crate) fn appropriate_place(&self, override_target: Option<NodeId>) -> InsertionPoint {
        // STEP 1: "If there was an override target specified, then let target
        //          be the override target. Otherwise, let target be the
        //          current node."
        let target = override_target
            .or_else(|| self.current_node())
            .unwrap_or(NodeId::ROOT);

        // STEP 2: "Determine the adjusted insertion location using the first
        //          matching steps from the following list:"
        //   "If foster parenting is enabled and target is a table, tbody,
        //    tfoot, thead, or tr element"
        let location = if self.ctx.foster_parenting
            && self.node_is_one_of(target, &["table", "tbody", "tfoot", "thead", "tr"])
        {
            self.foster_parent_location()
        } else {
            // "Otherwise: Let adjusted insertion location be inside target,
            //  after its last child (if any)."
            InsertionPoint::append(target)
        };

        // STEP 3: "If the adjusted insertion location is inside a template
        //          element, let it instead be inside the template element's
        //          template contents, after its last child (if any)."
        match self.tree.template_contents(location.parent) {
            Some(contents) => InsertionPoint::append(contents),
            None => location,
        }
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    ///
    /// The foster parenting branch of the appropriate place algorithm.
    fn foster_parent_location(&self) -> InsertionPoint {
        // STEP 2.1: "Let last template be the last template element in the
        //            stack of open elements, if any."
        let last_template = self.stack.last_index_of(&self.tree, "template");
        // STEP 2.2: "Let last table be the last table element in the stack of
        //            open elements, if any."
        let last_table = self.stack.last_index_of(&self.tree, "table");

        // STEP 2.3: "If there is a last template and either there is no last
        //            table, or there is one, but last template is lower (more
        //            recently added) than last table in the stack of open
        //            elements, then: let adjusted insertion location be inside
        //            last template's template contents, after its last child
        //            (if any), and abort these steps."
        if let Some(template_index) = last_template
            && last_table.is_none_or(|table_index| template_index > table_index)
            && let Some(template) = self.stack.get(template_index)
        {
            return InsertionPoint::append(
                self.tree.template_contents(template).unwrap_or(template),
            );
        }

        // STEP 2.4: "If there is no last table, then let adjusted insertion
        //            location be inside the first element in the stack of open
        //            elements (the html element), after its last child (if
        //            any), and abort these steps. (fragment case)"
        let Some(table_index) = last_table else {
            return InsertionPoint::append(self.stack.first().unwrap_or(NodeId::ROOT));
        };
        let Some(table) = self.stack.get(table_index) else {
            return InsertionPoint::append(NodeId::ROOT);
        };

        // STEP 2.5: "If last table has a parent node, then let adjusted
        //            insertion location be inside last table's parent node,
        //            immediately before last table, and abort these steps."
        if let Some(parent) = self.tree.parent(table) {
            return InsertionPoint {
                parent,
                before: Some(table),
            };
        }

        // STEP 2.6: "Let previous element be the element immediately above
        //            last table in the stack of open elements."
        // STEP 2.7: "Let adjusted insertion location be inside previous
        //            element, after its last child (if any)."
        let previous = table_index
            .checked_sub(1)
            .and_then(|index| self.stack.get(index))
            .unwrap_or(NodeId::ROOT);
        InsertionPoint::append(previous)
    }

    /// Insert a detached node at `point`.
    pub(crate) fn insert_node(&mut self, point: InsertionPoint, node: NodeId) {
        match point.before {
            Some(reference) => self.tree.insert_before(point.parent, node, reference),
            None => self.tree.append_child(point.parent, node),
        }
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// "Create an element for a token" in `namespace`. Foreign elements get
    /// their tag name and attributes adjusted ("adjust MathML attributes",
    /// "adjust SVG attributes").
    pub(crate) fn create_element(
        &mut self,
        name: &str,
        attributes: &[Attribute],
        namespace: Namespace,
    ) -> NodeId {
        let mut attributes = attributes.to_vec();
        let tag_name = match namespace {
            Namespace::Html => name.to_string(),
            Namespace::Svg => {
                foreign_content::adjust_svg_attributes(&mut attributes);
                foreign_content::adjust_svg_tag_name(name).to_string()
            }
            Namespace::MathMl => {
                foreign_content::adjust_mathml_attributes(&mut attributes);
                name.to_string()
            }
        };
        let attrs = attributes
            .into_iter()
            .map(|attr| (attr.name, attr.value))
            .collect();
        self.tree
            .alloc_element(ElementData::new(tag_name, namespace, attrs))
    }

    /// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    pub(crate) fn insert_foreign_element(
        &mut self,
        name: &str,
        attributes: &[Attribute],
        namespace: Namespace,
    ) -> NodeId {
        // STEP 1: "Let the adjusted insertion location be the appropriate
        //          place for inserting a node."
        let point = self.appropriate_place(None);
        // STEP 2: "Let element be the result of creating an element for the
        //          token in the given namespace, with the intended parent
        //          being the element in which the adjusted insertion location
        //          finds itself."
        let element = self.create_element(name, attributes, namespace);
        // STEP 3: "...insert element at the adjusted insertion location."
        self.insert_node(point, element);
        // STEP 4: "Push element onto the stack of open elements so that it is
        //          the new current node."
        self.push_open_element(element);
        element
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// "...insert a foreign element for the token, in the HTML namespace."
    pub(crate) fn insert_html_element(&mut self, name: &str, attributes: &[Attribute]) -> NodeId {
        self.insert_foreign_element(name, attributes, Namespace::Html)
    }

    /// Push onto the stack of open elements, enforcing the nesting limit.
    pub(crate) fn push_open_element(&mut self, node: NodeId) {
        self.stack.push(node);
        if self.stack.len() > self.limits.max_nesting_depth && self.fatal.is_none() {
            let _ = self.abort(Resource::NestingDepth, self.limits.max_nesting_depth);
        }
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    pub(crate) fn insert_character(&mut self, c: char) {
        // STEP 2: "Let the adjusted insertion location be the appropriate
        //          place for inserting a node."
        let point = self.appropriate_place(None);

        // STEP 3: "If the adjusted insertion location is inside a Document
        //          node, then ignore the token."
        if matches!(
            self.tree.get(point.parent).map(|n| &n.node_type),
            Some(NodeType::Document)
        ) {
            return;
        }

        // STEP 4: "If there is a Text node immediately before the adjusted
        //          insertion location, then append data to that Text node's
        //          data."
        let previous = match point.before {
            Some(reference) => self.tree.prev_sibling(reference),
            None => self.tree.last_child(point.parent),
        };
        if let Some(previous) = previous
            && let Some(node) = self.tree.get_mut(previous)
            && let NodeType::Text(text) = &mut node.node_type
        {
            text.push(c);
            return;
        }

        // "Otherwise, create a new Text node whose data is data ... and insert
        //  the newly created node at the adjusted insertion location."
        let text = self.tree.alloc(NodeType::Text(c.to_string()));
        self.insert_node(point, text);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    pub(crate) fn insert_comment(&mut self, data: &str) {
        let point = self.appropriate_place(None);
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.insert_node(point, comment);
    }

    /// "Insert a comment as the last child of" `parent` (the Document or the
    /// `html` element).
    pub(crate) fn append_comment(&mut self, parent: NodeId, data: &str) {
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.tree.append_child(parent, comment);
    }

    /// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// The generic raw text and RCDATA element parsing algorithms, which only
    /// differ in the tokenizer state.
    pub(crate) fn parse_text_element(
        &mut self,
        name: &str,
        attributes: &[Attribute],
        state: TokenizerState,
    ) {
        // STEP 1: "Insert an HTML element for the token."
        let _ = self.insert_html_element(name, attributes);
        // STEP 2: "...switch the tokenizer to the RAWTEXT state" (or RCDATA).
        self.switch_tokenizer(state);
        // STEP 3: "Let the original insertion mode be the current insertion mode."
        self.ctx.original_insertion_mode = Some(self.ctx.insertion_mode);
        // STEP 4: "Then, switch the insertion mode to "text"."
        self.switch_mode(InsertionMode::Text);
    }
}

// =============================================================================
// Active formatting elements and mode reset
// =============================================================================

impl TreeBuilder {
    /// [§ 13.2.4.3 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// "When the steps below require the UA to reconstruct the active
    /// formatting elements, the UA must perform the following steps:"
    pub(crate) fn reconstruct_active_formatting_elements(&mut self) {
        // STEP 1: "If there are no entries in the list of active formatting
        //          elements, then there is nothing to reconstruct; stop this
        //          algorithm."
        // STEP 2: "If the last (most recently added) entry in the list of
        //          active formatting elements is a marker, or if it is an
        //          element that is in the stack of open elements, then there is
        //          nothing to reconstruct; stop this algorithm."
        match self.formatting.last().map(FormattingEntry::node) {
            None | Some(None) => return,
            Some(Some(node)) if self.stack.contains(node) => return,
            Some(Some(_)) => {}
        }

        // STEP 3: "Let entry be the last (most recently added) element in the
        //          list of active formatting elements."
        let mut index = self.formatting.len() - 1;

        // STEP 4: "Rewind: If there are no entries before entry in the list of
        //          active formatting elements, then jump to the step labeled
        //          create."
        // STEP 5: "Let entry be the entry one earlier than entry in the list
        //          of active formatting elements."
        // STEP 6: "If entry is neither a marker nor an element that is also in
        //          the stack of open elements, go to the step labeled rewind."
        // STEP 7: "Advance: Let entry be the element one later than entry in
        //          the list of active formatting elements."
        while index > 0 {
            let earlier = self
                .formatting
                .get(index - 1)
                .and_then(FormattingEntry::node);
            match earlier {
                Some(node) if !self.stack.contains(node) => index -= 1,
                _ => break,
            }
        }

        while let Some(entry) = self.formatting.get(index).cloned() {
            // STEP 8: "Create: Insert an HTML element for the token for which
            //          the element entry was created, to obtain new element."
            if let FormattingEntry::Element {
                node,
                token: Token::StartTag {
                    name, attributes, ..
                },
            } = entry
            {
                let new_element = self.insert_html_element(&name, &attributes);
                // STEP 9: "Replace the entry for entry in the list with an
                //          entry for new element."
                let _ = self.formatting.replace(node, new_element);
            }
            // STEP 10: "If the entry for new element in the list of active
            //           formatting elements is not the last entry in the list,
            //           return to the step labeled advance."
            index += 1;
        }
    }

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub(crate) fn reset_insertion_mode_appropriately(&mut self) {
        let mode = self.appropriate_insertion_mode();
        self.switch_mode(mode);
    }

    fn appropriate_insertion_mode(&self) -> InsertionMode {
        // STEP 1: "Let last be false."
        // STEP 2: "Let node be the last node in the stack of open elements."
        for index in (0..self.stack.len()).rev() {
            // STEP 3: "Loop: If node is the first node in the stack of open
            //          elements, then set last to true, and, if the parser was
            //          created as part of the HTML fragment parsing algorithm
            //          (fragment case), set node to the context element passed
            //          to that algorithm."
            let last = index == 0;
            let node = match (&self.ctx.fragment_context, last) {
                (Some(context), true) => context.element,
                _ => match self.stack.get(index) {
                    Some(node) => node,
                    None => continue,
                },
            };
            let Some(element) = self.tree.as_element(node) else {
                continue;
            };
            let name = if element.namespace == Namespace::Html {
                element.tag_name.as_str()
            } else {
                ""
            };

            match name {
                // STEP 4: "If node is a select element, run these substeps:"
                "select" => {
                    // "If last is true, jump to the step below labeled done."
                    if !last {
                        // "Let ancestor be node."
                        // "Loop: If ancestor is the first node in the stack of
                        //  open elements, jump to the step below labeled done."
                        for &ancestor in self.stack.as_slice()[1..index].iter().rev() {
                            // "If ancestor is a template node, jump to the step
                            //  below labeled done."
                            if self.node_is(ancestor, "template") {
                                break;
                            }
                            // "If ancestor is a table node, switch the insertion
                            //  mode to "in select in table" and return."
                            if self.node_is(ancestor, "table") {
                                return InsertionMode::InSelectInTable;
                            }
                        }
                    }
                    // "Done: Switch the insertion mode to "in select" and return."
                    return InsertionMode::InSelect;
                }
                // STEP 5: "If node is a td or th element and last is false, then
                //          switch the insertion mode to "in cell" and return."
                "td" | "th" if !last => return InsertionMode::InCell,
                // STEP 6: "If node is a tr element, then switch the insertion
                //          mode to "in row" and return."
                "tr" => return InsertionMode::InRow,
                // STEP 7: "If node is a tbody, thead, or tfoot element, then
                //          switch the insertion mode to "in table body" and return."
                "tbody" | "thead" | "tfoot" => return InsertionMode::InTableBody,
                // STEP 8: "If node is a caption element, then switch the
                //          insertion mode to "in caption" and return."
                "caption" => return InsertionMode::InCaption,
                // STEP 9: "If node is a colgroup element, then switch the
                //          insertion mode to "in column group" and return."
                "colgroup" => return InsertionMode::InColumnGroup,
                // STEP 10: "If node is a table element, then switch the
                //           insertion mode to "in table" and return."
                "table" => return InsertionMode::InTable,
                // STEP 11: "If node is a template element, then switch the
                //           insertion mode to the current template insertion
                //           mode and return."
                "template" => {
                    return self
                        .ctx
                        .current_template_mode()
                        .unwrap_or(InsertionMode::InTemplate);
                }
                // STEP 12: "If node is a head element and last is false, then
                //           switch the insertion mode to "in head" and return."
                "head" if !last => return InsertionMode::InHead,
                // STEP 13: "If node is a body element, then switch the insertion
                //           mode to "in body" and return."
                "body" => return InsertionMode::InBody,
                // STEP 14: "If node is a frameset element, then switch the
                //           insertion mode to "in frameset" and return.
                //           (fragment case)"
                "frameset" => return InsertionMode::InFrameset,
                // STEP 15: "If node is an html element, run these substeps:"
                //   "If the head element pointer is null, switch the insertion
                //    mode to "before head" and return. (fragment case)"
                //   "Otherwise, the head element pointer is not null, switch the
                //    insertion mode to "after head" and return."
                "html" => {
                    return if self.ctx.head_element.is_none() {
                        InsertionMode::BeforeHead
                    } else {
                        InsertionMode::AfterHead
                    };
                }
                _ => {}
            }

            // STEP 16: "If last is true, then switch the insertion mode to "in
            //           body" and return. (fragment case)"
            if last {
                return InsertionMode::InBody;
            }
            // STEP 17: "Let node now be the node before node in the stack of
            //           open elements."
        }
        InsertionMode::InBody
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "When the steps above say the user agent is to close a p element, it
    /// means that the user agent must generate implied end tags, except for p
    /// elements. If the current node is not a p element, then this is a parse
    /// error. Pop elements from the stack of open elements until a p element
    /// has been popped from the stack."
    pub(crate) fn close_p_element(&mut self) {
        self.generate_implied_end_tags(Some("p"));
        if !self.current_is("p") {
            self.parse_error(ErrorKind::EndTagNotCurrentNode);
        }
        self.pop_until("p");
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    pub(crate) fn close_p_if_in_button_scope(&mut self) {
        if self.in_scope("p", ScopeKind::Button) {
            self.close_p_element();
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "Any other end tag" in body.
    ///
    /// STEP 1: "Initialize node to be the current node (the bottommost node of
    ///          the stack)."
    /// STEP 2: "Loop: If node is an HTML element with the same tag name as the
    ///          token, then: generate implied end tags, except for HTML
    ///          elements with the same tag name as the token; if node is not
    ///          the current node, then this is a parse error; pop all the nodes
    ///          from the current node up to node, including node, then stop
    ///          these steps."
    /// STEP 3: "Otherwise, if node is in the special category, then this is a
    ///          parse error; ignore the token, and return."
    /// STEP 4: "Set node to the previous entry in the stack of open elements."
    /// STEP 5: "Return to the step labeled loop."
    pub(crate) fn any_other_end_tag(&mut self, name: &str) {
        for index in (0..self.stack.len()).rev() {
            let Some(node) = self.stack.get(index) else {
                break;
            };
            let Some(element) = self.tree.as_element(node) else {
                continue;
            };
            if element.is_html(name) {
                self.generate_implied_end_tags(Some(name));
                if self.current_node() != Some(node) {
                    self.parse_error(ErrorKind::EndTagNotCurrentNode);
                }
                self.stack.pop_until_node(node);
                return;
            }
            if is_special(element) {
                self.parse_error(ErrorKind::UnexpectedEndTag);
                return;
            }
        }
    }
}
