//! [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
//!
//! "Initially, the stack of open elements is empty. The stack grows downwards;
//! the topmost node on the stack is the first one added to the stack, and the
//! bottommost node of the stack is the most recently added node in the stack."
//!
//! The stack only stores [`NodeId`]s. Queries that depend on element names
//! take the [`DomTree`] the ids point into.

use canopy_dom::{DomTree, ElementData, Namespace, NodeId};

/// Elements whose end tags are implied by other tags.
///
/// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// "...generate all implied end tags thoroughly": the implied end tags plus
/// the table structure elements.
const THOROUGHLY_IMPLIED_END_TAGS: &[&str] = &[
    "caption", "colgroup", "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
    "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// The element lists that bound a "has an element in scope" search.
///
/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// "has an element in scope": `applet`, `caption`, `html`, `table`, `td`,
    /// `th`, `marquee`, `object`, `template`, the MathML text integration
    /// points plus `annotation-xml`, and SVG `foreignObject`, `desc`, `title`.
    Default,
    /// "has an element in list item scope": the default list plus HTML `ol`
    /// and `ul`.
    ListItem,
    /// "has an element in button scope": the default list plus HTML `button`.
    Button,
    /// "has an element in table scope": HTML `html`, `table` and `template`.
    Table,
    /// "has an element in select scope": every element except HTML
    /// `optgroup` and `option`.
    Select,
}

impl ScopeKind {
    /// Whether `element` terminates a search in this scope.
    #[must_use]
    pub fn is_boundary(self, element: &ElementData) -> bool {
        match self {
            Self::Default => is_default_scope_boundary(element),
            Self::ListItem => {
                is_default_scope_boundary(element)
                    || element.is_one_of(Namespace::Html, &["ol", "ul"])
            }
            Self::Button => is_default_scope_boundary(element) || element.is_html("button"),
            Self::Table => element.is_one_of(Namespace::Html, &["html", "table", "template"]),
            Self::Select => !element.is_one_of(Namespace::Html, &["optgroup", "option"]),
        }
    }
}

fn is_default_scope_boundary(element: &ElementData) -> bool {
    element.is_one_of(
        Namespace::Html,
        &[
            "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
        ],
    ) || element.is_one_of(
        Namespace::MathMl,
        &["mi", "mo", "mn", "ms", "mtext", "annotation-xml"],
    ) || element.is_one_of(Namespace::Svg, &["foreignObject", "desc", "title"])
}

/// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
#[derive(Debug, Clone, Default)]
pub struct OpenElementsStack {
    elements: Vec<NodeId>,
}

impl OpenElementsStack {
    /// An empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Push `node`; it becomes the current node.
    pub fn push(&mut self, node: NodeId) {
        self.elements.push(node);
    }

    /// Pop the current node.
    pub fn pop(&mut self) -> Option<NodeId> {
        self.elements.pop()
    }

    /// "The current node is the bottommost node in this stack of open elements."
    #[must_use]
    pub fn current_node(&self) -> Option<NodeId> {
        self.elements.last().copied()
    }

    /// The topmost node (the `html` element once it exists).
    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.elements.first().copied()
    }

    /// The entry at `index`, counted from the top.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.elements.get(index).copied()
    }

    /// Number of open elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether no element is open.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The entries from top to bottom.
    #[must_use]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.elements
    }

    /// Whether `node` is on the stack.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.elements.contains(&node)
    }

    /// The index of `node`, counted from the top.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.elements.iter().position(|&id| id == node)
    }

    /// Whether an HTML element named `tag` is anywhere on the stack.
    #[must_use]
    pub fn contains_tag(&self, tree: &DomTree, tag: &str) -> bool {
        self.last_index_of(tree, tag).is_some()
    }

    /// The index of the bottommost HTML element named `tag`.
    #[must_use]
    pub fn last_index_of(&self, tree: &DomTree, tag: &str) -> Option<usize> {
        self.elements
            .iter()
            .rposition(|&id| tree.as_element(id).is_some_and(|e| e.is_html(tag)))
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "The stack of open elements is said to have an element target node in a
    /// specific scope consisting of a list of element types list when the
    /// following algorithm terminates in a match state:"
    ///
    /// STEP 1: "Initialize node to be the current node (the bottommost node of
    ///          the stack)."
    /// STEP 2: "If node is the target node, terminate in a match state."
    /// STEP 3: "Otherwise, if node is one of the element types in list,
    ///          terminate in a failure state."
    /// STEP 4: "Otherwise, set node to the previous entry in the stack of open
    ///          elements and return to step 2."
    fn search_scope(
        &self,
        tree: &DomTree,
        kind: ScopeKind,
        mut is_target: impl FnMut(NodeId, &ElementData) -> bool,
    ) -> bool {
        for &id in self.elements.iter().rev() {
            let Some(element) = tree.as_element(id) else {
                continue;
            };
            if is_target(id, element) {
                return true;
            }
            if kind.is_boundary(element) {
                return false;
            }
        }
        false
    }

    /// Whether an HTML element named `tag` is in the given scope.
    #[must_use]
    pub fn has_in_scope(&self, tree: &DomTree, tag: &str, kind: ScopeKind) -> bool {
        self.search_scope(tree, kind, |_, element| element.is_html(tag))
    }

    /// Whether an HTML element with any of the names in `tags` is in scope.
    #[must_use]
    pub fn has_any_in_scope(&self, tree: &DomTree, tags: &[&str], kind: ScopeKind) -> bool {
        self.search_scope(tree, kind, |_, element| {
            element.is_one_of(Namespace::Html, tags)
        })
    }

    /// Whether the specific element `node` is in scope.
    #[must_use]
    pub fn has_node_in_scope(&self, tree: &DomTree, node: NodeId, kind: ScopeKind) -> bool {
        self.search_scope(tree, kind, |id, _| id == node)
    }

    /// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "...while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an rp
    /// element, an rt element, or an rtc element, the user agent must pop the
    /// current node off the stack of open elements."
    ///
    /// "If a step requires the user agent to generate implied end tags but lists
    /// an element to exclude from the process, then the user agent must perform
    /// the above steps as if that element was not in the above list."
    pub fn generate_implied_end_tags(&mut self, tree: &DomTree, excluding: Option<&str>) {
        self.pop_while_current(tree, |element| {
            element.is_one_of(Namespace::Html, IMPLIED_END_TAGS)
                && excluding != Some(element.tag_name.as_str())
        });
    }

    /// "...while the current node is a caption element, a colgroup element, a dd
    /// element, ... or a tr element, the user agent must pop the current node
    /// off the stack of open elements."
    pub fn generate_all_implied_end_tags_thoroughly(&mut self, tree: &DomTree) {
        self.pop_while_current(tree, |element| {
            element.is_one_of(Namespace::Html, THOROUGHLY_IMPLIED_END_TAGS)
        });
    }

    fn pop_while_current(&mut self, tree: &DomTree, predicate: impl Fn(&ElementData) -> bool) {
        while let Some(current) = self.current_node() {
            if !tree.as_element(current).is_some_and(&predicate) {
                break;
            }
            let _ = self.elements.pop();
        }
    }

    /// Remove `node` wherever it is in the stack. Returns `false` if it was
    /// not there.
    pub fn remove_element(&mut self, node: NodeId) -> bool {
        let Some(index) = self.position(node) else {
            return false;
        };
        let _ = self.elements.remove(index);
        true
    }

    /// Remove the entry at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<NodeId> {
        (index < self.elements.len()).then(|| self.elements.remove(index))
    }

    /// Replace the entry for `old` with `new`. Returns `false` if `old` was
    /// not on the stack.
    pub fn replace_element(&mut self, old: NodeId, new: NodeId) -> bool {
        let Some(index) = self.position(old) else {
            return false;
        };
        self.elements[index] = new;
        true
    }

    /// Insert `node` at `index` (clamped to the stack length).
    pub fn insert_at(&mut self, index: usize, node: NodeId) {
        let index = index.min(self.elements.len());
        self.elements.insert(index, node);
    }

    /// Pop elements until an HTML element named `tag` has been popped.
    pub fn pop_until_tag(&mut self, tree: &DomTree, tag: &str) {
        self.pop_until_one_of(tree, &[tag]);
    }

    /// Pop elements until an HTML element with one of the names in `tags` has
    /// been popped.
    pub fn pop_until_one_of(&mut self, tree: &DomTree, tags: &[&str]) {
        while let Some(id) = self.elements.pop() {
            if tree
                .as_element(id)
                .is_some_and(|e| e.is_one_of(Namespace::Html, tags))
            {
                break;
            }
        }
    }

    /// Pop elements until `node` has been popped.
    pub fn pop_until_node(&mut self, node: NodeId) {
        while let Some(id) = self.elements.pop() {
            if id == node {
                break;
            }
        }
    }

    /// Keep only the first `len` entries.
    pub fn truncate(&mut self, len: usize) {
        self.elements.truncate(len);
    }

    /// [§ 13.2.6.4.9](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    ///
    /// "...clear the stack back to a table context, it means that the UA must,
    /// while the current node is not a table, template, or html element, pop
    /// elements from the stack of open elements."
    ///
    /// The same shape serves the table body and table row contexts with other
    /// name lists.
    pub fn clear_back_to(&mut self, tree: &DomTree, names: &[&str]) {
        self.pop_while_current(tree, |element| !element.is_one_of(Namespace::Html, names));
    }
}
