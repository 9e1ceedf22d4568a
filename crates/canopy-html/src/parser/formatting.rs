//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
//!
//! "Initially, the list of active formatting elements is empty. It is used to
//! handle mis-nested formatting element tags."
//!
//! Reconstruction needs to insert elements, so it lives on the tree builder;
//! this type owns the list itself.

use canopy_dom::NodeId;

use crate::tokenizer::{Attribute, Token};

/// An entry in the list of active formatting elements.
///
/// "The list contains elements in the formatting category, and markers."
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattingEntry {
    /// A formatting element, with the token it was created from so that it
    /// can be re-created during reconstruction or adoption.
    Element {
        /// The element in the tree.
        node: NodeId,
        /// The start tag that created it.
        token: Token,
    },
    /// "The markers are inserted when entering applet, object, marquee,
    /// template, td, th, and caption elements, and are used to prevent
    /// formatting from "leaking" into applet, object, marquee, template, td,
    /// th, and caption elements."
    Marker,
}

impl FormattingEntry {
    /// The element, unless this is a marker.
    #[must_use]
    pub const fn node(&self) -> Option<NodeId> {
        match self {
            Self::Element { node, .. } => Some(*node),
            Self::Marker => None,
        }
    }

    fn tag_name(&self) -> Option<&str> {
        match self {
            Self::Element {
                token: Token::StartTag { name, .. },
                ..
            } => Some(name),
            _ => None,
        }
    }
}

/// The list of active formatting elements.
#[derive(Debug, Clone, Default)]
pub struct ActiveFormattingElements {
    entries: Vec<FormattingEntry>,
}

impl ActiveFormattingElements {
    /// An empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of entries, markers included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FormattingEntry> {
        self.entries.get(index)
    }

    /// The last (most recently added) entry.
    #[must_use]
    pub fn last(&self) -> Option<&FormattingEntry> {
        self.entries.last()
    }

    /// The entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[FormattingEntry] {
        &self.entries
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// "When the steps below require the UA to push onto the list of active
    /// formatting elements an element element, the UA must perform the
    /// following steps:"
    pub fn push(&mut self, node: NodeId, token: Token) {
        // STEP 1: "If there are already three elements in the list of active
        //          formatting elements after the last marker, if any, or
        //          anywhere in the list if there are no markers, that have the
        //          same tag name, namespace, and attributes as element, then
        //          remove the earliest such element from the list of active
        //          formatting elements."
        let mut count = 0;
        let mut earliest = None;
        for (index, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                FormattingEntry::Marker => break,
                FormattingEntry::Element { token: existing, .. } => {
                    if same_element_kind(existing, &token) {
                        count += 1;
                        earliest = Some(index);
                    }
                }
            }
        }
        if count >= 3
            && let Some(index) = earliest
        {
            let _ = self.entries.remove(index);
        }

        // STEP 2: "Add element to the list of active formatting elements."
        self.entries.push(FormattingEntry::Element { node, token });
    }

    /// "Insert a marker at the end of the list of active formatting elements."
    pub fn insert_marker(&mut self) {
        self.entries.push(FormattingEntry::Marker);
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    ///
    /// STEP 1: "Let entry be the last (most recently added) entry in the list
    ///          of active formatting elements."
    /// STEP 2: "Remove entry from the list of active formatting elements."
    /// STEP 3: "If entry was a marker, then stop the algorithm at this point."
    /// STEP 4: "Go to step 1."
    pub fn clear_to_last_marker(&mut self) {
        while let Some(entry) = self.entries.pop() {
            if entry == FormattingEntry::Marker {
                break;
            }
        }
    }

    /// Whether `node` has an entry in the list.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.position(node).is_some()
    }

    /// The index of the entry for `node`.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.entries.iter().position(|e| e.node() == Some(node))
    }

    /// The token that created `node`, if it has an entry.
    #[must_use]
    pub fn token_for(&self, node: NodeId) -> Option<&Token> {
        self.entries.iter().find_map(|e| match e {
            FormattingEntry::Element { node: n, token } if *n == node => Some(token),
            _ => None,
        })
    }

    /// Remove the entry for `node`. Returns the index it occupied.
    pub fn remove(&mut self, node: NodeId) -> Option<usize> {
        let index = self.position(node)?;
        let _ = self.entries.remove(index);
        Some(index)
    }

    /// Point the entry for `old` at `new`, keeping its token. Returns `false`
    /// if `old` has no entry.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> bool {
        for entry in &mut self.entries {
            if let FormattingEntry::Element { node, .. } = entry
                && *node == old
            {
                *node = new;
                return true;
            }
        }
        false
    }

    /// Insert an element entry at `index` (a bookmark), clamped to the list
    /// length.
    pub fn insert_at(&mut self, index: usize, node: NodeId, token: Token) {
        let index = index.min(self.entries.len());
        self.entries
            .insert(index, FormattingEntry::Element { node, token });
    }

    /// "...the last element in the list of active formatting elements that is
    /// between the end of the list and the last marker in the list, if any, or
    /// the start of the list otherwise, and has the tag name `name`."
    #[must_use]
    pub fn last_named_after_marker(&self, name: &str) -> Option<NodeId> {
        self.entries
            .iter()
            .rev()
            .take_while(|e| **e != FormattingEntry::Marker)
            .find(|e| e.tag_name() == Some(name))
            .and_then(FormattingEntry::node)
    }
}

/// "...the same tag name, namespace, and attributes". Formatting elements are
/// always HTML, and attribute order does not matter.
fn same_element_kind(a: &Token, b: &Token) -> bool {
    match (a, b) {
        (
            Token::StartTag {
                name: a_name,
                attributes: a_attrs,
                ..
            },
            Token::StartTag {
                name: b_name,
                attributes: b_attrs,
                ..
            },
        ) => a_name == b_name && same_attributes(a_attrs, b_attrs),
        _ => false,
    }
}

fn same_attributes(a: &[Attribute], b: &[Attribute]) -> bool {
    a.len() == b.len() && a.iter().all(|attr| b.contains(attr))
}
