//! Indented text dump of a tree, one node per line.
//!
//! The format follows the html5lib tree-construction test format:
//!
//! ```text
//! | <!DOCTYPE html>
//! | <html>
//! |   <head>
//! |   <body>
//! |     <p>
//! |       class="intro"
//! |       "Hello"
//! ```
//!
//! Attributes are sorted by name, foreign elements carry their namespace
//! prefix (`<svg svg>`, `<math mi>`) and template contents appear under a
//! `content` line.

use std::fmt::Write;

use crate::{DomTree, Namespace, NodeId, NodeType};

/// Dump the children of `id` (the document, a fragment root, or any node).
#[must_use]
pub fn dump(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    for &child in tree.children(id) {
        dump_node(tree, child, 0, &mut out);
    }
    out
}

fn line(out: &mut String, depth: usize, text: &str) {
    out.push_str("| ");
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(text);
    out.push('\n');
}

fn dump_node(tree: &DomTree, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::DocumentType(doctype) => {
            let mut text = format!("<!DOCTYPE {}", doctype.name);
            if !doctype.public_id.is_empty() || !doctype.system_id.is_empty() {
                let _ = write!(
                    text,
                    " \"{}\" \"{}\"",
                    doctype.public_id, doctype.system_id
                );
            }
            text.push('>');
            line(out, depth, &text);
        }
        NodeType::Element(data) => {
            let name = match data.namespace {
                Namespace::Html => data.tag_name.clone(),
                ns => format!("{} {}", ns.prefix(), data.tag_name),
            };
            line(out, depth, &format!("<{name}>"));

            let mut attrs: Vec<(&str, &str)> = data.attrs.iter().collect();
            attrs.sort_unstable_by(|a, b| a.0.cmp(b.0));
            for (attr_name, value) in attrs {
                line(out, depth + 1, &format!("{attr_name}=\"{value}\""));
            }

            if let Some(contents) = data.template_contents {
                line(out, depth + 1, "content");
                for &child in tree.children(contents) {
                    dump_node(tree, child, depth + 2, out);
                }
            }
            for &child in tree.children(id) {
                dump_node(tree, child, depth + 1, out);
            }
        }
        NodeType::Text(text) => line(out, depth, &format!("\"{text}\"")),
        NodeType::Comment(data) => line(out, depth, &format!("<!-- {data} -->")),
        NodeType::Document | NodeType::DocumentFragment => {
            for &child in tree.children(id) {
                dump_node(tree, child, depth, out);
            }
        }
    }
}
