//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)

use crate::{DomTree, Namespace, NodeId, NodeType};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr". The serializer also treats the legacy `basefont`,
/// `bgsound`, `frame`, `keygen` and `param` as void.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// "If the parent of current node is a style, script, xmp, iframe, noembed,
/// noframes, or plaintext element... then append the value of current node's
/// data literally."
const RAW_TEXT_PARENTS: &[&str] = &[
    "style",
    "script",
    "xmp",
    "iframe",
    "noembed",
    "noframes",
    "plaintext",
];

/// Serialize a node: the outer markup of an element, text, comment or
/// doctype, or the children of a document or fragment.
#[must_use]
pub fn serialize(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    match tree.get(id).map(|n| &n.node_type) {
        Some(NodeType::Document | NodeType::DocumentFragment) => {
            serialize_children_into(tree, id, &mut out);
        }
        Some(_) => serialize_node_into(tree, id, &mut out),
        None => {}
    }
    out
}

/// "The HTML fragment serialization algorithm": the markup for the children
/// of `id` (the template contents, for a `template` element).
#[must_use]
pub fn serialize_children(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    serialize_children_into(tree, id, &mut out);
    out
}

fn serialize_children_into(tree: &DomTree, id: NodeId, out: &mut String) {
    // "If the node is a template element, then let the node instead be the
    //  template element's template contents."
    let container = tree.template_contents(id).unwrap_or(id);
    for &child in tree.children(container) {
        serialize_node_into(tree, child, out);
    }
}

fn serialize_node_into(tree: &DomTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Element(data) => {
            out.push('<');
            out.push_str(&data.tag_name);
            for (name, value) in data.attrs.iter() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            out.push('>');

            if data.namespace == Namespace::Html && VOID_ELEMENTS.contains(&data.tag_name.as_str())
            {
                return;
            }

            // A leading newline in these elements is dropped by the parser, so
            // an extra one keeps the content stable across a round trip.
            if data.is_one_of(Namespace::Html, &["pre", "textarea", "listing"])
                && tree
                    .first_child(id)
                    .and_then(|c| tree.as_text(c))
                    .is_some_and(|t| t.starts_with('\n'))
            {
                out.push('\n');
            }

            serialize_children_into(tree, id, out);
            out.push_str("</");
            out.push_str(&data.tag_name);
            out.push('>');
        }
        NodeType::Text(text) => {
            let raw = node
                .parent
                .and_then(|p| tree.as_element(p))
                .is_some_and(|p| p.is_one_of(Namespace::Html, RAW_TEXT_PARENTS));
            if raw {
                out.push_str(text);
            } else {
                escape_into(text, false, out);
            }
        }
        NodeType::Comment(data) => {
            out.push_str("<!--");
            out.push_str(data);
            out.push_str("-->");
        }
        NodeType::DocumentType(doctype) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(&doctype.name);
            out.push('>');
        }
        NodeType::Document | NodeType::DocumentFragment => serialize_children_into(tree, id, out),
    }
}

/// [§ 13.3 Escaping a string](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
///
/// "Replace any occurrence of the "&" character by the string "&amp;".
/// Replace any occurrences of the U+00A0 NO-BREAK SPACE character by the
/// string "&nbsp;". If the algorithm was invoked in the attribute mode,
/// replace any occurrences of the """ character by the string "&quot;".
/// If the algorithm was not invoked in the attribute mode, replace any
/// occurrences of the "<" character by the string "&lt;", and any
/// occurrences of the ">" character by the string "&gt;"."
fn escape_into(text: &str, attribute_mode: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            '"' if attribute_mode => out.push_str("&quot;"),
            '<' if !attribute_mode => out.push_str("&lt;"),
            '>' if !attribute_mode => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}
