//! Rendering a parse result as a tree dump, HTML or JSON.

use anyhow::Result;
use canopy_dom::{DomTree, NodeId, NodeType, QuirksMode, dump, serialize_children};
use canopy_html::{Document, Fragment, ParseIssue};
use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde_json::{Value, json};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Indented tree dump, one node per line
    Tree,
    /// Serialized HTML
    Html,
    /// JSON object with the tree, the parse errors and tokenizer counters
    Json,
}

/// A parsed document or fragment.
pub enum Parsed {
    Document(Document),
    Fragment(Fragment),
}

impl Parsed {
    const fn tree(&self) -> &DomTree {
        match self {
            Self::Document(doc) => &doc.tree,
            Self::Fragment(fragment) => &fragment.tree,
        }
    }

    /// The node whose children are the output.
    const fn root(&self) -> NodeId {
        match self {
            Self::Document(_) => NodeId::ROOT,
            Self::Fragment(fragment) => fragment.root,
        }
    }

    pub fn errors(&self) -> &[ParseIssue] {
        match self {
            Self::Document(doc) => &doc.errors,
            Self::Fragment(fragment) => &fragment.errors,
        }
    }
}

/// Render `parsed` in `format`. `color` adds terminal colours to the tree
/// dump.
pub fn render(parsed: &Parsed, format: Format, color: bool) -> Result<String> {
    let tree = parsed.tree();
    match format {
        Format::Tree => {
            let text = dump(tree, parsed.root());
            Ok(if color { colorize_dump(&text) } else { text })
        }
        Format::Html => {
            let mut html = serialize_children(tree, parsed.root());
            html.push('\n');
            Ok(html)
        }
        Format::Json => {
            let mut value = json!({
                "tree": children_json(tree, parsed.root()),
                "errors": parsed.errors(),
            });
            if let Parsed::Document(doc) = parsed {
                value["quirksMode"] = json!(quirks_name(tree.quirks_mode()));
                value["stats"] = json!(doc.stats);
            }
            let mut text = serde_json::to_string_pretty(&value)?;
            text.push('\n');
            Ok(text)
        }
    }
}

/// Print the parse errors to stderr, one per line.
pub fn print_errors(errors: &[ParseIssue], color: bool) {
    if errors.is_empty() {
        return;
    }
    let header = format!("{} parse error(s)", errors.len());
    if color {
        eprintln!("{}", header.bold());
    } else {
        eprintln!("{header}");
    }
    for issue in errors {
        let at = format!("{}:{}", issue.position.line, issue.position.column);
        if color {
            eprintln!("  {} {}", at.dimmed(), issue.code.yellow());
        } else {
            eprintln!("  {at} {}", issue.code);
        }
    }
}

const fn quirks_name(mode: QuirksMode) -> &'static str {
    match mode {
        QuirksMode::NoQuirks => "no-quirks",
        QuirksMode::Quirks => "quirks",
        QuirksMode::LimitedQuirks => "limited-quirks",
    }
}

fn children_json(tree: &DomTree, id: NodeId) -> Vec<Value> {
    tree.children(id)
        .iter()
        .map(|&child| node_json(tree, child))
        .collect()
}

fn node_json(tree: &DomTree, id: NodeId) -> Value {
    let Some(node) = tree.get(id) else {
        return Value::Null;
    };
    let mut value = match &node.node_type {
        NodeType::Document => json!({ "type": "document" }),
        NodeType::DocumentFragment => json!({ "type": "fragment" }),
        NodeType::DocumentType(doctype) => json!({
            "type": "doctype",
            "name": doctype.name,
            "publicId": doctype.public_id,
            "systemId": doctype.system_id,
        }),
        NodeType::Element(data) => {
            let attributes: serde_json::Map<String, Value> = data
                .attrs
                .iter()
                .map(|(name, value)| (name.to_string(), json!(value)))
                .collect();
            let mut element = json!({
                "type": "element",
                "tagName": data.tag_name,
                "namespace": data.namespace.url(),
                "attributes": attributes,
            });
            if let Some(contents) = data.template_contents {
                element["content"] = json!(children_json(tree, contents));
            }
            element
        }
        NodeType::Text(text) => json!({ "type": "text", "content": text }),
        NodeType::Comment(text) => json!({ "type": "comment", "content": text }),
    };
    if !tree.children(id).is_empty() {
        value["children"] = json!(children_json(tree, id));
    }
    value
}

/// Colour each dump line by what it shows.
fn colorize_dump(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for line in text.lines() {
        let Some(rest) = line.strip_prefix("| ") else {
            out.push_str(line);
            out.push('\n');
            continue;
        };
        let body = rest.trim_start_matches(' ');
        let indent = &rest[..rest.len() - body.len()];

        let colored = if body.starts_with("<!--") {
            body.dimmed().to_string()
        } else if body.starts_with("<!DOCTYPE") {
            body.magenta().to_string()
        } else if body.starts_with('<') {
            body.cyan().bold().to_string()
        } else if body.starts_with('"') {
            body.green().to_string()
        } else if body == "content" {
            body.dimmed().italic().to_string()
        } else {
            body.yellow().to_string()
        };
        out.push_str(&"| ".dimmed().to_string());
        out.push_str(indent);
        out.push_str(&colored);
        out.push('\n');
    }
    out
}
