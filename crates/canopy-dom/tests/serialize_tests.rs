//! Tests for the HTML serializer and the tree dump.

use canopy_dom::{
    AttributesMap, DoctypeData, DomTree, ElementData, Namespace, NodeId, NodeType, dump, serialize,
    serialize_children,
};
use pretty_assertions::assert_eq;

fn element(tree: &mut DomTree, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let attrs = attrs
        .iter()
        .map(|(n, v)| ((*n).to_string(), (*v).to_string()))
        .collect();
    tree.alloc_element(ElementData::new(tag.to_string(), Namespace::Html, attrs))
}

fn text(tree: &mut DomTree, data: &str) -> NodeId {
    tree.alloc(NodeType::Text(data.to_string()))
}

/// <!DOCTYPE html><html><head></head><body><p class="x">a &amp; b</p></body></html>
fn small_document() -> DomTree {
    let mut tree = DomTree::new();
    let doctype = tree.alloc(NodeType::DocumentType(DoctypeData {
        name: "html".to_string(),
        ..DoctypeData::default()
    }));
    tree.append_child(NodeId::ROOT, doctype);
    let html = element(&mut tree, "html", &[]);
    tree.append_child(NodeId::ROOT, html);
    let head = element(&mut tree, "head", &[]);
    let body = element(&mut tree, "body", &[]);
    tree.append_child(html, head);
    tree.append_child(html, body);
    let p = element(&mut tree, "p", &[("class", "x")]);
    tree.append_child(body, p);
    let t = text(&mut tree, "a & b");
    tree.append_child(p, t);
    tree
}

#[test]
fn test_serialize_document() {
    let tree = small_document();
    assert_eq!(
        serialize(&tree, NodeId::ROOT),
        "<!DOCTYPE html><html><head></head><body><p class=\"x\">a &amp; b</p></body></html>"
    );
}

#[test]
fn test_dump_document() {
    let tree = small_document();
    assert_eq!(
        dump(&tree, NodeId::ROOT),
        "| <!DOCTYPE html>\n\
         | <html>\n\
         |   <head>\n\
         |   <body>\n\
         |     <p>\n\
         |       class=\"x\"\n\
         |       \"a & b\"\n"
    );
}

#[test]
fn test_void_elements_have_no_end_tag() {
    let mut tree = DomTree::new();
    let div = element(&mut tree, "div", &[]);
    let br = element(&mut tree, "br", &[]);
    let img = element(&mut tree, "img", &[("alt", "say \"hi\"")]);
    tree.append_child(div, br);
    tree.append_child(div, img);

    assert_eq!(
        serialize_children(&tree, div),
        "<br><img alt=\"say &quot;hi&quot;\">"
    );
}

#[test]
fn test_raw_text_is_not_escaped() {
    let mut tree = DomTree::new();
    let style = element(&mut tree, "style", &[]);
    let css = text(&mut tree, "a > b { content: \"&\" }");
    tree.append_child(style, css);

    assert_eq!(
        serialize(&tree, style),
        "<style>a > b { content: \"&\" }</style>"
    );
}

#[test]
fn test_pre_leading_newline_is_doubled() {
    let mut tree = DomTree::new();
    let pre = element(&mut tree, "pre", &[]);
    let body = text(&mut tree, "\ncode");
    tree.append_child(pre, body);

    assert_eq!(serialize(&tree, pre), "<pre>\n\ncode</pre>");
}

#[test]
fn test_template_serializes_contents() {
    let mut tree = DomTree::new();
    let template = element(&mut tree, "template", &[]);
    let contents = tree.template_contents(template).expect("contents");
    let span = element(&mut tree, "span", &[]);
    tree.append_child(contents, span);

    assert_eq!(serialize(&tree, template), "<template><span></span></template>");
    assert_eq!(
        dump(&tree, NodeId::ROOT),
        "",
        "a detached template is not part of the document"
    );
}

#[test]
fn test_dump_foreign_and_template() {
    let mut tree = DomTree::new();
    let body = element(&mut tree, "body", &[]);
    tree.append_child(NodeId::ROOT, body);
    let svg = tree.alloc_element(ElementData::new(
        "svg".to_string(),
        Namespace::Svg,
        AttributesMap::new(),
    ));
    tree.append_child(body, svg);
    let template = element(&mut tree, "template", &[]);
    tree.append_child(body, template);
    let contents = tree.template_contents(template).expect("contents");
    let comment = tree.alloc(NodeType::Comment("c".to_string()));
    tree.append_child(contents, comment);

    assert_eq!(
        dump(&tree, NodeId::ROOT),
        "| <body>\n\
         |   <svg svg>\n\
         |   <template>\n\
         |     content\n\
         |       <!-- c -->\n"
    );
}
