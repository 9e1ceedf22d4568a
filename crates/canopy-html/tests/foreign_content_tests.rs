//! Tree construction tests for SVG and MathML content.

use canopy_dom::{Namespace, dump};
use canopy_html::{Document, parse_document};
use pretty_assertions::assert_eq;

fn parse(html: &str) -> Document {
    parse_document(html).expect("default limits are never reached by test input")
}

fn body_dump(html: &str) -> String {
    let doc = parse(html);
    dump(&doc.tree, doc.tree.body().expect("document has a body"))
}

#[test]
fn test_svg_element_namespace() {
    let doc = parse("<svg><circle r=1></svg>");
    let tree = &doc.tree;
    let namespaces: Vec<(String, Namespace)> = tree
        .descendants(tree.body().expect("body"))
        .filter_map(|id| tree.as_element(id))
        .map(|e| (e.tag_name.clone(), e.namespace))
        .collect();
    assert_eq!(
        namespaces,
        vec![
            ("svg".to_string(), Namespace::Svg),
            ("circle".to_string(), Namespace::Svg),
        ]
    );
}

#[test]
fn test_svg_tag_and_attribute_case_adjusted() {
    assert_eq!(
        body_dump("<svg viewbox=\"0 0 1 1\"><clippath/><lineargradient></lineargradient></svg>"),
        "| <svg svg>\n\
         |   viewBox=\"0 0 1 1\"\n\
         |   <svg clipPath>\n\
         |   <svg linearGradient>\n"
    );
}

#[test]
fn test_mathml_definition_url_adjusted() {
    assert_eq!(
        body_dump("<math definitionurl=x></math>"),
        "| <math math>\n|   definitionURL=\"x\"\n"
    );
}

#[test]
fn test_foreign_object_holds_html() {
    assert_eq!(
        body_dump("<svg><foreignObject><p>x"),
        "| <svg svg>\n\
         |   <svg foreignObject>\n\
         |     <p>\n\
         |       \"x\"\n"
    );
}

#[test]
fn test_svg_desc_is_integration_point() {
    assert_eq!(
        body_dump("<svg><desc><b>x</b></desc></svg>"),
        "| <svg svg>\n\
         |   <svg desc>\n\
         |     <b>\n\
         |       \"x\"\n"
    );
}

#[test]
fn test_html_start_tag_breaks_out_of_svg() {
    assert_eq!(
        body_dump("<svg><g><p>x"),
        "| <svg svg>\n\
         |   <svg g>\n\
         | <p>\n\
         |   \"x\"\n"
    );
}

#[test]
fn test_font_with_color_breaks_out() {
    assert_eq!(
        body_dump("<svg><font color=red>x</font></svg>"),
        "| <svg svg>\n\
         | <font>\n\
         |   color=\"red\"\n\
         |   \"x\"\n"
    );
    assert_eq!(
        body_dump("<svg><font>x</font></svg>"),
        "| <svg svg>\n\
         |   <svg font>\n\
         |     \"x\"\n"
    );
}

#[test]
fn test_mathml_text_integration_point() {
    assert_eq!(
        body_dump("<math><mi>x<b>y</b></mi></math>"),
        "| <math math>\n\
         |   <math mi>\n\
         |     \"x\"\n\
         |     <b>\n\
         |       \"y\"\n"
    );
}

#[test]
fn test_annotation_xml_with_html_encoding() {
    assert_eq!(
        body_dump("<math><annotation-xml encoding=\"text/html\"><div>x</div></annotation-xml></math>"),
        "| <math math>\n\
         |   <math annotation-xml>\n\
         |     encoding=\"text/html\"\n\
         |     <div>\n\
         |       \"x\"\n"
    );
}

#[test]
fn test_svg_inside_annotation_xml() {
    assert_eq!(
        body_dump("<math><annotation-xml><svg><circle/></svg></annotation-xml></math>"),
        "| <math math>\n\
         |   <math annotation-xml>\n\
         |     <svg svg>\n\
         |       <svg circle>\n"
    );
}

#[test]
fn test_self_closing_foreign_elements() {
    let doc = parse("<!DOCTYPE html><svg><path/><circle/></svg>x");
    assert_eq!(
        dump(&doc.tree, doc.tree.body().expect("body")),
        "| <svg svg>\n\
         |   <svg path>\n\
         |   <svg circle>\n\
         | \"x\"\n"
    );
    assert!(doc.errors.is_empty());
}

#[test]
fn test_cdata_in_foreign_content() {
    assert_eq!(
        body_dump("<svg><![CDATA[a<b]]></svg>"),
        "| <svg svg>\n|   \"a<b\"\n"
    );
}

#[test]
fn test_cdata_in_html_is_bogus_comment() {
    assert_eq!(
        body_dump("<div><![CDATA[x]]></div>"),
        "| <div>\n|   <!-- [CDATA[x]] -->\n"
    );
}

#[test]
fn test_foreign_end_tag_matches_case_insensitively() {
    assert_eq!(
        body_dump("<svg><foreignObject></foreignobject>x</svg>"),
        "| <svg svg>\n\
         |   <svg foreignObject>\n\
         |   \"x\"\n"
    );
}

#[test]
fn test_null_in_foreign_content_is_replaced() {
    assert_eq!(
        body_dump("<svg>a\0b</svg>"),
        "| <svg svg>\n|   \"a\u{FFFD}b\"\n"
    );
}

#[test]
fn test_svg_script_end_tag() {
    assert_eq!(
        body_dump("<svg><script>x</script><g/></svg>"),
        "| <svg svg>\n\
         |   <svg script>\n\
         |     \"x\"\n\
         |   <svg g>\n"
    );
}
