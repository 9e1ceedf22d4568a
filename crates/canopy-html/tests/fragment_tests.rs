//! Tests for the fragment parsing algorithm.

use canopy_dom::{Namespace, dump};
use canopy_html::{ErrorKind, Fragment, ParserConfig, parse_fragment, parse_fragment_with};
use pretty_assertions::assert_eq;

fn fragment(input: &str, context: &str, namespace: Namespace) -> Fragment {
    parse_fragment(input, context, namespace)
        .expect("default limits are never reached by test input")
}

fn fragment_dump(input: &str, context: &str) -> String {
    let fragment = fragment(input, context, Namespace::Html);
    dump(&fragment.tree, fragment.root)
}

#[test]
fn test_body_context() {
    assert_eq!(
        fragment_dump("<p>a<p>b", "body"),
        "| <p>\n|   \"a\"\n| <p>\n|   \"b\"\n"
    );
}

#[test]
fn test_fragment_nodes() {
    let fragment = fragment("a<br>b", "div", Namespace::Html);
    assert_eq!(fragment.nodes().len(), 3);
    assert!(fragment.errors.is_empty());
}

#[test]
fn test_row_context() {
    let fragment = fragment("<td>x</td>", "tr", Namespace::Html);
    assert_eq!(dump(&fragment.tree, fragment.root), "| <td>\n|   \"x\"\n");
    assert!(fragment.errors.is_empty());
}

#[test]
fn test_row_start_tag_without_open_row() {
    let start = fragment("<td>a</td><tr>", "tr", Namespace::Html);
    assert_eq!(dump(&start.tree, start.root), "| <td>\n|   \"a\"\n");
    let codes: Vec<ErrorKind> = start.errors.iter().map(|e| e.code).collect();
    assert_eq!(codes, vec![ErrorKind::UnexpectedStartTag]);

    let end = fragment("<td>a</td></tr>", "tr", Namespace::Html);
    let codes: Vec<ErrorKind> = end.errors.iter().map(|e| e.code).collect();
    assert_eq!(codes, vec![ErrorKind::UnexpectedEndTag]);
}

#[test]
fn test_table_context() {
    assert_eq!(
        fragment_dump("<tr><td>x", "table"),
        "| <tbody>\n\
         |   <tr>\n\
         |     <td>\n\
         |       \"x\"\n"
    );
}

#[test]
fn test_template_context() {
    assert_eq!(
        fragment_dump("<tr><td>x", "template"),
        "| <tr>\n\
         |   <td>\n\
         |     \"x\"\n"
    );
}

#[test]
fn test_select_context() {
    assert_eq!(
        fragment_dump("<option>a<option>b", "select"),
        "| <option>\n\
         |   \"a\"\n\
         | <option>\n\
         |   \"b\"\n"
    );
}

#[test]
fn test_rcdata_context() {
    assert_eq!(fragment_dump("a<b>c", "title"), "| \"a<b>c\"\n");
    assert_eq!(
        fragment_dump("</textarea>x", "textarea"),
        "| \"</textarea>x\"\n"
    );
}

#[test]
fn test_rawtext_and_plaintext_contexts() {
    assert_eq!(fragment_dump("<p>x</p>", "style"), "| \"<p>x</p>\"\n");
    assert_eq!(fragment_dump("<p>x</p>", "plaintext"), "| \"<p>x</p>\"\n");
    assert_eq!(fragment_dump("<p>x</p>", "script"), "| \"<p>x</p>\"\n");
}

#[test]
fn test_noscript_context_follows_scripting() {
    assert_eq!(
        fragment_dump("<b>x</b>", "noscript"),
        "| <b>\n|   \"x\"\n"
    );

    let scripting = ParserConfig {
        scripting: true,
        ..ParserConfig::default()
    };
    let fragment = parse_fragment_with("<b>x</b>", "noscript", Namespace::Html, scripting)
        .expect("parses");
    assert_eq!(dump(&fragment.tree, fragment.root), "| \"<b>x</b>\"\n");
}

#[test]
fn test_stray_end_tag_in_fragment() {
    let fragment = fragment("</div>x", "div", Namespace::Html);
    assert_eq!(dump(&fragment.tree, fragment.root), "| \"x\"\n");
    assert_eq!(fragment.errors.len(), 1);
}

#[test]
fn test_svg_context() {
    let fragment = fragment("<circle/>", "svg", Namespace::Svg);
    assert_eq!(dump(&fragment.tree, fragment.root), "| <svg circle>\n");
}

#[test]
fn test_svg_context_allows_cdata() {
    let fragment = fragment("<![CDATA[x]]>", "svg", Namespace::Svg);
    assert_eq!(dump(&fragment.tree, fragment.root), "| \"x\"\n");
}

#[test]
fn test_html_breaks_out_of_svg_context() {
    let fragment = fragment("<p>x", "svg", Namespace::Svg);
    assert_eq!(dump(&fragment.tree, fragment.root), "| <p>\n|   \"x\"\n");
}

#[test]
fn test_mathml_text_integration_context() {
    let fragment = fragment("<b>x</b><mo/>", "mi", Namespace::MathMl);
    assert_eq!(
        dump(&fragment.tree, fragment.root),
        "| <b>\n|   \"x\"\n| <mo>\n"
    );
}

#[test]
fn test_context_tag_is_case_insensitive() {
    assert_eq!(fragment_dump("<td>x", "TR"), "| <td>\n|   \"x\"\n");
}

#[test]
fn test_fragment_ignores_html_and_body_tags() {
    assert_eq!(
        fragment_dump("<html><head><body><p>x", "div"),
        "| <p>\n|   \"x\"\n"
    );
}
