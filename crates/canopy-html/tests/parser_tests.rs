//! Integration tests for tree construction in body and around it.

use canopy_dom::{DomTree, NodeId, QuirksMode, dump};
use canopy_html::{Document, ErrorKind, ParserConfig, parse_document, parse_document_with};
use pretty_assertions::assert_eq;

/// Helper to parse a document.
fn parse(html: &str) -> Document {
    parse_document(html).expect("default limits are never reached by test input")
}

/// Dump of the whole document.
fn document_dump(html: &str) -> String {
    let doc = parse(html);
    dump(&doc.tree, NodeId::ROOT)
}

/// Dump of the body's children, indented from the body.
fn body_dump(html: &str) -> String {
    body_dump_of(&parse(html).tree)
}

fn body_dump_of(tree: &DomTree) -> String {
    let body = tree.body().expect("document has a body");
    dump(tree, body)
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, tag: &str) -> Option<NodeId> {
    tree.descendants(NodeId::ROOT)
        .find(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == tag))
}

fn error_codes(doc: &Document) -> Vec<ErrorKind> {
    doc.errors.iter().map(|e| e.code).collect()
}

#[test]
fn test_document_structure() {
    assert_eq!(
        document_dump("<!DOCTYPE html><p>Hello"),
        "| <!DOCTYPE html>\n\
         | <html>\n\
         |   <head>\n\
         |   <body>\n\
         |     <p>\n\
         |       \"Hello\"\n"
    );
}

#[test]
fn test_empty_input_builds_skeleton() {
    assert_eq!(
        document_dump(""),
        "| <html>\n\
         |   <head>\n\
         |   <body>\n"
    );
}

#[test]
fn test_missing_doctype_is_quirks() {
    let doc = parse("<p>x");
    assert_eq!(doc.tree.quirks_mode(), QuirksMode::Quirks);
    assert_eq!(error_codes(&doc), vec![ErrorKind::MissingDoctype]);
}

#[test]
fn test_doctype_quirks_modes() {
    let no_quirks = parse("<!DOCTYPE html>");
    assert_eq!(no_quirks.tree.quirks_mode(), QuirksMode::NoQuirks);
    assert!(no_quirks.errors.is_empty());

    let quirks = parse(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN">"#);
    assert_eq!(quirks.tree.quirks_mode(), QuirksMode::Quirks);

    let limited = parse(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#,
    );
    assert_eq!(limited.tree.quirks_mode(), QuirksMode::LimitedQuirks);
}

#[test]
fn test_comments_before_and_after_document() {
    assert_eq!(
        document_dump("<!--a--><!DOCTYPE html><html><body></body></html><!--b-->"),
        "| <!-- a -->\n\
         | <!DOCTYPE html>\n\
         | <html>\n\
         |   <head>\n\
         |   <body>\n\
         | <!-- b -->\n"
    );
}

#[test]
fn test_head_elements() {
    assert_eq!(
        document_dump("<!DOCTYPE html><title>a &amp; b</title><meta charset=utf-8><style>p{}</style>x"),
        "| <!DOCTYPE html>\n\
         | <html>\n\
         |   <head>\n\
         |     <title>\n\
         |       \"a & b\"\n\
         |     <meta>\n\
         |       charset=\"utf-8\"\n\
         |     <style>\n\
         |       \"p{}\"\n\
         |   <body>\n\
         |     \"x\"\n"
    );
}

#[test]
fn test_text_after_body_end_tag_returns_to_body() {
    assert_eq!(body_dump("<body>a</body>b"), "| \"ab\"\n");
}

#[test]
fn test_whitespace_after_html_end_tag_goes_to_body() {
    let doc = parse("<!DOCTYPE html><body>a</body></html> ");
    let body = doc.tree.body().expect("body");
    assert_eq!(doc.tree.text_content(body), "a ");
    assert!(doc.errors.is_empty());
}

#[test]
fn test_paragraphs_close_each_other() {
    assert_eq!(
        body_dump("<p>a<p>b"),
        "| <p>\n\
         |   \"a\"\n\
         | <p>\n\
         |   \"b\"\n"
    );
}

#[test]
fn test_stray_p_end_tag_creates_empty_paragraph() {
    let doc = parse("<!DOCTYPE html><body></p>");
    assert_eq!(body_dump_of(&doc.tree), "| <p>\n");
    assert_eq!(error_codes(&doc), vec![ErrorKind::UnexpectedEndTag]);
}

#[test]
fn test_stray_p_end_tag_before_html_is_ignored() {
    let doc = parse("<!DOCTYPE html></p>");
    assert_eq!(body_dump_of(&doc.tree), "");
    assert_eq!(error_codes(&doc), vec![ErrorKind::UnexpectedEndTag]);
}

#[test]
fn test_br_end_tag_acts_as_start_tag() {
    assert_eq!(body_dump("a</br>b"), "| \"a\"\n| <br>\n| \"b\"\n");
}

#[test]
fn test_headings_do_not_nest() {
    assert_eq!(
        body_dump("<h1>a<h2>b</h1>c"),
        "| <h1>\n\
         |   \"a\"\n\
         | <h2>\n\
         |   \"b\"\n\
         | \"c\"\n"
    );
}

#[test]
fn test_list_items_close_implicitly() {
    assert_eq!(
        body_dump("<ul><li>a<li>b</ul>"),
        "| <ul>\n\
         |   <li>\n\
         |     \"a\"\n\
         |   <li>\n\
         |     \"b\"\n"
    );
}

#[test]
fn test_nested_list_keeps_outer_item_open() {
    assert_eq!(
        body_dump("<ul><li>a<ul><li>b</ul>c</ul>"),
        "| <ul>\n\
         |   <li>\n\
         |     \"a\"\n\
         |     <ul>\n\
         |       <li>\n\
         |         \"b\"\n\
         |     \"c\"\n"
    );
}

#[test]
fn test_definition_list_items() {
    assert_eq!(
        body_dump("<dl><dt>a<dd>b<dt>c</dl>"),
        "| <dl>\n\
         |   <dt>\n\
         |     \"a\"\n\
         |   <dd>\n\
         |     \"b\"\n\
         |   <dt>\n\
         |     \"c\"\n"
    );
}

#[test]
fn test_li_end_tag_without_li_in_scope_is_ignored() {
    let doc = parse("<!DOCTYPE html><div></li>x</div>");
    assert_eq!(body_dump_of(&doc.tree), "| <div>\n|   \"x\"\n");
    assert_eq!(error_codes(&doc), vec![ErrorKind::UnexpectedEndTag]);
}

#[test]
fn test_void_elements() {
    assert_eq!(
        body_dump("<img src=a.png><br><input type=text><hr>"),
        "| <img>\n\
         |   src=\"a.png\"\n\
         | <br>\n\
         | <input>\n\
         |   type=\"text\"\n\
         | <hr>\n"
    );
}

#[test]
fn test_self_closing_non_void_is_an_error() {
    let doc = parse("<!DOCTYPE html><div/>x");
    assert_eq!(body_dump_of(&doc.tree), "| <div>\n|   \"x\"\n");
    assert_eq!(
        error_codes(&doc),
        vec![
            ErrorKind::NonVoidHtmlElementStartTagWithTrailingSolidus,
            ErrorKind::EofWithUnclosedElements,
        ]
    );
}

#[test]
fn test_image_becomes_img() {
    assert_eq!(body_dump("<image src=x>"), "| <img>\n|   src=\"x\"\n");
}

#[test]
fn test_leading_newline_skipped_in_pre_and_textarea() {
    assert_eq!(body_dump("<pre>\nx</pre>"), "| <pre>\n|   \"x\"\n");
    assert_eq!(body_dump("<pre>\n\nx</pre>"), "| <pre>\n|   \"\nx\"\n");
    assert_eq!(
        body_dump("<textarea>\n<b>x</textarea>"),
        "| <textarea>\n|   \"<b>x\"\n"
    );
    assert_eq!(body_dump("<listing>\ny</listing>"), "| <listing>\n|   \"y\"\n");
}

#[test]
fn test_plaintext_swallows_the_rest() {
    assert_eq!(
        body_dump("<plaintext><b></plaintext>"),
        "| <plaintext>\n|   \"<b></plaintext>\"\n"
    );
}

#[test]
fn test_form_pointer_prevents_nested_forms() {
    assert_eq!(
        body_dump("<form><form><input></form>"),
        "| <form>\n|   <input>\n"
    );
}

#[test]
fn test_button_closes_open_button() {
    assert_eq!(
        body_dump("<button>a<button>b"),
        "| <button>\n|   \"a\"\n| <button>\n|   \"b\"\n"
    );
}

#[test]
fn test_select_options() {
    assert_eq!(
        body_dump("<select><option>a<option>b<optgroup><option>c</select>d"),
        "| <select>\n\
         |   <option>\n\
         |     \"a\"\n\
         |   <option>\n\
         |     \"b\"\n\
         |   <optgroup>\n\
         |     <option>\n\
         |       \"c\"\n\
         | \"d\"\n"
    );
}

#[test]
fn test_select_ignores_markup() {
    assert_eq!(
        body_dump("<select><div>a</div><b>b</b></select>"),
        "| <select>\n|   \"ab\"\n"
    );
}

#[test]
fn test_input_closes_select() {
    assert_eq!(
        body_dump("<select><option>a<input>"),
        "| <select>\n|   <option>\n|     \"a\"\n| <input>\n"
    );
}

#[test]
fn test_ruby() {
    assert_eq!(
        body_dump("<ruby>a<rt>b<rp>c</ruby>"),
        "| <ruby>\n\
         |   \"a\"\n\
         |   <rt>\n\
         |     \"b\"\n\
         |   <rp>\n\
         |     \"c\"\n"
    );
}

#[test]
fn test_duplicate_html_and_body_merge_attributes() {
    let doc = parse("<!DOCTYPE html><html lang=en><body class=a><html lang=fr dir=ltr><body id=b class=c>");
    let html = doc.tree.document_element().expect("html");
    let html = doc.tree.as_element(html).expect("element");
    assert_eq!(html.attrs.get("lang"), Some("en"));
    assert_eq!(html.attrs.get("dir"), Some("ltr"));

    let body = doc.tree.body().expect("body");
    let body = doc.tree.as_element(body).expect("element");
    assert_eq!(body.attrs.get("class"), Some("a"));
    assert_eq!(body.attrs.get("id"), Some("b"));
}

#[test]
fn test_frameset_replaces_body() {
    assert_eq!(
        document_dump("<!DOCTYPE html><frameset><frame src=a><frameset><frame></frameset></frameset>x"),
        "| <!DOCTYPE html>\n\
         | <html>\n\
         |   <head>\n\
         |   <frameset>\n\
         |     <frame>\n\
         |       src=\"a\"\n\
         |     <frameset>\n\
         |       <frame>\n"
    );
}

#[test]
fn test_frameset_ignored_after_content() {
    let doc = parse("<!DOCTYPE html><p>x</p><frameset>");
    assert!(find_element(&doc.tree, "frameset").is_none());
    assert_eq!(error_codes(&doc), vec![ErrorKind::UnexpectedStartTag]);
}

#[test]
fn test_noscript_follows_scripting_flag() {
    let html = "<!DOCTYPE html><body><noscript><b>x</b></noscript>";
    assert_eq!(
        body_dump(html),
        "| <noscript>\n|   <b>\n|     \"x\"\n"
    );

    let scripting = ParserConfig {
        scripting: true,
        ..ParserConfig::default()
    };
    let doc = parse_document_with(html, scripting).expect("parses");
    assert_eq!(
        body_dump_of(&doc.tree),
        "| <noscript>\n|   \"<b>x</b>\"\n"
    );
}

#[test]
fn test_noscript_in_head_without_scripting() {
    assert_eq!(
        document_dump("<!DOCTYPE html><head><noscript><link rel=a></noscript></head>"),
        "| <!DOCTYPE html>\n\
         | <html>\n\
         |   <head>\n\
         |     <noscript>\n\
         |       <link>\n\
         |         rel=\"a\"\n\
         |   <body>\n"
    );
}

#[test]
fn test_script_content_is_text() {
    assert_eq!(
        body_dump("<body><script>if (a < b) { x = '</p>'; }</script>"),
        "| <script>\n|   \"if (a < b) { x = '</p>'; }\"\n"
    );

    let doc = parse("<script>if (a < b) {}</script>");
    let head = find_element(&doc.tree, "head").expect("head exists");
    assert_eq!(
        dump(&doc.tree, head),
        "| <script>\n|   \"if (a < b) {}\"\n"
    );
}

#[test]
fn test_eof_in_text_pops_element() {
    let doc = parse("<!DOCTYPE html><body><textarea>abc");
    assert_eq!(body_dump_of(&doc.tree), "| <textarea>\n|   \"abc\"\n");
    assert!(error_codes(&doc).contains(&ErrorKind::EofInText));
}

#[test]
fn test_null_in_body_is_dropped() {
    let doc = parse("<!DOCTYPE html><body>a\0b");
    assert_eq!(body_dump_of(&doc.tree), "| \"ab\"\n");
    assert!(error_codes(&doc).contains(&ErrorKind::UnexpectedNullCharacter));
}

#[test]
fn test_stray_end_tag_reports_position() {
    let doc = parse("<!DOCTYPE html>\n<div>\n  </span></div>");
    let issue = doc
        .errors
        .iter()
        .find(|e| e.code == ErrorKind::UnexpectedEndTag)
        .expect("stray end tag reported");
    assert_eq!(issue.position.line, 3);
    assert_eq!(issue.position.column, 9);
}

#[test]
fn test_errors_are_ordered_by_position() {
    let doc = parse("<div id=a id=b></span>&zz;<div/>");
    let offsets: Vec<usize> = doc.errors.iter().map(|e| e.position.offset).collect();
    let mut sorted = offsets.clone();
    sorted.sort_unstable();
    assert_eq!(offsets, sorted);
}

#[test]
fn test_stats_are_reported() {
    let doc = parse("<p>hi</p>");
    assert_eq!(doc.stats.tokens, 5);
    assert_eq!(doc.stats.characters, 9);
}

#[test]
fn test_issues_serialize_with_kebab_case_codes() {
    let doc = parse("<!DOCTYPE html></p>");
    let value = serde_json::to_value(&doc.errors).expect("serializable");
    assert_eq!(value[0]["code"], "unexpected-end-tag");
    assert_eq!(value[0]["position"]["line"], 1);
    assert_eq!(ErrorKind::UnexpectedEndTag.to_string(), "unexpected-end-tag");
}

#[test]
fn test_config_deserializes_with_defaults() {
    let config: ParserConfig =
        serde_json::from_str(r#"{"scripting": true}"#).expect("valid config");
    assert!(config.scripting);
    assert_eq!(config.limits, ParserConfig::default().limits);

    let doc = parse_document_with("<noscript><p>x</p></noscript>", config).expect("parses");
    let head = find_element(&doc.tree, "head").expect("head exists");
    assert_eq!(
        dump(&doc.tree, head),
        "| <noscript>\n|   \"<p>x</p>\"\n"
    );
}
