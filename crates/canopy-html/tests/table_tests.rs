//! Tree construction tests for tables and foster parenting.

use canopy_dom::{NodeId, dump};
use canopy_html::{Document, ErrorKind, parse_document};
use pretty_assertions::assert_eq;

fn parse(html: &str) -> Document {
    parse_document(html).expect("default limits are never reached by test input")
}

fn body_dump(html: &str) -> String {
    let doc = parse(html);
    dump(&doc.tree, doc.tree.body().expect("document has a body"))
}

#[test]
fn test_text_in_table_is_foster_parented() {
    assert_eq!(body_dump("<table>text</table>"), "| \"text\"\n| <table>\n");
}

#[test]
fn test_foster_parenting_reports_error() {
    let doc = parse("<!DOCTYPE html><table>x</table>");
    let codes: Vec<ErrorKind> = doc.errors.iter().map(|e| e.code).collect();
    assert_eq!(codes, vec![ErrorKind::FosterParentedContent]);
}

#[test]
fn test_whitespace_in_table_stays_in_table() {
    assert_eq!(
        body_dump("<table> <tr><td>a</td></tr></table>"),
        "| <table>\n\
         |   \" \"\n\
         |   <tbody>\n\
         |     <tr>\n\
         |       <td>\n\
         |         \"a\"\n"
    );
}

#[test]
fn test_implied_tbody_and_cells() {
    assert_eq!(
        body_dump("<table><tr><td>a<td>b<tr><th>c</table>"),
        "| <table>\n\
         |   <tbody>\n\
         |     <tr>\n\
         |       <td>\n\
         |         \"a\"\n\
         |       <td>\n\
         |         \"b\"\n\
         |     <tr>\n\
         |       <th>\n\
         |         \"c\"\n"
    );
}

#[test]
fn test_cell_outside_row_gets_implied_row() {
    assert_eq!(
        body_dump("<table><td>x</table>"),
        "| <table>\n\
         |   <tbody>\n\
         |     <tr>\n\
         |       <td>\n\
         |         \"x\"\n"
    );
}

#[test]
fn test_table_sections() {
    assert_eq!(
        body_dump("<table><thead><tr><th>h<tbody><tr><td>b<tfoot><tr><td>f</table>"),
        "| <table>\n\
         |   <thead>\n\
         |     <tr>\n\
         |       <th>\n\
         |         \"h\"\n\
         |   <tbody>\n\
         |     <tr>\n\
         |       <td>\n\
         |         \"b\"\n\
         |   <tfoot>\n\
         |     <tr>\n\
         |       <td>\n\
         |         \"f\"\n"
    );
}

#[test]
fn test_caption_and_column_group() {
    assert_eq!(
        body_dump("<table><caption>c<col><tr><td>x</table>"),
        "| <table>\n\
         |   <caption>\n\
         |     \"c\"\n\
         |   <colgroup>\n\
         |     <col>\n\
         |   <tbody>\n\
         |     <tr>\n\
         |       <td>\n\
         |         \"x\"\n"
    );
}

#[test]
fn test_nested_table_start_tag_closes_table() {
    assert_eq!(body_dump("<table><table>"), "| <table>\n| <table>\n");
}

#[test]
fn test_table_inside_cell() {
    assert_eq!(
        body_dump("<table><td><table><td>x</table>y</table>"),
        "| <table>\n\
         |   <tbody>\n\
         |     <tr>\n\
         |       <td>\n\
         |         <table>\n\
         |           <tbody>\n\
         |             <tr>\n\
         |               <td>\n\
         |                 \"x\"\n\
         |         \"y\"\n"
    );
}

#[test]
fn test_formatting_element_foster_parented() {
    assert_eq!(
        body_dump("<table><b>x</b><tr><td>y</table>"),
        "| <b>\n\
         |   \"x\"\n\
         | <table>\n\
         |   <tbody>\n\
         |     <tr>\n\
         |       <td>\n\
         |         \"y\"\n"
    );
}

#[test]
fn test_foster_parented_text_merges_before_table() {
    assert_eq!(
        body_dump("<div><table>a<tr>b</table></div>"),
        "| <div>\n\
         |   \"ab\"\n\
         |   <table>\n\
         |     <tbody>\n\
         |       <tr>\n"
    );
}

#[test]
fn test_hidden_input_stays_in_table() {
    assert_eq!(
        body_dump("<table><input type=hidden><input></table>"),
        "| <input>\n\
         | <table>\n\
         |   <input>\n\
         |     type=\"hidden\"\n"
    );
}

#[test]
fn test_form_in_table_is_empty() {
    assert_eq!(
        body_dump("<table><form><tr><td>x</table>"),
        "| <table>\n\
         |   <form>\n\
         |   <tbody>\n\
         |     <tr>\n\
         |       <td>\n\
         |         \"x\"\n"
    );
}

#[test]
fn test_select_in_table_closed_by_cell_end() {
    assert_eq!(
        body_dump("<table><tr><td><select><option>a</td>x</table>"),
        "| \"x\"\n\
         | <table>\n\
         |   <tbody>\n\
         |     <tr>\n\
         |       <td>\n\
         |         <select>\n\
         |           <option>\n\
         |             \"a\"\n"
    );
}

#[test]
fn test_quirks_mode_table_does_not_close_paragraph() {
    assert_eq!(
        body_dump("<p><table></table>"),
        "| <p>\n\
         |   <table>\n"
    );
    assert_eq!(
        body_dump("<!DOCTYPE html><p><table></table>"),
        "| <p>\n\
         | <table>\n"
    );
}

#[test]
fn test_stray_table_end_tags_are_ignored() {
    let doc = parse("<!DOCTYPE html></td></tr></table>x");
    assert_eq!(
        dump(&doc.tree, doc.tree.body().expect("body")),
        "| \"x\"\n"
    );
    assert_eq!(doc.errors.len(), 3);
}

#[test]
fn test_cell_contents_do_not_leak_formatting() {
    let doc = parse("<table><tr><td><b>x</td><td>y</table>");
    let tree = &doc.tree;
    let cells: Vec<NodeId> = tree
        .descendants(NodeId::ROOT)
        .filter(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == "td"))
        .collect();
    assert_eq!(cells.len(), 2);
    assert_eq!(dump(tree, cells[1]), "| \"y\"\n");
}
