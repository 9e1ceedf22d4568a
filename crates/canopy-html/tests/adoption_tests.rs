//! Tree construction tests for misnested formatting elements.

use canopy_dom::dump;
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
fn test_misnested_inline_formatting() {
    assert_eq!(
        body_dump("<b>1<i>2</b>3</i>"),
        "| <b>\n\
         |   \"1\"\n\
         |   <i>\n\
         |     \"2\"\n\
         | <i>\n\
         |   \"3\"\n"
    );
}

#[test]
fn test_misnested_formatting_reports_once() {
    let doc = parse("<!DOCTYPE html><b>1<i>2</b>3</i>");
    let codes: Vec<ErrorKind> = doc.errors.iter().map(|e| e.code).collect();
    assert_eq!(codes, vec![ErrorKind::MisnestedFormattingElement]);
}

#[test]
fn test_formatting_across_block() {
    assert_eq!(
        body_dump("<b>1<p>2</b>3</p>"),
        "| <b>\n\
         |   \"1\"\n\
         | <p>\n\
         |   <b>\n\
         |     \"2\"\n\
         |   \"3\"\n"
    );
}

#[test]
fn test_anchor_split_by_div() {
    assert_eq!(
        body_dump("<a href=1>x<div>y</a>z"),
        "| <a>\n\
         |   href=\"1\"\n\
         |   \"x\"\n\
         | <div>\n\
         |   <a>\n\
         |     href=\"1\"\n\
         |     \"y\"\n\
         |   \"z\"\n"
    );
}

#[test]
fn test_nested_anchor_start_tag() {
    assert_eq!(
        body_dump("<a><p><a>x"),
        "| <a>\n\
         | <p>\n\
         |   <a>\n\
         |   <a>\n\
         |     \"x\"\n"
    );
}

#[test]
fn test_sibling_anchors() {
    assert_eq!(
        body_dump("<a>1<a>2"),
        "| <a>\n\
         |   \"1\"\n\
         | <a>\n\
         |   \"2\"\n"
    );
}

#[test]
fn test_nobr_closes_open_nobr() {
    assert_eq!(
        body_dump("<nobr>1<nobr>2"),
        "| <nobr>\n\
         |   \"1\"\n\
         | <nobr>\n\
         |   \"2\"\n"
    );
}

#[test]
fn test_noahs_ark_limits_reconstruction() {
    assert_eq!(
        body_dump("<p><b><b><b><b><p>x"),
        "| <p>\n\
         |   <b>\n\
         |     <b>\n\
         |       <b>\n\
         |         <b>\n\
         | <p>\n\
         |   <b>\n\
         |     <b>\n\
         |       <b>\n\
         |         \"x\"\n"
    );
}

#[test]
fn test_reconstruction_after_block_close() {
    assert_eq!(
        body_dump("<p><i>a</p>b"),
        "| <p>\n\
         |   <i>\n\
         |     \"a\"\n\
         | <i>\n\
         |   \"b\"\n"
    );
}

#[test]
fn test_end_tag_out_of_scope_is_ignored() {
    assert_eq!(
        body_dump("<b><table><td></b>x</table>"),
        "| <b>\n\
         |   <table>\n\
         |     <tbody>\n\
         |       <tr>\n\
         |         <td>\n\
         |           \"x\"\n"
    );
}

#[test]
fn test_unmatched_formatting_end_tag() {
    let doc = parse("<!DOCTYPE html>a</i>b");
    assert_eq!(
        dump(&doc.tree, doc.tree.body().expect("body")),
        "| \"ab\"\n"
    );
    assert_eq!(doc.errors.len(), 1);
}

#[test]
fn test_deep_misnesting_terminates() {
    let html = format!("{}{}x", "<b><div>".repeat(20), "</b>".repeat(20));
    let doc = parse(&html);
    assert!(doc.tree.len() > 40);
}
