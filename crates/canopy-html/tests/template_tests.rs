//! Tree construction tests for `template` elements.

use canopy_dom::{NodeId, dump};
use canopy_html::tokenizer::TokenizerConfig;
use canopy_html::{
    Document, HTMLTokenizer, InsertionMode, ParserConfig, TreeBuilder, parse_document,
};
use pretty_assertions::assert_eq;

fn parse(html: &str) -> Document {
    parse_document(html).expect("default limits are never reached by test input")
}

/// Run the tree builder over `html` without signalling end of input, so the
/// parser state can be inspected mid-document.
fn builder_after(html: &str) -> TreeBuilder {
    let mut builder = TreeBuilder::new(ParserConfig::default());
    let mut tokenizer = HTMLTokenizer::new(TokenizerConfig::default());
    tokenizer.feed(html);
    while let Some(token) = tokenizer.next_token() {
        builder
            .process_token(&token)
            .expect("default limits are never reached by test input");
        if let Some(state) = builder.take_tokenizer_state() {
            tokenizer.set_state(state);
        }
    }
    builder
}

#[test]
fn test_template_contents_are_isolated() {
    assert_eq!(
        dump(&parse("<template><p>x</p></template><p>y").tree, NodeId::ROOT),
        "| <html>\n\
         |   <head>\n\
         |     <template>\n\
         |       content\n\
         |         <p>\n\
         |           \"x\"\n\
         |   <body>\n\
         |     <p>\n\
         |       \"y\"\n"
    );
}

#[test]
fn test_template_contents_not_reachable_from_body() {
    let doc = parse("<body><template><b id=inner>x</b></template><b id=outer>y</b>");
    let tree = &doc.tree;
    let body = tree.body().expect("body");

    let ids: Vec<&str> = tree
        .descendants(body)
        .filter_map(|id| tree.as_element(id).and_then(|e| e.id()))
        .collect();
    assert_eq!(ids, vec!["outer"]);
    assert_eq!(tree.text_content(body), "y");

    let template = tree
        .descendants(body)
        .find(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == "template"))
        .expect("template element");
    assert!(tree.children(template).is_empty());
    let contents = tree.template_contents(template).expect("template contents");
    assert_eq!(dump(tree, contents), "| <b>\n|   id=\"inner\"\n|   \"x\"\n");
    assert_eq!(tree.parent(contents), None);
}

#[test]
fn test_table_rows_in_template() {
    assert_eq!(
        dump(
            &parse("<template><tr><td>x</td></tr></template>").tree,
            NodeId::ROOT
        ),
        "| <html>\n\
         |   <head>\n\
         |     <template>\n\
         |       content\n\
         |         <tr>\n\
         |           <td>\n\
         |             \"x\"\n\
         |   <body>\n"
    );
}

#[test]
fn test_template_mode_stack() {
    let builder = builder_after("<template>");
    assert_eq!(builder.context().template_modes, vec![InsertionMode::InTemplate]);
    assert_eq!(builder.insertion_mode(), InsertionMode::InTemplate);

    let builder = builder_after("<template><tr>");
    assert_eq!(builder.context().template_modes, vec![InsertionMode::InTableBody]);
    assert_eq!(builder.insertion_mode(), InsertionMode::InRow);

    let builder = builder_after("<template><tr><td><template>");
    assert_eq!(
        builder.context().template_modes,
        vec![InsertionMode::InTableBody, InsertionMode::InTemplate]
    );

    let builder = builder_after("<template><tr><td><template></template>");
    assert_eq!(builder.context().template_modes, vec![InsertionMode::InTableBody]);
    assert_eq!(builder.insertion_mode(), InsertionMode::InCell);

    let builder = builder_after("<template><tr><td><template></template></td></tr></template>");
    assert!(builder.context().template_modes.is_empty());
    assert_eq!(builder.insertion_mode(), InsertionMode::InHead);
}

#[test]
fn test_template_end_tag_closes_open_elements() {
    assert_eq!(
        dump(
            &parse("<body><template><div><span>a</template>b").tree,
            NodeId::ROOT
        ),
        "| <html>\n\
         |   <head>\n\
         |   <body>\n\
         |     <template>\n\
         |       content\n\
         |         <div>\n\
         |           <span>\n\
         |             \"a\"\n\
         |     \"b\"\n"
    );
}

#[test]
fn test_stray_template_end_tag_is_ignored() {
    let doc = parse("<!DOCTYPE html><body></template>x");
    assert_eq!(
        dump(&doc.tree, doc.tree.body().expect("body")),
        "| \"x\"\n"
    );
    assert_eq!(doc.errors.len(), 1);
}

#[test]
fn test_unclosed_template_at_eof() {
    let doc = parse("<!DOCTYPE html><template><div>");
    assert_eq!(
        dump(&doc.tree, NodeId::ROOT),
        "| <!DOCTYPE html>\n\
         | <html>\n\
         |   <head>\n\
         |     <template>\n\
         |       content\n\
         |         <div>\n\
         |   <body>\n"
    );
    assert!(!doc.errors.is_empty());
}

#[test]
fn test_nested_templates() {
    assert_eq!(
        dump(
            &parse("<template><template><b>x</b></template></template>").tree,
            NodeId::ROOT
        ),
        "| <html>\n\
         |   <head>\n\
         |     <template>\n\
         |       content\n\
         |         <template>\n\
         |           content\n\
         |             <b>\n\
         |               \"x\"\n\
         |   <body>\n"
    );
}

#[test]
fn test_template_in_table_is_not_foster_parented() {
    let doc = parse("<table><template>x</template></table>");
    assert_eq!(
        dump(&doc.tree, doc.tree.body().expect("body")),
        "| <table>\n\
         |   <template>\n\
         |     content\n\
         |       \"x\"\n"
    );
}
