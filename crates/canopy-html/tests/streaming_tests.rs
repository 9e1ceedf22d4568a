//! Incremental parsing: chunked input must build the same tree as one call.

use canopy_dom::{NodeId, dump};
use canopy_html::{
    Document, ErrorKind, ParseError, ParseLimits, Parser, ParserConfig, Resource,
    parse_document, parse_document_chunks, parse_document_with,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const SAMPLE: &str = "<!DOCTYPE html>\r\n<html><head><title>A &amp; B</title>\
    <script>if (a<b) { x = '</scr' + 'ipt>'; }</script></head>\r\n\
    <body class=\"main\" data-x='1'><!-- note --><p>caf&eacute; &notin; &#x41;&#65;\
    <table><tr><td>cell<b>bold</td></tr>stray</table>\
    <svg viewbox=\"0 0 1 1\"><![CDATA[raw]]><foreignObject><i>x</i></foreignObject></svg>\
    <textarea>\nkeep</textarea><pre>\n\nline</pre></body></html>";

const PIECES: &[&str] = &[
    "<p>", "</p>", "<b>", "</b>", "<i>", "</i>", "<table>", "<tr>", "<td>", "</table>",
    "text", " ", "\r\n", "&amp;", "&notin;", "&noti", "&#x263A;", "<!-- c -->", "<br/>",
    "<svg>", "</svg>", "<![CDATA[x]]>", "<template>", "</template>", "<select>",
    "<option>", "<title>", "</title>", "<script>", "</script>", "<a href=x>", "</a>",
    "<div id='d'>", "</div>", "<pre>", "\n", "<textarea>", "</textarea>", "<math><mi>",
];

fn parse(html: &str) -> Document {
    parse_document(html).expect("default limits are never reached by test input")
}

/// Everything chunking could change: the tree and the error codes.
fn summary(doc: &Document) -> (String, Vec<ErrorKind>) {
    (
        dump(&doc.tree, NodeId::ROOT),
        doc.errors.iter().map(|e| e.code).collect(),
    )
}

fn split_at_chars(input: &str, splits: &[usize]) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut points: Vec<usize> = splits.iter().map(|&s| s % (chars.len() + 1)).collect();
    points.sort_unstable();
    points.dedup();

    let mut chunks = Vec::new();
    let mut start = 0;
    for point in points {
        chunks.push(chars[start..point].iter().collect());
        start = point;
    }
    chunks.push(chars[start..].iter().collect());
    chunks
}

#[test]
fn test_every_split_point_matches_whole_parse() {
    let expected = summary(&parse(SAMPLE));
    let chars: Vec<char> = SAMPLE.chars().collect();
    for split in 0..=chars.len() {
        let head: String = chars[..split].iter().collect();
        let tail: String = chars[split..].iter().collect();
        let doc = parse_document_chunks([head, tail]).expect("parses");
        assert_eq!(summary(&doc), expected, "split at {split}");
    }
}

#[test]
fn test_one_character_chunks() {
    let expected = summary(&parse(SAMPLE));
    let doc = parse_document_chunks(SAMPLE.chars().map(String::from)).expect("parses");
    assert_eq!(summary(&doc), expected);
}

#[test]
fn test_tree_grows_while_feeding() {
    let mut parser = Parser::new(ParserConfig::default());
    parser.feed("<!DOCTYPE html><p>one").expect("parses");
    let body = parser.tree().body().expect("body exists mid-parse");
    assert_eq!(parser.tree().text_content(body), "one");

    parser.feed("</p><p>two").expect("parses");
    let doc = parser.finish().expect("parses");
    let body = doc.tree.body().expect("body");
    assert_eq!(
        dump(&doc.tree, body),
        "| <p>\n|   \"one\"\n| <p>\n|   \"two\"\n"
    );
}

#[test]
fn test_empty_chunks_are_harmless() {
    let doc = parse_document_chunks(["", "<p>", "", "x", ""]).expect("parses");
    assert_eq!(summary(&doc), summary(&parse("<p>x")));
}

#[test]
fn test_nesting_depth_limit() {
    let config = ParserConfig {
        limits: ParseLimits {
            max_nesting_depth: 16,
            ..ParseLimits::default()
        },
        ..ParserConfig::default()
    };
    let html = "<div>".repeat(32);
    let error = parse_document_with(&html, config).expect_err("too deep");
    assert!(matches!(
        error,
        ParseError::ResourceExhausted {
            resource: Resource::NestingDepth,
            limit: 16,
            ..
        }
    ));

    let shallow = "<div>".repeat(8);
    assert!(parse_document_with(&shallow, config).is_ok());
}

#[test]
fn test_token_limit() {
    let config = ParserConfig {
        limits: ParseLimits {
            max_tokens: 10,
            ..ParseLimits::default()
        },
        ..ParserConfig::default()
    };
    let error = parse_document_with(&"x".repeat(20), config).expect_err("too many tokens");
    assert!(matches!(
        error,
        ParseError::ResourceExhausted {
            resource: Resource::TokenCount,
            limit: 10,
            ..
        }
    ));
}

#[test]
fn test_reprocess_limit() {
    let config = ParserConfig {
        limits: ParseLimits {
            max_reprocess: 1,
            ..ParseLimits::default()
        },
        ..ParserConfig::default()
    };
    // The first text token walks initial, before html, before head, in head
    // and after head before it lands in body.
    let error = parse_document_with("x", config).expect_err("reprocessed too often");
    assert!(matches!(
        error,
        ParseError::ResourceExhausted {
            resource: Resource::Reprocessing,
            limit: 1,
            ..
        }
    ));
}

#[test]
fn test_failed_parser_stays_failed() {
    let config = ParserConfig {
        limits: ParseLimits {
            max_tokens: 2,
            ..ParseLimits::default()
        },
        ..ParserConfig::default()
    };
    let mut parser = Parser::new(config);
    assert!(parser.feed("abc").is_err());
    assert!(parser.feed("").is_err());
    assert!(parser.finish().is_err());
}

#[test]
fn test_deep_nesting_within_default_limit() {
    let html = "<div>".repeat(400);
    let doc = parse(&html);
    let tree = &doc.tree;
    let deepest = tree
        .descendants(NodeId::ROOT)
        .map(|id| tree.ancestors(id).count())
        .max();
    // html, body and 400 divs above the document root.
    assert_eq!(deepest, Some(402));
}

proptest! {
    #[test]
    fn chunking_never_changes_the_tree(
        pieces in prop::collection::vec(0..PIECES.len(), 1..40),
        splits in prop::collection::vec(any::<usize>(), 0..8),
    ) {
        let input: String = pieces.iter().map(|&i| PIECES[i]).collect();
        let whole = summary(&parse(&input));
        let chunked = parse_document_chunks(split_at_chars(&input, &splits)).expect("parses");
        prop_assert_eq!(summary(&chunked), whole);
    }

    #[test]
    fn arbitrary_input_never_fails(input in "[<>/a-z=\"' &;#!\\-\r\n]{0,200}") {
        let doc = parse(&input);
        prop_assert!(doc.tree.document_element().is_some());
    }
}
