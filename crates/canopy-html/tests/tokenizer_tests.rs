//! Integration tests for the HTML tokenizer.

use canopy_html::tokenizer::tokenize;
use canopy_html::{ErrorKind, HTMLTokenizer, Token, TokenizerState};
use canopy_html::tokenizer::TokenizerConfig;
use pretty_assertions::assert_eq;

/// Tokenize `input` starting in `state`, as if `last_start_tag` had just
/// been emitted.
fn tokenize_in(state: TokenizerState, last_start_tag: &str, input: &str) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new(TokenizerConfig {
        initial_state: state,
        last_start_tag: Some(last_start_tag.to_string()),
    });
    tokenizer.feed(input);
    tokenizer.end();
    drain(&mut tokenizer)
}

fn drain(tokenizer: &mut HTMLTokenizer) -> Vec<Token> {
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next_token() {
        tokens.push(token);
    }
    tokens
}

/// The character tokens of `tokens`, as a string.
fn text_of(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::Character { data } => Some(*data),
            _ => None,
        })
        .collect()
}

fn error_codes(input: &str) -> Vec<ErrorKind> {
    let mut tokenizer = HTMLTokenizer::new(TokenizerConfig::default());
    tokenizer.feed(input);
    tokenizer.end();
    let _ = drain(&mut tokenizer);
    tokenizer.take_errors().into_iter().map(|e| e.code).collect()
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + EOF
    assert!(matches!(tokens[0], Token::Character { data: 'H' }));
    assert!(matches!(tokens[4], Token::Character { data: 'o' }));
    assert!(matches!(tokens[5], Token::EndOfFile));
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::Doctype {
            name, force_quirks, ..
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert!(!force_quirks);
        }
        other => panic!("Expected DOCTYPE token, got {other}"),
    }
}

#[test]
fn test_doctype_with_identifiers() {
    let tokens = tokenize(
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
    );
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert_eq!(public_identifier.as_deref(), Some("-//W3C//DTD HTML 4.01//EN"));
            assert_eq!(
                system_identifier.as_deref(),
                Some("http://www.w3.org/TR/html4/strict.dtd")
            );
            assert!(!force_quirks);
        }
        other => panic!("Expected DOCTYPE token, got {other}"),
    }
}

#[test]
fn test_doctype_without_name_forces_quirks() {
    let tokens = tokenize("<!DOCTYPE>");
    assert!(matches!(
        &tokens[0],
        Token::Doctype {
            name: None,
            force_quirks: true,
            ..
        }
    ));
}

#[test]
fn test_start_tag() {
    let tokens = tokenize("<div>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "div");
            assert!(!self_closing);
            assert!(attributes.is_empty());
        }
        other => panic!("Expected StartTag token, got {other}"),
    }
}

#[test]
fn test_tag_names_are_lowercased() {
    let tokens = tokenize("<DiV CLASS=x></DIV>");
    assert!(matches!(&tokens[0], Token::StartTag { name, .. } if name == "div"));
    assert_eq!(tokens[0].attribute("class"), Some("x"));
    assert!(matches!(&tokens[1], Token::EndTag { name } if name == "div"));
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert!(matches!(
        &tokens[0],
        Token::StartTag { name, self_closing: true, .. } if name == "br"
    ));
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hello -->");
    assert_eq!(tokens.len(), 2);
    assert!(matches!(&tokens[0], Token::Comment { data } if data == " hello "));
}

#[test]
fn test_bogus_comment_from_processing_instruction() {
    let tokens = tokenize("<?xml version?>");
    assert!(matches!(&tokens[0], Token::Comment { data } if data == "?xml version?"));
    assert_eq!(
        error_codes("<?xml version?>"),
        vec![ErrorKind::UnexpectedQuestionMarkInsteadOfTagName]
    );
}

#[test]
fn test_attribute_quoting_styles() {
    let tokens = tokenize(r#"<div a="1" b='2' c=3 d>"#);
    let Token::StartTag { attributes, .. } = &tokens[0] else {
        panic!("Expected StartTag token");
    };
    let pairs: Vec<(&str, &str)> = attributes
        .iter()
        .map(|a| (a.name.as_str(), a.value.as_str()))
        .collect();
    assert_eq!(pairs, vec![("a", "1"), ("b", "2"), ("c", "3"), ("d", "")]);
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let tokens = tokenize(r#"<div id="a" id="b">"#);
    let Token::StartTag { attributes, .. } = &tokens[0] else {
        panic!("Expected StartTag token");
    };
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes[0].value, "a");
    assert_eq!(
        error_codes(r#"<div id="a" id="b">"#),
        vec![ErrorKind::DuplicateAttribute]
    );
}

#[test]
fn test_tag_with_text_content() {
    let tokens = tokenize("<p>Hi</p>");
    assert_eq!(tokens.len(), 5); // <p>, H, i, </p>, EOF
    assert!(matches!(&tokens[0], Token::StartTag { name, .. } if name == "p"));
    assert!(matches!(tokens[1], Token::Character { data: 'H' }));
    assert!(matches!(tokens[2], Token::Character { data: 'i' }));
    assert!(matches!(&tokens[3], Token::EndTag { name } if name == "p"));
    assert!(matches!(tokens[4], Token::EndOfFile));
}

#[test]
fn test_newlines_are_normalized() {
    let tokens = tokenize("a\r\nb\rc");
    assert_eq!(text_of(&tokens), "a\nb\nc");
}

// ========== Text states ==========

#[test]
fn test_rawtext_ignores_markup() {
    let tokens = tokenize_in(
        TokenizerState::RAWTEXT,
        "style",
        "<div>not a tag</div></style>",
    );
    assert_eq!(text_of(&tokens), "<div>not a tag</div>");
    assert!(matches!(&tokens[tokens.len() - 2], Token::EndTag { name } if name == "style"));
}

#[test]
fn test_rawtext_needs_appropriate_end_tag() {
    let tokens = tokenize_in(TokenizerState::RAWTEXT, "style", "a</notastyle>b</style>");
    assert_eq!(text_of(&tokens), "a</notastyle>b");
}

#[test]
fn test_rcdata_decodes_character_references() {
    let tokens = tokenize_in(TokenizerState::RCDATA, "title", "a &lt; b &amp; <i>c</title>");
    assert_eq!(text_of(&tokens), "a < b & <i>c");
}

#[test]
fn test_script_data_escaped_comment() {
    let tokens = tokenize_in(
        TokenizerState::ScriptData,
        "script",
        "<!--<script>x</script>-->y</script>",
    );
    // Inside the double-escaped section "</script>" does not close the
    // element; the next one does.
    assert_eq!(text_of(&tokens), "<!--<script>x</script>-->y");
    assert!(matches!(&tokens[tokens.len() - 2], Token::EndTag { name } if name == "script"));
}

#[test]
fn test_plaintext_never_ends() {
    let tokens = tokenize_in(TokenizerState::PLAINTEXT, "plaintext", "</plaintext><b>");
    assert_eq!(text_of(&tokens), "</plaintext><b>");
}

#[test]
fn test_cdata_only_when_allowed() {
    let tokens = tokenize("<![CDATA[x]]>");
    assert!(matches!(&tokens[0], Token::Comment { data } if data == "[CDATA[x]]"));

    let mut tokenizer = HTMLTokenizer::new(TokenizerConfig::default());
    tokenizer.set_cdata_allowed(true);
    tokenizer.feed("<![CDATA[<b>]]>");
    tokenizer.end();
    let tokens = drain(&mut tokenizer);
    assert_eq!(text_of(&tokens), "<b>");
}

// ========== Character references ==========

#[test]
fn test_character_reference_bare_ampersand() {
    let tokens = tokenize("a & b");
    assert_eq!(text_of(&tokens), "a & b");
    assert!(error_codes("a & b").is_empty());
}

#[test]
fn test_named_character_references() {
    assert_eq!(text_of(&tokenize("&lt;&gt;&amp;&quot;")), "<>&\"");
    assert_eq!(text_of(&tokenize("&copy; &hellip;")), "\u{A9} \u{2026}");
}

#[test]
fn test_legacy_reference_without_semicolon() {
    assert_eq!(text_of(&tokenize("&copy 2024")), "\u{A9} 2024");
    assert_eq!(
        error_codes("&copy 2024"),
        vec![ErrorKind::MissingSemicolonAfterCharacterReference]
    );
}

#[test]
fn test_longest_match_wins() {
    // "&notin;" is a reference of its own, "&noti" is "&not" followed by "i".
    assert_eq!(text_of(&tokenize("&notin;")), "\u{2209}");
    assert_eq!(text_of(&tokenize("&noti")), "\u{AC}i");
}

#[test]
fn test_legacy_reference_in_attribute_is_literal() {
    let tokens = tokenize(r#"<a href="?a=1&copy=2">"#);
    assert_eq!(tokens[0].attribute("href"), Some("?a=1&copy=2"));
}

#[test]
fn test_numeric_character_references() {
    assert_eq!(text_of(&tokenize("&#65;&#x42;&#X43;")), "ABC");
}

#[test]
fn test_numeric_reference_replacements() {
    // Windows-1252 remapping, null and out-of-range code points.
    assert_eq!(text_of(&tokenize("&#x80;")), "\u{20AC}");
    assert_eq!(text_of(&tokenize("&#0;")), "\u{FFFD}");
    assert_eq!(text_of(&tokenize("&#x110000;")), "\u{FFFD}");
    assert_eq!(error_codes("&#0;"), vec![ErrorKind::NullCharacterReference]);
}

#[test]
fn test_unknown_named_reference_is_literal() {
    assert_eq!(text_of(&tokenize("&zzzz;")), "&zzzz;");
    assert_eq!(
        error_codes("&zzzz;"),
        vec![ErrorKind::UnknownNamedCharacterReference]
    );
}

// ========== Errors ==========

#[test]
fn test_error_codes() {
    assert_eq!(error_codes("</>"), vec![ErrorKind::MissingEndTagName]);
    assert_eq!(
        error_codes("<div =x>"),
        vec![ErrorKind::UnexpectedEqualsSignBeforeAttributeName]
    );
    assert_eq!(error_codes("<!-- x"), vec![ErrorKind::EofInComment]);
    assert_eq!(error_codes("<div"), vec![ErrorKind::EofInTag]);
}

#[test]
fn test_error_positions() {
    let mut tokenizer = HTMLTokenizer::new(TokenizerConfig::default());
    tokenizer.feed("ok\n</>");
    tokenizer.end();
    let _ = drain(&mut tokenizer);
    let errors = tokenizer.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ErrorKind::MissingEndTagName);
    assert_eq!(errors[0].position.line, 2);
}

// ========== Resumability ==========

#[test]
fn test_resumes_inside_tag_name() {
    let mut tokenizer = HTMLTokenizer::new(TokenizerConfig::default());
    tokenizer.feed("<di");
    assert_eq!(tokenizer.next_token(), None);
    tokenizer.feed("v class=a>");
    assert!(matches!(tokenizer.next_token(), Some(Token::StartTag { name, .. }) if name == "div"));
    assert_eq!(tokenizer.next_token(), None);
    tokenizer.end();
    assert_eq!(tokenizer.next_token(), Some(Token::EndOfFile));
    assert_eq!(tokenizer.next_token(), None);
    assert!(tokenizer.is_finished());
}

#[test]
fn test_resumes_inside_character_reference() {
    let mut tokenizer = HTMLTokenizer::new(TokenizerConfig::default());
    tokenizer.feed("&am");
    assert_eq!(tokenizer.next_token(), None);
    tokenizer.feed("p;x");
    tokenizer.end();
    assert_eq!(text_of(&drain(&mut tokenizer)), "&x");
}

#[test]
fn test_crlf_split_across_chunks() {
    let mut tokenizer = HTMLTokenizer::new(TokenizerConfig::default());
    tokenizer.feed("a\r");
    tokenizer.feed("\nb");
    tokenizer.end();
    assert_eq!(text_of(&drain(&mut tokenizer)), "a\nb");
}

#[test]
fn test_stats() {
    let mut tokenizer = HTMLTokenizer::new(TokenizerConfig::default());
    tokenizer.feed("<p>");
    let _ = drain(&mut tokenizer);
    tokenizer.feed("hi");
    tokenizer.end();
    let _ = drain(&mut tokenizer);
    let stats = tokenizer.stats();
    assert_eq!(stats.tokens, 4); // <p>, h, i, EOF
    assert_eq!(stats.characters, 5);
    assert!(stats.suspensions >= 1);
}

#[test]
fn test_set_state_switches_to_rawtext() {
    let mut tokenizer = HTMLTokenizer::new(TokenizerConfig::default());
    tokenizer.feed("<style><b></style>");
    tokenizer.end();
    assert!(matches!(tokenizer.next_token(), Some(Token::StartTag { name, .. }) if name == "style"));
    tokenizer.set_state(TokenizerState::RAWTEXT);
    assert_eq!(tokenizer.state(), TokenizerState::RAWTEXT);
    let rest = drain(&mut tokenizer);
    assert_eq!(text_of(&rest), "<b>");
}
