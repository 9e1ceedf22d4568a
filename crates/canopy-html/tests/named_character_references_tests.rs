//! Integration tests for named character reference lookup.

use canopy_html::tokenizer::named_character_references::{any_entity_has_prefix, lookup_entity};

#[test]
fn test_lookup_common_entities() {
    assert_eq!(lookup_entity("amp;"), Some("&"));
    assert_eq!(lookup_entity("lt;"), Some("<"));
    assert_eq!(lookup_entity("gt;"), Some(">"));
    assert_eq!(lookup_entity("quot;"), Some("\""));
    assert_eq!(lookup_entity("nbsp;"), Some("\u{00A0}"));
    assert_eq!(lookup_entity("rarr;"), Some("\u{2192}"));
}

#[test]
fn test_legacy_entities_match_without_semicolon() {
    assert_eq!(lookup_entity("amp"), Some("&"));
    assert_eq!(lookup_entity("AMP"), Some("&"));
    assert_eq!(lookup_entity("copy"), Some("\u{00A9}"));
    assert_eq!(lookup_entity("not"), Some("\u{00AC}"));
}

#[test]
fn test_modern_entities_need_semicolon() {
    assert_eq!(lookup_entity("alpha;"), Some("\u{03B1}"));
    assert_eq!(lookup_entity("alpha"), None);
    assert_eq!(lookup_entity("hellip"), None);
}

#[test]
fn test_multi_character_entities() {
    assert_eq!(lookup_entity("fjlig;"), Some("fj"));
    assert_eq!(lookup_entity("nvlt;"), Some("<\u{20D2}"));
}

#[test]
fn test_lookup_unknown_entity() {
    assert_eq!(lookup_entity("notarealentity;"), None);
    assert_eq!(lookup_entity(""), None);
}

#[test]
fn test_prefix_matching() {
    assert!(any_entity_has_prefix("a")); // amp, apos, alpha, etc.
    assert!(any_entity_has_prefix("am")); // amp
    assert!(any_entity_has_prefix("amp")); // amp, amp;
    assert!(any_entity_has_prefix("amp;")); // amp;
    assert!(any_entity_has_prefix("noti")); // notin;
    assert!(!any_entity_has_prefix("ampx"));
    assert!(!any_entity_has_prefix("xyz"));
}
