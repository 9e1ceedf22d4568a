//! Tests for the stack of open elements and the list of active formatting
//! elements.

use canopy_dom::{AttributesMap, DomTree, ElementData, Namespace, NodeId};
use canopy_html::parser::{ActiveFormattingElements, FormattingEntry, OpenElementsStack, ScopeKind};
use canopy_html::{Attribute, Token};
use proptest::prelude::*;

const TAGS: &[(&str, Namespace)] = &[
    ("p", Namespace::Html),
    ("li", Namespace::Html),
    ("ul", Namespace::Html),
    ("button", Namespace::Html),
    ("table", Namespace::Html),
    ("td", Namespace::Html),
    ("template", Namespace::Html),
    ("select", Namespace::Html),
    ("option", Namespace::Html),
    ("optgroup", Namespace::Html),
    ("div", Namespace::Html),
    ("svg", Namespace::Svg),
    ("foreignObject", Namespace::Svg),
    ("mi", Namespace::MathMl),
];

const KINDS: &[ScopeKind] = &[
    ScopeKind::Default,
    ScopeKind::ListItem,
    ScopeKind::Button,
    ScopeKind::Table,
    ScopeKind::Select,
];

#[derive(Debug, Clone)]
enum StackOp {
    Push(usize),
    Pop,
}

fn stack_op() -> impl Strategy<Value = StackOp> {
    prop_oneof![
        3 => (0..TAGS.len()).prop_map(StackOp::Push),
        1 => Just(StackOp::Pop),
    ]
}

fn element(tree: &mut DomTree, (tag, namespace): (&str, Namespace)) -> NodeId {
    tree.alloc_element(ElementData::new(
        tag.to_string(),
        namespace,
        AttributesMap::new(),
    ))
}

/// Walk the stack from the current node down, the slow way.
fn expected_in_scope(tree: &DomTree, stack: &[NodeId], tag: &str, kind: ScopeKind) -> bool {
    for &id in stack.iter().rev() {
        let element = tree.as_element(id).expect("only elements are pushed");
        if element.namespace == Namespace::Html && element.tag_name == tag {
            return true;
        }
        if kind.is_boundary(element) {
            return false;
        }
    }
    false
}

fn start_tag(name: &str, attrs: &[(&str, &str)]) -> Token {
    Token::start_tag(
        name,
        attrs
            .iter()
            .map(|(n, v)| Attribute::new((*n).to_string(), (*v).to_string()))
            .collect(),
    )
}

fn entries_named(list: &ActiveFormattingElements, token: &Token) -> usize {
    list.entries()
        .iter()
        .rev()
        .take_while(|entry| **entry != FormattingEntry::Marker)
        .filter(|entry| matches!(entry, FormattingEntry::Element { token: t, .. } if t == token))
        .count()
}

#[test]
fn test_scope_boundaries() {
    let mut tree = DomTree::new();
    let mut stack = OpenElementsStack::new();
    for tag in ["html", "body", "ul", "li", "div"] {
        stack.push(element(&mut tree, (tag, Namespace::Html)));
    }
    assert!(stack.has_in_scope(&tree, "li", ScopeKind::Default));
    assert!(stack.has_in_scope(&tree, "li", ScopeKind::ListItem));
    assert!(!stack.has_in_scope(&tree, "body", ScopeKind::ListItem));
    assert!(stack.has_in_scope(&tree, "body", ScopeKind::Default));
    assert!(!stack.has_in_scope(&tree, "li", ScopeKind::Select));
    assert!(stack.has_in_scope(&tree, "div", ScopeKind::Select));
}

#[test]
fn test_foreign_integration_point_bounds_scope() {
    let mut tree = DomTree::new();
    let mut stack = OpenElementsStack::new();
    stack.push(element(&mut tree, ("html", Namespace::Html)));
    stack.push(element(&mut tree, ("p", Namespace::Html)));
    stack.push(element(&mut tree, ("svg", Namespace::Svg)));
    assert!(stack.has_in_scope(&tree, "p", ScopeKind::Button));
    stack.push(element(&mut tree, ("foreignObject", Namespace::Svg)));
    assert!(!stack.has_in_scope(&tree, "p", ScopeKind::Button));
    assert!(stack.has_in_scope(&tree, "p", ScopeKind::Table));
}

#[test]
fn test_generate_implied_end_tags() {
    let mut tree = DomTree::new();
    let mut stack = OpenElementsStack::new();
    for tag in ["html", "body", "ul", "li", "p"] {
        stack.push(element(&mut tree, (tag, Namespace::Html)));
    }
    stack.generate_implied_end_tags(&tree, Some("li"));
    assert_eq!(stack.len(), 4);
    stack.generate_implied_end_tags(&tree, None);
    assert_eq!(stack.len(), 3);
}

#[test]
fn test_clear_back_to_table_context() {
    let mut tree = DomTree::new();
    let mut stack = OpenElementsStack::new();
    for tag in ["html", "body", "table", "tbody", "tr"] {
        stack.push(element(&mut tree, (tag, Namespace::Html)));
    }
    stack.clear_back_to(&tree, &["table", "template", "html"]);
    assert_eq!(stack.len(), 3);
    assert!(stack.contains_tag(&tree, "table"));
    assert!(!stack.contains_tag(&tree, "tbody"));
}

#[test]
fn test_noahs_ark_keeps_three() {
    let mut tree = DomTree::new();
    let mut list = ActiveFormattingElements::new();
    let token = start_tag("b", &[("class", "x")]);
    let mut nodes = Vec::new();
    for _ in 0..5 {
        let node = element(&mut tree, ("b", Namespace::Html));
        nodes.push(node);
        list.push(node, token.clone());
    }
    assert_eq!(list.len(), 3);
    assert!(!list.contains(nodes[0]));
    assert!(!list.contains(nodes[1]));
    assert!(list.contains(nodes[4]));
}

#[test]
fn test_noahs_ark_ignores_attribute_order_but_not_values() {
    let mut tree = DomTree::new();
    let mut list = ActiveFormattingElements::new();
    for attrs in [
        &[("a", "1"), ("b", "2")][..],
        &[("b", "2"), ("a", "1")][..],
        &[("a", "1"), ("b", "2")][..],
        &[("a", "1"), ("b", "3")][..],
    ] {
        let node = element(&mut tree, ("b", Namespace::Html));
        list.push(node, start_tag("b", attrs));
    }
    assert_eq!(list.len(), 4);

    let node = element(&mut tree, ("b", Namespace::Html));
    list.push(node, start_tag("b", &[("b", "2"), ("a", "1")]));
    assert_eq!(list.len(), 4);
}

#[test]
fn test_markers_bound_noahs_ark() {
    let mut tree = DomTree::new();
    let mut list = ActiveFormattingElements::new();
    let token = start_tag("i", &[]);
    for _ in 0..3 {
        let node = element(&mut tree, ("i", Namespace::Html));
        list.push(node, token.clone());
    }
    list.insert_marker();
    for _ in 0..3 {
        let node = element(&mut tree, ("i", Namespace::Html));
        list.push(node, token.clone());
    }
    assert_eq!(list.len(), 7);
    assert!(list.last_named_after_marker("i").is_some());

    list.clear_to_last_marker();
    assert_eq!(list.len(), 3);
    assert!(list.entries().iter().all(|e| *e != FormattingEntry::Marker));
}

proptest! {
    #[test]
    fn scope_search_matches_linear_walk(ops in prop::collection::vec(stack_op(), 0..40)) {
        let mut tree = DomTree::new();
        let mut stack = OpenElementsStack::new();
        for op in ops {
            match op {
                StackOp::Push(index) => stack.push(element(&mut tree, TAGS[index])),
                StackOp::Pop => {
                    let _ = stack.pop();
                }
            }
            for &(tag, _) in TAGS {
                for &kind in KINDS {
                    prop_assert_eq!(
                        stack.has_in_scope(&tree, tag, kind),
                        expected_in_scope(&tree, stack.as_slice(), tag, kind)
                    );
                }
                // Narrower scopes only add boundaries.
                if stack.has_in_scope(&tree, tag, ScopeKind::ListItem)
                    || stack.has_in_scope(&tree, tag, ScopeKind::Button)
                {
                    prop_assert!(stack.has_in_scope(&tree, tag, ScopeKind::Default));
                }
            }
        }
    }

    #[test]
    fn noahs_ark_bound_holds(
        ops in prop::collection::vec((0..4usize, 0..3usize), 0..60)
    ) {
        let mut tree = DomTree::new();
        let mut list = ActiveFormattingElements::new();
        let tokens = [
            start_tag("b", &[]),
            start_tag("b", &[("id", "x")]),
            start_tag("i", &[]),
        ];
        for (action, kind) in ops {
            if action == 0 {
                list.insert_marker();
            } else {
                let node = element(&mut tree, ("b", Namespace::Html));
                list.push(node, tokens[kind].clone());
            }
            for token in &tokens {
                prop_assert!(entries_named(&list, token) <= 3);
            }
        }
    }
}
