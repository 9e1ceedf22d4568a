//! Tests for tree mutation: remove_child, insert_before, move_children, and
//! the attribute list's first-wins rule.

use canopy_dom::{AttributesMap, DomTree, ElementData, Namespace, NodeId, NodeType};

/// Helper to create an HTML element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc_element(ElementData::new(
        tag.to_string(),
        Namespace::Html,
        AttributesMap::new(),
    ))
}

/// Parent links and sibling links must agree with every children list.
fn assert_links_consistent(tree: &DomTree, parent: NodeId) {
    let children = tree.children(parent);
    for (i, &child) in children.iter().enumerate() {
        assert_eq!(tree.parent(child), Some(parent));
        let expected_prev = i.checked_sub(1).map(|p| children[p]);
        let expected_next = children.get(i + 1).copied();
        assert_eq!(tree.prev_sibling(child), expected_prev);
        assert_eq!(tree.next_sibling(child), expected_next);
    }
}

// ========== remove_child ==========

#[test]
fn test_remove_child_single_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child);

    assert!(tree.remove_child(parent, child));

    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
}

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    assert!(tree.remove_child(parent, b));

    assert_eq!(tree.children(parent), &[a, c]);
    assert_links_consistent(&tree, parent);
}

#[test]
fn test_remove_child_not_a_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    let stranger = alloc_element(&mut tree, "span");

    assert!(!tree.remove_child(parent, stranger));
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    let b = alloc_element(&mut tree, "b");
    tree.append_child(parent, b);

    let a = alloc_element(&mut tree, "a");
    tree.insert_before(parent, a, b);

    assert_eq!(tree.children(parent), &[a, b]);
    assert_links_consistent(&tree, parent);
}

#[test]
fn test_insert_before_middle() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    let a = alloc_element(&mut tree, "a");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, c);

    let b = alloc_element(&mut tree, "b");
    tree.insert_before(parent, b, c);

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_links_consistent(&tree, parent);
}

#[test]
fn test_insert_before_moves_attached_node() {
    let mut tree = DomTree::new();
    let left = alloc_element(&mut tree, "div");
    let right = alloc_element(&mut tree, "section");
    let moving = alloc_element(&mut tree, "p");
    let anchor = alloc_element(&mut tree, "hr");
    tree.append_child(left, moving);
    tree.append_child(right, anchor);

    tree.insert_before(right, moving, anchor);

    assert!(tree.children(left).is_empty());
    assert_eq!(tree.children(right), &[moving, anchor]);
    assert_links_consistent(&tree, right);
}

// ========== move_children ==========

#[test]
fn test_move_children_appends_to_existing() {
    let mut tree = DomTree::new();
    let from = alloc_element(&mut tree, "b");
    let to = alloc_element(&mut tree, "i");
    let existing = alloc_element(&mut tree, "span");
    tree.append_child(to, existing);

    let x = tree.alloc(NodeType::Text("x".to_string()));
    let y = alloc_element(&mut tree, "em");
    tree.append_child(from, x);
    tree.append_child(from, y);

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert_eq!(tree.children(to), &[existing, x, y]);
    assert_links_consistent(&tree, to);
}

#[test]
fn test_move_children_empty_source() {
    let mut tree = DomTree::new();
    let from = alloc_element(&mut tree, "b");
    let to = alloc_element(&mut tree, "i");

    tree.move_children(from, to);

    assert!(tree.children(to).is_empty());
}

// ========== templates and traversal ==========

#[test]
fn test_template_gets_contents_fragment() {
    let mut tree = DomTree::new();
    let template = alloc_element(&mut tree, "template");
    let contents = tree.template_contents(template).expect("template contents");

    assert!(matches!(
        tree.get(contents).map(|n| &n.node_type),
        Some(NodeType::DocumentFragment)
    ));
    assert_eq!(tree.parent(contents), None);
}

#[test]
fn test_descendants_skip_template_contents() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let template = alloc_element(&mut tree, "template");
    tree.append_child(html, template);
    let contents = tree.template_contents(template).expect("template contents");
    let hidden = alloc_element(&mut tree, "p");
    tree.append_child(contents, hidden);

    let all: Vec<NodeId> = tree.descendants(NodeId::ROOT).collect();
    assert_eq!(all, vec![html, template]);
}

#[test]
fn test_text_content_concatenates_in_order() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    let b = alloc_element(&mut tree, "b");
    let one = tree.alloc(NodeType::Text("1".to_string()));
    let two = tree.alloc(NodeType::Text("2".to_string()));
    let three = tree.alloc(NodeType::Text("3".to_string()));
    tree.append_child(div, one);
    tree.append_child(div, b);
    tree.append_child(b, two);
    tree.append_child(div, three);

    assert_eq!(tree.text_content(div), "123");
}

// ========== attributes ==========

#[test]
fn test_attributes_first_occurrence_wins() {
    let attrs: AttributesMap = [
        ("id".to_string(), "first".to_string()),
        ("class".to_string(), "a".to_string()),
        ("id".to_string(), "second".to_string()),
    ]
    .into_iter()
    .collect();

    assert_eq!(attrs.len(), 2);
    assert_eq!(attrs.get("id"), Some("first"));
    let names: Vec<&str> = attrs.iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["id", "class"]);
}
