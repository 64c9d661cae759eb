//! Tests for the arena tree mutation and traversal primitives the parser
//! relies on: append (with re-parenting), insert_before, remove_child,
//! move_children, template contents and document accessors.

use wattle_dom::{Attribute, DomTree, Namespace, NodeId, NodeType, QuirksMode};

fn element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc_element(tag, Namespace::Html, Vec::new())
}

/// A parent `div` under the document with children `tags`.
fn div_with(tree: &mut DomTree, tags: &[&str]) -> (NodeId, Vec<NodeId>) {
    let parent = element(tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let children = tags
        .iter()
        .map(|tag| {
            let child = element(tree, tag);
            tree.append_child(parent, child);
            child
        })
        .collect();
    (parent, children)
}

fn assert_links_consistent(tree: &DomTree, parent: NodeId) {
    let children = tree.children(parent);
    for (i, &child) in children.iter().enumerate() {
        assert_eq!(tree.parent(child), Some(parent));
        let prev = i.checked_sub(1).map(|p| children[p]);
        let next = children.get(i + 1).copied();
        assert_eq!(tree.prev_sibling(child), prev, "prev of child {i}");
        assert_eq!(tree.next_sibling(child), next, "next of child {i}");
    }
}

// ========== append_child ==========

#[test]
fn test_append_child_links_siblings() {
    let mut tree = DomTree::new();
    let (parent, kids) = div_with(&mut tree, &["a", "b", "c"]);
    assert_eq!(tree.children(parent), kids.as_slice());
    assert_links_consistent(&tree, parent);
}

#[test]
fn test_append_child_moves_attached_node() {
    let mut tree = DomTree::new();
    let (first, kids) = div_with(&mut tree, &["a", "b"]);
    let second = element(&mut tree, "section");
    tree.append_child(NodeId::ROOT, second);

    tree.append_child(second, kids[0]);

    assert_eq!(tree.children(first), &[kids[1]]);
    assert_eq!(tree.children(second), &[kids[0]]);
    assert_links_consistent(&tree, first);
    assert_links_consistent(&tree, second);
}

// ========== remove_child ==========

#[test]
fn test_remove_child_only_child() {
    let mut tree = DomTree::new();
    let (parent, kids) = div_with(&mut tree, &["p"]);

    tree.remove_child(parent, kids[0]);

    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.parent(kids[0]), None);
    assert_eq!(tree.prev_sibling(kids[0]), None);
    assert_eq!(tree.next_sibling(kids[0]), None);
}

#[test]
fn test_remove_child_each_position() {
    for victim in 0..3 {
        let mut tree = DomTree::new();
        let (parent, kids) = div_with(&mut tree, &["a", "b", "c"]);

        tree.remove_child(parent, kids[victim]);

        let expected: Vec<NodeId> = kids
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != victim)
            .map(|(_, &k)| k)
            .collect();
        assert_eq!(tree.children(parent), expected.as_slice());
        assert_links_consistent(&tree, parent);
    }
}

#[test]
fn test_remove_child_of_wrong_parent_is_noop() {
    let mut tree = DomTree::new();
    let (parent, kids) = div_with(&mut tree, &["a"]);
    let stranger = element(&mut tree, "span");

    tree.remove_child(stranger, kids[0]);

    assert_eq!(tree.children(parent), &[kids[0]]);
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first_child() {
    let mut tree = DomTree::new();
    let (parent, kids) = div_with(&mut tree, &["b"]);
    let new_child = element(&mut tree, "a");

    tree.insert_before(parent, new_child, kids[0]);

    assert_eq!(tree.children(parent), &[new_child, kids[0]]);
    assert_links_consistent(&tree, parent);
}

#[test]
fn test_insert_before_middle() {
    let mut tree = DomTree::new();
    let (parent, kids) = div_with(&mut tree, &["a", "c"]);
    let b = element(&mut tree, "b");

    tree.insert_before(parent, b, kids[1]);

    assert_eq!(tree.children(parent), &[kids[0], b, kids[1]]);
    assert_links_consistent(&tree, parent);
}

#[test]
fn test_insert_before_missing_reference_appends() {
    let mut tree = DomTree::new();
    let (parent, kids) = div_with(&mut tree, &["a"]);
    let orphan = element(&mut tree, "x");
    let new_child = element(&mut tree, "b");

    tree.insert_before(parent, new_child, orphan);

    assert_eq!(tree.children(parent), &[kids[0], new_child]);
}

// ========== move_children ==========

#[test]
fn test_move_children_appends_after_existing() {
    let mut tree = DomTree::new();
    let (from, moved) = div_with(&mut tree, &["y", "z"]);
    let (to, existing) = div_with(&mut tree, &["x"]);

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert_eq!(tree.children(to), &[existing[0], moved[0], moved[1]]);
    assert_links_consistent(&tree, to);
}

#[test]
fn test_move_children_empty_source() {
    let mut tree = DomTree::new();
    let (from, _) = div_with(&mut tree, &[]);
    let (to, _) = div_with(&mut tree, &[]);

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert!(tree.children(to).is_empty());
}

// ========== elements and documents ==========

#[test]
fn test_template_gets_contents_fragment() {
    let mut tree = DomTree::new();
    let template = element(&mut tree, "template");
    let svg_template = tree.alloc_element("template", Namespace::Svg, Vec::new());

    let contents = tree
        .as_element(template)
        .and_then(|e| e.template_contents)
        .expect("html template has contents");
    assert!(matches!(
        tree.get(contents).map(|n| &n.node_type),
        Some(NodeType::DocumentFragment)
    ));
    assert!(tree.as_element(svg_template).unwrap().template_contents.is_none());
}

#[test]
fn test_attribute_lookup_and_classes() {
    let mut tree = DomTree::new();
    let mut xlink = Attribute::new("href".into(), "#a".into());
    xlink.namespace = Some(Namespace::XLink);
    xlink.prefix = Some("xlink".into());
    let attrs = vec![
        Attribute::new("id".into(), "main".into()),
        Attribute::new("class".into(), "one  two\tthree".into()),
        xlink,
    ];
    let div = tree.alloc_element("div", Namespace::Html, attrs);
    let data = tree.as_element(div).unwrap();

    assert_eq!(data.id(), Some("main"));
    assert_eq!(data.classes().len(), 3);
    assert!(data.classes().contains("two"));
    // Namespaced attributes are not found by plain name.
    assert_eq!(data.get_attribute("href"), None);
    assert_eq!(data.attrs[2].qualified_name(), "xlink:href");
}

#[test]
fn test_document_accessors_and_text_content() {
    let mut tree = DomTree::new();
    let html = element(&mut tree, "html");
    let head = element(&mut tree, "head");
    let body = element(&mut tree, "body");
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, head);
    tree.append_child(html, body);
    let p = element(&mut tree, "p");
    tree.append_child(body, p);
    let hello = tree.alloc(NodeType::Text("Hello ".into()));
    let world = tree.alloc(NodeType::Text("world".into()));
    tree.append_child(p, hello);
    tree.append_child(body, world);

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.head(), Some(head));
    assert_eq!(tree.body(), Some(body));
    assert_eq!(tree.text_content(body), "Hello world");
    assert_eq!(tree.get_elements_by_tag_name(NodeId::ROOT, "p"), vec![p]);
    assert!(tree.is_descendant_of(hello, html));
    assert!(!tree.is_descendant_of(html, hello));

    let order: Vec<NodeId> = tree.descendants(html).collect();
    assert_eq!(order, vec![head, body, p, hello, world]);
}

#[test]
fn test_quirks_mode_roundtrip_and_display() {
    let mut tree = DomTree::new();
    assert_eq!(tree.quirks_mode(), QuirksMode::NoQuirks);
    tree.set_quirks_mode(QuirksMode::LimitedQuirks);
    assert_eq!(tree.quirks_mode().to_string(), "limited-quirks");
}
