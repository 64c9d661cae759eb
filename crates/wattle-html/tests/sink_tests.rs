//! Tests for the `DomTree` implementation of the tree sink.

use wattle_dom::{Attribute, DomTree, Namespace, NodeId};
use wattle_html::{TreeSink, tree_to_string};

fn attr(name: &str, value: &str) -> Attribute {
    Attribute::new(name.to_string(), value.to_string())
}

#[test]
fn test_append_text_merges_with_previous_text() {
    let mut tree = DomTree::new();
    let p = TreeSink::create_element(&mut tree, "p", Namespace::Html, Vec::new());
    TreeSink::append_child(&mut tree, NodeId::ROOT, p);
    tree.append_text(p, "a");
    tree.append_text(p, "b");
    assert_eq!(tree.children(p).len(), 1);

    let br = TreeSink::create_element(&mut tree, "br", Namespace::Html, Vec::new());
    TreeSink::append_child(&mut tree, p, br);
    tree.append_text(p, "c");
    assert_eq!(tree_to_string(&tree, p), "<p>\n  \"ab\"\n  <br>\n  \"c\"\n");
}

#[test]
fn test_insert_text_before_merges_with_previous_sibling() {
    let mut tree = DomTree::new();
    let body = TreeSink::create_element(&mut tree, "body", Namespace::Html, Vec::new());
    let table = TreeSink::create_element(&mut tree, "table", Namespace::Html, Vec::new());
    TreeSink::append_child(&mut tree, body, table);

    tree.insert_text_before(table, "x");
    tree.insert_text_before(table, "y");
    assert_eq!(tree_to_string(&tree, body), "<body>\n  \"xy\"\n  <table>\n");
}

#[test]
fn test_insert_before_detached_sibling_is_ignored() {
    let mut tree = DomTree::new();
    let orphan = TreeSink::create_element(&mut tree, "div", Namespace::Html, Vec::new());
    let child = TreeSink::create_element(&mut tree, "span", Namespace::Html, Vec::new());
    TreeSink::insert_before(&mut tree, orphan, child);
    assert_eq!(TreeSink::parent(&tree, child), None);
}

#[test]
fn test_add_attrs_if_missing_keeps_existing() {
    let mut tree = DomTree::new();
    let html = TreeSink::create_element(&mut tree, "html", Namespace::Html, vec![attr("lang", "en")]);
    tree.add_attrs_if_missing(html, vec![attr("lang", "fr"), attr("dir", "ltr")]);
    let attrs = TreeSink::attributes(&tree, html);
    assert_eq!(attrs.len(), 2);
    assert_eq!(attrs[0].value, "en");
    assert_eq!(attrs[1].name, "dir");
}

#[test]
fn test_template_gets_contents_fragment() {
    let mut tree = DomTree::new();
    let template = TreeSink::create_element(&mut tree, "template", Namespace::Html, Vec::new());
    let contents = TreeSink::template_contents(&tree, template).expect("no contents");
    assert_eq!(TreeSink::children(&tree, contents), Vec::<NodeId>::new());

    let svg_template = TreeSink::create_element(&mut tree, "template", Namespace::Svg, Vec::new());
    assert_eq!(TreeSink::template_contents(&tree, svg_template), None);
}

#[test]
fn test_reparent_children_and_remove() {
    let mut tree = DomTree::new();
    let from = TreeSink::create_element(&mut tree, "b", Namespace::Html, Vec::new());
    let to = TreeSink::create_element(&mut tree, "b", Namespace::Html, Vec::new());
    tree.append_text(from, "x");
    let comment = tree.create_comment("c");
    TreeSink::append_child(&mut tree, from, comment);

    tree.reparent_children(from, to);
    assert!(TreeSink::children(&tree, from).is_empty());
    assert_eq!(TreeSink::children(&tree, to).len(), 2);

    TreeSink::remove(&mut tree, comment);
    assert_eq!(TreeSink::children(&tree, to).len(), 1);
    assert_eq!(TreeSink::parent(&tree, comment), None);
}

#[test]
fn test_node_identity_and_names() {
    let mut tree = DomTree::new();
    let a = TreeSink::create_element(&mut tree, "path", Namespace::Svg, Vec::new());
    let b = TreeSink::create_element(&mut tree, "path", Namespace::Svg, Vec::new());
    assert!(tree.is_same_node(a, a));
    assert!(!tree.is_same_node(a, b));
    assert_eq!(tree.element_name(a), Some((Namespace::Svg, "path")));
    assert_eq!(tree.element_name(tree.document()), None);

    let doctype = tree.create_doctype("html", "", "");
    assert_eq!(tree.element_name(doctype), None);
    assert_eq!(tree.as_doctype(doctype).map(|d| d.name.as_str()), Some("html"));
}
