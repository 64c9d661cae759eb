//! Integration tests for fragment parsing (the `innerHTML` algorithm).

use wattle_common::ParseErrorKind;
use wattle_dom::{DomTree, Namespace, NodeId};
use wattle_html::{HtmlError, ParserConfig, parse_fragment, parse_html_fragment, tree_to_string};

/// Helper to parse a fragment and render its top-level nodes
fn fragment_dump(html: &str, context: &str) -> String {
    let (fragment, _) = parse_html_fragment(html, context).expect("fragment parse failed");
    fragment
        .nodes
        .iter()
        .map(|&node| tree_to_string(&fragment.sink, node))
        .collect()
}

/// Helper to parse a fragment inside a `<form><div>` chain, with the div as context
fn parse_inside_form(html: &str) -> (DomTree, Vec<NodeId>) {
    let mut tree = DomTree::new();
    let form = tree.alloc_element("form", Namespace::Html, Vec::new());
    let div = tree.alloc_element("div", Namespace::Html, Vec::new());
    tree.append_child(form, div);
    let mut diagnostics = Vec::new();
    let fragment = parse_fragment(html, tree, div, &ParserConfig::default(), &mut diagnostics)
        .expect("fragment parse failed");
    (fragment.sink, fragment.nodes)
}

#[test]
fn test_body_context() {
    assert_eq!(
        fragment_dump("a<b>c</b>", "div"),
        "\"a\"\n<b>\n  \"c\"\n"
    );
}

#[test]
fn test_fragment_nodes_are_detached() {
    let (fragment, _) = parse_html_fragment("<p>a<p>b", "div").expect("fragment parse failed");
    assert_eq!(fragment.nodes.len(), 2);
    for &node in &fragment.nodes {
        assert_eq!(fragment.sink.parent(node), None);
    }
}

#[test]
fn test_fragment_has_no_skeleton() {
    let (fragment, diagnostics) = parse_html_fragment("x", "div").expect("fragment parse failed");
    assert_eq!(fragment.nodes.len(), 1);
    assert_eq!(fragment.sink.as_text(fragment.nodes[0]), Some("x"));
    // No DOCTYPE is expected in a fragment.
    assert!(diagnostics.is_empty(), "unexpected errors: {diagnostics:?}");
}

#[test]
fn test_doctype_in_fragment_is_ignored() {
    let (fragment, diagnostics) = parse_html_fragment("<!DOCTYPE html>x", "div").expect("fragment parse failed");
    assert_eq!(fragment.nodes.len(), 1);
    let kinds: Vec<ParseErrorKind> = diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![ParseErrorKind::UnexpectedDoctype]);
}

#[test]
fn test_table_row_context() {
    assert_eq!(
        fragment_dump("<td>a<td>b", "tr"),
        "<td>\n  \"a\"\n<td>\n  \"b\"\n"
    );
}

#[test]
fn test_table_context_inserts_tbody() {
    assert_eq!(
        fragment_dump("<tr><td>x", "table"),
        "<tbody>\n  <tr>\n    <td>\n      \"x\"\n"
    );
}

#[test]
fn test_title_context_is_rcdata() {
    assert_eq!(
        fragment_dump("a<b>&amp;</b>", "title"),
        "\"a<b>&</b>\"\n"
    );
}

#[test]
fn test_textarea_context_is_rcdata() {
    assert_eq!(fragment_dump("<p>x</p>", "TEXTAREA"), "\"<p>x</p>\"\n");
}

#[test]
fn test_style_context_is_rawtext() {
    assert_eq!(fragment_dump("a &amp; <b>", "style"), "\"a &amp; <b>\"\n");
}

#[test]
fn test_select_context() {
    assert_eq!(
        fragment_dump("<option>a<option>b<div>c", "select"),
        "<option>\n  \"a\"\n<option>\n  \"bc\"\n"
    );
}

#[test]
fn test_template_context() {
    assert_eq!(fragment_dump("<td>x</td>", "template"), "<td>\n  \"x\"\n");
}

#[test]
fn test_svg_context() {
    let mut tree = DomTree::new();
    let context = tree.alloc_element("svg", Namespace::Svg, Vec::new());
    let mut diagnostics = Vec::new();
    let fragment = parse_fragment(
        r#"<circle r="1"/><![CDATA[x<y]]>"#,
        tree,
        context,
        &ParserConfig::default(),
        &mut diagnostics,
    )
    .expect("fragment parse failed");

    assert_eq!(fragment.nodes.len(), 2);
    let circle = fragment.sink.as_element(fragment.nodes[0]).expect("not an element");
    assert_eq!(circle.namespace, Namespace::Svg);
    assert_eq!(circle.get_attribute("r"), Some("1"));
    assert_eq!(fragment.sink.as_text(fragment.nodes[1]), Some("x<y"));
}

#[test]
fn test_form_ancestor_blocks_nested_form() {
    let (tree, nodes) = parse_inside_form("<form><input>");
    assert_eq!(nodes.len(), 1);
    assert!(tree.as_element(nodes[0]).is_some_and(|data| data.tag_name == "input"));
}

#[test]
fn test_form_allowed_without_form_ancestor() {
    assert_eq!(fragment_dump("<form><input>", "div"), "<form>\n  <input>\n");
}

#[test]
fn test_context_must_be_an_element() {
    let tree = DomTree::new();
    let mut diagnostics = Vec::new();
    let result = parse_fragment("x", tree, NodeId::ROOT, &ParserConfig::default(), &mut diagnostics);
    assert!(matches!(result, Err(HtmlError::InvalidContext(_))));
}

#[test]
fn test_fragment_respects_limits() {
    let mut tree = DomTree::new();
    let context = tree.alloc_element("div", Namespace::Html, Vec::new());
    let config = ParserConfig::default().with_max_open_elements(3);
    let mut diagnostics = Vec::new();
    let result = parse_fragment(&"<span>".repeat(5), tree, context, &config, &mut diagnostics);
    assert_eq!(
        result.err(),
        Some(HtmlError::ResourceLimit {
            what: "open elements",
            limit: 3,
        })
    );
}

#[test]
fn test_formatting_fragment_in_div() {
    let (fragment, _) = parse_html_fragment("<b>x</b>", "div").expect("fragment parse failed");
    assert_eq!(fragment.nodes.len(), 1);
    assert_eq!(tree_to_string(&fragment.sink, fragment.nodes[0]), "<b>\n  \"x\"\n");
    assert!(fragment.sink.get_elements_by_tag_name(NodeId::ROOT, "body").is_empty());
}
