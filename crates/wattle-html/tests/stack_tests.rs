//! Tests for the tree builder's bookkeeping: the stack of open elements, the
//! list of active formatting elements, and DOCTYPE classification.

use wattle_dom::{Attribute, DomTree, Namespace, NodeId, QuirksMode};
use wattle_html::Token;
use wattle_html::parser::{
    ActiveFormattingElements, FormattingEntry, Scope, StackOfOpenElements, is_formatting_element,
    is_special_element, quirks_mode_for_doctype,
};

/// Helper to build a stack of HTML elements, topmost first
fn stack_of(tree: &mut DomTree, names: &[&str]) -> StackOfOpenElements<NodeId> {
    let mut stack = StackOfOpenElements::new();
    for name in names {
        stack.push(tree.alloc_element(name, Namespace::Html, Vec::new()));
    }
    stack
}

/// Helper to get the tag names on a stack, topmost first
fn names_on(tree: &DomTree, stack: &StackOfOpenElements<NodeId>) -> Vec<String> {
    stack
        .as_slice()
        .iter()
        .filter_map(|&id| tree.as_element(id).map(|data| data.tag_name.clone()))
        .collect()
}

fn start_tag(name: &str, attrs: &[(&str, &str)]) -> Token {
    Token::StartTag {
        name: name.to_string(),
        self_closing: false,
        attributes: attrs
            .iter()
            .map(|(n, v)| Attribute::new((*n).to_string(), (*v).to_string()))
            .collect(),
    }
}

// ========== Scopes ==========

#[test]
fn test_element_in_default_scope() {
    let mut tree = DomTree::new();
    let stack = stack_of(&mut tree, &["html", "body", "div", "p", "span"]);
    assert!(stack.has_element_in_scope(&tree, "p", Scope::General));
    assert!(stack.has_element_in_scope(&tree, "div", Scope::General));
    assert!(!stack.has_element_in_scope(&tree, "li", Scope::General));
}

#[test]
fn test_table_blocks_default_scope() {
    let mut tree = DomTree::new();
    let stack = stack_of(&mut tree, &["html", "body", "p", "table", "tbody", "tr", "td", "span"]);
    assert!(!stack.has_element_in_scope(&tree, "p", Scope::General));
    assert!(stack.has_element_in_scope(&tree, "td", Scope::General));
    assert!(stack.has_element_in_scope(&tree, "tr", Scope::Table));
    assert!(!stack.has_element_in_scope(&tree, "body", Scope::Table));
}

#[test]
fn test_button_scope() {
    let mut tree = DomTree::new();
    let stack = stack_of(&mut tree, &["html", "body", "p", "button", "span"]);
    assert!(stack.has_element_in_scope(&tree, "p", Scope::General));
    assert!(!stack.has_element_in_scope(&tree, "p", Scope::Button));
}

#[test]
fn test_list_item_scope() {
    let mut tree = DomTree::new();
    let stack = stack_of(&mut tree, &["html", "body", "ul", "li", "ol", "span"]);
    assert!(stack.has_element_in_scope(&tree, "li", Scope::General));
    assert!(!stack.has_element_in_scope(&tree, "li", Scope::ListItem));
}

#[test]
fn test_select_scope() {
    let mut tree = DomTree::new();
    let stack = stack_of(&mut tree, &["html", "body", "select", "optgroup", "option"]);
    assert!(stack.has_element_in_scope(&tree, "select", Scope::Select));

    let stack = stack_of(&mut tree, &["html", "body", "select", "div", "option"]);
    assert!(!stack.has_element_in_scope(&tree, "select", Scope::Select));
}

#[test]
fn test_foreign_boundaries() {
    let mut tree = DomTree::new();
    let mut stack = stack_of(&mut tree, &["html", "body", "p"]);
    stack.push(tree.alloc_element("svg", Namespace::Svg, Vec::new()));
    stack.push(tree.alloc_element("foreignObject", Namespace::Svg, Vec::new()));
    stack.push(tree.alloc_element("span", Namespace::Html, Vec::new()));
    assert!(!stack.has_element_in_scope(&tree, "p", Scope::General));

    assert!(Scope::General.is_boundary(Namespace::Svg, "foreignObject"));
    assert!(!Scope::General.is_boundary(Namespace::Html, "foreignObject"));
    assert!(Scope::General.is_boundary(Namespace::MathMl, "mi"));
    assert!(!Scope::General.is_boundary(Namespace::MathMl, "math"));
}

#[test]
fn test_only_html_elements_match_by_name() {
    let mut tree = DomTree::new();
    let mut stack = stack_of(&mut tree, &["html", "body"]);
    stack.push(tree.alloc_element("svg", Namespace::Svg, Vec::new()));
    stack.push(tree.alloc_element("title", Namespace::Svg, Vec::new()));
    assert!(!stack.has_element_in_scope(&tree, "title", Scope::General));
    assert_eq!(stack.find(&tree, &["title"]), None);
}

#[test]
fn test_node_in_scope() {
    let mut tree = DomTree::new();
    let stack = stack_of(&mut tree, &["html", "body", "b", "table", "td"]);
    let b = stack.get(2).expect("no b");
    let td = stack.get(4).expect("no td");
    assert!(stack.has_node_in_scope(&tree, td, Scope::General));
    assert!(!stack.has_node_in_scope(&tree, b, Scope::General));
}

#[test]
fn test_any_in_scope() {
    let mut tree = DomTree::new();
    let stack = stack_of(&mut tree, &["html", "body", "h2", "span"]);
    let headings = ["h1", "h2", "h3", "h4", "h5", "h6"];
    assert!(stack.has_any_in_scope(&tree, &headings, Scope::General));
    assert!(!stack.has_any_in_scope(&tree, &["h1", "h3"], Scope::General));
}

// ========== Popping ==========

#[test]
fn test_generate_implied_end_tags() {
    let mut tree = DomTree::new();
    let mut stack = stack_of(&mut tree, &["html", "body", "div", "p", "li", "option"]);
    stack.generate_implied_end_tags(&tree, None);
    assert_eq!(names_on(&tree, &stack), ["html", "body", "div"]);
}

#[test]
fn test_generate_implied_end_tags_with_exclusion() {
    let mut tree = DomTree::new();
    let mut stack = stack_of(&mut tree, &["html", "body", "ul", "li", "p"]);
    stack.generate_implied_end_tags(&tree, Some("li"));
    assert_eq!(names_on(&tree, &stack), ["html", "body", "ul", "li"]);
}

#[test]
fn test_generate_implied_end_tags_thoroughly() {
    let mut tree = DomTree::new();
    let mut stack = stack_of(&mut tree, &["html", "body", "table", "tbody", "tr", "td", "p"]);
    stack.generate_implied_end_tags(&tree, None);
    assert_eq!(names_on(&tree, &stack).len(), 6);
    stack.generate_implied_end_tags_thoroughly(&tree);
    assert_eq!(names_on(&tree, &stack), ["html", "body", "table"]);
}

#[test]
fn test_pop_until() {
    let mut tree = DomTree::new();
    let mut stack = stack_of(&mut tree, &["html", "body", "div", "p", "span"]);
    stack.pop_until(&tree, &["nothing"]);
    assert_eq!(stack.len(), 5);
    stack.pop_until(&tree, &["div"]);
    assert_eq!(names_on(&tree, &stack), ["html", "body"]);
}

#[test]
fn test_pop_until_current_is() {
    let mut tree = DomTree::new();
    let mut stack = stack_of(&mut tree, &["html", "body", "table", "tbody", "tr"]);
    stack.pop_until_current_is(&tree, &["table", "template", "html"]);
    assert_eq!(names_on(&tree, &stack), ["html", "body", "table"]);
}

#[test]
fn test_pop_until_node() {
    let mut tree = DomTree::new();
    let mut stack = stack_of(&mut tree, &["html", "body", "div", "div", "div"]);
    let middle = stack.get(3).expect("no div");
    stack.pop_until_node(middle);
    assert_eq!(stack.len(), 3);
    assert!(!stack.contains(middle));
}

#[test]
fn test_find_returns_bottommost() {
    let mut tree = DomTree::new();
    let stack = stack_of(&mut tree, &["html", "body", "div", "p", "div"]);
    assert_eq!(stack.find(&tree, &["div"]), Some(4));
    assert_eq!(stack.find(&tree, &["p", "body"]), Some(3));
}

#[test]
fn test_replace_and_insert() {
    let mut tree = DomTree::new();
    let mut stack = stack_of(&mut tree, &["html", "body", "b"]);
    let b = stack.current().expect("empty stack");
    let clone = tree.alloc_element("i", Namespace::Html, Vec::new());
    stack.replace(b, clone);
    assert_eq!(stack.position(clone), Some(2));

    let inserted = tree.alloc_element("em", Namespace::Html, Vec::new());
    stack.insert(2, inserted);
    assert_eq!(names_on(&tree, &stack), ["html", "body", "em", "i"]);
}

// ========== Active formatting elements ==========

#[test]
fn test_noahs_ark_removes_earliest() {
    let mut tree = DomTree::new();
    let mut list = ActiveFormattingElements::new();
    let nodes: Vec<NodeId> = (0..4)
        .map(|_| tree.alloc_element("b", Namespace::Html, Vec::new()))
        .collect();
    for &node in &nodes {
        list.push(node, start_tag("b", &[]));
    }
    assert_eq!(list.len(), 3);
    assert!(!list.contains(nodes[0]));
    assert!(list.contains(nodes[3]));
}

#[test]
fn test_noahs_ark_compares_attributes_unordered() {
    let mut tree = DomTree::new();
    let mut list = ActiveFormattingElements::new();
    let first = tree.alloc_element("b", Namespace::Html, Vec::new());
    list.push(first, start_tag("b", &[("class", "x"), ("id", "y")]));
    for _ in 0..3 {
        let node = tree.alloc_element("b", Namespace::Html, Vec::new());
        list.push(node, start_tag("b", &[("id", "y"), ("class", "x")]));
    }
    assert_eq!(list.len(), 3);
    assert!(!list.contains(first));

    let different = tree.alloc_element("b", Namespace::Html, Vec::new());
    list.push(different, start_tag("b", &[("id", "z"), ("class", "x")]));
    assert_eq!(list.len(), 4);
}

#[test]
fn test_noahs_ark_counts_after_last_marker() {
    let mut tree = DomTree::new();
    let mut list = ActiveFormattingElements::new();
    for _ in 0..3 {
        let node = tree.alloc_element("i", Namespace::Html, Vec::new());
        list.push(node, start_tag("i", &[]));
    }
    list.insert_marker();
    for _ in 0..3 {
        let node = tree.alloc_element("i", Namespace::Html, Vec::new());
        list.push(node, start_tag("i", &[]));
    }
    assert_eq!(list.len(), 7);
}

#[test]
fn test_clear_to_last_marker() {
    let mut tree = DomTree::new();
    let mut list = ActiveFormattingElements::new();
    let outer = tree.alloc_element("b", Namespace::Html, Vec::new());
    list.push(outer, start_tag("b", &[]));
    list.insert_marker();
    let inner = tree.alloc_element("i", Namespace::Html, Vec::new());
    list.push(inner, start_tag("i", &[]));

    list.clear_to_last_marker();
    assert_eq!(list.len(), 1);
    assert!(list.contains(outer));
    assert!(matches!(list.get(0), Some(FormattingEntry::Element { .. })));
}

#[test]
fn test_last_element_named_stops_at_marker() {
    let mut tree = DomTree::new();
    let mut list = ActiveFormattingElements::new();
    let a = tree.alloc_element("a", Namespace::Html, Vec::new());
    list.push(a, start_tag("a", &[]));
    assert_eq!(list.last_element_named("a"), Some((0, a)));

    list.insert_marker();
    assert_eq!(list.last_element_named("a"), None);
}

#[test]
fn test_entry_accessors() {
    let mut tree = DomTree::new();
    let mut list = ActiveFormattingElements::new();
    let b = tree.alloc_element("b", Namespace::Html, Vec::new());
    list.push(b, start_tag("b", &[("class", "x")]));
    list.insert_marker();

    let entries = list.entries();
    assert_eq!(entries[0].node(), Some(b));
    assert_eq!(
        entries[0].token().and_then(|t| t.attribute("class")),
        Some("x")
    );
    assert!(entries[1].is_marker());
    assert_eq!(entries[1].node(), None);
}

#[test]
fn test_replace_and_remove_entries() {
    let mut tree = DomTree::new();
    let mut list = ActiveFormattingElements::new();
    let b = tree.alloc_element("b", Namespace::Html, Vec::new());
    let i = tree.alloc_element("i", Namespace::Html, Vec::new());
    list.push(b, start_tag("b", &[]));
    list.push(i, start_tag("i", &[]));

    let clone = tree.alloc_element("b", Namespace::Html, Vec::new());
    list.replace_node(0, clone);
    assert_eq!(list.position(clone), Some(0));
    assert!(!list.contains(b));

    list.remove(i);
    assert_eq!(list.len(), 1);
    list.insert_at(0, i, start_tag("i", &[]));
    assert_eq!(list.position(i), Some(0));
    list.remove_at(0);
    assert_eq!(list.position(clone), Some(0));
}

#[test]
fn test_reconstruction_start() {
    let mut tree = DomTree::new();
    let mut stack = stack_of(&mut tree, &["html", "body"]);
    let mut list = ActiveFormattingElements::new();
    assert_eq!(list.reconstruction_start(&stack), None);

    let b = tree.alloc_element("b", Namespace::Html, Vec::new());
    let i = tree.alloc_element("i", Namespace::Html, Vec::new());
    let u = tree.alloc_element("u", Namespace::Html, Vec::new());
    list.push(b, start_tag("b", &[]));
    list.push(i, start_tag("i", &[]));
    list.push(u, start_tag("u", &[]));

    // None of them open: reopen all three.
    assert_eq!(list.reconstruction_start(&stack), Some(0));

    // The first still open: reopen from the second.
    stack.push(b);
    assert_eq!(list.reconstruction_start(&stack), Some(1));

    // The last open: nothing to do.
    stack.push(u);
    assert_eq!(list.reconstruction_start(&stack), None);
}

#[test]
fn test_reconstruction_start_after_marker() {
    let mut tree = DomTree::new();
    let stack = stack_of(&mut tree, &["html", "body"]);
    let mut list = ActiveFormattingElements::new();
    let b = tree.alloc_element("b", Namespace::Html, Vec::new());
    list.push(b, start_tag("b", &[]));
    list.insert_marker();
    assert_eq!(list.reconstruction_start(&stack), None);

    let i = tree.alloc_element("i", Namespace::Html, Vec::new());
    list.push(i, start_tag("i", &[]));
    assert_eq!(list.reconstruction_start(&stack), Some(2));
}

// ========== Element categories ==========

#[test]
fn test_formatting_elements() {
    for name in ["a", "b", "nobr", "font", "u"] {
        assert!(is_formatting_element(name), "{name}");
    }
    for name in ["div", "span", "p", "em-x"] {
        assert!(!is_formatting_element(name), "{name}");
    }
}

#[test]
fn test_special_elements() {
    assert!(is_special_element(Namespace::Html, "p"));
    assert!(is_special_element(Namespace::Html, "table"));
    assert!(!is_special_element(Namespace::Html, "span"));
    assert!(!is_special_element(Namespace::Html, "b"));
    assert!(is_special_element(Namespace::Svg, "foreignObject"));
    assert!(is_special_element(Namespace::MathMl, "annotation-xml"));
    assert!(!is_special_element(Namespace::Svg, "p"));
}

// ========== DOCTYPE classification ==========

#[test]
fn test_html5_doctype_is_no_quirks() {
    assert_eq!(quirks_mode_for_doctype(Some("html"), None, None, false), QuirksMode::NoQuirks);
    assert_eq!(
        quirks_mode_for_doctype(Some("html"), None, Some("about:legacy-compat"), false),
        QuirksMode::NoQuirks
    );
}

#[test]
fn test_force_quirks_and_wrong_name() {
    assert_eq!(quirks_mode_for_doctype(Some("html"), None, None, true), QuirksMode::Quirks);
    assert_eq!(quirks_mode_for_doctype(Some("xhtml"), None, None, false), QuirksMode::Quirks);
    assert_eq!(quirks_mode_for_doctype(None, None, None, false), QuirksMode::Quirks);
}

#[test]
fn test_quirky_public_identifiers() {
    assert_eq!(
        quirks_mode_for_doctype(Some("html"), Some("-//W3O//DTD W3 HTML Strict 3.0//EN//"), None, false),
        QuirksMode::Quirks
    );
    assert_eq!(
        quirks_mode_for_doctype(Some("html"), Some("-//W3O//DTD W3 HTML 3.0//EN"), None, false),
        QuirksMode::Quirks
    );
    assert_eq!(
        quirks_mode_for_doctype(
            Some("html"),
            None,
            Some("http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd"),
            false
        ),
        QuirksMode::Quirks
    );
}

#[test]
fn test_html401_depends_on_system_identifier() {
    let public = Some("-//W3C//DTD HTML 4.01 Frameset//EN");
    assert_eq!(quirks_mode_for_doctype(Some("html"), public, None, false), QuirksMode::Quirks);
    assert_eq!(
        quirks_mode_for_doctype(Some("html"), public, Some("http://www.w3.org/TR/html4/frameset.dtd"), false),
        QuirksMode::LimitedQuirks
    );
}

#[test]
fn test_xhtml_transitional_is_limited_quirks() {
    assert_eq!(
        quirks_mode_for_doctype(Some("html"), Some("-//W3C//DTD XHTML 1.0 Transitional//EN"), None, false),
        QuirksMode::LimitedQuirks
    );
}

#[test]
fn test_strict_public_identifier_is_no_quirks() {
    assert_eq!(
        quirks_mode_for_doctype(Some("html"), Some("-//W3C//DTD HTML 4.01//EN"), None, false),
        QuirksMode::NoQuirks
    );
}
