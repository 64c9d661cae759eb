//! Integration tests for the HTML parser.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use wattle_common::{Diagnostic, ParseErrorKind};
use wattle_dom::{DomTree, Namespace, NodeId, NodeType, QuirksMode};
use wattle_html::{HtmlError, ParserConfig, parse_document, parse_html, tree_to_string};

/// Helper to parse HTML and return the DOM tree
fn parse(html: &str) -> DomTree {
    parse_html(html).expect("parse failed").0.sink
}

/// Helper to parse HTML and return the tree with its diagnostics
fn parse_with_errors(html: &str) -> (DomTree, Vec<Diagnostic>) {
    let (document, diagnostics) = parse_html(html).expect("parse failed");
    (document.sink, diagnostics)
}

/// Helper to parse HTML with a custom config
fn parse_with_config(html: &str, config: &ParserConfig) -> Result<DomTree, HtmlError> {
    let mut diagnostics = Vec::new();
    parse_document(html, DomTree::new(), config, &mut diagnostics).map(|document| document.sink)
}

/// Helper to render the whole document as an indented outline
fn document_dump(html: &str) -> String {
    tree_to_string(&parse(html), NodeId::ROOT)
}

/// Helper to render the children of body, starting at indent zero
fn body_dump(html: &str) -> String {
    let tree = parse(html);
    let body = tree.body().expect("no body element");
    tree.children(body)
        .iter()
        .map(|&child| tree_to_string(&tree, child))
        .collect()
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if let Some(data) = tree.as_element(from)
        && data.tag_name == tag
    {
        return Some(from);
    }
    for &child_id in tree.children(from) {
        if let Some(found) = find_element(tree, child_id, tag) {
            return Some(found);
        }
    }
    None
}

fn error_kinds(diagnostics: &[Diagnostic]) -> Vec<ParseErrorKind> {
    diagnostics.iter().map(|d| d.kind).collect()
}

// ========== Document structure ==========

#[test]
fn test_document_structure() {
    let tree = parse("<!DOCTYPE html><html><head></head><body></body></html>");

    let root = tree.get(NodeId::ROOT).expect("no root");
    assert!(matches!(root.node_type, NodeType::Document));

    let html = tree.document_element().expect("no html element");
    assert!(tree.as_element(html).is_some_and(|data| data.is_html("html")));
    assert!(tree.head().is_some());
    assert!(tree.body().is_some());
}

#[test]
fn test_empty_input_builds_skeleton() {
    assert_eq!(
        document_dump(""),
        "#document\n  <html>\n    <head>\n    <body>\n"
    );
}

#[test]
fn test_doctype_node() {
    assert_eq!(
        document_dump("<!DOCTYPE html>"),
        "#document\n  <!DOCTYPE html>\n  <html>\n    <head>\n    <body>\n"
    );
}

#[test]
fn test_comments_outside_html() {
    let expected = "\
#document
  <!-- a -->
  <!DOCTYPE html>
  <html>
    <!-- b -->
    <head>
    <body>
  <!-- c -->
";
    assert_eq!(
        document_dump("<!--a--><!DOCTYPE html><html><!--b--></html><!--c-->"),
        expected
    );
}

#[test]
fn test_document_has_one_html_child() {
    let tree = parse("text <html> more <html> <!DOCTYPE html> <head> <body>");
    let elements: Vec<NodeId> = tree
        .children(NodeId::ROOT)
        .iter()
        .copied()
        .filter(|&id| tree.as_element(id).is_some())
        .collect();
    assert_eq!(elements.len(), 1);
}

#[test]
fn test_text_node() {
    let tree = parse("<html><body>Hello World</body></html>");
    let body = tree.body().expect("no body");
    assert_eq!(tree.text_content(body), "Hello World");
    // One merged text node, not one per character
    assert_eq!(tree.children(body).len(), 1);
}

#[test]
fn test_comment_node() {
    let tree = parse("<html><body><!-- test comment --></body></html>");
    let body = tree.body().expect("no body");
    let has_comment = tree
        .children(body)
        .iter()
        .any(|&child| tree.as_comment(child) == Some(" test comment "));
    assert!(has_comment);
}

#[test]
fn test_element_attributes() {
    let tree = parse(r#"<div id="main" class="container box"></div>"#);
    let div = find_element(&tree, NodeId::ROOT, "div").expect("no div");
    let data = tree.as_element(div).expect("not an element");
    assert_eq!(data.get_attribute("id"), Some("main"));
    assert_eq!(data.get_attribute("class"), Some("container box"));
    assert_eq!(data.id(), Some("main"));
    assert!(data.classes().contains("box"));
}

#[test]
fn test_void_elements() {
    assert_eq!(
        body_dump(r#"<input type="text"><br>after"#),
        "<input>\n  type=\"text\"\n<br>\n\"after\"\n"
    );
}

#[test]
fn test_head_elements() {
    let expected = "\
#document
  <!DOCTYPE html>
  <html>
    <head>
      <title>
        \"a & b\"
      <meta>
        charset=\"utf-8\"
    <body>
      \"x\"
";
    assert_eq!(
        document_dump("<!DOCTYPE html><title>a &amp; b</title><meta charset=utf-8>x"),
        expected
    );
}

#[test]
fn test_whitespace_preserved_in_text() {
    let tree = parse("<body><p>  two  spaces  </p></body>");
    let p = find_element(&tree, NodeId::ROOT, "p").expect("no p");
    assert_eq!(tree.text_content(p), "  two  spaces  ");
}

#[test]
fn test_character_references_in_text() {
    let tree = parse("<p>&lt;tag&gt; &copy; &#x263A;</p>");
    let p = find_element(&tree, NodeId::ROOT, "p").expect("no p");
    assert_eq!(tree.text_content(p), "<tag> \u{A9} \u{263A}");
}

// ========== Raw text elements ==========

#[test]
fn test_style_element_content_preserved() {
    let tree = parse("<style>p > a { color: red; }</style>");
    let style = find_element(&tree, NodeId::ROOT, "style").expect("no style");
    assert_eq!(tree.text_content(style), "p > a { color: red; }");
    // style before body goes to head
    assert_eq!(tree.parent(style), tree.head());
}

#[test]
fn test_script_content_is_not_markup() {
    let tree = parse(r#"<script>if (a < b) { x = "</p>"; }</script>"#);
    let script = find_element(&tree, NodeId::ROOT, "script").expect("no script");
    assert_eq!(tree.text_content(script), r#"if (a < b) { x = "</p>"; }"#);
}

#[test]
fn test_title_content_preserved() {
    let tree = parse("<title><b>not bold</b></title>");
    let title = find_element(&tree, NodeId::ROOT, "title").expect("no title");
    assert_eq!(tree.text_content(title), "<b>not bold</b>");
    assert!(find_element(&tree, NodeId::ROOT, "b").is_none());
}

#[test]
fn test_textarea_drops_leading_newline() {
    let tree = parse("<textarea>\nfoo</textarea>");
    let textarea = find_element(&tree, NodeId::ROOT, "textarea").expect("no textarea");
    assert_eq!(tree.text_content(textarea), "foo");
}

#[test]
fn test_pre_drops_only_first_newline() {
    let tree = parse("<pre>\n\nfoo</pre>");
    let pre = find_element(&tree, NodeId::ROOT, "pre").expect("no pre");
    assert_eq!(tree.text_content(pre), "\nfoo");
}

#[test]
fn test_plaintext_swallows_rest_of_input() {
    let tree = parse("<plaintext><b>x</plaintext>");
    let plaintext = find_element(&tree, NodeId::ROOT, "plaintext").expect("no plaintext");
    assert_eq!(tree.text_content(plaintext), "<b>x</plaintext>");
}

#[test]
fn test_unclosed_title_at_eof() {
    let (tree, errors) = parse_with_errors("<!DOCTYPE html><title>abc");
    let title = find_element(&tree, NodeId::ROOT, "title").expect("no title");
    assert_eq!(tree.text_content(title), "abc");
    assert!(tree.body().is_some());
    assert!(error_kinds(&errors).contains(&ParseErrorKind::UnexpectedEndOfFile));
}

// ========== Adoption agency ==========

#[test]
fn test_adoption_agency_no_furthest_block() {
    let expected = "\
<p>
  \"1\"
  <b>
    \"2\"
    <i>
      \"3\"
<b>
  <i>
    \"4\"
<i>
  \"5\"
\"6\"
";
    assert_eq!(body_dump("<p>1<b>2<i>3</p>4</b>5</i>6"), expected);
}

#[test]
fn test_adoption_agency_with_furthest_block() {
    let expected = "\
<b>
  \"1\"
<p>
  <b>
    \"2\"
  \"3\"
";
    assert_eq!(body_dump("<b>1<p>2</b>3</p>"), expected);
}

#[test]
fn test_formatting_reconstruction_across_blocks() {
    // A closed <b> is not reopened; an open one simply contains the block.
    assert_eq!(
        body_dump("<b>bold</b><div>plain"),
        "<b>\n  \"bold\"\n<div>\n  \"plain\"\n"
    );
    assert_eq!(
        body_dump("<b>bold<div>still bold"),
        "<b>\n  \"bold\"\n  <div>\n    \"still bold\"\n"
    );
}

#[test]
fn test_reconstruction_after_paragraph_close() {
    let expected = "\
<p>
  <i>
    \"a\"
<p>
  <i>
    \"b\"
";
    assert_eq!(body_dump("<p><i>a<p>b"), expected);
}

#[test]
fn test_properly_nested_formatting() {
    assert_eq!(
        body_dump("<b><i>x</i></b>y"),
        "<b>\n  <i>\n    \"x\"\n\"y\"\n"
    );
}

#[test]
fn test_nested_anchor_tags() {
    let expected = "\
<a>
  href=\"1\"
  \"x\"
<a>
  href=\"2\"
  \"y\"
";
    let (tree, errors) = parse_with_errors("<!DOCTYPE html><a href=1>x<a href=2>y</a>");
    let body = tree.body().expect("no body");
    let dump: String = tree
        .children(body)
        .iter()
        .map(|&child| tree_to_string(&tree, child))
        .collect();
    assert_eq!(dump, expected);
    assert!(error_kinds(&errors).contains(&ParseErrorKind::MisnestedFormattingElement));
}

#[test]
fn test_noahs_ark_limits_reopened_elements() {
    let expected = "\
<p>
  <b>
    <b>
      <b>
        <b>
<p>
  <b>
    <b>
      <b>
        \"x\"
";
    assert_eq!(body_dump("<p><b><b><b><b><p>x"), expected);
}

#[test]
fn test_noahs_ark_distinguishes_attributes() {
    let tree = parse("<p><b class=a><b class=b><b class=a><b class=a><p>x");
    let paragraphs = tree.get_elements_by_tag_name(NodeId::ROOT, "p");
    assert_eq!(paragraphs.len(), 2);
    // Only three of the four are identical, so all four are reopened.
    let reopened = tree.get_elements_by_tag_name(paragraphs[1], "b");
    assert_eq!(reopened.len(), 4);
}

#[test]
fn test_any_other_end_tag_ignores_special() {
    let (tree, errors) = parse_with_errors("<!DOCTYPE html><span><div>x</span>y</div></span>");
    let div = find_element(&tree, NodeId::ROOT, "div").expect("no div");
    assert_eq!(tree.text_content(div), "xy");
    assert_eq!(error_kinds(&errors), vec![ParseErrorKind::UnexpectedEndTag]);
}

// ========== Implied end tags and scope ==========

#[test]
fn test_paragraph_implicitly_closed() {
    assert_eq!(
        body_dump("<p>one<p>two<div>three</div>"),
        "<p>\n  \"one\"\n<p>\n  \"two\"\n<div>\n  \"three\"\n"
    );
}

#[test]
fn test_li_implicit_close() {
    assert_eq!(
        body_dump("<ul><li>a<li>b</ul>"),
        "<ul>\n  <li>\n    \"a\"\n  <li>\n    \"b\"\n"
    );
}

#[test]
fn test_dd_dt_implicit_close() {
    assert_eq!(
        body_dump("<dl><dt>a<dd>b<dt>c</dl>"),
        "<dl>\n  <dt>\n    \"a\"\n  <dd>\n    \"b\"\n  <dt>\n    \"c\"\n"
    );
}

#[test]
fn test_nested_lists() {
    let tree = parse("<ul><li>a<ul><li>b</ul><li>c</ul>");
    let outer = find_element(&tree, NodeId::ROOT, "ul").expect("no ul");
    let items: Vec<NodeId> = tree
        .children(outer)
        .iter()
        .copied()
        .filter(|&id| tree.as_element(id).is_some_and(|data| data.tag_name == "li"))
        .collect();
    assert_eq!(items.len(), 2);
    assert_eq!(tree.text_content(items[1]), "c");
}

#[test]
fn test_headings_do_not_nest() {
    let (_, errors) = parse_with_errors("<!DOCTYPE html><h1>a<h2>b</h2>");
    assert_eq!(body_dump("<h1>a<h2>b"), "<h1>\n  \"a\"\n<h2>\n  \"b\"\n");
    assert_eq!(error_kinds(&errors), vec![ParseErrorKind::UnexpectedStartTag]);
}

#[test]
fn test_stray_end_p_creates_empty_paragraph() {
    assert_eq!(body_dump("</p>x"), "<p>\n\"x\"\n");
}

#[test]
fn test_end_br_becomes_br_element() {
    assert_eq!(body_dump("a</br>b"), "\"a\"\n<br>\n\"b\"\n");
}

#[test]
fn test_image_becomes_img() {
    assert_eq!(body_dump("<image src=x>"), "<img>\n  src=\"x\"\n");
}

#[test]
fn test_second_form_is_ignored() {
    let tree = parse("<form id=a><form id=b><input></form>");
    let forms = tree.get_elements_by_tag_name(NodeId::ROOT, "form");
    assert_eq!(forms.len(), 1);
    let input = find_element(&tree, forms[0], "input");
    assert!(input.is_some());
}

#[test]
fn test_html_attributes_are_merged() {
    let tree = parse("<html a=1><body><html a=2 b=3>");
    let html = tree.document_element().expect("no html");
    let data = tree.as_element(html).expect("not an element");
    assert_eq!(data.get_attribute("a"), Some("1"));
    assert_eq!(data.get_attribute("b"), Some("3"));
}

#[test]
fn test_null_in_body_is_dropped() {
    let tree = parse("a\0b");
    let body = tree.body().expect("no body");
    assert_eq!(tree.text_content(body), "ab");
}

#[test]
fn test_text_after_body_goes_into_body() {
    let tree = parse("<body>a</body>b</html>c");
    let body = tree.body().expect("no body");
    assert_eq!(tree.text_content(body), "abc");
}

#[test]
fn test_comment_after_body_goes_to_html() {
    let tree = parse("<body></body><!--x-->");
    let html = tree.document_element().expect("no html");
    let last = tree.last_child(html).expect("html has no children");
    assert_eq!(tree.as_comment(last), Some("x"));
}

// ========== Tables ==========

#[test]
fn test_table_implied_tbody_and_tr() {
    let expected = "\
<table>
  <tbody>
    <tr>
      <td>
        \"1\"
      <td>
        \"2\"
";
    assert_eq!(body_dump("<table><td>1<td>2</table>"), expected);
}

#[test]
fn test_foster_parenting_text() {
    let expected = "\
\"foo\"
<table>
  <tbody>
    <tr>
      <td>
        \"bar\"
";
    assert_eq!(body_dump("<table>foo<tr><td>bar</td></tr></table>"), expected);
}

#[test]
fn test_foster_parenting_element() {
    let expected = "\
<div>
  \"x\"
<table>
";
    assert_eq!(body_dump("<table><div>x</div></table>"), expected);
}

#[test]
fn test_table_whitespace_stays_in_table() {
    let expected = "\
<table>
  \" \"
  <tbody>
    <tr>
      <td>
        \"x\"
    \" \"
";
    assert_eq!(body_dump("<table> <tr><td>x</td></tr> </table>"), expected);
}

#[test]
fn test_table_closes_paragraph_in_no_quirks() {
    assert_eq!(
        body_dump("<!DOCTYPE html><p><table></table>"),
        "<p>\n<table>\n"
    );
}

#[test]
fn test_table_inside_paragraph_in_quirks() {
    assert_eq!(body_dump("<p><table></table>"), "<p>\n  <table>\n");
}

#[test]
fn test_caption_and_colgroup() {
    let expected = "\
<table>
  <caption>
    \"c\"
  <colgroup>
    <col>
  <tbody>
    <tr>
      <td>
        \"x\"
";
    assert_eq!(
        body_dump("<table><caption>c</caption><col><tr><td>x</table>"),
        expected
    );
}

#[test]
fn test_table_inside_cell() {
    let tree = parse("<table><tr><td>a<table><tr><td>b</table></table>");
    let tables = tree.get_elements_by_tag_name(NodeId::ROOT, "table");
    assert_eq!(tables.len(), 2);
    let inner_parent = tree
        .ancestors(tables[1])
        .find(|&id| tree.as_element(id).is_some_and(|data| data.tag_name == "td"));
    assert!(inner_parent.is_some());
}

#[test]
fn test_hidden_input_stays_in_table() {
    let tree = parse("<table><input type=hidden></table>");
    let input = find_element(&tree, NodeId::ROOT, "input").expect("no input");
    let parent = tree.parent(input).expect("input has no parent");
    assert!(tree.as_element(parent).is_some_and(|data| data.tag_name == "table"));
}

// ========== Select ==========

#[test]
fn test_select_options() {
    assert_eq!(
        body_dump("<select><option>a<option>b</select>"),
        "<select>\n  <option>\n    \"a\"\n  <option>\n    \"b\"\n"
    );
}

#[test]
fn test_nested_select_closes_outer() {
    assert_eq!(
        body_dump("<select><option>a<select>b"),
        "<select>\n  <option>\n    \"a\"\n\"b\"\n"
    );
}

#[test]
fn test_select_in_table_closed_by_cell() {
    let expected = "\
<table>
  <tbody>
    <tr>
      <td>
        <select>
          <option>
            \"1\"
      <td>
        \"2\"
";
    assert_eq!(body_dump("<table><tr><td><select><option>1<td>2</table>"), expected);
}

// ========== Templates ==========

#[test]
fn test_template_contents() {
    let expected = "\
#document
  <html>
    <head>
      <template>
        content
          <td>
            \"x\"
    <body>
";
    assert_eq!(document_dump("<template><td>x</td></template>"), expected);
}

#[test]
fn test_template_children_live_in_contents() {
    let tree = parse("<body><template><p>a</p></template>");
    let template = find_element(&tree, NodeId::ROOT, "template").expect("no template");
    assert!(tree.children(template).is_empty());
    let contents = tree
        .as_element(template)
        .and_then(|data| data.template_contents)
        .expect("no template contents");
    assert!(matches!(
        tree.get(contents).map(|node| &node.node_type),
        Some(NodeType::DocumentFragment)
    ));
    assert_eq!(tree.text_content(contents), "a");
}

#[test]
fn test_unclosed_template_at_eof() {
    let (tree, errors) = parse_with_errors("<!DOCTYPE html><template><div>");
    assert!(find_element(&tree, NodeId::ROOT, "template").is_some());
    assert!(error_kinds(&errors).contains(&ParseErrorKind::UnexpectedEndOfFile));
}

// ========== Frameset ==========

#[test]
fn test_frameset_document() {
    let expected = "\
#document
  <html>
    <head>
    <frameset>
      <frame>
";
    assert_eq!(document_dump("<frameset><frame></frameset>"), expected);
}

#[test]
fn test_frameset_ignored_after_content() {
    let tree = parse("<p>x<frameset><frame>");
    assert!(find_element(&tree, NodeId::ROOT, "frameset").is_none());
    assert!(tree.body().is_some());
}

#[test]
fn test_frameset_replaces_empty_body() {
    // An explicit <body> tag would clear the frameset-ok flag; an implied one
    // with no content yet does not.
    let tree = parse("<div></div><frameset></frameset>");
    assert!(find_element(&tree, NodeId::ROOT, "frameset").is_some());
    assert!(find_element(&tree, NodeId::ROOT, "div").is_none());
    assert!(tree.body().is_none());
}

// ========== Foreign content ==========

#[test]
fn test_svg_case_adjustment_and_integration_point() {
    let expected = "\
<svg svg>
  viewBox=\"0 0 1 1\"
  <svg foreignObject>
    <p>
      \"x\"
  <svg path>
";
    assert_eq!(
        body_dump(r#"<svg viewbox="0 0 1 1"><foreignobject><p>x</p></foreignobject><path/></svg>"#),
        expected
    );
}

#[test]
fn test_mathml_text_and_annotation_xml() {
    let expected = "\
<math math>
  <math mi>
    \"x\"
  <math annotation-xml>
    encoding=\"text/html\"
    <div>
      \"y\"
";
    assert_eq!(
        body_dump(r#"<math><mi>x</mi><annotation-xml encoding="text/html"><div>y</div></annotation-xml></math>"#),
        expected
    );
}

#[test]
fn test_html_breaks_out_of_svg() {
    assert_eq!(body_dump("<svg><p>x</svg>"), "<svg svg>\n<p>\n  \"x\"\n");
}

#[test]
fn test_cdata_in_svg() {
    let tree = parse("<svg><![CDATA[a<b]]></svg>");
    let svg = find_element(&tree, NodeId::ROOT, "svg").expect("no svg");
    assert_eq!(tree.text_content(svg), "a<b");
}

#[test]
fn test_xlink_attribute_namespace() {
    let tree = parse(r##"<svg><use xlink:href="#a"/></svg>"##);
    let svg_use = find_element(&tree, NodeId::ROOT, "use").expect("no use");
    let data = tree.as_element(svg_use).expect("not an element");
    assert_eq!(data.namespace, Namespace::Svg);
    let attr = &data.attrs[0];
    assert_eq!(attr.name, "href");
    assert_eq!(attr.prefix.as_deref(), Some("xlink"));
    assert_eq!(attr.namespace, Some(Namespace::XLink));
    assert_eq!(attr.qualified_name(), "xlink:href");
}

#[test]
fn test_foreign_self_closing_is_acknowledged() {
    let (_, errors) = parse_with_errors("<!DOCTYPE html><svg><circle/></svg>");
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn test_html_self_closing_non_void_is_error() {
    let (tree, errors) = parse_with_errors("<!DOCTYPE html><div/>x</div>");
    let div = find_element(&tree, NodeId::ROOT, "div").expect("no div");
    // The flag is ignored: the text still goes inside the div.
    assert_eq!(tree.text_content(div), "x");
    assert_eq!(
        error_kinds(&errors),
        vec![ParseErrorKind::NonVoidHtmlElementStartTagWithTrailingSolidus]
    );
}

// ========== Quirks mode ==========

#[test]
fn test_no_quirks_for_html5_doctype() {
    let (document, _) = parse_html("<!DOCTYPE html>").expect("parse failed");
    assert_eq!(document.quirks_mode, QuirksMode::NoQuirks);
    assert_eq!(document.sink.quirks_mode(), QuirksMode::NoQuirks);
}

#[test]
fn test_quirks_without_doctype() {
    let (document, diagnostics) = parse_html("<p>x").expect("parse failed");
    assert_eq!(document.quirks_mode, QuirksMode::Quirks);
    assert_eq!(error_kinds(&diagnostics), vec![ParseErrorKind::MissingDoctype]);
}

#[test]
fn test_quirks_for_legacy_public_identifier() {
    let (document, _) =
        parse_html(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN">"#).expect("parse failed");
    assert_eq!(document.quirks_mode, QuirksMode::Quirks);
}

#[test]
fn test_limited_quirks_for_transitional_with_system_id() {
    let (document, diagnostics) = parse_html(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#,
    )
    .expect("parse failed");
    assert_eq!(document.quirks_mode, QuirksMode::LimitedQuirks);
    assert_eq!(error_kinds(&diagnostics), vec![ParseErrorKind::NonConformingDoctype]);
}

#[test]
fn test_iframe_srcdoc_is_never_quirks() {
    let config = ParserConfig::default().with_iframe_srcdoc(true);
    let mut diagnostics = Vec::new();
    let document = parse_document("<p>x", DomTree::new(), &config, &mut diagnostics).expect("parse failed");
    assert_eq!(document.quirks_mode, QuirksMode::NoQuirks);
    assert!(diagnostics.is_empty());
}

// ========== Scripting flag ==========

#[test]
fn test_noscript_parsed_as_markup_without_scripting() {
    let tree = parse("<body><noscript><p>x</p></noscript>");
    let noscript = find_element(&tree, NodeId::ROOT, "noscript").expect("no noscript");
    assert!(find_element(&tree, noscript, "p").is_some());
}

#[test]
fn test_noscript_is_raw_text_with_scripting() {
    let config = ParserConfig::default().with_scripting(true);
    let tree = parse_with_config("<body><noscript><p>x</p></noscript>", &config).expect("parse failed");
    let noscript = find_element(&tree, NodeId::ROOT, "noscript").expect("no noscript");
    assert_eq!(tree.text_content(noscript), "<p>x</p>");
    assert!(find_element(&tree, NodeId::ROOT, "p").is_none());
}

#[test]
fn test_noscript_in_head_without_scripting() {
    let tree = parse("<head><noscript><link rel=a></noscript></head>");
    let noscript = find_element(&tree, NodeId::ROOT, "noscript").expect("no noscript");
    assert_eq!(tree.parent(noscript), tree.head());
    assert!(find_element(&tree, noscript, "link").is_some());
}

// ========== Diagnostics ==========

#[test]
fn test_well_formed_document_has_no_errors() {
    let (_, errors) = parse_with_errors(
        "<!DOCTYPE html><html><head><title>t</title></head><body><p>x</p></body></html>",
    );
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn test_stray_end_tag_is_reported() {
    let (_, errors) = parse_with_errors("<!DOCTYPE html><p></b>");
    assert_eq!(error_kinds(&errors), vec![ParseErrorKind::UnexpectedEndTag]);
}

#[test]
fn test_errors_from_both_stages_in_order() {
    let (_, errors) = parse_with_errors("<p id=a id=b>\n</span>");
    assert_eq!(
        error_kinds(&errors),
        vec![
            ParseErrorKind::DuplicateAttribute,
            ParseErrorKind::MissingDoctype,
            ParseErrorKind::UnexpectedEndTag,
        ]
    );
    assert_eq!(errors[0].position.line, 1);
    assert_eq!(errors[2].position.line, 2);
}

#[test]
fn test_exact_errors_add_detail() {
    let config = ParserConfig::default().with_exact_errors(true);
    let mut diagnostics = Vec::new();
    let _ = parse_document("<!DOCTYPE html></span>", DomTree::new(), &config, &mut diagnostics)
        .expect("parse failed");
    assert_eq!(diagnostics.len(), 1);
    let detail = diagnostics[0].detail.as_deref().expect("no detail");
    assert!(detail.contains("span"), "detail was {detail}");
}

#[test]
fn test_errors_have_no_detail_by_default() {
    let (_, errors) = parse_with_errors("<!DOCTYPE html></span>");
    assert!(errors.iter().all(|d| d.detail.is_none()));
}

// ========== Limits, cancellation and robustness ==========

#[test]
fn test_open_element_limit() {
    let config = ParserConfig::default().with_max_open_elements(5);
    let result = parse_with_config(&"<div>".repeat(10), &config);
    assert_eq!(
        result.err(),
        Some(HtmlError::ResourceLimit {
            what: "open elements",
            limit: 5,
        })
    );
}

#[test]
fn test_node_limit() {
    let config = ParserConfig::default().with_max_nodes(3);
    let result = parse_with_config("<p>a</p><p>b</p>", &config);
    assert_eq!(
        result.err(),
        Some(HtmlError::ResourceLimit {
            what: "nodes",
            limit: 3,
        })
    );
}

#[test]
fn test_deep_nesting_within_default_limit() {
    let html = "<div>".repeat(1000);
    let tree = parse(&html);
    assert_eq!(tree.get_elements_by_tag_name(NodeId::ROOT, "div").len(), 1000);
}

#[test]
fn test_cancelled_parse() {
    let flag = Arc::new(AtomicBool::new(true));
    let config = ParserConfig::default().with_cancel_flag(flag);
    let result = parse_with_config("<p>never parsed</p>", &config);
    assert_eq!(result.err(), Some(HtmlError::Cancelled));
}

#[test]
fn test_garbage_input_still_parses() {
    let inputs = [
        "</></><<<>>>&&&#;\0<!---->",
        "<table><tr><select><td><svg><math><template></table>",
        "<a><b><c><a><table><a></b></a>",
        "<!DOCTYPE><!DOCTYPE><html><frameset><body></html></body>",
        "\u{FEFF}\u{1}\u{FFFF}<p \0=\"\">",
    ];
    for input in inputs {
        let (document, _) = parse_html(input).expect("parse failed");
        assert!(document.sink.document_element().is_some(), "no html for {input:?}");
    }
}

#[test]
fn test_parsing_is_deterministic() {
    let html = "<table>x<tr><td><b>1<p>2</b>3<svg><path/></svg></table><!--c-->";
    let (first, first_errors) = parse_html(html).expect("parse failed");
    let (second, second_errors) = parse_html(html).expect("parse failed");
    assert_eq!(
        tree_to_string(&first.sink, NodeId::ROOT),
        tree_to_string(&second.sink, NodeId::ROOT)
    );
    assert_eq!(first_errors, second_errors);
}

#[test]
fn test_config_deserializes_with_defaults() {
    let config: ParserConfig =
        serde_json::from_str(r#"{ "scripting": true, "max_nodes": 10 }"#).expect("bad config");
    assert!(config.scripting);
    assert_eq!(config.max_nodes, 10);
    assert_eq!(config.max_open_elements, ParserConfig::default().max_open_elements);
    assert!(!config.is_cancelled());
}

#[test]
fn test_well_formed_round_trip() {
    let (document, errors) = parse_html(
        "<!DOCTYPE html><html><head><title>T</title></head><body><p>Hi</p></body></html>",
    )
    .expect("parse failed");
    let tree = &document.sink;
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(document.quirks_mode, QuirksMode::NoQuirks);
    assert_eq!(tree.get_elements_by_tag_name(NodeId::ROOT, "html").len(), 1);

    let head = tree.head().expect("no head");
    let head_children = tree.children(head);
    assert_eq!(head_children.len(), 1);
    assert_eq!(tree.text_content(head_children[0]), "T");

    let body = tree.body().expect("no body");
    let body_children = tree.children(body);
    assert_eq!(body_children.len(), 1);
    assert!(tree.as_element(body_children[0]).is_some_and(|data| data.is_html("p")));
    assert_eq!(tree.text_content(body_children[0]), "Hi");
}

#[test]
fn test_foster_parenting_formatting_element() {
    assert_eq!(
        body_dump("<table><b>X</table>"),
        "<b>\n  \"X\"\n<table>\n"
    );
}

#[test]
fn test_doctype_identifiers_are_stored() {
    let (document, errors) = parse_html(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
    )
    .expect("parse failed");
    let tree = &document.sink;
    let first = tree.first_child(NodeId::ROOT).expect("empty document");
    let doctype = tree.as_doctype(first).expect("first child is not a doctype");
    assert_eq!(doctype.name, "html");
    assert_eq!(doctype.public_id, "-//W3C//DTD HTML 4.01//EN");
    assert_eq!(doctype.system_id, "http://www.w3.org/TR/html4/strict.dtd");
    assert_eq!(document.quirks_mode, QuirksMode::NoQuirks);
    assert_eq!(error_kinds(&errors), vec![ParseErrorKind::NonConformingDoctype]);
}
