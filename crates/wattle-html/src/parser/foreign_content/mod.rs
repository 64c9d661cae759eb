//! Foreign content parsing support for SVG and MathML.
//!
//! [§ 13.2.6.3 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

pub mod mathml;
pub mod svg;

use wattle_common::ParseErrorKind;
use wattle_dom::Namespace;

use super::core::{ProcessResult, TreeBuilder, is_whitespace};
use crate::sink::TreeSink;
use crate::tokenizer::{Attribute, Token};

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// "When the steps below require the user agent to adjust foreign attributes
/// for a token, then, if any of the attributes on the token match the strings
/// in the first column of the following table, let the attribute be a namespaced
/// attribute, with the prefix being the string in the second column, the local
/// name being the string in the third column, and the namespace being the
/// namespace in the fourth column."
const FOREIGN_ATTRIBUTE_ADJUSTMENTS: &[(&str, Option<&str>, &str, Namespace)] = &[
    ("xlink:actuate", Some("xlink"), "actuate", Namespace::XLink),
    ("xlink:arcrole", Some("xlink"), "arcrole", Namespace::XLink),
    ("xlink:href", Some("xlink"), "href", Namespace::XLink),
    ("xlink:role", Some("xlink"), "role", Namespace::XLink),
    ("xlink:show", Some("xlink"), "show", Namespace::XLink),
    ("xlink:title", Some("xlink"), "title", Namespace::XLink),
    ("xlink:type", Some("xlink"), "type", Namespace::XLink),
    ("xml:lang", Some("xml"), "lang", Namespace::Xml),
    ("xml:space", Some("xml"), "space", Namespace::Xml),
    ("xmlns", None, "xmlns", Namespace::XmlNs),
    ("xmlns:xlink", Some("xmlns"), "xlink", Namespace::XmlNs),
];

/// Apply the foreign attribute table to `attributes` in place.
pub fn adjust_foreign_attributes(attributes: &mut [Attribute]) {
    for attr in &mut *attributes {
        if let Some(&(_, prefix, local, namespace)) = FOREIGN_ATTRIBUTE_ADJUSTMENTS
            .iter()
            .find(|(qualified, ..)| *qualified == attr.name)
        {
            attr.name = local.to_string();
            attr.prefix = prefix.map(str::to_string);
            attr.namespace = Some(namespace);
        }
    }
}

/// "A start tag whose tag name is one of: "b", "big", "blockquote", "body",
/// "br", "center", "code", "dd", "div", "dl", "dt", "em", "embed", "h1",
/// "h2", "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing",
/// "menu", "meta", "nobr", "ol", "p", "pre", "ruby", "s", "small", "span",
/// "strong", "strike", "sub", "sup", "table", "tt", "u", "ul", "var""
const BREAKOUT_START_TAGS: &[&str] = &[
    "b", "big", "blockquote", "body", "br", "center", "code", "dd", "div", "dl", "dt", "em", "embed", "h1",
    "h2", "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing", "menu", "meta", "nobr", "ol",
    "p", "pre", "ruby", "s", "small", "span", "strong", "strike", "sub", "sup", "table", "tt", "u", "ul",
    "var",
];

/// Whether `token` leaves foreign content and goes back to the HTML rules.
fn breaks_out_of_foreign_content(token: &Token) -> bool {
    match token {
        Token::StartTag { name, .. } if BREAKOUT_START_TAGS.contains(&name.as_str()) => true,
        // "A start tag whose tag name is "font", if the token has any attributes
        // named "color", "face", or "size""
        Token::StartTag { name, .. } if name == "font" => ["color", "face", "size"]
            .iter()
            .any(|attr| token.attribute(attr).is_some()),
        // "An end tag whose tag name is "br", "p""
        Token::EndTag { name, .. } => matches!(name.as_str(), "br" | "p"),
        _ => false,
    }
}

impl<S: TreeSink> TreeBuilder<S> {
    /// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    pub(in crate::parser) fn process_foreign_content(&mut self, token: &Token) -> ProcessResult {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Insert a U+FFFD REPLACEMENT CHARACTER character."
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorKind::UnexpectedCharacter, token);
                self.insert_character('\u{FFFD}');
            }

            Token::Character { data } if is_whitespace(*data) => self.insert_character(*data),

            // "Any other character token"
            // "Insert the token's character. Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.insert_character(*data);
                self.frameset_ok = false;
            }

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype, token),

            _ if breaks_out_of_foreign_content(token) => {
                // "Parse error."
                let kind = if matches!(token, Token::EndTag { .. }) {
                    ParseErrorKind::UnexpectedEndTag
                } else {
                    ParseErrorKind::UnexpectedStartTag
                };
                self.parse_error(kind, token);

                // "While the current node is not a MathML text integration point, an
                // HTML integration point, or an element in the HTML namespace, pop
                // elements from the stack of open elements."
                while let Some(current) = self.current_node() {
                    let is_html = matches!(self.sink.element_name(current), Some((Namespace::Html, _)));
                    if is_html
                        || self.is_mathml_text_integration_point(current)
                        || self.is_html_integration_point(current)
                    {
                        break;
                    }
                    let _ = self.pop_current();
                }

                // "Reprocess the token according to the rules given in the section
                // corresponding to the current insertion mode in HTML content."
                return ProcessResult::ReprocessUsing(self.mode);
            }

            Token::StartTag { .. } => self.foreign_start_tag(token),

            Token::EndTag { name, .. } => return self.foreign_end_tag(name, token),

            Token::EndOfFile => return ProcessResult::ReprocessUsing(self.mode),
        }
        ProcessResult::Done
    }

    /// "Any other start tag" in foreign content.
    fn foreign_start_tag(&mut self, token: &Token) {
        let Some(namespace) = self
            .adjusted_current_node()
            .and_then(|node| self.sink.element_name(node))
            .map(|(namespace, _)| namespace)
        else {
            return;
        };

        let mut attrs = token.attributes().to_vec();
        let mut name = token.tag_name().unwrap_or_default();

        // "If the adjusted current node is an element in the MathML namespace,
        // adjust MathML attributes for the token."
        //
        // "If the adjusted current node is an element in the SVG namespace, and
        // the token's tag name is one of the ones in the first column of the
        // following table, change the tag name to the name given in the
        // corresponding cell in the second column. If the adjusted current node
        // is an element in the SVG namespace, adjust SVG attributes for the
        // token."
        match namespace {
            Namespace::MathMl => mathml::adjust_mathml_attributes(&mut attrs),
            Namespace::Svg => {
                name = svg::adjust_svg_tag_name(name);
                svg::adjust_svg_attributes(&mut attrs);
            }
            _ => {}
        }

        // "Adjust foreign attributes for the token."
        adjust_foreign_attributes(&mut attrs);

        // "Insert a foreign element for the token, with adjusted current node's
        // namespace and false."
        let _ = self.insert_element(name, namespace, attrs, false);

        // "If the token has its self-closing flag set, then run the appropriate
        // steps from the following list:
        // If the token's tag name is "script", and the new current node is in the
        // SVG namespace: Acknowledge the token's self-closing flag, and then act
        // as described in the steps for a "script" end tag below.
        // Otherwise: Pop the current node off the stack of open elements and
        // acknowledge the token's self-closing flag."
        //
        // Both branches pop, since scripts are never run.
        if let Token::StartTag {
            self_closing: true, ..
        } = token
        {
            let _ = self.pop_current();
            self.acknowledge_self_closing_flag();
        }
    }

    /// "An end tag whose tag name is "script", if the current node is an SVG
    /// script element" and "Any other end tag" in foreign content.
    fn foreign_end_tag(&mut self, name: &str, token: &Token) -> ProcessResult {
        // "Pop the current node off the stack of open elements." Scripts are
        // never run.
        if name == "script"
            && let Some(current) = self.current_node()
            && matches!(self.sink.element_name(current), Some((Namespace::Svg, "script")))
        {
            let _ = self.pop_current();
            return ProcessResult::Done;
        }

        // STEP 1: "Initialize node to be the current node (the bottommost node of
        // the stack)."
        let Some(mut index) = self.open_elements.len().checked_sub(1) else {
            return ProcessResult::Done;
        };

        // STEP 2: "If node's tag name, converted to ASCII lowercase, is not the
        // same as the tag name of the token, then this is a parse error."
        let matches_token = |builder: &Self, node: S::Handle| {
            builder
                .sink
                .element_name(node)
                .is_some_and(|(_, node_name)| node_name.eq_ignore_ascii_case(name))
        };
        if let Some(current) = self.current_node()
            && !matches_token(self, current)
        {
            self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
        }

        loop {
            // STEP 3: "Loop: If node is the topmost element in the stack of open
            // elements, then return. (fragment case)"
            if index == 0 {
                return ProcessResult::Done;
            }
            let Some(node) = self.open_elements.get(index) else {
                return ProcessResult::Done;
            };

            // STEP 4: "If node's tag name, converted to ASCII lowercase, is the same
            // as the tag name of the token, pop elements from the stack of open
            // elements until node has been popped from the stack, and then return."
            if matches_token(self, node) {
                self.open_elements.pop_until_node(node);
                return ProcessResult::Done;
            }

            // STEP 5: "Set node to the previous entry in the stack of open elements."
            index -= 1;
            let Some(node) = self.open_elements.get(index) else {
                return ProcessResult::Done;
            };

            // STEP 6: "If node is not an element in the HTML namespace, return to
            // the step labeled loop."
            if matches!(self.sink.element_name(node), Some((Namespace::Html, _))) {
                // STEP 7: "Otherwise, process the token according to the rules given
                // in the section corresponding to the current insertion mode in HTML
                // content."
                return ProcessResult::ReprocessUsing(self.mode);
            }
        }
    }
}

