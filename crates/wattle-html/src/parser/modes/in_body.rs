//! [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)

use wattle_common::ParseErrorKind;
use wattle_dom::{Namespace, QuirksMode};

use crate::parser::core::{
    InsertionMode, ProcessResult, TreeBuilder, is_formatting_element, is_special_element, is_whitespace,
};
use crate::parser::foreign_content::{adjust_foreign_attributes, mathml, svg};
use crate::parser::stack::{Scope, is_html_named};
use crate::sink::TreeSink;
use crate::tokenizer::{Token, TokenizerState};

/// "A start tag whose tag name is one of: "address", "article", "aside",
/// "blockquote", "center", "details", "dialog", "dir", "div", "dl",
/// "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main",
/// "menu", "nav", "ol", "p", "search", "section", "summary", "ul""
const BLOCK_START_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div", "dl",
    "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main", "menu", "nav", "ol", "p",
    "search", "section", "summary", "ul",
];

/// "An end tag whose tag name is one of: "address", "article", "aside",
/// "blockquote", "button", "center", "details", "dialog", "dir", "div",
/// "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup",
/// "listing", "main", "menu", "nav", "ol", "pre", "search", "section",
/// "summary", "ul""
const BLOCK_END_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "button", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "listing", "main", "menu",
    "nav", "ol", "pre", "search", "section", "summary", "ul",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Elements that may still be open at the end of the body without a parse
/// error.
const ALLOWED_OPEN_AT_END: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td", "tfoot", "th",
    "thead", "tr", "body", "html",
];

impl<S: TreeSink> TreeBuilder<S> {
    pub(in crate::parser) fn handle_in_body_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorKind::UnexpectedCharacter, token);
            }

            // "Reconstruct the active formatting elements, if any. Insert the
            // token's character."
            Token::Character { data } if is_whitespace(*data) => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
            }

            // "Any other character token"
            // "... Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
                self.frameset_ok = false;
            }

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype, token),

            Token::StartTag { name, .. } => return self.in_body_start_tag(name, token),

            Token::EndTag { name, .. } => return self.in_body_end_tag(name, token),

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If the stack of template insertion modes is not empty, then
                // process the token using the rules for the "in template" insertion
                // mode."
                if !self.template_modes.is_empty() {
                    return ProcessResult::ReprocessUsing(InsertionMode::InTemplate);
                }
                // "Otherwise, follow these steps: If there is a node in the stack of
                // open elements that is not either a dd element, ... then this is a
                // parse error."
                self.check_open_elements_at_end(token);
                // "Stop parsing."
                self.stop_parsing();
            }
        }
        ProcessResult::Done
    }

    fn in_body_start_tag(&mut self, name: &str, token: &Token) -> ProcessResult {
        match name {
            // "A start tag whose tag name is "html""
            "html" => {
                // "Parse error."
                self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
                // "If there is a template element on the stack of open elements,
                // then ignore the token. Otherwise, for each attribute on the
                // token, check to see if the attribute is already present on the
                // top element of the stack of open elements. If it is not, add the
                // attribute and its corresponding value to that element."
                if !self.template_is_open()
                    && let Some(html) = self.open_elements.first()
                {
                    self.sink.add_attrs_if_missing(html, token.attributes().to_vec());
                }
            }

            // "A start tag whose tag name is one of: "base", "basefont", "bgsound",
            // "link", "meta", "noframes", "script", "style", "template", "title""
            // "Process the token using the rules for the "in head" insertion mode."
            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script" | "style"
            | "template" | "title" => return ProcessResult::ReprocessUsing(InsertionMode::InHead),

            // "A start tag whose tag name is "body""
            "body" => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
                // "If the second element on the stack of open elements is not a body
                // element, if the stack of open elements has only one node on it,
                // or if there is a template element on the stack of open elements,
                // then ignore the token. (fragment case or there is a template
                // element on the stack)"
                let Some(body) = self.open_elements.get(1) else {
                    return ProcessResult::Done;
                };
                if !self.node_is(body, "body") || self.template_is_open() {
                    return ProcessResult::Done;
                }
                // "Otherwise, set the frameset-ok flag to "not ok"; then, for each
                // attribute on the token, check to see if the attribute is already
                // present on the body element (the second element) on the stack of
                // open elements, and if it is not, add the attribute and its
                // corresponding value to that element."
                self.frameset_ok = false;
                self.sink.add_attrs_if_missing(body, token.attributes().to_vec());
            }

            // "A start tag whose tag name is "frameset""
            "frameset" => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
                // "If the stack of open elements has only one node on it, or if the
                // second element on the stack of open elements is not a body
                // element, then ignore the token. (fragment case or there is a
                // template element on the stack)"
                let Some(body) = self.open_elements.get(1) else {
                    return ProcessResult::Done;
                };
                if !self.node_is(body, "body") {
                    return ProcessResult::Done;
                }
                // "If the frameset-ok flag is set to "not ok", ignore the token."
                if !self.frameset_ok {
                    return ProcessResult::Done;
                }
                // STEP 1: "Remove the second element on the stack of open elements
                // from its parent node, if it has one."
                self.sink.remove(body);
                // STEP 2: "Pop all the nodes from the bottom of the stack of open
                // elements, from the current node up to, but not including, the root
                // html element."
                self.open_elements.truncate(1);
                // STEP 3: "Insert an HTML element for the token."
                let _ = self.insert_html_element(token);
                // STEP 4: "Switch the insertion mode to "in frameset"."
                self.switch_mode(InsertionMode::InFrameset);
            }

            // "If the stack of open elements has a p element in button scope, then
            // close a p element. Insert an HTML element for the token."
            name if BLOCK_START_TAGS.contains(&name) => {
                self.close_p_element_if_in_button_scope(token);
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5", "h6""
            name if HEADINGS.contains(&name) => {
                self.close_p_element_if_in_button_scope(token);
                // "If the current node is an HTML element whose tag name is one of
                // "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse error;
                // pop the current node off the stack of open elements."
                if self.current_node_is_one_of(HEADINGS) {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
                    let _ = self.pop_current();
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "pre", "listing""
            "pre" | "listing" => {
                self.close_p_element_if_in_button_scope(token);
                let _ = self.insert_html_element(token);
                // "If the next token is a U+000A LINE FEED (LF) character token, then
                // ignore that token and move on to the next one. (Newlines at the
                // start of pre blocks are ignored as an authoring convenience.)"
                self.ignore_next_lf = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "form""
            "form" => {
                // "If the form element pointer is not null, and there is no template
                // element on the stack of open elements, then this is a parse error;
                // ignore the token."
                let template_open = self.template_is_open();
                if self.form_element.is_some() && !template_open {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
                    return ProcessResult::Done;
                }
                // "Otherwise: If the stack of open elements has a p element in button
                // scope, then close a p element. Insert an HTML element for the
                // token, and, if there is no template element on the stack of open
                // elements, set the form element pointer to point to the element
                // created."
                self.close_p_element_if_in_button_scope(token);
                let form = self.insert_html_element(token);
                if !template_open {
                    self.form_element = Some(form);
                }
            }

            // "A start tag whose tag name is "li""
            "li" => self.start_list_item(token, &["li"]),

            // "A start tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => self.start_list_item(token, &["dd", "dt"]),

            // "A start tag whose tag name is "plaintext""
            "plaintext" => {
                self.close_p_element_if_in_button_scope(token);
                let _ = self.insert_html_element(token);
                // "Switch the tokenizer to the PLAINTEXT state."
                self.switch_tokenizer_to(TokenizerState::PLAINTEXT);
            }

            // "A start tag whose tag name is "button""
            "button" => {
                // "1. If the stack of open elements has a button element in scope,
                // then run these substeps: Parse error. Generate implied end tags.
                // Pop elements from the stack of open elements until a button
                // element has been popped from the stack."
                if self.in_scope("button") {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
                    self.generate_implied_end_tags(None);
                    self.pop_until(&["button"]);
                }
                // "2. Reconstruct the active formatting elements, if any.
                // 3. Insert an HTML element for the token.
                // 4. Set the frameset-ok flag to "not ok"."
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "a""
            "a" => {
                // "If the list of active formatting elements contains an a element
                // between the end of the list and the last marker on the list (or
                // the start of the list if there is no marker on the list), then
                // this is a parse error; run the adoption agency algorithm for the
                // token, then remove that element from the list of active formatting
                // elements and the stack of open elements if the adoption agency
                // algorithm didn't already remove it (it might not have if the
                // element is not in table scope)."
                if let Some((_, existing)) = self.active_formatting.last_element_named("a") {
                    self.parse_error(ParseErrorKind::MisnestedFormattingElement, token);
                    let _ = self.run_adoption_agency("a");
                    self.active_formatting.remove(existing);
                    self.open_elements.remove(existing);
                }
                // "Reconstruct the active formatting elements, if any. Insert an HTML
                // element for the token. Push onto the list of active formatting
                // elements that element."
                self.reconstruct_active_formatting_elements();
                let element = self.insert_html_element(token);
                self.active_formatting.push(element, token.clone());
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em",
            // "font", "i", "s", "small", "strike", "strong", "tt", "u""
            "b" | "big" | "code" | "em" | "font" | "i" | "s" | "small" | "strike" | "strong" | "tt" | "u" => {
                self.reconstruct_active_formatting_elements();
                let element = self.insert_html_element(token);
                self.active_formatting.push(element, token.clone());
            }

            // "A start tag whose tag name is "nobr""
            "nobr" => {
                // "Reconstruct the active formatting elements, if any. If the stack
                // of open elements has a nobr element in scope, then this is a parse
                // error; run the adoption agency algorithm for the token, then once
                // again reconstruct the active formatting elements, if any."
                self.reconstruct_active_formatting_elements();
                if self.in_scope("nobr") {
                    self.parse_error(ParseErrorKind::MisnestedFormattingElement, token);
                    let _ = self.run_adoption_agency("nobr");
                    self.reconstruct_active_formatting_elements();
                }
                let element = self.insert_html_element(token);
                self.active_formatting.push(element, token.clone());
            }

            // "A start tag whose tag name is one of: "applet", "marquee", "object""
            // "Reconstruct the active formatting elements, if any. Insert an HTML
            // element for the token. Insert a marker at the end of the list of
            // active formatting elements. Set the frameset-ok flag to "not ok"."
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.active_formatting.insert_marker();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "table""
            "table" => {
                // "If the Document is not set to quirks mode, and the stack of open
                // elements has a p element in button scope, then close a p element."
                if self.quirks_mode != QuirksMode::Quirks {
                    self.close_p_element_if_in_button_scope(token);
                }
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                self.switch_mode(InsertionMode::InTable);
            }

            // "A start tag whose tag name is one of: "area", "br", "embed", "img",
            // "keygen", "wbr""
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.insert_void_element(token);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "input""
            "input" => {
                self.insert_void_element(token);
                // "If the token does not have an attribute with the name "type", or
                // if it does, but that attribute's value is not an ASCII
                // case-insensitive match for the string "hidden", then: set the
                // frameset-ok flag to "not ok"."
                if !token
                    .attribute("type")
                    .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden"))
                {
                    self.frameset_ok = false;
                }
            }

            // "A start tag whose tag name is one of: "param", "source", "track""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements. Acknowledge the token's
            // self-closing flag, if it is set."
            "param" | "source" | "track" => {
                let _ = self.insert_html_element(token);
                let _ = self.pop_current();
                self.acknowledge_self_closing_flag();
            }

            // "A start tag whose tag name is "hr""
            "hr" => {
                self.close_p_element_if_in_button_scope(token);
                let _ = self.insert_html_element(token);
                let _ = self.pop_current();
                self.acknowledge_self_closing_flag();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "image""
            // "Parse error. Change the token's tag name to "img" and reprocess it.
            // (Don't ask.)"
            "image" => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
                if let Token::StartTag {
                    self_closing,
                    attributes,
                    ..
                } = token
                {
                    let img = Token::StartTag {
                        name: "img".to_string(),
                        self_closing: *self_closing,
                        attributes: attributes.clone(),
                    };
                    return self.handle_in_body_mode(&img);
                }
            }

            // "A start tag whose tag name is "textarea""
            "textarea" => {
                // "1. Insert an HTML element for the token.
                // 2. If the next token is a U+000A LINE FEED (LF) character token,
                // then ignore that token and move on to the next one.
                // 3. Switch the tokenizer to the RCDATA state.
                // 4. Set the original insertion mode to the current insertion mode.
                // 5. Set the frameset-ok flag to "not ok".
                // 6. Switch the insertion mode to "text"."
                self.parse_text_element(token, TokenizerState::RCDATA);
                self.ignore_next_lf = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "xmp""
            "xmp" => {
                self.close_p_element_if_in_button_scope(token);
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                self.parse_text_element(token, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "iframe""
            "iframe" => {
                self.frameset_ok = false;
                self.parse_text_element(token, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "noembed"" / "A start tag whose tag
            // name is "noscript", if the scripting flag is enabled"
            // "Follow the generic raw text element parsing algorithm."
            "noembed" => self.parse_text_element(token, TokenizerState::RAWTEXT),
            "noscript" if self.scripting => self.parse_text_element(token, TokenizerState::RAWTEXT),

            // "A start tag whose tag name is "select""
            "select" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                // "If the insertion mode is one of "in table", "in caption", "in
                // table body", "in row", or "in cell", then switch the insertion
                // mode to "in select in table". Otherwise, switch the insertion
                // mode to "in select"."
                let mode = match self.mode {
                    InsertionMode::InTable
                    | InsertionMode::InCaption
                    | InsertionMode::InTableBody
                    | InsertionMode::InRow
                    | InsertionMode::InCell => InsertionMode::InSelectInTable,
                    _ => InsertionMode::InSelect,
                };
                self.switch_mode(mode);
            }

            // "A start tag whose tag name is one of: "optgroup", "option""
            // "If the current node is an option element, then pop the current node
            // off the stack of open elements. Reconstruct the active formatting
            // elements, if any. Insert an HTML element for the token."
            "optgroup" | "option" => {
                if self.current_node_is("option") {
                    let _ = self.pop_current();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "rb", "rtc""
            "rb" | "rtc" => {
                // "If the stack of open elements has a ruby element in scope, then
                // generate implied end tags. If the current node is not now a ruby
                // element, this is a parse error."
                if self.in_scope("ruby") {
                    self.generate_implied_end_tags(None);
                    if !self.current_node_is("ruby") {
                        self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
                    }
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "rp", "rt""
            "rp" | "rt" => {
                // "If the stack of open elements has a ruby element in scope, then
                // generate implied end tags, except for rtc elements. If the current
                // node is not now a rtc element or a ruby element, this is a parse
                // error."
                if self.in_scope("ruby") {
                    self.generate_implied_end_tags(Some("rtc"));
                    if !self.current_node_is_one_of(&["rtc", "ruby"]) {
                        self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
                    }
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is "math""
            "math" => self.insert_foreign_root(token, Namespace::MathMl),

            // "A start tag whose tag name is "svg""
            "svg" => self.insert_foreign_root(token, Namespace::Svg),

            // "A start tag whose tag name is one of: "caption", "col", "colgroup",
            // "frame", "head", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot" | "th" | "thead"
            | "tr" => self.parse_error(ParseErrorKind::UnexpectedStartTag, token),

            // "Any other start tag"
            // "Reconstruct the active formatting elements, if any. Insert an HTML
            // element for the token."
            _ => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }
        }
        ProcessResult::Done
    }

    fn in_body_end_tag(&mut self, name: &str, token: &Token) -> ProcessResult {
        match name {
            // "An end tag whose tag name is "template""
            "template" => return ProcessResult::ReprocessUsing(InsertionMode::InHead),

            // "An end tag whose tag name is "body""
            "body" => {
                // "If the stack of open elements does not have a body element in
                // scope, this is a parse error; ignore the token."
                if !self.in_scope("body") {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                    return ProcessResult::Done;
                }
                self.check_open_elements_at_end(token);
                // "Switch the insertion mode to "after body"."
                self.switch_mode(InsertionMode::AfterBody);
            }

            // "An end tag whose tag name is "html""
            "html" => {
                if !self.in_scope("body") {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                    return ProcessResult::Done;
                }
                self.check_open_elements_at_end(token);
                // "Switch the insertion mode to "after body". Reprocess the token."
                self.switch_mode(InsertionMode::AfterBody);
                return ProcessResult::Reprocess;
            }

            name if BLOCK_END_TAGS.contains(&name) => {
                // "If the stack of open elements does not have an element in scope
                // that is an HTML element with the same tag name as that of the
                // token, then this is a parse error; ignore the token."
                if !self.in_scope(name) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                    return ProcessResult::Done;
                }
                // "1. Generate implied end tags.
                // 2. If the current node is not an HTML element with the same tag
                // name as that of the token, then this is a parse error.
                // 3. Pop elements from the stack of open elements until an HTML
                // element with the same tag name as the token has been popped from
                // the stack."
                self.generate_implied_end_tags(None);
                if !self.current_node_is(name) {
                    self.parse_error(ParseErrorKind::ImplicitlyClosedElement, token);
                }
                self.pop_until(&[name]);
            }

            // "An end tag whose tag name is "form""
            "form" => self.end_form(token),

            // "An end tag whose tag name is "p""
            "p" => {
                // "If the stack of open elements does not have a p element in button
                // scope, then this is a parse error; insert an HTML element for a "p"
                // start tag token with no attributes."
                if !self.in_button_scope("p") {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                    let _ = self.insert_html_element_named("p");
                }
                // "Close a p element."
                self.close_p_element(token);
            }

            // "An end tag whose tag name is "li""
            "li" => {
                // "If the stack of open elements does not have an li element in list
                // item scope, then this is a parse error; ignore the token."
                if !self.in_list_item_scope("li") {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                    return ProcessResult::Done;
                }
                self.generate_implied_end_tags(Some("li"));
                if !self.current_node_is("li") {
                    self.parse_error(ParseErrorKind::ImplicitlyClosedElement, token);
                }
                self.pop_until(&["li"]);
            }

            // "An end tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => {
                if !self.in_scope(name) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                    return ProcessResult::Done;
                }
                self.generate_implied_end_tags(Some(name));
                if !self.current_node_is(name) {
                    self.parse_error(ParseErrorKind::ImplicitlyClosedElement, token);
                }
                self.pop_until(&[name]);
            }

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5", "h6""
            name if HEADINGS.contains(&name) => {
                // "If the stack of open elements does not have an element in scope
                // that is an HTML element and whose tag name is one of "h1", "h2",
                // "h3", "h4", "h5", or "h6", then this is a parse error; ignore the
                // token."
                let any_heading_in_scope = self.open_elements.has_any_in_scope(
                    &self.sink,
                    HEADINGS,
                    Scope::General,
                );
                if !any_heading_in_scope {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                    return ProcessResult::Done;
                }
                self.generate_implied_end_tags(None);
                if !self.current_node_is(name) {
                    self.parse_error(ParseErrorKind::ImplicitlyClosedElement, token);
                }
                // "Pop elements from the stack of open elements until an HTML
                // element whose tag name is one of "h1", "h2", "h3", "h4", "h5", or
                // "h6" has been popped from the stack."
                self.pop_until(HEADINGS);
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code", "em",
            // "font", "i", "nobr", "s", "small", "strike", "strong", "tt", "u""
            // "Run the adoption agency algorithm for the token."
            name if is_formatting_element(name) => {
                if !self.run_adoption_agency(name) {
                    self.any_other_end_tag(name, token);
                }
            }

            // "An end tag token whose tag name is one of: "applet", "marquee", "object""
            "applet" | "marquee" | "object" => {
                if !self.in_scope(name) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                    return ProcessResult::Done;
                }
                self.generate_implied_end_tags(None);
                if !self.current_node_is(name) {
                    self.parse_error(ParseErrorKind::ImplicitlyClosedElement, token);
                }
                self.pop_until(&[name]);
                self.active_formatting.clear_to_last_marker();
            }

            // "An end tag whose tag name is "br""
            // "Parse error. Drop the attributes from the token, and act as
            // described in the next entry; i.e. act as if this was a "br" start
            // tag token with no attributes, rather than the end tag token that it
            // actually is."
            "br" => {
                self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element_named("br");
                let _ = self.pop_current();
                self.frameset_ok = false;
            }

            _ => self.any_other_end_tag(name, token),
        }
        ProcessResult::Done
    }

    /// The "form" end tag, with and without a template on the stack.
    fn end_form(&mut self, token: &Token) {
        if self.template_is_open() {
            // "1. If the stack of open elements does not have a form element in
            // scope, then this is a parse error; return and ignore the token.
            // 2. Generate implied end tags.
            // 3. If the current node is not a form element, then this is a parse
            // error.
            // 4. Pop elements from the stack of open elements until a form
            // element has been popped from the stack."
            if !self.in_scope("form") {
                self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                return;
            }
            self.generate_implied_end_tags(None);
            if !self.current_node_is("form") {
                self.parse_error(ParseErrorKind::ImplicitlyClosedElement, token);
            }
            self.pop_until(&["form"]);
            return;
        }

        // "1. Let node be the element that the form element pointer is set to, or
        // null if it is not set to an element.
        // 2. Set the form element pointer to null.
        // 3. If node is null or the stack of open elements does not have node in
        // scope, then this is a parse error; return and ignore the token."
        let node = self.form_element.take();
        let Some(node) = node.filter(|&node| {
            self.open_elements
                .has_node_in_scope(&self.sink, node, Scope::General)
        }) else {
            self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
            return;
        };
        // "4. Generate implied end tags.
        // 5. If the current node is not node, then this is a parse error.
        // 6. Remove node from the stack of open elements."
        self.generate_implied_end_tags(None);
        if self.current_node() != Some(node) {
            self.parse_error(ParseErrorKind::ImplicitlyClosedElement, token);
        }
        self.open_elements.remove(node);
    }

    /// The shared "li" / "dd" / "dt" start tag steps.
    fn start_list_item(&mut self, token: &Token, closes: &[&str]) {
        // STEP 1: "Set the frameset-ok flag to "not ok"."
        self.frameset_ok = false;

        // STEP 2-5: "Initialize node to be the current node (the bottommost node
        // of the stack). Loop: If node is an li element, then run these substeps:
        // Generate implied end tags, except for li elements. If the current node
        // is not an li element, then this is a parse error. Pop elements from the
        // stack of open elements until an li element has been popped from the
        // stack. Jump to the step labeled done below."
        //
        // "If node is in the special category, but is not an address, div, or p
        // element, then jump to the step labeled done below. Otherwise, set node
        // to the previous entry in the stack of open elements and return to the
        // step labeled loop."
        for index in (0..self.open_elements.len()).rev() {
            let Some(node) = self.open_elements.get(index) else {
                break;
            };
            let Some((namespace, node_name)) = self.sink.element_name(node) else {
                break;
            };
            if namespace == Namespace::Html && closes.contains(&node_name) {
                let node_name = node_name.to_string();
                self.generate_implied_end_tags(Some(&node_name));
                if !self.current_node_is(&node_name) {
                    self.parse_error(ParseErrorKind::ImplicitlyClosedElement, token);
                }
                self.pop_until(&[node_name.as_str()]);
                break;
            }
            if is_special_element(namespace, node_name)
                && !(namespace == Namespace::Html && matches!(node_name, "address" | "div" | "p"))
            {
                break;
            }
        }

        // STEP 6: "Done: If the stack of open elements has a p element in button
        // scope, then close a p element."
        self.close_p_element_if_in_button_scope(token);
        // STEP 7: "Finally, insert an HTML element for the token."
        let _ = self.insert_html_element(token);
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    pub(in crate::parser) fn close_p_element_if_in_button_scope(&mut self, token: &Token) {
        if self.in_button_scope("p") {
            self.close_p_element(token);
        }
    }

    /// Insert, pop, acknowledge the self-closing flag. Used by the void
    /// elements that also reconstruct the active formatting elements.
    fn insert_void_element(&mut self, token: &Token) {
        self.reconstruct_active_formatting_elements();
        let _ = self.insert_html_element(token);
        let _ = self.pop_current();
        self.acknowledge_self_closing_flag();
    }

    /// The "math" and "svg" start tags.
    ///
    /// "Reconstruct the active formatting elements, if any. Adjust MathML
    /// attributes for the token. (This fixes the case of MathML attributes
    /// that are not all lowercase.) Adjust foreign attributes for the token.
    /// (This fixes the use of namespaced attributes, in particular XLink.)
    /// Insert a foreign element for the token, with MathML namespace and
    /// false. If the token has its self-closing flag set, pop the current node
    /// off the stack of open elements and acknowledge the token's self-closing
    /// flag."
    fn insert_foreign_root(&mut self, token: &Token, namespace: Namespace) {
        self.reconstruct_active_formatting_elements();
        let mut attrs = token.attributes().to_vec();
        if namespace == Namespace::MathMl {
            mathml::adjust_mathml_attributes(&mut attrs);
        } else {
            svg::adjust_svg_attributes(&mut attrs);
        }
        adjust_foreign_attributes(&mut attrs);
        let name = token.tag_name().unwrap_or_default();
        let _ = self.insert_element(name, namespace, attrs, false);
        if matches!(
            token,
            Token::StartTag {
                self_closing: true,
                ..
            }
        ) {
            let _ = self.pop_current();
            self.acknowledge_self_closing_flag();
        }
    }

    /// "If there is a node in the stack of open elements that is not either a
    /// dd element, a dt element, an li element, an optgroup element, an option
    /// element, a p element, an rb element, an rp element, an rt element, an
    /// rtc element, a tbody element, a td element, a tfoot element, a th
    /// element, a thead element, a tr element, the body element, or the html
    /// element, then this is a parse error."
    pub(in crate::parser) fn check_open_elements_at_end(&mut self, token: &Token) {
        let unexpected = self
            .open_elements
            .as_slice()
            .iter()
            .any(|&node| !self.node_is_one_of(node, ALLOWED_OPEN_AT_END));
        if unexpected {
            let kind = if token.is_eof() {
                ParseErrorKind::UnexpectedEndOfFile
            } else {
                ParseErrorKind::ImplicitlyClosedElement
            };
            self.parse_error(kind, token);
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "Any other end tag"
    pub(in crate::parser) fn any_other_end_tag(&mut self, name: &str, token: &Token) {
        // STEP 1: "Initialize node to be the current node (the bottommost node of
        // the stack)."
        for index in (0..self.open_elements.len()).rev() {
            let Some(node) = self.open_elements.get(index) else {
                return;
            };
            // STEP 2: "Loop: If node is an HTML element with the same tag name as
            // the token, then: Generate implied end tags, except for HTML elements
            // with the same tag name as the token. If node is not the current node,
            // then this is a parse error. Pop all the nodes from the current node up
            // to node, including node, then stop these steps."
            if is_html_named(&self.sink, node, name) {
                self.generate_implied_end_tags(Some(name));
                if self.current_node() != Some(node) {
                    self.parse_error(ParseErrorKind::ImplicitlyClosedElement, token);
                }
                self.open_elements.pop_until_node(node);
                return;
            }
            // STEP 3: "Otherwise, if node is in the special category, then this is
            // a parse error; ignore the token, and return."
            if let Some((namespace, node_name)) = self.sink.element_name(node)
                && is_special_element(namespace, node_name)
            {
                self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                return;
            }
            // STEP 4: "Set node to the previous entry in the stack of open elements."
        }
    }
}
