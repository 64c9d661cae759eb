//! The table insertion modes: "in table", "in table text", "in caption", "in
//! column group", "in table body", "in row" and "in cell".

use wattle_common::ParseErrorKind;

use crate::parser::core::{InsertionMode, ProcessResult, TreeBuilder, is_whitespace};
use crate::parser::stack::Scope;
use crate::sink::TreeSink;
use crate::tokenizer::Token;

/// "clear the stack back to a table context": "while the current node is not
/// a table, template, or html element, pop elements from the stack of open
/// elements."
const TABLE_CONTEXT: &[&str] = &["table", "template", "html"];

/// "clear the stack back to a table body context"
const TABLE_BODY_CONTEXT: &[&str] = &["tbody", "tfoot", "thead", "template", "html"];

/// "clear the stack back to a table row context"
const TABLE_ROW_CONTEXT: &[&str] = &["tr", "template", "html"];

impl<S: TreeSink> TreeBuilder<S> {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(in crate::parser) fn handle_in_table_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            // "A character token, if the current node is table, tbody, template,
            // tfoot, thead, or tr element"
            Token::Character { .. }
                if self.current_node_is_one_of(&["table", "tbody", "template", "tfoot", "thead", "tr"]) =>
            {
                // "Let the pending table character tokens be an empty list of
                // tokens. Set the original insertion mode to the current insertion
                // mode. Switch the insertion mode to "in table text" and reprocess
                // the token."
                self.pending_table_text.clear();
                self.original_mode = Some(self.mode);
                self.switch_mode(InsertionMode::InTableText);
                return ProcessResult::Reprocess;
            }

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype, token),

            Token::StartTag { name, .. } => match name.as_str() {
                // "Clear the stack back to a table context. Insert a marker at the
                // end of the list of active formatting elements. Insert an HTML
                // element for the token, then switch the insertion mode to "in
                // caption"."
                "caption" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    self.active_formatting.insert_marker();
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InCaption);
                }

                "colgroup" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InColumnGroup);
                }

                // "Clear the stack back to a table context. Insert an HTML element
                // for a "colgroup" start tag token with no attributes, then switch
                // the insertion mode to "in column group". Reprocess the current
                // token."
                "col" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element_named("colgroup");
                    self.switch_mode(InsertionMode::InColumnGroup);
                    return ProcessResult::Reprocess;
                }

                "tbody" | "tfoot" | "thead" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InTableBody);
                }

                "td" | "th" | "tr" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element_named("tbody");
                    self.switch_mode(InsertionMode::InTableBody);
                    return ProcessResult::Reprocess;
                }

                // "A start tag whose tag name is "table""
                "table" => {
                    // "Parse error."
                    self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
                    // "If the stack of open elements does not have a table element
                    // in table scope, ignore the token."
                    if !self.in_table_scope("table") {
                        return ProcessResult::Done;
                    }
                    // "Otherwise: Pop elements from this stack until a table element
                    // has been popped from the stack. Reset the insertion mode
                    // appropriately. Reprocess the token."
                    self.pop_until(&["table"]);
                    self.reset_insertion_mode_appropriately();
                    return ProcessResult::Reprocess;
                }

                "style" | "script" | "template" => return ProcessResult::ReprocessUsing(InsertionMode::InHead),

                // "A start tag whose tag name is "input""
                "input"
                    if token
                        .attribute("type")
                        .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden")) =>
                {
                    // "Parse error. Insert an HTML element for the token. Pop that
                    // input element off the stack of open elements. Acknowledge the
                    // token's self-closing flag, if it is set."
                    self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
                    let _ = self.insert_html_element(token);
                    let _ = self.pop_current();
                    self.acknowledge_self_closing_flag();
                }

                // "A start tag whose tag name is "form""
                "form" => {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
                    // "If there is a template element on the stack of open elements,
                    // or if the form element pointer is not null, ignore the token."
                    if self.template_is_open() || self.form_element.is_some() {
                        return ProcessResult::Done;
                    }
                    // "Otherwise: Insert an HTML element for the token, and set the
                    // form element pointer to point to the element created. Pop that
                    // form element off the stack of open elements."
                    let form = self.insert_html_element(token);
                    self.form_element = Some(form);
                    let _ = self.pop_current();
                }

                _ => return self.in_table_anything_else(token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "table""
                "table" => {
                    if !self.in_table_scope("table") {
                        self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                        return ProcessResult::Done;
                    }
                    self.pop_until(&["table"]);
                    self.reset_insertion_mode_appropriately();
                }

                // "An end tag whose tag name is one of: "body", "caption", "col",
                // "colgroup", "html", "tbody", "td", "tfoot", "th", "thead", "tr""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th"
                | "thead" | "tr" => self.parse_error(ParseErrorKind::UnexpectedEndTag, token),

                "template" => return ProcessResult::ReprocessUsing(InsertionMode::InHead),

                _ => return self.in_table_anything_else(token),
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile => return ProcessResult::ReprocessUsing(InsertionMode::InBody),

            Token::Character { .. } => return self.in_table_anything_else(token),
        }
        ProcessResult::Done
    }

    /// "Anything else" in the "in table" mode.
    ///
    /// "Parse error. Enable foster parenting, process the token using the
    /// rules for the "in body" insertion mode, and then disable foster
    /// parenting."
    fn in_table_anything_else(&mut self, token: &Token) -> ProcessResult {
        let kind = match token {
            Token::StartTag { .. } => ParseErrorKind::UnexpectedStartTag,
            Token::EndTag { .. } => ParseErrorKind::UnexpectedEndTag,
            _ => ParseErrorKind::FosterParentedContent,
        };
        self.parse_error(kind, token);
        self.process_with_foster_parenting(token)
    }

    /// Run the "in body" rules for `token` with foster parenting enabled,
    /// following any "using the rules for" redirections before switching it
    /// off again.
    fn process_with_foster_parenting(&mut self, token: &Token) -> ProcessResult {
        self.foster_parenting = true;
        let mut result = self.handle_in_body_mode(token);
        while let ProcessResult::ReprocessUsing(mode) = result {
            result = self.process_using_mode(mode, token);
        }
        self.foster_parenting = false;
        result
    }

    /// Pop until the current node is one of `context`.
    fn clear_stack_back_to(&mut self, context: &[&str]) {
        self.open_elements
            .pop_until_current_is(&self.sink, context);
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(in crate::parser) fn handle_in_table_text_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorKind::UnexpectedCharacter, token);
            }

            // "Any other character token"
            // "Append the character token to the pending table character tokens
            // list."
            Token::Character { data } => self.pending_table_text.push(*data),

            // "Anything else"
            _ => {
                let pending = core::mem::take(&mut self.pending_table_text);
                // "If any of the tokens in the pending table character tokens list
                // are character tokens that are not ASCII whitespace, then this is a
                // parse error: reprocess the character tokens in the pending table
                // character tokens list using the rules given in the "anything else"
                // entry in the "in table" insertion mode."
                if pending.iter().any(|&c| !is_whitespace(c)) {
                    let first = Token::new_character(pending.first().copied().unwrap_or(' '));
                    self.parse_error(ParseErrorKind::FosterParentedContent, &first);
                    for c in pending {
                        let _ = self.process_with_foster_parenting(&Token::new_character(c));
                    }
                } else {
                    // "Otherwise, insert the characters given by the pending table
                    // character tokens list."
                    for c in pending {
                        self.insert_character(c);
                    }
                }
                // "Switch the insertion mode to the original insertion mode and
                // reprocess the token."
                self.return_to_original_mode();
                return ProcessResult::Reprocess;
            }
        }
        ProcessResult::Done
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(in crate::parser) fn handle_in_caption_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            // "An end tag whose tag name is "caption""
            Token::EndTag { name, .. } if name == "caption" => {
                let _ = self.close_caption(token);
            }

            // "A start tag whose tag name is one of: "caption", "col", "colgroup",
            // "tbody", "td", "tfoot", "th", "thead", "tr"" / "An end tag whose tag
            // name is "table""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                if self.close_caption(token) {
                    return ProcessResult::Reprocess;
                }
            }
            Token::EndTag { name, .. } if name == "table" => {
                if self.close_caption(token) {
                    return ProcessResult::Reprocess;
                }
            }

            // "An end tag whose tag name is one of: "body", "col", "colgroup",
            // "html", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
            }

            _ => return ProcessResult::ReprocessUsing(InsertionMode::InBody),
        }
        ProcessResult::Done
    }

    /// "If the stack of open elements does not have a caption element in table
    /// scope, this is a parse error; ignore the token. (fragment case)
    /// Otherwise: Generate implied end tags. Now, if the current node is not a
    /// caption element, then this is a parse error. Pop elements from this
    /// stack until a caption element has been popped from the stack. Clear the
    /// list of active formatting elements up to the last marker. Switch the
    /// insertion mode to "in table"."
    ///
    /// Returns whether the caption was closed.
    fn close_caption(&mut self, token: &Token) -> bool {
        if !self.in_table_scope("caption") {
            self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
            return false;
        }
        self.generate_implied_end_tags(None);
        if !self.current_node_is("caption") {
            self.parse_error(ParseErrorKind::ImplicitlyClosedElement, token);
        }
        self.pop_until(&["caption"]);
        self.active_formatting.clear_to_last_marker();
        self.switch_mode(InsertionMode::InTable);
        true
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    pub(in crate::parser) fn handle_in_column_group_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Character { data } if is_whitespace(*data) => self.insert_character(*data),

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype, token),

            Token::StartTag { name, .. } if name == "html" => {
                return ProcessResult::ReprocessUsing(InsertionMode::InBody);
            }

            // "A start tag whose tag name is "col""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements. Acknowledge the token's
            // self-closing flag, if it is set."
            Token::StartTag { name, .. } if name == "col" => {
                let _ = self.insert_html_element(token);
                let _ = self.pop_current();
                self.acknowledge_self_closing_flag();
            }

            // "An end tag whose tag name is "colgroup""
            Token::EndTag { name, .. } if name == "colgroup" => {
                // "If the current node is not a colgroup element, then this is a
                // parse error; ignore the token. Otherwise, pop the current node
                // from the stack of open elements. Switch the insertion mode to "in
                // table"."
                if !self.current_node_is("colgroup") {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                    return ProcessResult::Done;
                }
                let _ = self.pop_current();
                self.switch_mode(InsertionMode::InTable);
            }

            Token::EndTag { name, .. } if name == "col" => {
                self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
            }

            Token::StartTag { name, .. } | Token::EndTag { name, .. } if name == "template" => {
                return ProcessResult::ReprocessUsing(InsertionMode::InHead);
            }

            Token::EndOfFile => return ProcessResult::ReprocessUsing(InsertionMode::InBody),

            // "Anything else"
            _ => {
                // "If the current node is not a colgroup element, then this is a
                // parse error; ignore the token. Otherwise, pop the current node from
                // the stack of open elements. Switch the insertion mode to "in
                // table". Reprocess the token."
                if !self.current_node_is("colgroup") {
                    self.parse_error(ParseErrorKind::UnexpectedCharacter, token);
                    return ProcessResult::Done;
                }
                let _ = self.pop_current();
                self.switch_mode(InsertionMode::InTable);
                return ProcessResult::Reprocess;
            }
        }
        ProcessResult::Done
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    pub(in crate::parser) fn handle_in_table_body_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            // "A start tag whose tag name is "tr""
            // "Clear the stack back to a table body context. Insert an HTML element
            // for the token, then switch the insertion mode to "in row"."
            Token::StartTag { name, .. } if name == "tr" => {
                self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                let _ = self.insert_html_element(token);
                self.switch_mode(InsertionMode::InRow);
            }

            // "A start tag whose tag name is one of: "th", "td""
            // "Parse error. Clear the stack back to a table body context. Insert an
            // HTML element for a "tr" start tag token with no attributes, then
            // switch the insertion mode to "in row". Reprocess the current token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
                self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                let _ = self.insert_html_element_named("tr");
                self.switch_mode(InsertionMode::InRow);
                return ProcessResult::Reprocess;
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::EndTag { name, .. } if matches!(name.as_str(), "tbody" | "tfoot" | "thead") => {
                if !self.in_table_scope(name) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                    return ProcessResult::Done;
                }
                self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                let _ = self.pop_current();
                self.switch_mode(InsertionMode::InTable);
            }

            // "A start tag whose tag name is one of: "caption", "col", "colgroup",
            // "tbody", "tfoot", "thead"" / "An end tag whose tag name is "table""
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead") =>
            {
                return self.leave_table_body(token);
            }
            Token::EndTag { name, .. } if name == "table" => return self.leave_table_body(token),

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th", "tr""
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr"
                ) =>
            {
                self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
            }

            _ => return ProcessResult::ReprocessUsing(InsertionMode::InTable),
        }
        ProcessResult::Done
    }

    /// "If the stack of open elements does not have a tbody, thead, or tfoot
    /// element in table scope, this is a parse error; ignore the token.
    /// Otherwise: Clear the stack back to a table body context. Pop the current
    /// node from the stack of open elements. Switch the insertion mode to "in
    /// table". Reprocess the token."
    fn leave_table_body(&mut self, token: &Token) -> ProcessResult {
        if !self
            .open_elements
            .has_any_in_scope(&self.sink, &["tbody", "thead", "tfoot"], Scope::Table)
        {
            self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
            return ProcessResult::Done;
        }
        self.clear_stack_back_to(TABLE_BODY_CONTEXT);
        let _ = self.pop_current();
        self.switch_mode(InsertionMode::InTable);
        ProcessResult::Reprocess
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    pub(in crate::parser) fn handle_in_row_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            // "A start tag whose tag name is one of: "th", "td""
            // "Clear the stack back to a table row context. Insert an HTML element
            // for the token, then switch the insertion mode to "in cell". Insert a
            // marker at the end of the list of active formatting elements."
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.clear_stack_back_to(TABLE_ROW_CONTEXT);
                let _ = self.insert_html_element(token);
                self.switch_mode(InsertionMode::InCell);
                self.active_formatting.insert_marker();
            }

            // "An end tag whose tag name is "tr""
            Token::EndTag { name, .. } if name == "tr" => {
                let _ = self.close_row(token);
            }

            // "A start tag whose tag name is one of: "caption", "col", "colgroup",
            // "tbody", "tfoot", "thead", "tr"" / "An end tag whose tag name is
            // "table""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr"
                ) =>
            {
                if self.close_row(token) {
                    return ProcessResult::Reprocess;
                }
            }
            Token::EndTag { name, .. } if name == "table" => {
                if self.close_row(token) {
                    return ProcessResult::Reprocess;
                }
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::EndTag { name, .. } if matches!(name.as_str(), "tbody" | "tfoot" | "thead") => {
                // "If the stack of open elements does not have an element in table
                // scope that is an HTML element with the same tag name as the token,
                // this is a parse error; ignore the token."
                if !self.in_table_scope(name) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                    return ProcessResult::Done;
                }
                // "If the stack of open elements does not have a tr element in table
                // scope, ignore the token."
                if !self.in_table_scope("tr") {
                    return ProcessResult::Done;
                }
                if self.close_row(token) {
                    return ProcessResult::Reprocess;
                }
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th""
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th"
                ) =>
            {
                self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
            }

            _ => return ProcessResult::ReprocessUsing(InsertionMode::InTable),
        }
        ProcessResult::Done
    }

    /// "If the stack of open elements does not have a tr element in table
    /// scope, this is a parse error; ignore the token. Otherwise: Clear the
    /// stack back to a table row context. Pop the current node (which will be a
    /// tr element) from the stack of open elements. Switch the insertion mode
    /// to "in table body"."
    ///
    /// Returns whether the row was closed.
    fn close_row(&mut self, token: &Token) -> bool {
        if !self.in_table_scope("tr") {
            self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
            return false;
        }
        self.clear_stack_back_to(TABLE_ROW_CONTEXT);
        let _ = self.pop_current();
        self.switch_mode(InsertionMode::InTableBody);
        true
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    pub(in crate::parser) fn handle_in_cell_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            // "An end tag whose tag name is one of: "td", "th""
            Token::EndTag { name, .. } if matches!(name.as_str(), "td" | "th") => {
                // "If the stack of open elements does not have an element in table
                // scope that is an HTML element with the same tag name as that of
                // the token, then this is a parse error; ignore the token."
                if !self.in_table_scope(name) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                    return ProcessResult::Done;
                }
                // "Otherwise: Generate implied end tags. Now, if the current node is
                // not an HTML element with the same tag name as the token, then this
                // is a parse error. Pop elements from the stack of open elements
                // until an HTML element with the same tag name as the token has been
                // popped from the stack. Clear the list of active formatting
                // elements up to the last marker. Switch the insertion mode to "in
                // row"."
                self.generate_implied_end_tags(None);
                if !self.current_node_is(name) {
                    self.parse_error(ParseErrorKind::ImplicitlyClosedElement, token);
                }
                self.pop_until(&[name.as_str()]);
                self.active_formatting.clear_to_last_marker();
                self.switch_mode(InsertionMode::InRow);
            }

            // "A start tag whose tag name is one of: "caption", "col", "colgroup",
            // "tbody", "td", "tfoot", "th", "thead", "tr""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                // "Assert: The stack of open elements has a td or th element in
                // table scope." In the fragment case it may not.
                if !self
                    .open_elements
                    .has_any_in_scope(&self.sink, &["td", "th"], Scope::Table)
                {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
                    return ProcessResult::Done;
                }
                // "Close the cell and reprocess the token."
                self.close_the_cell(token);
                return ProcessResult::Reprocess;
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html""
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "body" | "caption" | "col" | "colgroup" | "html") =>
            {
                self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
            }

            // "An end tag whose tag name is one of: "table", "tbody", "tfoot",
            // "thead", "tr""
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "table" | "tbody" | "tfoot" | "thead" | "tr") =>
            {
                // "If the stack of open elements does not have an element in table
                // scope that is an HTML element with the same tag name as that of
                // the token, then this is a parse error; ignore the token.
                // Otherwise, close the cell and reprocess the token."
                if !self.in_table_scope(name) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                    return ProcessResult::Done;
                }
                self.close_the_cell(token);
                return ProcessResult::Reprocess;
            }

            _ => return ProcessResult::ReprocessUsing(InsertionMode::InBody),
        }
        ProcessResult::Done
    }
}
