//! [§ 13.2.6.4.7 The adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)

use log::debug;
use wattle_common::ParseErrorKind;
use wattle_dom::Namespace;

use super::core::{TreeBuilder, is_special_element};
use super::stack::Scope;
use crate::sink::TreeSink;
use crate::tokenizer::Token;

impl<S: TreeSink> TreeBuilder<S> {
    /// Run the adoption agency algorithm for a token whose tag name is
    /// `subject`.
    ///
    /// Returns `false` when the caller must instead "act as described in the
    /// "any other end tag" entry".
    pub(super) fn run_adoption_agency(&mut self, subject: &str) -> bool {
        let token = Token::EndTag {
            name: subject.to_string(),
            self_closing: false,
            attributes: Vec::new(),
        };

        // STEP 2: "If the current node is an HTML element whose tag name is
        // subject, and the current node is not in the list of active formatting
        // elements, then pop the current node off the stack of open elements and
        // return."
        if let Some(current) = self.current_node()
            && self.node_is(current, subject)
            && !self.active_formatting.contains(current)
        {
            let _ = self.pop_current();
            return true;
        }

        // STEP 3-4: "Let outerLoopCounter be 0. While true:"
        for _ in 0..8 {
            // STEP 4.3: "Let formattingElement be the last element in the list of
            // active formatting elements that: is between the end of the list and
            // the last marker in the list, if any, or the start of the list
            // otherwise, and has the tag name subject. If there is no such
            // element, then return and instead act as described in the "any other
            // end tag" entry above."
            let Some((formatting_index, formatting_element)) =
                self.active_formatting.last_element_named(subject)
            else {
                return false;
            };

            // STEP 4.4: "If formattingElement is not in the stack of open elements,
            // then this is a parse error; remove the element from the list, and
            // return."
            let Some(formatting_stack_index) = self.open_elements.position(formatting_element) else {
                self.parse_error(ParseErrorKind::MisnestedFormattingElement, &token);
                self.active_formatting.remove_at(formatting_index);
                return true;
            };

            // STEP 4.5: "If formattingElement is in the stack of open elements, but
            // the element is not in scope, then this is a parse error; return."
            if !self
                .open_elements
                .has_node_in_scope(&self.sink, formatting_element, Scope::General)
            {
                self.parse_error(ParseErrorKind::MisnestedFormattingElement, &token);
                return true;
            }

            // STEP 4.6: "If formattingElement is not the current node, this is a
            // parse error. (But do not return.)"
            if self.current_node() != Some(formatting_element) {
                self.parse_error(ParseErrorKind::MisnestedFormattingElement, &token);
            }

            // STEP 4.7: "Let furthestBlock be the topmost node in the stack of open
            // elements that is lower in the stack than formattingElement, and is an
            // element in the special category. There might not be one."
            let furthest_block = (formatting_stack_index + 1..self.open_elements.len()).find_map(|index| {
                let node = self.open_elements.get(index)?;
                let (namespace, name) = self.sink.element_name(node)?;
                is_special_element(namespace, name).then_some((index, node))
            });

            // STEP 4.8: "If there is no furthestBlock, then the UA must first pop
            // all the nodes from the bottom of the stack of open elements, from the
            // current node up to and including formattingElement, then remove
            // formattingElement from the list of active formatting elements, and
            // finally return."
            let Some((furthest_block_index, furthest_block)) = furthest_block else {
                self.open_elements.truncate(formatting_stack_index);
                self.active_formatting.remove_at(formatting_index);
                return true;
            };

            // STEP 4.9: "Let commonAncestor be the element immediately above
            // formattingElement in the stack of open elements."
            let Some(common_ancestor) = formatting_stack_index
                .checked_sub(1)
                .and_then(|index| self.open_elements.get(index))
            else {
                return true;
            };

            // STEP 4.10: "Let a bookmark note the position of formattingElement in
            // the list of active formatting elements relative to the elements on
            // either side of it in the list."
            let mut bookmark = formatting_index;

            // STEP 4.11: "Let node and lastNode be furthestBlock."
            let mut node_index = furthest_block_index;
            let mut last_node = furthest_block;

            // STEP 4.12-13: "Let innerLoopCounter be 0. While true:"
            let mut inner_loop_counter = 0;
            loop {
                // STEP 4.13.1: "Increment innerLoopCounter by 1."
                inner_loop_counter += 1;

                // STEP 4.13.2: "Let node be the element immediately above node in
                // the stack of open elements, or if node is no longer in the stack
                // of open elements (e.g. because it got removed by this algorithm),
                // the element that was immediately above node in the stack of open
                // elements before node was removed."
                node_index -= 1;
                let Some(node) = self.open_elements.get(node_index) else {
                    break;
                };

                // STEP 4.13.3: "If node is formattingElement, then break."
                if node == formatting_element {
                    break;
                }

                // STEP 4.13.4: "If innerLoopCounter is greater than 3 and node is in
                // the list of active formatting elements, then remove node from the
                // list of active formatting elements."
                let mut node_formatting_index = self.active_formatting.position(node);
                if inner_loop_counter > 3
                    && let Some(index) = node_formatting_index.take()
                {
                    self.active_formatting.remove_at(index);
                    if index < bookmark {
                        bookmark -= 1;
                    }
                }

                // STEP 4.13.5: "If node is not in the list of active formatting
                // elements, then remove node from the stack of open elements and
                // continue."
                let Some(node_formatting_index) = node_formatting_index else {
                    self.open_elements.remove(node);
                    continue;
                };

                // STEP 4.13.6: "Create an element for the token for which the
                // element node was created, in the HTML namespace, with
                // commonAncestor as the intended parent; replace the entry for node
                // in the list of active formatting elements with an entry for the
                // new element, replace the entry for node in the stack of open
                // elements with an entry for the new element, and let node be the
                // new element."
                let Some(node_token) = self
                    .active_formatting
                    .get(node_formatting_index)
                    .and_then(|entry| entry.token())
                    .cloned()
                else {
                    break;
                };
                let new_element = self.create_element(
                    node_token.tag_name().unwrap_or_default(),
                    Namespace::Html,
                    node_token.attributes().to_vec(),
                );
                self.active_formatting
                    .replace_node(node_formatting_index, new_element);
                self.open_elements.replace(node, new_element);
                let node = new_element;

                // STEP 4.13.7: "If lastNode is furthestBlock, then move the
                // aforementioned bookmark to be immediately after the new node in
                // the list of active formatting elements."
                if last_node == furthest_block {
                    bookmark = node_formatting_index + 1;
                }

                // STEP 4.13.8: "Append lastNode to node."
                self.sink.append_child(node, last_node);

                // STEP 4.13.9: "Set lastNode to node."
                last_node = node;
            }

            // STEP 4.14: "Insert whatever lastNode ended up being in the previous
            // step at the appropriate place for inserting a node, but using
            // commonAncestor as the override target."
            let place = self.appropriate_place(Some(common_ancestor));
            self.insert_node_at(place, last_node);

            // STEP 4.15: "Create an element for the token for which
            // formattingElement was created, in the HTML namespace, with
            // furthestBlock as the intended parent."
            let Some(formatting_index) = self.active_formatting.position(formatting_element) else {
                return true;
            };
            let Some(formatting_token) = self
                .active_formatting
                .get(formatting_index)
                .and_then(|entry| entry.token())
                .cloned()
            else {
                return true;
            };
            let new_element = self.create_element(
                formatting_token.tag_name().unwrap_or_default(),
                Namespace::Html,
                formatting_token.attributes().to_vec(),
            );

            // STEP 4.16: "Take all of the child nodes of furthestBlock and append
            // them to the element created in the last step."
            self.sink.reparent_children(furthest_block, new_element);

            // STEP 4.17: "Append that new element to furthestBlock."
            self.sink.append_child(furthest_block, new_element);

            // STEP 4.18: "Remove formattingElement from the list of active
            // formatting elements, and insert the new element into the list of
            // active formatting elements at the position of the aforementioned
            // bookmark."
            self.active_formatting.remove_at(formatting_index);
            if formatting_index < bookmark {
                bookmark -= 1;
            }
            self.active_formatting
                .insert_at(bookmark, new_element, formatting_token);

            // STEP 4.19: "Remove formattingElement from the stack of open elements,
            // and insert the new element into the stack of open elements
            // immediately below the position of furthestBlock in that stack."
            self.open_elements.remove(formatting_element);
            let below_furthest_block = self
                .open_elements
                .position(furthest_block)
                .map_or(self.open_elements.len(), |index| index + 1);
            self.open_elements.insert(below_furthest_block, new_element);
        }

        debug!("adoption agency gave up on </{subject}> after 8 iterations");
        true
    }
}
