//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Reconsume in")
//! - Input handling and parse error reporting
//! - Token emission ("Emit the current token")
//! - Attribute helpers for duplicate detection
//! - Character reference hand-off

use wattle_common::{Diagnostic, ParseErrorKind};

use super::character_reference;
use super::core::{DoctypeIdentifier, HTMLTokenizer, TokenizerState};
use super::token::{Attribute, Token};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Reconsume in the X state"
    ///
    /// Transitions to a new state without consuming the current character.
    /// The same character will be processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Consume the next input character"
    ///
    /// Input stream errors for the character are collected as it is consumed.
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input.consume();
        self.drain_input_diagnostics();
        c
    }

    /// Move diagnostics reported by the input stream (stream errors and
    /// character reference errors) into the tokenizer's list.
    pub(super) fn drain_input_diagnostics(&mut self) {
        self.diagnostics.extend(self.input.take_diagnostics());
    }

    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Record a parse error at the current input character.
    pub(super) fn parse_error(&mut self, kind: ParseErrorKind) {
        let position = self.input.current_position();
        self.diagnostics.push(Diagnostic::new(kind, position));
    }

    /// "U+0009 CHARACTER TABULATION (tab), U+000A LINE FEED (LF), U+000C FORM FEED (FF),
    /// U+0020 SPACE"
    ///
    /// CR never reaches the tokenizer; the input stream normalizes it away.
    pub(super) const fn is_whitespace_char(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\x0C' | ' ')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Emit the current token"
    ///
    /// A pending attribute is attached first. End tags that carry attributes or
    /// a self-closing flag are parse errors; the flag and attributes are kept
    /// on the token and the tree builder ignores them.
    pub(super) fn emit_current_token(&mut self) {
        self.finalize_attribute();
        let Some(token) = self.current_token.take() else {
            return;
        };
        match &token {
            // "the last start tag token emitted"
            Token::StartTag { name, .. } => self.last_start_tag_name = Some(name.clone()),
            // "When an end tag token is emitted with attributes, that is an
            // end-tag-with-attributes parse error. When an end tag token is emitted
            // with its self-closing flag set, that is an end-tag-with-trailing-solidus
            // parse error."
            Token::EndTag {
                attributes,
                self_closing,
                ..
            } => {
                if !attributes.is_empty() {
                    self.parse_error(ParseErrorKind::EndTagWithAttributes);
                }
                if *self_closing {
                    self.parse_error(ParseErrorKind::EndTagWithTrailingSolidus);
                }
            }
            _ => {}
        }
        self.pending_tokens.push_back(token);
    }

    /// "Emit the current input character as a character token."
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.pending_tokens.push_back(Token::new_character(c));
    }

    /// "This is an unexpected-null-character parse error. Emit a U+FFFD
    /// REPLACEMENT CHARACTER character token."
    pub(super) fn emit_replacement_character(&mut self) {
        self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
        self.emit_character_token('\u{FFFD}');
    }

    /// "Emit an end-of-file token."
    pub(super) fn emit_eof_token(&mut self) {
        self.pending_tokens.push_back(Token::EndOfFile);
        self.at_eof = true;
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any. If no start tag has been emitted from this tokenizer,
    /// then no end tag token is appropriate."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        match (&self.current_token, &self.last_start_tag_name) {
            (Some(Token::EndTag { name, .. }), Some(last)) => name == last,
            _ => false,
        }
    }

    /// The "anything else" branch shared by the end tag name states: the
    /// would-be end tag turns back into text.
    pub(super) fn emit_end_tag_name_anything_else(&mut self, text_state: TokenizerState) {
        self.current_token = None;
        self.emit_character_token('<');
        self.emit_character_token('/');
        let buffer = core::mem::take(&mut self.temporary_buffer);
        for c in buffer.chars() {
            self.emit_character_token(c);
        }
        self.reconsume_in(text_state);
    }

    /// "EOF - This is an eof-in-tag parse error. Emit an end-of-file token."
    ///
    /// The unfinished tag is dropped.
    pub(super) fn eof_in_tag(&mut self) {
        self.parse_error(ParseErrorKind::EofInTag);
        self.current_token = None;
        self.current_attribute = None;
        self.emit_eof_token();
    }
}

// =============================================================================
// Comment and DOCTYPE Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Append ... to the comment token's data."
    pub(super) fn append_to_comment(&mut self, s: &str) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_comment(s);
        }
    }

    /// "EOF - This is an eof-in-comment parse error. Emit the current comment
    /// token. Emit an end-of-file token."
    pub(super) fn eof_in_comment(&mut self) {
        self.parse_error(ParseErrorKind::EofInComment);
        self.emit_current_token();
        self.emit_eof_token();
    }

    /// "Set the current DOCTYPE token's force-quirks flag to on."
    pub(super) fn set_force_quirks(&mut self) {
        if let Some(token) = self.current_token.as_mut() {
            token.set_force_quirks();
        }
    }

    /// "Set the current DOCTYPE token's force-quirks flag to on. Switch to the
    /// data state. Emit the current DOCTYPE token."
    pub(super) fn emit_doctype_with_force_quirks(&mut self) {
        self.set_force_quirks();
        self.switch_to(TokenizerState::Data);
        self.emit_current_token();
    }

    /// "EOF - This is an eof-in-doctype parse error. Set the current DOCTYPE
    /// token's force-quirks flag to on. Emit the current DOCTYPE token. Emit an
    /// end-of-file token."
    pub(super) fn eof_in_doctype(&mut self) {
        self.parse_error(ParseErrorKind::EofInDoctype);
        self.set_force_quirks();
        self.emit_current_token();
        self.emit_eof_token();
    }

    /// "Set the current DOCTYPE token's public identifier to the empty string
    /// (not missing), then switch to the DOCTYPE public identifier
    /// (double-quoted) state."
    pub(super) fn start_doctype_identifier(&mut self, which: DoctypeIdentifier, quote: char) {
        if let Some(token) = self.current_token.as_mut() {
            match which {
                DoctypeIdentifier::Public => token.set_public_identifier_empty(),
                DoctypeIdentifier::System => token.set_system_identifier_empty(),
            }
        }
        self.switch_to(which.quoted_state(quote));
    }

    pub(super) fn append_to_doctype_identifier(&mut self, which: DoctypeIdentifier, c: char) {
        if let Some(token) = self.current_token.as_mut() {
            match which {
                DoctypeIdentifier::Public => token.append_to_public_identifier(c),
                DoctypeIdentifier::System => token.append_to_system_identifier(c),
            }
        }
    }
}

// =============================================================================
// Attribute Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Start a new attribute in the current tag token."
    ///
    /// The previous attribute, if any, is complete at this point.
    pub(super) fn start_new_attribute(&mut self) {
        self.finalize_attribute();
        self.current_attribute = Some(Attribute::new(String::new(), String::new()));
        self.current_attribute_is_duplicate = false;
    }

    pub(super) fn append_to_attribute_name(&mut self, c: char) {
        if let Some(attribute) = self.current_attribute.as_mut() {
            attribute.name.push(c);
        }
    }

    pub(super) fn append_to_attribute_value(&mut self, c: char) {
        if let Some(attribute) = self.current_attribute.as_mut() {
            attribute.value.push(c);
        }
    }

    fn append_str_to_attribute_value(&mut self, s: &str) {
        if let Some(attribute) = self.current_attribute.as_mut() {
            attribute.value.push_str(s);
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "When the user agent leaves the attribute name state (and before emitting
    /// the tag token, if appropriate), the complete attribute's name must be
    /// compared to the other attributes on the same token; if there is already
    /// an attribute on the token with the exact same name, then this is a
    /// duplicate-attribute parse error and the new attribute must be removed
    /// from the token."
    ///
    /// The value is still consumed into the duplicate, which is then dropped
    /// by [`Self::finalize_attribute`].
    pub(super) fn check_duplicate_attribute(&mut self) {
        let (Some(attribute), Some(token)) = (&self.current_attribute, &self.current_token) else {
            return;
        };
        if token.has_attribute_named(&attribute.name) {
            self.current_attribute_is_duplicate = true;
            self.parse_error(ParseErrorKind::DuplicateAttribute);
        }
    }

    /// Attach the attribute under construction to the current tag token,
    /// unless it was a duplicate.
    pub(super) fn finalize_attribute(&mut self) {
        let Some(attribute) = self.current_attribute.take() else {
            return;
        };
        if core::mem::take(&mut self.current_attribute_is_duplicate) {
            return;
        }
        if let Some(token) = self.current_token.as_mut() {
            token.push_attribute(attribute);
        }
    }
}

// =============================================================================
// Character Reference Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// Called from the data and RCDATA states with the `&` consumed. The
    /// resolved text is emitted as character tokens; with no reference the
    /// `&` is emitted as-is.
    pub(super) fn consume_character_reference_as_text(&mut self) {
        let resolved = character_reference::resolve(&mut self.input, None, false);
        self.drain_input_diagnostics();
        match resolved {
            Some(text) => {
                for c in text.chars() {
                    self.emit_character_token(c);
                }
            }
            None => self.emit_character_token('&'),
        }
    }

    /// "If the return state is attribute value (double-quoted), attribute value
    /// (single-quoted), or attribute value (unquoted), append the code points
    /// to the current attribute's value."
    pub(super) fn consume_character_reference_in_attribute(&mut self, additional_allowed: Option<char>) {
        let resolved = character_reference::resolve(&mut self.input, additional_allowed, true);
        self.drain_input_diagnostics();
        match resolved {
            Some(text) => self.append_str_to_attribute_value(&text),
            None => self.append_to_attribute_value('&'),
        }
    }
}
