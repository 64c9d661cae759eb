//! [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)

use wattle_common::ParseErrorKind;

use crate::parser::core::{InsertionMode, ProcessResult, TreeBuilder};
use crate::sink::TreeSink;
use crate::tokenizer::Token;

impl<S: TreeSink> TreeBuilder<S> {
    /// Content of `script`, `style`, `title`, `textarea` and the other raw
    /// text elements. The tokenizer only ever produces characters and the
    /// matching end tag here.
    pub(in crate::parser) fn handle_text_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            // "A character token"
            // "Insert the token's character."
            Token::Character { data } => self.insert_character(*data),

            // "An end-of-file token"
            // "Parse error. If the current node is a script element, then set its
            // already started to true. Pop the current node off the stack of open
            // elements. Switch the insertion mode to the original insertion mode
            // and reprocess the token."
            Token::EndOfFile => {
                self.parse_error(ParseErrorKind::UnexpectedEndOfFile, token);
                let _ = self.pop_current();
                self.return_to_original_mode();
                return ProcessResult::Reprocess;
            }

            // "An end tag whose tag name is "script"" and "Any other end tag"
            // "Pop the current node off the stack of open elements. Switch the
            // insertion mode to the original insertion mode."
            //
            // Scripts are never executed, so the script end tag needs nothing more.
            Token::EndTag { .. } => {
                let _ = self.pop_current();
                self.return_to_original_mode();
            }

            Token::Doctype { .. } | Token::StartTag { .. } | Token::Comment { .. } => {}
        }
        ProcessResult::Done
    }

    pub(in crate::parser) fn return_to_original_mode(&mut self) {
        let mode = self.original_mode.take().unwrap_or(InsertionMode::InBody);
        self.switch_mode(mode);
    }
}
