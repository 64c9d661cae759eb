//! [§ 13.2.3 The input stream](https://html.spec.whatwg.org/multipage/parsing.html#the-input-byte-stream)
//!
//! The character cursor the tokenizer and the character reference resolver
//! read from. Decoding bytes to characters happens before this point; the
//! stream starts from a `&str`.

use wattle_common::{Diagnostic, ParseErrorKind, SourcePosition};

/// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
///
/// "The input stream consists of the characters pushed into it as the input
/// byte stream is decoded or from the various APIs that directly manipulate
/// the input stream."
pub struct InputStream {
    chars: Vec<char>,
    /// Index of the next character `consume` returns.
    pos: usize,
    /// Offsets at which each line starts.
    line_starts: Vec<usize>,
    /// Characters below this offset were already checked for stream errors.
    checked_up_to: usize,
    /// Diagnostics waiting to be drained by the tokenizer.
    pending: Vec<Diagnostic>,
}

impl InputStream {
    /// "Before the tokenization stage, the input stream must be preprocessed
    /// by normalizing newlines. Thus, newlines in HTML DOMs are represented by
    /// U+000A LF characters, and there are never any U+000D CR characters in
    /// the input to the tokenization stage."
    #[must_use]
    pub fn new(input: &str) -> Self {
        let mut chars = Vec::with_capacity(input.len());
        let mut iter = input.chars().peekable();
        while let Some(c) = iter.next() {
            if c == '\r' {
                // "replace every U+000D CR U+000A LF code point pair with a
                // single U+000A LF code point, then replace every remaining
                // U+000D CR code point with a U+000A LF code point."
                if iter.peek() == Some(&'\n') {
                    let _ = iter.next();
                }
                chars.push('\n');
            } else {
                chars.push(c);
            }
        }

        let line_starts = core::iter::once(0)
            .chain(
                chars
                    .iter()
                    .enumerate()
                    .filter(|&(_, &c)| c == '\n')
                    .map(|(i, _)| i + 1),
            )
            .collect();

        Self {
            chars,
            pos: 0,
            line_starts,
            checked_up_to: 0,
            pending: Vec::new(),
        }
    }

    /// "Consume the next input character". `None` is EOF.
    pub fn consume(&mut self) -> Option<char> {
        let c = *self.chars.get(self.pos)?;
        if self.pos >= self.checked_up_to {
            self.checked_up_to = self.pos + 1;
            self.check_stream_character(c);
        }
        self.pos += 1;
        Some(c)
    }

    /// Push the most recently consumed character back.
    pub const fn unconsume(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    /// Move back `n` characters.
    pub const fn unconsume_n(&mut self, n: usize) {
        self.pos = self.pos.saturating_sub(n);
    }

    /// Look at the character `offset` positions ahead of the next one without
    /// consuming anything.
    #[must_use]
    pub fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    /// Consume `n` characters that the caller has already matched by peeking.
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            if self.consume().is_none() {
                break;
            }
        }
    }

    /// "If the next few characters are..." (case-sensitive)
    #[must_use]
    pub fn next_few_characters_are(&self, target: &str) -> bool {
        target
            .chars()
            .enumerate()
            .all(|(i, expected)| self.peek(i) == Some(expected))
    }

    /// "an ASCII case-insensitive match for the word ..."
    #[must_use]
    pub fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        target
            .chars()
            .enumerate()
            .all(|(i, expected)| self.peek(i).is_some_and(|c| c.eq_ignore_ascii_case(&expected)))
    }

    /// Whether every character has been consumed.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Position of the character most recently consumed (the "current input
    /// character"), or of the end of input at EOF.
    #[must_use]
    pub fn current_position(&self) -> SourcePosition {
        self.position_of(self.pos.saturating_sub(1))
    }

    /// Line and column of an offset into the normalized input.
    #[must_use]
    pub fn position_of(&self, offset: usize) -> SourcePosition {
        let line_index = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts.get(line_index).copied().unwrap_or(0);
        SourcePosition::new(line_index + 1, offset - line_start + 1, offset)
    }

    /// Record a parse error at the current position.
    pub fn report(&mut self, kind: ParseErrorKind) {
        let position = self.current_position();
        self.pending.push(Diagnostic::new(kind, position));
    }

    /// Hand over the diagnostics produced since the last call.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        core::mem::take(&mut self.pending)
    }

    /// [§ 13.2.3.5](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
    ///
    /// "Any occurrences of surrogates are surrogate-in-input-stream parse
    /// errors. Any occurrences of noncharacters are noncharacter-in-input-stream
    /// parse errors and any occurrences of controls other than ASCII whitespace
    /// and U+0000 NULL characters are control-character-in-input-stream parse
    /// errors."
    ///
    /// A `char` can never hold a surrogate, so that case cannot arise from
    /// `&str` input.
    fn check_stream_character(&mut self, c: char) {
        let kind = if is_noncharacter(c as u32) {
            ParseErrorKind::NoncharacterInInputStream
        } else if is_control(c as u32) && !is_ascii_whitespace(c as u32) && c != '\0' {
            ParseErrorKind::ControlCharacterInInputStream
        } else {
            return;
        };
        let position = self.position_of(self.pos);
        self.pending.push(Diagnostic::new(kind, position));
    }
}

/// [Infra: noncharacter](https://infra.spec.whatwg.org/#noncharacter)
///
/// "A noncharacter is a code point that is in the range U+FDD0 to U+FDEF,
/// inclusive, or U+FFFE, U+FFFF, U+1FFFE, U+1FFFF, ... U+10FFFE, or U+10FFFF."
pub(crate) const fn is_noncharacter(cp: u32) -> bool {
    matches!(cp, 0xFDD0..=0xFDEF) || (cp & 0xFFFE) == 0xFFFE
}

/// [Infra: control](https://infra.spec.whatwg.org/#control)
///
/// "A C0 control is a code point in the range U+0000 NULL to U+001F
/// INFORMATION SEPARATOR ONE, inclusive. A control is a C0 control or a code
/// point in the range U+007F DELETE to U+009F APPLICATION PROGRAM COMMAND,
/// inclusive."
pub(crate) const fn is_control(cp: u32) -> bool {
    cp <= 0x1F || matches!(cp, 0x7F..=0x9F)
}

/// "ASCII whitespace is U+0009 TAB, U+000A LF, U+000C FF, U+000D CR, or U+0020 SPACE."
pub(crate) const fn is_ascii_whitespace(cp: u32) -> bool {
    matches!(cp, 0x09 | 0x0A | 0x0C | 0x0D | 0x20)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(input: &mut InputStream) -> String {
        core::iter::from_fn(|| input.consume()).collect()
    }

    #[test]
    fn test_newlines_are_normalized() {
        let mut input = InputStream::new("a\r\nb\rc\n");
        assert_eq!(drain(&mut input), "a\nb\nc\n");
    }

    #[test]
    fn test_positions_track_lines() {
        let mut input = InputStream::new("ab\ncd");
        input.advance(4);
        let pos = input.current_position();
        assert_eq!((pos.line, pos.column, pos.offset), (2, 1, 3));
    }

    #[test]
    fn test_unconsume_and_peek() {
        let mut input = InputStream::new("xyz");
        assert_eq!(input.consume(), Some('x'));
        input.unconsume();
        assert_eq!(input.peek(0), Some('x'));
        assert_eq!(input.peek(2), Some('z'));
        assert_eq!(input.peek(3), None);
        assert!(input.next_few_characters_are("xy"));
        assert!(!input.next_few_characters_are("xyzw"));
        input.advance(3);
        assert!(input.is_at_end());
        assert_eq!(input.consume(), None);
    }

    #[test]
    fn test_case_insensitive_lookahead() {
        let input = InputStream::new("DocType html");
        assert!(input.next_few_characters_are_case_insensitive("DOCTYPE"));
        assert!(!input.next_few_characters_are("DOCTYPE"));
    }

    #[test]
    fn test_stream_errors_reported_once_per_position() {
        let mut input = InputStream::new("a\u{1}\u{FDD0}");
        let _ = drain(&mut input);
        input.unconsume_n(3);
        let _ = drain(&mut input);

        let kinds: Vec<ParseErrorKind> = input
            .take_diagnostics()
            .into_iter()
            .map(|d| d.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ParseErrorKind::ControlCharacterInInputStream,
                ParseErrorKind::NoncharacterInInputStream,
            ]
        );
    }

    #[test]
    fn test_null_and_whitespace_are_not_stream_errors() {
        let mut input = InputStream::new("\0\t\n\u{C} ");
        let _ = drain(&mut input);
        assert!(input.take_diagnostics().is_empty());
    }
}
