//! Character reference resolution.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! The character reference states of the tokenizer (character reference,
//! named, ambiguous ampersand and the numeric family) are collapsed into
//! [`resolve`], which the data, RCDATA and attribute value states call after
//! consuming a `&`. The emitted text and the reported errors match what the
//! state-by-state machine produces.

use wattle_common::ParseErrorKind;

use super::input::{InputStream, is_ascii_whitespace, is_control, is_noncharacter};
use super::named_character_references::{LONGEST_ENTITY_NAME, any_entity_has_prefix, lookup_entity};

/// Resolve the character reference that starts right after a `&` the caller
/// already consumed.
///
/// Returns the text the reference stands for and leaves the cursor after it.
/// Returns `None` without consuming anything when there is no reference; the
/// caller then treats the `&` as a literal and continues in its own state.
///
/// `additional_allowed` is a character that, when it directly follows the
/// `&`, means "not a character reference" (the closing quote of an attribute
/// value). `in_attribute` enables the historical rule that leaves
/// `&copy=` style text alone inside attribute values.
pub fn resolve(
    input: &mut InputStream,
    additional_allowed: Option<char>,
    in_attribute: bool,
) -> Option<String> {
    match input.peek(0) {
        Some(c) if Some(c) == additional_allowed => None,
        // "ASCII alphanumeric: Reconsume in the named character reference state."
        Some(c) if c.is_ascii_alphanumeric() => resolve_named(input, in_attribute),
        // "U+0023 NUMBER SIGN (#): Append the current input character to the
        // temporary buffer. Switch to the numeric character reference state."
        Some('#') => resolve_numeric(input),
        // "Anything else: Flush code points consumed as a character reference.
        // Reconsume in the return state."
        _ => None,
    }
}

/// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
fn resolve_named(input: &mut InputStream, in_attribute: bool) -> Option<String> {
    // "Consume the maximum number of characters possible, where the consumed
    // characters are one of the identifiers in the first column of the named
    // character references table."
    let mut candidate = String::new();
    let mut best: Option<(usize, &'static str)> = None;
    for offset in 0..*LONGEST_ENTITY_NAME {
        let Some(c) = input.peek(offset) else { break };
        if !(c.is_ascii_alphanumeric() || c == ';') {
            break;
        }
        candidate.push(c);
        if !any_entity_has_prefix(&candidate) {
            break;
        }
        if let Some(value) = lookup_entity(&candidate) {
            best = Some((candidate.len(), value));
        }
        if c == ';' {
            break;
        }
    }

    let Some((length, value)) = best else {
        // "Otherwise: Flush code points consumed as a character reference.
        // Switch to the ambiguous ampersand state."
        report_ambiguous_ampersand(input);
        return None;
    };

    let matched: String = candidate.chars().take(length).collect();
    let ends_with_semicolon = matched.ends_with(';');

    // "If the character reference was consumed as part of an attribute, and
    // the last character matched is not a U+003B SEMICOLON character (;), and
    // the next input character is either a U+003D EQUALS SIGN character (=) or
    // an ASCII alphanumeric, then, for historical reasons, flush code points
    // consumed as a character reference and switch to the return state."
    if in_attribute && !ends_with_semicolon {
        let next = input.peek(length);
        if next.is_some_and(|c| c == '=' || c.is_ascii_alphanumeric()) {
            input.advance(length);
            return Some(format!("&{matched}"));
        }
    }

    input.advance(length);

    // "If the last character matched is not a U+003B SEMICOLON character (;),
    // then this is a missing-semicolon-after-character-reference parse error."
    if !ends_with_semicolon {
        input.report(ParseErrorKind::MissingSemicolonAfterCharacterReference);
    }
    Some(value.to_string())
}

/// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
///
/// The alphanumerics after the `&` are ordinary text, so nothing is consumed
/// here. Only the error is reported: "U+003B SEMICOLON (;): This is an
/// unknown-named-character-reference parse error."
fn report_ambiguous_ampersand(input: &mut InputStream) {
    let mut offset = 0;
    while input.peek(offset).is_some_and(|c| c.is_ascii_alphanumeric()) {
        offset += 1;
    }
    if offset > 0 && input.peek(offset) == Some(';') {
        // Report at the semicolon, where the state machine would notice it.
        input.advance(offset + 1);
        input.report(ParseErrorKind::UnknownNamedCharacterReference);
        input.unconsume_n(offset + 1);
    }
}

/// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
/// through
/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
fn resolve_numeric(input: &mut InputStream) -> Option<String> {
    // "Set the character reference code to zero (0)."
    let mut code: u32 = 0;

    let _ = input.consume(); // '#'
    let mut consumed = 1;

    // "U+0078 LATIN SMALL LETTER X / U+0058 LATIN CAPITAL LETTER X: Append the
    // current input character to the temporary buffer. Switch to the
    // hexadecimal character reference start state."
    let radix = if matches!(input.peek(0), Some('x' | 'X')) {
        let _ = input.consume();
        consumed += 1;
        16
    } else {
        10
    };

    let mut digits = 0;
    while let Some(digit) = input.peek(0).and_then(|c| c.to_digit(radix)) {
        let _ = input.consume();
        digits += 1;
        // Saturate well above the largest code point so huge inputs cannot overflow.
        code = code.saturating_mul(radix).saturating_add(digit).min(0x0011_0000);
    }

    if digits == 0 {
        // "This is an absence-of-digits-in-numeric-character-reference parse
        // error. Flush code points consumed as a character reference.
        // Reconsume in the return state."
        input.report(ParseErrorKind::AbsenceOfDigitsInNumericCharacterReference);
        input.unconsume_n(consumed);
        return None;
    }

    // "U+003B SEMICOLON: Switch to the numeric character reference end state."
    // "Anything else: This is a missing-semicolon-after-character-reference
    // parse error. Reconsume in the numeric character reference end state."
    if input.peek(0) == Some(';') {
        let _ = input.consume();
    } else {
        input.report(ParseErrorKind::MissingSemicolonAfterCharacterReference);
    }

    Some(numeric_reference_end(input, code).to_string())
}

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
fn numeric_reference_end(input: &mut InputStream, code: u32) -> char {
    // "If the number is 0x00, then this is a null-character-reference parse
    // error. Set the character reference code to 0xFFFD."
    if code == 0 {
        input.report(ParseErrorKind::NullCharacterReference);
        return '\u{FFFD}';
    }
    // "If the number is greater than 0x10FFFF, then this is a
    // character-reference-outside-unicode-range parse error."
    if code > 0x0010_FFFF {
        input.report(ParseErrorKind::CharacterReferenceOutsideUnicodeRange);
        return '\u{FFFD}';
    }
    // "If the number is a surrogate, then this is a
    // surrogate-character-reference parse error."
    if (0xD800..=0xDFFF).contains(&code) {
        input.report(ParseErrorKind::SurrogateCharacterReference);
        return '\u{FFFD}';
    }
    // "If the number is a noncharacter, then this is a
    // noncharacter-character-reference parse error."
    if is_noncharacter(code) {
        input.report(ParseErrorKind::NoncharacterCharacterReference);
    }
    // "If the number is 0x0D, or a control that's not ASCII whitespace, then
    // this is a control-character-reference parse error. If the number is one
    // of the numbers in the first column of the following table, then find the
    // row with that number in the first column, and set the character reference
    // code to the number in the second column of that row."
    if code == 0x0D || (is_control(code) && !is_ascii_whitespace(code)) {
        input.report(ParseErrorKind::ControlCharacterReference);
        if let Some(replacement) = c1_replacement(code) {
            return replacement;
        }
    }
    char::from_u32(code).unwrap_or('\u{FFFD}')
}

/// The Windows-1252 reinterpretation of C1 controls.
const fn c1_replacement(code: u32) -> Option<char> {
    Some(match code {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => return None,
    })
}
