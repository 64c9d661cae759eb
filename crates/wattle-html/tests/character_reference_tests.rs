//! Integration tests for character references: the named table and how the
//! tokenizer resolves named and numeric references in text and attributes.

use wattle_common::ParseErrorKind;
use wattle_html::tokenizer::named_character_references::{any_entity_has_prefix, lookup_entity};
use wattle_html::{HTMLTokenizer, Token};

/// Helper to tokenize text and return it with the parse error kinds
fn resolve_text(input: &str) -> (String, Vec<ParseErrorKind>) {
    let mut tokenizer = HTMLTokenizer::new(input);
    let text = tokenizer
        .by_ref()
        .filter_map(|t| match t {
            Token::Character { data } => Some(data),
            _ => None,
        })
        .collect();
    let kinds = tokenizer.take_diagnostics().iter().map(|d| d.kind).collect();
    (text, kinds)
}

/// Helper to get the value of `attr` on the first tag in `input`
fn attribute_value(input: &str, attr: &str) -> (String, Vec<ParseErrorKind>) {
    let mut tokenizer = HTMLTokenizer::new(input);
    let first = tokenizer.next_token();
    let value = first
        .attribute(attr)
        .unwrap_or_else(|| panic!("no {attr} attribute in {first:?}"))
        .to_string();
    let kinds = tokenizer.take_diagnostics().iter().map(|d| d.kind).collect();
    (value, kinds)
}

// ========== Table lookup ==========

#[test]
fn test_lookup_common_entities() {
    assert_eq!(lookup_entity("amp;"), Some("&"));
    assert_eq!(lookup_entity("lt;"), Some("<"));
    assert_eq!(lookup_entity("gt;"), Some(">"));
    assert_eq!(lookup_entity("quot;"), Some("\""));
    assert_eq!(lookup_entity("nbsp;"), Some("\u{00A0}"));
}

#[test]
fn test_lookup_legacy_entities() {
    // Legacy entities without semicolon
    assert_eq!(lookup_entity("amp"), Some("&"));
    assert_eq!(lookup_entity("lt"), Some("<"));
    assert_eq!(lookup_entity("copy"), Some("\u{A9}"));
    // Only the legacy names have a semicolon-less form
    assert_eq!(lookup_entity("hellip"), None);
    assert_eq!(lookup_entity("hellip;"), Some("\u{2026}"));
}

#[test]
fn test_lookup_is_case_sensitive() {
    assert_eq!(lookup_entity("AMP;"), Some("&"));
    assert_eq!(lookup_entity("Amp;"), None);
    assert_eq!(lookup_entity("AElig;"), Some("\u{C6}"));
}

#[test]
fn test_lookup_multi_code_point_entities() {
    assert_eq!(lookup_entity("NotEqualTilde;"), Some("\u{2242}\u{338}"));
    assert_eq!(lookup_entity("acE;"), Some("\u{223E}\u{333}"));
}

#[test]
fn test_lookup_unknown_entity() {
    assert_eq!(lookup_entity("notarealentity;"), None);
    assert_eq!(lookup_entity(""), None);
}

#[test]
fn test_prefix_matching() {
    assert!(any_entity_has_prefix("a")); // amp, apos, alpha, etc.
    assert!(any_entity_has_prefix("am")); // amp
    assert!(any_entity_has_prefix("amp")); // amp, amp;
    assert!(any_entity_has_prefix("amp;")); // amp;
    assert!(!any_entity_has_prefix("ampx")); // nothing
    assert!(!any_entity_has_prefix("xyz")); // nothing
}

// ========== Named references in text ==========

#[test]
fn test_named_reference_in_text() {
    let (text, errors) = resolve_text("a &lt;b&gt; &amp; c");
    assert_eq!(text, "a <b> & c");
    assert!(errors.is_empty());
}

#[test]
fn test_legacy_reference_without_semicolon() {
    let (text, errors) = resolve_text("&amp b");
    assert_eq!(text, "& b");
    assert_eq!(errors, vec![ParseErrorKind::MissingSemicolonAfterCharacterReference]);
}

#[test]
fn test_longest_match_wins() {
    let (text, errors) = resolve_text("&notin;");
    assert_eq!(text, "\u{2209}");
    assert!(errors.is_empty());
}

#[test]
fn test_legacy_prefix_of_longer_name() {
    // "not" is a legacy name; "notit;" is not in the table.
    let (text, errors) = resolve_text("I'm &notit; I tell you");
    assert_eq!(text, "I'm \u{AC}it; I tell you");
    assert_eq!(errors, vec![ParseErrorKind::MissingSemicolonAfterCharacterReference]);
}

#[test]
fn test_multi_code_point_reference() {
    let (text, _) = resolve_text("&NotEqualTilde;");
    assert_eq!(text, "\u{2242}\u{338}");
}

#[test]
fn test_unknown_named_reference_with_semicolon() {
    let (text, errors) = resolve_text("&xyzzy;");
    assert_eq!(text, "&xyzzy;");
    assert_eq!(errors, vec![ParseErrorKind::UnknownNamedCharacterReference]);
}

#[test]
fn test_unknown_named_reference_without_semicolon() {
    let (text, errors) = resolve_text("&xyzzy here");
    assert_eq!(text, "&xyzzy here");
    assert!(errors.is_empty());
}

#[test]
fn test_wrong_case_is_not_a_reference() {
    let (text, errors) = resolve_text("&Amp;");
    assert_eq!(text, "&Amp;");
    assert_eq!(errors, vec![ParseErrorKind::UnknownNamedCharacterReference]);
}

#[test]
fn test_bare_ampersand() {
    let (text, errors) = resolve_text("fish & chips &");
    assert_eq!(text, "fish & chips &");
    assert!(errors.is_empty());
}

// ========== Numeric references ==========

#[test]
fn test_decimal_and_hex_references() {
    let (text, errors) = resolve_text("&#65;&#x42;&#X63;");
    assert_eq!(text, "ABc");
    assert!(errors.is_empty());
}

#[test]
fn test_numeric_reference_without_semicolon() {
    let (text, errors) = resolve_text("&#65b");
    assert_eq!(text, "Ab");
    assert_eq!(errors, vec![ParseErrorKind::MissingSemicolonAfterCharacterReference]);
}

#[test]
fn test_numeric_reference_without_digits() {
    let (text, errors) = resolve_text("&#;&#x;");
    assert_eq!(text, "&#;&#x;");
    assert_eq!(
        errors,
        vec![
            ParseErrorKind::AbsenceOfDigitsInNumericCharacterReference,
            ParseErrorKind::AbsenceOfDigitsInNumericCharacterReference,
        ]
    );
}

#[test]
fn test_null_reference() {
    let (text, errors) = resolve_text("&#0;");
    assert_eq!(text, "\u{FFFD}");
    assert_eq!(errors, vec![ParseErrorKind::NullCharacterReference]);
}

#[test]
fn test_reference_outside_unicode_range() {
    let (text, errors) = resolve_text("&#x110000;&#99999999999999;");
    assert_eq!(text, "\u{FFFD}\u{FFFD}");
    assert_eq!(
        errors,
        vec![
            ParseErrorKind::CharacterReferenceOutsideUnicodeRange,
            ParseErrorKind::CharacterReferenceOutsideUnicodeRange,
        ]
    );
}

#[test]
fn test_surrogate_reference() {
    let (text, errors) = resolve_text("&#xD800;");
    assert_eq!(text, "\u{FFFD}");
    assert_eq!(errors, vec![ParseErrorKind::SurrogateCharacterReference]);
}

#[test]
fn test_noncharacter_reference_is_kept() {
    let (text, errors) = resolve_text("&#xFFFF;");
    assert_eq!(text, "\u{FFFF}");
    assert_eq!(errors, vec![ParseErrorKind::NoncharacterCharacterReference]);
}

#[test]
fn test_c1_control_references_use_windows_1252() {
    let (text, errors) = resolve_text("&#128;&#x99;&#x9F;");
    assert_eq!(text, "\u{20AC}\u{2122}\u{0178}");
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|&k| k == ParseErrorKind::ControlCharacterReference));
}

#[test]
fn test_unmapped_c1_control_reference() {
    let (text, errors) = resolve_text("&#x81;");
    assert_eq!(text, "\u{81}");
    assert_eq!(errors, vec![ParseErrorKind::ControlCharacterReference]);
}

#[test]
fn test_whitespace_references_are_not_errors() {
    let (text, errors) = resolve_text("&#9;&#10;&#32;");
    assert_eq!(text, "\t\n ");
    assert!(errors.is_empty());
}

// ========== References in attribute values ==========

#[test]
fn test_reference_in_attribute_value() {
    let (value, errors) = attribute_value(r#"<a title="Tom &amp; Jerry">"#, "title");
    assert_eq!(value, "Tom & Jerry");
    assert!(errors.is_empty());
}

#[test]
fn test_reference_in_unquoted_attribute_value() {
    let (value, _) = attribute_value("<a title=&lt;&gt;>", "title");
    assert_eq!(value, "<>");
}

#[test]
fn test_legacy_reference_followed_by_equals_in_attribute() {
    // Query strings keep their text for historical reasons.
    let (value, errors) = attribute_value(r#"<a href="?x=1&copy=2">"#, "href");
    assert_eq!(value, "?x=1&copy=2");
    assert!(errors.is_empty());
}

#[test]
fn test_legacy_reference_followed_by_alphanumeric_in_attribute() {
    let (value, errors) = attribute_value(r#"<a href="?&copyright">"#, "href");
    assert_eq!(value, "?&copyright");
    assert!(errors.is_empty());
}

#[test]
fn test_legacy_reference_in_text_is_resolved() {
    // The same input in text is a reference.
    let (text, errors) = resolve_text("&copy=2");
    assert_eq!(text, "\u{A9}=2");
    assert_eq!(errors, vec![ParseErrorKind::MissingSemicolonAfterCharacterReference]);
}

#[test]
fn test_legacy_reference_followed_by_space_in_attribute() {
    let (value, errors) = attribute_value(r#"<p title="&copy 2024">"#, "title");
    assert_eq!(value, "\u{A9} 2024");
    assert_eq!(errors, vec![ParseErrorKind::MissingSemicolonAfterCharacterReference]);
}

#[test]
fn test_ampersand_before_closing_quote() {
    let (value, errors) = attribute_value(r#"<a title="a&">"#, "title");
    assert_eq!(value, "a&");
    assert!(errors.is_empty());
}

#[test]
fn test_numeric_reference_in_attribute() {
    let (value, _) = attribute_value("<a title='&#x263A;'>", "title");
    assert_eq!(value, "\u{263A}");
}
