//! Integration tests for the HTML tokenizer.

use wattle_common::{Diagnostic, ParseErrorKind};
use wattle_html::{HTMLTokenizer, Token, TokenizerState};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    HTMLTokenizer::new(input).collect()
}

/// Helper to tokenize a string and also return the parse errors
fn tokenize_with_errors(input: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut tokenizer = HTMLTokenizer::new(input);
    let tokens: Vec<Token> = tokenizer.by_ref().collect();
    (tokens, tokenizer.take_diagnostics())
}

/// Helper to tokenize the contents of a raw text element: the tokenizer is
/// put in `state` the way the tree builder would after `<tag>`.
fn tokenize_text(tag: &str, state: TokenizerState, content: &str) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new(content);
    tokenizer.set_last_start_tag(Some(tag));
    tokenizer.switch_to(state);
    tokenizer.collect()
}

/// Helper to collect all character tokens into a string
fn text_of(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::Character { data } => Some(*data),
            _ => None,
        })
        .collect()
}

fn error_kinds(errors: &[Diagnostic]) -> Vec<ParseErrorKind> {
    errors.iter().map(|d| d.kind).collect()
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + EOF
    assert!(matches!(tokens[0], Token::Character { data: 'H' }));
    assert!(matches!(tokens[4], Token::Character { data: 'o' }));
    assert!(matches!(tokens[5], Token::EndOfFile));
}

#[test]
fn test_empty_input_is_just_eof() {
    let tokens = tokenize("");
    assert_eq!(tokens, vec![Token::EndOfFile]);
}

#[test]
fn test_next_token_repeats_eof() {
    let mut tokenizer = HTMLTokenizer::new("x");
    assert_eq!(tokenizer.next_token(), Token::Character { data: 'x' });
    assert!(tokenizer.next_token().is_eof());
    assert!(tokenizer.next_token().is_eof());
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2); // DOCTYPE + EOF
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert!(public_identifier.is_none());
            assert!(system_identifier.is_none());
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_is_case_insensitive() {
    let tokens = tokenize("<!doctype HTML>");
    assert!(matches!(&tokens[0], Token::Doctype { name: Some(n), .. } if n == "html"));
}

#[test]
fn test_doctype_public_and_system_identifiers() {
    let tokens = tokenize(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" 'http://www.w3.org/TR/html4/strict.dtd'>"#,
    );
    match &tokens[0] {
        Token::Doctype {
            public_identifier,
            system_identifier,
            force_quirks,
            ..
        } => {
            assert_eq!(public_identifier.as_deref(), Some("-//W3C//DTD HTML 4.01//EN"));
            assert_eq!(
                system_identifier.as_deref(),
                Some("http://www.w3.org/TR/html4/strict.dtd")
            );
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_empty_identifier_is_not_missing() {
    let tokens = tokenize(r#"<!DOCTYPE html SYSTEM "">"#);
    match &tokens[0] {
        Token::Doctype {
            public_identifier,
            system_identifier,
            ..
        } => {
            assert!(public_identifier.is_none());
            assert_eq!(system_identifier.as_deref(), Some(""));
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_without_name_forces_quirks() {
    let (tokens, errors) = tokenize_with_errors("<!DOCTYPE>");
    assert!(matches!(
        &tokens[0],
        Token::Doctype {
            name: None,
            force_quirks: true,
            ..
        }
    ));
    assert_eq!(error_kinds(&errors), vec![ParseErrorKind::MissingDoctypeName]);
}

#[test]
fn test_bogus_doctype_forces_quirks() {
    let (tokens, errors) = tokenize_with_errors("<!DOCTYPE html garbage>");
    assert!(matches!(&tokens[0], Token::Doctype { force_quirks: true, .. }));
    assert_eq!(
        error_kinds(&errors),
        vec![ParseErrorKind::InvalidCharacterSequenceAfterDoctypeName]
    );
}

#[test]
fn test_doctype_abrupt_public_identifier() {
    let (tokens, errors) = tokenize_with_errors(r#"<!DOCTYPE html PUBLIC "foo>"#);
    assert!(matches!(
        &tokens[0],
        Token::Doctype { public_identifier: Some(p), force_quirks: true, .. } if p == "foo"
    ));
    assert_eq!(
        error_kinds(&errors),
        vec![ParseErrorKind::AbruptDoctypePublicIdentifier]
    );
}

#[test]
fn test_eof_in_doctype() {
    let (tokens, errors) = tokenize_with_errors("<!DOCTYPE ht");
    assert_eq!(tokens.len(), 2);
    assert!(matches!(
        &tokens[0],
        Token::Doctype { name: Some(n), force_quirks: true, .. } if n == "ht"
    ));
    assert_eq!(error_kinds(&errors), vec![ParseErrorKind::EofInDoctype]);
}

#[test]
fn test_start_tag() {
    let tokens = tokenize("<div>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "div");
            assert!(!self_closing);
            assert!(attributes.is_empty());
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_tag_names_are_lowercased() {
    let tokens = tokenize("<DiV></DIV>");
    assert!(tokens[0].is_start_tag("div"));
    assert!(tokens[1].is_end_tag("div"));
}

#[test]
fn test_end_tag() {
    let tokens = tokenize("</div>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::EndTag { name, .. } => {
            assert_eq!(name, "div");
        }
        _ => panic!("Expected EndTag token"),
    }
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::StartTag {
            name, self_closing, ..
        } => {
            assert_eq!(name, "br");
            assert!(self_closing);
        }
        _ => panic!("Expected self-closing StartTag token"),
    }
}

#[test]
fn test_end_tag_with_attributes_is_an_error() {
    let (tokens, errors) = tokenize_with_errors(r#"</p class="x">"#);
    assert!(tokens[0].is_end_tag("p"));
    assert_eq!(error_kinds(&errors), vec![ParseErrorKind::EndTagWithAttributes]);
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hello -->");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::Comment { data } => {
            assert_eq!(data, " hello ");
        }
        _ => panic!("Expected Comment token"),
    }
}

#[test]
fn test_comment_with_dashes_inside() {
    let tokens = tokenize("<!-- a -- b - c --->");
    assert!(matches!(&tokens[0], Token::Comment { data } if data == " a -- b - c -"));
}

#[test]
fn test_abrupt_empty_comment() {
    let (tokens, errors) = tokenize_with_errors("<!-->");
    assert!(matches!(&tokens[0], Token::Comment { data } if data.is_empty()));
    assert_eq!(
        error_kinds(&errors),
        vec![ParseErrorKind::AbruptClosingOfEmptyComment]
    );
}

#[test]
fn test_incorrectly_closed_comment() {
    let (tokens, errors) = tokenize_with_errors("<!--x--!>");
    assert!(matches!(&tokens[0], Token::Comment { data } if data == "x"));
    assert_eq!(error_kinds(&errors), vec![ParseErrorKind::IncorrectlyClosedComment]);
}

#[test]
fn test_nested_comment() {
    let (tokens, errors) = tokenize_with_errors("<!-- <!-- x -->");
    assert!(matches!(&tokens[0], Token::Comment { data } if data == " <!-- x "));
    assert_eq!(error_kinds(&errors), vec![ParseErrorKind::NestedComment]);
}

#[test]
fn test_eof_in_comment() {
    let (tokens, errors) = tokenize_with_errors("<!-- never closed");
    assert_eq!(tokens.len(), 2);
    assert!(matches!(&tokens[0], Token::Comment { data } if data == " never closed"));
    assert_eq!(error_kinds(&errors), vec![ParseErrorKind::EofInComment]);
}

#[test]
fn test_bogus_comments() {
    let (tokens, errors) = tokenize_with_errors("<?xml version?><!ELEMENT x></3>");
    assert!(matches!(&tokens[0], Token::Comment { data } if data == "?xml version?"));
    assert!(matches!(&tokens[1], Token::Comment { data } if data == "ELEMENT x"));
    assert!(matches!(&tokens[2], Token::Comment { data } if data == "3"));
    assert_eq!(
        error_kinds(&errors),
        vec![
            ParseErrorKind::UnexpectedQuestionMarkInsteadOfTagName,
            ParseErrorKind::IncorrectlyOpenedComment,
            ParseErrorKind::InvalidFirstCharacterOfTagName,
        ]
    );
}

#[test]
fn test_cdata_in_html_content_is_a_comment() {
    let (tokens, errors) = tokenize_with_errors("<![CDATA[x]]>");
    assert!(matches!(&tokens[0], Token::Comment { data } if data == "[CDATA[x]]"));
    assert_eq!(error_kinds(&errors), vec![ParseErrorKind::CdataInHtmlContent]);
}

#[test]
fn test_cdata_section_when_allowed() {
    let mut tokenizer = HTMLTokenizer::new("<![CDATA[a<b]]]>");
    tokenizer.set_cdata_allowed(true);
    let tokens: Vec<Token> = tokenizer.by_ref().collect();
    assert_eq!(text_of(&tokens), "a<b]");
    assert!(tokenizer.take_diagnostics().is_empty());
}

#[test]
fn test_attribute_double_quoted() {
    let tokens = tokenize(r#"<div class="foo">"#);
    assert_eq!(tokens[0].attribute("class"), Some("foo"));
}

#[test]
fn test_attribute_single_quoted() {
    let tokens = tokenize("<div class='bar'>");
    assert_eq!(tokens[0].attribute("class"), Some("bar"));
}

#[test]
fn test_attribute_unquoted() {
    let tokens = tokenize("<div class=baz>");
    match &tokens[0] {
        Token::StartTag {
            name, attributes, ..
        } => {
            assert_eq!(name, "div");
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes[0].name, "class");
            assert_eq!(attributes[0].value, "baz");
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_boolean_attribute() {
    let tokens = tokenize("<input disabled>");
    assert_eq!(tokens[0].attributes().len(), 1);
    assert_eq!(tokens[0].attribute("disabled"), Some(""));
}

#[test]
fn test_multiple_attributes() {
    let tokens = tokenize(r#"<input type="text" id="name" disabled>"#);
    let attributes = tokens[0].attributes();
    assert_eq!(attributes.len(), 3);
    assert_eq!(attributes[0].name, "type");
    assert_eq!(attributes[0].value, "text");
    assert_eq!(attributes[1].name, "id");
    assert_eq!(attributes[1].value, "name");
    assert_eq!(attributes[2].name, "disabled");
    assert_eq!(attributes[2].value, "");
}

#[test]
fn test_attribute_names_are_lowercased() {
    let tokens = tokenize(r#"<div CLASS="A">"#);
    assert_eq!(tokens[0].attribute("class"), Some("A"));
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let (tokens, errors) = tokenize_with_errors(r#"<div id="a" id="b">"#);
    assert_eq!(tokens[0].attributes().len(), 1);
    assert_eq!(tokens[0].attribute("id"), Some("a"));
    assert_eq!(error_kinds(&errors), vec![ParseErrorKind::DuplicateAttribute]);
}

#[test]
fn test_missing_whitespace_between_attributes() {
    let (tokens, errors) = tokenize_with_errors(r#"<div a="1"b="2">"#);
    assert_eq!(tokens[0].attribute("b"), Some("2"));
    assert_eq!(
        error_kinds(&errors),
        vec![ParseErrorKind::MissingWhitespaceBetweenAttributes]
    );
}

#[test]
fn test_unexpected_character_in_unquoted_value() {
    let (tokens, errors) = tokenize_with_errors("<div a=b=c>");
    assert_eq!(tokens[0].attribute("a"), Some("b=c"));
    assert_eq!(
        error_kinds(&errors),
        vec![ParseErrorKind::UnexpectedCharacterInUnquotedAttributeValue]
    );
}

#[test]
fn test_tag_with_text_content() {
    let tokens = tokenize("<p>Hi</p>");
    assert_eq!(tokens.len(), 5); // <p>, H, i, </p>, EOF
    assert!(matches!(&tokens[0], Token::StartTag { name, .. } if name == "p"));
    assert!(matches!(tokens[1], Token::Character { data: 'H' }));
    assert!(matches!(tokens[2], Token::Character { data: 'i' }));
    assert!(matches!(&tokens[3], Token::EndTag { name, .. } if name == "p"));
    assert!(matches!(tokens[4], Token::EndOfFile));
}

#[test]
fn test_simple_html_document() {
    let html = r#"<!DOCTYPE html>
<html>
<head><title>Test</title></head>
<body>Hello</body>
</html>"#;
    let tokens = tokenize(html);

    // Should have DOCTYPE as first token
    assert!(matches!(&tokens[0], Token::Doctype { name: Some(n), .. } if n == "html"));

    // Should end with EOF
    assert!(matches!(tokens.last(), Some(Token::EndOfFile)));

    let start_tags = tokens
        .iter()
        .filter(|t| matches!(t, Token::StartTag { .. }))
        .count();
    let end_tags = tokens
        .iter()
        .filter(|t| matches!(t, Token::EndTag { .. }))
        .count();

    assert_eq!(start_tags, 4); // html, head, title, body
    assert_eq!(end_tags, 4); // /title, /head, /body, /html
}

#[test]
fn test_eof_in_tag_drops_the_tag() {
    let (tokens, errors) = tokenize_with_errors("a<div class=");
    assert_eq!(tokens, vec![Token::Character { data: 'a' }, Token::EndOfFile]);
    assert_eq!(error_kinds(&errors), vec![ParseErrorKind::EofInTag]);
}

#[test]
fn test_eof_before_tag_name() {
    let (tokens, errors) = tokenize_with_errors("<");
    assert_eq!(text_of(&tokens), "<");
    assert_eq!(error_kinds(&errors), vec![ParseErrorKind::EofBeforeTagName]);
}

#[test]
fn test_invalid_first_character_of_tag_name() {
    let (tokens, errors) = tokenize_with_errors("1 < 2");
    assert_eq!(text_of(&tokens), "1 < 2");
    assert_eq!(
        error_kinds(&errors),
        vec![ParseErrorKind::InvalidFirstCharacterOfTagName]
    );
}

#[test]
fn test_null_in_data_is_kept_and_reported() {
    let (tokens, errors) = tokenize_with_errors("a\0b");
    assert_eq!(text_of(&tokens), "a\0b");
    assert_eq!(error_kinds(&errors), vec![ParseErrorKind::UnexpectedNullCharacter]);
}

#[test]
fn test_newlines_are_normalized() {
    let tokens = tokenize("a\r\nb\rc");
    assert_eq!(text_of(&tokens), "a\nb\nc");
}

#[test]
fn test_control_character_in_input_stream() {
    let (_, errors) = tokenize_with_errors("a\u{1}b");
    assert_eq!(
        error_kinds(&errors),
        vec![ParseErrorKind::ControlCharacterInInputStream]
    );
    assert_eq!(errors[0].position.column, 2);
}

#[test]
fn test_error_positions_track_lines() {
    let (_, errors) = tokenize_with_errors("<p>\n<div id=a id=b>");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ParseErrorKind::DuplicateAttribute);
    assert_eq!(errors[0].position.line, 2);
}

// ========== Raw text element (RCDATA/RAWTEXT) tests ==========

#[test]
fn test_style_element_rawtext() {
    let tokens = tokenize_text("style", TokenizerState::RAWTEXT, "body { color: red; }</style>");
    assert_eq!(text_of(&tokens), "body { color: red; }");
    assert!(tokens[tokens.len() - 2].is_end_tag("style"));
    assert!(matches!(tokens.last(), Some(Token::EndOfFile)));
}

#[test]
fn test_title_element_rcdata() {
    let tokens = tokenize_text("title", TokenizerState::RCDATA, "My &amp; Page</title>");
    assert_eq!(text_of(&tokens), "My & Page");
    assert!(tokens[tokens.len() - 2].is_end_tag("title"));
}

#[test]
fn test_style_with_fake_tags() {
    let tokens = tokenize_text("style", TokenizerState::RAWTEXT, "<div>not a tag</div></style>");
    assert_eq!(text_of(&tokens), "<div>not a tag</div>");
}

#[test]
fn test_rawtext_ignores_character_references() {
    let tokens = tokenize_text("style", TokenizerState::RAWTEXT, "a &amp; b</style>");
    assert_eq!(text_of(&tokens), "a &amp; b");
}

#[test]
fn test_title_with_less_than() {
    let tokens = tokenize_text("title", TokenizerState::RCDATA, "a < b</title>");
    assert_eq!(text_of(&tokens), "a < b");
}

#[test]
fn test_style_with_wrong_end_tag() {
    // </notastyle> inside style should NOT close the style element
    let tokens = tokenize_text("style", TokenizerState::RAWTEXT, "a</notastyle>b</style>");
    assert_eq!(text_of(&tokens), "a</notastyle>b");
}

#[test]
fn test_appropriate_end_tag_is_case_insensitive() {
    let tokens = tokenize_text("textarea", TokenizerState::RCDATA, "<b>bold?</b></TEXTAREA>");
    assert_eq!(text_of(&tokens), "<b>bold?</b>");
    assert!(tokens[tokens.len() - 2].is_end_tag("textarea"));
}

#[test]
fn test_script_data_escaped_end_tag() {
    let tokens = tokenize_text(
        "script",
        TokenizerState::ScriptData,
        "<!-- if (a < b) {} --></script>",
    );
    assert_eq!(text_of(&tokens), "<!-- if (a < b) {} -->");
    assert!(tokens[tokens.len() - 2].is_end_tag("script"));
}

#[test]
fn test_script_data_double_escaped_does_not_end_early() {
    let tokens = tokenize_text(
        "script",
        TokenizerState::ScriptData,
        "<!--<script>x</script>y--></script>",
    );
    assert_eq!(text_of(&tokens), "<!--<script>x</script>y-->");
    let end_tags = tokens.iter().filter(|t| t.is_end_tag("script")).count();
    assert_eq!(end_tags, 1);
}

#[test]
fn test_plaintext_never_ends() {
    let tokens = tokenize_text("plaintext", TokenizerState::PLAINTEXT, "</plaintext><b>");
    assert_eq!(text_of(&tokens), "</plaintext><b>");
}

#[test]
fn test_rawtext_null_becomes_replacement_character() {
    let mut tokenizer = HTMLTokenizer::new("a\0");
    tokenizer.switch_to(TokenizerState::RAWTEXT);
    let tokens: Vec<Token> = tokenizer.by_ref().collect();
    assert_eq!(text_of(&tokens), "a\u{FFFD}");
    assert_eq!(
        error_kinds(&tokenizer.take_diagnostics()),
        vec![ParseErrorKind::UnexpectedNullCharacter]
    );
}

#[test]
fn test_switch_to_reports_state() {
    let mut tokenizer = HTMLTokenizer::new("");
    assert_eq!(tokenizer.state(), TokenizerState::Data);
    tokenizer.switch_to(TokenizerState::ScriptData);
    assert_eq!(tokenizer.state(), TokenizerState::ScriptData);
}
