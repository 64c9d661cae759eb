//! Parse error vocabulary.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! "This specification defines the parsing rules for HTML documents, whether
//! they are syntactically correct or not. Certain points in the parsing
//! algorithm are said to be parse errors. The error handling for parse errors
//! is well-defined."
//!
//! Parse errors never stop the parser. They are handed to a [`DiagnosticSink`]
//! and parsing continues with the recovery step the algorithm prescribes.

use core::fmt;

use serde::Serialize;
use strum_macros::Display;

/// Every kind of parse error the tokenizer, the input stream, the character
/// reference resolver or the tree builder can report.
///
/// The tokenization kinds use the error codes from
/// [§ 13.2.2](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors).
/// Tree construction errors have no standard codes, so they are grouped by
/// the token shape that was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ParseErrorKind {
    // --- Input stream ---
    /// A control code point other than ASCII whitespace or NULL in the input.
    ControlCharacterInInputStream,
    /// A noncharacter code point in the input.
    NoncharacterInInputStream,
    /// A surrogate in the input stream.
    SurrogateInInputStream,

    // --- Tokenization ---
    /// `<!-->` or `<!--->`.
    AbruptClosingOfEmptyComment,
    /// `>` inside a DOCTYPE public identifier.
    AbruptDoctypePublicIdentifier,
    /// `>` inside a DOCTYPE system identifier.
    AbruptDoctypeSystemIdentifier,
    /// `&#` or `&#x` without any digits.
    AbsenceOfDigitsInNumericCharacterReference,
    /// A CDATA section outside foreign content.
    CdataInHtmlContent,
    /// A numeric character reference above U+10FFFF.
    CharacterReferenceOutsideUnicodeRange,
    /// A numeric character reference to a control code point.
    ControlCharacterReference,
    /// The same attribute name twice on one tag.
    DuplicateAttribute,
    /// An end tag carrying attributes.
    EndTagWithAttributes,
    /// An end tag with the self-closing flag.
    EndTagWithTrailingSolidus,
    /// EOF right after `<` or `</`.
    EofBeforeTagName,
    /// EOF inside a CDATA section.
    EofInCdata,
    /// EOF inside a comment.
    EofInComment,
    /// EOF inside a DOCTYPE.
    EofInDoctype,
    /// EOF inside an HTML comment-like construct in script data.
    EofInScriptHtmlCommentLikeText,
    /// EOF inside a start or end tag.
    EofInTag,
    /// A comment closed by `--!>`.
    IncorrectlyClosedComment,
    /// `<!` not followed by `--`, `DOCTYPE` or `[CDATA[`.
    IncorrectlyOpenedComment,
    /// Garbage after a DOCTYPE name.
    InvalidCharacterSequenceAfterDoctypeName,
    /// A character after `<` or `</` that cannot start a tag name.
    InvalidFirstCharacterOfTagName,
    /// `=` followed directly by `>`.
    MissingAttributeValue,
    /// A DOCTYPE without a name.
    MissingDoctypeName,
    /// `PUBLIC` without an identifier.
    MissingDoctypePublicIdentifier,
    /// `SYSTEM` without an identifier.
    MissingDoctypeSystemIdentifier,
    /// `</>`.
    MissingEndTagName,
    /// A public identifier that does not start with a quote.
    MissingQuoteBeforeDoctypePublicIdentifier,
    /// A system identifier that does not start with a quote.
    MissingQuoteBeforeDoctypeSystemIdentifier,
    /// A character reference not terminated by `;`.
    MissingSemicolonAfterCharacterReference,
    /// `PUBLIC` directly followed by a quote.
    MissingWhitespaceAfterDoctypePublicKeyword,
    /// `SYSTEM` directly followed by a quote.
    MissingWhitespaceAfterDoctypeSystemKeyword,
    /// `<!DOCTYPEhtml>`.
    MissingWhitespaceBeforeDoctypeName,
    /// Two attributes without whitespace between them.
    MissingWhitespaceBetweenAttributes,
    /// Public and system identifiers without whitespace between them.
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
    /// `<!--` inside a comment.
    NestedComment,
    /// A numeric character reference to a noncharacter.
    NoncharacterCharacterReference,
    /// A self-closing flag on a non-void HTML element.
    NonVoidHtmlElementStartTagWithTrailingSolidus,
    /// `&#0;`.
    NullCharacterReference,
    /// A numeric character reference to a surrogate.
    SurrogateCharacterReference,
    /// Garbage after a DOCTYPE system identifier.
    UnexpectedCharacterAfterDoctypeSystemIdentifier,
    /// `"`, `'` or `<` in an attribute name.
    UnexpectedCharacterInAttributeName,
    /// `"`, `'`, `<`, `=` or `` ` `` in an unquoted attribute value.
    UnexpectedCharacterInUnquotedAttributeValue,
    /// `=` where an attribute name should start.
    UnexpectedEqualsSignBeforeAttributeName,
    /// A U+0000 NULL in the input.
    UnexpectedNullCharacter,
    /// `<?`.
    UnexpectedQuestionMarkInsteadOfTagName,
    /// `/` inside a tag that does not close it.
    UnexpectedSolidusInTag,
    /// `&name;` where `name` is not a known entity.
    UnknownNamedCharacterReference,

    // --- Tree construction ---
    /// A DOCTYPE token anywhere but the initial insertion mode.
    UnexpectedDoctype,
    /// A DOCTYPE that is not `<!DOCTYPE html>` or a permitted legacy form.
    NonConformingDoctype,
    /// The first token of a document was not a DOCTYPE.
    MissingDoctype,
    /// A start tag that is not allowed where it appeared.
    UnexpectedStartTag,
    /// An end tag that is not allowed where it appeared, or has no open element.
    UnexpectedEndTag,
    /// Non-whitespace text that is not allowed where it appeared.
    UnexpectedCharacter,
    /// A comment that was placed differently than written.
    UnexpectedComment,
    /// End of file while elements other than the implied ones were open.
    UnexpectedEndOfFile,
    /// Misnested formatting elements recovered by the adoption agency algorithm.
    MisnestedFormattingElement,
    /// An element closed implicitly because a sibling or ancestor closed it.
    ImplicitlyClosedElement,
    /// Content inside a table that was moved out in front of it.
    FosterParentedContent,
}

impl ParseErrorKind {
    /// Whether the error comes from tree construction rather than from the
    /// tokenizer, the input stream or the character reference resolver.
    #[must_use]
    pub const fn is_tree_construction(self) -> bool {
        matches!(
            self,
            Self::UnexpectedDoctype
                | Self::NonConformingDoctype
                | Self::MissingDoctype
                | Self::UnexpectedStartTag
                | Self::UnexpectedEndTag
                | Self::UnexpectedCharacter
                | Self::UnexpectedComment
                | Self::UnexpectedEndOfFile
                | Self::MisnestedFormattingElement
                | Self::ImplicitlyClosedElement
                | Self::FosterParentedContent
        )
    }
}

/// A position in the normalized input (after CR/CRLF became LF).
///
/// `line` and `column` are 1-based and count Unicode scalar values.
/// `offset` is the 0-based index of the scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SourcePosition {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
    /// 0-based scalar value offset from the start of the input.
    pub offset: usize,
}

impl SourcePosition {
    /// Create a position.
    #[must_use]
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One reported parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Where it went wrong, approximately: the position of the character
    /// being processed when the error was detected.
    pub position: SourcePosition,
    /// Extra context such as the offending tag name. Only filled in when the
    /// parser runs with exact errors enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic without detail.
    #[must_use]
    pub const fn new(kind: ParseErrorKind, position: SourcePosition) -> Self {
        Self {
            kind,
            position,
            detail: None,
        }
    }

    /// Attach a detail string.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.kind)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

/// Receiver for parse errors.
///
/// Reporting is fire-and-forget: a sink can record, print or drop a
/// diagnostic, but it cannot influence how parsing continues.
pub trait DiagnosticSink {
    /// Record one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// A sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreDiagnostics;

impl DiagnosticSink for IgnoreDiagnostics {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display_is_kebab_case() {
        assert_eq!(
            ParseErrorKind::EofBeforeTagName.to_string(),
            "eof-before-tag-name"
        );
        assert_eq!(
            ParseErrorKind::NonVoidHtmlElementStartTagWithTrailingSolidus.to_string(),
            "non-void-html-element-start-tag-with-trailing-solidus"
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::new(
            ParseErrorKind::DuplicateAttribute,
            SourcePosition::new(3, 14, 40),
        );
        assert_eq!(diagnostic.to_string(), "3:14: duplicate-attribute");

        let detailed = diagnostic.with_detail("class");
        assert_eq!(detailed.to_string(), "3:14: duplicate-attribute (class)");
    }

    #[test]
    fn test_diagnostic_serializes_kind_as_code() {
        let diagnostic = Diagnostic::new(
            ParseErrorKind::UnexpectedNullCharacter,
            SourcePosition::new(1, 2, 1),
        );
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["kind"], "unexpected-null-character");
        assert_eq!(json["position"]["line"], 1);
        assert!(json.get("detail").is_none());
    }

    #[test]
    fn test_tree_construction_classification() {
        assert!(ParseErrorKind::UnexpectedEndTag.is_tree_construction());
        assert!(!ParseErrorKind::DuplicateAttribute.is_tree_construction());
    }

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        sink.report(Diagnostic::new(
            ParseErrorKind::MissingDoctype,
            SourcePosition::default(),
        ));
        sink.report(Diagnostic::new(
            ParseErrorKind::EofInTag,
            SourcePosition::default(),
        ));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1].kind, ParseErrorKind::EofInTag);
    }
}
