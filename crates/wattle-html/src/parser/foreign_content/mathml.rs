//! MathML foreign content support.
//!
//! [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)

use crate::tokenizer::Attribute;

/// [§ 13.2.6.3 Adjust MathML attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-mathml-attributes)
///
/// "When the steps below require the user agent to adjust MathML attributes for
/// a token, then, if the token has an attribute named definitionurl, change its
/// name to definitionURL (note the case difference)."
pub fn adjust_mathml_attributes(attributes: &mut [Attribute]) {
    for attr in &mut *attributes {
        if attr.name == "definitionurl" {
            attr.name = "definitionURL".to_string();
        }
    }
}

/// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
///
/// "A node is a MathML text integration point if it is one of the following
/// elements: A MathML mi element, A MathML mo element, A MathML mn element, A
/// MathML ms element, A MathML mtext element"
#[must_use]
pub fn is_text_integration_point(name: &str) -> bool {
    matches!(name, "mi" | "mo" | "mn" | "ms" | "mtext")
}

/// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
///
/// "A MathML annotation-xml element whose start tag token had an attribute
/// with the name "encoding" whose value was an ASCII case-insensitive match
/// for the string "text/html"" or "application/xhtml+xml".
#[must_use]
pub fn is_annotation_xml_integration_point(attributes: &[Attribute]) -> bool {
    attributes.iter().any(|attr| {
        attr.name == "encoding"
            && (attr.value.eq_ignore_ascii_case("text/html")
                || attr.value.eq_ignore_ascii_case("application/xhtml+xml"))
    })
}
