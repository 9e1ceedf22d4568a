//! Foreign content (SVG and MathML) support.
//!
//! [§ 13.2.6.3 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
//!
//! Attribute namespaces are not modelled by the tree: `xlink:href`,
//! `xml:lang` and `xmlns:xlink` keep their qualified names as written.

pub mod mathml;
pub mod svg;

use canopy_dom::{ElementData, Namespace};

pub use mathml::{adjust_mathml_attributes, is_mathml_text_integration_point};
pub use svg::{adjust_svg_attributes, adjust_svg_tag_name};

use crate::tokenizer::Token;

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
///
/// "A node is an HTML integration point if it is one of the following
/// elements:"
/// - "A MathML annotation-xml element whose start tag token had an attribute
///   with the name "encoding" whose value was an ASCII case-insensitive match
///   for the string "text/html""
/// - "...or "application/xhtml+xml""
/// - "An SVG foreignObject element"
/// - "An SVG desc element"
/// - "An SVG title element"
#[must_use]
pub fn is_html_integration_point(element: &ElementData) -> bool {
    if element.is_one_of(Namespace::MathMl, &["annotation-xml"]) {
        return element.attrs.get("encoding").is_some_and(|encoding| {
            encoding.eq_ignore_ascii_case("text/html")
                || encoding.eq_ignore_ascii_case("application/xhtml+xml")
        });
    }
    element.is_one_of(Namespace::Svg, &["foreignObject", "desc", "title"])
}

/// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
///
/// Tokens that break out of foreign content back into HTML:
///
/// "A start tag whose tag name is one of: "b", "big", "blockquote", "body",
/// "br", "center", "code", "dd", "div", "dl", "dt", "em", "embed", "h1", "h2",
/// "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing", "menu",
/// "meta", "nobr", "ol", "p", "pre", "ruby", "s", "small", "span", "strong",
/// "strike", "sub", "sup", "table", "tt", "u", "ul", "var""
///
/// "A start tag whose tag name is "font", if the token has any attributes
/// named "color", "face", or "size""
///
/// "An end tag whose tag name is "br", "p""
#[must_use]
pub fn is_breakout_token(token: &Token) -> bool {
    match token {
        Token::StartTag { name, .. } if name == "font" => ["color", "face", "size"]
            .iter()
            .any(|attr| token.attribute(attr).is_some()),
        Token::StartTag { name, .. } => matches!(
            name.as_str(),
            "b" | "big"
                | "blockquote"
                | "body"
                | "br"
                | "center"
                | "code"
                | "dd"
                | "div"
                | "dl"
                | "dt"
                | "em"
                | "embed"
                | "h1"
                | "h2"
                | "h3"
                | "h4"
                | "h5"
                | "h6"
                | "head"
                | "hr"
                | "i"
                | "img"
                | "li"
                | "listing"
                | "menu"
                | "meta"
                | "nobr"
                | "ol"
                | "p"
                | "pre"
                | "ruby"
                | "s"
                | "small"
                | "span"
                | "strong"
                | "strike"
                | "sub"
                | "sup"
                | "table"
                | "tt"
                | "u"
                | "ul"
                | "var"
        ),
        Token::EndTag { name } => name == "br" || name == "p",
        _ => false,
    }
}
