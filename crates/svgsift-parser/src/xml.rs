//! Namespace-aware XML parsing into owned element trees.
//!
//! Parsing is delegated to `roxmltree`, which enforces well-formedness and
//! namespace correctness. The borrowed roxmltree document is then copied into
//! an owned [`Element`] tree.
//!
//! Namespace declarations are re-emitted as `xmlns` attributes on the element
//! that introduced them, so serializing the owned tree reproduces a document
//! that parses to the same names.

use roxmltree::{Document, ParsingOptions};

use svgsift_core::element::{Element, Node, SVG_NAMESPACE, XLINK_NAMESPACE};

use crate::error::Result;

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A namespace binding in scope: `(prefix, uri)`. The default namespace has no prefix.
type Binding<'a> = (Option<&'a str>, &'a str);

fn options() -> ParsingOptions {
    ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    }
}

/// Parses a complete document and returns its root element.
///
/// Document type declarations are accepted because standalone SVG files
/// served over the network commonly carry one.
///
/// # Errors
///
/// Returns a [`ParseError`](crate::error::ParseError) if `text` is not
/// well-formed or has no root element.
///
/// # Examples
///
/// ```
/// # use svgsift_parser::xml::parse_document;
/// let root = parse_document(r#"<svg xmlns="http://www.w3.org/2000/svg"><g/></svg>"#).unwrap();
/// assert_eq!(root.name(), "svg");
/// assert_eq!(root.find_all("g").count(), 1);
///
/// assert!(parse_document("<svg>").is_err());
/// ```
pub fn parse_document(text: &str) -> Result<Element> {
    let document = Document::parse_with_options(text, options())?;
    Ok(convert(document.root_element(), &[]))
}

/// Parses a markup fragment inside a synthetic `<svg>` container.
///
/// Fragments copied out of an HTML document lose the namespace declarations
/// of their ancestors. The container re-declares the SVG and XLink
/// namespaces so prefixed attributes such as `xlink:href` still resolve.
/// The returned element is the synthetic container itself.
///
/// # Errors
///
/// Returns a [`ParseError`](crate::error::ParseError) if the fragment is not
/// well-formed.
pub fn parse_fragment(text: &str) -> Result<Element> {
    let wrapped =
        format!(r#"<svg xmlns="{SVG_NAMESPACE}" xmlns:xlink="{XLINK_NAMESPACE}">{text}</svg>"#);
    parse_document(&wrapped)
}

fn convert(node: roxmltree::Node<'_, '_>, parent_scope: &[Binding<'_>]) -> Element {
    let mut element = Element::new(element_name(node));

    let scope: Vec<Binding<'_>> = node
        .namespaces()
        .map(|namespace| (namespace.name(), namespace.uri()))
        .collect();

    for binding in &scope {
        if binding.0 == Some("xml") || parent_scope.contains(binding) {
            continue;
        }
        match binding.0 {
            Some(prefix) => element.set_attribute(format!("xmlns:{prefix}"), binding.1),
            None => element.set_attribute("xmlns", binding.1),
        }
    }

    for attribute in node.attributes() {
        let name = match attribute.namespace() {
            Some(uri) => match prefix_for(node, uri, false) {
                Some(prefix) => format!("{prefix}:{}", attribute.name()),
                None => attribute.name().to_string(),
            },
            None => attribute.name().to_string(),
        };
        element.set_attribute(name, attribute.value());
    }

    for child in node.children() {
        if child.is_element() {
            element.append(convert(child, &scope));
        } else if child.is_text() {
            element.append(Node::Text(child.text().unwrap_or_default().to_string()));
        }
    }

    element
}

fn element_name(node: roxmltree::Node<'_, '_>) -> String {
    let tag = node.tag_name();
    match tag.namespace().and_then(|uri| prefix_for(node, uri, true)) {
        Some(prefix) => format!("{prefix}:{}", tag.name()),
        None => tag.name().to_string(),
    }
}

/// Finds the prefix bound to `uri` at `node`.
///
/// Elements in a default namespace stay unprefixed when `allow_default` is
/// set. Attributes never belong to the default namespace, so they always
/// need a prefix.
fn prefix_for(node: roxmltree::Node<'_, '_>, uri: &str, allow_default: bool) -> Option<String> {
    if uri == XML_NAMESPACE {
        return Some("xml".to_string());
    }
    if allow_default
        && node
            .namespaces()
            .any(|namespace| namespace.name().is_none() && namespace.uri() == uri)
    {
        return None;
    }
    node.namespaces()
        .filter(|namespace| namespace.uri() == uri)
        .find_map(|namespace| namespace.name())
        .map(str::to_string)
}
