//! Owned vector-markup element tree.
//!
//! Parsed fragments are stored as a small, owned tree of [`Element`]s and
//! text [`Node`]s so that records can be cloned, moved between tasks and
//! re-serialized without keeping the source buffer alive.
//!
//! Namespace declarations are kept as ordinary `xmlns` / `xmlns:*` attributes
//! on the element that declared them. Serializing an element therefore
//! reproduces the declarations exactly where the source had them.
//!
//! # Example
//!
//! ```
//! # use svgsift_core::element::Element;
//! let mut sheet = Element::container();
//! sheet.append(Element::template("star").with_attribute("viewBox", "0 0 24 24"));
//! sheet.append(Element::reference("star"));
//!
//! assert_eq!(sheet.find_all("symbol").count(), 1);
//! assert!(sheet.to_string().contains(r##"<use href="#star"/>"##));
//! ```

use std::{borrow::Cow, fmt, slice};

use indexmap::IndexMap;

/// The SVG namespace URI.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// The XLink namespace URI, still used by `xlink:href` in legacy sprites.
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// A node in an element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested element.
    Element(Element),
    /// Character data. Stored unescaped.
    Text(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element(element) => fmt::Display::fmt(element, f),
            Node::Text(text) => f.write_str(&escape_text(text)),
        }
    }
}

/// An owned markup element with ordered attributes and children.
///
/// Element names are stored as written in the source, including any prefix
/// (`sodipodi:namedview`). Attribute order is preserved on serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: IndexMap<String, String>,
    children: Vec<Node>,
}

impl Element {
    /// Creates an empty element with the given qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Creates an empty `<svg>` container declaring the SVG namespace.
    ///
    /// The XLink namespace is declared as well so that fragments using
    /// `xlink:href` stay well-formed once moved into the container.
    pub fn container() -> Self {
        Self::new("svg")
            .with_attribute("xmlns", SVG_NAMESPACE)
            .with_attribute("xmlns:xlink", XLINK_NAMESPACE)
    }

    /// Creates a `<use>` element pointing at `id` through a fragment identifier.
    pub fn reference(id: &str) -> Self {
        Self::new("use").with_attribute("href", format!("#{id}"))
    }

    /// Creates an empty `<symbol>` template element carrying `id`.
    pub fn template(id: &str) -> Self {
        Self::new("symbol").with_attribute("id", id)
    }

    /// Returns the qualified name of the element.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the element name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Returns the value of the attribute `name`, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns `true` if the attribute is present and not blank.
    ///
    /// Markup scraped from live documents frequently carries empty
    /// attributes (`viewBox=""`), which are treated as absent.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name)
            .is_some_and(|value| !value.trim().is_empty())
    }

    /// Iterates over attributes in source order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Sets an attribute, keeping its position if it already exists.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Builder variant of [`Element::set_attribute`].
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    /// Returns the child nodes.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Iterates over direct child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Appends a child node.
    pub fn append(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// Builder variant of [`Element::append`].
    pub fn with_child(mut self, node: impl Into<Node>) -> Self {
        self.append(node);
        self
    }

    /// Iterates over all descendant elements in document order.
    ///
    /// The element itself is not included.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// Iterates over descendant elements whose local name is `local_name`.
    pub fn find_all<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.descendants()
            .filter(move |element| element.local_name() == local_name)
    }

    /// Returns the first descendant element whose local name is `local_name`.
    pub fn find(&self, local_name: &str) -> Option<&Element> {
        self.descendants()
            .find(|element| element.local_name() == local_name)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (name, value) in &self.attributes {
            write!(f, " {name}=\"{}\"", escape_attribute(value))?;
        }

        if self.children.is_empty() {
            return f.write_str("/>");
        }

        f.write_str(">")?;
        for child in &self.children {
            fmt::Display::fmt(child, f)?;
        }
        write!(f, "</{}>", self.name)
    }
}

/// Depth-first, document-order iterator over descendant elements.
///
/// Created by [`Element::descendants`].
pub struct Descendants<'a> {
    stack: Vec<slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(siblings) = self.stack.last_mut() {
            match siblings.next() {
                Some(Node::Element(element)) => {
                    self.stack.push(element.children.iter());
                    return Some(element);
                }
                Some(Node::Text(_)) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    )
}

fn escape_attribute(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(
        value
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite_sheet() -> Element {
        Element::container()
            .with_child(
                Element::new("defs")
                    .with_child(Element::template("a"))
                    .with_child(Element::new("g").with_attribute("id", "inner")),
            )
            .with_child(Element::template("b"))
            .with_child(Element::new("g").with_attribute("id", "outer"))
    }

    #[test]
    fn test_container_declares_namespaces() {
        let svg = Element::container();
        assert_eq!(svg.name(), "svg");
        assert_eq!(svg.attribute("xmlns"), Some(SVG_NAMESPACE));
        assert_eq!(svg.attribute("xmlns:xlink"), Some(XLINK_NAMESPACE));
    }

    #[test]
    fn test_reference_and_template() {
        assert_eq!(Element::reference("icon").to_string(), r##"<use href="#icon"/>"##);
        assert_eq!(Element::template("icon").to_string(), r#"<symbol id="icon"/>"#);
    }

    #[test]
    fn test_local_name_strips_prefix() {
        assert_eq!(Element::new("svg:symbol").local_name(), "symbol");
        assert_eq!(Element::new("g").local_name(), "g");
    }

    #[test]
    fn test_descendants_document_order() {
        let sheet = sprite_sheet();
        let names: Vec<_> = sheet
            .descendants()
            .map(|e| e.attribute("id").unwrap_or(e.name()))
            .collect();
        assert_eq!(names, vec!["defs", "a", "inner", "b", "outer"]);
    }

    #[test]
    fn test_find_all_excludes_self() {
        let group = Element::new("g").with_child(Element::new("g"));
        assert_eq!(group.find_all("g").count(), 1);
    }

    #[test]
    fn test_find_outlives_name() {
        let sheet = sprite_sheet();
        let found = {
            let name = String::from("symbol");
            sheet.find(&name)
        };
        assert_eq!(found.and_then(|e| e.attribute("id")), Some("a"));
        assert!(sheet.find("circle").is_none());
    }

    #[test]
    fn test_set_attribute_keeps_position() {
        let mut element = Element::new("svg")
            .with_attribute("width", "10")
            .with_attribute("height", "20");
        element.set_attribute("width", "30");

        let names: Vec<_> = element.attributes().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["width", "height"]);
        assert_eq!(element.attribute("width"), Some("30"));
    }

    #[test]
    fn test_remove_attribute_preserves_order() {
        let mut element = Element::new("svg")
            .with_attribute("a", "1")
            .with_attribute("b", "2")
            .with_attribute("c", "3");
        assert_eq!(element.remove_attribute("b"), Some("2".to_string()));
        assert_eq!(element.remove_attribute("b"), None);
        assert_eq!(element.to_string(), r#"<svg a="1" c="3"/>"#);
    }

    #[test]
    fn test_has_attribute_ignores_blank() {
        let element = Element::new("svg").with_attribute("viewBox", " ");
        assert!(!element.has_attribute("viewBox"));
        assert!(!element.has_attribute("width"));
    }

    #[test]
    fn test_serialization_escapes() {
        let element = Element::new("text")
            .with_attribute("data-label", r#"a "b" & <c>"#)
            .with_child(Node::Text("x < y & z".to_string()));
        assert_eq!(
            element.to_string(),
            r#"<text data-label="a &quot;b&quot; &amp; &lt;c&gt;">x &lt; y &amp; z</text>"#
        );
    }
}
