//! Validation and sprite sheet expansion.
//!
//! Invalid records are dropped here. A resolved external image is usually a
//! sprite sheet, so every `<symbol>` and `<g>` inside it becomes a record of
//! its own, placed right after the image it came from.

use log::{debug, trace};
use uuid::Uuid;

use svgsift_core::{element::Element, geometry::ViewBox, record::VectorRecord};
use svgsift_parser::{classify, length::parse_length};

/// Drops invalid records and expands resolved external images.
///
/// For each valid external image, the image itself is kept and followed by
/// one [`SymbolSprite`] per `<symbol>` and then one [`GroupElement`] per
/// `<g>` found below its root, each in document order. Other records pass
/// through unchanged and relative order is preserved.
///
/// [`SymbolSprite`]: svgsift_core::record::RecordKind::SymbolSprite
/// [`GroupElement`]: svgsift_core::record::RecordKind::GroupElement
pub fn validate_and_expand(records: Vec<VectorRecord>) -> Vec<VectorRecord> {
    let mut output = Vec::with_capacity(records.len());

    for record in records {
        if !record.is_valid() {
            debug!(
                id = record.id(),
                kind = record.kind().name(),
                cors_restricted = record.cors_restricted();
                "Dropping invalid record"
            );
            continue;
        }

        let children = match (record.is_external_image(), record.element()) {
            (true, Some(root)) => expand(record.id(), root),
            _ => Vec::new(),
        };
        output.push(record);
        output.extend(children);
    }

    output
}

/// A sub-drawing cut out of a sprite sheet, ready to be reclassified.
struct Extracted {
    markup: String,
}

#[derive(Default)]
struct Extraction {
    symbols: Vec<Extracted>,
    groups: Vec<Extracted>,
}

/// What an element inherits from its ancestors.
#[derive(Clone, Default)]
struct Scope<'a> {
    namespaces: Vec<(&'a str, &'a str)>,
    viewport: Option<String>,
}

fn expand(parent_id: &str, root: &Element) -> Vec<VectorRecord> {
    let mut extraction = Extraction::default();
    walk(root, &Scope::default(), &mut extraction);

    let (symbol_count, group_count) = (extraction.symbols.len(), extraction.groups.len());
    let symbols = extraction
        .symbols
        .into_iter()
        .map(|found| classify::symbol_sprite(&found.markup, &fresh_id()));
    let groups = extraction
        .groups
        .into_iter()
        .map(|found| classify::group_element(&found.markup, &fresh_id()));

    let children: Vec<VectorRecord> = symbols
        .chain(groups)
        .filter(VectorRecord::is_valid)
        .map(VectorRecord::detached)
        .collect();

    debug!(
        id = parent_id,
        symbols = symbol_count,
        groups = group_count,
        expanded = children.len();
        "Expanded external image"
    );
    children
}

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

fn walk<'a>(element: &'a Element, inherited: &Scope<'a>, extraction: &mut Extraction) {
    let scope = enter(element, inherited);

    for child in element.child_elements() {
        match child.local_name() {
            "symbol" => extraction.symbols.push(extract(child, &scope)),
            "g" => extraction.groups.push(extract(child, &scope)),
            _ => {}
        }
        walk(child, &scope, extraction);
    }
}

fn enter<'a>(element: &'a Element, inherited: &Scope<'a>) -> Scope<'a> {
    let mut scope = inherited.clone();

    for (name, uri) in element.attributes() {
        if name == "xmlns" || name.starts_with("xmlns:") {
            scope.namespaces.retain(|(declared, _)| *declared != name);
            scope.namespaces.push((name, uri));
        }
    }

    if element.local_name() == "svg" {
        scope.viewport = container_viewport(element);
    }
    scope
}

/// The viewport a container establishes for its contents.
fn container_viewport(element: &Element) -> Option<String> {
    if let Some(view_box) = element.attribute("viewBox").filter(|v| !v.trim().is_empty()) {
        return Some(view_box.to_string());
    }
    let width = element.attribute("width").and_then(parse_length)?;
    let height = element.attribute("height").and_then(parse_length)?;
    Some(ViewBox::from_dimensions(width, height).to_string())
}

/// Serializes `element` so it parses on its own.
fn extract(element: &Element, scope: &Scope<'_>) -> Extracted {
    let mut copy = element.clone();

    for (name, uri) in &scope.namespaces {
        if copy.attribute(name).is_none() {
            copy.set_attribute(*name, *uri);
        }
    }
    let viewport = scope
        .viewport
        .as_deref()
        .filter(|_| !copy.has_attribute("viewBox"));
    if let Some(viewport) = viewport {
        trace!(viewport; "Stamping enclosing viewport");
        copy.set_attribute("viewBox", viewport);
    }

    Extracted {
        markup: copy.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use svgsift_core::{
        context::Attachment,
        record::{ExternalImage, RecordKind},
    };
    use svgsift_parser::xml;

    use super::*;

    fn resolved_image(id: &str, body: &str) -> VectorRecord {
        let image = ExternalImage::new(Some("/sheet.svg".to_string()), "https://example.com");
        let mut record =
            VectorRecord::new(RecordKind::ExternalImage(image), id, "<img src=\"/sheet.svg\">");
        record.resolve(xml::parse_document(body).expect("well-formed sheet"));
        record
    }

    #[test]
    fn test_expansion_fan_out_order() {
        let sheet = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 48 48">
            <g id="layer"><rect width="4" height="4"/></g>
            <symbol id="a" viewBox="0 0 24 24"><path d="M0 0"/></symbol>
            <symbol id="b" viewBox="0 0 16 16"><path d="M1 1"/></symbol>
        </svg>"#;
        let output = validate_and_expand(vec![resolved_image("img", sheet)]);

        let kinds: Vec<_> = output.iter().map(|record| record.kind().name()).collect();
        assert_eq!(
            kinds,
            vec!["external_image", "symbol_sprite", "symbol_sprite", "group_element"]
        );

        let symbol_ids: Vec<_> = output[1..3]
            .iter()
            .filter_map(|record| record.element()?.find("symbol")?.attribute("id"))
            .collect();
        assert_eq!(symbol_ids, vec!["a", "b"]);
    }

    #[test]
    fn test_children_are_detached_with_fresh_ids() {
        let sheet = r#"<svg xmlns="http://www.w3.org/2000/svg"><symbol id="a"/><symbol id="b"/></svg>"#;
        let output = validate_and_expand(vec![resolved_image("img", sheet)]);

        assert_eq!(output.len(), 3);
        assert_ne!(output[1].id(), output[2].id());
        for child in &output[1..] {
            assert_eq!(child.attachment(), Attachment::Detached);
            assert!(Uuid::parse_str(child.id()).is_ok());
            assert!(child.is_valid());
        }
    }

    #[test]
    fn test_invalid_records_are_dropped_in_order() {
        let first = VectorRecord::new(RecordKind::InlineSvg, "a", "")
            .with_element(Some(Element::container()));
        let broken = VectorRecord::new(RecordKind::InlineSvg, "b", "<svg <");
        let third = VectorRecord::new(RecordKind::GroupElement, "c", "")
            .with_element(Some(Element::container()));

        let output = validate_and_expand(vec![first, broken, third]);
        let ids: Vec<_> = output.iter().map(VectorRecord::id).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_group_takes_enclosing_dimensions() {
        let sheet = r#"<svg xmlns="http://www.w3.org/2000/svg" width="32px" height="16px"><g id="x"/></svg>"#;
        let output = validate_and_expand(vec![resolved_image("img", sheet)]);
        let container = output[1].element().expect("valid group");

        assert_eq!(container.attribute("viewBox"), Some("0 0 32 16"));
    }

    #[test]
    fn test_own_view_box_is_kept() {
        let sheet = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100"><symbol id="s" viewBox="0 0 10 10"/></svg>"#;
        let output = validate_and_expand(vec![resolved_image("img", sheet)]);

        assert_eq!(
            output[1].element().and_then(|c| c.attribute("viewBox")),
            Some("0 0 10 10")
        );
    }

    #[test]
    fn test_nearest_container_wins() {
        let sheet = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100"><svg viewBox="0 0 5 5"><g id="inner"/></svg></svg>"#;
        let output = validate_and_expand(vec![resolved_image("img", sheet)]);

        assert_eq!(output.len(), 2);
        assert_eq!(
            output[1].element().and_then(|c| c.attribute("viewBox")),
            Some("0 0 5 5")
        );
    }

    #[test]
    fn test_inherited_namespaces_travel_with_child() {
        let sheet = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><symbol id="a"><use xlink:href="#b"/></symbol></svg>"##;
        let output = validate_and_expand(vec![resolved_image("img", sheet)]);

        assert_eq!(output.len(), 2);
        let markup = output[1].original_markup();
        assert!(markup.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
        assert!(xml::parse_document(markup).is_ok());
    }

    #[test]
    fn test_non_image_records_are_not_expanded() {
        let inline = classify::inline_svg(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><symbol id="a"/><g/></svg>"#,
            "inline",
        );
        let output = validate_and_expand(vec![inline]);
        assert_eq!(output.len(), 1);
    }
}
