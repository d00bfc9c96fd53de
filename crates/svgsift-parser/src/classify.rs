//! Fragment classification and reconstitution.
//!
//! Classification is a first-match, priority-ordered substring test over
//! [`MARKERS`]. No structural parsing happens while choosing the kind: a
//! string containing several markers takes the kind of the earliest marker
//! in the list, not of its outermost element. This is a deliberate heuristic
//! and the order is part of the contract. Records built from adversarial
//! markup that fails to reconstitute are caught later by validity filtering.
//!
//! Once a kind is chosen the fragment is reconstituted into an element tree:
//!
//! - Inline images parse as-is.
//! - Symbols are wrapped in a container together with a `<use>` referencing
//!   them, so they render on their own.
//! - Groups are wrapped in a container that takes over any `viewBox`,
//!   `width` and `height` the scanner stamped onto them.
//! - Image references only capture their source here; fetching happens later.

use log::{debug, warn};

use svgsift_core::{
    element::Element,
    exchange::StorageRecord,
    record::{ExternalImage, RecordKind, VectorRecord},
};

use crate::{
    error::{ErrorCode, ParseError, Result},
    tag, xml,
};

/// Kinds a markup string can be classified as, before construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    InlineSvg,
    SymbolSprite,
    GroupElement,
    ExternalImage,
}

/// Literal markers in priority order. The first one contained wins.
pub const MARKERS: [(&str, Marker); 4] = [
    ("<svg ", Marker::InlineSvg),
    ("<symbol ", Marker::SymbolSprite),
    ("<g ", Marker::GroupElement),
    ("<img ", Marker::ExternalImage),
];

/// Attributes the scanner stamps onto a group that belong to its container.
const GROUP_CONTAINER_ATTRIBUTES: [&str; 3] = ["viewBox", "width", "height"];

/// Returns the marker of the highest priority contained in `markup`.
///
/// # Examples
///
/// ```
/// # use svgsift_parser::classify::{detect, Marker};
/// assert_eq!(detect(r#"<svg viewBox="0 0 1 1"><symbol id="a"/></svg>"#), Some(Marker::InlineSvg));
/// assert_eq!(detect(r#"<g id="a"><symbol id="b"/></g>"#), Some(Marker::SymbolSprite));
/// assert_eq!(detect("<div></div>"), None);
/// ```
pub fn detect(markup: &str) -> Option<Marker> {
    MARKERS
        .iter()
        .find(|(needle, _)| markup.contains(needle))
        .map(|(_, marker)| *marker)
}

/// Builds one record from a captured markup string.
///
/// Returns `None` when no marker is present. The record is constructed but
/// not resolved: external image references carry no element until fetched.
pub fn classify(markup: &str, id: &str, origin: Option<&str>) -> Option<VectorRecord> {
    let Some(marker) = detect(markup) else {
        debug!(id; "No vector marker in markup, skipping");
        return None;
    };

    let record = match marker {
        Marker::InlineSvg => inline_svg(markup, id),
        Marker::SymbolSprite => symbol_sprite(markup, id),
        Marker::GroupElement => group_element(markup, id),
        Marker::ExternalImage => external_image(markup, id, origin.unwrap_or_default()),
    };

    debug!(id, kind = record.kind().name(), valid = record.is_valid(); "Classified markup");
    Some(record)
}

/// Restores a persisted record by classifying its stored markup again.
pub fn from_storage(stored: &StorageRecord) -> Option<VectorRecord> {
    classify(&stored.svg, &stored.id, None)
        .map(|record| record.with_last_edited(stored.last_edited.clone()))
}

/// Builds an [`RecordKind::InlineSvg`] record.
pub fn inline_svg(markup: &str, id: &str) -> VectorRecord {
    let element = settle(id, xml::parse_document(markup));
    VectorRecord::new(RecordKind::InlineSvg, id, markup).with_element(element)
}

/// Builds a [`RecordKind::SymbolSprite`] record.
pub fn symbol_sprite(markup: &str, id: &str) -> VectorRecord {
    let element = settle(id, reconstitute_symbol(markup, id));
    VectorRecord::new(RecordKind::SymbolSprite, id, markup).with_element(element)
}

/// Builds a [`RecordKind::GroupElement`] record.
pub fn group_element(markup: &str, id: &str) -> VectorRecord {
    let element = settle(id, reconstitute_group(markup));
    VectorRecord::new(RecordKind::GroupElement, id, markup).with_element(element)
}

/// Builds an unresolved [`RecordKind::ExternalImage`] record.
pub fn external_image(markup: &str, id: &str, origin: &str) -> VectorRecord {
    let source = match tag::start_tag_attributes(markup, "img") {
        Ok(mut attributes) => attributes.shift_remove("src"),
        Err(err) => {
            warn!(id, error:% = err; "Failed to read image tag");
            None
        }
    };
    if source.is_none() {
        debug!(id; "Image tag has no source");
    }

    let image = ExternalImage::new(source, origin);
    VectorRecord::new(RecordKind::ExternalImage(image), id, markup)
}

/// Re-parsing of a record's captured markup.
pub trait Reparse {
    /// Parses the original markup as a self-contained document.
    ///
    /// Returns `None` on failure; the error is logged, never propagated.
    fn reparse(&self) -> Option<Element>;
}

impl Reparse for VectorRecord {
    fn reparse(&self) -> Option<Element> {
        settle(self.id(), xml::parse_document(self.original_markup()))
    }
}

fn settle(id: &str, result: Result<Element>) -> Option<Element> {
    match result {
        Ok(element) => Some(element),
        Err(err) => {
            warn!(id, error:% = err; "Failed to reconstitute markup");
            None
        }
    }
}

fn reconstitute_symbol(markup: &str, id: &str) -> Result<Element> {
    let wrapper = xml::parse_fragment(markup)?;
    let mut symbol = wrapper
        .find("symbol")
        .cloned()
        .ok_or_else(|| ParseError::new(ErrorCode::E100, "no <symbol> element in fragment"))?;

    let symbol_id = match symbol.attribute("id") {
        Some(existing) if !existing.trim().is_empty() => existing.to_string(),
        _ => {
            symbol.set_attribute("id", id);
            id.to_string()
        }
    };

    let mut container = Element::container();
    if let Some(view_box) = symbol.attribute("viewBox").filter(|v| !v.trim().is_empty()) {
        container.set_attribute("viewBox", view_box);
    }
    container.append(symbol);
    container.append(Element::reference(&symbol_id));
    Ok(container)
}

fn reconstitute_group(markup: &str) -> Result<Element> {
    let wrapper = xml::parse_fragment(markup)?;
    let mut group = wrapper
        .find("g")
        .cloned()
        .ok_or_else(|| ParseError::new(ErrorCode::E101, "no <g> element in fragment"))?;

    let mut container = Element::container();
    for name in GROUP_CONTAINER_ATTRIBUTES {
        if let Some(value) = group.remove_attribute(name) {
            container.set_attribute(name, value);
        }
    }
    container.append(group);
    Ok(container)
}

#[cfg(test)]
mod tests {
    use svgsift_core::context::Attachment;

    use super::*;

    #[test]
    fn test_container_marker_wins_over_template() {
        let markup = r#"<svg viewBox="0 0 8 8"><symbol id="s"><path d="M0 0"/></symbol></svg>"#;
        let record = classify(markup, "r1", None).expect("recognized");
        assert_eq!(record.kind(), &RecordKind::InlineSvg);
    }

    #[test]
    fn test_marker_priority_order() {
        assert_eq!(detect(r#"<img src="a.svg"><g fill="red"></g>"#), Some(Marker::GroupElement));
        assert_eq!(detect(r#"<img src="a.svg">"#), Some(Marker::ExternalImage));
        assert_eq!(
            detect(r#"<symbol id="x"><g fill="red"></g></symbol>"#),
            Some(Marker::SymbolSprite)
        );
    }

    #[test]
    fn test_markers_require_trailing_space() {
        assert_eq!(detect("<svg></svg>"), None);
        assert_eq!(detect("<g><path/></g>"), None);
        assert!(classify("<svg></svg>", "r1", None).is_none());
    }

    #[test]
    fn test_inline_svg_parses_as_is() {
        let markup = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><circle r="4"/></svg>"#;
        let record = inline_svg(markup, "r1");

        let element = record.element().expect("valid");
        assert_eq!(element.to_string(), markup);
        assert_eq!(record.attachment(), Attachment::Live);
    }

    #[test]
    fn test_inline_svg_with_malformed_markup_is_invalid() {
        let record = classify(r#"<svg width="10"><path></svg>"#, "r1", None).expect("recognized");
        assert!(!record.is_valid());
        assert!(!record.cors_restricted());
    }

    #[test]
    fn test_symbol_is_wrapped_with_reference() {
        let markup = r#"<symbol id="star" viewBox="0 0 24 24"><path d="M12 2l3 7h7z"/></symbol>"#;
        let record = symbol_sprite(markup, "r1");
        let container = record.element().expect("valid");

        assert_eq!(container.name(), "svg");
        assert_eq!(container.attribute("viewBox"), Some("0 0 24 24"));

        let children: Vec<_> = container.child_elements().map(Element::name).collect();
        assert_eq!(children, vec!["symbol", "use"]);
        assert_eq!(
            container.find("use").and_then(|u| u.attribute("href")),
            Some("#star")
        );
    }

    #[test]
    fn test_symbol_without_id_takes_record_id() {
        let record = symbol_sprite(r#"<symbol viewBox="0 0 1 1"></symbol>"#, "generated");
        let container = record.element().expect("valid");

        assert_eq!(
            container.find("symbol").and_then(|s| s.attribute("id")),
            Some("generated")
        );
        assert_eq!(
            container.find("use").and_then(|u| u.attribute("href")),
            Some("#generated")
        );
    }

    #[test]
    fn test_symbol_with_xlink_reference_reconstitutes() {
        let markup = r##"<symbol id="a" viewBox="0 0 4 4"><use xlink:href="#b"/></symbol>"##;
        let record = symbol_sprite(markup, "r1");
        let presented = record.presentation().expect("valid");

        assert!(presented.contains(r##"xlink:href="#b""##));
        assert!(xml::parse_document(&presented).is_ok());
    }

    #[test]
    fn test_group_view_box_moves_to_container() {
        let markup = r#"<g id="layer" viewBox="0 0 50 20" fill="red"><rect width="5" height="5"/></g>"#;
        let record = group_element(markup, "r1");
        let container = record.element().expect("valid");
        let group = container.find("g").expect("group");

        assert_eq!(container.attribute("viewBox"), Some("0 0 50 20"));
        assert_eq!(group.attribute("viewBox"), None);
        assert_eq!(group.attribute("fill"), Some("red"));
    }

    #[test]
    fn test_symbol_marker_without_symbol_element_is_invalid() {
        let record = symbol_sprite(r#"<p data-x="<symbol ">text</p>"#, "r1");
        assert!(!record.is_valid());
    }

    #[test]
    fn test_external_image_captures_source() {
        let record = classify(
            r#"<img src="/sprites/icons.svg">"#,
            "r1",
            Some("https://example.com"),
        )
        .expect("recognized");
        let image = record.external_image().expect("image kind");

        assert_eq!(image.source(), Some("/sprites/icons.svg"));
        assert_eq!(
            image.absolute_source_url().map(|url| url.as_str()),
            Some("https://example.com/sprites/icons.svg")
        );
        assert!(!record.is_valid());
    }

    #[test]
    fn test_reparse_does_not_panic_on_garbage() {
        let record = VectorRecord::new(RecordKind::InlineSvg, "r1", "<svg <<<");
        assert_eq!(record.reparse(), None);
    }

    #[test]
    fn test_from_storage_keeps_identity() {
        let stored = StorageRecord {
            id: "saved".to_string(),
            last_edited: "2024-02-03T04:05:06.000Z".to_string(),
            svg: r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1 1"/>"#.to_string(),
        };
        let record = from_storage(&stored).expect("recognized");

        assert_eq!(record.id(), "saved");
        assert_eq!(record.last_edited(), "2024-02-03T04:05:06.000Z");
        assert!(record.is_valid());
    }
}
