//! Viewport inference.
//!
//! A fragment without a `viewBox` cannot scale to fit the container it is
//! displayed in. The [`Normalizer`] infers one with the first rule that
//! applies:
//!
//! 1. A declared `viewBox` is kept as-is.
//! 2. Declared `width` and `height` give `0 0 <width> <height>`, with unit
//!    suffixes dropped.
//! 3. The rendered bounding box, only for records still attached to their
//!    live document and only when a [`BoundsProvider`] is available.
//!
//! External image references are never normalized.
//!
//! # Example
//!
//! ```
//! # use svgsift::normalize::Normalizer;
//! # use svgsift_parser::classify;
//! let record = classify::inline_svg(
//!     r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50"/>"#,
//!     "icon",
//! );
//! let normalized = Normalizer::detached().normalize(&record).unwrap();
//! assert_eq!(normalized.attribute("viewBox"), Some("0 0 100 50"));
//! ```

use log::trace;

use svgsift_core::{
    context::BoundsProvider,
    element::Element,
    geometry::ViewBox,
    record::{RecordKind, VectorRecord},
};
use svgsift_parser::length::{parse_length, parse_view_box};

/// The inference rule that produced a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// From declared `width` and `height`.
    Dimensions,
    /// From the live rendered bounding box.
    Bounds,
}

/// The viewport of a record, and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Viewport {
    /// The fragment declares its own `viewBox`, kept verbatim.
    Declared(String),
    /// A `viewBox` inferred by one of the rules.
    Inferred { view_box: ViewBox, rule: Rule },
    /// No rule applies.
    Unknown,
    /// The record kind is not normalized, or the record is invalid.
    NotApplicable,
}

/// Infers viewports for records.
///
/// Built with [`Normalizer::detached`] the live rule never applies. Built
/// with [`Normalizer::with_live_context`] it is used for live records.
#[derive(Clone, Copy, Default)]
pub struct Normalizer<'ctx> {
    live: Option<&'ctx dyn BoundsProvider>,
}

impl<'ctx> Normalizer<'ctx> {
    /// A normalizer without a rendering context.
    pub fn detached() -> Self {
        Self { live: None }
    }

    /// A normalizer able to measure live records through `provider`.
    pub fn with_live_context(provider: &'ctx dyn BoundsProvider) -> Self {
        Self {
            live: Some(provider),
        }
    }

    /// Determines the viewport of `record`.
    pub fn viewport(&self, record: &VectorRecord) -> Viewport {
        let Some(root) = record.element() else {
            return Viewport::NotApplicable;
        };
        let fragment = match record.kind() {
            RecordKind::InlineSvg => None,
            RecordKind::SymbolSprite => root.find("symbol"),
            RecordKind::GroupElement => root.find("g"),
            RecordKind::ExternalImage(_) => return Viewport::NotApplicable,
        };
        let candidates = || std::iter::once(root).chain(fragment);

        if let Some(declared) = candidates().find_map(declared_view_box) {
            return Viewport::Declared(declared.to_string());
        }

        if let Some(view_box) = candidates().find_map(dimensions) {
            return Viewport::Inferred {
                view_box,
                rule: Rule::Dimensions,
            };
        }

        match self.live {
            Some(provider) if record.attachment().is_live() => {
                let bounds = provider.bounding_box(record);
                trace!(id = record.id(), bounds:?; "Measured live record");
                Viewport::Inferred {
                    view_box: ViewBox::from(bounds),
                    rule: Rule::Bounds,
                }
            }
            _ => Viewport::Unknown,
        }
    }

    /// Returns the record's effective `viewBox`, declared or inferred.
    ///
    /// A declared value that does not parse as four numbers yields `None`.
    pub fn view_box(&self, record: &VectorRecord) -> Option<ViewBox> {
        match self.viewport(record) {
            Viewport::Declared(declared) => parse_view_box(&declared),
            Viewport::Inferred { view_box, .. } => Some(view_box),
            Viewport::Unknown | Viewport::NotApplicable => None,
        }
    }

    /// Returns a copy of the record's element with an inferred `viewBox`
    /// set on its root, or `None` for invalid records.
    ///
    /// Records that declare a viewport, records no rule applies to and
    /// external images are returned unchanged.
    pub fn normalize(&self, record: &VectorRecord) -> Option<Element> {
        let mut element = record.element()?.clone();
        if let Viewport::Inferred { view_box, rule } = self.viewport(record) {
            trace!(id = record.id(), rule:?, view_box:%; "Inferred viewport");
            element.set_attribute("viewBox", view_box.to_string());
        }
        Some(element)
    }
}

fn declared_view_box(element: &Element) -> Option<&str> {
    element
        .attribute("viewBox")
        .filter(|value| !value.trim().is_empty())
}

fn dimensions(element: &Element) -> Option<ViewBox> {
    let width = element.attribute("width").and_then(parse_length)?;
    let height = element.attribute("height").and_then(parse_length)?;
    Some(ViewBox::from_dimensions(width, height))
}
