//! The typed vector record model.
//!
//! A [`VectorRecord`] is built from one captured markup string. The fields
//! every record shares live on the struct; what differs between kinds of
//! fragment lives on [`RecordKind`].
//!
//! A record is only usable when it carries a parsed [`Element`]. Validity is
//! derived from that element and never stored separately, so a record cannot
//! claim to be valid without an element tree to back it.
//!
//! # Example
//!
//! ```
//! # use svgsift_core::{element::Element, record::{RecordKind, VectorRecord}};
//! let markup = r#"<svg width="10" height="10" class="icon"></svg>"#;
//! let parsed = Element::new("svg")
//!     .with_attribute("width", "10")
//!     .with_attribute("height", "10")
//!     .with_attribute("class", "icon");
//!
//! let record = VectorRecord::new(RecordKind::InlineSvg, "icon-1", markup)
//!     .with_element(Some(parsed));
//!
//! assert!(record.is_valid());
//! assert_eq!(record.display_name(), "icon-1");
//! assert_eq!(record.presentation().as_deref(), Some("<svg/>"));
//! ```

use chrono::{SecondsFormat, Utc};
use log::trace;
use url::Url;

use crate::{context::Attachment, element::Element, exchange::StorageRecord};

/// Attributes removed from the root element by the presentation transform.
///
/// These compete with the container a fragment is displayed in; without them
/// the fragment is sized by its container and `viewBox` alone.
pub const PRESENTATION_STRIPPED_ATTRIBUTES: [&str; 4] = ["height", "width", "class", "style"];

/// A reference to vector content that lives outside the captured markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalImage {
    source: Option<String>,
    absolute_source_url: Option<Url>,
    origin: String,
}

impl ExternalImage {
    /// Creates an image reference, resolving `source` against `origin`.
    ///
    /// Absolute sources are used as-is. Relative sources are joined onto
    /// `origin`; if either cannot be parsed there is no absolute URL.
    pub fn new(source: Option<String>, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        let absolute_source_url = source
            .as_deref()
            .and_then(|source| resolve_source(source, &origin));

        Self {
            source,
            absolute_source_url,
            origin,
        }
    }

    /// Returns the `src` value as captured, if the tag had one.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Returns the source resolved against the origin.
    pub fn absolute_source_url(&self) -> Option<&Url> {
        self.absolute_source_url.as_ref()
    }

    /// Returns the origin of the document the reference was found in.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns `true` if the source is an inline `data:` URI.
    pub fn is_data_uri(&self) -> bool {
        self.source.as_deref().is_some_and(|source| {
            source
                .trim_start()
                .get(..5)
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
        })
    }
}

fn resolve_source(source: &str, origin: &str) -> Option<Url> {
    let source = source.trim();
    match Url::parse(source) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(origin).ok()?.join(source).ok(),
        Err(_) => None,
    }
}

/// The kind of fragment a record was classified as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
    /// A complete `<svg>` container.
    InlineSvg,
    /// A reusable `<symbol>` template.
    SymbolSprite,
    /// A `<g>` sub-drawing taken from a larger container.
    GroupElement,
    /// An `<img>` pointing at vector content by URL.
    ExternalImage(ExternalImage),
}

impl RecordKind {
    /// Returns a short, stable name for the kind, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::InlineSvg => "inline_svg",
            RecordKind::SymbolSprite => "symbol_sprite",
            RecordKind::GroupElement => "group_element",
            RecordKind::ExternalImage(_) => "external_image",
        }
    }
}

/// A vector fragment captured from a document, typed by [`RecordKind`].
#[derive(Debug, Clone)]
pub struct VectorRecord {
    id: String,
    display_name: String,
    last_edited: String,
    original_markup: String,
    element: Option<Element>,
    cors_restricted: bool,
    attachment: Attachment,
    kind: RecordKind,
}

impl VectorRecord {
    /// Creates an unparsed, live record stamped with the current time.
    pub fn new(
        kind: RecordKind,
        id: impl Into<String>,
        original_markup: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            last_edited: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            original_markup: original_markup.into(),
            element: None,
            cors_restricted: false,
            attachment: Attachment::Live,
            kind,
        }
    }

    /// Sets the parsed element. `None` marks a parse failure.
    pub fn with_element(mut self, element: Option<Element>) -> Self {
        self.element = element;
        self
    }

    /// Overrides the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Overrides the last-edited timestamp, e.g. when restoring from storage.
    pub fn with_last_edited(mut self, last_edited: impl Into<String>) -> Self {
        self.last_edited = last_edited.into();
        self
    }

    /// Marks the record as no longer backed by a live document.
    pub fn detached(mut self) -> Self {
        self.attachment = Attachment::Detached;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn last_edited(&self) -> &str {
        &self.last_edited
    }

    /// Returns the markup exactly as it was captured.
    pub fn original_markup(&self) -> &str {
        &self.original_markup
    }

    /// Returns the parsed element tree, if reconstitution succeeded.
    pub fn element(&self) -> Option<&Element> {
        self.element.as_ref()
    }

    /// Returns `true` if fetching the record's external content failed.
    pub fn cors_restricted(&self) -> bool {
        self.cors_restricted
    }

    pub fn attachment(&self) -> Attachment {
        self.attachment
    }

    pub fn kind(&self) -> &RecordKind {
        &self.kind
    }

    /// Returns the image details if this record is an external reference.
    pub fn external_image(&self) -> Option<&ExternalImage> {
        match &self.kind {
            RecordKind::ExternalImage(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_external_image(&self) -> bool {
        matches!(self.kind, RecordKind::ExternalImage(_))
    }

    /// Returns `true` iff the record carries a parsed element.
    pub fn is_valid(&self) -> bool {
        self.element.is_some()
    }

    /// Stores the element parsed from fetched content.
    ///
    /// Fetched content has no rendering context, so the record becomes
    /// [`Attachment::Detached`].
    pub fn resolve(&mut self, element: Element) {
        trace!(id = self.id; "Record resolved");
        self.element = Some(element);
        self.attachment = Attachment::Detached;
    }

    /// Records that the external content could not be fetched or parsed.
    pub fn mark_cors_restricted(&mut self) {
        self.cors_restricted = true;
        self.element = None;
    }

    /// Returns the display/export markup, or `None` for invalid records.
    ///
    /// See [`present_element`].
    pub fn presentation(&self) -> Option<String> {
        self.element.as_ref().map(present_element)
    }

    /// Converts the record to its persisted form.
    ///
    /// Valid records persist their presentation markup. Invalid records keep
    /// the original markup so nothing captured is lost.
    pub fn to_storage(&self) -> StorageRecord {
        StorageRecord {
            id: self.id.clone(),
            last_edited: self.last_edited.clone(),
            svg: self
                .presentation()
                .unwrap_or_else(|| self.original_markup.clone()),
        }
    }
}

/// Serializes a copy of `element` without the attributes listed in
/// [`PRESENTATION_STRIPPED_ATTRIBUTES`] on its root.
///
/// Applying the transform to its own output changes nothing.
pub fn present_element(element: &Element) -> String {
    let mut clone = element.clone();
    for name in PRESENTATION_STRIPPED_ATTRIBUTES {
        clone.remove_attribute(name);
    }
    clone.to_string()
}
