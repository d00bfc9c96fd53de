//! Live rendering context capability.
//!
//! Some viewport inference needs the rendered geometry of a fragment, which
//! only exists while the fragment is still part of the document it was
//! scanned from. That capability is modelled in two halves:
//!
//! - [`Attachment`] records whether a record still belongs to its live
//!   originating document.
//! - [`BoundsProvider`] is implemented by a host that owns such a document and
//!   can measure fragments in it.
//!
//! Geometry is only requested when both are present.

use crate::{geometry::Rect, record::VectorRecord};

/// Whether a record is still backed by its originating document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Attachment {
    /// Captured from a live document that can still measure the fragment.
    #[default]
    Live,
    /// Built from fetched or re-parsed content with no rendering context.
    Detached,
}

impl Attachment {
    /// Returns `true` for [`Attachment::Live`].
    pub fn is_live(self) -> bool {
        matches!(self, Attachment::Live)
    }
}

/// A host rendering context able to measure live fragments.
///
/// Implementations are only ever asked about records whose
/// [`attachment`](VectorRecord::attachment) is [`Attachment::Live`].
pub trait BoundsProvider {
    /// Returns the rendered bounding box of the record's fragment.
    fn bounding_box(&self, record: &VectorRecord) -> Rect;
}

impl<F> BoundsProvider for F
where
    F: Fn(&VectorRecord) -> Rect,
{
    fn bounding_box(&self, record: &VectorRecord) -> Rect {
        self(record)
    }
}
