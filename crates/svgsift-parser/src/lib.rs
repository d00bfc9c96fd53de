//! Markup parsing for svgsift.
//!
//! This crate turns captured markup strings into typed records:
//!
//! - [`classify`] picks a [`RecordKind`](svgsift_core::record::RecordKind)
//!   by marker and reconstitutes the fragment into an element tree.
//! - [`xml`] parses well-formed, namespace-aware documents and fragments.
//! - [`tag`] reads the attributes of lenient HTML start tags.
//! - [`length`] parses length and `viewBox` attribute values.
//!
//! Failures are reported as [`ParseError`], but the classification entry
//! points never return them: a record that cannot be reconstituted is
//! returned invalid instead.

pub mod classify;
pub mod error;
pub mod length;
pub mod tag;
pub mod xml;

pub use classify::{Reparse, classify, from_storage};
pub use error::ParseError;
