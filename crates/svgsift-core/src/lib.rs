//! svgsift Core Types and Definitions
//!
//! This crate provides the foundational types shared by the svgsift
//! extraction pipeline. It includes:
//!
//! - **Element**: An owned, serializable vector-markup element tree ([`element::Element`])
//! - **Geometry**: Viewport and rectangle types ([`geometry`] module)
//! - **Context**: The live rendering context capability ([`context`] module)
//! - **Record**: The typed vector record model ([`record::VectorRecord`])
//! - **Exchange**: Shapes exchanged with the document scanner and storage ([`exchange`] module)

pub mod context;
pub mod element;
pub mod exchange;
pub mod geometry;
pub mod record;
