//! Shapes exchanged with external collaborators.
//!
//! The document scanner hands the pipeline a [`DocumentBatch`]; storage
//! persists [`StorageRecord`]s. Both serialize to the JSON layout those
//! collaborators already use (camelCase keys).

use serde::{Deserialize, Serialize};

/// One candidate markup string captured by the document scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Identifier assigned by the scanner, unique within the batch.
    pub id: String,
    /// The raw markup as captured.
    pub svg: String,
}

impl Candidate {
    /// Creates a candidate from an id and its raw markup.
    pub fn new(id: impl Into<String>, svg: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            svg: svg.into(),
        }
    }
}

/// The result of scanning one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentBatch {
    /// Candidate markup strings in scan order.
    pub data: Vec<Candidate>,
    /// Host of the scanned document.
    #[serde(default)]
    pub host: String,
    /// Origin of the scanned document, used to resolve relative image sources.
    #[serde(default)]
    pub origin: String,
}

impl DocumentBatch {
    /// Creates a batch for a document at `origin`.
    pub fn new(data: Vec<Candidate>, host: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            data,
            host: host.into(),
            origin: origin.into(),
        }
    }
}

/// The persisted form of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageRecord {
    pub id: String,
    pub last_edited: String,
    pub svg: String,
}
