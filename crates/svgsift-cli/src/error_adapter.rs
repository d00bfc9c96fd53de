//! Error adapter for converting SiftError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! Malformed input batches are rendered with the offending location of the
//! JSON document labelled; every other error is rendered as a plain message
//! with a stable code.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use svgsift::SiftError;

const BATCH_HELP: &str =
    r#"a document batch looks like {"data": [{"id": "...", "svg": "..."}], "host": "...", "origin": "..."}"#;

/// Adapter for a JSON error in the input batch.
///
/// This adapter wraps a [`serde_json::Error`] together with the document it
/// was raised for and implements [`MietteDiagnostic`] to point at the
/// location serde reported.
pub struct JsonAdapter<'a> {
    /// The wrapped error
    err: &'a serde_json::Error,
    /// Source document for displaying snippets
    src: &'a str,
}

impl<'a> JsonAdapter<'a> {
    /// Create a new JSON error adapter.
    pub fn new(err: &'a serde_json::Error, src: &'a str) -> Self {
        Self { err, src }
    }

    fn span(&self) -> SourceSpan {
        let offset = json_offset(self.src, self.err.line(), self.err.column());
        let len = usize::from(offset < self.src.len());
        SourceSpan::new(offset.into(), len)
    }
}

impl fmt::Debug for JsonAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for JsonAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid document batch")
    }
}

impl std::error::Error for JsonAdapter<'_> {}

impl MietteDiagnostic for JsonAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("svgsift::json"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(BATCH_HELP))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_primary_with_span(Some(self.err.to_string()), self.span());
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for [`SiftError`] variants without a source document.
pub struct ErrorAdapter<'a>(pub &'a SiftError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            SiftError::Io(_) => "svgsift::io",
            SiftError::Json { .. } => "svgsift::json",
            SiftError::Config(_) => "svgsift::config",
            SiftError::Runtime(_) => "svgsift::runtime",
            SiftError::HttpClient(_) => "svgsift::http_client",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A malformed input batch with source location information.
    Json(JsonAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Json(j) => fmt::Display::fmt(j, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Json(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Json(j) => j.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Json(j) => j.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Json(j) => j.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Json(j) => j.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Byte offset of a 1-based line and column reported by serde_json.
fn json_offset(src: &str, line: usize, column: usize) -> usize {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(src.len())
}

/// Convert a [`SiftError`] into a list of reportable errors.
pub fn to_reportables(err: &SiftError) -> Vec<Reportable<'_>> {
    match err {
        SiftError::Json { err: json_err, src } => {
            vec![Reportable::Json(JsonAdapter::new(json_err, src))]
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error(src: &str) -> SiftError {
        let err = serde_json::from_str::<svgsift::exchange::DocumentBatch>(src)
            .expect_err("invalid batch");
        SiftError::new_json_error(err, src)
    }

    #[test]
    fn test_json_error_is_labelled() {
        let src = "{\n  \"data\": [\n    {\"id\": 1}\n  ]\n}";
        let err = json_error(src);

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Json(j) => {
                assert_eq!(j.to_string(), "Invalid document batch");
                assert_eq!(j.code().map(|c| c.to_string()).as_deref(), Some("svgsift::json"));

                let labels: Vec<_> = j.labels().expect("labelled").collect();
                assert_eq!(labels.len(), 1);
                assert!(labels[0].primary());
                assert!(labels[0].offset() > src.find("data").expect("key present"));
            }
            Reportable::Error(_) => panic!("Expected Json"),
        }
    }

    #[test]
    fn test_json_error_at_end_of_input() {
        let src = "{\"data\": [";
        let err = json_error(src);

        let reportables = to_reportables(&err);
        let labels: Vec<_> = reportables[0].labels().expect("labelled").collect();
        assert!(labels[0].offset() <= src.len());
    }

    #[test]
    fn test_non_json_error() {
        let err = SiftError::Config("Missing configuration file: a.toml".to_string());

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(
                    e.to_string(),
                    "Configuration error: Missing configuration file: a.toml"
                );
                assert_eq!(e.code().map(|c| c.to_string()).as_deref(), Some("svgsift::config"));
                assert!(e.labels().is_none());
            }
            Reportable::Json(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_json_offset() {
        let src = "ab\ncd\nef";
        assert_eq!(json_offset(src, 1, 1), 0);
        assert_eq!(json_offset(src, 2, 2), 4);
        assert_eq!(json_offset(src, 3, 9), src.len());
    }
}
