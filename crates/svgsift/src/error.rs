//! Error types for svgsift operations.
//!
//! Two families of errors exist and they never mix:
//!
//! - [`FetchError`] describes why one external image could not be fetched.
//!   It is logged and recorded on the record as a CORS restriction; it never
//!   leaves the pipeline.
//! - [`SiftError`] describes failures of the host around the pipeline:
//!   reading input, building the HTTP client, loading configuration.

use std::io;

use thiserror::Error;

use svgsift_parser::error::ParseError;

/// The main error type for svgsift hosts.
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Json { err: serde_json::Error, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl SiftError {
    /// Create a new `Json` error with the document that failed to parse.
    pub fn new_json_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Json {
            err,
            src: src.into(),
        }
    }
}

/// Why fetching an external image reference failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no fetchable URL for source {0:?}")]
    InvalidUrl(Option<String>),

    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("response is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("cross-origin response from {target} does not allow origin {origin:?}")]
    CrossOrigin { target: String, origin: String },

    #[error("malformed data URI: {0}")]
    DataUri(String),
}

/// Why an external image reference could not be turned into an element.
///
/// Both variants leave the record CORS-restricted.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("fetched content is not a vector document: {0}")]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_keeps_source() {
        let src = r#"{"data": [}"#;
        let err = serde_json::from_str::<serde_json::Value>(src).expect_err("invalid json");
        let err = SiftError::new_json_error(err, src);

        match &err {
            SiftError::Json { src: kept, .. } => assert_eq!(kept, src),
            other => panic!("Expected Json error, got {other:?}"),
        }
    }

    #[test]
    fn test_fetch_error_messages() {
        assert_eq!(FetchError::Status(404).to_string(), "server responded with status 404");
        assert_eq!(
            FetchError::CrossOrigin {
                target: "https://cdn.test/a.svg".to_string(),
                origin: "https://example.com".to_string(),
            }
            .to_string(),
            r#"cross-origin response from https://cdn.test/a.svg does not allow origin "https://example.com""#
        );
    }
}
