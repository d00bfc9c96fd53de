//! Error codes for markup parsing failures.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Markup well-formedness errors
//! - `E1xx` - Fragment structure errors
//! - `E2xx` - HTML start tag errors

use std::fmt;

/// Error codes for categorizing parse failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Markup Errors (E0xx)
    // =========================================================================
    /// Malformed markup.
    ///
    /// The input is not well-formed, namespace-correct XML.
    E001,

    /// No root element.
    ///
    /// The input contains no element at all, only text, comments or nothing.
    E002,

    // =========================================================================
    // Fragment Errors (E1xx)
    // =========================================================================
    /// Missing template element.
    ///
    /// A fragment classified as a symbol sprite contains no `<symbol>`.
    E100,

    /// Missing group element.
    ///
    /// A fragment classified as a group contains no `<g>`.
    E101,

    // =========================================================================
    // Start Tag Errors (E2xx)
    // =========================================================================
    /// Start tag not found.
    ///
    /// The markup does not contain an opening tag with the expected name.
    E200,

    /// Malformed start tag.
    ///
    /// The opening tag was found but its attributes could not be read.
    E201,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "malformed markup",
            ErrorCode::E002 => "no root element",
            ErrorCode::E100 => "missing symbol element",
            ErrorCode::E101 => "missing group element",
            ErrorCode::E200 => "start tag not found",
            ErrorCode::E201 => "malformed start tag",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E201.to_string(), "E201");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "malformed markup");
        assert_eq!(ErrorCode::E101.description(), "missing group element");
    }
}
