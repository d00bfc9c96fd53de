//! Error types for markup parsing.
//!
//! Every failure to reconstitute markup is reported as a [`ParseError`]
//! carrying an [`ErrorCode`] and, when the XML parser reported one, the
//! position in the input where parsing stopped.
//!
//! Parse errors never escape the extraction pipeline. They are logged and
//! turn into records that report themselves invalid.
//!
//! # Example
//!
//! ```
//! # use svgsift_parser::error::{ErrorCode, ParseError};
//! let err = ParseError::new(ErrorCode::E100, "no <symbol> element in fragment");
//! assert_eq!(err.to_string(), "error[E100]: no <symbol> element in fragment");
//! ```

mod error_code;
mod parse_error;

pub(crate) use parse_error::Result;

pub use error_code::ErrorCode;
pub use parse_error::{ParseError, TextPosition};
