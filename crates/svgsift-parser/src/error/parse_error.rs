//! The ParseError type.

use std::fmt;

use crate::error::ErrorCode;

/// A type alias for `Result<T, ParseError>`.
pub type Result<T> = std::result::Result<T, ParseError>;

/// A 1-based row and column in the parsed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPosition {
    row: u32,
    col: u32,
}

impl TextPosition {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    pub fn row(self) -> u32 {
        self.row
    }

    pub fn col(self) -> u32 {
        self.col
    }
}

impl From<roxmltree::TextPos> for TextPosition {
    fn from(pos: roxmltree::TextPos) -> Self {
        Self::new(pos.row, pos.col)
    }
}

/// Error raised when markup cannot be reconstituted into an element tree.
#[derive(Debug, Clone)]
pub struct ParseError {
    code: ErrorCode,
    message: String,
    position: Option<TextPosition>,
}

impl ParseError {
    /// Create a new parse error without position information.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            position: None,
        }
    }

    /// Attach the position where parsing stopped.
    pub fn with_position(mut self, position: TextPosition) -> Self {
        self.position = Some(position);
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn position(&self) -> Option<TextPosition> {
        self.position
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)?;
        if let Some(position) = self.position {
            write!(f, " at {}:{}", position.row(), position.col())?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<roxmltree::Error> for ParseError {
    fn from(err: roxmltree::Error) -> Self {
        let code = match err {
            roxmltree::Error::NoRootNode => ErrorCode::E002,
            _ => ErrorCode::E001,
        };
        Self::new(code, err.to_string()).with_position(err.pos().into())
    }
}
