//! Error types for reading and writing tabulated functions.

use std::fmt;

use thiserror::Error;

use crate::functions::FunctionError;

/// Failure of a codec operation.
///
/// Read paths never return a partially built table: every failure discards
/// what was decoded so far.
#[derive(Debug, Error)]
pub enum CodecError {
    /// IO error raised by the underlying reader or writer.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input does not follow the format.
    #[error("Malformed input{context}: {message}")]
    MalformedInput {
        message: String,
        context: ErrorContext,
    },

    /// The input ended before the declared number of samples was read.
    #[error("Unexpected end of input{context}: expected {expected} points, found {found}")]
    UnexpectedEof {
        expected: usize,
        found: usize,
        context: ErrorContext,
    },

    /// The decoded samples do not form a valid table.
    #[error("Invalid table: {0}")]
    Function(#[from] FunctionError),

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CodecError {
    pub(crate) fn malformed<S: Into<String>>(message: S, context: ErrorContext) -> Self {
        CodecError::MalformedInput {
            message: message.into(),
            context,
        }
    }

    /// True for the malformed-input class: unparsable content and premature
    /// end of input.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            CodecError::MalformedInput { .. } | CodecError::UnexpectedEof { .. }
        )
    }
}

/// Where in the input a codec error occurred.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    /// 1-based line number, for line-oriented formats.
    pub line: Option<usize>,
    /// Byte offset, for binary formats.
    pub offset: Option<u64>,
    /// What was being parsed.
    pub parsing: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line(line: usize) -> Self {
        Self {
            line: Some(line),
            ..Self::default()
        }
    }

    pub fn with_offset(offset: u64) -> Self {
        Self {
            offset: Some(offset),
            ..Self::default()
        }
    }

    pub fn with_parsing<S: Into<String>>(mut self, parsing: S) -> Self {
        self.parsing = Some(parsing.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, " at line {}", line)?;
        }
        if let Some(offset) = self.offset {
            write!(f, " at byte {}", offset)?;
        }
        if let Some(ref parsing) = self.parsing {
            write!(f, " while parsing {}", parsing)?;
        }
        Ok(())
    }
}
