//! Error types for the gridq grammar parser

use std::fmt;

/// Errors that can occur while parsing a filter string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input was empty or whitespace-only
    EmptyInput,

    /// Comparator token not in the known comparator set.
    ///
    /// Fails the whole parse: an unknown comparator indicates a
    /// serializer/parser version mismatch, not recoverable user input.
    UnknownComparator {
        /// The offending token
        token: String,
    },

    /// Invalid syntax
    InvalidSyntax {
        /// Description of the syntax error
        message: String,
        /// Byte position in the input
        position: usize,
    },

    /// General parsing error
    General {
        /// Error message
        message: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyInput => write!(f, "Empty input"),
            ParseError::UnknownComparator { token } => {
                write!(f, "Unknown comparator '{}'", token)
            }
            ParseError::InvalidSyntax { message, position } => {
                write!(f, "Invalid syntax at position {}: {}", position, message)
            }
            ParseError::General { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Result type for parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;
