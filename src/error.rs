//! Error types for refjson encoding and decoding.
//!
//! ## Error Categories
//!
//! - **Syntax Errors**: text that cannot be split into tokens (unterminated
//!   strings, malformed back-references)
//! - **Structure Errors**: a token that does not fit where it appears, such as
//!   an object without its opening `{`
//! - **Conversion Errors**: primitive text that does not parse as the declared type
//! - **Reference Errors**: a back-reference to an object that does not exist yet,
//!   or to an object of another type
//! - **Encoding Errors**: primitive text that is empty, `null` or contains a
//!   delimiter, and shared objects that are mutably borrowed
//! - **Resource Errors**: nesting deeper than the configured limit
//!
//! Decoding errors carry the byte position of the offending token.
//!
//! ## Examples
//!
//! ```rust
//! use refjson::{from_str, Error};
//!
//! let result: Result<Vec<i32>, Error> = from_str("[1,two,3]");
//! assert!(matches!(result, Err(Error::Conversion { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while encoding or decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The input could not be tokenized
    #[error("Syntax error at position {position}: {msg}")]
    Syntax { position: usize, msg: String },

    /// A token appeared where another was required
    #[error("Unexpected token at position {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        position: usize,
        expected: String,
        found: String,
    },

    /// Input ended in the middle of a value
    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },

    /// Primitive text could not be converted to the declared type
    #[error("Cannot convert {text:?} to {target} at position {position}: {msg}")]
    Conversion {
        position: usize,
        text: String,
        target: &'static str,
        msg: String,
    },

    /// A back-reference points past the objects created so far
    #[error("Unresolved reference ${index}$ at position {position}: only {available} objects exist")]
    UnresolvedReference {
        position: usize,
        index: usize,
        available: usize,
    },

    /// A back-reference points to an object that cannot be used as the declared type
    #[error("Reference ${index}$ at position {position} does not point to a shared {expected}")]
    ReferenceTypeMismatch {
        position: usize,
        index: usize,
        expected: &'static str,
    },

    /// A member name is not serializable on the target type
    #[error("Unknown member {name:?} for {type_name} at position {position}")]
    UnknownMember {
        position: usize,
        name: String,
        type_name: &'static str,
    },

    /// A fixed-size array received the wrong number of elements
    #[error("Expected an array of {expected} elements, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// Nesting exceeded the configured maximum depth
    #[error("Nesting exceeds the maximum depth of {limit}; cyclic graphs need reference tracking")]
    DepthLimitExceeded { limit: usize },

    /// Primitive text that would not read back as the same primitive
    #[error("Primitive text {text:?} cannot be written unquoted")]
    InvalidPrimitive { text: String },

    /// A shared object was mutably borrowed while being encoded
    #[error("Shared {type_name} is mutably borrowed and cannot be encoded")]
    Borrowed { type_name: &'static str },

    /// Tokens remained after the top-level value
    #[error("Trailing input at position {position}")]
    TrailingTokens { position: usize },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error at the given byte position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use refjson::Error;
    ///
    /// let err = Error::syntax(10, "unterminated string");
    /// assert!(err.to_string().contains("position 10"));
    /// ```
    pub fn syntax(position: usize, msg: &str) -> Self {
        Error::Syntax {
            position,
            msg: msg.to_string(),
        }
    }

    /// Creates an error for a token that does not fit the grammar at this point.
    pub fn unexpected_token(position: usize, expected: &str, found: &str) -> Self {
        Error::UnexpectedToken {
            position,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(expected: &str) -> Self {
        Error::UnexpectedEof {
            expected: expected.to_string(),
        }
    }

    /// Creates a conversion error for primitive text that failed to parse.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use refjson::Error;
    ///
    /// let err = Error::conversion(3, "abc", "i32", "invalid digit found in string");
    /// assert!(err.to_string().contains("i32"));
    /// ```
    pub fn conversion<T: fmt::Display>(
        position: usize,
        text: &str,
        target: &'static str,
        msg: T,
    ) -> Self {
        Error::Conversion {
            position,
            text: text.to_string(),
            target,
            msg: msg.to_string(),
        }
    }

    /// Creates an error for a back-reference that cannot be resolved yet.
    pub fn unresolved_reference(position: usize, index: usize, available: usize) -> Self {
        Error::UnresolvedReference {
            position,
            index,
            available,
        }
    }

    /// Creates an error for a member name the target type does not serialize.
    pub fn unknown_member(position: usize, name: &str, type_name: &'static str) -> Self {
        Error::UnknownMember {
            position,
            name: name.to_string(),
            type_name,
        }
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use refjson::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` if the error was caused by malformed or mistyped input,
    /// as opposed to I/O or resource limits.
    #[must_use]
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            Error::Syntax { .. }
                | Error::UnexpectedToken { .. }
                | Error::UnexpectedEof { .. }
                | Error::Conversion { .. }
                | Error::UnresolvedReference { .. }
                | Error::ReferenceTypeMismatch { .. }
                | Error::UnknownMember { .. }
                | Error::LengthMismatch { .. }
                | Error::TrailingTokens { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
