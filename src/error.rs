//! Error types for SUCC parsing, serialization and marshalling.
//!
//! There are three families of failure:
//!
//! - **Format errors**: the input text violates the SUCC grammar or its
//!   structural rules (tabs, malformed lines, sibling indentation or kind
//!   mismatches, duplicate keys, unterminated multi-line blocks). Parse-time
//!   format errors always carry the 1-based line number.
//! - **Conversion errors**: a node's stored structure or text does not match
//!   the requested Rust type. These wrap the underlying cause together with
//!   the offending node and target type as they propagate outward.
//! - **Internal errors**: defensive invariants that should be unreachable.
//!   Seeing one is a bug in this crate, not a problem with the input.
//!
//! ## Examples
//!
//! ```rust
//! use serde_succ::{Document, Error};
//!
//! let err = Document::parse("a: 1\na: 2").unwrap_err();
//! match err {
//!     Error::Format { line, .. } => assert_eq!(line, 2),
//!     _ => panic!("expected a format error"),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// All errors this crate can produce.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Grammar or structural violation found while parsing. `line` is 1-based.
    #[error("format error at line {line}: {msg}")]
    Format { line: usize, msg: String },

    /// Structural violation on an already-parsed node, e.g. a collection
    /// node that carries a scalar value.
    #[error("invalid node structure: {0}")]
    Node(String),

    /// A node could not be converted to or from the requested type.
    /// Wraps the innermost cause with the node and target type.
    #[error("cannot convert node `{node}` to {target}: {source}")]
    Conversion {
        node: String,
        target: String,
        #[source]
        source: Box<Error>,
    },

    /// Scalar text does not match the requested type, or the requested
    /// shape conflicts with the stored structure.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Location context added while descending into children.
    #[error("in {context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },

    /// A defensive invariant was violated. This is a bug in serde_succ.
    #[error("internal error (this is a bug in serde_succ): {0}")]
    Internal(String),

    /// Generic message, used for serde-originated errors.
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates a format error at a 1-based line number.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_succ::Error;
    ///
    /// let err = Error::format(3, "tabs are not allowed");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn format(line: usize, msg: impl Into<String>) -> Self {
        Error::Format {
            line,
            msg: msg.into(),
        }
    }

    /// Creates a structural error on a node with no associated line.
    pub fn node(msg: impl Into<String>) -> Self {
        Error::Node(msg.into())
    }

    /// Wraps `source` with the node and target type it failed for.
    pub fn conversion(node: impl Into<String>, target: impl Into<String>, source: Error) -> Self {
        Error::Conversion {
            node: node.into(),
            target: target.into(),
            source: Box::new(source),
        }
    }

    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_succ::Error;
    ///
    /// let err = Error::type_mismatch("an integer", "hello");
    /// assert!(err.to_string().contains("expected an integer"));
    /// ```
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Error::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Wraps `source` with a location description such as `key 'foo'`.
    pub fn context(context: impl Into<String>, source: Error) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Creates an internal-invariant error. Reaching this is a bug.
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }

    /// Creates an I/O error.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
