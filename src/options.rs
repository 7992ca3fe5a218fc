//! Formatting configuration for SUCC output.
//!
//! [`FileStyle`] controls how newly written nodes are rendered. It never
//! affects parsing, and it never affects lines the marshaller did not touch:
//! untouched raw text is replayed verbatim.
//!
//! ## Examples
//!
//! ```rust
//! use serde_succ::{to_string_with_style, FileStyle};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data { name: String }
//!
//! let data = Data { name: "Alice".to_string() };
//!
//! let style = FileStyle::new().with_indentation_interval(4);
//! let succ = to_string_with_style(&data, style).unwrap();
//! assert_eq!(succ, "name: Alice");
//! ```

/// Formatting options applied when the marshaller writes or rewrites nodes.
///
/// # Examples
///
/// ```rust
/// use serde_succ::FileStyle;
///
/// // Defaults: 2-space indentation, strings quoted only when necessary
/// let style = FileStyle::new();
/// assert_eq!(style.indentation_interval, 2);
/// assert!(!style.always_quote_strings);
///
/// let style = FileStyle::new()
///     .with_indentation_interval(4)
///     .with_always_quote_strings(true);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileStyle {
    /// Number of spaces added per nesting level for newly created children.
    pub indentation_interval: usize,
    /// Quote every string value, not just the ones that need it.
    pub always_quote_strings: bool,
}

impl Default for FileStyle {
    fn default() -> Self {
        FileStyle {
            indentation_interval: 2,
            always_quote_strings: false,
        }
    }
}

impl FileStyle {
    /// Creates the default style (2-space indentation, minimal quoting).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of spaces per nesting level.
    #[must_use]
    pub fn with_indentation_interval(mut self, interval: usize) -> Self {
        self.indentation_interval = interval;
        self
    }

    /// Forces quoting of all string values.
    #[must_use]
    pub fn with_always_quote_strings(mut self, always: bool) -> Self {
        self.always_quote_strings = always;
        self
    }
}
