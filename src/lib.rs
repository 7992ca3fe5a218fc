//! # serde_succ
//!
//! A Serde-compatible library for SUCC (Sans' Utterly Complete and
//! Consistent) files: a line-oriented configuration format built around
//! `key: value` lines, `- item` list lines, and nesting by indentation.
//!
//! ## What makes SUCC different
//!
//! A SUCC file is not just data, it is a document people edit by hand.
//! Parsing keeps every comment and blank line, and writing a value back
//! only rewrites the lines that value occupies. Load a config, bump one
//! number, save, and the user's comments are all still there.
//!
//! ```text
//! # graphics settings
//! resolution:
//!   width: 1920   # pixels
//!   height: 1080
//! vsync: true
//! ```
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! serde_succ = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Basic Serialization and Deserialization
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_succ::{to_string, from_str};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice".to_string(),
//!     active: true,
//! };
//!
//! let text = to_string(&user).unwrap();
//! assert_eq!(text, "id: 123\nname: Alice\nactive: true");
//!
//! let user_back: User = from_str(&text).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Editing a File In Place
//!
//! [`Document`] is the live form of a file. Reads and writes address
//! top-level keys; everything not touched by a write survives verbatim.
//!
//! ```rust
//! use serde_succ::Document;
//!
//! let text = "# save slot 1\nlevel: 3\nname: player one";
//! let mut doc = Document::parse(text).unwrap();
//!
//! doc.set("level", &4).unwrap();
//! assert_eq!(doc.to_text(), "# save slot 1\nlevel: 4\nname: player one");
//! ```
//!
//! ### Dynamic Values with the succ! Macro
//!
//! ```rust
//! use serde_succ::{succ, Value};
//!
//! let data = succ!({
//!     "name": "Alice",
//!     "age": 30,
//!     "tags": ["rust", "serde"]
//! });
//!
//! if let Value::Map(map) = data {
//!     assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! }
//! ```

pub mod de;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod parse;
pub mod ser;
pub mod tree;
pub mod value;

pub use de::{DocumentDeserializer, NodeDeserializer};
pub use error::{Error, Result};
pub use map::SuccMap;
pub use options::FileStyle;
pub use ser::{to_value, ValueSerializer};
pub use tree::{ChildKind, Document, Line, Node, NodeKind, MULTI_LINE_MARKER, NULL_MARKER};
pub use value::Value;

use serde::{de::DeserializeOwned, Serialize};
use std::io;

/// Serialize any `T: Serialize` to SUCC text.
///
/// The top level of a file is always key-value, so `T` must serialize to a
/// map or struct.
///
/// # Examples
///
/// ```rust
/// use serde_succ::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let text = to_string(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(text, "x: 1\ny: 2");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized, or does not
/// serialize to a key-value structure.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_style(value, FileStyle::default())
}

/// Serialize any `T: Serialize` to SUCC text with a custom [`FileStyle`].
///
/// # Examples
///
/// ```rust
/// use serde_succ::{to_string_with_style, FileStyle};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Config { items: Vec<u32> }
///
/// let style = FileStyle::new().with_indentation_interval(4);
/// let text = to_string_with_style(&Config { items: vec![1, 2] }, style).unwrap();
/// assert_eq!(text, "items:\n    - 1\n    - 2");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized, or does not
/// serialize to a key-value structure.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_style<T>(value: &T, style: FileStyle) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let value = to_value(value)?;
    let Value::Map(map) = value else {
        return Err(Error::custom(
            "a top-level SUCC value must serialize to a key-value structure",
        ));
    };
    let mut document = Document::with_style(style);
    for (key, entry) in map.iter() {
        document.set(key, entry)?;
    }
    Ok(document.to_text())
}

/// Serialize any `T: Serialize` to a writer as SUCC text.
///
/// # Examples
///
/// ```rust
/// use serde_succ::to_writer;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(buffer, b"x: 1\ny: 2");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_style(writer, value, FileStyle::default())
}

/// Serialize any `T: Serialize` to a writer with a custom [`FileStyle`].
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_style<W, T>(mut writer: W, value: &T, style: FileStyle) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string_with_style(value, style)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from SUCC text.
///
/// The top level of the file is read as a map, so `T` is typically a
/// struct, a map type, or [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_succ::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x: 1\ny: 2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the input is not well-formed SUCC (with the
/// offending line number) or cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let document = Document::parse(s)?;
    T::deserialize(DocumentDeserializer::new(&document))
}

/// Deserialize an instance of type `T` from bytes of SUCC text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not well-formed
/// SUCC, or cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

/// Deserialize an instance of type `T` from an I/O stream of SUCC text.
///
/// # Examples
///
/// ```rust
/// use serde_succ::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_reader(Cursor::new(b"x: 1\ny: 2")).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is not well-formed SUCC,
/// or the data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
    }

    #[test]
    fn test_serialize_deserialize_point() {
        let point = Point { x: 1, y: 2 };
        let text = to_string(&point).unwrap();
        let point_back: Point = from_str(&text).unwrap();
        assert_eq!(point, point_back);
    }

    #[test]
    fn test_serialize_deserialize_user() {
        let user = User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
        };

        let text = to_string(&user).unwrap();
        assert_eq!(
            text,
            "id: 123\nname: Alice\nactive: true\ntags:\n  - admin\n  - user"
        );
        let user_back: User = from_str(&text).unwrap();
        assert_eq!(user, user_back);
    }

    #[test]
    fn test_top_level_must_be_key_value() {
        assert!(to_string(&[1, 2, 3]).is_err());
        assert!(to_string(&42).is_err());
    }

    #[test]
    fn test_to_value() {
        let value = to_value(&Point { x: 1, y: 2 }).unwrap();
        match value {
            Value::Map(map) => {
                assert_eq!(map.get("x"), Some(&Value::Integer(1)));
                assert_eq!(map.get("y"), Some(&Value::Integer(2)));
            }
            _ => panic!("Expected map"),
        }
    }

    #[test]
    fn test_dynamic_document_read() {
        let value: Value = from_str("a: 1\nb:\n  - x\n  - y").unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.get("a").and_then(Value::as_i64), Some(1));
        assert_eq!(map.get("b").and_then(Value::as_list).map(Vec::len), Some(2));
    }

    #[test]
    fn test_custom_style() {
        let user = User {
            id: 1,
            name: "Bob".to_string(),
            active: false,
            tags: vec!["a".to_string()],
        };

        let style = FileStyle::new().with_indentation_interval(4);
        let text = to_string_with_style(&user, style).unwrap();
        assert!(text.contains("\n    - a"));
        let user_back: User = from_str(&text).unwrap();
        assert_eq!(user, user_back);
    }

    #[test]
    fn test_writer_and_reader_round_trip() {
        let point = Point { x: 3, y: 4 };
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &point).unwrap();
        let back: Point = from_slice(&buffer).unwrap();
        assert_eq!(point, back);
    }
}
