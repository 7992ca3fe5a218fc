//! Serialization of Rust values into SUCC nodes.
//!
//! Serialization happens in two steps: a [`serde::Serializer`] impl turns
//! any `Serialize` type into a [`Value`], and [`write_node`] applies that
//! value to a node in the document tree. Applying is a merge, not a
//! rewrite: key-value structures reuse existing child entries by key, so
//! comments and formatting on lines the new value does not replace come
//! back untouched.

use crate::options::FileStyle;
use crate::tree::{
    maybe_quote, needs_quoting, quote, ChildKind, Line, Node, MULTI_LINE_MARKER, NULL_MARKER,
};
use crate::value::Value;
use crate::{Error, Result, SuccMap};
use serde::{ser, Serialize};
use std::collections::HashSet;

/// Converts any serializable value into a [`Value`].
///
/// # Errors
///
/// Fails if the value cannot be represented, for example a map with
/// non-scalar keys.
///
/// # Examples
///
/// ```rust
/// use serde_succ::{to_value, Value};
///
/// let value = to_value(&vec![1, 2, 3]).unwrap();
/// assert_eq!(value, Value::List(vec![
///     Value::Integer(1),
///     Value::Integer(2),
///     Value::Integer(3),
/// ]));
/// ```
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

/// Serializes `value` into `node`, replacing whatever the node held.
pub(crate) fn write_node<T: Serialize + ?Sized>(
    node: &mut Node,
    value: &T,
    style: &FileStyle,
) -> Result<()> {
    let value = to_value(value).map_err(|e| {
        Error::conversion(node.describe(), std::any::type_name::<T>().to_string(), e)
    })?;
    apply_value(node, &value, style);
    Ok(())
}

/// Writes a [`Value`] into a node, merging with what is already there.
pub(crate) fn apply_value(node: &mut Node, value: &Value, style: &FileStyle) {
    match value {
        Value::Null => {
            node.clear_children(ChildKind::None);
            node.set_value(NULL_MARKER);
        }
        Value::Bool(b) => {
            node.clear_children(ChildKind::None);
            node.set_value(if *b { "true" } else { "false" });
        }
        Value::Integer(i) => {
            node.clear_children(ChildKind::None);
            node.set_value(&i.to_string());
        }
        Value::Float(f) => {
            node.clear_children(ChildKind::None);
            node.set_value(&f.to_string());
        }
        Value::Date(dt) => {
            node.clear_children(ChildKind::None);
            node.set_value(&dt.to_rfc3339());
        }
        Value::String(s) => apply_string(node, s, style),
        Value::List(list) => apply_list(node, list, style),
        Value::Map(map) => apply_map(node, map, style),
    }
}

fn apply_string(node: &mut Node, s: &str, style: &FileStyle) {
    // A string stays in multi-line form once authored that way, even if the
    // new value fits on one line.
    let block_form = s.contains('\n') || node.child_kind() == ChildKind::MultiLineString;
    if block_form && block_lines_writable(s) {
        let indentation = block_indentation(node, style);
        let terminator_comment = node
            .child_nodes()
            .find(|child| child.is_multi_line_terminator())
            .and_then(Node::comment)
            .map(str::to_string);
        node.clear_children(ChildKind::MultiLineString);
        for line in s.split('\n') {
            node.add_child(Line::Node(Node::fresh_multi_line_line(line, indentation)));
        }
        let mut terminator = Node::fresh_multi_line_line(MULTI_LINE_MARKER, indentation);
        terminator.set_comment(terminator_comment);
        node.add_child(Line::Node(terminator));
        node.set_value(MULTI_LINE_MARKER);
        return;
    }

    node.clear_children(ChildKind::None);
    if s.contains('\n') {
        node.set_value(&quote(s));
    } else {
        node.set_value(&maybe_quote(s, style.always_quote_strings));
    }
}

/// Block lines go into the file verbatim, so content the parser would
/// reindent, reject, or mistake for the terminator cannot take block form
/// and is quoted onto one line instead.
fn block_lines_writable(s: &str) -> bool {
    s.split('\n').all(|line| {
        !line.starts_with(char::is_whitespace)
            && !line.ends_with(char::is_whitespace)
            && !line.contains('\t')
            && !line.contains('\r')
            && line != MULTI_LINE_MARKER
    })
}

fn apply_list(node: &mut Node, list: &[Value], style: &FileStyle) {
    let indentation = child_indentation(node, style);
    node.clear_children(ChildKind::List);
    node.set_value("");
    for element in list {
        let mut child = Node::fresh_list_item(indentation);
        apply_value(&mut child, element, style);
        node.add_child(Line::Node(child));
    }
}

/// Key children already present are rewritten in place; new keys are
/// appended; keys absent from the map are removed. Plain lines between the
/// entries stay where they are.
fn apply_map(node: &mut Node, map: &SuccMap, style: &FileStyle) {
    let indentation = child_indentation(node, style);
    if node.child_kind() != ChildKind::Key {
        node.clear_children(ChildKind::Key);
    }
    node.set_value("");

    for (key, value) in map.iter() {
        if let Some(child) = node.child_by_key_mut(key) {
            apply_value(child, value, style);
        } else {
            let mut child = Node::fresh_key(&key_text(key), indentation);
            apply_value(&mut child, value, style);
            node.add_child(Line::Node(child));
        }
    }

    let keep: HashSet<&str> = map.keys().map(String::as_str).collect();
    node.children_mut().retain(|line| match line {
        Line::Plain(_) => true,
        Line::Node(child) => child
            .key()
            .map(crate::tree::unquote)
            .is_some_and(|key| keep.contains(key.as_str())),
    });
}

/// Rendering of a map key onto a line. Beyond the usual quoting rules, a
/// key must not contain an unquoted colon or begin with a dash. The
/// always-quote style knob applies to values only, never keys.
pub(crate) fn key_text(key: &str) -> String {
    if needs_quoting(key, false) || key.contains(':') || key.starts_with('-') {
        quote(key)
    } else {
        key.to_string()
    }
}

fn child_indentation(node: &Node, style: &FileStyle) -> usize {
    node.child_nodes()
        .next()
        .map(|child| child.indentation())
        .unwrap_or(node.indentation() + style.indentation_interval)
}

fn block_indentation(node: &Node, style: &FileStyle) -> usize {
    if node.child_kind() == ChildKind::MultiLineString {
        if let Some(child) = node.child_nodes().next() {
            return child.indentation();
        }
    }
    node.indentation() + style.indentation_interval
}

pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
}

pub struct SerializeMapValue {
    map: SuccMap,
    current_key: Option<String>,
}

/// Wraps the values of an enum variant under a single key named after the
/// variant, mirroring the nested form `variant:` takes in a file.
pub struct SerializeVariant<Inner> {
    variant: &'static str,
    inner: Inner,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVariant<SerializeVec>;
    type SerializeMap = SerializeMapValue;
    type SerializeStruct = SerializeMapValue;
    type SerializeStructVariant = SerializeVariant<SerializeMapValue>;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        // Above i64 range the exact decimal form is kept as a string.
        match i64::try_from(v) {
            Ok(i) => Ok(Value::Integer(i)),
            Err(_) => Ok(Value::String(v.to_string())),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(v as f64))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        let vec = v.iter().map(|&b| Value::Integer(b as i64)).collect();
        Ok(Value::List(vec))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let mut map = SuccMap::new();
        map.insert(variant.to_string(), to_value(value)?);
        Ok(Value::Map(map))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new())
    }

    fn serialize_tuple(self, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new())
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(SerializeVariant {
            variant,
            inner: SerializeVec::new(),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMapValue> {
        Ok(SerializeMapValue::new())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMapValue> {
        Ok(SerializeMapValue::new())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(SerializeVariant {
            variant,
            inner: SerializeMapValue::new(),
        })
    }
}

impl SerializeVec {
    fn new() -> Self {
        SerializeVec { vec: Vec::new() }
    }
}

impl SerializeMapValue {
    fn new() -> Self {
        SerializeMapValue {
            map: SuccMap::new(),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::List(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::List(self.vec))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::List(self.vec))
    }
}

impl ser::SerializeTupleVariant for SerializeVariant<SerializeVec> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut map = SuccMap::new();
        map.insert(self.variant.to_string(), Value::List(self.inner.vec));
        Ok(Value::Map(map))
    }
}

impl ser::SerializeMap for SerializeMapValue {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.current_key = Some(map_key_text(&to_value(key)?)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Map(self.map))
    }
}

impl ser::SerializeStruct for SerializeMapValue {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Map(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeVariant<SerializeMapValue> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut map = SuccMap::new();
        map.insert(self.variant.to_string(), Value::Map(self.inner.map));
        Ok(Value::Map(map))
    }
}

/// Map keys occupy the key position of a line, so they must render on a
/// single line. Scalars qualify; collections and multi-line strings do not.
fn map_key_text(key: &Value) -> Result<String> {
    match key {
        Value::String(s) if !s.contains('\n') => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Date(dt) => Ok(dt.to_rfc3339()),
        _ => Err(Error::custom(
            "map keys must have a single-line representation",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    #[test]
    fn scalar_write_replaces_value_in_place() {
        let mut doc = Document::parse("count: 1 # how many").unwrap();
        doc.set("count", &7).unwrap();
        assert_eq!(doc.to_text(), "count: 7 # how many");
    }

    #[test]
    fn none_writes_null_marker() {
        let mut doc = Document::new();
        doc.set("maybe", &Option::<i32>::None).unwrap();
        assert_eq!(doc.to_text(), "maybe: null");
    }

    #[test]
    fn null_write_clears_children() {
        let mut doc = Document::parse("entries:\n  - a\n  - b").unwrap();
        doc.set("entries", &Option::<Vec<String>>::None).unwrap();
        assert_eq!(doc.to_text(), "entries: null");
    }

    #[test]
    fn list_write_rebuilds_children() {
        let mut doc = Document::new();
        doc.set("fruits", &["apple", "banana"]).unwrap();
        assert_eq!(doc.to_text(), "fruits:\n  - apple\n  - banana");

        doc.set("fruits", &["cherry"]).unwrap();
        assert_eq!(doc.to_text(), "fruits:\n  - cherry");
    }

    #[test]
    fn map_write_preserves_comments_on_untouched_lines() {
        #[derive(serde::Serialize)]
        struct Player {
            health: u32,
            name: String,
        }

        let text = "player:\n  health: 100 # out of 100\n  name: gamer";
        let mut doc = Document::parse(text).unwrap();
        doc.set(
            "player",
            &Player {
                health: 50,
                name: "gamer".to_string(),
            },
        )
        .unwrap();
        assert_eq!(
            doc.to_text(),
            "player:\n  health: 50 # out of 100\n  name: gamer"
        );
    }

    #[test]
    fn map_write_drops_stale_keys_and_appends_new_ones() {
        let mut before = crate::SuccMap::new();
        before.insert("old".to_string(), Value::Integer(1));
        let mut doc = Document::new();
        doc.set("data", &Value::Map(before)).unwrap();

        let mut after = crate::SuccMap::new();
        after.insert("new".to_string(), Value::Integer(2));
        doc.set("data", &Value::Map(after)).unwrap();
        assert_eq!(doc.to_text(), "data:\n  new: 2");
    }

    #[test]
    fn string_with_newline_becomes_multi_line_block() {
        let mut doc = Document::new();
        doc.set("note", "first\nsecond").unwrap();
        assert_eq!(doc.to_text(), "note: \"\"\"\n  first\n  second\n  \"\"\"");
        assert_eq!(doc.get::<String>("note").unwrap(), "first\nsecond");
    }

    #[test]
    fn block_unsafe_strings_fall_back_to_a_quoted_line() {
        for original in [
            "first\n  second",
            "a\n\"\"\"\nb",
            "a\tb\nc",
            "trailing \nd",
        ] {
            let mut doc = Document::new();
            doc.set("note", original).unwrap();
            let reparsed = Document::parse(&doc.to_text()).unwrap();
            assert_eq!(
                reparsed.get::<String>("note").unwrap(),
                original,
                "via {:?}",
                doc.to_text()
            );
        }
    }

    #[test]
    fn large_u64_keeps_exact_decimal_form() {
        let mut doc = Document::new();
        doc.set("big", &u64::MAX).unwrap();
        assert_eq!(doc.to_text(), "big: 18446744073709551615");
        assert_eq!(doc.get::<u64>("big").unwrap(), u64::MAX);
    }

    #[test]
    fn multi_line_block_stays_multi_line_for_single_line_value() {
        let mut doc = Document::parse("note: \"\"\"\n  old text\n  \"\"\"").unwrap();
        doc.set("note", "short").unwrap();
        assert_eq!(doc.to_text(), "note: \"\"\"\n  short\n  \"\"\"");
    }

    #[test]
    fn reserved_strings_are_quoted() {
        let mut doc = Document::new();
        doc.set("a", "null").unwrap();
        doc.set("b", "").unwrap();
        doc.set("c", "has # hash").unwrap();
        assert_eq!(doc.to_text(), "a: \"null\"\nb: \"\"\nc: \"has # hash\"");
        assert_eq!(doc.get::<String>("a").unwrap(), "null");
        assert_eq!(doc.get::<String>("b").unwrap(), "");
        assert_eq!(doc.get::<String>("c").unwrap(), "has # hash");
    }

    #[test]
    fn always_quote_strings_style() {
        let style = crate::FileStyle::new().with_always_quote_strings(true);
        let mut doc = Document::with_style(style);
        doc.set("name", "plain").unwrap();
        assert_eq!(doc.to_text(), "name: \"plain\"");
        assert_eq!(doc.get::<String>("name").unwrap(), "plain");
    }

    #[test]
    fn non_scalar_map_key_is_an_error() {
        use std::collections::BTreeMap;
        let mut map = BTreeMap::new();
        map.insert(vec![1, 2], "x");
        assert!(to_value(&map).is_err());
    }

    #[test]
    fn unit_variant_serializes_as_name() {
        #[derive(serde::Serialize)]
        enum Mode {
            Fast,
        }
        assert_eq!(to_value(&Mode::Fast).unwrap(), Value::String("Fast".into()));
    }

    #[test]
    fn struct_variant_nests_under_variant_name() {
        #[derive(serde::Serialize)]
        enum Shape {
            Circle { radius: f64 },
        }
        let mut doc = Document::new();
        doc.set("shape", &Shape::Circle { radius: 2.5 }).unwrap();
        assert_eq!(doc.to_text(), "shape:\n  Circle:\n    radius: 2.5");
    }
}
