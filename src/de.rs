//! Deserialization of SUCC nodes into Rust values.
//!
//! [`NodeDeserializer`] is a [`serde::Deserializer`] over a borrowed
//! [`Node`]: the requested Rust type drives how the node's text is
//! interpreted. Scalars parse the value string, sequences walk list
//! children, maps and structs walk key children, and multi-line string
//! blocks are joined back into one string. Failures carry the node and the
//! target type, with nested failures reporting the key path they happened
//! under.

use crate::tree::{unquote, ChildKind, Document, Line, Node, NULL_MARKER};
use crate::{Error, Result};
use serde::de::{self, Deserializer as _, IntoDeserializer};
use serde::forward_to_deserialize_any;

/// Reads `node` as a `T`, wrapping any failure with the node and target
/// type for context.
pub(crate) fn read_node<T: de::DeserializeOwned>(node: &Node) -> Result<T> {
    T::deserialize(NodeDeserializer { node }).map_err(|e| {
        Error::conversion(node.describe(), std::any::type_name::<T>().to_string(), e)
    })
}

pub struct NodeDeserializer<'a> {
    node: &'a Node,
}

impl<'a> NodeDeserializer<'a> {
    pub fn new(node: &'a Node) -> Self {
        NodeDeserializer { node }
    }

    /// The single-line value of a leaf node. Nodes with children have no
    /// scalar reading.
    fn scalar(&self) -> Result<&'a str> {
        if self.node.child_nodes().next().is_some() {
            return Err(Error::type_mismatch(
                "a single-line value",
                "a nested structure",
            ));
        }
        Ok(self.node.value())
    }

    fn parse_scalar<T: std::str::FromStr>(&self, expected: &str) -> Result<T> {
        let text = unquote(self.scalar()?);
        text.parse()
            .map_err(|_| Error::type_mismatch(expected, format!("`{text}`")))
    }

    /// The string this node holds: either the joined lines of a multi-line
    /// block or the unquoted single-line value.
    fn string_value(&self) -> Result<String> {
        if self.node.child_kind() == ChildKind::MultiLineString {
            let lines: Vec<&str> = self
                .node
                .child_nodes()
                .filter(|child| !child.is_multi_line_terminator())
                .map(Node::value)
                .collect();
            return Ok(lines.join("\n"));
        }
        Ok(unquote(self.scalar()?))
    }

    fn is_null(&self) -> bool {
        self.node.child_nodes().next().is_none() && self.node.value() == NULL_MARKER
    }

    /// A container holds its data in children; a value on the same line
    /// is contradictory and always an error.
    fn check_container(&self) -> Result<()> {
        if self.node.child_kind() == ChildKind::MultiLineString {
            return Err(Error::type_mismatch(
                "a nested structure",
                "a multi-line string",
            ));
        }
        if !self.node.value().is_empty() {
            return Err(Error::node("collection nodes cannot have a value"));
        }
        Ok(())
    }
}

impl<'de, 'a> de::Deserializer<'de> for NodeDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.node.child_kind() {
            ChildKind::Key if self.node.child_nodes().next().is_some() => {
                return self.deserialize_map(visitor)
            }
            ChildKind::List => return self.deserialize_seq(visitor),
            ChildKind::MultiLineString => return visitor.visit_string(self.string_value()?),
            _ => {}
        }

        let value = self.scalar()?;
        if value == NULL_MARKER || value.is_empty() {
            visitor.visit_unit()
        } else if value.starts_with('"') {
            visitor.visit_string(unquote(value))
        } else if value == "true" {
            visitor.visit_bool(true)
        } else if value == "false" {
            visitor.visit_bool(false)
        } else if let Ok(i) = value.parse::<i64>() {
            visitor.visit_i64(i)
        } else if let Ok(f) = value.parse::<f64>() {
            visitor.visit_f64(f)
        } else {
            visitor.visit_string(value.to_string())
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let text = unquote(self.scalar()?);
        match text.as_str() {
            "true" => visitor.visit_bool(true),
            "false" => visitor.visit_bool(false),
            other => Err(Error::type_mismatch("a boolean", format!("`{other}`"))),
        }
    }

    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_i8(self.parse_scalar("an integer")?)
    }

    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_i16(self.parse_scalar("an integer")?)
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_i32(self.parse_scalar("an integer")?)
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_i64(self.parse_scalar("an integer")?)
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_u8(self.parse_scalar("an unsigned integer")?)
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_u16(self.parse_scalar("an unsigned integer")?)
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_u32(self.parse_scalar("an unsigned integer")?)
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_u64(self.parse_scalar("an unsigned integer")?)
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_f32(self.parse_scalar("a number")?)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_f64(self.parse_scalar("a number")?)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let text = self.string_value()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => visitor.visit_char(ch),
            _ => Err(Error::type_mismatch(
                "a single character",
                format!("`{text}`"),
            )),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.string_value()?)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.string_value()?)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let value = self.scalar()?;
        if value == NULL_MARKER || value.is_empty() {
            visitor.visit_unit()
        } else {
            Err(Error::type_mismatch("null", format!("`{value}`")))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.check_container()?;
        visitor.visit_seq(NodeSeqAccess::new(self.node.child_nodes().collect()))
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.check_container()?;
        visitor.visit_map(NodeMapAccess::new(self.node.child_nodes().collect()))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.node.child_nodes().next().is_none() {
            let variant = unquote(self.node.value());
            return visitor.visit_enum(variant.into_deserializer());
        }

        let mut children = self.node.child_nodes();
        match (children.next(), children.next()) {
            (Some(child), None) if child.key().is_some() => {
                visitor.visit_enum(NodeEnumAccess { node: child })
            }
            _ => Err(Error::type_mismatch(
                "an enum variant",
                "a structure with multiple entries",
            )),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_any(visitor)
    }
}

struct NodeSeqAccess<'a> {
    iter: std::vec::IntoIter<&'a Node>,
}

impl<'a> NodeSeqAccess<'a> {
    fn new(nodes: Vec<&'a Node>) -> Self {
        NodeSeqAccess {
            iter: nodes.into_iter(),
        }
    }
}

impl<'de, 'a> de::SeqAccess<'de> for NodeSeqAccess<'a> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(node) => seed.deserialize(NodeDeserializer { node }).map(Some),
            None => Ok(None),
        }
    }
}

struct NodeMapAccess<'a> {
    iter: std::vec::IntoIter<&'a Node>,
    pending: Option<(String, &'a Node)>,
}

impl<'a> NodeMapAccess<'a> {
    fn new(nodes: Vec<&'a Node>) -> Self {
        NodeMapAccess {
            iter: nodes.into_iter(),
            pending: None,
        }
    }
}

impl<'de, 'a> de::MapAccess<'de> for NodeMapAccess<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(node) => {
                let key = unquote(node.key().unwrap_or_default());
                self.pending = Some((key.clone(), node));
                seed.deserialize(MapKeyDeserializer { key }).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let (key, node) = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("next_value_seed called before next_key_seed"))?;
        seed.deserialize(NodeDeserializer { node })
            .map_err(|e| Error::context(format!("key `{key}`"), e))
    }
}

struct NodeEnumAccess<'a> {
    node: &'a Node,
}

impl<'de, 'a> de::EnumAccess<'de> for NodeEnumAccess<'a> {
    type Error = Error;
    type Variant = NodeVariantAccess<'a>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let key = unquote(self.node.key().unwrap_or_default());
        let variant = seed.deserialize(MapKeyDeserializer { key })?;
        Ok((variant, NodeVariantAccess { node: self.node }))
    }
}

struct NodeVariantAccess<'a> {
    node: &'a Node,
}

impl<'de, 'a> de::VariantAccess<'de> for NodeVariantAccess<'a> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        NodeDeserializer { node: self.node }.deserialize_unit(de::IgnoredAny)?;
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(NodeDeserializer { node: self.node })
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        NodeDeserializer { node: self.node }.deserialize_seq(visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        NodeDeserializer { node: self.node }.deserialize_map(visitor)
    }
}

/// Keys are authored text, but callers may address maps with integer or
/// boolean keys; the key text is parsed on demand.
struct MapKeyDeserializer {
    key: String,
}

impl MapKeyDeserializer {
    fn parse<T: std::str::FromStr>(&self, expected: &str) -> Result<T> {
        self.key
            .parse()
            .map_err(|_| Error::type_mismatch(expected, format!("key `{}`", self.key)))
    }
}

impl<'de> de::Deserializer<'de> for MapKeyDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.key)
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_bool(self.parse("a boolean key")?)
    }

    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_i8(self.parse("an integer key")?)
    }

    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_i16(self.parse("an integer key")?)
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_i32(self.parse("an integer key")?)
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_i64(self.parse("an integer key")?)
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_u8(self.parse("an unsigned integer key")?)
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_u16(self.parse("an unsigned integer key")?)
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_u32(self.parse("an unsigned integer key")?)
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_u64(self.parse("an unsigned integer key")?)
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_f32(self.parse("a numeric key")?)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_f64(self.parse("a numeric key")?)
    }

    forward_to_deserialize_any! {
        char str string bytes byte_buf option unit unit_struct newtype_struct
        seq tuple tuple_struct map struct enum identifier ignored_any
    }
}

/// Exposes a document's top level as a map, so a whole file can be read
/// into a struct or a dynamic value in one call.
pub struct DocumentDeserializer<'a> {
    document: &'a Document,
}

impl<'a> DocumentDeserializer<'a> {
    pub fn new(document: &'a Document) -> Self {
        DocumentDeserializer { document }
    }

    fn top_level_nodes(&self) -> impl Iterator<Item = &'a Node> {
        self.document.lines().iter().filter_map(Line::as_node)
    }
}

impl<'de, 'a> de::Deserializer<'de> for DocumentDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(NodeMapAccess::new(self.top_level_nodes().collect()))
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}
