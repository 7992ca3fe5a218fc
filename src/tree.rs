//! The SUCC document tree.
//!
//! A parsed file is a [`Document`]: an ordered sequence of top-level
//! [`Line`]s plus a key index over the top-level entries. Lines that carry
//! data are [`Node`]s; blank and comment lines are plain lines, kept in
//! place so they survive edits.
//!
//! The tree is a live, mutable value, not a throwaway AST. Every node holds
//! both its decoded fields (key, value, trailing comment) and its verbatim
//! raw text, and every mutation regenerates the raw text deterministically.
//! Serialization replays raw text; it never re-derives it from decoded
//! fields. That is what lets [`Document::set`] rewrite one value while every
//! comment and blank line the caller did not touch comes back byte for byte.
//!
//! ## Examples
//!
//! ```rust
//! use serde_succ::Document;
//!
//! let mut doc = Document::parse("# settings\nvolume: 3\n").unwrap();
//! doc.set("volume", &5).unwrap();
//! assert_eq!(doc.to_text(), "# settings\nvolume: 5");
//! assert_eq!(doc.get::<i32>("volume").unwrap(), 5);
//! ```

use crate::options::FileStyle;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// The scalar value meaning "no value".
pub const NULL_MARKER: &str = "null";

/// The scalar value opening and terminating a multi-line string block.
pub const MULTI_LINE_MARKER: &str = "\"\"\"";

/// The kind all children of one node must share. Fixed by the first child
/// added; every later sibling must match it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ChildKind {
    #[default]
    None,
    Key,
    List,
    MultiLineString,
}

/// What a data-bearing line is: a named entry, a list item, or one physical
/// line of a multi-line string block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// `key: value`. Holds the key text as authored (quotes included, if any).
    Key(String),
    /// `- value`
    ListItem,
    /// One literal line inside a multi-line string block.
    MultiLineLine,
}

/// A single physical line of a document: either a plain line (blank or
/// comment, no structured data) or a data-bearing [`Node`].
#[derive(Clone, Debug, PartialEq)]
pub enum Line {
    Plain(String),
    Node(Node),
}

impl Line {
    /// The verbatim text of this line.
    #[must_use]
    pub fn raw_text(&self) -> &str {
        match self {
            Line::Plain(raw) => raw,
            Line::Node(node) => node.raw_text(),
        }
    }

    /// Returns the node if this line carries data.
    #[must_use]
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Line::Node(node) => Some(node),
            Line::Plain(_) => None,
        }
    }

    pub(crate) fn as_node_mut(&mut self) -> Option<&mut Node> {
        match self {
            Line::Node(node) => Some(node),
            Line::Plain(_) => None,
        }
    }
}

/// A data-bearing line, possibly with children.
///
/// A node is a container (may own children) iff its value is empty or the
/// multi-line marker; otherwise it is a leaf scalar. Children are owned
/// exclusively and kept in file order, with plain lines interleaved among
/// child nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    raw: String,
    indentation: usize,
    kind: NodeKind,
    value: String,
    comment: Option<String>,
    child_kind: ChildKind,
    children: Vec<Line>,
}

impl Node {
    /// A node straight from the parser; `raw` is kept verbatim.
    pub(crate) fn parsed(
        raw: String,
        indentation: usize,
        kind: NodeKind,
        value: String,
        comment: Option<String>,
    ) -> Self {
        Node {
            raw,
            indentation,
            kind,
            value,
            comment,
            child_kind: ChildKind::None,
            children: Vec::new(),
        }
    }

    /// A freshly created key entry with an empty value.
    pub(crate) fn fresh_key(key: &str, indentation: usize) -> Self {
        let mut node = Node {
            raw: String::new(),
            indentation,
            kind: NodeKind::Key(key.to_string()),
            value: String::new(),
            comment: None,
            child_kind: ChildKind::None,
            children: Vec::new(),
        };
        node.regenerate_raw();
        node
    }

    /// A freshly created list item with an empty value.
    pub(crate) fn fresh_list_item(indentation: usize) -> Self {
        let mut node = Node {
            raw: String::new(),
            indentation,
            kind: NodeKind::ListItem,
            value: String::new(),
            comment: None,
            child_kind: ChildKind::None,
            children: Vec::new(),
        };
        node.regenerate_raw();
        node
    }

    /// One literal line of a multi-line string block.
    pub(crate) fn fresh_multi_line_line(text: &str, indentation: usize) -> Self {
        let mut node = Node {
            raw: String::new(),
            indentation,
            kind: NodeKind::MultiLineLine,
            value: text.to_string(),
            comment: None,
            child_kind: ChildKind::None,
            children: Vec::new(),
        };
        node.regenerate_raw();
        node
    }

    /// The verbatim text of this line, trailing comment included.
    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.raw
    }

    /// Count of leading spaces.
    #[must_use]
    pub fn indentation(&self) -> usize {
        self.indentation
    }

    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The key text for key entries, as authored.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Key(key) => Some(key),
            _ => None,
        }
    }

    /// The decoded value string. Empty for containers.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The trailing comment of this line (including the `#`), if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    #[must_use]
    pub fn child_kind(&self) -> ChildKind {
        self.child_kind
    }

    /// All owned child lines in file order, plain lines included.
    #[must_use]
    pub fn children(&self) -> &[Line] {
        &self.children
    }

    /// Only the data-bearing children, in file order.
    pub fn child_nodes(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(Line::as_node)
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Line> {
        &mut self.children
    }

    pub(crate) fn child_by_key_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.children
            .iter_mut()
            .filter_map(Line::as_node_mut)
            .find(|node| node.key().map(unquote).as_deref() == Some(key))
    }

    /// True for a multi-line block line equal to the terminator.
    #[must_use]
    pub fn is_multi_line_terminator(&self) -> bool {
        self.kind == NodeKind::MultiLineLine && self.value == MULTI_LINE_MARKER
    }

    /// Sets the decoded value and regenerates the raw text to match.
    /// Indentation, key and trailing comment are preserved.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.regenerate_raw();
    }

    pub(crate) fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
        self.regenerate_raw();
    }

    pub(crate) fn set_child_kind(&mut self, kind: ChildKind) {
        self.child_kind = kind;
    }

    /// Drops all children and fixes the child kind for whatever comes next.
    pub(crate) fn clear_children(&mut self, kind: ChildKind) {
        self.children.clear();
        self.child_kind = kind;
    }

    pub(crate) fn add_child(&mut self, line: Line) {
        self.children.push(line);
    }

    /// Raw text regeneration: the single place decoded fields turn back
    /// into a physical line (Invariant: value/key and raw text never drift).
    fn regenerate_raw(&mut self) {
        let mut raw = " ".repeat(self.indentation);
        match &self.kind {
            NodeKind::Key(key) => {
                raw.push_str(key);
                raw.push(':');
                if !self.value.is_empty() {
                    raw.push(' ');
                    raw.push_str(&self.value);
                }
            }
            NodeKind::ListItem => {
                raw.push('-');
                if !self.value.is_empty() {
                    raw.push(' ');
                    raw.push_str(&self.value);
                }
            }
            NodeKind::MultiLineLine => {
                raw.push_str(&self.value);
            }
        }
        if let Some(comment) = &self.comment {
            raw.push(' ');
            raw.push_str(comment);
        }
        self.raw = raw;
    }

    /// This line and everything nested under it, as text.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        append_line_text(&Line::Node(self.clone()), &mut out);
        finish_text(out)
    }

    /// Short description of this node for error messages.
    pub(crate) fn describe(&self) -> String {
        self.raw.trim().to_string()
    }
}

/// The result of a parse: the ordered top-level lines plus a lookup index
/// from (decoded) top-level key to entry. Duplicate top-level keys are a
/// parse error, so the index is total.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Document {
    pub(crate) lines: Vec<Line>,
    pub(crate) keys: IndexMap<String, usize>,
    pub(crate) style: FileStyle,
}

impl Document {
    /// An empty document with the default style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty document rendering new nodes with `style`.
    #[must_use]
    pub fn with_style(style: FileStyle) -> Self {
        Document {
            style,
            ..Self::default()
        }
    }

    /// Parses SUCC text into a document.
    ///
    /// # Errors
    ///
    /// Returns a [`Error::Format`] carrying the 1-based line number for any
    /// grammar or structural violation. There is no partial result.
    pub fn parse(input: &str) -> Result<Self> {
        crate::parse::document_from_str(input, FileStyle::default())
    }

    /// Parses SUCC text, using `style` for later edits.
    pub fn parse_with_style(input: &str, style: FileStyle) -> Result<Self> {
        crate::parse::document_from_str(input, style)
    }

    /// Serializes the document back to text.
    ///
    /// Untouched lines are replayed verbatim; trailing blank lines are
    /// trimmed. Parsing the output again yields a structurally equal
    /// document.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            append_line_text(line, &mut out);
        }
        finish_text(out)
    }

    /// The ordered top-level lines, comments and blanks included.
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The top-level entry for `key`, if present.
    #[must_use]
    pub fn node(&self, key: &str) -> Option<&Node> {
        self.keys
            .get(key)
            .and_then(|&index| self.lines[index].as_node())
    }

    /// Decoded top-level keys in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Number of top-level entries (comments and blanks not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn style(&self) -> &FileStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: FileStyle) {
        self.style = style;
    }

    /// Reads the value under a top-level key as `T`.
    ///
    /// # Errors
    ///
    /// Fails if the key is absent or the stored structure does not convert
    /// to `T`; conversion errors name the node and the target type.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let node = self
            .node(key)
            .ok_or_else(|| Error::Message(format!("no top-level key `{key}`")))?;
        crate::de::read_node(node)
    }

    /// Writes `value` under a top-level key, creating the entry if absent.
    ///
    /// The write mutates the tree in place: comments and formatting on
    /// lines the value does not replace are preserved.
    ///
    /// # Errors
    ///
    /// Fails if `value` cannot be represented (for example a map with
    /// non-scalar keys).
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        if let Some(&index) = self.keys.get(key) {
            let node = self.lines[index]
                .as_node_mut()
                .ok_or_else(|| Error::internal("key index points at a plain line"))?;
            return crate::ser::write_node(node, value, &self.style);
        }

        let key_text = crate::ser::key_text(key);
        let mut node = Node::fresh_key(&key_text, 0);
        crate::ser::write_node(&mut node, value, &self.style)?;
        self.lines.push(Line::Node(node));
        self.keys.insert(key.to_string(), self.lines.len() - 1);
        Ok(())
    }

    /// Removes a top-level entry. Returns whether it existed.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(index) = self.keys.shift_remove(key) else {
            return false;
        };
        self.lines.remove(index);
        for slot in self.keys.values_mut() {
            if *slot > index {
                *slot -= 1;
            }
        }
        true
    }
}

impl std::str::FromStr for Document {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        Document::parse(input)
    }
}

fn append_line_text(line: &Line, out: &mut String) {
    out.push_str(line.raw_text());
    out.push('\n');
    if let Line::Node(node) = line {
        for child in node.children() {
            append_line_text(child, out);
        }
    }
}

fn finish_text(out: String) -> String {
    out.trim_end_matches(|ch| matches!(ch, '\n' | '\r' | ' '))
        .to_string()
}

/// Whether a scalar string must be quoted to survive a round trip.
pub(crate) fn needs_quoting(s: &str, always: bool) -> bool {
    if always {
        return true;
    }
    s.is_empty()
        || s.starts_with('"')
        || s.starts_with(char::is_whitespace)
        || s.ends_with(char::is_whitespace)
        || s.contains('#')
        || s.contains('\t')
        || s.contains('\r')
        || s == NULL_MARKER
        || s == MULTI_LINE_MARKER
}

/// Quotes and escapes a scalar string.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

pub(crate) fn maybe_quote(s: &str, always: bool) -> String {
    if needs_quoting(s, always) {
        quote(s)
    } else {
        s.to_string()
    }
}

/// Strips one level of quotes, decoding escapes. Unquoted input is returned
/// unchanged; unknown escapes are kept literally.
pub(crate) fn unquote(s: &str) -> String {
    let stripped = s
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .filter(|_| s.len() >= 2);
    let Some(inner) = stripped else {
        return s.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
