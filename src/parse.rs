//! Single-pass SUCC parser.
//!
//! The text is consumed line by line while a stack of open container nodes
//! tracks nesting. A new line first closes every container whose
//! indentation is not shallower than its own (popped containers attach to
//! the node below them, or to the top level), then attaches itself. Leaf
//! lines attach immediately; container lines (empty value or the multi-line
//! marker) are pushed open. Any grammar or structural violation aborts the
//! parse with an error naming the 1-based line number.

use crate::options::FileStyle;
use crate::tree::{unquote, ChildKind, Document, Line, Node, NodeKind, MULTI_LINE_MARKER};
use crate::{Error, Result};
use indexmap::IndexMap;

pub(crate) fn document_from_str(input: &str, style: FileStyle) -> Result<Document> {
    Parser::new(style).run(input)
}

struct Parser {
    stack: Vec<Node>,
    top_level: Vec<Line>,
    keys: IndexMap<String, usize>,
    style: FileStyle,
    /// `Some` while inside a multi-line string block; the inner value is the
    /// block indentation once the first line has fixed it.
    multi_line: Option<Option<usize>>,
}

impl Parser {
    fn new(style: FileStyle) -> Self {
        Parser {
            stack: Vec::new(),
            top_level: Vec::new(),
            keys: IndexMap::new(),
            style,
            multi_line: None,
        }
    }

    fn run(mut self, input: &str) -> Result<Document> {
        if input.is_empty() {
            return Ok(Document {
                lines: self.top_level,
                keys: self.keys,
                style: self.style,
            });
        }

        let mut line_count = 0;
        for (index, raw) in input.split('\n').enumerate() {
            let number = index + 1;
            line_count = number;
            let raw = raw.strip_suffix('\r').unwrap_or(raw);
            if raw.contains('\t') {
                return Err(Error::format(
                    number,
                    "tab characters are not allowed; indent with spaces",
                ));
            }
            if self.multi_line.is_some() {
                self.multi_line_line(raw, number)?;
            } else {
                self.ordinary_line(raw, number)?;
            }
        }

        if self.multi_line.is_some() {
            return Err(Error::format(line_count, "unterminated multi-line string"));
        }
        while let Some(node) = self.stack.pop() {
            self.attach_finished(node);
        }

        Ok(Document {
            lines: self.top_level,
            keys: self.keys,
            style: self.style,
        })
    }

    /// One literal line inside an open multi-line string block. The block's
    /// container is the current stack top.
    fn multi_line_line(&mut self, raw: &str, number: usize) -> Result<()> {
        let indentation = indentation_of(raw);
        let parent_indentation = match self.stack.last() {
            Some(parent) => parent.indentation(),
            None => return Err(Error::internal("multi-line block with no open parent")),
        };

        let block_indentation = match self.multi_line.and_then(|fixed| fixed) {
            Some(fixed) => {
                if indentation != fixed {
                    return Err(Error::format(
                        number,
                        "lines of a multi-line string must all share the same indentation",
                    ));
                }
                fixed
            }
            None => {
                if indentation <= parent_indentation {
                    return Err(Error::format(
                        number,
                        "a multi-line string must be indented past the line that opens it",
                    ));
                }
                self.multi_line = Some(Some(indentation));
                indentation
            }
        };

        // Only the terminator may carry a comment; every other block line
        // is literal text.
        let text = &raw[block_indentation..];
        let (value, comment) = match text.strip_prefix(MULTI_LINE_MARKER) {
            Some(rest) if rest.trim().is_empty() => (MULTI_LINE_MARKER.to_string(), None),
            Some(rest) if rest.trim_start().starts_with('#') => (
                MULTI_LINE_MARKER.to_string(),
                Some(rest.trim().to_string()),
            ),
            _ => (text.to_string(), None),
        };
        let terminated = value == MULTI_LINE_MARKER;
        let node = Node::parsed(
            raw.to_string(),
            block_indentation,
            NodeKind::MultiLineLine,
            value,
            comment,
        );
        if let Some(parent) = self.stack.last_mut() {
            parent.add_child(Line::Node(node));
        }
        if terminated {
            self.multi_line = None;
            if let Some(finished) = self.stack.pop() {
                self.attach_finished(finished);
            }
        }
        Ok(())
    }

    fn ordinary_line(&mut self, raw: &str, number: usize) -> Result<()> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            self.attach_plain(raw.to_string());
            return Ok(());
        }

        let indentation = indentation_of(raw);
        let node = if let Some(rest) = trimmed.strip_prefix('-') {
            let (value, comment) = split_comment(rest.trim_start());
            Node::parsed(raw.to_string(), indentation, NodeKind::ListItem, value, comment)
        } else {
            let Some(colon) = data_colon_index(trimmed) else {
                return Err(Error::format(
                    number,
                    "expected `key: value`, a list item, or a comment",
                ));
            };
            let key = trimmed[..colon].trim_end().to_string();
            let (value, comment) = split_comment(trimmed[colon + 1..].trim_start());
            Node::parsed(raw.to_string(), indentation, NodeKind::Key(key), value, comment)
        };

        // Close everything this line is not nested inside.
        while self
            .stack
            .last()
            .is_some_and(|open| open.indentation() >= indentation)
        {
            if let Some(finished) = self.stack.pop() {
                self.attach_finished(finished);
            }
        }

        self.check_placement(&node, number)?;

        if node.value().is_empty() {
            self.stack.push(node);
        } else if node.value() == MULTI_LINE_MARKER {
            let mut node = node;
            node.set_child_kind(ChildKind::MultiLineString);
            self.stack.push(node);
            self.multi_line = Some(None);
        } else {
            self.attach_finished(node);
        }
        Ok(())
    }

    /// Validates a new data line against the scope it lands in. Completed
    /// siblings are already attached to the stack top by the time this runs.
    fn check_placement(&mut self, node: &Node, number: usize) -> Result<()> {
        let Some(parent) = self.stack.last_mut() else {
            let Some(key) = node.key() else {
                return Err(Error::format(number, "top-level lines must be key entries"));
            };
            if let Some(first) = self.top_level.iter().filter_map(Line::as_node).next() {
                if first.indentation() != node.indentation() {
                    return Err(Error::format(
                        number,
                        "this line's indentation does not match its siblings",
                    ));
                }
            }
            let key = unquote(key);
            if self.keys.contains_key(&key) {
                return Err(Error::format(
                    number,
                    format!("multiple top-level keys called `{key}`"),
                ));
            }
            return Ok(());
        };

        let kind = match node.kind() {
            NodeKind::Key(_) => ChildKind::Key,
            NodeKind::ListItem => ChildKind::List,
            NodeKind::MultiLineLine => {
                return Err(Error::internal("multi-line line classified as ordinary"))
            }
        };
        match parent.child_kind() {
            ChildKind::None => parent.set_child_kind(kind),
            existing if existing != kind => {
                return Err(Error::format(
                    number,
                    "list items and key entries cannot be siblings",
                ));
            }
            _ => {}
        }

        if let Some(first) = parent.child_nodes().next() {
            if first.indentation() != node.indentation() {
                return Err(Error::format(
                    number,
                    "this line's indentation does not match its siblings",
                ));
            }
        }

        if let Some(key) = node.key() {
            let key = unquote(key);
            if parent
                .child_nodes()
                .filter_map(Node::key)
                .any(|existing| unquote(existing) == key)
            {
                return Err(Error::format(
                    number,
                    format!("duplicate sibling key `{key}`"),
                ));
            }
        }
        Ok(())
    }

    /// Hands a completed node to the scope that owns it.
    fn attach_finished(&mut self, node: Node) {
        if let Some(parent) = self.stack.last_mut() {
            parent.add_child(Line::Node(node));
            return;
        }
        if let Some(key) = node.key() {
            self.keys.insert(unquote(key), self.top_level.len());
        }
        self.top_level.push(Line::Node(node));
    }

    fn attach_plain(&mut self, raw: String) {
        if let Some(parent) = self.stack.last_mut() {
            parent.add_child(Line::Plain(raw));
        } else {
            self.top_level.push(Line::Plain(raw));
        }
    }
}

fn indentation_of(line: &str) -> usize {
    line.chars().take_while(|&c| c == ' ').count()
}

/// Index of the colon separating key from value, ignoring colons inside
/// quoted keys.
fn data_colon_index(line: &str) -> Option<usize> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (index, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => return Some(index),
            _ => {}
        }
    }
    None
}

/// Splits a value field from its trailing comment. A `#` begins a comment
/// when it sits outside quotes at the start of the field or after a space.
fn split_comment(field: &str) -> (String, Option<String>) {
    let mut in_quotes = false;
    let mut escaped = false;
    let mut previous = None;
    for (index, ch) in field.char_indices() {
        if escaped {
            escaped = false;
            previous = Some(ch);
            continue;
        }
        match ch {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes && (index == 0 || previous == Some(' ')) => {
                let value = field[..index].trim_end().to_string();
                let comment = field[index..].trim_end().to_string();
                return (value, Some(comment));
            }
            _ => {}
        }
        previous = Some(ch);
    }
    (field.trim_end().to_string(), None)
}
