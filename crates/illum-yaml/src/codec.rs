//! Text encoding helpers and the YAML node tree.
//!
//! Writing uses a handful of primitive emitters over `&mut dyn Write`.
//! Reading turns saphyr-parser events into a small ordered [`Node`] tree
//! that the reader walks by key.

use std::borrow::Cow;
use std::io::Write;

use indexmap::IndexMap;
use saphyr_parser::{Event, Parser, ScalarStyle, StrInput};

use crate::error::FormatError;
use crate::INDENT;

/// Nesting limit when reading. Protocol documents are six levels deep.
pub const MAX_DEPTH: usize = 64;

// ── Primitive writers ───────────────────────────────────────────

/// Write `level` levels of indentation.
pub fn write_indent(w: &mut dyn Write, level: usize) -> Result<(), FormatError> {
    write!(w, "{:width$}", "", width = level * INDENT)?;
    Ok(())
}

/// Write `text` as comment lines, one `# ` line per text line.
///
/// `\n`, `\r\n` and a lone `\r` all end a line, since YAML breaks lines
/// on each of them. Empty lines become a bare `#`.
pub fn write_comment(w: &mut dyn Write, text: &str) -> Result<(), FormatError> {
    for line in text.split("\r\n").flat_map(|l| l.split(['\r', '\n'])) {
        if line.is_empty() {
            w.write_all(b"#\n")?;
        } else {
            writeln!(w, "# {line}")?;
        }
    }
    Ok(())
}

/// Write `key: "value"` with the value double-quoted.
pub fn write_str_field(
    w: &mut dyn Write,
    level: usize,
    key: &str,
    value: &str,
) -> Result<(), FormatError> {
    write_indent(w, level)?;
    writeln!(w, "{key}: \"{}\"", escape(value))?;
    Ok(())
}

/// Write `key: value` for an integer.
pub fn write_int_field(
    w: &mut dyn Write,
    level: usize,
    key: &str,
    value: i64,
) -> Result<(), FormatError> {
    write_indent(w, level)?;
    writeln!(w, "{key}: {value}")?;
    Ok(())
}

/// Write `key:` opening a nested block.
pub fn write_key(w: &mut dyn Write, level: usize, key: &str) -> Result<(), FormatError> {
    write_indent(w, level)?;
    writeln!(w, "{key}:")?;
    Ok(())
}

/// Write `key: []`.
pub fn write_empty_seq_field(w: &mut dyn Write, level: usize, key: &str) -> Result<(), FormatError> {
    write_indent(w, level)?;
    writeln!(w, "{key}: []")?;
    Ok(())
}

/// Write a bare `-` opening a nested block sequence entry.
pub fn write_seq_entry(w: &mut dyn Write, level: usize) -> Result<(), FormatError> {
    write_indent(w, level)?;
    w.write_all(b"-\n")?;
    Ok(())
}

/// Write `- []`.
pub fn write_empty_seq_entry(w: &mut dyn Write, level: usize) -> Result<(), FormatError> {
    write_indent(w, level)?;
    w.write_all(b"- []\n")?;
    Ok(())
}

/// Write `- { x: <x>, y: <y> }`.
pub fn write_point_entry(w: &mut dyn Write, level: usize, x: i32, y: i32) -> Result<(), FormatError> {
    write_indent(w, level)?;
    writeln!(w, "- {{ x: {x}, y: {y} }}")?;
    Ok(())
}

/// Escape `s` for a double-quoted YAML scalar.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| c == '"' || c == '\\' || c.is_control()) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

// ── Node tree ───────────────────────────────────────────────────

/// One node of a parsed YAML document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// A scalar, with whether it was quoted in the source.
    Scalar {
        /// The scalar text after unescaping.
        value: String,
        /// Single- or double-quoted in the source.
        quoted: bool,
    },
    /// A sequence, in document order.
    Seq(Vec<Node>),
    /// A mapping, in document order.
    Map(IndexMap<String, Node>),
}

impl Node {
    /// Whether the node is a plain YAML null (`~`, `null`, or empty).
    pub fn is_null(&self) -> bool {
        match self {
            Self::Scalar {
                value,
                quoted: false,
            } => matches!(value.as_str(), "" | "~" | "null" | "Null" | "NULL"),
            _ => false,
        }
    }

    /// Node kind for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar { .. } => "scalar",
            Self::Seq(_) => "sequence",
            Self::Map(_) => "mapping",
        }
    }
}

/// Parse the first document of `input` into a [`Node`] tree.
///
/// Later documents in the stream are ignored. Aliases are rejected.
pub fn parse_document(input: &str) -> Result<Node, FormatError> {
    let mut events = EventStream {
        parser: Parser::new_from_str(input),
    };
    loop {
        match events.next()? {
            Some(Event::StreamStart | Event::DocumentStart(_)) => continue,
            Some(Event::StreamEnd | Event::DocumentEnd) | None => {
                return Err(FormatError::malformed("document is empty"));
            }
            Some(event) => return events.node(event, 0),
        }
    }
}

struct EventStream<'de> {
    parser: Parser<'de, StrInput<'de>>,
}

impl<'de> EventStream<'de> {
    fn next(&mut self) -> Result<Option<Event<'de>>, FormatError> {
        loop {
            match self.parser.next_event() {
                Some(Ok((Event::Nothing, _))) => {}
                Some(Ok((event, _span))) => return Ok(Some(event)),
                Some(Err(e)) => {
                    return Err(FormatError::Parse {
                        detail: format!("{e}"),
                    })
                }
                None => return Ok(None),
            }
        }
    }

    fn expect(&mut self) -> Result<Event<'de>, FormatError> {
        self.next()?.ok_or_else(|| FormatError::Parse {
            detail: "unexpected end of input".into(),
        })
    }

    fn node(&mut self, event: Event<'de>, depth: usize) -> Result<Node, FormatError> {
        if depth > MAX_DEPTH {
            return Err(FormatError::malformed(format!(
                "nesting deeper than {MAX_DEPTH} levels"
            )));
        }
        match event {
            Event::Scalar(value, style, ..) => Ok(Node::Scalar {
                value: value.into_owned(),
                quoted: matches!(style, ScalarStyle::SingleQuoted | ScalarStyle::DoubleQuoted),
            }),
            Event::SequenceStart(..) => {
                let mut items = Vec::new();
                loop {
                    match self.expect()? {
                        Event::SequenceEnd => break,
                        event => items.push(self.node(event, depth + 1)?),
                    }
                }
                Ok(Node::Seq(items))
            }
            Event::MappingStart(..) => {
                let mut map = IndexMap::new();
                loop {
                    let key = match self.expect()? {
                        Event::MappingEnd => break,
                        Event::Scalar(key, ..) => key.into_owned(),
                        _ => return Err(FormatError::malformed("mapping keys must be scalars")),
                    };
                    let event = self.expect()?;
                    let value = self.node(event, depth + 1)?;
                    if map.insert(key.clone(), value).is_some() {
                        tracing::warn!(key = %key, "duplicate key, keeping the last value");
                    }
                }
                Ok(Node::Map(map))
            }
            Event::Alias(_) => Err(FormatError::malformed("aliases are not supported")),
            _ => Err(FormatError::Parse {
                detail: "unexpected YAML event".into(),
            }),
        }
    }
}
