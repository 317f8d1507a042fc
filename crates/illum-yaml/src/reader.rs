//! Protocol document reader.
//!
//! [`ProtocolReader`] parses a document into an owned
//! [`ProtocolTree`] and rebuilds a live [`Protocol`] from it on demand.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use illum_arena::ArenaConfig;
use illum_core::{GridSize, Point};
use illum_protocol::{Protocol, ProtocolTree};
use indexmap::IndexMap;

use crate::codec::{parse_document, Node};
use crate::error::FormatError;

/// Reads protocol documents.
///
/// Parsing is eager: construction validates the whole document. The
/// parsed contents stay available through [`ProtocolReader::tree`] and
/// can be turned into a live protocol any number of times.
#[derive(Clone, Debug)]
pub struct ProtocolReader {
    tree: ProtocolTree,
}

impl ProtocolReader {
    /// Parse a document held in memory.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &str) -> Result<Self, FormatError> {
        let root = parse_document(input)?;
        let tree = decode_root(&root)?;
        tracing::debug!(
            steps = tree.step_count(),
            points = tree.point_count(),
            "protocol document parsed"
        );
        Ok(Self { tree })
    }

    /// Read a whole document from `reader` and parse it.
    pub fn open<R: Read>(mut reader: R) -> Result<Self, FormatError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::from_str(&input)
    }

    /// The parsed contents.
    pub fn tree(&self) -> &ProtocolTree {
        &self.tree
    }

    /// Build a protocol with a default arena.
    ///
    /// Every polygon takes the document's grid size.
    pub fn to_protocol(&self) -> Result<Protocol, FormatError> {
        Ok(self.tree.instantiate()?)
    }

    /// Build a protocol whose arena uses `config`.
    pub fn to_protocol_with(&self, config: ArenaConfig) -> Result<Protocol, FormatError> {
        Ok(self.tree.instantiate_with(config)?)
    }

    /// Consume the reader, returning the parsed contents.
    pub fn into_tree(self) -> ProtocolTree {
        self.tree
    }
}

impl FromStr for ProtocolReader {
    type Err = FormatError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        ProtocolReader::from_str(input)
    }
}

/// Read and rebuild the protocol stored at `path`.
pub fn read_protocol_file(path: impl AsRef<Path>) -> Result<Protocol, FormatError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "cannot open protocol file");
        FormatError::Io(e)
    })?;
    ProtocolReader::open(file)?.to_protocol()
}

fn decode_root(root: &Node) -> Result<ProtocolTree, FormatError> {
    let map = as_map(root, "document root")?;
    for key in map.keys().filter(|k| k.as_str() != "Protocol") {
        tracing::warn!(key = %key, "skipping unknown top-level key");
    }
    let protocol = map
        .get("Protocol")
        .ok_or_else(|| FormatError::malformed("missing `Protocol` mapping"))?;
    decode_protocol(as_map(protocol, "Protocol")?)
}

fn decode_protocol(map: &IndexMap<String, Node>) -> Result<ProtocolTree, FormatError> {
    let mut tree = ProtocolTree::default();
    let mut grid = None;
    for (key, value) in map {
        match key.as_str() {
            "Filename" => tree.filename = optional_string(value, "Protocol.Filename")?,
            "Description" => tree.description = optional_string(value, "Protocol.Description")?,
            "GridSize" => grid = Some(decode_grid(value)?),
            "Steps" => tree.steps = decode_steps(value)?,
            other => tracing::warn!(key = %other, "skipping unknown key in Protocol"),
        }
    }
    tree.grid_size = grid.ok_or_else(|| FormatError::malformed("missing `Protocol.GridSize`"))?;
    Ok(tree)
}

fn decode_grid(node: &Node) -> Result<GridSize, FormatError> {
    let map = as_map(node, "Protocol.GridSize")?;
    let field = |name: &str| -> Result<u32, FormatError> {
        let path = format!("Protocol.GridSize.{name}");
        let value = map
            .get(name)
            .ok_or_else(|| FormatError::malformed(format!("missing `{path}`")))?;
        int(value, &path)
    };
    let height = field("height")?;
    let width = field("width")?;
    Ok(GridSize::new(width, height))
}

fn decode_steps(node: &Node) -> Result<Option<Vec<Vec<Vec<Point>>>>, FormatError> {
    if node.is_null() {
        return Ok(None);
    }
    let steps = as_seq(node, "Protocol.Steps")?;
    let mut out = Vec::with_capacity(steps.len());
    for (s, step) in steps.iter().enumerate() {
        let polygons = as_seq(step, &format!("Protocol.Steps[{s}]"))?;
        let mut montage = Vec::with_capacity(polygons.len());
        for (p, polygon) in polygons.iter().enumerate() {
            let points = as_seq(polygon, &format!("Protocol.Steps[{s}][{p}]"))?;
            let decoded = points
                .iter()
                .enumerate()
                .map(|(i, point)| decode_point(point, &format!("Protocol.Steps[{s}][{p}][{i}]")))
                .collect::<Result<Vec<_>, _>>()?;
            montage.push(decoded);
        }
        out.push(montage);
    }
    Ok(Some(out))
}

fn decode_point(node: &Node, path: &str) -> Result<Point, FormatError> {
    let map = as_map(node, path)?;
    let coord = |name: &str| -> Result<i32, FormatError> {
        let value = map
            .get(name)
            .ok_or_else(|| FormatError::malformed(format!("missing `{path}.{name}`")))?;
        int(value, &format!("{path}.{name}"))
    };
    for key in map.keys().filter(|k| !matches!(k.as_str(), "x" | "y")) {
        tracing::warn!(key = %key, point = path, "skipping unknown key in point");
    }
    Ok(Point::new(coord("x")?, coord("y")?))
}

fn optional_string(node: &Node, path: &str) -> Result<Option<String>, FormatError> {
    if node.is_null() {
        return Ok(None);
    }
    match node {
        Node::Scalar { value, .. } => Ok(Some(value.clone())),
        other => Err(FormatError::malformed(format!(
            "`{path}` must be a scalar, found a {}",
            other.kind()
        ))),
    }
}

fn int<T: FromStr>(node: &Node, path: &str) -> Result<T, FormatError> {
    match node {
        Node::Scalar { value, .. } => value.trim().parse().map_err(|_| {
            FormatError::malformed(format!("`{path}` is not a valid integer: {value:?}"))
        }),
        other => Err(FormatError::malformed(format!(
            "`{path}` must be an integer, found a {}",
            other.kind()
        ))),
    }
}

fn as_map<'a>(node: &'a Node, path: &str) -> Result<&'a IndexMap<String, Node>, FormatError> {
    match node {
        Node::Map(map) => Ok(map),
        other => Err(FormatError::malformed(format!(
            "`{path}` must be a mapping, found a {}",
            other.kind()
        ))),
    }
}

fn as_seq<'a>(node: &'a Node, path: &str) -> Result<&'a [Node], FormatError> {
    match node {
        Node::Seq(items) => Ok(items),
        other => Err(FormatError::malformed(format!(
            "`{path}` must be a sequence, found a {}",
            other.kind()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "Protocol:\n  GridSize:\n    height: 3\n    width: 5\n";

    fn malformed(input: &str) -> String {
        match ProtocolReader::from_str(input) {
            Err(FormatError::MalformedDocument { detail }) => detail,
            other => panic!("expected MalformedDocument, got {other:?}"),
        }
    }

    #[test]
    fn minimal_document() {
        let reader = ProtocolReader::from_str(MINIMAL).unwrap();
        let tree = reader.tree();
        assert_eq!(tree.grid_size, GridSize::new(5, 3));
        assert_eq!(tree.filename, None);
        assert_eq!(tree.description, None);
        assert_eq!(tree.steps, None);
    }

    #[test]
    fn empty_steps_attach_an_empty_list() {
        let doc = format!("{MINIMAL}  Steps: []\n");
        let tree = ProtocolReader::from_str(&doc).unwrap().into_tree();
        assert_eq!(tree.steps, Some(Vec::new()));
    }

    #[test]
    fn null_fields_are_unset() {
        let doc = format!("{MINIMAL}  Filename: ~\n  Description:\n  Steps: null\n");
        let tree = ProtocolReader::from_str(&doc).unwrap().into_tree();
        assert_eq!(tree.filename, None);
        assert_eq!(tree.description, None);
        assert_eq!(tree.steps, None);
    }

    #[test]
    fn quoted_empty_string_is_kept() {
        let doc = format!("{MINIMAL}  Description: \"\"\n");
        let tree = ProtocolReader::from_str(&doc).unwrap().into_tree();
        assert_eq!(tree.description.as_deref(), Some(""));
    }

    #[test]
    fn flow_and_block_points_both_read() {
        let doc = format!(
            "{MINIMAL}  Steps:\n    - - - {{x: 1, y: 2}}\n        - x: 3\n          y: 4\n"
        );
        let tree = ProtocolReader::from_str(&doc).unwrap().into_tree();
        assert_eq!(
            tree.steps,
            Some(vec![vec![vec![Point::new(1, 2), Point::new(3, 4)]]])
        );
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let doc = format!("Version: 2\n{MINIMAL}  Operator: \"someone\"\n");
        let tree = ProtocolReader::from_str(&doc).unwrap().into_tree();
        assert_eq!(tree.grid_size, GridSize::new(5, 3));
    }

    #[test]
    fn missing_protocol_is_malformed() {
        assert!(malformed("Other: 1\n").contains("Protocol"));
        assert!(malformed("- 1\n- 2\n").contains("mapping"));
    }

    #[test]
    fn missing_grid_is_malformed() {
        assert!(malformed("Protocol:\n  Filename: \"a\"\n").contains("GridSize"));
        assert!(malformed("Protocol:\n  GridSize:\n    height: 3\n").contains("width"));
    }

    #[test]
    fn bad_integers_are_malformed() {
        assert!(malformed("Protocol:\n  GridSize:\n    height: -1\n    width: 2\n")
            .contains("height"));
        assert!(malformed("Protocol:\n  GridSize:\n    height: 1\n    width: big\n")
            .contains("width"));
        let doc = format!("{MINIMAL}  Steps:\n    - - - {{x: 3000000000, y: 0}}\n");
        assert!(malformed(&doc).contains("Protocol.Steps[0][0][0].x"));
    }

    #[test]
    fn wrong_kinds_are_malformed() {
        let doc = format!("{MINIMAL}  Steps:\n    - 7\n");
        assert!(malformed(&doc).contains("Protocol.Steps[0]"));
        let doc = format!("{MINIMAL}  Steps:\n    - - - [1, 2]\n");
        assert!(malformed(&doc).contains("mapping"));
        let doc = format!("{MINIMAL}  Filename: [a]\n");
        assert!(malformed(&doc).contains("Filename"));
    }

    #[test]
    fn point_missing_coordinate_is_malformed() {
        let doc = format!("{MINIMAL}  Steps:\n    - - - {{x: 1}}\n");
        assert!(malformed(&doc).contains(".y"));
    }

    #[test]
    fn syntax_error_is_parse() {
        assert!(matches!(
            ProtocolReader::from_str("Protocol: [\n"),
            Err(FormatError::Parse { .. })
        ));
    }

    #[test]
    fn from_str_trait_agrees() {
        let reader: ProtocolReader = MINIMAL.parse().unwrap();
        assert_eq!(reader.tree().grid_size, GridSize::new(5, 3));
    }

    #[test]
    fn to_protocol_builds_live_tree() {
        let doc = format!("{MINIMAL}  Steps:\n    - - - {{x: 1, y: 2}}\n");
        let reader = ProtocolReader::open(doc.as_bytes()).unwrap();
        let protocol = reader.to_protocol().unwrap();
        assert_eq!(protocol.grid_size(), GridSize::new(5, 3));
        assert_eq!(protocol.outline().unwrap(), *reader.tree());
    }
}
