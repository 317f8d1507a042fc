//! Protocol document writer.
//!
//! [`ProtocolWriter`] encodes protocols to any `Write` sink. Writing
//! drains the protocol: once the document is out, every step, polygon and
//! point is popped from its container, head first.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use illum_protocol::Protocol;

use crate::codec::{
    write_comment, write_empty_seq_entry, write_empty_seq_field, write_int_field, write_key,
    write_point_entry, write_seq_entry, write_str_field,
};
use crate::error::FormatError;
use crate::types::{BuildMetadata, DocumentSummary};
use crate::{ATTRIBUTION, BANNER};

/// Writes protocol documents to a byte stream.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production
/// code can use `BufWriter<File>`. Each document is encoded fully in
/// memory and handed to the sink in one `write_all`. Documents after the
/// first are preceded by a `---` separator.
///
/// # Examples
///
/// ```
/// use illum_core::Point;
/// use illum_protocol::{Montage, Polygon, Protocol, Steps};
/// use illum_yaml::{BuildMetadata, ProtocolReader, ProtocolWriter};
///
/// let mut protocol = Protocol::new();
/// protocol.set_grid_size(4, 4);
/// let grid = protocol.grid_size();
/// let arena = protocol.arena_mut();
/// let steps = Steps::create(arena).unwrap();
/// let montage = Montage::create(arena).unwrap();
/// let polygon = Polygon::create(arena, grid).unwrap();
/// polygon.extend(arena, [Point::new(0, 0), Point::new(1, 1)]).unwrap();
/// montage.push(arena, &polygon).unwrap();
/// steps.push(arena, montage).unwrap();
/// protocol.set_steps(steps).unwrap();
///
/// let meta = BuildMetadata::new("abc123", "today");
/// let mut writer = ProtocolWriter::new(Vec::new(), &meta);
/// let summary = writer.write_protocol(&mut protocol).unwrap();
/// assert_eq!(summary.points, 2);
/// assert_eq!(writer.documents_written(), 1);
///
/// // The protocol was drained by the write.
/// assert!(steps.is_empty(protocol.arena()).unwrap());
///
/// let buf = writer.into_inner();
/// let reader = ProtocolReader::open(buf.as_slice()).unwrap();
/// assert_eq!(reader.tree().point_count(), 2);
/// ```
pub struct ProtocolWriter<W: Write> {
    writer: W,
    metadata: BuildMetadata,
    documents_written: u64,
}

impl<W: Write> ProtocolWriter<W> {
    /// Create a writer stamping every document with `metadata`.
    pub fn new(writer: W, metadata: &BuildMetadata) -> Self {
        Self {
            writer,
            metadata: metadata.clone(),
            documents_written: 0,
        }
    }

    /// Encode `protocol` as one document, draining its steps.
    ///
    /// The protocol is drained only once the document has reached the
    /// sink. On error the sink receives nothing and the protocol is left
    /// as it was.
    pub fn write_protocol(&mut self, protocol: &mut Protocol) -> Result<DocumentSummary, FormatError> {
        let mut buf = Vec::new();
        if self.documents_written > 0 {
            buf.extend_from_slice(b"---\n");
        }
        let mut summary = render(&mut buf, protocol, &self.metadata)?;
        summary.bytes = buf.len();
        self.writer.write_all(&buf)?;
        drain(protocol)?;
        self.documents_written += 1;
        tracing::debug!(
            steps = summary.steps,
            polygons = summary.polygons,
            points = summary.points,
            bytes = summary.bytes,
            "protocol document written"
        );
        Ok(summary)
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), FormatError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Number of documents written so far.
    pub fn documents_written(&self) -> u64 {
        self.documents_written
    }

    /// Consume the writer and return the underlying `Write` sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Encode `protocol` as a document string, draining its steps.
pub fn encode_protocol(
    protocol: &mut Protocol,
    metadata: &BuildMetadata,
) -> Result<String, FormatError> {
    let mut buf = Vec::new();
    render(&mut buf, protocol, metadata)?;
    drain(protocol)?;
    String::from_utf8(buf).map_err(|e| FormatError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Write `protocol` to the path in its filename, draining its steps.
///
/// The document is encoded in memory before the file is created, and the
/// protocol is drained only after the file is written. If the protocol has
/// no filename, cannot be encoded, or the file cannot be created, any
/// existing file is left alone and so is the protocol. Returns the path
/// written.
pub fn write_protocol_file(
    protocol: &mut Protocol,
    metadata: &BuildMetadata,
) -> Result<PathBuf, FormatError> {
    let Some(path) = protocol.filename().map(PathBuf::from) else {
        tracing::error!("protocol has no filename; nothing written");
        return Err(FormatError::MissingFilename);
    };
    let mut buf = Vec::new();
    let summary = render(&mut buf, protocol, metadata)?;

    let file = match File::create(&path) {
        Ok(file) => file,
        Err(source) => {
            tracing::error!(
                path = %path.display(),
                error = %source,
                "cannot open protocol file for writing; is the directory correct?"
            );
            return Err(FormatError::ResourceUnavailable { path, source });
        }
    };
    let mut file = BufWriter::new(file);
    file.write_all(&buf)?;
    file.flush()?;
    drain(protocol)?;
    tracing::debug!(
        path = %path.display(),
        steps = summary.steps,
        points = summary.points,
        bytes = buf.len(),
        "protocol file written"
    );
    Ok(path)
}

/// Encode one document from a snapshot of `protocol`, leaving it intact.
///
/// Taking the snapshot walks every handle, so stale or foreign handles
/// fail here before anything is consumed.
fn render(
    w: &mut dyn Write,
    protocol: &Protocol,
    metadata: &BuildMetadata,
) -> Result<DocumentSummary, FormatError> {
    let tree = protocol.outline()?;

    write_comment(w, BANNER)?;
    write_comment(w, ATTRIBUTION)?;
    write_comment(w, "\nSoftware Version Information:")?;
    write_comment(w, &metadata.git_sha)?;
    write_comment(w, &metadata.build_time)?;
    write_comment(w, "")?;

    write_key(w, 0, "Protocol")?;
    if let Some(filename) = &tree.filename {
        write_str_field(w, 1, "Filename", filename)?;
    }
    if let Some(description) = &tree.description {
        write_str_field(w, 1, "Description", description)?;
    }
    write_key(w, 1, "GridSize")?;
    write_int_field(w, 2, "height", tree.grid_size.height.into())?;
    write_int_field(w, 2, "width", tree.grid_size.width.into())?;

    let summary = DocumentSummary {
        steps: tree.step_count(),
        polygons: tree.polygon_count(),
        points: tree.point_count(),
        bytes: 0,
    };
    let steps = match &tree.steps {
        Some(steps) if !steps.is_empty() => steps,
        _ => {
            write_empty_seq_field(w, 1, "Steps")?;
            return Ok(summary);
        }
    };

    write_key(w, 1, "Steps")?;
    for polygons in steps {
        if polygons.is_empty() {
            write_empty_seq_entry(w, 2)?;
            continue;
        }
        write_seq_entry(w, 2)?;
        for points in polygons {
            if points.is_empty() {
                write_empty_seq_entry(w, 3)?;
                continue;
            }
            write_seq_entry(w, 3)?;
            for point in points {
                write_point_entry(w, 4, point.x, point.y)?;
            }
        }
    }
    Ok(summary)
}

/// Pop every step, polygon and point, head first.
fn drain(protocol: &mut Protocol) -> Result<(), FormatError> {
    let Some(steps) = protocol.steps() else {
        return Ok(());
    };
    let arena = protocol.arena_mut();
    while let Some(montage) = steps.pop_front(arena)? {
        while let Some(polygon) = montage.pop_front(arena)? {
            while polygon.pop_front(arena)?.is_some() {}
        }
    }
    Ok(())
}
