//! Error types for protocol persistence.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use illum_protocol::ProtocolError;

/// Errors that can occur while writing or reading protocol documents.
#[derive(Debug)]
pub enum FormatError {
    /// The output file could not be created. Nothing was written and the
    /// protocol was left untouched.
    ResourceUnavailable {
        /// The path that could not be opened.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// The protocol has no filename to write to.
    MissingFilename,
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The input is not well-formed YAML.
    Parse {
        /// Scanner message, including the position.
        detail: String,
    },
    /// The input is YAML but not a protocol document.
    MalformedDocument {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// Building or draining the protocol tree failed.
    Protocol(ProtocolError),
}

impl FormatError {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedDocument {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceUnavailable { path, source } => {
                write!(f, "cannot open {} for writing: {source}", path.display())
            }
            Self::MissingFilename => write!(f, "protocol has no filename"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse { detail } => write!(f, "YAML parse error: {detail}"),
            Self::MalformedDocument { detail } => write!(f, "malformed protocol document: {detail}"),
            Self::Protocol(e) => write!(f, "protocol error: {e}"),
        }
    }
}

impl Error for FormatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ResourceUnavailable { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            Self::Protocol(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FormatError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ProtocolError> for FormatError {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}
