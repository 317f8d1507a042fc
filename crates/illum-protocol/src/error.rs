//! Protocol-level error types.

use std::error::Error;
use std::fmt;

use illum_arena::ArenaError;

/// Errors from building or inspecting a protocol tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    /// The backing arena rejected the operation.
    Arena(ArenaError),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arena(e) => write!(f, "arena error: {e}"),
        }
    }
}

impl Error for ProtocolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
        }
    }
}

impl From<ArenaError> for ProtocolError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}
