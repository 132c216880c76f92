//! Error types for the tabrip library

use crate::parser::decode_error::{DecodeError, DecodeErrorKind};
use std::io;

/// Library error type for tabrip operations
#[derive(Debug, thiserror::Error)]
pub enum TabError {
    /// Decode error with the absolute byte offset and, when available,
    /// the decode phase that failed.
    #[error("decode error at byte {offset}{}: {kind}", .phase.map(|p| format!(" in {p}")).unwrap_or_default())]
    Decode {
        kind: DecodeErrorKind,
        offset: usize,
        phase: Option<&'static str>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),
}

impl TabError {
    /// Convert a nom error into the public form, recovering the absolute
    /// offset from the length of the remaining input.
    pub(crate) fn from_decode(total_len: usize, err: nom::Err<DecodeError<'_>>) -> Self {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => TabError::Decode {
                offset: e.offset(total_len),
                kind: e.kind,
                phase: e.phase,
            },
            // complete parsers only, Incomplete cannot happen
            nom::Err::Incomplete(_) => TabError::Decode {
                kind: DecodeErrorKind::UnexpectedEof,
                offset: total_len,
                phase: None,
            },
        }
    }
}

impl From<io::Error> for TabError {
    fn from(error: io::Error) -> Self {
        Self::Io(error.to_string())
    }
}
