//! Decode-time error type threaded through every nom parser in this crate.
//!
//! Carries the failure taxonomy, the input slice at the point of failure
//! (turned into an absolute byte offset at the top level) and an optional
//! phase label attached with `nom::error::context`.

use nom::error::{ContextError, ErrorKind, ParseError};
use nom::IResult;

/// Result alias used by all decode primitives and phases.
pub type PResult<'a, T> = IResult<&'a [u8], T, DecodeError<'a>>;

/// What went wrong while decoding a tablature stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeErrorKind {
    /// The stream ended in the middle of a field.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// The GP version string has no parseable trailing numeric version.
    #[error("unrecognized version string")]
    UnrecognizedVersion,

    /// A GP bar properties byte has bits outside the known set.
    #[error("unknown bar property bits: {0:#04x}")]
    UnknownBarProperty(u8),

    /// A GP beat properties byte has bits outside the known set.
    #[error("unknown beat property bits: {0:#04x}")]
    UnknownBeatProperty(u8),

    /// A GP note properties byte has bits outside the known set.
    #[error("unknown note property bits: {0:#04x}")]
    UnknownNoteProperty(u8),

    /// A magic constant, separator or tag did not match its expected value.
    #[error("format violation: {0}")]
    FormatViolation(&'static str),

    /// A PTB item group introduced a type name with no registered handler.
    #[error("unknown record type: {0:?}")]
    UnknownRecordType(String),

    /// An enum-like byte fell outside its known range.
    #[error("invalid value {value:#x} for {field}")]
    InvalidFieldValue { field: &'static str, value: u32 },

    /// Nested item groups exceeded the recursion bound.
    #[error("item group nesting too deep")]
    RecursionLimit,
}

/// nom-compatible error: taxonomy kind + remaining input + phase label.
#[derive(Debug, PartialEq, Eq)]
pub struct DecodeError<'a> {
    /// Remaining input at the point of failure.
    pub input: &'a [u8],
    pub kind: DecodeErrorKind,
    /// Phase label closest to the failure, set by `nom::error::context`.
    pub phase: Option<&'static str>,
}

impl<'a> DecodeError<'a> {
    pub const fn new(input: &'a [u8], kind: DecodeErrorKind) -> Self {
        DecodeError {
            input,
            kind,
            phase: None,
        }
    }

    /// Absolute offset of the failure given the full input length.
    pub const fn offset(&self, total_len: usize) -> usize {
        total_len - self.input.len()
    }
}

impl<'a> ParseError<&'a [u8]> for DecodeError<'a> {
    fn from_error_kind(input: &'a [u8], _kind: ErrorKind) -> Self {
        // The only nom-internal failures reachable here are short reads
        // from `take` and the fixed-size number parsers.
        DecodeError::new(input, DecodeErrorKind::UnexpectedEof)
    }

    fn append(_input: &'a [u8], _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a> ContextError<&'a [u8]> for DecodeError<'a> {
    fn add_context(_input: &'a [u8], ctx: &'static str, mut other: Self) -> Self {
        // keep the innermost label, it names the failing phase
        if other.phase.is_none() {
            other.phase = Some(ctx);
        }
        other
    }
}

/// Abort the current parse with `kind`, positioned at `input`.
pub fn fail<T>(input: &[u8], kind: DecodeErrorKind) -> PResult<'_, T> {
    Err(nom::Err::Failure(DecodeError::new(input, kind)))
}
