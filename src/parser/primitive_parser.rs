//! Byte-level decode primitives shared by the GP and PTB readers.
//!
//! Both formats are little-endian streams with no framing beyond length
//! prefixes and sentinel bytes, so everything here is a thin wrapper over
//! nom's complete parsers. "Skip" is a first-class operation: unknown and
//! reserved regions must still be consumed to keep every later read aligned.

use crate::parser::decode_error::{fail, DecodeErrorKind, PResult};
use encoding_rs::WINDOWS_1252;
use nom::bytes::complete::take;
use nom::combinator::peek;
use nom::number::complete::{le_i8, le_u16, le_u32, le_u8};
use nom::Parser;

/// Parse unsigned byte
pub fn parse_u8(i: &[u8]) -> PResult<'_, u8> {
    le_u8(i)
}

/// Parse signed byte
pub fn parse_i8(i: &[u8]) -> PResult<'_, i8> {
    le_i8(i)
}

/// Parse unsigned short (little-endian)
pub fn parse_u16(i: &[u8]) -> PResult<'_, u16> {
    le_u16(i)
}

/// Parse unsigned 32 (little-endian)
pub fn parse_u32(i: &[u8]) -> PResult<'_, u32> {
    le_u32(i)
}

/// Read exactly `n` bytes.
pub fn parse_bytes(n: usize) -> impl Fn(&[u8]) -> PResult<'_, &[u8]> {
    move |i: &[u8]| take(n)(i)
}

/// Consume `n` bytes without interpreting them.
pub fn skip(n: usize) -> impl Fn(&[u8]) -> PResult<'_, ()> {
    move |i: &[u8]| {
        let (rest, _) = take(n)(i)?;
        Ok((rest, ()))
    }
}

/// Read one byte and require it to equal `expected`.
pub fn expect_u8(expected: u8, what: &'static str) -> impl Fn(&[u8]) -> PResult<'_, ()> {
    move |i: &[u8]| {
        let (rest, value) = parse_u8(i)?;
        if value == expected {
            Ok((rest, ()))
        } else {
            fail(i, DecodeErrorKind::FormatViolation(what))
        }
    }
}

/// Read one u16 and require it to equal `expected`.
pub fn expect_u16(expected: u16, what: &'static str) -> impl Fn(&[u8]) -> PResult<'_, ()> {
    move |i: &[u8]| {
        let (rest, value) = parse_u16(i)?;
        if value == expected {
            Ok((rest, ()))
        } else {
            fail(i, DecodeErrorKind::FormatViolation(what))
        }
    }
}

/// Look at the next u16 without consuming it.
pub fn peek_u16(i: &[u8]) -> PResult<'_, u16> {
    peek(parse_u16).parse(i)
}

/// Materialize properly encoded String
pub(crate) fn make_string(i: &[u8]) -> String {
    let (cow, encoding_used, had_errors) = WINDOWS_1252.decode(i);
    if had_errors {
        log::debug!("Error decoding string with {encoding_used:?}");
        match std::str::from_utf8(i) {
            Ok(s) => s.to_string(),
            Err(e) => {
                log::debug!("Error UTF-8 string decoding: {e}");
                String::new()
            }
        }
    } else {
        cow.to_string()
    }
}

/// Length-byte-prefixed string with 0xFF escape.
///
/// A length byte of 0xFF means the real length follows as a u16. Used
/// throughout the PTB format and for the GP version string and GP4 chord
/// names (where a 0xFF length cannot legitimately occur).
pub fn parse_short_string(i: &[u8]) -> PResult<'_, String> {
    let (i, short_len) = parse_u8(i)?;
    let (i, len) = if short_len == 0xFF {
        parse_u16(i)?
    } else {
        (i, u16::from(short_len))
    };
    let (i, body) = take(len as usize)(i)?;
    Ok((i, make_string(body)))
}

/// u32-length-prefixed string (GP format only).
pub fn parse_long_string(i: &[u8]) -> PResult<'_, String> {
    let (i, len) = parse_u32(i)?;
    let (i, body) = take(len as usize)(i)?;
    Ok((i, make_string(body)))
}

/// GP legacy fixed-width string field.
///
/// One length byte (must not exceed the declared width), then exactly
/// `declared_len` bytes are consumed; only the first `length` are the
/// payload, the rest is padding. Total consumption is `1 + declared_len`
/// regardless of the payload length.
pub fn parse_fixed_string(declared_len: usize) -> impl Fn(&[u8]) -> PResult<'_, String> {
    move |i: &[u8]| {
        let (rest, len) = parse_u8(i)?;
        let len = len as usize;
        if len > declared_len {
            return fail(
                i,
                DecodeErrorKind::FormatViolation("fixed string length exceeds field width"),
            );
        }
        let (rest, field) = take(declared_len)(rest)?;
        Ok((rest, make_string(&field[..len])))
    }
}

/// GP color: 1 reserved byte, then red, green, blue.
pub fn parse_gp_color(i: &[u8]) -> PResult<'_, Color> {
    let (i, _reserved) = parse_u8(i)?;
    let (i, red) = parse_u8(i)?;
    let (i, green) = parse_u8(i)?;
    let (i, blue) = parse_u8(i)?;
    Ok((i, Color { red, green, blue }))
}

/// PTB color: red, green, blue, then 1 reserved byte.
///
/// The byte order differs from GP on the wire and must not be unified.
pub fn parse_ptb_color(i: &[u8]) -> PResult<'_, Color> {
    let (i, red) = parse_u8(i)?;
    let (i, green) = parse_u8(i)?;
    let (i, blue) = parse_u8(i)?;
    let (i, _reserved) = parse_u8(i)?;
    Ok((i, Color { red, green, blue }))
}

/// RGB color shared by both document models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}
