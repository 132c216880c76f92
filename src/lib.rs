//! Tabrip - Guitar Pro and PowerTab tablature file parser
//!
//! This library provides:
//! - Parsing of Guitar Pro 2.x-4.x (.gtp, .gp3, .gp4) files
//! - Parsing of PowerTab (.ptb) files
//!
//! Both decoders read a complete in-memory byte buffer and either return
//! a fully materialized document or a typed error carrying the failing
//! byte offset; there are no partial documents.
//!
//! # Example
//!
//! ```no_run
//! use tabrip::parse_gp_data;
//!
//! let file_data = std::fs::read("song.gp4").unwrap();
//! let song = parse_gp_data(&file_data).unwrap();
//! println!("{} by {}", song.header.title, song.header.artist);
//! ```

pub mod error;
pub mod parser;

// Re-export main types for convenience
pub use error::TabError;
pub use parser::decode_error::DecodeErrorKind;
pub use parser::gp_parser::parse_gp_data;
pub use parser::gp_types::{
    GpBar, GpBeat, GpDocument, GpHeader, GpNote, GpTrack, GpVersion,
};
pub use parser::ptb_parser::parse_ptb_data;
pub use parser::ptb_types::{
    PtbClassification, PtbDocument, PtbInstrument, PtbPosition, PtbSection, PtbStaff,
};
