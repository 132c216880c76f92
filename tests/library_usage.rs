//! Integration tests for tabrip library usage.
//!
//! These tests verify that the library can be used as a dependency
//! from external projects.

use tabrip::{
    parse_gp_data, parse_ptb_data, GpDocument, PtbClassification, PtbDocument, TabError,
};

/// Test that all major types are accessible from the library.
#[test]
fn test_types_accessible() {
    // This test verifies that the public API types compile and are usable.
    // If any re-export is missing, this test will fail to compile.

    fn _assert_types() {
        let _: fn(&[u8]) -> Result<GpDocument, TabError> = parse_gp_data;
        let _: fn(&[u8]) -> Result<PtbDocument, TabError> = parse_ptb_data;
    }
}

fn push_string(buf: &mut Vec<u8>, s: &str) {
    buf.push(s.len() as u8);
    buf.extend_from_slice(s.as_bytes());
}

fn font_record(buf: &mut Vec<u8>, family: &str) {
    push_string(buf, family);
    buf.extend_from_slice(&8u32.to_le_bytes());
    buf.extend_from_slice(&400u32.to_le_bytes());
    buf.extend_from_slice(&[0, 0, 0]);
    buf.extend_from_slice(&[0, 0, 0, 0]);
}

/// Decode a hand-constructed PowerTab lesson through the public entry point.
#[test]
fn test_parse_ptb_lesson() {
    let mut data = Vec::new();
    data.extend_from_slice(b"ptab");
    data.extend_from_slice(&3u16.to_le_bytes());
    data.push(1); // lesson
    push_string(&mut data, "Alternate Picking");
    push_string(&mut data, "");
    data.extend_from_slice(&0u16.to_le_bytes());
    data.push(0); // beginner
    push_string(&mut data, "A. Author");
    push_string(&mut data, "");
    push_string(&mut data, "");
    // both instrument slots: eight empty item groups each
    for _ in 0..16 {
        data.extend_from_slice(&0u16.to_le_bytes());
    }
    font_record(&mut data, "Tablature");
    font_record(&mut data, "Chord");
    font_record(&mut data, "Default");

    let doc = parse_ptb_data(&data).expect("Failed to parse PTB data");
    let PtbClassification::Lesson(lesson) = &doc.header.classification else {
        panic!("Should be classified as a lesson");
    };
    assert_eq!(lesson.title, "Alternate Picking");
    assert!(doc.instruments[0].sections.is_empty());
    assert!(doc.instruments[1].sections.is_empty());
}

/// Test error handling for invalid data.
#[test]
fn test_parse_error() {
    let invalid_data = vec![0u8; 10]; // Not a valid GP file
    let result = parse_gp_data(&invalid_data);

    assert!(result.is_err(), "Should return error for invalid data");
    let err = result.unwrap_err();
    assert!(
        matches!(err, TabError::Decode { .. }),
        "Should be a decode error"
    );

    let result = parse_ptb_data(&invalid_data);
    assert!(result.is_err(), "Should return error for invalid data");
}

/// Decode errors render the offset and phase for diagnostics.
#[test]
fn test_error_display() {
    let err = parse_ptb_data(b"ptXb\x00\x00\x00").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("decode error"), "got: {message}");
    assert!(message.contains("byte"), "got: {message}");
}
