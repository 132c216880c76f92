use crate::error::TabError;
use crate::parser::decode_error::{DecodeError, DecodeErrorKind};
use crate::parser::ptb_parser::fixtures::{
    font_record, guitar_record, push_empty_group, push_introduction, push_string, section_record,
};
use crate::parser::ptb_parser::{
    parse_additional_data, parse_chord_diagram, parse_dynamic, parse_floating_text,
    parse_guitar_in, parse_line_data, parse_music_bar, parse_ptb_data, parse_tempo_marker,
    PtbItem, PtbParser,
};
use crate::parser::ptb_types::{PtbAdditionalData, PtbAlignment, PtbClassification, PtbRelease};

fn init_logger() {
    env_logger::builder()
        .is_test(true)
        .try_init()
        .unwrap_or_default();
}

fn failure_kind(err: nom::Err<DecodeError<'_>>) -> DecodeErrorKind {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.kind,
        nom::Err::Incomplete(_) => panic!("complete parsers cannot be incomplete"),
    }
}

fn decode_kind(err: TabError) -> DecodeErrorKind {
    match err {
        TabError::Decode { kind, .. } => kind,
        TabError::Io(msg) => panic!("expected decode error, got I/O error: {msg}"),
    }
}

#[test]
fn test_empty_group_consumes_exactly_two_bytes() {
    let data = [0x00, 0x00, 0xAA, 0xBB];
    let mut parser = PtbParser::new();
    let (rest, items) = parser.parse_item_group(&data).unwrap();
    assert!(items.is_empty());
    // no tag read after a zero count
    assert_eq!(rest, &[0xAA, 0xBB]);
}

#[test]
fn test_introduction_and_back_referenced_separators() {
    init_logger();
    let mut data = Vec::new();
    data.extend_from_slice(&3u16.to_le_bytes());
    push_introduction(&mut data, "CGuitar");
    data.extend_from_slice(&guitar_record());
    data.extend_from_slice(&0x8001u16.to_le_bytes());
    data.extend_from_slice(&guitar_record());
    data.extend_from_slice(&0x8001u16.to_le_bytes());
    data.extend_from_slice(&guitar_record());

    let mut parser = PtbParser::new();
    let (rest, items) = parser.parse_item_group(&data).unwrap();
    assert!(rest.is_empty());
    assert_eq!(items.len(), 3);
    for item in items {
        let PtbItem::Guitar(guitar) = item else {
            panic!("expected a guitar item");
        };
        assert_eq!(guitar.title, "Guitar");
        assert_eq!(guitar.tuning, vec![64, 59, 55, 50, 45, 40]);
    }
}

#[test]
fn test_mismatched_separator_is_a_format_violation() {
    let mut data = Vec::new();
    data.extend_from_slice(&2u16.to_le_bytes());
    push_introduction(&mut data, "CGuitar");
    data.extend_from_slice(&guitar_record());
    // separator names type id 2, but CGuitar registered as id 1
    data.extend_from_slice(&0x8002u16.to_le_bytes());
    data.extend_from_slice(&guitar_record());

    let mut parser = PtbParser::new();
    let err = parser.parse_item_group(&data).unwrap_err();
    assert_eq!(
        failure_kind(err),
        DecodeErrorKind::FormatViolation("item separator")
    );
}

#[test]
fn test_unknown_type_name_is_rejected() {
    let mut data = Vec::new();
    data.extend_from_slice(&1u16.to_le_bytes());
    push_introduction(&mut data, "CBogus");

    let mut parser = PtbParser::new();
    let err = parser.parse_item_group(&data).unwrap_err();
    assert_eq!(
        failure_kind(err),
        DecodeErrorKind::UnknownRecordType("CBogus".to_string())
    );
}

#[test]
fn test_tag_without_high_bit_is_rejected() {
    let mut data = Vec::new();
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&0x0005u16.to_le_bytes());

    let mut parser = PtbParser::new();
    let err = parser.parse_item_group(&data).unwrap_err();
    assert_eq!(
        failure_kind(err),
        DecodeErrorKind::FormatViolation("item group tag")
    );
}

#[test]
fn test_back_reference_to_unregistered_id_is_rejected() {
    let mut data = Vec::new();
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&0x8003u16.to_le_bytes());

    let mut parser = PtbParser::new();
    let err = parser.parse_item_group(&data).unwrap_err();
    assert_eq!(
        failure_kind(err),
        DecodeErrorKind::FormatViolation("unregistered type id")
    );
}

#[test]
fn test_bend_chain_length_comes_from_sibling_field() {
    // string 2 / fret 3, no properties, two chained bends
    let data = [
        (2 << 5) | 3,
        0x00,
        0x00, // properties
        0x00, // transcription
        0x02, // connect-to-next
        2, 0, 10, 20, 30, // first bend
        0, 2, 40, 50, 60, // second bend
        0xEE, // next record
    ];
    let (rest, line) = parse_line_data(&data).unwrap();
    assert_eq!(rest, &[0xEE]);
    assert_eq!(line.string, 2);
    assert_eq!(line.fret, 3);
    assert_eq!(line.bends.len(), 2);
    assert_eq!(line.bends[0].bend, 2);
    assert_eq!(line.bends[0].curve, [10, 20, 30]);
    assert_eq!(line.bends[1].release, 2);

    // truncated chain fails instead of under-reading
    let truncated = &data[..8];
    let err = parse_line_data(truncated).unwrap_err();
    assert_eq!(failure_kind(err), DecodeErrorKind::UnexpectedEof);
}

#[test]
fn test_nested_groups_hit_the_recursion_bound() {
    init_logger();

    // a section whose first child group holds another section, repeated
    fn nested_section(depth: usize) -> Vec<u8> {
        let mut children = Vec::new();
        if depth == 0 {
            for _ in 0..4 {
                push_empty_group(&mut children);
            }
        } else {
            children.extend_from_slice(&1u16.to_le_bytes());
            children.extend_from_slice(&0x8001u16.to_le_bytes());
            children.extend_from_slice(&nested_section(depth - 1));
            for _ in 0..3 {
                push_empty_group(&mut children);
            }
        }
        section_record("", &children)
    }

    let mut data = Vec::new();
    data.extend_from_slice(&1u16.to_le_bytes());
    push_introduction(&mut data, "CSection");
    data.extend_from_slice(&nested_section(24));

    let mut parser = PtbParser::new();
    let err = parser.parse_item_group(&data).unwrap_err();
    assert_eq!(failure_kind(err), DecodeErrorKind::RecursionLimit);
}

#[test]
fn test_third_position_lane_is_appended_to_the_low_lane() {
    init_logger();
    // position: offset, length, flags, articulation, ornaments,
    // additional count, empty line-data group
    let position: &[u8] = &[7, 8, 0x00, 0x00, 0x00, 0x00, 0, 0x00, 0x00];

    let mut data = Vec::new();
    data.extend_from_slice(&1u16.to_le_bytes());
    push_introduction(&mut data, "CStaff");
    data.extend_from_slice(&[0x10, 1, 2, 3, 4]); // staff fields
    // high lane: one position
    data.extend_from_slice(&1u16.to_le_bytes());
    push_introduction(&mut data, "CPosition");
    data.extend_from_slice(position);
    // low lane: one position via back-reference
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&0x8002u16.to_le_bytes());
    data.extend_from_slice(position);
    // extra lane
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&0x8002u16.to_le_bytes());
    data.extend_from_slice(position);

    let mut parser = PtbParser::new();
    let (rest, items) = parser.parse_item_group(&data).unwrap();
    assert!(rest.is_empty());
    let [PtbItem::Staff(staff)] = &items[..] else {
        panic!("expected one staff item");
    };
    assert_eq!(staff.high_melody.len(), 1);
    assert_eq!(staff.low_melody.len(), 2);
    assert_eq!(staff.high_melody[0].offset, 7);
}

#[test]
fn test_missing_third_lane_is_not_consumed() {
    let position: &[u8] = &[7, 8, 0x00, 0x00, 0x00, 0x00, 0, 0x00, 0x00];

    let mut data = Vec::new();
    data.extend_from_slice(&1u16.to_le_bytes());
    push_introduction(&mut data, "CStaff");
    data.extend_from_slice(&[0x10, 1, 2, 3, 4]);
    data.extend_from_slice(&1u16.to_le_bytes());
    push_introduction(&mut data, "CPosition");
    data.extend_from_slice(position);
    push_empty_group(&mut data); // empty low lane
    let staff_len = data.len();
    // a sibling empty group follows the staff group
    push_empty_group(&mut data);

    let mut parser = PtbParser::new();
    let (rest, items) = parser.parse_item_group(&data).unwrap();
    // the probe must leave the sibling group bytes alone
    assert_eq!(rest, &data[staff_len..]);
    let [PtbItem::Staff(staff)] = &items[..] else {
        panic!("expected one staff item");
    };
    assert!(staff.low_melody.is_empty());
}

#[test]
fn test_invalid_classification_is_rejected() {
    let mut data = Vec::new();
    data.extend_from_slice(b"ptab");
    data.extend_from_slice(&3u16.to_le_bytes());
    data.push(7);
    let err = parse_ptb_data(&data).unwrap_err();
    assert_eq!(
        decode_kind(err),
        DecodeErrorKind::InvalidFieldValue {
            field: "classification",
            value: 7
        }
    );
}

#[test]
fn test_bad_magic_is_rejected() {
    let err = parse_ptb_data(b"ptak\x03\x00\x00").unwrap_err();
    assert_eq!(
        decode_kind(err),
        DecodeErrorKind::FormatViolation("file magic")
    );
}

#[test]
fn test_minimal_song_file() {
    init_logger();
    let data = crate::parser::ptb_parser::fixtures::minimal_ptb_file();
    let doc = parse_ptb_data(&data).expect("fixture should decode");

    assert_eq!(doc.header.version, 3);
    let PtbClassification::Song(song) = &doc.header.classification else {
        panic!("expected a song classification");
    };
    assert_eq!(song.title, "Test Song");
    assert_eq!(song.artist, "Test Artist");
    assert_eq!(song.release, PtbRelease::Unreleased);
    assert!(!song.author_unknown);

    let guitar_score = &doc.instruments[0];
    assert_eq!(guitar_score.guitars.len(), 1);
    assert_eq!(guitar_score.guitars[0].tuning, vec![64, 59, 55, 50, 45, 40]);
    assert_eq!(guitar_score.sections.len(), 1);

    let section = &guitar_score.sections[0];
    assert_eq!(section.letter, b'A');
    assert_eq!(section.description, "Intro");
    assert_eq!(section.beat, 4);
    assert!(section.staves.is_empty());
    assert!(section.music_bars.is_empty());

    let bass_score = &doc.instruments[1];
    assert!(bass_score.guitars.is_empty());
    assert!(bass_score.sections.is_empty());

    assert_eq!(doc.tablature_font.family, "Tablature");
    assert_eq!(doc.default_font.weight, 400);
}

#[test]
fn test_lesson_header() {
    let mut data = Vec::new();
    data.extend_from_slice(b"ptab");
    data.extend_from_slice(&3u16.to_le_bytes());
    data.push(1); // classification: lesson
    push_string(&mut data, "Sweep Picking");
    push_string(&mut data, "Nobody");
    data.extend_from_slice(&2u16.to_le_bytes()); // style
    data.push(1); // intermediate
    push_string(&mut data, "Author");
    push_string(&mut data, "Notes");
    push_string(&mut data, "(c)");
    // both scores empty, then fonts
    for _ in 0..16 {
        push_empty_group(&mut data);
    }
    data.extend_from_slice(&font_record("Tablature"));
    data.extend_from_slice(&font_record("Chord"));
    data.extend_from_slice(&font_record("Default"));

    let doc = parse_ptb_data(&data).expect("lesson fixture should decode");
    let PtbClassification::Lesson(lesson) = &doc.header.classification else {
        panic!("expected a lesson classification");
    };
    assert_eq!(lesson.title, "Sweep Picking");
    assert_eq!(lesson.level, 1);
    assert_eq!(lesson.author, "Author");
}

#[test]
fn test_video_release_carries_a_year() {
    init_logger();
    let mut data = Vec::new();
    data.extend_from_slice(b"ptab");
    data.extend_from_slice(&3u16.to_le_bytes());
    data.push(0); // classification: song
    data.push(0); // reserved
    push_string(&mut data, "DVD Song");
    push_string(&mut data, "Band");
    data.push(1); // release type: video
    push_string(&mut data, "Live at Home");
    data.extend_from_slice(&2004u16.to_le_bytes());
    data.push(1); // live
    data.push(0); // author known
    push_string(&mut data, "Muse"); // music by
    for _ in 0..9 {
        push_string(&mut data, "");
    }
    for _ in 0..16 {
        push_empty_group(&mut data);
    }
    data.extend_from_slice(&font_record("Tablature"));
    data.extend_from_slice(&font_record("Chord"));
    data.extend_from_slice(&font_record("Default"));

    let doc = parse_ptb_data(&data).expect("video release fixture should decode");
    let PtbClassification::Song(song) = &doc.header.classification else {
        panic!("expected a song classification");
    };
    assert_eq!(
        song.release,
        PtbRelease::Video {
            title: "Live at Home".to_string(),
            year: 2004,
            live: true,
        }
    );
    // a year-sized desync here would shift every following credit string
    assert!(!song.author_unknown);
    assert_eq!(song.music_by, "Muse");
    assert_eq!(song.drum_notes, "");
}

#[test]
fn test_dynamic_record_layout() {
    let data = [2, 0, 1, 5, 0xAA, 0xBB, 80, 0xEE];
    let (rest, dynamic) = parse_dynamic(&data).unwrap();
    assert_eq!(rest, &[0xEE]);
    assert_eq!(dynamic.section, 2);
    assert_eq!(dynamic.staff, 1);
    assert_eq!(dynamic.offset, 5);
    assert_eq!(dynamic.volume, 80);
}

#[test]
fn test_guitar_in_record_layout() {
    let data = [1, 0, 0xCC, 2, 3, 0x0F, 0xF0, 0xEE];
    let (rest, guitar_in) = parse_guitar_in(&data).unwrap();
    assert_eq!(rest, &[0xEE]);
    assert_eq!(guitar_in.section, 1);
    assert_eq!(guitar_in.staff, 2);
    assert_eq!(guitar_in.offset, 3);
    assert_eq!(guitar_in.rhythm_slash, 0x0F);
    assert_eq!(guitar_in.staff_in, 0xF0);
}

#[test]
fn test_tempo_marker_record_layout() {
    let mut data = Vec::new();
    data.extend_from_slice(&1u16.to_le_bytes());
    data.push(0); // offset
    data.push(120); // bpm
    data.push(0xCC); // reserved
    data.extend_from_slice(&2u16.to_le_bytes()); // kind
    push_string(&mut data, "Moderato");
    let (rest, marker) = parse_tempo_marker(&data).unwrap();
    assert!(rest.is_empty());
    assert_eq!(marker.section, 1);
    assert_eq!(marker.bpm, 120);
    assert_eq!(marker.kind, 2);
    assert_eq!(marker.description, "Moderato");
}

#[test]
fn test_chord_diagram_record_layout() {
    let data = [b'C', 0, 0xCC, 0xCC, 0xCC, 1, 0, 6, 0, 1, 0, 2, 3, 0xFF];
    let (rest, diagram) = parse_chord_diagram(&data).unwrap();
    assert!(rest.is_empty());
    assert_eq!(diagram.name, [b'C', 0]);
    assert_eq!(diagram.kind, 1);
    assert_eq!(diagram.base_fret, 0);
    assert_eq!(diagram.tones, vec![0, 1, 0, 2, 3, 0xFF]);
}

#[test]
fn test_floating_text_record_layout() {
    let mut data = Vec::new();
    push_string(&mut data, "Solo");
    data.push(10); // begin position
    data.extend_from_slice(&[0u8; 15]);
    data.push(0x02 | 0x08); // centered, with border
    data.extend_from_slice(&font_record("Arial"));
    let (rest, text) = parse_floating_text(&data).unwrap();
    assert!(rest.is_empty());
    assert_eq!(text.text, "Solo");
    assert_eq!(text.begin_position, 10);
    assert_eq!(text.alignment, PtbAlignment::Center);
    assert!(text.border);
    assert_eq!(text.font.family, "Arial");

    // two alignment bits at once are invalid
    let byte_pos = data.len() - font_record("Arial").len() - 1;
    data[byte_pos] = 0x03;
    let err = parse_floating_text(&data).unwrap_err();
    assert_eq!(
        failure_kind(err),
        DecodeErrorKind::InvalidFieldValue {
            field: "text alignment",
            value: 0x03
        }
    );
}

#[test]
fn test_music_bar_record_layout() {
    let mut data = vec![1, 0x80, 0xCC, b'B'];
    push_string(&mut data, "Chorus");
    let (rest, bar) = parse_music_bar(&data).unwrap();
    assert!(rest.is_empty());
    assert_eq!(bar.offset, 1);
    assert_eq!(bar.properties, 0x80);
    assert_eq!(bar.letter, b'B');
    assert_eq!(bar.description, "Chorus");
}

#[test]
fn test_additional_data_subtypes() {
    let (_, swell) = parse_additional_data(&[1, 10, 20, 30]).unwrap();
    assert_eq!(
        swell,
        PtbAdditionalData::VolumeSwell {
            envelope: [10, 20, 30]
        }
    );
    let (_, bar) = parse_additional_data(&[2, 1, 2, 3]).unwrap();
    assert_eq!(
        bar,
        PtbAdditionalData::TremoloBar {
            envelope: [1, 2, 3]
        }
    );
    let err = parse_additional_data(&[3, 0, 0, 0]).unwrap_err();
    assert_eq!(
        failure_kind(err),
        DecodeErrorKind::InvalidFieldValue {
            field: "additional data type",
            value: 3
        }
    );
}

#[test]
fn test_truncated_third_lane_reports_eof() {
    init_logger();
    let position: &[u8] = &[7, 8, 0x00, 0x00, 0x00, 0x00, 0, 0x00, 0x00];

    let mut data = Vec::new();
    data.extend_from_slice(&1u16.to_le_bytes());
    push_introduction(&mut data, "CStaff");
    data.extend_from_slice(&[0x10, 1, 2, 3, 4]);
    data.extend_from_slice(&1u16.to_le_bytes());
    push_introduction(&mut data, "CPosition");
    data.extend_from_slice(position);
    push_empty_group(&mut data); // empty low lane
    // third lane announced as a position group, then cut short
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&0x8002u16.to_le_bytes());
    data.extend_from_slice(&position[..2]);

    let mut parser = PtbParser::new();
    let err = parser.parse_item_group(&data).unwrap_err();
    // the failure surfaces where it happened instead of being rolled back
    assert_eq!(failure_kind(err), DecodeErrorKind::UnexpectedEof);
}

#[test]
fn test_registries_are_independent_across_decodes() {
    // ids restart at 1 for every decode call
    let mut data = Vec::new();
    data.extend_from_slice(&1u16.to_le_bytes());
    push_introduction(&mut data, "CGuitar");
    data.extend_from_slice(&guitar_record());

    for _ in 0..2 {
        let mut parser = PtbParser::new();
        let (_, items) = parser.parse_item_group(&data).unwrap();
        assert_eq!(items.len(), 1);
    }
}
