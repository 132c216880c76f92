//! PowerTab file parsing
//!
//! Most collections in the file use a tagged item-group framing: a u16
//! item count, then either a type introduction (0xFFFF marker, name
//! string, fresh id) or a 2-byte back-reference to a previously
//! introduced type, then the items separated by `0x8000 | type_id`
//! words. The registry of introduced types lives in the parser value,
//! scoped to one decode call, and section records recurse through the
//! same reader for their child collections.

use crate::error::TabError;
use crate::parser::decode_error::{fail, DecodeErrorKind, PResult};
use crate::parser::primitive_parser::{
    expect_u16, expect_u8, make_string, parse_bytes, parse_ptb_color, parse_short_string,
    parse_u16, parse_u32, parse_u8, peek_u16, skip,
};
use crate::parser::ptb_types::{
    PtbAdditionalData, PtbAlignment, PtbArticulation, PtbBend, PtbChordDiagram, PtbChordText,
    PtbClassification, PtbDirection, PtbDocument, PtbDynamic, PtbFloatingText, PtbFont, PtbGuitar,
    PtbGuitarIn, PtbHeader, PtbInstrument, PtbLessonHeader, PtbLineData, PtbMusicBar,
    PtbNoteProperties, PtbOrnaments, PtbPosition, PtbRelease, PtbRhythmSlash, PtbSection,
    PtbSectionSymbol, PtbSongHeader, PtbStaff, PtbTempoMarker, PtbTranscription,
};
use nom::error::context;
use nom::Parser;

const FILE_MAGIC: &[u8] = b"ptab";
const TYPE_INTRODUCTION: u16 = 0xFFFF;
const BACK_REFERENCE_BIT: u16 = 0x8000;
// the format nests section -> staff -> position -> line-data; anything
// deeper is hostile input
const MAX_GROUP_DEPTH: usize = 16;

/// Parse a complete PTB byte stream into a document.
pub fn parse_ptb_data(data: &[u8]) -> Result<PtbDocument, TabError> {
    let mut parser = PtbParser::new();
    match parser.parse_document(data) {
        Ok((_rest, doc)) => Ok(doc),
        Err(err) => Err(TabError::from_decode(data.len(), err)),
    }
}

/// Every record type an item group can introduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordKind {
    Guitar,
    ChordDiagram,
    FloatingText,
    GuitarIn,
    TempoMarker,
    Dynamic,
    SectionSymbol,
    Section,
    ChordText,
    RhythmSlash,
    Direction,
    Staff,
    Position,
    LineData,
    MusicBar,
}

fn record_kind(name: &str) -> Option<RecordKind> {
    let kind = match name {
        "CGuitar" => RecordKind::Guitar,
        "CChordDiagram" => RecordKind::ChordDiagram,
        "CFloatingText" => RecordKind::FloatingText,
        "CGuitarIn" => RecordKind::GuitarIn,
        "CTempoMarker" => RecordKind::TempoMarker,
        "CDynamic" => RecordKind::Dynamic,
        "CSectionSymbol" => RecordKind::SectionSymbol,
        "CSection" => RecordKind::Section,
        "CChordText" => RecordKind::ChordText,
        "CRhythmSlash" => RecordKind::RhythmSlash,
        "CDirection" => RecordKind::Direction,
        "CStaff" => RecordKind::Staff,
        "CPosition" => RecordKind::Position,
        "CLineData" => RecordKind::LineData,
        "CMusicBar" => RecordKind::MusicBar,
        _ => return None,
    };
    Some(kind)
}

/// One decoded item of any record type.
#[derive(Debug, PartialEq)]
pub(crate) enum PtbItem {
    Guitar(PtbGuitar),
    ChordDiagram(PtbChordDiagram),
    FloatingText(PtbFloatingText),
    GuitarIn(PtbGuitarIn),
    TempoMarker(PtbTempoMarker),
    Dynamic(PtbDynamic),
    SectionSymbol(PtbSectionSymbol),
    Section(PtbSection),
    ChordText(PtbChordText),
    RhythmSlash(PtbRhythmSlash),
    Direction(PtbDirection),
    Staff(PtbStaff),
    Position(PtbPosition),
    LineData(PtbLineData),
    MusicBar(PtbMusicBar),
}

macro_rules! typed_group {
    ($fn_name:ident, $variant:ident, $ty:ty, $what:literal) => {
        fn $fn_name<'a>(&mut self, i: &'a [u8]) -> PResult<'a, Vec<$ty>> {
            let (i, items) = self.parse_item_group(i)?;
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    PtbItem::$variant(value) => out.push(value),
                    _ => return fail(i, DecodeErrorKind::FormatViolation($what)),
                }
            }
            Ok((i, out))
        }
    };
}

/// Stateful PTB reader: the type registry and the nesting guard.
pub(crate) struct PtbParser {
    /// Introduced types in order; type id = index + 1.
    registry: Vec<(String, RecordKind)>,
    depth: usize,
    /// Set from the header version: sections carry a music-bar group
    /// from format revision 1.7 on.
    music_bars: bool,
}

impl PtbParser {
    pub(crate) fn new() -> Self {
        PtbParser {
            registry: vec![],
            depth: 0,
            music_bars: false,
        }
    }

    pub(crate) fn parse_document<'a>(&mut self, i: &'a [u8]) -> PResult<'a, PtbDocument> {
        let (i, magic) = parse_bytes(FILE_MAGIC.len())(i)?;
        if magic != FILE_MAGIC {
            return fail(i, DecodeErrorKind::FormatViolation("file magic"));
        }
        let (i, version) = parse_u16(i)?;
        log::debug!("PTB format version {version}");
        let (i, classification) = context("ptb header", parse_classification).parse(i)?;
        let header = PtbHeader {
            version,
            classification,
        };
        self.music_bars = header.has_music_bars();

        let (i, guitar_score) = context("ptb guitar score", |i| self.parse_instrument(i)).parse(i)?;
        let (i, bass_score) = context("ptb bass score", |i| self.parse_instrument(i)).parse(i)?;

        let (i, tablature_font) = context("ptb fonts", parse_font).parse(i)?;
        let (i, chord_name_font) = parse_font(i)?;
        let (i, default_font) = parse_font(i)?;

        let doc = PtbDocument {
            header,
            instruments: [guitar_score, bass_score],
            tablature_font,
            chord_name_font,
            default_font,
        };
        Ok((i, doc))
    }

    fn parse_instrument<'a>(&mut self, i: &'a [u8]) -> PResult<'a, PtbInstrument> {
        let (i, guitars) = self.parse_guitars(i)?;
        let (i, chord_diagrams) = self.parse_chord_diagrams(i)?;
        let (i, floating_texts) = self.parse_floating_texts(i)?;
        let (i, guitar_ins) = self.parse_guitar_ins(i)?;
        let (i, tempo_markers) = self.parse_tempo_markers(i)?;
        let (i, dynamics) = self.parse_dynamics(i)?;
        let (i, section_symbols) = self.parse_section_symbols(i)?;
        let (i, sections) = self.parse_sections(i)?;
        let instrument = PtbInstrument {
            guitars,
            chord_diagrams,
            floating_texts,
            guitar_ins,
            tempo_markers,
            dynamics,
            section_symbols,
            sections,
        };
        Ok((i, instrument))
    }

    typed_group!(parse_guitars, Guitar, PtbGuitar, "mixed guitar group");
    typed_group!(
        parse_chord_diagrams,
        ChordDiagram,
        PtbChordDiagram,
        "mixed chord diagram group"
    );
    typed_group!(
        parse_floating_texts,
        FloatingText,
        PtbFloatingText,
        "mixed floating text group"
    );
    typed_group!(parse_guitar_ins, GuitarIn, PtbGuitarIn, "mixed guitar-in group");
    typed_group!(
        parse_tempo_markers,
        TempoMarker,
        PtbTempoMarker,
        "mixed tempo marker group"
    );
    typed_group!(parse_dynamics, Dynamic, PtbDynamic, "mixed dynamic group");
    typed_group!(
        parse_section_symbols,
        SectionSymbol,
        PtbSectionSymbol,
        "mixed section symbol group"
    );
    typed_group!(parse_sections, Section, PtbSection, "mixed section group");
    typed_group!(
        parse_chord_texts,
        ChordText,
        PtbChordText,
        "mixed chord text group"
    );
    typed_group!(
        parse_rhythm_slashes,
        RhythmSlash,
        PtbRhythmSlash,
        "mixed rhythm slash group"
    );
    typed_group!(parse_directions, Direction, PtbDirection, "mixed direction group");
    typed_group!(parse_staves, Staff, PtbStaff, "mixed staff group");
    typed_group!(parse_positions, Position, PtbPosition, "mixed position group");
    typed_group!(parse_line_datas, LineData, PtbLineData, "mixed line data group");
    typed_group!(parse_music_bars, MusicBar, PtbMusicBar, "mixed music bar group");

    /// Read one item group: count, type tag, items with separators.
    /// A zero count is the empty group and consumes nothing further.
    pub(crate) fn parse_item_group<'a>(&mut self, i: &'a [u8]) -> PResult<'a, Vec<PtbItem>> {
        if self.depth >= MAX_GROUP_DEPTH {
            return fail(i, DecodeErrorKind::RecursionLimit);
        }
        self.depth += 1;
        let result = self.parse_item_group_inner(i);
        self.depth -= 1;
        result
    }

    fn parse_item_group_inner<'a>(&mut self, i: &'a [u8]) -> PResult<'a, Vec<PtbItem>> {
        let (i, count) = parse_u16(i)?;
        if count == 0 {
            return Ok((i, vec![]));
        }
        let (i, type_id) = self.parse_group_tag(i)?;
        self.parse_group_items(i, count, type_id)
    }

    /// Resolve the group's type: a 0xFFFF introduction registers a fresh
    /// id for the named type, a high-bit tag references an earlier one.
    fn parse_group_tag<'a>(&mut self, i: &'a [u8]) -> PResult<'a, u16> {
        let (rest, tag) = parse_u16(i)?;
        if tag == TYPE_INTRODUCTION {
            let (rest, ()) = expect_u16(1, "type introduction marker")(rest)?;
            let (rest, name_len) = parse_u16(rest)?;
            let (rest, name_bytes) = parse_bytes(name_len as usize)(rest)?;
            let name = make_string(name_bytes);
            let Some(kind) = record_kind(&name) else {
                return fail(rest, DecodeErrorKind::UnknownRecordType(name));
            };
            log::debug!("introduced type {:?} as id {}", name, self.registry.len() + 1);
            self.registry.push((name, kind));
            Ok((rest, self.registry.len() as u16))
        } else if tag & BACK_REFERENCE_BIT != 0 {
            let id = tag & !BACK_REFERENCE_BIT;
            if id == 0 || id as usize > self.registry.len() {
                return fail(i, DecodeErrorKind::FormatViolation("unregistered type id"));
            }
            Ok((rest, id))
        } else {
            fail(i, DecodeErrorKind::FormatViolation("item group tag"))
        }
    }

    fn parse_group_items<'a>(
        &mut self,
        i: &'a [u8],
        count: u16,
        type_id: u16,
    ) -> PResult<'a, Vec<PtbItem>> {
        let kind = self.registry[(type_id - 1) as usize].1;
        log::debug!("item group: {count} x {kind:?}");
        let mut items = Vec::new();
        let mut i = i;
        for index in 0..count {
            let (rest, item) = self.dispatch(kind, i)?;
            items.push(item);
            i = rest;
            if index + 1 < count {
                let (rest, ()) = expect_u16(BACK_REFERENCE_BIT | type_id, "item separator")(i)?;
                i = rest;
            }
        }
        Ok((i, items))
    }

    fn dispatch<'a>(&mut self, kind: RecordKind, i: &'a [u8]) -> PResult<'a, PtbItem> {
        match kind {
            RecordKind::Guitar => map_item(parse_guitar(i), PtbItem::Guitar),
            RecordKind::ChordDiagram => map_item(parse_chord_diagram(i), PtbItem::ChordDiagram),
            RecordKind::FloatingText => map_item(parse_floating_text(i), PtbItem::FloatingText),
            RecordKind::GuitarIn => map_item(parse_guitar_in(i), PtbItem::GuitarIn),
            RecordKind::TempoMarker => map_item(parse_tempo_marker(i), PtbItem::TempoMarker),
            RecordKind::Dynamic => map_item(parse_dynamic(i), PtbItem::Dynamic),
            RecordKind::SectionSymbol => map_item(parse_section_symbol(i), PtbItem::SectionSymbol),
            RecordKind::Section => self.parse_section(i),
            RecordKind::ChordText => map_item(parse_chord_text(i), PtbItem::ChordText),
            RecordKind::RhythmSlash => map_item(parse_rhythm_slash(i), PtbItem::RhythmSlash),
            RecordKind::Direction => map_item(parse_direction(i), PtbItem::Direction),
            RecordKind::Staff => self.parse_staff(i),
            RecordKind::Position => self.parse_position(i),
            RecordKind::LineData => map_item(parse_line_data(i), PtbItem::LineData),
            RecordKind::MusicBar => map_item(parse_music_bar(i), PtbItem::MusicBar),
        }
    }

    fn parse_section<'a>(&mut self, i: &'a [u8]) -> PResult<'a, PtbItem> {
        let (i, ()) = expect_u8(0x32, "section header constant")(i)?;
        let (i, ()) = skip(11)(i)?;
        let (i, properties) = parse_u16(i)?;
        let (i, ()) = skip(2)(i)?;
        let (i, end_mark) = parse_u8(i)?;
        let (i, position_width) = parse_u8(i)?;
        let (i, ()) = skip(5)(i)?;
        let (i, key_extra) = parse_u8(i)?;
        let (i, ()) = skip(1)(i)?;
        let (i, meter_type) = parse_u16(i)?;
        let (i, beat) = parse_u8(i)?;
        let (i, beat_value) = parse_u8(i)?;
        let (i, metronome_pulses) = parse_u8(i)?;
        let (i, letter) = parse_u8(i)?;
        let (i, description) = parse_short_string(i)?;
        log::debug!("section {:?}: {:?}", letter as char, description);

        let (i, chord_texts) = self.parse_chord_texts(i)?;
        let (i, rhythm_slashes) = self.parse_rhythm_slashes(i)?;
        let (i, directions) = self.parse_directions(i)?;
        let (i, staves) = self.parse_staves(i)?;
        let (i, music_bars) = if self.music_bars {
            self.parse_music_bars(i)?
        } else {
            (i, vec![])
        };

        let section = PtbSection {
            properties,
            end_mark,
            position_width,
            key_extra,
            meter_type,
            beat,
            beat_value,
            metronome_pulses,
            letter,
            description,
            chord_texts,
            rhythm_slashes,
            directions,
            staves,
            music_bars,
        };
        Ok((i, PtbItem::Section(section)))
    }

    fn parse_staff<'a>(&mut self, i: &'a [u8]) -> PResult<'a, PtbItem> {
        let (i, properties) = parse_u8(i)?;
        let (i, highest_note_space) = parse_u8(i)?;
        let (i, lowest_note_space) = parse_u8(i)?;
        let (i, symbol_space) = parse_u8(i)?;
        let (i, tab_staff_space) = parse_u8(i)?;
        let (i, high_melody) = self.parse_positions(i)?;
        let (i, mut low_melody) = self.parse_positions(i)?;

        // some files carry a third position lane
        let (i, mut extra) = self.parse_extra_position_lane(i)?;
        low_melody.append(&mut extra);

        let staff = PtbStaff {
            properties,
            highest_note_space,
            lowest_note_space,
            symbol_space,
            tab_staff_space,
            high_melody,
            low_melody,
        };
        Ok((i, PtbItem::Staff(staff)))
    }

    /// Probe for one more position group. The group header (count + tag)
    /// is sniffed without committing: when it does not resolve to the
    /// position record type the bytes belong to whatever follows the
    /// staff and are left untouched. Once the tag names a position lane,
    /// item-parse failures are real and propagate.
    fn parse_extra_position_lane<'a>(&mut self, i: &'a [u8]) -> PResult<'a, Vec<PtbPosition>> {
        let Ok((_, count)) = peek_u16(i) else {
            return Ok((i, vec![]));
        };
        if count == 0 {
            // an empty group is indistinguishable from a sibling's count,
            // treat it as "no third lane"
            return Ok((i, vec![]));
        }
        let checkpoint = self.registry.len();
        let after_count = &i[2..];
        let (rest, type_id) = match self.parse_group_tag(after_count) {
            Ok(parsed) => parsed,
            Err(_) => {
                self.registry.truncate(checkpoint);
                return Ok((i, vec![]));
            }
        };
        if self.registry[(type_id - 1) as usize].1 != RecordKind::Position {
            self.registry.truncate(checkpoint);
            return Ok((i, vec![]));
        }
        let (rest, items) = self.parse_group_items(rest, count, type_id)?;
        let mut positions = Vec::with_capacity(items.len());
        for item in items {
            match item {
                PtbItem::Position(position) => positions.push(position),
                _ => return fail(rest, DecodeErrorKind::FormatViolation("mixed position group")),
            }
        }
        Ok((rest, positions))
    }

    fn parse_position<'a>(&mut self, i: &'a [u8]) -> PResult<'a, PtbItem> {
        let (i, offset) = parse_u8(i)?;
        let (i, length) = parse_u8(i)?;
        let (i, flags) = parse_u16(i)?;
        let (i, articulation) = parse_u8(i)?;
        let (i, ornaments) = parse_u8(i)?;
        let (i, additional_count) = parse_u8(i)?;
        let mut i = i;
        let mut additional = Vec::with_capacity(additional_count as usize);
        for _ in 0..additional_count {
            let (rest, record) = parse_additional_data(i)?;
            additional.push(record);
            i = rest;
        }
        let (i, line_data) = self.parse_line_datas(i)?;
        let position = PtbPosition {
            offset,
            length,
            flags,
            articulation: PtbArticulation::from_byte(articulation),
            ornaments: PtbOrnaments::from_byte(ornaments),
            additional,
            line_data,
        };
        Ok((i, PtbItem::Position(position)))
    }
}

fn map_item<'a, T>(
    result: PResult<'a, T>,
    wrap: fn(T) -> PtbItem,
) -> PResult<'a, PtbItem> {
    result.map(|(rest, value)| (rest, wrap(value)))
}

fn parse_classification(i: &[u8]) -> PResult<'_, PtbClassification> {
    let (i, classification) = parse_u8(i)?;
    match classification {
        0 => {
            let (i, song) = parse_song_header(i)?;
            Ok((i, PtbClassification::Song(song)))
        }
        1 => {
            let (i, lesson) = parse_lesson_header(i)?;
            Ok((i, PtbClassification::Lesson(lesson)))
        }
        value => fail(
            i,
            DecodeErrorKind::InvalidFieldValue {
                field: "classification",
                value: u32::from(value),
            },
        ),
    }
}

fn parse_song_header(i: &[u8]) -> PResult<'_, PtbSongHeader> {
    let (i, ()) = skip(1)(i)?;
    let (i, title) = parse_short_string(i)?;
    let (i, artist) = parse_short_string(i)?;
    let (i, release) = parse_release(i)?;
    let (i, author_unknown) = parse_u8(i)?;
    let (i, music_by) = parse_short_string(i)?;
    let (i, words_by) = parse_short_string(i)?;
    let (i, arranged_by) = parse_short_string(i)?;
    let (i, guitar_transcribed_by) = parse_short_string(i)?;
    let (i, bass_transcribed_by) = parse_short_string(i)?;
    let (i, copyright) = parse_short_string(i)?;
    let (i, lyrics) = parse_short_string(i)?;
    let (i, guitar_notes) = parse_short_string(i)?;
    let (i, bass_notes) = parse_short_string(i)?;
    let (i, drum_notes) = parse_short_string(i)?;
    let header = PtbSongHeader {
        title,
        artist,
        release,
        author_unknown: author_unknown != 0,
        music_by,
        words_by,
        arranged_by,
        guitar_transcribed_by,
        bass_transcribed_by,
        copyright,
        lyrics,
        guitar_notes,
        bass_notes,
        drum_notes,
    };
    Ok((i, header))
}

fn parse_release(i: &[u8]) -> PResult<'_, PtbRelease> {
    let (i, release_type) = parse_u8(i)?;
    match release_type {
        0 => {
            let (i, kind) = parse_u8(i)?;
            if kind > 5 {
                return fail(
                    i,
                    DecodeErrorKind::InvalidFieldValue {
                        field: "audio release type",
                        value: u32::from(kind),
                    },
                );
            }
            let (i, title) = parse_short_string(i)?;
            let (i, year) = parse_u16(i)?;
            let (i, live) = parse_u8(i)?;
            let release = PtbRelease::Audio {
                kind,
                title,
                year,
                live: live != 0,
            };
            Ok((i, release))
        }
        1 => {
            let (i, title) = parse_short_string(i)?;
            let (i, year) = parse_u16(i)?;
            let (i, live) = parse_u8(i)?;
            let release = PtbRelease::Video {
                title,
                year,
                live: live != 0,
            };
            Ok((i, release))
        }
        2 => {
            let (i, title) = parse_short_string(i)?;
            let (i, day) = parse_u16(i)?;
            let (i, month) = parse_u16(i)?;
            let (i, year) = parse_u16(i)?;
            let release = PtbRelease::Bootleg {
                title,
                day,
                month,
                year,
            };
            Ok((i, release))
        }
        3 => Ok((i, PtbRelease::Unreleased)),
        value => fail(
            i,
            DecodeErrorKind::InvalidFieldValue {
                field: "release type",
                value: u32::from(value),
            },
        ),
    }
}

fn parse_lesson_header(i: &[u8]) -> PResult<'_, PtbLessonHeader> {
    let (i, title) = parse_short_string(i)?;
    let (i, artist) = parse_short_string(i)?;
    let (i, style) = parse_u16(i)?;
    let (i, level) = parse_u8(i)?;
    if level > 2 {
        return fail(
            i,
            DecodeErrorKind::InvalidFieldValue {
                field: "lesson level",
                value: u32::from(level),
            },
        );
    }
    let (i, author) = parse_short_string(i)?;
    let (i, guitar_notes) = parse_short_string(i)?;
    let (i, copyright) = parse_short_string(i)?;
    let header = PtbLessonHeader {
        title,
        artist,
        style,
        level,
        author,
        guitar_notes,
        copyright,
    };
    Ok((i, header))
}

fn parse_guitar(i: &[u8]) -> PResult<'_, PtbGuitar> {
    let (i, index) = parse_u8(i)?;
    let (i, title) = parse_short_string(i)?;
    let (i, midi_program) = parse_u8(i)?;
    let (i, initial_volume) = parse_u8(i)?;
    let (i, pan) = parse_u8(i)?;
    let (i, reverb) = parse_u8(i)?;
    let (i, chorus) = parse_u8(i)?;
    let (i, tremolo) = parse_u8(i)?;
    let (i, simulate) = parse_u8(i)?;
    let (i, capo) = parse_u8(i)?;
    let (i, type_description) = parse_short_string(i)?;
    let (i, half_step_up) = parse_u8(i)?;
    let (i, string_count) = parse_u8(i)?;
    let (i, pitches) = parse_bytes(string_count as usize)(i)?;
    let guitar = PtbGuitar {
        index,
        title,
        midi_program,
        initial_volume,
        pan,
        reverb,
        chorus,
        tremolo,
        simulate,
        capo,
        type_description,
        half_step_up: half_step_up != 0,
        tuning: pitches.to_vec(),
    };
    Ok((i, guitar))
}

pub(crate) fn parse_chord_diagram(i: &[u8]) -> PResult<'_, PtbChordDiagram> {
    let (i, name) = parse_bytes(2)(i)?;
    let (i, ()) = skip(3)(i)?;
    let (i, kind) = parse_u8(i)?;
    let (i, base_fret) = parse_u8(i)?;
    let (i, string_count) = parse_u8(i)?;
    let (i, tones) = parse_bytes(string_count as usize)(i)?;
    let diagram = PtbChordDiagram {
        name: [name[0], name[1]],
        kind,
        base_fret,
        tones: tones.to_vec(),
    };
    Ok((i, diagram))
}

pub(crate) fn parse_floating_text(i: &[u8]) -> PResult<'_, PtbFloatingText> {
    let (i, text) = parse_short_string(i)?;
    let (i, begin_position) = parse_u8(i)?;
    let (i, ()) = skip(15)(i)?;
    let (i, alignment_byte) = parse_u8(i)?;
    let border = alignment_byte & 0x08 != 0;
    let alignment = match alignment_byte & !0x08 {
        0x01 => PtbAlignment::Left,
        0x02 => PtbAlignment::Center,
        0x04 => PtbAlignment::Right,
        _ => {
            return fail(
                i,
                DecodeErrorKind::InvalidFieldValue {
                    field: "text alignment",
                    value: u32::from(alignment_byte),
                },
            )
        }
    };
    let (i, font) = parse_font(i)?;
    let floating_text = PtbFloatingText {
        text,
        begin_position,
        alignment,
        border,
        font,
    };
    Ok((i, floating_text))
}

pub(crate) fn parse_guitar_in(i: &[u8]) -> PResult<'_, PtbGuitarIn> {
    let (i, section) = parse_u16(i)?;
    let (i, ()) = skip(1)(i)?;
    let (i, staff) = parse_u8(i)?;
    let (i, offset) = parse_u8(i)?;
    let (i, rhythm_slash) = parse_u8(i)?;
    let (i, staff_in) = parse_u8(i)?;
    let guitar_in = PtbGuitarIn {
        section,
        staff,
        offset,
        rhythm_slash,
        staff_in,
    };
    Ok((i, guitar_in))
}

pub(crate) fn parse_tempo_marker(i: &[u8]) -> PResult<'_, PtbTempoMarker> {
    let (i, section) = parse_u16(i)?;
    let (i, offset) = parse_u8(i)?;
    let (i, bpm) = parse_u8(i)?;
    let (i, ()) = skip(1)(i)?;
    let (i, kind) = parse_u16(i)?;
    let (i, description) = parse_short_string(i)?;
    let marker = PtbTempoMarker {
        section,
        offset,
        bpm,
        kind,
        description,
    };
    Ok((i, marker))
}

pub(crate) fn parse_dynamic(i: &[u8]) -> PResult<'_, PtbDynamic> {
    let (i, section) = parse_u16(i)?;
    let (i, staff) = parse_u8(i)?;
    let (i, offset) = parse_u8(i)?;
    let (i, ()) = skip(2)(i)?;
    let (i, volume) = parse_u8(i)?;
    let dynamic = PtbDynamic {
        section,
        staff,
        offset,
        volume,
    };
    Ok((i, dynamic))
}

fn parse_section_symbol(i: &[u8]) -> PResult<'_, PtbSectionSymbol> {
    let (i, ()) = skip(5)(i)?;
    let (i, repeat_ending) = parse_u16(i)?;
    Ok((i, PtbSectionSymbol { repeat_ending }))
}

fn parse_chord_text(i: &[u8]) -> PResult<'_, PtbChordText> {
    let (i, offset) = parse_u8(i)?;
    let (i, name) = parse_bytes(2)(i)?;
    let (i, ()) = skip(1)(i)?;
    let (i, additions) = parse_u8(i)?;
    let (i, alterations) = parse_u8(i)?;
    let (i, ()) = skip(1)(i)?;
    let chord_text = PtbChordText {
        offset,
        name: [name[0], name[1]],
        additions,
        alterations,
    };
    Ok((i, chord_text))
}

fn parse_rhythm_slash(i: &[u8]) -> PResult<'_, PtbRhythmSlash> {
    let (i, offset) = parse_u8(i)?;
    let (i, properties) = parse_u8(i)?;
    let (i, dotted) = parse_u8(i)?;
    let (i, length) = parse_u8(i)?;
    let slash = PtbRhythmSlash {
        offset,
        properties,
        dotted,
        length,
    };
    Ok((i, slash))
}

fn parse_direction(i: &[u8]) -> PResult<'_, PtbDirection> {
    let (i, count) = parse_u8(i)?;
    let mut i = i;
    let mut words = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let (rest, word) = parse_u16(i)?;
        words.push(word);
        i = rest;
    }
    Ok((i, PtbDirection { words }))
}

pub(crate) fn parse_additional_data(i: &[u8]) -> PResult<'_, PtbAdditionalData> {
    let (i, sub_type) = parse_u8(i)?;
    let (i, envelope) = parse_bytes(3)(i)?;
    let envelope = [envelope[0], envelope[1], envelope[2]];
    match sub_type {
        1 => Ok((i, PtbAdditionalData::VolumeSwell { envelope })),
        2 => Ok((i, PtbAdditionalData::TremoloBar { envelope })),
        value => fail(
            i,
            DecodeErrorKind::InvalidFieldValue {
                field: "additional data type",
                value: u32::from(value),
            },
        ),
    }
}

pub(crate) fn parse_line_data(i: &[u8]) -> PResult<'_, PtbLineData> {
    let (i, packed) = parse_u8(i)?;
    let (i, properties) = parse_u16(i)?;
    let (i, transcribe) = parse_u8(i)?;
    let (i, conn_to_next) = parse_u8(i)?;
    // the bend chain length comes from the sibling field just read
    let mut i = i;
    let mut bends = Vec::with_capacity(conn_to_next as usize);
    for _ in 0..conn_to_next {
        let (rest, bend) = parse_u8(i)?;
        let (rest, release) = parse_u8(rest)?;
        let (rest, curve) = parse_bytes(3)(rest)?;
        bends.push(PtbBend {
            bend,
            release,
            curve: [curve[0], curve[1], curve[2]],
        });
        i = rest;
    }
    let line_data = PtbLineData {
        string: packed >> 5,
        fret: packed & 0x1F,
        properties: PtbNoteProperties::from_word(properties),
        transcription: PtbTranscription::from_byte(transcribe),
        bends,
    };
    Ok((i, line_data))
}

pub(crate) fn parse_music_bar(i: &[u8]) -> PResult<'_, PtbMusicBar> {
    let (i, offset) = parse_u8(i)?;
    let (i, properties) = parse_u8(i)?;
    let (i, ()) = skip(1)(i)?;
    let (i, letter) = parse_u8(i)?;
    let (i, description) = parse_short_string(i)?;
    let bar = PtbMusicBar {
        offset,
        properties,
        letter,
        description,
    };
    Ok((i, bar))
}

fn parse_font(i: &[u8]) -> PResult<'_, PtbFont> {
    let (i, family) = parse_short_string(i)?;
    let (i, point_size) = parse_u32(i)?;
    let (i, weight) = parse_u32(i)?;
    let (i, italic) = parse_u8(i)?;
    let (i, underlined) = parse_u8(i)?;
    let (i, strikeout) = parse_u8(i)?;
    let (i, color) = parse_ptb_color(i)?;
    let font = PtbFont {
        family,
        point_size,
        weight,
        italic: italic != 0,
        underlined: underlined != 0,
        strikeout: strikeout != 0,
        color,
    };
    Ok((i, font))
}
