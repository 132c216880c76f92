//! PowerTab file format data structures
//!
//! The container is a fixed header followed by two instrument slots
//! (guitar score, bass score), each holding eight item-group collections,
//! then three font records.

use crate::parser::primitive_parser::Color;

/// Fully decoded PTB file.
#[derive(Debug, PartialEq)]
pub struct PtbDocument {
    pub header: PtbHeader,
    /// Slot 0 is the guitar score, slot 1 the bass score.
    pub instruments: [PtbInstrument; 2],
    pub tablature_font: PtbFont,
    pub chord_name_font: PtbFont,
    pub default_font: PtbFont,
}

#[derive(Debug, PartialEq)]
pub struct PtbHeader {
    pub version: u16,
    pub classification: PtbClassification,
}

impl PtbHeader {
    /// Format revision 1.7 (version word 4) added the music-bar group to
    /// sections.
    pub const fn has_music_bars(&self) -> bool {
        self.version >= 4
    }
}

/// File classification union: a transcribed song or a lesson.
#[derive(Debug, PartialEq)]
pub enum PtbClassification {
    Song(PtbSongHeader),
    Lesson(PtbLessonHeader),
}

#[derive(Debug, PartialEq, Default)]
pub struct PtbSongHeader {
    pub title: String,
    pub artist: String,
    pub release: PtbRelease,
    pub author_unknown: bool,
    pub music_by: String,
    pub words_by: String,
    pub arranged_by: String,
    pub guitar_transcribed_by: String,
    pub bass_transcribed_by: String,
    pub copyright: String,
    pub lyrics: String,
    pub guitar_notes: String,
    pub bass_notes: String,
    pub drum_notes: String,
}

/// Release sub-record of a song header, keyed by the release-type byte.
#[derive(Debug, PartialEq, Default)]
pub enum PtbRelease {
    Audio {
        kind: u8,
        title: String,
        year: u16,
        live: bool,
    },
    Video {
        title: String,
        year: u16,
        live: bool,
    },
    Bootleg {
        title: String,
        day: u16,
        month: u16,
        year: u16,
    },
    #[default]
    Unreleased,
}

#[derive(Debug, PartialEq, Default)]
pub struct PtbLessonHeader {
    pub title: String,
    pub artist: String,
    pub style: u16,
    /// 0 beginner, 1 intermediate, 2 advanced.
    pub level: u8,
    pub author: String,
    pub guitar_notes: String,
    pub copyright: String,
}

/// One instrument slot: the eight top-level collections.
#[derive(Debug, PartialEq, Default)]
pub struct PtbInstrument {
    pub guitars: Vec<PtbGuitar>,
    pub chord_diagrams: Vec<PtbChordDiagram>,
    pub floating_texts: Vec<PtbFloatingText>,
    pub guitar_ins: Vec<PtbGuitarIn>,
    pub tempo_markers: Vec<PtbTempoMarker>,
    pub dynamics: Vec<PtbDynamic>,
    pub section_symbols: Vec<PtbSectionSymbol>,
    pub sections: Vec<PtbSection>,
}

#[derive(Debug, PartialEq, Default)]
pub struct PtbGuitar {
    pub index: u8,
    pub title: String,
    pub midi_program: u8,
    pub initial_volume: u8,
    pub pan: u8,
    pub reverb: u8,
    pub chorus: u8,
    pub tremolo: u8,
    pub simulate: u8,
    pub capo: u8,
    pub type_description: String,
    pub half_step_up: bool,
    /// Open-string MIDI pitches, one per string.
    pub tuning: Vec<u8>,
}

#[derive(Debug, PartialEq, Default)]
pub struct PtbChordDiagram {
    /// Packed chord name word.
    pub name: [u8; 2],
    pub kind: u8,
    pub base_fret: u8,
    /// Fretted tone per string.
    pub tones: Vec<u8>,
}

/// Free-floating annotation with its own font.
#[derive(Debug, PartialEq)]
pub struct PtbFloatingText {
    pub text: String,
    pub begin_position: u8,
    pub alignment: PtbAlignment,
    pub border: bool,
    pub font: PtbFont,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PtbAlignment {
    Left,
    Center,
    Right,
}

/// Instrument-switch marker within a section.
#[derive(Debug, PartialEq, Eq, Default)]
pub struct PtbGuitarIn {
    pub section: u16,
    pub staff: u8,
    pub offset: u8,
    pub rhythm_slash: u8,
    pub staff_in: u8,
}

#[derive(Debug, PartialEq, Default)]
pub struct PtbTempoMarker {
    pub section: u16,
    pub offset: u8,
    pub bpm: u8,
    pub kind: u16,
    pub description: String,
}

#[derive(Debug, PartialEq, Eq, Default)]
pub struct PtbDynamic {
    pub section: u16,
    pub staff: u8,
    pub offset: u8,
    pub volume: u8,
}

/// Repeat / ending marker.
#[derive(Debug, PartialEq, Eq, Default)]
pub struct PtbSectionSymbol {
    pub repeat_ending: u16,
}

#[derive(Debug, PartialEq, Default)]
pub struct PtbSection {
    pub properties: u16,
    /// End-mark type in the high bits, repeat count in the low 5.
    pub end_mark: u8,
    pub position_width: u8,
    pub key_extra: u8,
    pub meter_type: u16,
    pub beat: u8,
    pub beat_value: u8,
    pub metronome_pulses: u8,
    pub letter: u8,
    pub description: String,
    pub chord_texts: Vec<PtbChordText>,
    pub rhythm_slashes: Vec<PtbRhythmSlash>,
    pub directions: Vec<PtbDirection>,
    pub staves: Vec<PtbStaff>,
    /// Format revision 1.7 and later only.
    pub music_bars: Vec<PtbMusicBar>,
}

#[derive(Debug, PartialEq, Eq, Default)]
pub struct PtbChordText {
    pub offset: u8,
    pub name: [u8; 2],
    pub additions: u8,
    pub alterations: u8,
}

#[derive(Debug, PartialEq, Eq, Default)]
pub struct PtbRhythmSlash {
    pub offset: u8,
    pub properties: u8,
    pub dotted: u8,
    pub length: u8,
}

/// Musical direction (coda, segno, ...) as packed direction words.
#[derive(Debug, PartialEq, Eq, Default)]
pub struct PtbDirection {
    pub words: Vec<u16>,
}

/// One stave with its two parallel position lanes.
#[derive(Debug, PartialEq, Default)]
pub struct PtbStaff {
    /// Clef in the high nibble, extra string count in the low.
    pub properties: u8,
    pub highest_note_space: u8,
    pub lowest_note_space: u8,
    pub symbol_space: u8,
    pub tab_staff_space: u8,
    pub high_melody: Vec<PtbPosition>,
    pub low_melody: Vec<PtbPosition>,
}

#[derive(Debug, PartialEq, Default)]
pub struct PtbPosition {
    /// Time-slot index within the bar.
    pub offset: u8,
    pub length: u8,
    /// Dotting, triplet and beam-grouping bits.
    pub flags: u16,
    pub articulation: PtbArticulation,
    pub ornaments: PtbOrnaments,
    pub additional: Vec<PtbAdditionalData>,
    pub line_data: Vec<PtbLineData>,
}

/// Articulation flags of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PtbArticulation {
    pub staccato: bool,
    pub accent: bool,
    pub palm_mute: bool,
    pub pick_stroke_up: bool,
    pub pick_stroke_down: bool,
    pub tremolo_picking: bool,
}

impl PtbArticulation {
    pub const fn from_byte(byte: u8) -> Self {
        PtbArticulation {
            staccato: byte & 0x01 != 0,
            accent: byte & 0x02 != 0,
            palm_mute: byte & 0x04 != 0,
            pick_stroke_up: byte & 0x08 != 0,
            pick_stroke_down: byte & 0x10 != 0,
            tremolo_picking: byte & 0x20 != 0,
        }
    }
}

/// Ornament flags of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PtbOrnaments {
    pub fermata: bool,
    pub triplet_feel: bool,
    pub let_ring: bool,
    pub acciaccatura: bool,
}

impl PtbOrnaments {
    pub const fn from_byte(byte: u8) -> Self {
        PtbOrnaments {
            fermata: byte & 0x01 != 0,
            triplet_feel: byte & 0x02 != 0,
            let_ring: byte & 0x04 != 0,
            acciaccatura: byte & 0x08 != 0,
        }
    }
}

/// Extra per-position envelope records, keyed by a sub-type byte.
#[derive(Debug, PartialEq, Eq)]
pub enum PtbAdditionalData {
    VolumeSwell { envelope: [u8; 3] },
    TremoloBar { envelope: [u8; 3] },
}

/// One struck string of a position.
#[derive(Debug, PartialEq, Default)]
pub struct PtbLineData {
    pub string: u8,
    pub fret: u8,
    pub properties: PtbNoteProperties,
    pub transcription: PtbTranscription,
    /// Bend chain; the record count comes from the sibling
    /// connect-to-next field, not a length prefix of its own.
    pub bends: Vec<PtbBend>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PtbNoteProperties {
    pub tie: bool,
    pub muted: bool,
    pub continues: bool,
    pub hammer_on_from: bool,
    pub pull_off_from: bool,
    pub dest_nowhere: bool,
    pub ghost: bool,
    pub natural_harmonic: bool,
}

impl PtbNoteProperties {
    pub const fn from_word(word: u16) -> Self {
        PtbNoteProperties {
            tie: word & 0x01 != 0,
            muted: word & 0x02 != 0,
            continues: word & 0x04 != 0,
            hammer_on_from: word & 0x08 != 0,
            pull_off_from: word & 0x10 != 0,
            dest_nowhere: word & 0x20 != 0,
            ghost: word & 0x40 != 0,
            natural_harmonic: word & 0x80 != 0,
        }
    }
}

/// Octave transcription flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PtbTranscription {
    pub octave_8va: bool,
    pub octave_15ma: bool,
    pub octave_8vb: bool,
    pub octave_15mb: bool,
}

impl PtbTranscription {
    pub const fn from_byte(byte: u8) -> Self {
        PtbTranscription {
            octave_8va: byte & 0x01 != 0,
            octave_15ma: byte & 0x02 != 0,
            octave_8vb: byte & 0x04 != 0,
            octave_15mb: byte & 0x08 != 0,
        }
    }
}

/// Fixed-size bend micro-record.
#[derive(Debug, PartialEq, Eq)]
pub struct PtbBend {
    pub bend: u8,
    pub release: u8,
    pub curve: [u8; 3],
}

#[derive(Debug, PartialEq, Default)]
pub struct PtbMusicBar {
    pub offset: u8,
    pub properties: u8,
    pub letter: u8,
    pub description: String,
}

#[derive(Debug, PartialEq, Default)]
pub struct PtbFont {
    pub family: String,
    pub point_size: u32,
    pub weight: u32,
    pub italic: bool,
    pub underlined: bool,
    pub strikeout: bool,
    pub color: Color,
}
