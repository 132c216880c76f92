//! Guitar Pro 2.x-4.x file format data structures
//!
//! GP4 docs at <https://dguitar.sourceforge.net/GP4format.html>

use crate::parser::primitive_parser::Color;

/// Numeric version parsed from the trailing suffix of the version string
/// (e.g. "FICHIER GUITAR PRO v3.00" -> 3.00).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GpVersion {
    pub major: u16,
    pub minor: u16,
}

impl GpVersion {
    pub const fn new(major: u16, minor: u16) -> Self {
        GpVersion { major, minor }
    }

    /// Version gate used at the 2.0 / 3.0 / 4.0 format boundaries.
    pub const fn at_least(&self, major: u16) -> bool {
        self.major >= major
    }
}

impl std::fmt::Display for GpVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

/// Fully decoded GP file.
#[derive(Debug, PartialEq, Default)]
pub struct GpDocument {
    pub version: GpVersion,
    pub version_string: String,
    pub header: GpHeader,
    /// Only present in 4.x files.
    pub lyrics: Option<GpLyrics>,
    /// Tempo in beats per minute.
    pub bpm: u32,
    pub bars: Vec<GpBar>,
    pub tracks: Vec<GpTrack>,
}

/// Song metadata block.
///
/// Pre-3.0 files only carry title, author and instruction; the other
/// fields stay empty.
#[derive(Debug, PartialEq, Default)]
pub struct GpHeader {
    pub title: String,
    pub subtitle: String,
    pub artist: String,
    pub album: String,
    pub author: String,
    pub copyright: String,
    pub tab_by: String,
    pub instruction: String,
    pub notices: Vec<String>,
    /// Triplet-feel flag, >= 3.0 only.
    pub shuffle: bool,
}

/// Lyrics block (>= 4.0): a track selector and five lines anchored to bars.
#[derive(Debug, PartialEq, Default)]
pub struct GpLyrics {
    pub track: u32,
    pub lines: Vec<GpLyricLine>,
}

#[derive(Debug, PartialEq, Default)]
pub struct GpLyricLine {
    pub starting_bar: u32,
    pub text: String,
}

/// One measure header plus its per-track beat lists.
#[derive(Debug, PartialEq)]
pub struct GpBar {
    /// Time signature numerator, 4 unless overridden.
    pub rhythm_numerator: u8,
    /// Time signature denominator, 4 unless overridden.
    pub rhythm_denominator: u8,
    pub repeat_open: bool,
    /// Volta count when the bar closes a repeat.
    pub repeat_close: Option<u8>,
    pub alternate_ending: Option<u8>,
    pub marker: Option<GpMarker>,
    pub key_change: Option<GpKeyChange>,
    pub double_bar: bool,
    /// Beat grid: one entry per track, filled by the data phase.
    pub tracks: Vec<GpBarTrack>,
}

impl Default for GpBar {
    fn default() -> Self {
        GpBar {
            rhythm_numerator: 4,
            rhythm_denominator: 4,
            repeat_open: false,
            repeat_close: None,
            alternate_ending: None,
            marker: None,
            key_change: None,
            double_bar: false,
            tracks: vec![],
        }
    }
}

#[derive(Debug, PartialEq, Default)]
pub struct GpBarTrack {
    pub beats: Vec<GpBeat>,
}

#[derive(Debug, PartialEq)]
pub struct GpMarker {
    pub name: String,
    pub color: Color,
}

/// Key signature change attached to a bar.
#[derive(Debug, PartialEq, Eq)]
pub struct GpKeyChange {
    pub key: u8,
    pub minor: u8,
}

/// Track descriptor.
///
/// Pre-3.0 files only populate `name` and `num_frets`; everything else
/// keeps its default.
#[derive(Debug, PartialEq, Default)]
pub struct GpTrack {
    pub name: String,
    /// MIDI program-change flag byte.
    pub program_change: bool,
    /// Open-string MIDI pitches, highest string first; at most 7.
    pub string_pitches: Vec<u32>,
    pub midi_port: u32,
    pub midi_channel: u32,
    pub midi_effect_channel: u32,
    pub num_frets: u32,
    pub capo: u32,
    pub color: Color,
}

/// One beat (chord position) inside a bar/track cell.
#[derive(Debug, PartialEq, Default)]
pub struct GpBeat {
    pub dotted: bool,
    pub rest: bool,
    /// Carries a beat text without payload in this revision of the format.
    pub has_text: bool,
    pub duration: u8,
    pub tuplet: Option<u32>,
    pub chord: Option<GpChord>,
    pub effect: Option<GpBeatEffect>,
    pub change: Option<GpMixChange>,
    /// Notes present on this beat, lowest string index first.
    pub notes: Vec<GpNote>,
}

#[derive(Debug, PartialEq, Default)]
pub struct GpChord {
    pub name: String,
    /// Set when the chord carries the full diagram payload.
    pub complete: bool,
    pub top_fret: u32,
}

/// Beat-level effect flags and payloads.
#[derive(Debug, PartialEq, Default)]
pub struct GpBeatEffect {
    pub vibrato: bool,
    pub wide_vibrato: bool,
    pub natural_harmonic: bool,
    pub artificial_harmonic: bool,
    pub fade_in: bool,
    /// Tapping / slapping / popping selector, >= 4.0 only.
    pub stroke_effect: bool,
    /// Tremolo-bar dive points, >= 4.0 layout.
    pub tremolo_bar: Option<Vec<GpBendPoint>>,
}

/// Mix-table change event (instrument, mixer values, tempo).
///
/// Each field uses a sentinel (0xFF / 0xFFFF_FFFF) on the wire for "no
/// change"; sentinels decode to `None`.
#[derive(Debug, PartialEq, Eq, Default)]
pub struct GpMixChange {
    pub instrument: Option<u8>,
    pub volume: Option<u8>,
    pub pan: Option<u8>,
    pub chorus: Option<u8>,
    pub reverb: Option<u8>,
    pub phaser: Option<u8>,
    pub tremolo: Option<u8>,
    pub tempo: Option<u32>,
}

#[derive(Debug, PartialEq, Default)]
pub struct GpNote {
    /// 1 normal, 2 tied, 3 dead; `None` when the bit is absent.
    pub kind: Option<u8>,
    /// Fret number, read together with `kind`.
    pub fret: Option<u8>,
    /// Per-note duration override; the beat duration applies otherwise.
    pub duration: Option<u8>,
    pub heavy_accent: bool,
    pub ghost: bool,
    pub accent: bool,
    /// Dynamic change (nuance) value.
    pub nuance: Option<u8>,
    pub fingering: Option<GpFingering>,
    pub effect: Option<GpNoteEffect>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct GpFingering {
    pub left_hand: u8,
    pub right_hand: u8,
}

/// Note-level effect flags and payloads.
#[derive(Debug, PartialEq, Default)]
pub struct GpNoteEffect {
    pub bend: Option<Vec<GpBendPoint>>,
    pub hammer: bool,
    pub let_ring: bool,
    pub grace: Option<GpGraceNote>,
    // second flags byte, >= 4.0 only
    pub staccato: bool,
    pub palm_mute: bool,
    pub tremolo_picking: Option<u8>,
    pub slide: Option<u8>,
    pub harmonic: Option<u8>,
    pub trill: Option<GpTrill>,
    pub vibrato: bool,
}

/// One point on a bend or tremolo-bar curve.
#[derive(Debug, PartialEq, Eq)]
pub struct GpBendPoint {
    /// Position within the beat, 0..=60.
    pub time: u32,
    /// Pitch offset in 1/25ths of a semitone.
    pub pitch: u32,
}

/// Grace note (appoggiatura) payload.
#[derive(Debug, PartialEq, Eq)]
pub struct GpGraceNote {
    pub fret: u8,
    pub transition: u8,
    pub duration: u8,
}

#[derive(Debug, PartialEq, Eq)]
pub struct GpTrill {
    pub fret: u8,
    pub period: u8,
}
