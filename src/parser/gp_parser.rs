//! Guitar Pro 2.x-4.x file parsing
//!
//! The stream is one long little-endian sequence of phases: version
//! string, header, lyrics, tempo, instrument table, bar headers, track
//! table, then the beat grid (bars x tracks). Most later phases are gated
//! on the numeric version at the 2.0 / 3.0 / 4.0 boundaries, and inside
//! beats and notes a properties byte gates which payload fields follow.
//!
//! GP4 docs at <https://dguitar.sourceforge.net/GP4format.html>

use crate::error::TabError;
use crate::parser::decode_error::{fail, DecodeErrorKind, PResult};
use crate::parser::gp_types::{
    GpBar, GpBarTrack, GpBeat, GpBeatEffect, GpBendPoint, GpChord, GpDocument, GpFingering,
    GpGraceNote, GpHeader, GpKeyChange, GpLyricLine, GpLyrics, GpMarker, GpMixChange, GpNote,
    GpNoteEffect, GpTrack, GpTrill, GpVersion,
};
use crate::parser::primitive_parser::{
    parse_fixed_string, parse_gp_color, parse_long_string, parse_short_string, parse_u32, parse_u8,
    skip,
};
use nom::error::context;
use nom::Parser;

const BAR_CUSTOM_RHYTHM_1: u8 = 0x01;
const BAR_CUSTOM_RHYTHM_2: u8 = 0x02;
const BAR_REPEAT_OPEN: u8 = 0x04;
const BAR_REPEAT_CLOSE: u8 = 0x08;
const BAR_ALT_ENDING: u8 = 0x10;
const BAR_MARKER: u8 = 0x20;
const BAR_KEY_CHANGE: u8 = 0x40;
const BAR_DOUBLE_ENDING: u8 = 0x80;

const BEAT_DOTTED: u8 = 0x01;
const BEAT_CHORD: u8 = 0x02;
const BEAT_TEXT: u8 = 0x04;
const BEAT_EFFECT: u8 = 0x08;
const BEAT_CHANGE: u8 = 0x10;
const BEAT_TUPLET: u8 = 0x20;
const BEAT_REST: u8 = 0x40;
// every beat property bit with a defined meaning
const BEAT_KNOWN_MASK: u8 = 0x7F;

const BEAT_EFFECT1_VIBRATO: u8 = 0x01;
const BEAT_EFFECT1_WIDE_VIBRATO: u8 = 0x02;
const BEAT_EFFECT1_NATURAL_HARMONIC: u8 = 0x04;
const BEAT_EFFECT1_ARTIFICIAL_HARMONIC: u8 = 0x08;
const BEAT_EFFECT1_FADE_IN: u8 = 0x10;
// bit 5 is the GP3 tremolo bar and the GP4 tapping/slapping selector
const BEAT_EFFECT1_DUAL_USE: u8 = 0x20;
const BEAT_EFFECT1_STROKE: u8 = 0x40;

const BEAT_EFFECT2_PICK_STROKE: u8 = 0x02;
const BEAT_EFFECT2_TREMOLO_BAR: u8 = 0x04;

const NOTE_SPECIAL_DURATION: u8 = 0x01;
const NOTE_HEAVY_ACCENT: u8 = 0x02;
const NOTE_GHOST: u8 = 0x04;
const NOTE_EFFECT: u8 = 0x08;
const NOTE_NUANCE: u8 = 0x10;
const NOTE_ALTERATION: u8 = 0x20;
const NOTE_ACCENT: u8 = 0x40;
const NOTE_FINGERING: u8 = 0x80;

const NOTE_EFFECT1_BEND: u8 = 0x01;
const NOTE_EFFECT1_HAMMER: u8 = 0x02;
const NOTE_EFFECT1_LET_RING: u8 = 0x08;
const NOTE_EFFECT1_GRACE: u8 = 0x10;

const NOTE_EFFECT2_STACCATO: u8 = 0x01;
const NOTE_EFFECT2_PALM_MUTE: u8 = 0x02;
const NOTE_EFFECT2_TREMOLO_PICKING: u8 = 0x04;
const NOTE_EFFECT2_SLIDE: u8 = 0x08;
const NOTE_EFFECT2_HARMONIC: u8 = 0x10;
const NOTE_EFFECT2_TRILL: u8 = 0x20;
const NOTE_EFFECT2_VIBRATO: u8 = 0x40;

const MAX_STRINGS: usize = 7;
const LEGACY_TRACK_COUNT: usize = 8;

/// Parse a complete GP byte stream into a document.
pub fn parse_gp_data(data: &[u8]) -> Result<GpDocument, TabError> {
    match parse_document(data) {
        Ok((_rest, doc)) => Ok(doc),
        Err(err) => Err(TabError::from_decode(data.len(), err)),
    }
}

fn parse_document(i: &[u8]) -> PResult<'_, GpDocument> {
    let (i, version_string) = context("gp version", parse_short_string).parse(i)?;
    let Some(version) = find_version(&version_string) else {
        return fail(i, DecodeErrorKind::UnrecognizedVersion);
    };
    log::debug!("GP version {version} ({version_string:?})");
    // the version field is padded; the pad bytes carry nothing
    let (i, ()) = skip(6)(i)?;

    let (i, header) = context("gp header", |i| parse_header(i, version)).parse(i)?;
    let (i, lyrics) = context("gp lyrics", |i| parse_lyrics(i, version)).parse(i)?;

    let (i, bpm) = parse_u32(i)?;
    log::debug!("tempo {bpm} bpm");
    let pad = if version.at_least(4) {
        5
    } else if version.at_least(3) {
        4
    } else {
        8
    };
    let (i, ()) = skip(pad)(i)?;

    let (i, ()) = context("gp instruments", |i| parse_instruments(i, version)).parse(i)?;

    let (i, num_bars) = parse_u32(i)?;
    let (i, num_tracks) = if version.at_least(3) {
        parse_u32(i)?
    } else {
        (i, LEGACY_TRACK_COUNT as u32)
    };
    log::debug!("{num_bars} bars, {num_tracks} tracks");

    let mut i = i;
    let mut bars = Vec::new();
    for _ in 0..num_bars {
        let (rest, bar) = context("gp bar", parse_bar).parse(i)?;
        bars.push(bar);
        i = rest;
    }

    let (i, tracks) = context("gp tracks", |i| {
        parse_tracks(i, version, num_tracks as usize)
    })
    .parse(i)?;
    // pre-3.0 files list 8 fixed track slots but store no beat grid
    let grid_tracks = if version.at_least(3) { tracks.len() } else { 0 };

    let mut i = i;
    for bar in &mut bars {
        for _ in 0..grid_tracks {
            let (rest, bar_track) = context("gp beats", |i| parse_bar_track(i, version)).parse(i)?;
            bar.tracks.push(bar_track);
            i = rest;
        }
    }

    let (i, ()) = skip(2)(i)?;

    let doc = GpDocument {
        version,
        version_string,
        header,
        lyrics,
        bpm,
        bars,
        tracks,
    };
    Ok((i, doc))
}

/// Extract the numeric version from the trailing digits-and-dots suffix
/// of the version string. `None` when the suffix holds no digit.
pub(crate) fn find_version(version_string: &str) -> Option<GpVersion> {
    let suffix_start = version_string
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit() || *c == '.')
        .last()
        .map_or(version_string.len(), |(pos, _)| pos);
    let suffix = version_string[suffix_start..].trim_matches('.');
    if !suffix.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    let (major, minor) = match suffix.split_once('.') {
        Some((major, minor)) => (major, minor.split('.').next().unwrap_or("")),
        None => (suffix, ""),
    };
    let major = if major.is_empty() {
        0
    } else {
        major.parse().ok()?
    };
    let minor = if minor.is_empty() {
        0
    } else {
        minor.parse().ok()?
    };
    Some(GpVersion::new(major, minor))
}

fn parse_header(i: &[u8], version: GpVersion) -> PResult<'_, GpHeader> {
    let mut header = GpHeader::default();
    if version.at_least(3) {
        let (i, title) = parse_long_string(i)?;
        let (i, subtitle) = parse_long_string(i)?;
        let (i, artist) = parse_long_string(i)?;
        let (i, album) = parse_long_string(i)?;
        let (i, author) = parse_long_string(i)?;
        let (i, copyright) = parse_long_string(i)?;
        let (i, tab_by) = parse_long_string(i)?;
        let (i, instruction) = parse_long_string(i)?;
        let (i, notice_lines) = parse_u32(i)?;
        let mut i = i;
        let mut notices = Vec::new();
        for _ in 0..notice_lines {
            let (rest, line) = parse_long_string(i)?;
            notices.push(line);
            i = rest;
        }
        let (i, shuffle) = parse_u8(i)?;
        header.title = title;
        header.subtitle = subtitle;
        header.artist = artist;
        header.album = album;
        header.author = author;
        header.copyright = copyright;
        header.tab_by = tab_by;
        header.instruction = instruction;
        header.notices = notices;
        header.shuffle = shuffle != 0;
        Ok((i, header))
    } else {
        let (i, ()) = if version.at_least(2) {
            skip(1)(i)?
        } else {
            (i, ())
        };
        let (i, title) = parse_fixed_string(100)(i)?;
        let (i, ()) = skip(1)(i)?;
        let (i, author) = parse_fixed_string(50)(i)?;
        let (i, ()) = skip(1)(i)?;
        let (i, instruction) = parse_fixed_string(100)(i)?;
        header.title = title;
        header.author = author;
        header.instruction = instruction;
        Ok((i, header))
    }
}

fn parse_lyrics(i: &[u8], version: GpVersion) -> PResult<'_, Option<GpLyrics>> {
    if !version.at_least(4) {
        return Ok((i, None));
    }
    let (i, track) = parse_u32(i)?;
    // always five lines, whether used or not
    let mut i = i;
    let mut lines = Vec::with_capacity(5);
    for _ in 0..5 {
        let (rest, starting_bar) = parse_u32(i)?;
        let (rest, text) = parse_long_string(rest)?;
        lines.push(GpLyricLine { starting_bar, text });
        i = rest;
    }
    Ok((i, Some(GpLyrics { track, lines })))
}

/// The instrument table carries no data worth keeping, but its width
/// depends on the version and must be consumed exactly.
fn parse_instruments(i: &[u8], version: GpVersion) -> PResult<'_, ()> {
    if version.at_least(3) {
        skip(64 * 12)(i)
    } else {
        let mut i = i;
        for _ in 0..8 {
            let (rest, entries) = parse_u32(i)?;
            let (rest, ()) = skip(entries as usize * 4)(rest)?;
            i = rest;
        }
        Ok((i, ()))
    }
}

fn parse_bar(i: &[u8]) -> PResult<'_, GpBar> {
    let (i, properties) = parse_u8(i)?;
    // all eight bar property bits have a defined meaning
    let mut bar = GpBar::default();
    let (i, rhythm_1) = if properties & BAR_CUSTOM_RHYTHM_1 != 0 {
        parse_u8(i)?
    } else {
        (i, 4)
    };
    let (i, rhythm_2) = if properties & BAR_CUSTOM_RHYTHM_2 != 0 {
        parse_u8(i)?
    } else {
        (i, 4)
    };
    bar.rhythm_numerator = rhythm_1;
    bar.rhythm_denominator = rhythm_2;
    bar.repeat_open = properties & BAR_REPEAT_OPEN != 0;
    bar.double_bar = properties & BAR_DOUBLE_ENDING != 0;

    let mut i = i;
    if properties & BAR_REPEAT_CLOSE != 0 {
        let (rest, volta) = parse_u8(i)?;
        bar.repeat_close = Some(volta);
        i = rest;
    }
    if properties & BAR_ALT_ENDING != 0 {
        let (rest, ending) = parse_u8(i)?;
        bar.alternate_ending = Some(ending);
        i = rest;
    }
    if properties & BAR_MARKER != 0 {
        let (rest, name) = parse_long_string(i)?;
        let (rest, color) = parse_gp_color(rest)?;
        bar.marker = Some(GpMarker { name, color });
        i = rest;
    }
    if properties & BAR_KEY_CHANGE != 0 {
        let (rest, key) = parse_u8(i)?;
        let (rest, minor) = parse_u8(rest)?;
        bar.key_change = Some(GpKeyChange { key, minor });
        i = rest;
    }
    Ok((i, bar))
}

fn parse_tracks(i: &[u8], version: GpVersion, num_tracks: usize) -> PResult<'_, Vec<GpTrack>> {
    let mut i = i;
    let mut tracks = Vec::new();
    if version.at_least(3) {
        for _ in 0..num_tracks {
            let (rest, track) = parse_track(i)?;
            log::debug!("track {:?}: {} strings", track.name, track.string_pitches.len());
            tracks.push(track);
            i = rest;
        }
    } else {
        // fixed table of 8 slots, mostly unknown bytes
        for _ in 0..LEGACY_TRACK_COUNT {
            let (rest, ()) = skip(4)(i)?;
            let (rest, num_frets) = parse_u32(rest)?;
            let (rest, ()) = skip(1)(rest)?;
            let (rest, name) = parse_fixed_string(40)(rest)?;
            let (rest, ()) = skip(1 + 5 * 4)(rest)?;
            tracks.push(GpTrack {
                name,
                num_frets,
                ..GpTrack::default()
            });
            i = rest;
        }
    }
    Ok((i, tracks))
}

fn parse_track(i: &[u8]) -> PResult<'_, GpTrack> {
    let (i, spc) = parse_u8(i)?;
    let (i, name) = parse_fixed_string(40)(i)?;
    let (i, num_strings) = parse_u32(i)?;
    if num_strings == 0 || num_strings > MAX_STRINGS as u32 {
        return fail(
            i,
            DecodeErrorKind::InvalidFieldValue {
                field: "track string count",
                value: num_strings,
            },
        );
    }
    // seven pitch slots on the wire, only the first num_strings are real
    let mut i = i;
    let mut string_pitches = Vec::with_capacity(num_strings as usize);
    for slot in 0..MAX_STRINGS {
        let (rest, pitch) = parse_u32(i)?;
        if (slot as u32) < num_strings {
            string_pitches.push(pitch);
        }
        i = rest;
    }
    let (i, midi_port) = parse_u32(i)?;
    let (i, midi_channel) = parse_u32(i)?;
    let (i, midi_effect_channel) = parse_u32(i)?;
    let (i, num_frets) = parse_u32(i)?;
    let (i, capo) = parse_u32(i)?;
    let (i, color) = parse_gp_color(i)?;
    let track = GpTrack {
        name,
        program_change: spc != 0,
        string_pitches,
        midi_port,
        midi_channel,
        midi_effect_channel,
        num_frets,
        capo,
        color,
    };
    Ok((i, track))
}

fn parse_bar_track(i: &[u8], version: GpVersion) -> PResult<'_, GpBarTrack> {
    let (i, num_beats) = parse_u32(i)?;
    let mut i = i;
    let mut beats = Vec::new();
    for _ in 0..num_beats {
        let (rest, beat) = parse_beat(i, version)?;
        beats.push(beat);
        i = rest;
    }
    Ok((i, GpBarTrack { beats }))
}

fn parse_beat(i: &[u8], version: GpVersion) -> PResult<'_, GpBeat> {
    let (i, properties) = parse_u8(i)?;
    if properties & !BEAT_KNOWN_MASK != 0 {
        return fail(i, DecodeErrorKind::UnknownBeatProperty(properties));
    }
    let mut beat = GpBeat {
        dotted: properties & BEAT_DOTTED != 0,
        rest: properties & BEAT_REST != 0,
        has_text: properties & BEAT_TEXT != 0,
        ..GpBeat::default()
    };

    let (i, ()) = if beat.rest { skip(1)(i)? } else { (i, ()) };
    let (i, duration) = parse_u8(i)?;
    beat.duration = duration;

    let mut i = i;
    if properties & BEAT_TUPLET != 0 {
        let (rest, tuplet) = parse_u32(i)?;
        beat.tuplet = Some(tuplet);
        i = rest;
    }
    if properties & BEAT_CHORD != 0 {
        let (rest, chord) = parse_chord(i, version)?;
        beat.chord = Some(chord);
        i = rest;
    }
    if properties & BEAT_EFFECT != 0 {
        let (rest, effect) = parse_beat_effect(i, version)?;
        beat.effect = Some(effect);
        i = rest;
    }
    if properties & BEAT_CHANGE != 0 {
        let (rest, change) = parse_mix_change(i, version)?;
        beat.change = Some(change);
        i = rest;
    }

    let (rest, strings_present) = parse_u8(i)?;
    i = rest;
    for string in 0..MAX_STRINGS {
        if strings_present & (1 << string) == 0 {
            continue;
        }
        let (rest, note) = parse_note(i, version)?;
        beat.notes.push(note);
        i = rest;
    }
    Ok((i, beat))
}

fn parse_chord(i: &[u8], version: GpVersion) -> PResult<'_, GpChord> {
    let (i, complete) = parse_u8(i)?;
    let complete = complete != 0;
    // the complete (diagram) layout buries the name between unknown blocks
    let (i, name) = if !complete {
        parse_long_string(i)?
    } else if version.at_least(4) {
        let (i, ()) = skip(16)(i)?;
        let (i, name) = parse_short_string(i)?;
        let (i, ()) = skip(25)(i)?;
        (i, name)
    } else {
        let (i, ()) = skip(25)(i)?;
        let (i, name) = parse_short_string(i)?;
        let (i, ()) = skip(34)(i)?;
        (i, name)
    };
    let (i, top_fret) = parse_u32(i)?;
    let (i, ()) = if top_fret == 0 {
        skip(if complete { 6 * 4 } else { 7 * 4 })(i)?
    } else {
        (i, ())
    };
    let (i, ()) = if complete { skip(32)(i)? } else { (i, ()) };
    let chord = GpChord {
        name,
        complete,
        top_fret,
    };
    Ok((i, chord))
}

fn parse_beat_effect(i: &[u8], version: GpVersion) -> PResult<'_, GpBeatEffect> {
    let (i, properties1) = parse_u8(i)?;
    let (i, properties2) = if version.at_least(4) {
        parse_u8(i)?
    } else {
        (i, 0)
    };
    let mut effect = GpBeatEffect {
        vibrato: properties1 & BEAT_EFFECT1_VIBRATO != 0,
        wide_vibrato: properties1 & BEAT_EFFECT1_WIDE_VIBRATO != 0,
        natural_harmonic: properties1 & BEAT_EFFECT1_NATURAL_HARMONIC != 0,
        artificial_harmonic: properties1 & BEAT_EFFECT1_ARTIFICIAL_HARMONIC != 0,
        fade_in: properties1 & BEAT_EFFECT1_FADE_IN != 0,
        ..GpBeatEffect::default()
    };

    let (i, ()) = if properties1 & BEAT_EFFECT1_STROKE != 0 {
        skip(2)(i)?
    } else {
        (i, ())
    };
    let (i, ()) = if properties2 & BEAT_EFFECT2_PICK_STROKE != 0 {
        skip(1)(i)?
    } else {
        (i, ())
    };
    let mut i = i;
    if properties2 & BEAT_EFFECT2_TREMOLO_BAR != 0 {
        let (rest, points) = parse_bend_points(i)?;
        effect.tremolo_bar = Some(points);
        i = rest;
    }
    // bit 5 changed meaning at 4.0
    if version.at_least(4) {
        if properties1 & BEAT_EFFECT1_DUAL_USE != 0 {
            effect.stroke_effect = true;
            let (rest, ()) = skip(1)(i)?;
            i = rest;
        }
    } else if properties1 & BEAT_EFFECT1_DUAL_USE != 0 {
        let (rest, ()) = skip(5)(i)?;
        i = rest;
    }
    Ok((i, effect))
}

/// Shared curve layout of note bends and tremolo-bar dives: a 5-byte
/// preamble, a point count, then 9 bytes per point.
fn parse_bend_points(i: &[u8]) -> PResult<'_, Vec<GpBendPoint>> {
    let (i, ()) = skip(5)(i)?;
    let (i, num_points) = parse_u32(i)?;
    let mut i = i;
    let mut points = Vec::new();
    for _ in 0..num_points {
        let (rest, time) = parse_u32(i)?;
        let (rest, pitch) = parse_u32(rest)?;
        let (rest, ()) = skip(1)(rest)?;
        points.push(GpBendPoint { time, pitch });
        i = rest;
    }
    Ok((i, points))
}

fn parse_mix_change(i: &[u8], version: GpVersion) -> PResult<'_, GpMixChange> {
    const NO_CHANGE: u8 = 0xFF;
    let (i, instrument) = parse_u8(i)?;
    let (i, volume) = parse_u8(i)?;
    let (i, pan) = parse_u8(i)?;
    let (i, chorus) = parse_u8(i)?;
    let (i, reverb) = parse_u8(i)?;
    let (i, phaser) = parse_u8(i)?;
    let (i, tremolo) = parse_u8(i)?;
    let (i, tempo) = parse_u32(i)?;
    // every applied value (instrument excluded) drags a duration byte
    let mut i = i;
    for value in [volume, pan, chorus, reverb, phaser, tremolo] {
        if value != NO_CHANGE {
            let (rest, ()) = skip(1)(i)?;
            i = rest;
        }
    }
    if tempo != u32::MAX {
        let (rest, ()) = skip(1)(i)?;
        i = rest;
    }
    let (i, ()) = if version.at_least(4) {
        skip(1)(i)?
    } else {
        (i, ())
    };
    let sentinel = |v: u8| if v == NO_CHANGE { None } else { Some(v) };
    let change = GpMixChange {
        instrument: sentinel(instrument),
        volume: sentinel(volume),
        pan: sentinel(pan),
        chorus: sentinel(chorus),
        reverb: sentinel(reverb),
        phaser: sentinel(phaser),
        tremolo: sentinel(tremolo),
        tempo: if tempo == u32::MAX { None } else { Some(tempo) },
    };
    Ok((i, change))
}

fn parse_note(i: &[u8], version: GpVersion) -> PResult<'_, GpNote> {
    let (i, properties) = parse_u8(i)?;
    // all eight note property bits have a defined meaning
    let mut note = GpNote {
        heavy_accent: properties & NOTE_HEAVY_ACCENT != 0,
        ghost: properties & NOTE_GHOST != 0,
        accent: properties & NOTE_ACCENT != 0,
        ..GpNote::default()
    };

    let mut i = i;
    if properties & NOTE_ALTERATION != 0 {
        let (rest, kind) = parse_u8(i)?;
        note.kind = Some(kind);
        i = rest;
    }
    if properties & NOTE_SPECIAL_DURATION != 0 {
        let (rest, duration) = parse_u8(i)?;
        let (rest, ()) = skip(1)(rest)?;
        note.duration = Some(duration);
        i = rest;
    }
    if properties & NOTE_NUANCE != 0 {
        let (rest, nuance) = parse_u8(i)?;
        note.nuance = Some(nuance);
        i = rest;
    }
    if properties & NOTE_ALTERATION != 0 {
        let (rest, fret) = parse_u8(i)?;
        note.fret = Some(fret);
        i = rest;
    }
    if properties & NOTE_FINGERING != 0 {
        let (rest, left_hand) = parse_u8(i)?;
        let (rest, right_hand) = parse_u8(rest)?;
        note.fingering = Some(GpFingering {
            left_hand,
            right_hand,
        });
        i = rest;
    }
    if properties & NOTE_EFFECT != 0 {
        let (rest, effect) = parse_note_effect(i, version)?;
        note.effect = Some(effect);
        i = rest;
    }
    Ok((i, note))
}

fn parse_note_effect(i: &[u8], version: GpVersion) -> PResult<'_, GpNoteEffect> {
    let (i, properties1) = parse_u8(i)?;
    let (i, properties2) = if version.at_least(4) {
        parse_u8(i)?
    } else {
        (i, 0)
    };
    let mut effect = GpNoteEffect {
        hammer: properties1 & NOTE_EFFECT1_HAMMER != 0,
        let_ring: properties1 & NOTE_EFFECT1_LET_RING != 0,
        staccato: properties2 & NOTE_EFFECT2_STACCATO != 0,
        palm_mute: properties2 & NOTE_EFFECT2_PALM_MUTE != 0,
        vibrato: properties2 & NOTE_EFFECT2_VIBRATO != 0,
        ..GpNoteEffect::default()
    };

    let mut i = i;
    if properties1 & NOTE_EFFECT1_BEND != 0 {
        let (rest, points) = parse_bend_points(i)?;
        effect.bend = Some(points);
        i = rest;
    }
    if properties1 & NOTE_EFFECT1_GRACE != 0 {
        let (rest, fret) = parse_u8(i)?;
        let (rest, ()) = skip(1)(rest)?;
        let (rest, transition) = parse_u8(rest)?;
        let (rest, duration) = parse_u8(rest)?;
        effect.grace = Some(GpGraceNote {
            fret,
            transition,
            duration,
        });
        i = rest;
    }
    if properties2 & NOTE_EFFECT2_TREMOLO_PICKING != 0 {
        let (rest, duration) = parse_u8(i)?;
        effect.tremolo_picking = Some(duration);
        i = rest;
    }
    if properties2 & NOTE_EFFECT2_SLIDE != 0 {
        let (rest, kind) = parse_u8(i)?;
        effect.slide = Some(kind);
        i = rest;
    }
    if properties2 & NOTE_EFFECT2_HARMONIC != 0 {
        let (rest, kind) = parse_u8(i)?;
        effect.harmonic = Some(kind);
        i = rest;
    }
    if properties2 & NOTE_EFFECT2_TRILL != 0 {
        let (rest, fret) = parse_u8(i)?;
        let (rest, period) = parse_u8(rest)?;
        effect.trill = Some(GpTrill { fret, period });
        i = rest;
    }
    Ok((i, effect))
}
