use clap::Parser;
use std::fmt::Write as _;
use std::path::PathBuf;
use tabrip::{
    parse_gp_data, parse_ptb_data, GpDocument, PtbClassification, PtbDocument, TabError,
};

fn main() {
    let result = main_result();
    std::process::exit(match result {
        Ok(()) => 0,
        Err(err) => {
            // use Display instead of Debug for user friendly error messages
            log::error!("{err}");
            1
        }
    });
}

fn main_result() -> Result<(), TabError> {
    let args = CliArgs::parse();

    // setup logging
    let default_filter = if args.verbose {
        "tabrip=debug"
    } else if args.quiet {
        "tabrip=error"
    } else {
        "tabrip=info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let input_file = PathBuf::from(&args.input_file);
    if !input_file.exists() {
        return Err(TabError::Io(format!("file not found {input_file:?}")));
    }
    let file_data = std::fs::read(&input_file)?;
    log::info!("Decoding {:?} ({} bytes)", input_file, file_data.len());

    // PTB files start with a magic word; everything else goes through
    // the GP reader, which validates its own version string
    let summary = if file_data.starts_with(b"ptab") {
        let doc = parse_ptb_data(&file_data)?;
        summarize_ptb(&doc)
    } else {
        let doc = parse_gp_data(&file_data)?;
        summarize_gp(&doc)
    };

    match &args.output {
        Some(output) => std::fs::write(output, summary)?,
        None => print!("{summary}"),
    }
    Ok(())
}

fn summarize_gp(doc: &GpDocument) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Guitar Pro file, version {}", doc.version);
    let _ = writeln!(out, "Title: {}", doc.header.title);
    let _ = writeln!(out, "Artist: {}", doc.header.artist);
    let _ = writeln!(out, "Album: {}", doc.header.album);
    let _ = writeln!(out, "Author: {}", doc.header.author);
    let _ = writeln!(out, "Tempo: {} bpm", doc.bpm);
    let _ = writeln!(out, "Bars: {}", doc.bars.len());
    let _ = writeln!(out, "Tracks: {}", doc.tracks.len());
    for (index, track) in doc.tracks.iter().enumerate() {
        let beats: usize = doc
            .bars
            .iter()
            .filter_map(|bar| bar.tracks.get(index))
            .map(|bar_track| bar_track.beats.len())
            .sum();
        let _ = writeln!(
            out,
            "  track {}: {:?}, {} strings, {} frets, {} beats",
            index + 1,
            track.name,
            track.string_pitches.len(),
            track.num_frets,
            beats
        );
    }
    out
}

fn summarize_ptb(doc: &PtbDocument) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "PowerTab file, format version {}", doc.header.version);
    match &doc.header.classification {
        PtbClassification::Song(song) => {
            let _ = writeln!(out, "Song: {}", song.title);
            let _ = writeln!(out, "Artist: {}", song.artist);
            let _ = writeln!(out, "Music by: {}", song.music_by);
            let _ = writeln!(out, "Copyright: {}", song.copyright);
        }
        PtbClassification::Lesson(lesson) => {
            let _ = writeln!(out, "Lesson: {}", lesson.title);
            let _ = writeln!(out, "Author: {}", lesson.author);
            let _ = writeln!(out, "Level: {}", lesson.level);
        }
    }
    for (slot, instrument) in doc.instruments.iter().enumerate() {
        let name = if slot == 0 { "guitar score" } else { "bass score" };
        let _ = writeln!(out, "{name}:");
        for guitar in &instrument.guitars {
            let _ = writeln!(
                out,
                "  guitar {}: {:?}, {} strings, midi program {}",
                guitar.index + 1,
                guitar.title,
                guitar.tuning.len(),
                guitar.midi_program
            );
        }
        let staves: usize = instrument
            .sections
            .iter()
            .map(|section| section.staves.len())
            .sum();
        let positions: usize = instrument
            .sections
            .iter()
            .flat_map(|section| &section.staves)
            .map(|staff| staff.high_melody.len() + staff.low_melody.len())
            .sum();
        let _ = writeln!(
            out,
            "  {} sections, {} staves, {} positions, {} chord diagrams, {} tempo markers",
            instrument.sections.len(),
            staves,
            positions,
            instrument.chord_diagrams.len(),
            instrument.tempo_markers.len()
        );
    }
    out
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct CliArgs {
    /// Tablature file to decode (.gp3, .gp4 or .ptb).
    input_file: String,
    /// Write the summary to this file instead of stdout.
    #[arg(short, long)]
    output: Option<String>,
    /// Only log errors.
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
    /// Enable decode tracing.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}
