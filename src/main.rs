//! Escapement CLI entry point.
//!
//! Reads one channel of a 16-bit PCM WAV recording of a clock, measures its
//! beat rate and prints a summary. Convert other formats first, e.g.
//! `ffmpeg -i clock.m4a -af "volume=20dB" -c:a pcm_s16le clock.wav`.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use escapement::io::read_wav_channel;
use escapement::operations::types::{
    DEFAULT_AVERAGE_WIDTH, DEFAULT_HOLD_LENGTH, DEFAULT_PEAK_WIDTH, DEFAULT_THRESHOLD,
};
use escapement::{BeatDetector, BeatReport, DetectorConfig};

/// Show clock beats
#[derive(Parser, Debug)]
#[command(name = "escapement")]
#[command(author, version, about = "Measure the beat rate of a clock from a recording")]
struct Cli {
    /// 16-bit PCM WAV recording of the movement
    filename: PathBuf,

    /// Tick detect threshold
    #[arg(short = 't', long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: i32,

    /// Target BPH, used to centre the delta chart
    #[arg(short = 'b', long)]
    bph: Option<f64>,

    /// Audio channel number from the input stream
    #[arg(short = 'c', long, default_value_t = 0)]
    channel: usize,

    /// Peak-hold window width in samples
    #[arg(long, default_value_t = DEFAULT_PEAK_WIDTH)]
    peak_width: usize,

    /// Envelope smoothing window width in samples
    #[arg(long, default_value_t = DEFAULT_AVERAGE_WIDTH)]
    average_width: usize,

    /// Pulse hold length in samples
    #[arg(long, default_value_t = DEFAULT_HOLD_LENGTH)]
    hold_length: usize,

    /// Save the JSON report in <FILE>
    #[arg(short = 's', long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// Log every pipeline stage
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut config = DetectorConfig::new()
        .with_threshold(cli.threshold)
        .with_peak_width(cli.peak_width)
        .with_average_width(cli.average_width)
        .with_hold_length(cli.hold_length);
    if let Some(bph) = cli.bph {
        config = config.with_target_bph(bph);
    }
    let detector = BeatDetector::new(config).context("invalid detector settings")?;

    let recording = read_wav_channel(&cli.filename, cli.channel)
        .with_context(|| format!("failed to read '{}'", cli.filename.display()))?;
    let analysis = detector.analyze(&recording)?;

    let source = cli
        .filename
        .file_name()
        .map_or_else(|| cli.filename.display().to_string(), |n| n.to_string_lossy().into_owned());
    let report = BeatReport::new(source, &analysis);

    println!("{}", report.title());
    println!("{}", report.subtitle());
    if let Some(beat_error) = report.beat_error {
        println!(
            "even deltas: {:.2} ms, odd deltas: {:.2} ms, beat error: {:.2} ms",
            beat_error.mean_even * 1000.0,
            beat_error.mean_odd * 1000.0,
            beat_error.beat_error_ms
        );
    }
    if let Some(axis) = report.delta_axis {
        println!(
            "delta range: {:.4} s .. {:.4} s (centre {:.4} s)",
            axis.low, axis.high, axis.center
        );
    }

    if let Some(path) = &cli.save {
        let json = report.to_json()?;
        fs::write(path, json).with_context(|| format!("failed to write '{}'", path.display()))?;
    }

    Ok(())
}
