// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)] // Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_const_for_fn)] // Suggests making eligible functions `const`
#![deny(missing_docs)] // Documentation is a must for release

//! # Escapement
//!
//! Measures the rate of a mechanical clock or watch from a recording of its
//! ticking, and exposes the tic/tok timing so beat error can be inspected.
//!
//! ## Overview
//!
//! A recording of a movement is a train of short acoustic bursts, one per
//! beat. The analysis turns the raw 16-bit samples into a beat rate in five
//! stages, each a pure transformation of the previous one's output:
//!
//! 1. **Peak window**: rectify and take the maximum over the last
//!    `peak_width` samples.
//! 2. **Average window**: smooth the peak output over `average_width`
//!    samples. The result is the *envelope*.
//! 3. **Pulse detector**: whenever the envelope exceeds `threshold`, hold a
//!    pulse high for `hold_length` samples.
//! 4. **Edge finder**: record every rising edge of the pulse train.
//! 5. **Rate estimator**: beats per hour from the span of the edges, over a
//!    whole number of tic-tok pairs, plus the interval between each edge.
//!
//! Decoding the audio file, applying gain and drawing charts are left to the
//! caller. The optional `cli` feature builds a small command-line front end
//! that reads 16-bit PCM WAV files.
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! escapement = "0.1"
//! ```
//!
//! ## Features
//!
//! - `serialization`: `serde` support for configurations and reports, JSON export
//! - `parallel-processing`: evaluate the peak window across threads with `rayon`
//! - `wav`: read 16-bit PCM WAV files with `hound` ([`io::read_wav_channel`])
//! - `cli`: the `escapement` binary (implies `wav` and `serialization`)
//!
//! ## Quick Start
//!
//! ```rust
//! use escapement::{DetectorConfig, analyze, utils::generation::pulse_train};
//!
//! # fn example() -> escapement::EscapementResult<()> {
//! // Ten ticks, half a second apart, at 44.1 kHz.
//! let recording = pulse_train(44_100, 10, 22_050, 100, 20_000, 1000)?;
//! let config = DetectorConfig::new().with_hold_length(3000);
//!
//! let analysis = analyze(&recording, &config)?;
//! assert_eq!(analysis.rate().to_string(), "7200.0 BPH");
//! assert_eq!(analysis.deltas_even().len(), 5);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Error Handling
//!
//! Bad parameters are rejected before any processing with
//! [`EscapementError::Parameter`]. Failing to find beats is *not* an error:
//! the rate comes back as [`RateEstimate::NotDetected`] and the delta series
//! are empty.
//!
//! ```rust
//! use escapement::{DetectorConfig, EscapementError, analyze, utils::generation::silence};
//!
//! let recording = silence(44_100, 44_100).unwrap();
//!
//! let bad = DetectorConfig::new().with_peak_width(0);
//! assert!(matches!(analyze(&recording, &bad), Err(EscapementError::Parameter(_))));
//!
//! let analysis = analyze(&recording, &DetectorConfig::new()).unwrap();
//! assert!(!analysis.is_detected());
//! assert_eq!(analysis.rate().to_string(), "beats not detected");
//! ```
//!
//! ## Logging
//!
//! The pipeline emits `tracing` events: `debug` per stage, `info` with the
//! measured rate, `warn` when no beats were found or when pulses look like
//! merged ticks. Install any `tracing` subscriber to see them.

mod error;
#[cfg(feature = "wav")]
pub mod io;
pub mod operations;
mod repr;
pub mod utils;

pub use crate::error::{EscapementError, EscapementResult, ParameterError};
pub use crate::operations::{
    BeatAnalysis, BeatDetector, BeatErrorSummary, BeatReport, BeatTiming, DeltaAxis,
    DetectorConfig, RateEstimate, analyze,
};
pub use crate::repr::{ClockRecording, sample_times, samples_to_seconds};

// Re-export NonZero types used in the API
pub use core::num::NonZeroU32;
