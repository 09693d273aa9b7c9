//! Beat detection stages and the pipeline that chains them.
//!
//! ## Module Organization
//!
//! - [`windows`] - Peak-hold and moving-average sliding windows
//! - [`pulse`] - Threshold-and-hold pulse detector
//! - [`edges`] - Rising-edge detection
//! - [`rate`] - Beats-per-hour estimate and delta series
//! - [`pipeline`] - The full analysis over a recording
//! - [`report`] - Labels, chart ranges and a serialisable summary
//! - [`types`] - Configuration
//!
//! Each stage can be used on its own:
//!
//! ```rust
//! use std::num::NonZeroU32;
//! use escapement::operations::{edges, pulse, rate, windows};
//!
//! # fn example() -> escapement::EscapementResult<()> {
//! let rectified: Vec<u16> = vec![0, 9000, 9000, 0, 0, 0, 0, 9000, 0, 0, 0];
//! let held: Vec<f64> = windows::peak_hold(&rectified, 1)?.into_iter().map(f64::from).collect();
//! let envelope = windows::moving_average(&held, 1)?;
//! let pulses = pulse::detect_pulses(&envelope, 8000, 3)?;
//! let edges = edges::find_rising_edges(&pulses);
//! assert_eq!(edges, vec![1, 7]);
//!
//! let estimate = rate::estimate_rate(&edges, NonZeroU32::new(6).unwrap());
//! assert_eq!(estimate.bph(), Some(3600.0));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod edges;
pub mod pipeline;
pub mod pulse;
pub mod rate;
pub mod report;
pub mod types;
pub mod windows;

pub use pipeline::{BeatAnalysis, BeatDetector, analyze};
pub use rate::{BeatErrorSummary, BeatTiming, RateEstimate};
pub use report::{BeatReport, DeltaAxis};
pub use types::DetectorConfig;
