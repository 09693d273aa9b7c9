//! Rate estimation from edge spacing.
//!
//! An escapement alternates two mechanically distinct impulses, tic and tok,
//! whose durations generally differ. Averaging over an odd number of
//! intervals would weight one of them more than the other, so the rate is
//! always taken over a whole number of tic-tok pairs: when the edge count is
//! odd the last edge is dropped.
//!
//! The rate is the total span divided by the number of intervals, not the
//! mean of the individual deltas:
//!
//! ```text
//! bph = 3600 / (((last - first) / (count - 1)) / sample_rate)
//! ```
//!
//! The per-interval deltas are kept for display and are always computed from
//! the full, uncorrected edge list.

use std::fmt;
use std::num::NonZeroU32;

use tracing::debug;

use crate::operations::edges::beats_detected;

/// Seconds in one hour.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Measured rate of the movement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "status", rename_all = "snake_case")
)]
pub enum RateEstimate {
    /// At least two edges were found.
    Detected {
        /// Beats per hour
        bph: f64,
    },
    /// Fewer than two edges were found; there is nothing to measure.
    NotDetected,
}

impl RateEstimate {
    /// Beats per hour, if detected.
    pub const fn bph(&self) -> Option<f64> {
        match self {
            RateEstimate::Detected { bph } => Some(*bph),
            RateEstimate::NotDetected => None,
        }
    }

    /// Whether a rate was measured.
    pub const fn is_detected(&self) -> bool {
        matches!(self, RateEstimate::Detected { .. })
    }

    /// Duration of one beat in seconds, if detected.
    pub fn seconds_per_beat(&self) -> Option<f64> {
        self.bph().map(|bph| SECONDS_PER_HOUR / bph)
    }
}

impl fmt::Display for RateEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateEstimate::Detected { bph } => write!(f, "{bph:.1} BPH"),
            RateEstimate::NotDetected => f.write_str("beats not detected"),
        }
    }
}

/// Seconds between consecutive edges.
///
/// Returns `edges.len() - 1` values, or nothing for fewer than two edges.
pub fn edge_deltas(edges: &[usize], sample_rate: NonZeroU32) -> Vec<f64> {
    let rate = f64::from(sample_rate.get());
    edges
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) as f64 / rate)
        .collect()
}

/// The edge list with its last element dropped when the count is odd.
pub fn parity_corrected(edges: &[usize]) -> &[usize] {
    if edges.len() % 2 == 1 {
        &edges[..edges.len() - 1]
    } else {
        edges
    }
}

/// Beats per hour over the parity-corrected span of `edges`.
///
/// # Examples
///
/// ```rust
/// use std::num::NonZeroU32;
/// use escapement::{RateEstimate, operations::rate::estimate_rate};
///
/// let rate = NonZeroU32::new(44_100).unwrap();
/// assert_eq!(estimate_rate(&[1000, 45_100], rate), RateEstimate::Detected { bph: 3600.0 });
/// assert_eq!(estimate_rate(&[1000], rate), RateEstimate::NotDetected);
/// ```
pub fn estimate_rate(edges: &[usize], sample_rate: NonZeroU32) -> RateEstimate {
    if !beats_detected(edges) {
        return RateEstimate::NotDetected;
    }

    // An odd count of at least 3 leaves at least 2 edges after correction.
    let used = parity_corrected(edges);
    let (first, last) = (used[0], used[used.len() - 1]);
    let intervals = (used.len() - 1) as f64;
    let seconds_per_beat = ((last - first) as f64 / intervals) / f64::from(sample_rate.get());
    let bph = SECONDS_PER_HOUR / seconds_per_beat;

    debug!(
        edges = edges.len(),
        used = used.len(),
        seconds_per_beat,
        bph,
        "estimated rate"
    );

    RateEstimate::Detected { bph }
}

/// Split deltas into the two alternating half-beat series.
///
/// The first series holds deltas 0, 2, 4, ... and the second 1, 3, 5, ...
/// Which of them is tic→tok depends on which impulse was heard first.
pub fn split_interleaved(deltas: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let even = deltas.iter().copied().step_by(2).collect();
    let odd = deltas.iter().copied().skip(1).step_by(2).collect();
    (even, odd)
}

/// Rate estimate together with the per-interval timing used to inspect it.
#[derive(Debug, Clone, PartialEq)]
pub struct BeatTiming {
    /// Parity-corrected rate
    pub rate: RateEstimate,
    /// Seconds between consecutive edges, uncorrected
    pub deltas: Vec<f64>,
}

impl BeatTiming {
    /// Compute rate and deltas from an edge list.
    ///
    /// With fewer than two edges the rate is [`RateEstimate::NotDetected`]
    /// and the delta list is empty.
    pub fn from_edges(edges: &[usize], sample_rate: NonZeroU32) -> Self {
        Self {
            rate: estimate_rate(edges, sample_rate),
            deltas: edge_deltas(edges, sample_rate),
        }
    }

    /// Deltas at even positions (first, third, ...).
    pub fn deltas_even(&self) -> Vec<f64> {
        self.deltas.iter().copied().step_by(2).collect()
    }

    /// Deltas at odd positions (second, fourth, ...).
    pub fn deltas_odd(&self) -> Vec<f64> {
        self.deltas.iter().copied().skip(1).step_by(2).collect()
    }

    /// Mean of each half-beat series and their difference.
    pub fn beat_error(&self) -> Option<BeatErrorSummary> {
        BeatErrorSummary::from_deltas(&self.deltas)
    }
}

/// Average duration of the two alternating half-beats.
///
/// A well-adjusted escapement ("in beat") has equal means; the difference is
/// the beat error.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct BeatErrorSummary {
    /// Mean of the even-position deltas, seconds
    pub mean_even: f64,
    /// Mean of the odd-position deltas, seconds
    pub mean_odd: f64,
    /// `|mean_even - mean_odd|` in milliseconds
    pub beat_error_ms: f64,
}

impl BeatErrorSummary {
    /// Summarise interleaved deltas. Needs at least one delta in each series.
    pub fn from_deltas(deltas: &[f64]) -> Option<Self> {
        let (even, odd) = split_interleaved(deltas);
        let mean_even = mean(&even)?;
        let mean_odd = mean(&odd)?;
        Some(Self {
            mean_even,
            mean_odd,
            beat_error_ms: (mean_even - mean_odd).abs() * 1000.0,
        })
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
