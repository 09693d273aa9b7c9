//! Presentation model for an analysis: labels, axis ranges and a summary report.
//!
//! Nothing here draws anything. A renderer takes the labels and the
//! [`DeltaAxis`] and plots the envelope, pulses and the two delta series
//! however it likes.

use std::num::NonZeroU32;

use crate::operations::pipeline::BeatAnalysis;
use crate::operations::rate::{BeatErrorSummary, RateEstimate, SECONDS_PER_HOUR};
use crate::repr::samples_to_seconds;

/// Fraction of the centre value shown above and below it on the delta axis.
pub const DELTA_AXIS_SPAN: f64 = 0.2;

/// Vertical range for the delta chart, in seconds per beat.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct DeltaAxis {
    /// Nominal beat duration the axis is centred on
    pub center: f64,
    /// Lower limit, `center * 0.8`
    pub low: f64,
    /// Upper limit, `center * 1.2`
    pub high: f64,
    /// Where to draw a dotted reference line; only set when a target rate was given
    pub reference: Option<f64>,
}

impl DeltaAxis {
    /// Axis centred on the target rate if one is given, otherwise on the
    /// measured rate. `None` when no beats were detected, in which case the
    /// delta chart has nothing to show.
    pub fn new(rate: RateEstimate, target_bph: Option<f64>) -> Option<Self> {
        let measured = rate.bph()?;
        let center = SECONDS_PER_HOUR / target_bph.unwrap_or(measured);
        Some(Self {
            center,
            low: center * (1.0 - DELTA_AXIS_SPAN),
            high: center * (1.0 + DELTA_AXIS_SPAN),
            reference: target_bph.map(|_| center),
        })
    }
}

/// Compact, renderer-facing summary of one analysis.
///
/// The full sample-indexed signals stay in [`BeatAnalysis`]; the report only
/// carries what a caption, a delta chart and a log line need.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct BeatReport {
    /// Name of the recording, usually the file name
    pub source: String,
    /// Sample rate of the recording
    pub sample_rate: u32,
    /// Length of the recording in seconds
    pub duration_seconds: f64,
    /// Detection threshold used
    pub threshold: i32,
    /// Nominal rate, if one was given
    pub target_bph: Option<f64>,
    /// Measured rate
    pub rate: RateEstimate,
    /// Number of rising edges found
    pub beats: usize,
    /// Pulses that probably swallowed more than one tick
    pub merged_pulses: usize,
    /// Even-position deltas, seconds
    pub deltas_even: Vec<f64>,
    /// Odd-position deltas, seconds
    pub deltas_odd: Vec<f64>,
    /// Half-beat means and their difference
    pub beat_error: Option<BeatErrorSummary>,
    /// Range for the delta chart
    pub delta_axis: Option<DeltaAxis>,
}

impl BeatReport {
    /// Summarise `analysis` of the recording called `source`.
    pub fn new(source: impl Into<String>, analysis: &BeatAnalysis) -> Self {
        let target_bph = analysis.config.target_bph;
        Self {
            source: source.into(),
            sample_rate: analysis.sample_rate.get(),
            duration_seconds: samples_to_seconds(analysis.rectified.len(), analysis.sample_rate),
            threshold: analysis.config.threshold,
            target_bph,
            rate: analysis.rate(),
            beats: analysis.edges.len(),
            merged_pulses: analysis.merged_pulses,
            deltas_even: analysis.deltas_even(),
            deltas_odd: analysis.deltas_odd(),
            beat_error: analysis.beat_error(),
            delta_axis: DeltaAxis::new(analysis.rate(), target_bph),
        }
    }

    /// `"<source> -- <rate>"`, e.g. `"pocketwatch.wav -- 18001.4 BPH"`.
    pub fn title(&self) -> String {
        format!("{} -- {}", self.source, self.rate)
    }

    /// Detection settings, e.g. `"threshold: 8000, target: 18000 BPH"`.
    pub fn subtitle(&self) -> String {
        let mut subtitle = format!("threshold: {}", self.threshold);
        if let Some(target) = self.target_bph {
            subtitle.push_str(&format!(", target: {target} BPH"));
        }
        subtitle
    }

    /// Sample rate as a non-zero value, for feeding back into the timing helpers.
    pub fn sample_rate(&self) -> Option<NonZeroU32> {
        NonZeroU32::new(self.sample_rate)
    }

    /// Pretty-printed JSON.
    #[cfg(feature = "serialization")]
    pub fn to_json(&self) -> crate::EscapementResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a report previously written by [`BeatReport::to_json`].
    #[cfg(feature = "serialization")]
    pub fn from_json(json: &str) -> crate::EscapementResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
