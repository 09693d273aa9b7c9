//! Supporting configuration types for the beat detection pipeline.

use crate::{EscapementResult, ParameterError};

/// Default envelope amplitude that counts as a tick.
pub const DEFAULT_THRESHOLD: i32 = 8000;
/// Default width of the peak-hold window, in samples.
pub const DEFAULT_PEAK_WIDTH: usize = 10;
/// Default width of the smoothing window, in samples.
pub const DEFAULT_AVERAGE_WIDTH: usize = 30;
/// Default pulse hold duration, in samples.
pub const DEFAULT_HOLD_LENGTH: usize = 10_000;

/// Parameters for the rectify → envelope → pulse → edge → rate pipeline.
///
/// Every stage receives its parameters from this value rather than from any
/// shared state, so a stage is fully determined by its inputs and its config.
/// Use [`DetectorConfig::validate`] (or any constructor that calls it) to
/// reject bad settings before touching the samples.
///
/// # Examples
///
/// ```rust
/// use escapement::DetectorConfig;
///
/// let config = DetectorConfig::new()
///     .with_threshold(6000)
///     .with_hold_length(3000)
///     .with_target_bph(18000.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DetectorConfig {
    /// Envelope amplitude above which a tick is registered. Pulses are emitted at this value.
    pub threshold: i32,
    /// Width of the windowed-maximum rectifier, in samples
    pub peak_width: usize,
    /// Width of the windowed-mean smoother applied to the peak output, in samples
    pub average_width: usize,
    /// Number of samples a pulse stays high after the last threshold crossing.
    ///
    /// Must exceed the envelope decay of a single tick but stay below the
    /// shortest interval between ticks, otherwise consecutive ticks merge.
    pub hold_length: usize,
    /// Nominal rate of the movement. Only used to place the reference line
    /// and centre the delta axis; it never influences the measurement.
    pub target_bph: Option<f64>,
}

impl DetectorConfig {
    /// Create a configuration with the reference defaults
    /// (threshold 8000, windows 10/30, hold 10000 samples, no target).
    pub const fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            peak_width: DEFAULT_PEAK_WIDTH,
            average_width: DEFAULT_AVERAGE_WIDTH,
            hold_length: DEFAULT_HOLD_LENGTH,
            target_bph: None,
        }
    }

    /// Create a configuration whose hold length is derived from the expected
    /// rate of the movement instead of the fixed reference value.
    ///
    /// The hold is set to half of the nominal beat interval, which bridges the
    /// envelope tail of one tick without reaching the next one. The expected
    /// rate is also recorded as the target.
    pub fn for_movement(sample_rate: u32, expected_bph: f64) -> EscapementResult<Self> {
        let hold_length = hold_length_for(sample_rate, expected_bph)?;
        let config = Self::new()
            .with_hold_length(hold_length)
            .with_target_bph(expected_bph);
        config.validate()?;
        Ok(config)
    }

    /// Set the detection threshold.
    pub const fn with_threshold(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the peak-hold window width.
    pub const fn with_peak_width(mut self, width: usize) -> Self {
        self.peak_width = width;
        self
    }

    /// Set the smoothing window width.
    pub const fn with_average_width(mut self, width: usize) -> Self {
        self.average_width = width;
        self
    }

    /// Set the pulse hold length.
    pub const fn with_hold_length(mut self, hold_length: usize) -> Self {
        self.hold_length = hold_length;
        self
    }

    /// Set the nominal rate used for display.
    pub const fn with_target_bph(mut self, bph: f64) -> Self {
        self.target_bph = Some(bph);
        self
    }

    /// Check every parameter, returning the first violation found.
    pub fn validate(&self) -> EscapementResult<()> {
        if self.threshold <= 0 {
            return Err(ParameterError::not_positive("threshold", self.threshold).into());
        }
        if self.peak_width == 0 {
            return Err(ParameterError::not_positive("peak_width", self.peak_width).into());
        }
        if self.average_width == 0 {
            return Err(ParameterError::not_positive("average_width", self.average_width).into());
        }
        if self.hold_length == 0 {
            return Err(ParameterError::not_positive("hold_length", self.hold_length).into());
        }
        if let Some(bph) = self.target_bph {
            if !bph.is_finite() || bph <= 0.0 {
                return Err(ParameterError::invalid_value(
                    "target_bph",
                    format!("must be a finite rate greater than 0, got {bph}"),
                )
                .into());
            }
        }
        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Hold length, in samples, covering half of one nominal beat interval.
pub fn hold_length_for(sample_rate: u32, expected_bph: f64) -> EscapementResult<usize> {
    if sample_rate == 0 {
        return Err(ParameterError::not_positive("sample_rate", sample_rate).into());
    }
    if !expected_bph.is_finite() || expected_bph <= 0.0 {
        return Err(ParameterError::invalid_value(
            "expected_bph",
            format!("must be a finite rate greater than 0, got {expected_bph}"),
        )
        .into());
    }

    let beat_samples = f64::from(sample_rate) * 3600.0 / expected_bph;
    let half = (beat_samples / 2.0).floor();
    // A rate so high that a beat is shorter than two samples still needs a hold of one.
    Ok(num_traits::cast::<f64, usize>(half).unwrap_or(0).max(1))
}
