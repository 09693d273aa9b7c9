//! The in-memory recording consumed by the analysis pipeline.

use std::num::NonZeroU32;

use ndarray::{Array1, ArrayView1};

use crate::{EscapementError, EscapementResult, ParameterError};

/// A mono, 16-bit recording of a movement at a fixed sample rate.
///
/// Gain and channel selection happen before a recording is built; the
/// analysis never sees multi-channel data. The samples are immutable once
/// constructed.
///
/// # Examples
///
/// ```rust
/// use escapement::ClockRecording;
///
/// let stereo = [1i16, -1, 2, -2, 3, -3];
/// let right = ClockRecording::from_interleaved(&stereo, 2, 1, 8000).unwrap();
/// assert_eq!(right.samples().to_vec(), vec![-1, -2, -3]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClockRecording {
    samples: Array1<i16>,
    sample_rate: NonZeroU32,
}

impl ClockRecording {
    /// Wrap already-mono samples.
    pub const fn new(samples: Array1<i16>, sample_rate: NonZeroU32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Wrap a vector of mono samples, rejecting a zero sample rate.
    pub fn from_vec(samples: Vec<i16>, sample_rate: u32) -> EscapementResult<Self> {
        let sample_rate = NonZeroU32::new(sample_rate)
            .ok_or_else(|| ParameterError::not_positive("sample_rate", sample_rate))?;
        Ok(Self::new(Array1::from_vec(samples), sample_rate))
    }

    /// Pick one channel out of an interleaved (`LRLR...`) buffer.
    pub fn from_interleaved(
        interleaved: &[i16],
        channels: usize,
        channel: usize,
        sample_rate: u32,
    ) -> EscapementResult<Self> {
        if channels == 0 {
            return Err(ParameterError::not_positive("channels", channels).into());
        }
        if channel >= channels {
            return Err(ParameterError::invalid_value(
                "channel",
                format!("channel {channel} does not exist in a {channels}-channel stream"),
            )
            .into());
        }
        if interleaved.len() % channels != 0 {
            return Err(EscapementError::InterleavedLayout {
                len: interleaved.len(),
                channels,
            });
        }

        let mono = interleaved
            .iter()
            .skip(channel)
            .step_by(channels)
            .copied()
            .collect();
        Self::from_vec(mono, sample_rate)
    }

    /// View of the samples.
    pub fn samples(&self) -> ArrayView1<'_, i16> {
        self.samples.view()
    }

    /// Frames per second.
    pub const fn sample_rate(&self) -> NonZeroU32 {
        self.sample_rate
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the recording holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length of the recording in seconds.
    pub fn duration_seconds(&self) -> f64 {
        samples_to_seconds(self.len(), self.sample_rate)
    }

    /// Time of every sample in seconds, for use as a chart x-axis.
    pub fn sample_times(&self) -> Array1<f64> {
        sample_times(self.len(), self.sample_rate)
    }
}

/// Convert a sample count to seconds.
pub fn samples_to_seconds(samples: usize, sample_rate: NonZeroU32) -> f64 {
    samples as f64 / f64::from(sample_rate.get())
}

/// `i / sample_rate` for every `i` in `0..len`.
pub fn sample_times(len: usize, sample_rate: NonZeroU32) -> Array1<f64> {
    let rate = f64::from(sample_rate.get());
    Array1::from_iter((0..len).map(|i| i as f64 / rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_rejects_zero_rate() {
        assert!(matches!(
            ClockRecording::from_vec(vec![0; 4], 0),
            Err(EscapementError::Parameter(ParameterError {
                parameter: "sample_rate",
                ..
            }))
        ));
    }

    #[test]
    fn test_from_interleaved_selects_channel() {
        let data = [10i16, 20, 30, 11, 21, 31];
        let left = ClockRecording::from_interleaved(&data, 3, 0, 100).unwrap();
        let last = ClockRecording::from_interleaved(&data, 3, 2, 100).unwrap();
        assert_eq!(left.samples().to_vec(), vec![10, 11]);
        assert_eq!(last.samples().to_vec(), vec![30, 31]);
        assert_eq!(left.sample_rate().get(), 100);
    }

    #[test]
    fn test_from_interleaved_errors() {
        let data = [1i16, 2, 3, 4];
        assert!(ClockRecording::from_interleaved(&data, 0, 0, 100).is_err());
        assert!(matches!(
            ClockRecording::from_interleaved(&data, 2, 2, 100),
            Err(EscapementError::Parameter(ParameterError {
                parameter: "channel",
                ..
            }))
        ));
        assert_eq!(
            ClockRecording::from_interleaved(&data, 3, 0, 100),
            Err(EscapementError::InterleavedLayout {
                len: 4,
                channels: 3
            })
        );
    }

    #[test]
    fn test_timing_helpers() {
        let recording = ClockRecording::from_vec(vec![0; 8], 4).unwrap();
        assert_eq!(recording.len(), 8);
        assert!(!recording.is_empty());
        assert_eq!(recording.duration_seconds(), 2.0);
        assert_eq!(
            recording.sample_times().to_vec(),
            vec![0.0, 0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75]
        );
    }
}
