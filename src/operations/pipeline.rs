//! The full analysis: rectify → peak-hold → smooth → pulse → edges → rate.
//!
//! Every stage runs to completion over the whole recording before the next
//! starts. Nothing is shared between stages except the data passed forward.

use std::num::NonZeroU32;

use ndarray::Array1;
use tracing::{debug, info, warn};

use crate::operations::edges::find_rising_edges;
use crate::operations::pulse::{detect_pulses, merged_runs};
use crate::operations::rate::{BeatErrorSummary, BeatTiming, RateEstimate};
use crate::operations::types::DetectorConfig;
use crate::operations::windows::{moving_average, peak_hold};
use crate::{ClockRecording, EscapementResult};

/// Everything the pipeline derives from one recording.
///
/// All sample-indexed signals have the same length as the input.
#[derive(Debug, Clone, PartialEq)]
pub struct BeatAnalysis {
    /// Configuration the analysis ran with
    pub config: DetectorConfig,
    /// Sample rate of the analysed recording
    pub sample_rate: NonZeroU32,
    /// Absolute value of every input sample
    pub rectified: Array1<u16>,
    /// Mean of the last `average_width` peak-held values
    pub envelope: Array1<f64>,
    /// `threshold` while a tick is held, 0 otherwise
    pub pulses: Array1<i32>,
    /// Sample index of every rising pulse edge
    pub edges: Vec<usize>,
    /// Rate and per-interval deltas
    pub timing: BeatTiming,
    /// Pulses long enough that two ticks were probably merged
    pub merged_pulses: usize,
}

impl BeatAnalysis {
    /// The measured rate, or [`RateEstimate::NotDetected`].
    pub const fn rate(&self) -> RateEstimate {
        self.timing.rate
    }

    /// Whether at least two beats were found.
    pub const fn is_detected(&self) -> bool {
        self.timing.rate.is_detected()
    }

    /// Seconds between consecutive edges.
    pub fn deltas(&self) -> &[f64] {
        &self.timing.deltas
    }

    /// First, third, fifth... delta.
    pub fn deltas_even(&self) -> Vec<f64> {
        self.timing.deltas_even()
    }

    /// Second, fourth, sixth... delta.
    pub fn deltas_odd(&self) -> Vec<f64> {
        self.timing.deltas_odd()
    }

    /// Mean half-beat durations and their difference, when both series exist.
    pub fn beat_error(&self) -> Option<BeatErrorSummary> {
        self.timing.beat_error()
    }
}

/// A validated configuration ready to analyse recordings.
///
/// # Examples
///
/// ```rust
/// use escapement::{BeatDetector, DetectorConfig, utils::generation::pulse_train};
///
/// let recording = pulse_train(44_100, 10, 6300, 100, 20_000, 1000).unwrap();
/// let detector = BeatDetector::new(DetectorConfig::new().with_hold_length(3000)).unwrap();
/// let analysis = detector.analyze(&recording).unwrap();
///
/// let bph = analysis.rate().bph().unwrap();
/// assert!((bph - 25_200.0).abs() < 1.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BeatDetector {
    config: DetectorConfig,
}

impl BeatDetector {
    /// Validate `config` up front so that analysis cannot fail on parameters.
    pub fn new(config: DetectorConfig) -> EscapementResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub const fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Analyse a recording.
    pub fn analyze(&self, recording: &ClockRecording) -> EscapementResult<BeatAnalysis> {
        let rectified: Vec<u16> = recording.samples().iter().map(|s| s.unsigned_abs()).collect();
        self.analyze_rectified(rectified, recording.sample_rate())
    }

    /// Analyse a bare slice of mono samples.
    pub fn analyze_samples(
        &self,
        samples: &[i16],
        sample_rate: NonZeroU32,
    ) -> EscapementResult<BeatAnalysis> {
        let rectified: Vec<u16> = samples.iter().map(|s| s.unsigned_abs()).collect();
        self.analyze_rectified(rectified, sample_rate)
    }

    fn analyze_rectified(
        &self,
        rectified: Vec<u16>,
        sample_rate: NonZeroU32,
    ) -> EscapementResult<BeatAnalysis> {
        let config = self.config;
        debug!(
            samples = rectified.len(),
            sample_rate = sample_rate.get(),
            threshold = config.threshold,
            peak_width = config.peak_width,
            average_width = config.average_width,
            hold_length = config.hold_length,
            "starting beat analysis"
        );

        let held: Vec<f64> = peak_hold(&rectified, config.peak_width)?
            .into_iter()
            .map(f64::from)
            .collect();
        let envelope = moving_average(&held, config.average_width)?;
        let pulses = detect_pulses(&envelope, config.threshold, config.hold_length)?;
        let edges = find_rising_edges(&pulses);
        debug!(edges = edges.len(), "pulse edges found");

        let merged_pulses = merged_runs(&pulses, config.hold_length);
        if merged_pulses > 0 {
            warn!(
                merged_pulses,
                hold_length = config.hold_length,
                "pulses longer than twice the hold length; consecutive ticks may have merged, \
                 consider a shorter hold"
            );
        }

        let timing = BeatTiming::from_edges(&edges, sample_rate);
        match timing.rate {
            RateEstimate::Detected { bph } => {
                info!(bph, beats = edges.len(), "beat rate measured")
            }
            RateEstimate::NotDetected => {
                warn!(
                    edges = edges.len(),
                    threshold = config.threshold,
                    "beats not detected"
                )
            }
        }

        Ok(BeatAnalysis {
            config,
            sample_rate,
            rectified: Array1::from_vec(rectified),
            envelope: Array1::from_vec(envelope),
            pulses: Array1::from_vec(pulses),
            edges,
            timing,
            merged_pulses,
        })
    }
}

/// Validate `config` and analyse `recording` in one call.
pub fn analyze(
    recording: &ClockRecording,
    config: &DetectorConfig,
) -> EscapementResult<BeatAnalysis> {
    BeatDetector::new(*config)?.analyze(recording)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::generation::{alternating_pulse_train, pulse_train, ringing_ticks, silence};
    use crate::{EscapementError, ParameterError};

    fn scenario_config() -> DetectorConfig {
        DetectorConfig::new()
            .with_threshold(8000)
            .with_peak_width(10)
            .with_average_width(30)
            .with_hold_length(3000)
    }

    #[test]
    fn test_synthetic_6300_sample_period() {
        // 6300 samples between ticks at 44.1 kHz is 1/7 s per beat.
        let recording = pulse_train(44_100, 10, 6300, 100, 20_000, 1000).unwrap();
        let analysis = analyze(&recording, &scenario_config()).unwrap();

        assert_eq!(analysis.envelope.len(), recording.len());
        assert_eq!(analysis.pulses.len(), recording.len());
        assert_eq!(analysis.rectified.len(), recording.len());
        assert_eq!(analysis.edges.len(), 10);
        assert_eq!(analysis.merged_pulses, 0);

        let bph = analysis.rate().bph().unwrap();
        let expected = 3600.0 * 44_100.0 / 6300.0;
        assert!(((bph - expected) / expected).abs() < 0.01, "bph = {bph}");

        assert_eq!(analysis.deltas().len(), 9);
        assert_eq!(analysis.deltas_even().len(), 5);
        assert_eq!(analysis.deltas_odd().len(), 4);
        for &delta in analysis.deltas() {
            assert!((delta - 6300.0 / 44_100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_synthetic_half_second_beat() {
        // 22050 samples per beat at 44.1 kHz is 7200 BPH.
        let recording = pulse_train(44_100, 10, 22_050, 100, 20_000, 1000).unwrap();
        let analysis = analyze(&recording, &scenario_config()).unwrap();

        assert_eq!(analysis.edges.len(), 10);
        let bph = analysis.rate().bph().unwrap();
        assert!(((bph - 7200.0) / 7200.0).abs() < 0.01, "bph = {bph}");
        assert_eq!(analysis.rate().to_string(), "7200.0 BPH");
    }

    #[test]
    fn test_out_of_beat_movement() {
        // 11 ticks: tic 8000 samples, tok 8400 samples.
        let recording = alternating_pulse_train(44_100, 11, 8000, 8400, 100, 20_000, 1000).unwrap();
        let analysis = analyze(&recording, &scenario_config()).unwrap();

        assert_eq!(analysis.edges.len(), 11);
        // The odd count drops the last edge: nine intervals, five tics and four toks.
        let span = 5.0 * 8000.0 + 4.0 * 8400.0;
        let expected = 3600.0 / ((span / 9.0) / 44_100.0);
        let bph = analysis.rate().bph().unwrap();
        assert!((bph - expected).abs() < 1e-6, "bph = {bph}, expected {expected}");

        assert_eq!(analysis.deltas_even(), vec![8000.0 / 44_100.0; 5]);
        assert_eq!(analysis.deltas_odd(), vec![8400.0 / 44_100.0; 5]);
        let beat_error = analysis.beat_error().unwrap();
        assert!((beat_error.beat_error_ms - 400.0 / 44.1).abs() < 1e-6);
    }

    #[test]
    fn test_ringing_ticks_at_18000_bph() {
        let recording = ringing_ticks(44_100, 12, 8820, 300.0, 3000.0, 20_000, 500).unwrap();
        let config = DetectorConfig::for_movement(44_100, 18_000.0).unwrap();
        let analysis = analyze(&recording, &config).unwrap();

        assert_eq!(analysis.edges.len(), 12);
        assert_eq!(analysis.merged_pulses, 0);
        let bph = analysis.rate().bph().unwrap();
        assert!((bph - 18_000.0).abs() < 0.01, "bph = {bph}");
    }

    #[test]
    fn test_all_zero_input_is_not_detected() {
        let recording = silence(44_100, 44_100).unwrap();
        let analysis = analyze(&recording, &DetectorConfig::new()).unwrap();

        assert_eq!(analysis.rate(), RateEstimate::NotDetected);
        assert!(!analysis.is_detected());
        assert!(analysis.edges.is_empty());
        assert!(analysis.deltas().is_empty());
        assert!(analysis.deltas_even().is_empty());
        assert!(analysis.deltas_odd().is_empty());
        assert!(analysis.pulses.iter().all(|&p| p == 0));
        assert!(analysis.envelope.iter().all(|&e| e == 0.0));
    }

    #[test]
    fn test_single_tick_is_not_detected() {
        let recording = pulse_train(44_100, 1, 6300, 100, 20_000, 500).unwrap();
        let analysis = analyze(&recording, &scenario_config()).unwrap();
        assert_eq!(analysis.edges.len(), 1);
        assert_eq!(analysis.rate(), RateEstimate::NotDetected);
        assert!(analysis.deltas().is_empty());
    }

    #[test]
    fn test_pulse_values_are_zero_or_threshold() {
        let recording = pulse_train(44_100, 4, 6300, 100, 20_000, 1000).unwrap();
        let config = scenario_config().with_threshold(5000);
        let analysis = analyze(&recording, &config).unwrap();
        assert!(analysis.pulses.iter().all(|&p| p == 0 || p == 5000));
    }

    #[test]
    fn test_edges_lag_ticks_by_envelope_rise() {
        // At t + k the 30-sample average holds k + 1 samples of 20000, which
        // first exceeds 8000 at k = 12.
        let recording = pulse_train(44_100, 3, 6300, 100, 20_000, 1000).unwrap();
        let analysis = analyze(&recording, &scenario_config()).unwrap();
        assert_eq!(analysis.edges, vec![1012, 7312, 13_612]);
    }

    #[test]
    fn test_long_hold_merges_ticks() {
        // A hold longer than the beat interval keeps the pulse high across ticks.
        let recording = pulse_train(44_100, 10, 6300, 100, 20_000, 1000).unwrap();
        let config = scenario_config().with_hold_length(10_000);
        let analysis = analyze(&recording, &config).unwrap();
        assert_eq!(analysis.edges.len(), 1);
        assert_eq!(analysis.merged_pulses, 1);
        assert!(!analysis.is_detected());
    }

    #[test]
    fn test_negative_ticks_are_rectified() {
        let positive = pulse_train(44_100, 6, 6300, 100, 20_000, 1000).unwrap();
        let negative_samples: Vec<i16> = positive.samples().iter().map(|&s| -s).collect();
        let detector = BeatDetector::new(scenario_config()).unwrap();

        let a = detector.analyze(&positive).unwrap();
        let b = detector
            .analyze_samples(&negative_samples, positive.sample_rate())
            .unwrap();
        assert_eq!(a.edges, b.edges);
        assert_eq!(a.rate(), b.rate());
    }

    #[test]
    fn test_invalid_config_fails_before_processing() {
        let recording = silence(100, 8000).unwrap();
        let err = analyze(&recording, &DetectorConfig::new().with_average_width(0)).unwrap_err();
        assert!(matches!(
            err,
            EscapementError::Parameter(ParameterError {
                parameter: "average_width",
                ..
            })
        ));
        assert!(BeatDetector::new(DetectorConfig::new().with_threshold(0)).is_err());
    }

    #[test]
    fn test_empty_recording() {
        let detector = BeatDetector::new(DetectorConfig::new()).unwrap();
        let rate = NonZeroU32::new(44_100).unwrap();
        let analysis = detector.analyze_samples(&[], rate).unwrap();
        assert!(analysis.envelope.is_empty());
        assert_eq!(analysis.rate(), RateEstimate::NotDetected);
    }
}
