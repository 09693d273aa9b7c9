//! Synthetic escapement recordings.
//!
//! These generators produce deterministic [`ClockRecording`]s with known tick
//! positions, for tests, benchmarks and demos.
//!
//! - [`pulse_train`] places identical rectangular ticks at a fixed period.
//! - [`alternating_pulse_train`] alternates two intervals, modelling an
//!   escapement that is out of beat.
//! - [`ringing_ticks`] shapes each tick as a decaying tone, closer to what a
//!   microphone picks up from a real movement.
//! - [`silence`] is all zeros.
//!
//! Every generated recording has `offset` samples of silence before the first
//! tick and one full interval after the last tick starts.

use std::f64::consts::PI;

use crate::{ClockRecording, EscapementResult, ParameterError};

fn check_positive(parameter: &'static str, value: usize) -> EscapementResult<()> {
    if value == 0 {
        return Err(ParameterError::not_positive(parameter, value).into());
    }
    Ok(())
}

/// Tick start indices for `count` ticks whose spacing cycles through `intervals`.
fn tick_starts(count: usize, intervals: &[usize], offset: usize) -> Vec<usize> {
    let mut starts = Vec::with_capacity(count);
    let mut position = offset;
    for k in 0..count {
        starts.push(position);
        position += intervals[k % intervals.len()];
    }
    starts
}

fn rectangular(
    sample_rate: u32,
    count: usize,
    intervals: &[usize],
    width: usize,
    amplitude: i16,
    offset: usize,
) -> EscapementResult<ClockRecording> {
    check_positive("width", width)?;
    for &interval in intervals {
        check_positive("interval", interval)?;
        if width > interval {
            return Err(ParameterError::invalid_value(
                "width",
                format!("tick width {width} exceeds the interval {interval}"),
            )
            .into());
        }
    }

    let starts = tick_starts(count, intervals, offset);
    let len = offset + (0..count).map(|k| intervals[k % intervals.len()]).sum::<usize>();
    let mut samples = vec![0i16; len];
    for start in starts {
        samples[start..start + width].fill(amplitude);
    }
    ClockRecording::from_vec(samples, sample_rate)
}

/// `count` rectangular ticks of `width` samples at `amplitude`, one every `period` samples.
///
/// The first tick starts at `offset`; the recording is
/// `offset + count * period` samples long.
///
/// # Examples
///
/// ```rust
/// use escapement::utils::generation::pulse_train;
///
/// let recording = pulse_train(1000, 3, 50, 5, 100, 10).unwrap();
/// assert_eq!(recording.len(), 160);
/// assert_eq!(recording.samples()[60], 100);
/// ```
pub fn pulse_train(
    sample_rate: u32,
    count: usize,
    period: usize,
    width: usize,
    amplitude: i16,
    offset: usize,
) -> EscapementResult<ClockRecording> {
    check_positive("period", period)?;
    rectangular(sample_rate, count, &[period], width, amplitude, offset)
}

/// Rectangular ticks whose spacing alternates `tic`, `tok`, `tic`, ...
///
/// The rate of such a movement is `7200 * sample_rate / (tic + tok)` BPH,
/// and its beat error is `|tic - tok| / sample_rate` seconds.
pub fn alternating_pulse_train(
    sample_rate: u32,
    count: usize,
    tic: usize,
    tok: usize,
    width: usize,
    amplitude: i16,
    offset: usize,
) -> EscapementResult<ClockRecording> {
    check_positive("tic", tic)?;
    check_positive("tok", tok)?;
    rectangular(sample_rate, count, &[tic, tok], width, amplitude, offset)
}

/// Ticks shaped as an exponentially decaying tone.
///
/// Each tick is `amplitude * exp(-n / decay) * sin(2π f n / sample_rate)`
/// for `n` in `0..period`, restarting every `period` samples. The envelope
/// decays to about 37% after `decay` samples.
pub fn ringing_ticks(
    sample_rate: u32,
    count: usize,
    period: usize,
    decay: f64,
    tone_hz: f64,
    amplitude: i16,
    offset: usize,
) -> EscapementResult<ClockRecording> {
    check_positive("period", period)?;
    if sample_rate == 0 {
        return Err(ParameterError::not_positive("sample_rate", sample_rate).into());
    }
    if !decay.is_finite() || decay <= 0.0 {
        return Err(ParameterError::invalid_value(
            "decay",
            format!("must be a finite length greater than 0, got {decay}"),
        )
        .into());
    }

    let rate = f64::from(sample_rate);
    let tick: Vec<i16> = (0..period)
        .map(|n| {
            let n = n as f64;
            let envelope = (-n / decay).exp();
            let value = f64::from(amplitude) * envelope * (2.0 * PI * tone_hz * n / rate).sin();
            // |value| <= |amplitude|, so the cast cannot saturate.
            value.round() as i16
        })
        .collect();

    let mut samples = vec![0i16; offset];
    samples.reserve(count * period);
    for _ in 0..count {
        samples.extend_from_slice(&tick);
    }
    ClockRecording::from_vec(samples, sample_rate)
}

/// `len` zero samples.
pub fn silence(len: usize, sample_rate: u32) -> EscapementResult<ClockRecording> {
    ClockRecording::from_vec(vec![0; len], sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_train_layout() {
        let recording = pulse_train(100, 3, 10, 2, 7, 5).unwrap();
        let samples = recording.samples().to_vec();
        assert_eq!(samples.len(), 35);
        let expected_high = [5, 6, 15, 16, 25, 26];
        for (i, &s) in samples.iter().enumerate() {
            assert_eq!(s, if expected_high.contains(&i) { 7 } else { 0 }, "index {i}");
        }
    }

    #[test]
    fn test_alternating_layout() {
        let recording = alternating_pulse_train(100, 4, 10, 20, 1, 9, 0).unwrap();
        let samples = recording.samples().to_vec();
        assert_eq!(samples.len(), 60);
        let high: Vec<usize> = samples
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s != 0)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(high, vec![0, 10, 30, 40]);
    }

    #[test]
    fn test_invalid_shapes() {
        assert!(pulse_train(100, 3, 0, 1, 1, 0).is_err());
        assert!(pulse_train(100, 3, 10, 0, 1, 0).is_err());
        assert!(pulse_train(100, 3, 10, 11, 1, 0).is_err());
        assert!(pulse_train(0, 3, 10, 1, 1, 0).is_err());
        assert!(alternating_pulse_train(100, 3, 10, 0, 1, 1, 0).is_err());
        assert!(ringing_ticks(100, 3, 10, 0.0, 50.0, 1, 0).is_err());
    }

    #[test]
    fn test_ringing_ticks_decay() {
        let recording = ringing_ticks(44_100, 2, 4410, 200.0, 3000.0, 20_000, 100).unwrap();
        assert_eq!(recording.len(), 100 + 2 * 4410);
        let samples = recording.samples();
        assert!(samples.iter().take(100).all(|&s| s == 0));

        let early = samples.iter().skip(100).take(50).map(|s| s.unsigned_abs()).max();
        let late = samples
            .iter()
            .skip(100 + 3000)
            .take(50)
            .map(|s| s.unsigned_abs())
            .max();
        assert!(early.unwrap() > 10_000);
        assert_eq!(late, Some(0));
    }

    #[test]
    fn test_silence() {
        let recording = silence(10, 8000).unwrap();
        assert_eq!(recording.len(), 10);
        assert!(recording.samples().iter().all(|&s| s == 0));
        assert!(silence(10, 0).is_err());
    }
}
