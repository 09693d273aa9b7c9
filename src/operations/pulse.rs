//! Threshold-and-hold pulse extraction.
//!
//! The envelope of a tick rises above the threshold, ripples, then decays.
//! A plain comparison would cross the threshold several times per tick, so
//! the detector re-arms a countdown on every crossing and stays high until
//! the countdown runs out. One physical tick yields one rectangular pulse.

use crate::{EscapementResult, ParameterError};

/// State of the hold automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoldState {
    /// No recent crossing; the detector emits 0.
    #[default]
    Idle,
    /// A crossing happened recently; the detector emits the threshold for
    /// `remaining` more steps, counting the current one.
    Holding {
        /// Steps left before returning to idle
        remaining: usize,
    },
}

/// Converts an envelope into a pulse train of `0` or `threshold`.
///
/// Each step looks only at the current envelope value and the hold state,
/// never ahead.
///
/// # Examples
///
/// ```rust
/// use escapement::operations::pulse::PulseDetector;
///
/// let mut detector = PulseDetector::new(100, 3).unwrap();
/// let out: Vec<i32> = [0.0, 150.0, 0.0, 0.0, 0.0, 0.0]
///     .into_iter()
///     .map(|v| detector.step(v))
///     .collect();
/// assert_eq!(out, vec![0, 100, 100, 100, 0, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct PulseDetector {
    threshold: i32,
    hold_length: usize,
    state: HoldState,
    retriggers: usize,
}

impl PulseDetector {
    /// Create an idle detector. Fails if `threshold` or `hold_length` is not positive.
    pub fn new(threshold: i32, hold_length: usize) -> EscapementResult<Self> {
        if threshold <= 0 {
            return Err(ParameterError::not_positive("threshold", threshold).into());
        }
        if hold_length == 0 {
            return Err(ParameterError::not_positive("hold_length", hold_length).into());
        }
        Ok(Self {
            threshold,
            hold_length,
            state: HoldState::Idle,
            retriggers: 0,
        })
    }

    /// Advance one sample.
    ///
    /// A value strictly above the threshold re-arms the hold to its full
    /// length, whether or not the detector is already holding. The step then
    /// consumes one unit of hold and emits the threshold, or emits 0 when idle.
    pub fn step(&mut self, envelope: f64) -> i32 {
        if envelope > f64::from(self.threshold) {
            if matches!(self.state, HoldState::Holding { .. }) {
                self.retriggers += 1;
            }
            self.state = HoldState::Holding {
                remaining: self.hold_length,
            };
        }

        match self.state {
            HoldState::Idle => 0,
            HoldState::Holding { remaining } => {
                self.state = if remaining > 1 {
                    HoldState::Holding {
                        remaining: remaining - 1,
                    }
                } else {
                    HoldState::Idle
                };
                self.threshold
            }
        }
    }

    /// Current automaton state.
    pub const fn state(&self) -> HoldState {
        self.state
    }

    /// Value emitted while holding.
    pub const fn threshold(&self) -> i32 {
        self.threshold
    }

    /// Full hold duration in samples.
    pub const fn hold_length(&self) -> usize {
        self.hold_length
    }

    /// Number of crossings that arrived while already holding.
    ///
    /// Envelope ripple inside one tick re-arms the hold too, so this is not a
    /// tick count; see [`merged_runs`] for the merge diagnostic.
    pub const fn retriggers(&self) -> usize {
        self.retriggers
    }

    /// Return to idle and clear counters.
    pub fn reset(&mut self) {
        self.state = HoldState::Idle;
        self.retriggers = 0;
    }
}

/// Run a whole envelope through a fresh detector.
pub fn detect_pulses(
    envelope: &[f64],
    threshold: i32,
    hold_length: usize,
) -> EscapementResult<Vec<i32>> {
    let mut detector = PulseDetector::new(threshold, hold_length)?;
    Ok(envelope.iter().map(|&v| detector.step(v)).collect())
}

/// Count pulse runs longer than `2 * hold_length` samples.
///
/// A single tick keeps re-arming the hold only while its envelope stays above
/// the threshold, so its run is `hold_length` plus that short excursion. A
/// run more than twice the hold almost always means a second tick crossed the
/// threshold before the first pulse ended and the two merged.
pub fn merged_runs(pulses: &[i32], hold_length: usize) -> usize {
    let limit = hold_length.saturating_mul(2);
    let mut merged = 0;
    let mut run = 0usize;
    for &p in pulses {
        if p > 0 {
            run += 1;
            if run == limit + 1 {
                merged += 1;
            }
        } else {
            run = 0;
        }
    }
    merged
}
