//! Sliding-window stages: the peak-hold rectifier and the envelope smoother.
//!
//! Both stages keep a fixed-width FIFO of the most recent inputs, pre-filled
//! with zeros so that the first `width - 1` outputs treat missing history as
//! silence. Each stage owns its buffer and exposes one operation: push the
//! next value and read back the current aggregate.
//!
//! ## Stages
//!
//! - [`PeakWindow`]: `y[i] = max(x[i-W+1..=i])`. Scans the buffer on every
//!   push, O(W) per sample.
//! - [`MonotonicPeakWindow`]: identical output, O(1) amortized per sample by
//!   keeping a decreasing deque of candidate maxima. Prefer it for wide windows.
//! - [`AverageWindow`]: `y[i] = sum(x[i-W+1..=i]) / W`, maintained as a
//!   running sum.
//!
//! The batch helpers [`peak_hold`] and [`moving_average`] run a whole signal
//! through a fresh window and validate the width first.

use std::collections::VecDeque;

use num_traits::Zero;

use crate::{EscapementResult, ParameterError};

/// A streaming aggregate over the last `width` inputs.
pub trait SlidingWindow {
    /// Value pushed into the window
    type Input: Copy;
    /// Aggregate produced after each push
    type Output;

    /// Push the next input and return the aggregate of the window ending at it.
    fn push(&mut self, value: Self::Input) -> Self::Output;

    /// Number of inputs covered by the window.
    fn width(&self) -> usize;

    /// Forget all history, returning to the zero-padded start state.
    fn reset(&mut self);
}

fn check_width(parameter: &'static str, width: usize) -> EscapementResult<()> {
    if width == 0 {
        return Err(ParameterError::not_positive(parameter, width).into());
    }
    Ok(())
}

/// Windowed maximum over the last `width` values, scanning the buffer on each push.
#[derive(Debug, Clone)]
pub struct PeakWindow<T> {
    buffer: VecDeque<T>,
    width: usize,
}

impl<T: Copy + PartialOrd + Zero> PeakWindow<T> {
    /// Create a zero-filled window. Fails if `width` is 0.
    pub fn new(width: usize) -> EscapementResult<Self> {
        check_width("peak_width", width)?;
        let mut buffer = VecDeque::with_capacity(width);
        buffer.resize(width, T::zero());
        Ok(Self { buffer, width })
    }
}

impl<T: Copy + PartialOrd + Zero> SlidingWindow for PeakWindow<T> {
    type Input = T;
    type Output = T;

    fn push(&mut self, value: T) -> T {
        self.buffer.pop_front();
        self.buffer.push_back(value);
        self.buffer
            .iter()
            .copied()
            .fold(self.buffer[0], |best, v| if v > best { v } else { best })
    }

    fn width(&self) -> usize {
        self.width
    }

    fn reset(&mut self) {
        self.buffer.iter_mut().for_each(|v| *v = T::zero());
    }
}

/// Windowed maximum with O(1) amortized cost per push.
///
/// Holds `(position, value)` pairs in decreasing value order; anything that
/// can never again be the maximum is discarded on insertion.
#[derive(Debug, Clone)]
pub struct MonotonicPeakWindow<T> {
    candidates: VecDeque<(usize, T)>,
    width: usize,
    position: usize,
}

impl<T: Copy + PartialOrd + Zero> MonotonicPeakWindow<T> {
    /// Create an empty window. Fails if `width` is 0.
    pub fn new(width: usize) -> EscapementResult<Self> {
        check_width("peak_width", width)?;
        Ok(Self {
            candidates: VecDeque::with_capacity(width),
            width,
            position: 0,
        })
    }
}

impl<T: Copy + PartialOrd + Zero> SlidingWindow for MonotonicPeakWindow<T> {
    type Input = T;
    type Output = T;

    fn push(&mut self, value: T) -> T {
        while self.candidates.back().is_some_and(|&(_, v)| v <= value) {
            self.candidates.pop_back();
        }
        self.candidates.push_back((self.position, value));

        while self
            .candidates
            .front()
            .is_some_and(|&(pos, _)| pos + self.width <= self.position)
        {
            self.candidates.pop_front();
        }

        let padded = self.position + 1 < self.width;
        self.position += 1;

        // The back was just pushed, so the deque is never empty here.
        let max = self.candidates.front().map_or(value, |&(_, v)| v);
        if padded && T::zero() > max {
            T::zero()
        } else {
            max
        }
    }

    fn width(&self) -> usize {
        self.width
    }

    fn reset(&mut self) {
        self.candidates.clear();
        self.position = 0;
    }
}

/// Windowed arithmetic mean over the last `width` values.
///
/// The divisor is always `width`, including while the zero padding is still
/// inside the window.
#[derive(Debug, Clone)]
pub struct AverageWindow {
    buffer: VecDeque<f64>,
    width: usize,
    sum: f64,
}

impl AverageWindow {
    /// Create a zero-filled window. Fails if `width` is 0.
    pub fn new(width: usize) -> EscapementResult<Self> {
        check_width("average_width", width)?;
        let mut buffer = VecDeque::with_capacity(width);
        buffer.resize(width, 0.0);
        Ok(Self {
            buffer,
            width,
            sum: 0.0,
        })
    }
}

impl SlidingWindow for AverageWindow {
    type Input = f64;
    type Output = f64;

    fn push(&mut self, value: f64) -> f64 {
        // Sums of integer-valued inputs stay exact in f64, so the running sum does not drift.
        if let Some(oldest) = self.buffer.pop_front() {
            self.sum -= oldest;
        }
        self.buffer.push_back(value);
        self.sum += value;
        self.sum / self.width as f64
    }

    fn width(&self) -> usize {
        self.width
    }

    fn reset(&mut self) {
        self.buffer.iter_mut().for_each(|v| *v = 0.0);
        self.sum = 0.0;
    }
}

/// Run every value of `values` through `window`, collecting one output per input.
pub fn run_window<W, I>(window: &mut W, values: I) -> Vec<W::Output>
where
    W: SlidingWindow,
    I: IntoIterator<Item = W::Input>,
{
    values.into_iter().map(|v| window.push(v)).collect()
}

/// Windowed maximum of `values` with left zero padding.
///
/// With the `parallel-processing` feature the windows are evaluated
/// independently across threads; the result is identical to the sequential
/// path.
///
/// # Examples
///
/// ```rust
/// use escapement::operations::windows::peak_hold;
///
/// let held = peak_hold(&[3u16, 1, 0, 0, 2], 2).unwrap();
/// assert_eq!(held, vec![3, 3, 1, 0, 2]);
/// ```
pub fn peak_hold<T>(values: &[T], width: usize) -> EscapementResult<Vec<T>>
where
    T: Copy + PartialOrd + Zero + Send + Sync,
{
    check_width("peak_width", width)?;

    #[cfg(feature = "parallel-processing")]
    {
        use rayon::prelude::*;

        Ok((0..values.len())
            .into_par_iter()
            .map(|i| {
                let start = (i + 1).saturating_sub(width);
                let init = if i + 1 < width { T::zero() } else { values[start] };
                values[start..=i]
                    .iter()
                    .copied()
                    .fold(init, |best, v| if v > best { v } else { best })
            })
            .collect())
    }

    #[cfg(not(feature = "parallel-processing"))]
    {
        let mut window = MonotonicPeakWindow::new(width)?;
        Ok(run_window(&mut window, values.iter().copied()))
    }
}

/// Windowed mean of `values` with left zero padding.
///
/// # Examples
///
/// ```rust
/// use escapement::operations::windows::moving_average;
///
/// let smoothed = moving_average(&[4.0, 4.0, 0.0], 2).unwrap();
/// assert_eq!(smoothed, vec![2.0, 4.0, 2.0]);
/// ```
pub fn moving_average(values: &[f64], width: usize) -> EscapementResult<Vec<f64>> {
    let mut window = AverageWindow::new(width)?;
    Ok(run_window(&mut window, values.iter().copied()))
}
