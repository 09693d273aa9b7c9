//! Rising-edge detection on a pulse train.

use num_traits::Zero;

/// Indices where `pulses` goes from zero to a positive value.
///
/// The scan starts at index 1, so a train that is already high at index 0
/// contributes no edge for that first run. The result is strictly increasing.
///
/// # Examples
///
/// ```rust
/// use escapement::operations::edges::find_rising_edges;
///
/// let pulses = [0, 5, 5, 0, 0, 5, 0];
/// assert_eq!(find_rising_edges(&pulses), vec![1, 5]);
/// ```
pub fn find_rising_edges<T>(pulses: &[T]) -> Vec<usize>
where
    T: Copy + PartialOrd + Zero,
{
    pulses
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[1] > T::zero() && pair[0].is_zero())
        .map(|(i, _)| i + 1)
        .collect()
}

/// Whether enough edges were found to measure a rate.
pub const fn beats_detected(edges: &[usize]) -> bool {
    edges.len() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse_train(len: usize, starts: &[usize], width: usize, level: i32) -> Vec<i32> {
        let mut pulses = vec![0; len];
        for &start in starts {
            let end = (start + width).min(len);
            pulses[start..end].fill(level);
        }
        pulses
    }

    #[test]
    fn test_isolated_pulses() {
        let starts = [3, 40, 77, 150, 199];
        let pulses = pulse_train(220, &starts, 10, 8000);
        assert_eq!(find_rising_edges(&pulses), starts.to_vec());
    }

    #[test]
    fn test_run_at_index_zero_is_not_an_edge() {
        let pulses = pulse_train(30, &[0, 20], 5, 1);
        assert_eq!(find_rising_edges(&pulses), vec![20]);
    }

    #[test]
    fn test_one_edge_per_run() {
        // Adjacent runs separated by a single zero still count separately.
        let pulses = vec![0, 1, 1, 0, 1, 0, 0, 1, 1, 1];
        let edges = find_rising_edges(&pulses);
        assert_eq!(edges, vec![1, 4, 7]);
        assert!(edges.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(find_rising_edges::<i32>(&[]).is_empty());
        assert!(find_rising_edges(&[7]).is_empty());
        assert!(find_rising_edges(&[0; 100]).is_empty());
        assert!(find_rising_edges(&[3; 100]).is_empty());
    }

    #[test]
    fn test_works_on_float_pulses() {
        let pulses = [0.0, 0.5, 0.0, 2.0];
        assert_eq!(find_rising_edges(&pulses), vec![1, 3]);
    }

    #[test]
    fn test_beats_detected() {
        assert!(!beats_detected(&[]));
        assert!(!beats_detected(&[10]));
        assert!(beats_detected(&[10, 20]));
    }
}
