use std::cmp::Reverse;
use std::collections::BinaryHeap;

use fragmap_core::config::PeakConfig;
use fragmap_core::errors::{FragmapError, Result};

/// A local maximum of a boundary density array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub offset: usize,
    pub count: u32,
    pub avg_length: f64,
}

///
/// Greedy peak picker over a start or end density array.
///
/// The highest remaining position is taken as a peak, then everything
/// within `suppression_window` of it is excluded from further picks. This
/// repeats until the best remaining position falls below `min_count`.
///
#[derive(Debug, Clone)]
pub struct PeakDetector {
    min_count: u32,
    suppression_window: usize,
}

impl PeakDetector {
    pub fn new(min_count: u32, suppression_window: usize) -> Self {
        PeakDetector {
            // a zero threshold would let empty positions seed peaks
            min_count: min_count.max(1),
            suppression_window,
        }
    }

    pub fn from_config(config: &PeakConfig) -> Self {
        PeakDetector::new(config.min_count, config.suppression_window)
    }

    ///
    /// Pick peaks from `counts`, returned strongest first (count descending,
    /// ties resolved by ascending offset).
    ///
    /// Each peak reports the original count at its offset and the mean read
    /// length stored for that offset in `avg_length`.
    ///
    pub fn detect(&self, counts: &[u32], avg_length: &[f64]) -> Result<Vec<Peak>> {
        if counts.len() != avg_length.len() {
            return Err(FragmapError::ContractViolation(format!(
                "count array has {} positions but length array has {}",
                counts.len(),
                avg_length.len()
            )));
        }

        // max-heap on count, then on the smallest offset. Suppression only ever
        // zeroes positions, so stale entries can simply be skipped when popped.
        let mut heap: BinaryHeap<(u32, Reverse<usize>)> = counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count >= self.min_count)
            .map(|(offset, count)| (*count, Reverse(offset)))
            .collect();

        let mut suppressed = vec![false; counts.len()];
        let mut peaks = Vec::new();

        while let Some((count, Reverse(offset))) = heap.pop() {
            if suppressed[offset] {
                continue;
            }

            peaks.push(Peak {
                offset,
                count,
                avg_length: avg_length[offset],
            });

            let lo = offset.saturating_sub(self.suppression_window);
            let hi = offset
                .saturating_add(self.suppression_window)
                .min(counts.len() - 1);
            suppressed[lo..=hi].fill(true);
        }

        Ok(peaks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn offsets(peaks: &[Peak]) -> Vec<usize> {
        peaks.iter().map(|p| p.offset).collect()
    }

    #[rstest]
    fn test_all_zero_array_has_no_peaks() {
        let detector = PeakDetector::new(1, 2);
        let peaks = detector.detect(&[0; 20], &[0.0; 20]).unwrap();
        assert!(peaks.is_empty());
    }

    #[rstest]
    fn test_empty_array_has_no_peaks() {
        let detector = PeakDetector::new(1, 2);
        assert!(detector.detect(&[], &[]).unwrap().is_empty());
    }

    #[rstest]
    fn test_start_peaks_of_worked_example() {
        let counts = [0, 2, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0];
        let mut lengths = [0.0; 14];
        lengths[1] = 6.0;
        lengths[7] = 6.0;

        let peaks = PeakDetector::new(1, 0).detect(&counts, &lengths).unwrap();

        assert_eq!(
            peaks,
            vec![
                Peak {
                    offset: 1,
                    count: 2,
                    avg_length: 6.0
                },
                Peak {
                    offset: 7,
                    count: 1,
                    avg_length: 6.0
                },
            ]
        );
    }

    #[rstest]
    fn test_ties_resolve_left_to_right() {
        let counts = [3, 0, 5, 0, 5, 0, 3];
        let peaks = PeakDetector::new(1, 0).detect(&counts, &[0.0; 7]).unwrap();
        assert_eq!(offsets(&peaks), vec![2, 4, 0, 6]);
    }

    #[rstest]
    fn test_min_count_stops_detection() {
        let counts = [4, 0, 0, 2, 0, 0, 3];
        let peaks = PeakDetector::new(3, 0).detect(&counts, &[0.0; 7]).unwrap();
        assert_eq!(offsets(&peaks), vec![0, 6]);
    }

    #[rstest]
    fn test_suppression_keeps_original_counts() {
        let counts = [1, 4, 6, 4, 1, 0, 0, 0, 2, 3];
        let peaks = PeakDetector::new(1, 2).detect(&counts, &[0.0; 10]).unwrap();

        assert_eq!(offsets(&peaks), vec![2, 9]);
        for peak in &peaks {
            assert_eq!(peak.count, counts[peak.offset]);
        }
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(5)]
    fn test_no_two_peaks_within_window(#[case] window: usize) {
        let counts = [
            3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5, 8, 9, 7, 9, 3, 2, 3, 8, 4, 6, 2, 6, 4, 3,
        ];
        let lengths = vec![0.0; counts.len()];
        let peaks = PeakDetector::new(1, window)
            .detect(&counts, &lengths)
            .unwrap();

        for (i, a) in peaks.iter().enumerate() {
            for b in peaks.iter().skip(i + 1) {
                assert!(a.offset.abs_diff(b.offset) > window);
            }
        }
    }

    #[rstest]
    fn test_zero_window_keeps_adjacent_maxima() {
        let counts = [0, 5, 5, 0];
        let peaks = PeakDetector::new(1, 0).detect(&counts, &[0.0; 4]).unwrap();
        assert_eq!(offsets(&peaks), vec![1, 2]);
    }

    #[rstest]
    fn test_mismatched_arrays_violate_contract() {
        let result = PeakDetector::new(1, 0).detect(&[1, 2, 3], &[0.0; 2]);
        assert!(matches!(result, Err(FragmapError::ContractViolation(_))));
    }
}
