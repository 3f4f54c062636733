use std::collections::BTreeMap;

use fragmap_core::errors::{FragmapError, Result};
use fragmap_core::models::{GenomicInterval, ReadSpan};

///
/// Per-position read boundary densities of one precursor region.
///
/// `start_counts[i]` is the number of reads whose first aligned base falls
/// at offset `i` of the region, `start_avg_length[i]` the mean full length
/// of those reads (0.0 when there are none). The end arrays hold the same
/// for the last aligned base.
///
/// Reads lying completely inside the region are additionally tallied per
/// `(start offset, end offset)` pair, which is what fragment read support is
/// counted from.
///
#[derive(Debug, Clone, PartialEq)]
pub struct PositionProfile {
    start_counts: Vec<u32>,
    end_counts: Vec<u32>,
    start_avg_length: Vec<f64>,
    end_avg_length: Vec<f64>,
    envelopes: BTreeMap<(usize, usize), u32>,
}

impl PositionProfile {
    /// An all-zero profile of `len` positions.
    pub fn new(len: usize) -> Self {
        PositionProfile {
            start_counts: vec![0; len],
            end_counts: vec![0; len],
            start_avg_length: vec![0.0; len],
            end_avg_length: vec![0.0; len],
            envelopes: BTreeMap::new(),
        }
    }

    ///
    /// Pile up read spans over a region.
    ///
    /// Spans may stick out of the region: only the boundary that falls
    /// inside it is recorded.
    ///
    pub fn from_spans<'a, I>(region: &GenomicInterval, spans: I) -> Self
    where
        I: IntoIterator<Item = &'a ReadSpan>,
    {
        let mut profile = PositionProfile::new(region.len());
        for span in spans {
            profile.add_span(region.start(), span);
        }
        profile
    }

    ///
    /// Build a profile from precomputed arrays. No read envelopes are known
    /// in that case, so fragments called on it report zero total reads.
    ///
    pub fn from_arrays(
        start_counts: Vec<u32>,
        end_counts: Vec<u32>,
        start_avg_length: Vec<f64>,
        end_avg_length: Vec<f64>,
    ) -> Result<Self> {
        let len = start_counts.len();
        if end_counts.len() != len || start_avg_length.len() != len || end_avg_length.len() != len
        {
            return Err(FragmapError::ContractViolation(format!(
                "profile arrays differ in length: {} / {} / {} / {}",
                len,
                end_counts.len(),
                start_avg_length.len(),
                end_avg_length.len()
            )));
        }

        Ok(PositionProfile {
            start_counts,
            end_counts,
            start_avg_length,
            end_avg_length,
            envelopes: BTreeMap::new(),
        })
    }

    ///
    /// Fold one read into the profile of a region starting at `region_start`.
    ///
    pub fn add_span(&mut self, region_start: u32, span: &ReadSpan) {
        let length = span.len() as f64;
        let start = self.offset_of(region_start, span.start);
        let end = self.offset_of(region_start, span.end);

        if let Some(i) = start {
            self.start_counts[i] += 1;
            self.start_avg_length[i] +=
                (length - self.start_avg_length[i]) / self.start_counts[i] as f64;
        }

        if let Some(i) = end {
            self.end_counts[i] += 1;
            self.end_avg_length[i] += (length - self.end_avg_length[i]) / self.end_counts[i] as f64;
        }

        if let (Some(s), Some(e)) = (start, end) {
            *self.envelopes.entry((s, e)).or_insert(0) += 1;
        }
    }

    fn offset_of(&self, region_start: u32, position: u32) -> Option<usize> {
        position
            .checked_sub(region_start)
            .map(|offset| offset as usize)
            .filter(|offset| *offset < self.len())
    }

    pub fn len(&self) -> usize {
        self.start_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.start_counts.is_empty()
    }

    pub fn start_counts(&self) -> &[u32] {
        &self.start_counts
    }

    pub fn end_counts(&self) -> &[u32] {
        &self.end_counts
    }

    pub fn start_avg_length(&self) -> &[f64] {
        &self.start_avg_length
    }

    pub fn end_avg_length(&self) -> &[f64] {
        &self.end_avg_length
    }

    ///
    /// Number of reads lying completely within offsets `[start, end]`.
    ///
    pub fn reads_within(&self, start: usize, end: usize) -> u32 {
        self.envelopes
            .range((start, start)..=(end, end))
            .filter(|((_, e), _)| *e <= end)
            .map(|(_, count)| *count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn region() -> GenomicInterval {
        GenomicInterval::new("chr1", 0, 13).unwrap()
    }

    #[fixture]
    fn spans() -> Vec<ReadSpan> {
        vec![
            ReadSpan { start: 1, end: 6 },
            ReadSpan { start: 1, end: 6 },
            ReadSpan { start: 7, end: 12 },
        ]
    }

    #[rstest]
    fn test_profile_counts(region: GenomicInterval, spans: Vec<ReadSpan>) {
        let profile = PositionProfile::from_spans(&region, &spans);

        assert_eq!(profile.len(), 14);
        assert_eq!(
            profile.start_counts(),
            &[0, 2, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            profile.end_counts(),
            &[0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 1, 0]
        );
        assert_eq!(profile.start_avg_length()[1], 6.0);
        assert_eq!(profile.start_avg_length()[7], 6.0);
        assert_eq!(profile.end_avg_length()[6], 6.0);
        assert_eq!(profile.end_avg_length()[12], 6.0);
        assert_eq!(profile.start_avg_length()[0], 0.0);
    }

    #[rstest]
    fn test_running_mean_of_lengths(region: GenomicInterval) {
        let spans = vec![
            ReadSpan { start: 2, end: 5 },
            ReadSpan { start: 2, end: 9 },
            ReadSpan { start: 2, end: 11 },
        ];
        let profile = PositionProfile::from_spans(&region, &spans);

        assert_eq!(profile.start_counts()[2], 3);
        assert!((profile.start_avg_length()[2] - 22.0 / 3.0).abs() < 1e-9);
    }

    #[rstest]
    fn test_spans_sticking_out_only_count_inner_boundary() {
        let region = GenomicInterval::new("chr1", 10, 19).unwrap();
        let spans = vec![
            ReadSpan { start: 5, end: 12 },
            ReadSpan { start: 18, end: 30 },
        ];
        let profile = PositionProfile::from_spans(&region, &spans);

        assert_eq!(profile.start_counts().iter().sum::<u32>(), 1);
        assert_eq!(profile.end_counts().iter().sum::<u32>(), 1);
        assert_eq!(profile.end_counts()[2], 1);
        assert_eq!(profile.end_avg_length()[2], 8.0);
        assert_eq!(profile.start_counts()[8], 1);
        assert_eq!(profile.reads_within(0, 9), 0);
    }

    #[rstest]
    fn test_reads_within(region: GenomicInterval, spans: Vec<ReadSpan>) {
        let profile = PositionProfile::from_spans(&region, &spans);

        assert_eq!(profile.reads_within(1, 6), 2);
        assert_eq!(profile.reads_within(7, 12), 1);
        assert_eq!(profile.reads_within(0, 13), 3);
        assert_eq!(profile.reads_within(1, 5), 0);
        assert_eq!(profile.reads_within(2, 12), 1);
    }

    #[rstest]
    fn test_from_arrays_rejects_mismatched_lengths() {
        let result = PositionProfile::from_arrays(vec![0; 4], vec![0; 3], vec![0.0; 4], vec![0.0; 4]);
        assert!(matches!(result, Err(FragmapError::ContractViolation(_))));
    }
}
