use fragmap_core::config::PaddingConfig;
use fragmap_core::models::{GenomicInterval, ReadSpan};

///
/// Groups the reads of one chromosome into candidate precursor regions.
///
/// ```text
/// chr1
/// .....read.............................READ............
/// .......read...........................................
/// .........read..............................READ........
///   [------------]                   [-------------]
/// ```
///
/// Reads are merged while the gap to the current envelope is at most
/// `left_padding + right_padding`; every emitted region is the merged
/// envelope widened by the padding (clamped at position 0).
///
#[derive(Debug, Clone)]
pub struct RegionSegmenter {
    left_padding: u32,
    right_padding: u32,
}

impl RegionSegmenter {
    pub fn new(left_padding: u32, right_padding: u32) -> Self {
        RegionSegmenter {
            left_padding,
            right_padding,
        }
    }

    pub fn from_config(config: &PaddingConfig) -> Self {
        RegionSegmenter::new(config.left_padding, config.right_padding)
    }

    fn merge_distance(&self) -> u32 {
        self.left_padding.saturating_add(self.right_padding)
    }

    ///
    /// Lazily segment position-sorted spans of `chrom`.
    ///
    pub fn segments<I>(&self, chrom: &str, spans: I) -> Segments<I::IntoIter>
    where
        I: IntoIterator<Item = ReadSpan>,
    {
        Segments {
            segmenter: self.clone(),
            chrom: chrom.to_string(),
            spans: spans.into_iter(),
            envelope: None,
        }
    }

    pub fn segment<I>(&self, chrom: &str, spans: I) -> Vec<GenomicInterval>
    where
        I: IntoIterator<Item = ReadSpan>,
    {
        self.segments(chrom, spans).collect()
    }

    fn pad(&self, chrom: &str, lo: u32, hi: u32) -> GenomicInterval {
        let start = lo.saturating_sub(self.left_padding);
        let end = hi.saturating_add(self.right_padding);
        GenomicInterval::covering(chrom, start, end)
    }
}

/// Iterator over the candidate regions of one chromosome.
pub struct Segments<I> {
    segmenter: RegionSegmenter,
    chrom: String,
    spans: I,
    envelope: Option<(u32, u32)>,
}

impl<I> Iterator for Segments<I>
where
    I: Iterator<Item = ReadSpan>,
{
    type Item = GenomicInterval;

    fn next(&mut self) -> Option<Self::Item> {
        for span in self.spans.by_ref() {
            match self.envelope {
                None => self.envelope = Some((span.start, span.end)),
                Some((lo, hi)) => {
                    if span.start.saturating_sub(hi) <= self.segmenter.merge_distance() {
                        self.envelope = Some((lo.min(span.start), hi.max(span.end)));
                    } else {
                        self.envelope = Some((span.start, span.end));
                        return Some(self.segmenter.pad(&self.chrom, lo, hi));
                    }
                }
            }
        }

        self.envelope
            .take()
            .map(|(lo, hi)| self.segmenter.pad(&self.chrom, lo, hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn spans(bounds: &[(u32, u32)]) -> Vec<ReadSpan> {
        bounds
            .iter()
            .map(|(start, end)| ReadSpan {
                start: *start,
                end: *end,
            })
            .collect()
    }

    fn bounds(regions: &[GenomicInterval]) -> Vec<(u32, u32)> {
        regions.iter().map(|r| (r.start(), r.end())).collect()
    }

    #[rstest]
    fn test_no_reads_no_regions() {
        let regions = RegionSegmenter::new(3, 3).segment("chr1", Vec::<ReadSpan>::new());
        assert!(regions.is_empty());
    }

    #[rstest]
    fn test_single_cluster_is_padded() {
        let regions = RegionSegmenter::new(3, 3).segment("chr1", spans(&[(100, 120), (102, 125)]));
        assert_eq!(bounds(&regions), vec![(97, 128)]);
        assert_eq!(regions[0].chrom(), "chr1");
    }

    #[rstest]
    #[case(131, vec![(97, 154)])]
    #[case(132, vec![(97, 128), (129, 154)])]
    fn test_merge_distance_is_inclusive(#[case] next_start: u32, #[case] expected: Vec<(u32, u32)>) {
        // envelope ends at 125; padding 3 + 3 merges gaps of up to 6
        let regions = RegionSegmenter::new(3, 3).segment(
            "chr1",
            spans(&[(100, 120), (102, 125), (next_start, 151)]),
        );
        assert_eq!(bounds(&regions), expected);
    }

    #[rstest]
    fn test_contained_reads_do_not_split() {
        let regions = RegionSegmenter::new(0, 0).segment(
            "chr1",
            spans(&[(10, 50), (20, 30), (40, 45), (49, 60)]),
        );
        assert_eq!(bounds(&regions), vec![(10, 60)]);
    }

    #[rstest]
    fn test_slightly_out_of_order_start_widens_the_envelope() {
        // a read whose first aligned base follows a leading deletion is
        // ordered by its alignment start, not by its envelope start
        let regions = RegionSegmenter::new(0, 0).segment("chr1", spans(&[(10, 20), (8, 30), (30, 40)]));
        assert_eq!(bounds(&regions), vec![(8, 40)]);
    }

    #[rstest]
    fn test_padding_clamps_at_zero() {
        let regions = RegionSegmenter::new(10, 2).segment("chr1", spans(&[(4, 20)]));
        assert_eq!(bounds(&regions), vec![(0, 22)]);
    }

    #[rstest]
    fn test_asymmetric_padding() {
        let regions = RegionSegmenter::new(5, 1).segment("chr1", spans(&[(50, 60)]));
        assert_eq!(bounds(&regions), vec![(45, 61)]);
    }

    #[rstest]
    fn test_every_span_lies_in_exactly_one_region() {
        let reads = spans(&[
            (5, 25),
            (8, 30),
            (45, 70),
            (200, 222),
            (210, 230),
            (240, 260),
            (900, 920),
        ]);
        let regions = RegionSegmenter::new(4, 4).segment("chr1", reads.clone());

        for read in &reads {
            let hits = regions
                .iter()
                .filter(|r| r.start() <= read.start && r.end() >= read.end)
                .count();
            assert_eq!(hits, 1);
        }
    }

    #[rstest]
    fn test_segments_are_lazy() {
        let segmenter = RegionSegmenter::new(1, 1);
        let mut segments = segmenter.segments("chr2", spans(&[(10, 20), (100, 110), (300, 310)]));

        assert_eq!(segments.next().map(|r| (r.start(), r.end())), Some((9, 21)));
        assert_eq!(segments.next().map(|r| (r.start(), r.end())), Some((99, 111)));
        assert_eq!(segments.next().map(|r| (r.start(), r.end())), Some((299, 311)));
        assert_eq!(segments.next(), None);
    }
}
