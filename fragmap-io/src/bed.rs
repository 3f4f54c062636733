use std::io::BufRead;
use std::path::Path;

use fxhash::FxHashMap;

use fragmap_core::errors::{FragmapError, Result};
use fragmap_core::models::{GenomicInterval, ReadSpan};
use fragmap_core::traits::AlignmentSpanSource;
use fragmap_core::utils::{is_header_line, parse_bedlike_line};

use crate::open_reader;

///
/// Read spans held in memory, grouped by chromosome.
///
/// Useful for tests and for pre-extracted read envelopes stored as BED
/// (`.bed` or `.bed.gz`, one read per line, 0-based half-open).
///
#[derive(Debug, Default, Clone)]
pub struct MemorySpanSource {
    names: Vec<String>,
    spans: FxHashMap<String, Vec<ReadSpan>>,
    sorted: bool,
}

impl MemorySpanSource {
    pub fn new() -> Self {
        MemorySpanSource::default()
    }

    ///
    /// Build a source from `(chrom, span)` pairs in any order.
    ///
    pub fn from_spans<I, S>(spans: I) -> Self
    where
        I: IntoIterator<Item = (S, ReadSpan)>,
        S: Into<String>,
    {
        let mut source = MemorySpanSource::new();
        for (chrom, span) in spans {
            source.push(chrom, span);
        }
        source
    }

    ///
    /// Load read envelopes from a BED file.
    ///
    /// # Arguments
    /// - path: path to a `.bed` or `.bed.gz` file
    ///
    pub fn from_bed<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = open_reader(path)?;

        let mut source = MemorySpanSource::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if is_header_line(&line) {
                continue;
            }

            let parse_error = |reason: &str| FragmapError::ParseError {
                path: path.display().to_string(),
                line: i + 1,
                reason: reason.to_string(),
            };

            let (chrom, start, end) =
                parse_bedlike_line(&line).ok_or_else(|| parse_error("expected chrom, start and end"))?;

            // half-open to inclusive
            let span = end
                .checked_sub(1)
                .ok_or(FragmapError::MalformedSpan { start, end })
                .and_then(|last| ReadSpan::new(start, last))
                .map_err(|e| parse_error(&e.to_string()))?;

            source.push(chrom, span);
        }

        log::debug!(
            "Loaded {} read spans on {} chromosomes from {}",
            source.len(),
            source.names.len(),
            path.display()
        );

        Ok(source)
    }

    pub fn push(&mut self, chrom: impl Into<String>, span: ReadSpan) {
        let chrom = chrom.into();
        if !self.spans.contains_key(&chrom) {
            self.names.push(chrom.clone());
        }
        self.spans.entry(chrom).or_default().push(span);
        self.sorted = false;
    }

    /// Total number of spans over all chromosomes.
    pub fn len(&self) -> usize {
        self.spans.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_sorted(&mut self) {
        if !self.sorted {
            self.spans.values_mut().for_each(|spans| spans.sort());
            self.sorted = true;
        }
    }

    fn chromosome(&mut self, chrom: &str) -> Result<&[ReadSpan]> {
        self.ensure_sorted();
        self.spans
            .get(chrom)
            .map(Vec::as_slice)
            .ok_or_else(|| FragmapError::UnknownChromosome(chrom.to_string()))
    }
}

impl AlignmentSpanSource for MemorySpanSource {
    fn reference_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn fetch(&mut self, interval: &GenomicInterval) -> Result<Vec<ReadSpan>> {
        let (start, end) = (interval.start(), interval.end());
        let spans = self.chromosome(interval.chrom())?;

        // spans are sorted by start, nothing past `end` can overlap
        let upper = spans.partition_point(|span| span.start <= end);
        Ok(spans[..upper]
            .iter()
            .filter(|span| span.overlaps(start, end))
            .copied()
            .collect())
    }

    fn fetch_chromosome(&mut self, chrom: &str) -> Result<Vec<ReadSpan>> {
        Ok(self.chromosome(chrom)?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use tempfile::NamedTempFile;

    #[fixture]
    fn source() -> MemorySpanSource {
        MemorySpanSource::from_spans(vec![
            ("chr2", ReadSpan { start: 30, end: 50 }),
            ("chr1", ReadSpan { start: 200, end: 220 }),
            ("chr1", ReadSpan { start: 10, end: 40 }),
            ("chr1", ReadSpan { start: 5, end: 9 }),
        ])
    }

    #[rstest]
    fn test_reference_names_keep_first_appearance_order(source: MemorySpanSource) {
        assert_eq!(source.reference_names(), vec!["chr2", "chr1"]);
        assert_eq!(source.len(), 4);
    }

    #[rstest]
    fn test_fetch_chromosome_is_sorted(mut source: MemorySpanSource) {
        let spans = source.fetch_chromosome("chr1").unwrap();
        let starts: Vec<u32> = spans.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![5, 10, 200]);
    }

    #[rstest]
    #[case(0, 4, vec![])]
    #[case(9, 10, vec![5, 10])]
    #[case(41, 199, vec![])]
    #[case(35, 205, vec![10, 200])]
    fn test_fetch_returns_overlapping_spans(
        mut source: MemorySpanSource,
        #[case] start: u32,
        #[case] end: u32,
        #[case] expected: Vec<u32>,
    ) {
        let interval = GenomicInterval::new("chr1", start, end).unwrap();
        let starts: Vec<u32> = source
            .fetch(&interval)
            .unwrap()
            .iter()
            .map(|s| s.start)
            .collect();
        assert_eq!(starts, expected);
    }

    #[rstest]
    fn test_unknown_chromosome(mut source: MemorySpanSource) {
        assert!(matches!(
            source.fetch_chromosome("chrM"),
            Err(FragmapError::UnknownChromosome(_))
        ));
    }

    #[rstest]
    fn test_from_bed_converts_half_open_ends() {
        let mut file = NamedTempFile::with_suffix(".bed").unwrap();
        writeln!(file, "track name=reads").unwrap();
        writeln!(file, "chr1\t100\t122\tread1\t0\t+").unwrap();
        writeln!(file, "chr1\t90\t112").unwrap();
        file.flush().unwrap();

        let mut source = MemorySpanSource::from_bed(file.path()).unwrap();
        assert_eq!(
            source.fetch_chromosome("chr1").unwrap(),
            vec![ReadSpan { start: 90, end: 111 }, ReadSpan { start: 100, end: 121 }]
        );
    }

    #[rstest]
    fn test_from_bed_gz() {
        let file = NamedTempFile::with_suffix(".bed.gz").unwrap();
        let mut encoder = GzEncoder::new(file.reopen().unwrap(), Compression::default());
        writeln!(encoder, "chrX\t0\t20").unwrap();
        encoder.finish().unwrap();

        let mut source = MemorySpanSource::from_bed(file.path()).unwrap();
        assert_eq!(
            source.fetch_chromosome("chrX").unwrap(),
            vec![ReadSpan { start: 0, end: 19 }]
        );
    }

    #[rstest]
    #[case("chr1\t100\n")]
    #[case("chr1\tten\t20\n")]
    #[case("chr1\t20\t20\n")]
    #[case("chr1\t0\t0\n")]
    fn test_from_bed_rejects_bad_lines(#[case] content: &str) {
        let mut file = NamedTempFile::with_suffix(".bed").unwrap();
        write!(file, "chr1\t1\t10\n{}", content).unwrap();
        file.flush().unwrap();

        let result = MemorySpanSource::from_bed(file.path());
        assert!(matches!(result, Err(FragmapError::ParseError { line: 2, .. })));
    }
}
