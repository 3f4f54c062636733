use crate::errors::Result;
use crate::models::{GenomicInterval, ReadSpan};

///
/// Anything that can hand out aligned read envelopes for a genomic interval.
///
/// Implementations only return reads with at least one aligned base and
/// fail with [crate::errors::FragmapError::UnknownChromosome] for reference
/// names they do not know.
///
pub trait AlignmentSpanSource {
    /// Reference sequence names, in the order of the source's header.
    fn reference_names(&self) -> Vec<String>;

    /// Spans overlapping `interval`, ordered by position.
    fn fetch(&mut self, interval: &GenomicInterval) -> Result<Vec<ReadSpan>>;

    /// Every span on `chrom`, ordered by position.
    fn fetch_chromosome(&mut self, chrom: &str) -> Result<Vec<ReadSpan>>;

    ///
    /// Every span on `chrom` as a stream, ordered by start.
    ///
    /// Unknown chromosomes fail before the first item. File backed sources
    /// override this to avoid holding a whole chromosome in memory.
    ///
    fn stream_chromosome<'a>(&'a mut self, chrom: &str) -> Result<SpanStream<'a>> {
        Ok(Box::new(self.fetch_chromosome(chrom)?.into_iter().map(Ok)))
    }
}

/// Fallible stream of read spans borrowed from a source.
pub type SpanStream<'a> = Box<dyn Iterator<Item = Result<ReadSpan>> + 'a>;

///
/// Reference sequence lookup used to fill in fragment sequences.
///
pub trait ReferenceLookup {
    /// Nucleotides of `chrom` between `start` and `end` (0-based, inclusive).
    fn lookup(&mut self, chrom: &str, start: u32, end: u32) -> Result<String>;
}
