use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use noodles::bam;
use noodles::bgzf;
use noodles::core::{Position, Region};
use noodles::sam;
use noodles::sam::alignment::record::cigar::op::Kind;

use fragmap_core::errors::{FragmapError, Result};
use fragmap_core::models::{GenomicInterval, ReadSpan};
use fragmap_core::traits::{AlignmentSpanSource, SpanStream};

///
/// Read spans served from a coordinate sorted, indexed BAM file.
///
/// The index is expected next to the alignments as `<file>.bam.bai`.
///
pub struct BamSpanSource {
    path: PathBuf,
    reader: bam::io::IndexedReader<bgzf::Reader<File>>,
    header: sam::Header,
}

impl BamSpanSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let index_path = bai_path(&path);
        if !index_path.exists() {
            return Err(FragmapError::MissingIndex(path.display().to_string()));
        }

        let mut reader = bam::io::indexed_reader::Builder::default().build_from_path(&path)?;
        let header = reader.read_header()?;

        log::debug!(
            "Opened {} ({} reference sequences)",
            path.display(),
            header.reference_sequences().len()
        );

        Ok(BamSpanSource {
            path,
            reader,
            header,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_chromosome(&self, chrom: &str) -> Result<()> {
        if self.header.reference_sequences().contains_key(chrom.as_bytes()) {
            Ok(())
        } else {
            Err(FragmapError::UnknownChromosome(chrom.to_string()))
        }
    }

    ///
    /// Spans of the mapped records overlapping `region`, in file order.
    ///
    fn query_spans<'a>(&'a mut self, region: &Region) -> Result<SpanStream<'a>> {
        let records = self.reader.query(&self.header, region)?;

        Ok(Box::new(records.filter_map(|result| match result {
            Ok(record) if record.flags().is_unmapped() => None,
            Ok(record) => read_span(&record).transpose(),
            Err(e) => Some(Err(e.into())),
        })))
    }

    fn collect_spans(&mut self, region: &Region) -> Result<Vec<ReadSpan>> {
        let mut spans = self.query_spans(region)?.collect::<Result<Vec<_>>>()?;
        spans.sort();
        Ok(spans)
    }
}

impl AlignmentSpanSource for BamSpanSource {
    fn reference_names(&self) -> Vec<String> {
        self.header
            .reference_sequences()
            .keys()
            .map(|name| name.to_string())
            .collect()
    }

    fn fetch(&mut self, interval: &GenomicInterval) -> Result<Vec<ReadSpan>> {
        self.check_chromosome(interval.chrom())?;

        let (Some(start), Some(end)) = (
            Position::new(interval.start() as usize + 1),
            Position::new(interval.end() as usize + 1),
        ) else {
            return Err(FragmapError::MalformedInterval {
                chrom: interval.chrom().to_string(),
                start: interval.start(),
                end: interval.end(),
            });
        };

        let region = Region::new(interval.chrom(), start..=end);
        let mut spans = self.collect_spans(&region)?;
        spans.retain(|span| span.overlaps(interval.start(), interval.end()));

        Ok(spans)
    }

    fn fetch_chromosome(&mut self, chrom: &str) -> Result<Vec<ReadSpan>> {
        self.check_chromosome(chrom)?;
        let region = Region::new(chrom, ..);
        self.collect_spans(&region)
    }

    fn stream_chromosome<'a>(&'a mut self, chrom: &str) -> Result<SpanStream<'a>> {
        self.check_chromosome(chrom)?;
        let region = Region::new(chrom, ..);
        self.query_spans(&region)
    }
}

fn bai_path(path: &Path) -> PathBuf {
    let mut index = path.as_os_str().to_owned();
    index.push(".bai");
    PathBuf::from(index)
}

///
/// Outer envelope of the aligned blocks of a record, 0-based inclusive.
///
/// Deletions and skips move along the reference but never open or close
/// the envelope. Records without any aligned base yield `None`.
///
fn read_span(record: &bam::Record) -> Result<Option<ReadSpan>> {
    let Some(alignment_start) = record.alignment_start() else {
        return Ok(None);
    };
    let alignment_start = usize::from(alignment_start?) - 1;

    let ops = record
        .cigar()
        .iter()
        .map(|op| op.map(|op| (op.kind(), op.len())))
        .collect::<io::Result<Vec<_>>>()?;

    Ok(envelope(alignment_start, &ops))
}

fn envelope(alignment_start: usize, ops: &[(Kind, usize)]) -> Option<ReadSpan> {
    let mut position = alignment_start;
    let mut first: Option<usize> = None;
    let mut last: Option<usize> = None;

    for (kind, len) in ops {
        match kind {
            Kind::Match | Kind::SequenceMatch | Kind::SequenceMismatch => {
                if *len == 0 {
                    continue;
                }
                first.get_or_insert(position);
                position += len;
                last = Some(position - 1);
            }
            Kind::Deletion | Kind::Skip => position += len,
            _ => {}
        }
    }

    let (start, end) = (first?, last?);
    ReadSpan::new(u32::try_from(start).ok()?, u32::try_from(end).ok()?).ok()
}
