use std::io::{self, Write};
use std::str::FromStr;

use fragmap_core::consts::{DEFAULT_OFFSET_3P, DEFAULT_OFFSET_5P};
use fragmap_core::errors::FragmapError;
use fragmap_core::models::{FragmentRecord, GenomicInterval};

pub const GTF_SOURCE: &str = "fragmap";
pub const GTF_FEATURE: &str = "sncdRNA";

const TABLE_COLUMNS: [&str; 12] = [
    "Fragment",
    "Size",
    "Reference sequence",
    "Start",
    "End",
    "Precursor",
    "Start in precursor",
    "End in precursor",
    "Sequence",
    "Corresponding-reads (start)",
    "Corresponding-reads (end)",
    "Corresponding-reads (total)",
];

/// Output flavours for called fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Gtf,
}

impl FromStr for OutputFormat {
    type Err = FragmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "tsv" => Ok(OutputFormat::Table),
            "gtf" => Ok(OutputFormat::Gtf),
            _ => Err(FragmapError::InvalidConfig(format!(
                "unknown output format: {} (expected table or gtf)",
                s
            ))),
        }
    }
}

///
/// Sink for annotated fragments.
///
pub trait FragmentWrite {
    fn write_record(&mut self, record: &FragmentRecord) -> io::Result<()>;

    fn write_records(&mut self, records: &[FragmentRecord]) -> io::Result<()> {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()>;
}

///
/// Tab separated table with one fragment per row. Coordinates are 1-based
/// and inclusive.
///
pub struct TableWriter<W: Write> {
    inner: W,
}

impl<W: Write> TableWriter<W> {
    ///
    /// Create the writer and emit the header line.
    ///
    /// # Arguments
    /// - inner: destination
    /// - with_sequence: whether records will carry sequences
    ///
    pub fn new(mut inner: W, with_sequence: bool) -> io::Result<Self> {
        let header: Vec<&str> = TABLE_COLUMNS
            .iter()
            .map(|column| match *column {
                "Sequence" if !with_sequence => "Sequence (no fasta file given)",
                column => column,
            })
            .collect();
        writeln!(inner, "{}", header.join("\t"))?;

        Ok(TableWriter { inner })
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> FragmentWrite for TableWriter<W> {
    fn write_record(&mut self, record: &FragmentRecord) -> io::Result<()> {
        let fragment = &record.fragment;
        writeln!(
            self.inner,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            record.id,
            fragment.len(),
            record.chrom,
            fragment.absolute_start() + 1,
            fragment.absolute_end() + 1,
            record.precursor,
            fragment.region_start + 1,
            fragment.region_end + 1,
            record.sequence.as_deref().unwrap_or("-"),
            fragment.start_reads,
            fragment.end_reads,
            fragment.total_reads,
        )
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

///
/// GTF with one `sncdRNA` feature per fragment. The boundaries are widened
/// by `offset5p` / `offset3p` so that reads with slightly ragged ends still
/// fall inside the feature when the GTF is used for counting.
///
pub struct GtfWriter<W: Write> {
    inner: W,
    offset5p: u32,
    offset3p: u32,
}

impl<W: Write> GtfWriter<W> {
    pub fn new(inner: W, offset5p: u32, offset3p: u32) -> Self {
        GtfWriter {
            inner,
            offset5p,
            offset3p,
        }
    }

    pub fn with_default_offsets(inner: W) -> Self {
        GtfWriter::new(inner, DEFAULT_OFFSET_5P, DEFAULT_OFFSET_3P)
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> FragmentWrite for GtfWriter<W> {
    fn write_record(&mut self, record: &FragmentRecord) -> io::Result<()> {
        let fragment = &record.fragment;
        let start = (fragment.absolute_start() + 1)
            .saturating_sub(self.offset5p)
            .max(1);
        let end = fragment.absolute_end() + 1 + self.offset3p;

        writeln!(
            self.inner,
            "{}\t{}\t{}\t{}\t{}\t{}\t.\t.\tgene_id \"{}\"; precursor \"{}\";",
            record.chrom,
            GTF_SOURCE,
            GTF_FEATURE,
            start,
            end,
            fragment.total_reads,
            record.id,
            record.precursor,
        )
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

///
/// Write candidate regions as BED (0-based, half-open).
///
pub fn write_regions<W: Write>(writer: &mut W, regions: &[GenomicInterval]) -> io::Result<()> {
    for region in regions {
        writeln!(writer, "{}", region.as_bed_string())?;
    }
    Ok(())
}
