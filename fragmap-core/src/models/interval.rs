use std::fmt::{self, Display};

use crate::errors::{FragmapError, Result};

///
/// A genomic interval on one reference sequence. Coordinates are 0-based
/// and the end is inclusive, matching alignment block coordinates.
///
/// Candidate precursor regions are represented with this struct. Regions
/// that come from an annotation file carry the annotated name.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct GenomicInterval {
    chrom: String,
    start: u32,
    end: u32,
    name: Option<String>,
}

impl GenomicInterval {
    pub fn new(chrom: impl Into<String>, start: u32, end: u32) -> Result<Self> {
        let chrom = chrom.into();
        if end < start {
            return Err(FragmapError::MalformedInterval { chrom, start, end });
        }

        Ok(GenomicInterval {
            chrom,
            start,
            end,
            name: None,
        })
    }

    ///
    /// Interval spanning two positions given in either order.
    ///
    pub fn covering(chrom: impl Into<String>, a: u32, b: u32) -> Self {
        GenomicInterval {
            chrom: chrom.into(),
            start: a.min(b),
            end: a.max(b),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    ///
    /// Number of positions covered (`end - start + 1`).
    ///
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    /// Intervals are end-inclusive, so they always cover at least one base.
    pub fn is_empty(&self) -> bool {
        false
    }

    ///
    /// Human readable precursor label: the annotated name if there is one,
    /// `chrom:start-end` in 1-based inclusive coordinates otherwise.
    ///
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{}:{}-{}", self.chrom, self.start + 1, self.end + 1),
        }
    }

    ///
    /// Get file string of the interval (BED, half-open)
    ///
    pub fn as_bed_string(&self) -> String {
        format!(
            "{}\t{}\t{}{}",
            self.chrom,
            self.start,
            self.end + 1,
            self.name
                .as_deref()
                .map_or(String::new(), |s| format!("\t{}", s)),
        )
    }
}

impl Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_interval_len_is_inclusive() {
        let interval = GenomicInterval::new("chr1", 0, 13).unwrap();
        assert_eq!(interval.len(), 14);
    }

    #[rstest]
    fn test_single_base_interval() {
        let interval = GenomicInterval::new("chr1", 7, 7).unwrap();
        assert_eq!(interval.len(), 1);
    }

    #[rstest]
    fn test_malformed_interval_is_rejected() {
        let result = GenomicInterval::new("chr1", 10, 9);
        assert!(matches!(
            result,
            Err(FragmapError::MalformedInterval { start: 10, end: 9, .. })
        ));
    }

    #[rstest]
    #[case(None, "chr2:101-200")]
    #[case(Some("SNORD48"), "SNORD48")]
    fn test_label(#[case] name: Option<&str>, #[case] expected: &str) {
        let mut interval = GenomicInterval::new("chr2", 100, 199).unwrap();
        if let Some(name) = name {
            interval = interval.with_name(name);
        }
        assert_eq!(interval.label(), expected);
    }

    #[rstest]
    fn test_as_bed_string_is_half_open() {
        let interval = GenomicInterval::new("chr2", 100, 199).unwrap();
        assert_eq!(interval.as_bed_string(), "chr2\t100\t200");
    }
}
