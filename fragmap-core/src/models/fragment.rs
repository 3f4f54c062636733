use std::fmt::{self, Display};

use crate::consts::FRAGMENT_ID_PREFIX;

///
/// One fragment called inside a precursor region.
///
/// Boundaries are stored as 0-based inclusive offsets into the owning
/// region; `region_offset` is the genomic start of that region so absolute
/// coordinates can be derived without holding on to the region itself.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub struct Fragment {
    pub region_offset: u32,
    pub region_start: usize,
    pub region_end: usize,
    pub start_reads: u32,
    pub end_reads: u32,
    pub total_reads: u32,
}

impl Fragment {
    /// Fragment size in bases (`region_end - region_start + 1`)
    pub fn len(&self) -> usize {
        self.region_end - self.region_start + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn absolute_start(&self) -> u32 {
        self.region_offset + self.region_start as u32
    }

    pub fn absolute_end(&self) -> u32 {
        self.region_offset + self.region_end as u32
    }

    ///
    /// True when `other` covers this fragment and is not the same interval.
    ///
    pub fn is_contained_in(&self, other: &Fragment) -> bool {
        other.region_start <= self.region_start
            && other.region_end >= self.region_end
            && (other.region_start, other.region_end) != (self.region_start, self.region_end)
    }
}

///
/// A fragment with everything the output writers need: its identifier,
/// the reference and precursor it belongs to and, optionally, its sequence.
///
#[derive(PartialEq, Debug, Clone)]
pub struct FragmentRecord {
    pub id: String,
    pub chrom: String,
    pub precursor: String,
    pub fragment: Fragment,
    pub sequence: Option<String>,
}

///
/// Build the identifier of the `index`-th fragment (1-based) of a chromosome.
///
pub fn fragment_id(chrom: &str, index: usize) -> String {
    format!("{}_{}_{:012}", FRAGMENT_ID_PREFIX, chrom, index)
}

impl Display for FragmentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}:{}-{}",
            self.id,
            self.chrom,
            self.fragment.absolute_start() + 1,
            self.fragment.absolute_end() + 1
        )
    }
}
