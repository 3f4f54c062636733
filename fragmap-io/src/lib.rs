//! # Input/Output for fragment annotation.
//!
//! Read spans come from indexed BAM files ([bam::BamSpanSource]) or from BED
//! files of read envelopes ([bed::MemorySpanSource]). Precursor regions can be
//! taken from a GTF/GFF annotation, and fragment sequences from an indexed
//! FASTA file. Results are written as a table or as GTF.
//!
pub mod annotation;
pub mod bam;
pub mod bed;
pub mod fasta;
pub mod writers;

use std::io::{self, BufReader, Read};
use std::path::Path;

use fragmap_core::errors::{FragmapError, Result};
use fragmap_core::utils::get_dynamic_reader;

pub use annotation::read_precursors;
pub use bam::BamSpanSource;
pub use bed::MemorySpanSource;
pub use fasta::{IndexedFastaLookup, open_fasta};
pub use writers::{FragmentWrite, GtfWriter, OutputFormat, TableWriter, write_regions};

/// Open a plain or gzipped text file, keeping the io error kind when there is one.
pub(crate) fn open_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    get_dynamic_reader(path).map_err(|e| {
        let kind = e
            .downcast_ref::<io::Error>()
            .map_or(io::ErrorKind::Other, io::Error::kind);
        FragmapError::Io(io::Error::new(kind, format!("{:#}", e)))
    })
}
