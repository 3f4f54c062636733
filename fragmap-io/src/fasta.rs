use std::io::{self, BufRead, Seek};
use std::path::{Path, PathBuf};

use noodles::core::{Position, Region};
use noodles::fasta;

use fragmap_core::errors::{FragmapError, Result};
use fragmap_core::traits::ReferenceLookup;

///
/// Sequence lookup backed by a FASTA file and its `.fai` index.
///
pub struct IndexedFastaLookup<R> {
    reader: fasta::io::IndexedReader<R>,
}

impl<R: BufRead + Seek> IndexedFastaLookup<R> {
    pub fn new(reader: fasta::io::IndexedReader<R>) -> Self {
        IndexedFastaLookup { reader }
    }
}

///
/// Open an indexed FASTA file. The index must sit next to it as `<file>.fai`.
///
pub fn open_fasta<P: AsRef<Path>>(path: P) -> Result<Box<dyn ReferenceLookup>> {
    let path = path.as_ref();

    let mut index = path.as_os_str().to_owned();
    index.push(".fai");
    if !PathBuf::from(index).exists() {
        return Err(FragmapError::MissingIndex(path.display().to_string()));
    }

    let reader = fasta::io::indexed_reader::Builder::default().build_from_path(path)?;
    log::debug!("Opened reference {}", path.display());

    Ok(Box::new(IndexedFastaLookup::new(reader)))
}

impl<R: BufRead + Seek> ReferenceLookup for IndexedFastaLookup<R> {
    fn lookup(&mut self, chrom: &str, start: u32, end: u32) -> Result<String> {
        let malformed = || FragmapError::MalformedInterval {
            chrom: chrom.to_string(),
            start,
            end,
        };
        if end < start {
            return Err(malformed());
        }

        let (Some(from), Some(to)) = (
            Position::new(start as usize + 1),
            Position::new(end as usize + 1),
        ) else {
            return Err(malformed());
        };

        let region = Region::new(chrom, from..=to);
        let record = self.reader.query(&region).map_err(|e| match e.kind() {
            io::ErrorKind::InvalidInput => FragmapError::UnknownChromosome(chrom.to_string()),
            _ => FragmapError::Io(e),
        })?;

        Ok(String::from_utf8_lossy(record.sequence().as_ref()).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn reference() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.fa");
        std::fs::write(&path, ">chr1\nACGTACGTAC\nGGGGCCCCTT\n>chr2\nTTTTAAAA\n").unwrap();
        std::fs::write(
            dir.path().join("ref.fa.fai"),
            "chr1\t20\t6\t10\t11\nchr2\t8\t34\t8\t9\n",
        )
        .unwrap();
        (dir, path)
    }

    #[rstest]
    #[case("chr1", 0, 3, "ACGT")]
    #[case("chr1", 8, 12, "ACGGG")]
    #[case("chr2", 3, 4, "TA")]
    fn test_lookup_is_zero_based_inclusive(
        reference: (TempDir, PathBuf),
        #[case] chrom: &str,
        #[case] start: u32,
        #[case] end: u32,
        #[case] expected: &str,
    ) {
        let (_dir, path) = reference;
        let mut lookup = open_fasta(&path).unwrap();
        assert_eq!(lookup.lookup(chrom, start, end).unwrap(), expected);
    }

    #[rstest]
    fn test_missing_fai_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.fa");
        std::fs::write(&path, ">chr1\nACGT\n").unwrap();

        assert!(matches!(
            open_fasta(&path),
            Err(FragmapError::MissingIndex(_))
        ));
    }

    #[rstest]
    fn test_reversed_coordinates_are_rejected(reference: (TempDir, PathBuf)) {
        let (_dir, path) = reference;
        let mut lookup = open_fasta(&path).unwrap();
        assert!(matches!(
            lookup.lookup("chr1", 5, 2),
            Err(FragmapError::MalformedInterval { .. })
        ));
    }
}
