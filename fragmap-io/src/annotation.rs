use std::io::BufRead;
use std::path::Path;

use fragmap_core::errors::{FragmapError, Result};
use fragmap_core::models::GenomicInterval;
use fragmap_core::utils::{FileType, get_file_info, is_header_line};

use crate::open_reader;

const NAME_ATTRIBUTE: &str = "gene_id";

///
/// Read precursor regions from a GTF or GFF file.
///
/// Coordinates in the file are 1-based and inclusive; the returned regions
/// are 0-based. The region name comes from the `gene_id` attribute, in
/// either GTF (`gene_id "x";`) or GFF3 (`gene_id=x;`) notation.
///
/// # Arguments
/// - path: path to the annotation file, optionally gzipped
///
pub fn read_precursors<P: AsRef<Path>>(path: P) -> Result<Vec<GenomicInterval>> {
    let path = path.as_ref();
    if get_file_info(path).file_type != FileType::GTF {
        return Err(FragmapError::UnsupportedInput(format!(
            "{} (expected .gtf, .gff or .gff3, optionally gzipped)",
            path.display()
        )));
    }

    let reader = open_reader(path)?;

    let mut regions = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if is_header_line(&line) {
            continue;
        }

        let region = parse_precursor_line(&line).map_err(|reason| FragmapError::ParseError {
            path: path.display().to_string(),
            line: i + 1,
            reason,
        })?;
        regions.push(region);
    }

    log::info!("Read {} precursor regions from {}", regions.len(), path.display());

    Ok(regions)
}

fn parse_precursor_line(line: &str) -> std::result::Result<GenomicInterval, String> {
    let fields: Vec<&str> = line.trim_end().split('\t').collect();
    if fields.len() < 5 {
        return Err(format!("expected at least 5 columns, found {}", fields.len()));
    }

    let chrom = fields[0];
    let start: u32 = fields[3]
        .trim()
        .parse()
        .map_err(|_| format!("invalid start: {}", fields[3]))?;
    let end: u32 = fields[4]
        .trim()
        .parse()
        .map_err(|_| format!("invalid end: {}", fields[4]))?;

    if start < 1 {
        return Err("coordinates must be 1-based".to_string());
    }
    if end < start {
        return Err(format!("end {} precedes start {}", end, start));
    }

    let region = GenomicInterval::new(chrom, start - 1, end - 1).map_err(|e| e.to_string())?;

    Ok(match fields.get(8).and_then(|attributes| attribute(attributes, NAME_ATTRIBUTE)) {
        Some(name) => region.with_name(name),
        None => region,
    })
}

///
/// Value of `key` in a GTF/GFF attribute column.
///
fn attribute<'a>(attributes: &'a str, key: &str) -> Option<&'a str> {
    attributes.split(';').find_map(|pair| {
        let pair = pair.trim();
        let value = pair.strip_prefix(key)?;
        // `gene_id_version` must not match `gene_id`
        let value = value.strip_prefix('=').or_else(|| value.strip_prefix(' '))?;
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        (!value.is_empty()).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::NamedTempFile;

    #[rstest]
    #[case(r#"gene_id "SNORD48"; transcript_id "t1";"#, Some("SNORD48"))]
    #[case("ID=x;gene_id=MIR21;Name=mir-21", Some("MIR21"))]
    #[case("gene_id='RNU6-1'", Some("RNU6-1"))]
    #[case(r#"gene_id_version "3"; transcript_id "t1";"#, None)]
    #[case(r#"transcript_id "t1";"#, None)]
    #[case("", None)]
    fn test_attribute(#[case] attributes: &str, #[case] expected: Option<&str>) {
        assert_eq!(attribute(attributes, "gene_id"), expected);
    }

    #[rstest]
    fn test_parse_gtf_line() {
        let line = "chr11\tensembl\tsnoRNA\t93467\t93540\t.\t+\t.\tgene_id \"SNORD48\";";
        let region = parse_precursor_line(line).unwrap();

        assert_eq!(region.chrom(), "chr11");
        assert_eq!(region.start(), 93466);
        assert_eq!(region.end(), 93539);
        assert_eq!(region.name(), Some("SNORD48"));
    }

    #[rstest]
    fn test_unnamed_region_gets_coordinate_label() {
        let region = parse_precursor_line("chr1\t.\tregion\t101\t200").unwrap();
        assert_eq!(region.name(), None);
        assert_eq!(region.label(), "chr1:101-200");
    }

    #[rstest]
    #[case("chr1\t.\tregion\t0\t200")]
    #[case("chr1\t.\tregion\t300\t200")]
    #[case("chr1\t.\tregion\tabc\t200")]
    #[case("chr1\t.\tregion")]
    fn test_bad_lines_are_rejected(#[case] line: &str) {
        assert!(parse_precursor_line(line).is_err());
    }

    #[rstest]
    fn test_read_precursors_reports_line_numbers() {
        let mut file = NamedTempFile::with_suffix(".gtf").unwrap();
        writeln!(file, "# precursors").unwrap();
        writeln!(file, "chr1\t.\tgene\t10\t90\t.\t+\t.\tgene_id \"a\";").unwrap();
        writeln!(file, "chr1\t.\tgene\t0\t90\t.\t+\t.\tgene_id \"b\";").unwrap();
        file.flush().unwrap();

        let result = read_precursors(file.path());
        assert!(matches!(result, Err(FragmapError::ParseError { line: 3, .. })));
    }

    #[rstest]
    fn test_read_precursors() {
        let mut file = NamedTempFile::with_suffix(".gtf").unwrap();
        writeln!(file, "chr1\t.\tgene\t10\t90\t.\t+\t.\tgene_id \"a\";").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "chr2\t.\tgene\t1\t50\t.\t-\t.\tgene_id \"b\";").unwrap();
        file.flush().unwrap();

        let regions = read_precursors(file.path()).unwrap();
        let labels: Vec<String> = regions.iter().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["a", "b"]);
        assert_eq!((regions[1].start(), regions[1].end()), (0, 49));
    }

    #[rstest]
    #[case(".bed")]
    #[case(".txt")]
    fn test_read_precursors_rejects_non_annotation_files(#[case] suffix: &str) {
        let mut file = NamedTempFile::with_suffix(suffix).unwrap();
        writeln!(file, "chr1\t.\tgene\t10\t90\t.\t+\t.\tgene_id \"a\";").unwrap();
        file.flush().unwrap();

        let result = read_precursors(file.path());
        assert!(matches!(result, Err(FragmapError::UnsupportedInput(_))));
    }

    #[rstest]
    fn test_read_precursors_from_gzipped_gff() {
        let file = NamedTempFile::with_suffix(".gff3.gz").unwrap();
        let mut encoder = GzEncoder::new(file.reopen().unwrap(), Compression::default());
        writeln!(encoder, "##gff-version 3").unwrap();
        writeln!(encoder, "chr3\t.\tsnoRNA\t21\t120\t.\t+\t.\tID=x;gene_id=SNORD3").unwrap();
        encoder.finish().unwrap();

        let regions = read_precursors(file.path()).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].label(), "SNORD3");
        assert_eq!((regions[0].start(), regions[0].end()), (20, 119));
    }
}
