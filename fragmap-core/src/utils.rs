use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::upper_case_acronyms)]
pub enum FileType {
    BED,
    BAM,
    GTF,
    UNKNOWN,
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bed" => Ok(FileType::BED),
            "bam" => Ok(FileType::BAM),
            "gtf" | "gff" | "gff3" => Ok(FileType::GTF),
            _ => Ok(FileType::UNKNOWN),
        }
    }
}

pub struct FileInfo {
    pub file_type: FileType,
    pub is_gzipped: bool,
}

pub fn get_file_info(path: &Path) -> FileInfo {
    let mut file_type = FileType::UNKNOWN;
    let mut is_gzipped = false;

    if let Some(filename) = path.file_name().and_then(|f| f.to_str()) {
        if let Some(base_filename) = filename.strip_suffix(".gz") {
            is_gzipped = true;
            if let Some(ext) = PathBuf::from(base_filename)
                .extension()
                .and_then(|e| e.to_str())
            {
                file_type = FileType::from_str(ext).unwrap_or(FileType::UNKNOWN);
            }
        } else if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            file_type = FileType::from_str(ext).unwrap_or(FileType::UNKNOWN);
        }
    }

    FileInfo {
        file_type,
        is_gzipped,
    }
}

///
/// Parses one line of a bed like file into a contig (chromosome), start and end.
/// Anything beyond the third column is ignored.
///
pub fn parse_bedlike_line(line: &str) -> Option<(String, u32, u32)> {
    let mut fields = line.split('\t');
    let ctg = fields.next()?.trim();
    let st = fields.next()?.trim().parse::<u32>().ok()?;
    let en = fields.next()?.trim().parse::<u32>().ok()?;

    Some((ctg.to_string(), st, en))
}

/// Lines of a bed/gtf like file that carry no record.
pub fn is_header_line(line: &str) -> bool {
    let line = line.trim_start();
    line.is_empty()
        || line.starts_with('#')
        || line.starts_with("track")
        || line.starts_with("browser")
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match get_file_info(path).is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    let reader = BufReader::new(file);

    Ok(reader)
}

///
/// Get a writer for either a file or stdout (`-`).
///
pub fn get_dynamic_writer(path: &str) -> Result<Box<dyn Write>> {
    if path == "-" {
        Ok(Box::new(std::io::stdout().lock()))
    } else {
        let file =
            File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
        Ok(Box::new(std::io::BufWriter::new(file)))
    }
}
