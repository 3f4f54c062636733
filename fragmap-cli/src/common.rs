use std::path::Path;

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, value_parser};

use fragmap_core::{FragmapConfig, FragmapError};
use fragmap_core::traits::AlignmentSpanSource;
use fragmap_core::utils::{FileType, get_file_info};
use fragmap_io::{BamSpanSource, MemorySpanSource};

pub const PARAMETERS_ARG: &str = "parameters";
pub const LEFT_PADDING_ARG: &str = "left-padding";
pub const RIGHT_PADDING_ARG: &str = "right-padding";

pub fn parameters_arg() -> Arg {
    Arg::new(PARAMETERS_ARG)
        .short('p')
        .long("parameters")
        .help("TOML file with analysis parameters; flags override its values")
}

pub fn padding_args() -> [Arg; 2] {
    [
        Arg::new(LEFT_PADDING_ARG)
            .long("left-padding")
            .value_parser(value_parser!(u32))
            .help("Bases added upstream of merged reads"),
        Arg::new(RIGHT_PADDING_ARG)
            .long("right-padding")
            .value_parser(value_parser!(u32))
            .help("Bases added downstream of merged reads"),
    ]
}

///
/// Load the parameter file (or defaults) and apply the padding overrides.
/// The result is not validated yet; callers apply their own overrides first.
///
pub fn load_config(matches: &ArgMatches) -> Result<FragmapConfig> {
    let mut config = match matches.get_one::<String>(PARAMETERS_ARG) {
        Some(path) => FragmapConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to load parameters from {}", path))?,
        None => FragmapConfig::default(),
    };

    if let Some(left) = matches.get_one::<u32>(LEFT_PADDING_ARG) {
        config.padding.left_padding = *left;
    }
    if let Some(right) = matches.get_one::<u32>(RIGHT_PADDING_ARG) {
        config.padding.right_padding = *right;
    }

    Ok(config)
}

///
/// Open a read source based on the file extension: indexed BAM, or BED
/// (optionally gzipped) with one read envelope per line.
///
pub fn open_alignments(path: &str) -> Result<Box<dyn AlignmentSpanSource>> {
    let path = Path::new(path);
    let info = get_file_info(path);

    let source: Box<dyn AlignmentSpanSource> = match info.file_type {
        FileType::BAM => Box::new(BamSpanSource::open(path)?),
        FileType::BED => Box::new(MemorySpanSource::from_bed(path)?),
        _ => {
            return Err(FragmapError::UnsupportedInput(format!(
                "{} (expected .bam or .bed[.gz])",
                path.display()
            ))
            .into());
        }
    };

    log::info!("Reading alignments from {}", path.display());
    Ok(source)
}
