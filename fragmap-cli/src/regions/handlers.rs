use std::io::Write;

use anyhow::Result;
use clap::ArgMatches;

use fragmap_core::utils::get_dynamic_writer;
use fragmap_finder::annotate::candidate_regions;
use fragmap_finder::segment::RegionSegmenter;
use fragmap_io::write_regions;

use super::cli::DEFAULT_OUT;
use crate::common::{load_config, open_alignments};

pub fn run_regions(matches: &ArgMatches) -> Result<()> {
    let alignment = matches
        .get_one::<String>("alignment")
        .expect("An alignment file is required.");

    let default_out = DEFAULT_OUT.to_string();
    let output = matches.get_one::<String>("output").unwrap_or(&default_out);

    let config = load_config(matches)?;
    config.validate()?;
    let segmenter = RegionSegmenter::from_config(&config.padding);

    let mut source = open_alignments(alignment)?;
    let mut writer = get_dynamic_writer(output)?;

    let mut total = 0;
    for chrom in source.reference_names() {
        let regions = match candidate_regions(&mut *source, &chrom, &segmenter) {
            Ok(regions) => regions,
            Err(e) if !e.is_fatal() => {
                log::warn!("Skipping {}: {}", chrom, e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        write_regions(&mut writer, &regions)?;
        total += regions.len();
    }

    writer.flush()?;
    log::info!("Wrote {} candidate regions", total);

    Ok(())
}
