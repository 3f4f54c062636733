use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};

use fragmap_core::consts::{DEFAULT_OFFSET_3P, DEFAULT_OFFSET_5P};
use fragmap_core::models::{FragmentRecord, GenomicInterval};
use fragmap_core::traits::{AlignmentSpanSource, ReferenceLookup};
use fragmap_core::{FragmapConfig, FragmapError};
use fragmap_core::utils::get_dynamic_writer;
use fragmap_finder::annotate::{Annotator, fragment_records, group_by_chromosome};
use fragmap_io::{FragmentWrite, GtfWriter, OutputFormat, TableWriter, open_fasta, read_precursors};

use super::cli::{DEFAULT_FORMAT, DEFAULT_OUT};
use crate::common::{load_config, open_alignments};

/// One unit of work: a chromosome, with its annotated precursors if any were given.
type Work = (String, Option<Vec<GenomicInterval>>);

///
/// Apply the peak and fragment overrides on top of the loaded parameters.
///
fn apply_overrides(matches: &ArgMatches, config: &mut FragmapConfig) {
    if let Some(min_count) = matches.get_one::<u32>("min-count") {
        config.peaks.min_count = *min_count;
    }
    if let Some(window) = matches.get_one::<usize>("suppression-window") {
        config.peaks.suppression_window = *window;
    }
    if let Some(min_length) = matches.get_one::<usize>("min-length") {
        config.fragments.min_fragment_length = *min_length;
    }
    if let Some(max_length) = matches.get_one::<usize>("max-length") {
        config.fragments.max_fragment_length = *max_length;
    }
    if let Some(penalty) = matches.get_one::<f64>("length-penalty") {
        config.fragments.length_penalty = *penalty;
    }
}

///
/// Call and number the fragments of one chromosome.
///
/// Returns `None` when the chromosome has to be skipped: its reads or its
/// reference sequence are unavailable, or its input is otherwise unusable.
/// Nothing of a skipped chromosome is written. Fatal errors are returned.
///
fn chromosome_records(
    annotator: &Annotator,
    source: &mut dyn AlignmentSpanSource,
    chrom: &str,
    regions: Option<&[GenomicInterval]>,
    reference: Option<&mut dyn ReferenceLookup>,
) -> Result<Option<Vec<FragmentRecord>>, FragmapError> {
    let annotated = match regions {
        Some(regions) => annotator.annotate_regions(source, regions),
        None => annotator.annotate_chromosome(source, chrom),
    };

    match annotated.and_then(|annotated| fragment_records(chrom, &annotated, reference)) {
        Ok(records) => Ok(Some(records)),
        Err(e) if !e.is_fatal() => {
            log::warn!("Skipping {}: {}", chrom, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn progress_bar(len: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}") {
        pb.set_style(style);
    }
    pb
}

pub fn run_annotate(matches: &ArgMatches) -> Result<()> {
    let alignment = matches
        .get_one::<String>("alignment")
        .expect("An alignment file is required.");

    let default_out = DEFAULT_OUT.to_string();
    let output = matches.get_one::<String>("output").unwrap_or(&default_out);

    let default_format = DEFAULT_FORMAT.to_string();
    let format = OutputFormat::from_str(matches.get_one::<String>("format").unwrap_or(&default_format))?;

    let mut config = load_config(matches)?;
    apply_overrides(matches, &mut config);

    let threads = matches
        .get_one::<usize>("threads")
        .copied()
        .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, |n| n.get()));

    let annotator = Annotator::new(config, threads)?;
    log::info!("Annotating {} with {} threads", alignment, threads);
    log::debug!("{:?}", annotator.config());

    let mut source = open_alignments(alignment)?;

    let mut reference: Option<Box<dyn ReferenceLookup>> = match matches.get_one::<String>("fasta") {
        Some(fasta) => Some(open_fasta(fasta).with_context(|| format!("Failed to open reference {}", fasta))?),
        None => None,
    };

    let work: Vec<Work> = match matches.get_one::<String>("regions") {
        Some(gtf) => group_by_chromosome(read_precursors(gtf)?)
            .into_iter()
            .map(|(chrom, regions)| (chrom, Some(regions)))
            .collect(),
        None => source
            .reference_names()
            .into_iter()
            .map(|chrom| (chrom, None))
            .collect(),
    };

    let writer = get_dynamic_writer(output)?;
    let mut writer: Box<dyn FragmentWrite> = match format {
        OutputFormat::Table => Box::new(TableWriter::new(writer, reference.is_some())?),
        OutputFormat::Gtf => Box::new(GtfWriter::new(
            writer,
            matches.get_one::<u32>("offset5p").copied().unwrap_or(DEFAULT_OFFSET_5P),
            matches.get_one::<u32>("offset3p").copied().unwrap_or(DEFAULT_OFFSET_3P),
        )),
    };

    let pb = progress_bar(work.len(), matches.get_flag("quiet"));
    let mut total = 0;

    for (chrom, regions) in work {
        pb.set_message(chrom.clone());

        let lookup: Option<&mut dyn ReferenceLookup> = match reference.as_mut() {
            Some(lookup) => Some(lookup.as_mut()),
            None => None,
        };

        if let Some(records) = chromosome_records(&annotator, &mut *source, &chrom, regions.as_deref(), lookup)? {
            writer.write_records(&records)?;
            log::debug!("{}: {} fragments", chrom, records.len());
            total += records.len();
        }
        pb.inc(1);
    }

    writer.flush()?;
    pb.finish_and_clear();

    log::info!("Detected {} fragments", total);

    Ok(())
}
