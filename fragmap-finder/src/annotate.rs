use rayon::prelude::*;
use rayon::ThreadPool;

use fragmap_core::FragmapConfig;
use fragmap_core::errors::{FragmapError, Result};
use fragmap_core::models::{Fragment, FragmentRecord, GenomicInterval, ReadSpan, fragment_id};
use fragmap_core::traits::{AlignmentSpanSource, ReferenceLookup};

use crate::finder::FragmentFinder;
use crate::profile::PositionProfile;
use crate::segment::RegionSegmenter;

/// A precursor region together with the fragments called in it.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionFragments {
    pub region: GenomicInterval,
    pub fragments: Vec<Fragment>,
}

///
/// Call the fragments of one region from the reads overlapping it.
///
pub fn call_region(
    region: &GenomicInterval,
    spans: &[ReadSpan],
    config: &FragmapConfig,
) -> Result<Vec<Fragment>> {
    let profile = PositionProfile::from_spans(region, spans);
    FragmentFinder::new(region.clone(), profile, config)?.into_fragments()
}

///
/// Candidate precursor regions of `chrom`, built by merging its reads.
///
/// Reads are streamed from the source in one pass; only the regions are
/// kept. The first read error ends the pass and is returned.
///
pub fn candidate_regions<S>(
    source: &mut S,
    chrom: &str,
    segmenter: &RegionSegmenter,
) -> Result<Vec<GenomicInterval>>
where
    S: AlignmentSpanSource + ?Sized,
{
    let mut failure = None;
    let spans = source
        .stream_chromosome(chrom)?
        .map_while(|result| match result {
            Ok(span) => Some(span),
            Err(e) => {
                failure = Some(e);
                None
            }
        });
    let regions = segmenter.segment(chrom, spans);

    match failure {
        Some(e) => Err(e),
        None => Ok(regions),
    }
}

///
/// Runs fragment calling over many regions.
///
/// Reads are fetched region by region from the source, then the regions are
/// processed on a dedicated thread pool. Results always come back in the
/// order the regions were given, whatever the number of threads.
///
pub struct Annotator {
    config: FragmapConfig,
    segmenter: RegionSegmenter,
    pool: ThreadPool,
}

impl Annotator {
    pub fn new(config: FragmapConfig, num_threads: usize) -> Result<Self> {
        config.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads.max(1))
            .build()
            .map_err(|e| FragmapError::InvalidConfig(format!("cannot build thread pool: {}", e)))?;

        Ok(Annotator {
            segmenter: RegionSegmenter::from_config(&config.padding),
            config,
            pool,
        })
    }

    pub fn config(&self) -> &FragmapConfig {
        &self.config
    }

    pub fn segmenter(&self) -> &RegionSegmenter {
        &self.segmenter
    }

    ///
    /// Segment `chrom` into candidate regions and call fragments in each.
    ///
    pub fn annotate_chromosome<S>(&self, source: &mut S, chrom: &str) -> Result<Vec<RegionFragments>>
    where
        S: AlignmentSpanSource + ?Sized,
    {
        let regions = candidate_regions(source, chrom, &self.segmenter)?;
        log::debug!("{}: {} candidate regions", chrom, regions.len());
        self.annotate_regions(source, &regions)
    }

    ///
    /// Call fragments in the given regions.
    ///
    /// A region whose reads cannot be fetched, or whose input is otherwise
    /// unusable, is skipped with a warning. Contract violations abort.
    ///
    pub fn annotate_regions<S>(
        &self,
        source: &mut S,
        regions: &[GenomicInterval],
    ) -> Result<Vec<RegionFragments>>
    where
        S: AlignmentSpanSource + ?Sized,
    {
        let mut work: Vec<(&GenomicInterval, Vec<ReadSpan>)> = Vec::with_capacity(regions.len());
        for region in regions {
            match source.fetch(region) {
                Ok(spans) => work.push((region, spans)),
                Err(e) if !e.is_fatal() => {
                    log::warn!("Skipping region {}: {}", region.label(), e);
                }
                Err(e) => return Err(e),
            }
        }

        let results: Vec<Result<Vec<Fragment>>> = self.pool.install(|| {
            work.par_iter()
                .map(|(region, spans)| call_region(region, spans, &self.config))
                .collect()
        });

        let mut annotated = Vec::with_capacity(results.len());
        for ((region, _), result) in work.into_iter().zip(results) {
            match result {
                Ok(fragments) => annotated.push(RegionFragments {
                    region: region.clone(),
                    fragments,
                }),
                Err(e) if !e.is_fatal() => {
                    log::warn!("Skipping region {}: {}", region.label(), e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(annotated)
    }
}

///
/// Number the fragments of one chromosome and attach what the writers need.
///
/// Indices start at 1 and follow region order, then fragment order inside
/// each region. Sequences are looked up only when a reference is given.
///
pub fn fragment_records(
    chrom: &str,
    regions: &[RegionFragments],
    mut reference: Option<&mut dyn ReferenceLookup>,
) -> Result<Vec<FragmentRecord>> {
    let mut records = Vec::new();

    for annotated in regions {
        let precursor = annotated.region.label();
        for fragment in &annotated.fragments {
            let sequence = match reference.as_deref_mut() {
                Some(lookup) => Some(lookup.lookup(
                    chrom,
                    fragment.absolute_start(),
                    fragment.absolute_end(),
                )?),
                None => None,
            };

            records.push(FragmentRecord {
                id: fragment_id(chrom, records.len() + 1),
                chrom: chrom.to_string(),
                precursor: precursor.clone(),
                fragment: *fragment,
                sequence,
            });
        }
    }

    Ok(records)
}

///
/// Group precursor regions by chromosome.
///
/// Chromosomes keep the order in which they first appear; regions within a
/// chromosome are sorted by position.
///
pub fn group_by_chromosome(regions: Vec<GenomicInterval>) -> Vec<(String, Vec<GenomicInterval>)> {
    let mut groups: Vec<(String, Vec<GenomicInterval>)> = Vec::new();

    for region in regions {
        match groups.iter_mut().find(|(chrom, _)| chrom == region.chrom()) {
            Some((_, members)) => members.push(region),
            None => groups.push((region.chrom().to_string(), vec![region])),
        }
    }

    for (_, members) in groups.iter_mut() {
        members.sort_by_key(|region| (region.start(), region.end()));
    }

    groups
}
