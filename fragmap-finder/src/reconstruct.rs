use fragmap_core::config::FragmentConfig;
use fragmap_core::errors::{FragmapError, Result};
use fragmap_core::models::Fragment;

use crate::peaks::Peak;
use crate::profile::PositionProfile;

///
/// Pairs start peaks with end peaks into fragments.
///
/// Start peaks claim partners strongest first. A start peak takes the
/// unclaimed end peak downstream of it, within the length bounds, with the
/// best score: the summed peak counts minus `length_penalty` times the mean
/// disagreement between the candidate length and the average read length
/// observed at either peak. Fragments that end up inside another fragment
/// are dropped.
///
#[derive(Debug, Clone)]
pub struct FragmentReconstructor {
    min_length: usize,
    max_length: usize,
    length_penalty: f64,
}

impl FragmentReconstructor {
    pub fn new(min_length: usize, max_length: usize, length_penalty: f64) -> Self {
        FragmentReconstructor {
            min_length,
            max_length,
            length_penalty,
        }
    }

    pub fn from_config(config: &FragmentConfig) -> Self {
        FragmentReconstructor::new(
            config.min_fragment_length,
            config.max_fragment_length,
            config.length_penalty,
        )
    }

    fn score(&self, start: &Peak, end: &Peak, length: usize) -> f64 {
        let length = length as f64;
        let disagreement =
            ((start.avg_length - length).abs() + (end.avg_length - length).abs()) / 2.0;
        (start.count + end.count) as f64 - self.length_penalty * disagreement
    }

    ///
    /// Build the fragments of one region, ordered by region start.
    ///
    /// # Arguments
    /// - start_peaks: peaks of the start density, in any order
    /// - end_peaks: peaks of the end density, in any order
    /// - profile: the region's profile, used for total read support
    /// - region_offset: genomic start of the region
    ///
    pub fn reconstruct(
        &self,
        start_peaks: &[Peak],
        end_peaks: &[Peak],
        profile: &PositionProfile,
        region_offset: u32,
    ) -> Result<Vec<Fragment>> {
        for peak in start_peaks.iter().chain(end_peaks) {
            if peak.offset >= profile.len() {
                return Err(FragmapError::ContractViolation(format!(
                    "peak at offset {} lies outside a profile of {} positions",
                    peak.offset,
                    profile.len()
                )));
            }
        }

        let mut start_order: Vec<&Peak> = start_peaks.iter().collect();
        start_order.sort_by(|a, b| b.count.cmp(&a.count).then(a.offset.cmp(&b.offset)));

        let mut end_order: Vec<&Peak> = end_peaks.iter().collect();
        end_order.sort_by_key(|peak| peak.offset);
        let mut consumed = vec![false; end_order.len()];

        let mut fragments = Vec::new();

        for start in start_order {
            let mut best: Option<(usize, f64)> = None;

            for (i, end) in end_order.iter().enumerate() {
                if consumed[i] || end.offset <= start.offset {
                    continue;
                }

                let length = end.offset - start.offset + 1;
                if length < self.min_length || length > self.max_length {
                    continue;
                }

                let score = self.score(start, end, length);
                // strictly better only, so ties go to the shorter fragment
                if best.is_none_or(|(_, best_score)| score > best_score) {
                    best = Some((i, score));
                }
            }

            let Some((i, _)) = best else {
                log::trace!("no end peak pairs with start peak at {}", start.offset);
                continue;
            };

            consumed[i] = true;
            let end = end_order[i];

            fragments.push(Fragment {
                region_offset,
                region_start: start.offset,
                region_end: end.offset,
                start_reads: start.count,
                end_reads: end.count,
                total_reads: profile.reads_within(start.offset, end.offset),
            });
        }

        let mut fragments = remove_contained(fragments);
        fragments.sort_by_key(|f| (f.region_start, f.region_end));

        Ok(fragments)
    }
}

///
/// Drop every fragment that lies inside another, different fragment.
///
/// The relative order of the survivors is preserved, and applying the
/// filter to its own output changes nothing.
///
pub fn remove_contained(fragments: Vec<Fragment>) -> Vec<Fragment> {
    let keep: Vec<bool> = fragments
        .iter()
        .map(|f| !fragments.iter().any(|other| f.is_contained_in(other)))
        .collect();

    fragments
        .into_iter()
        .zip(keep)
        .filter_map(|(f, keep)| keep.then_some(f))
        .collect()
}
