use once_cell::unsync::OnceCell;

use fragmap_core::FragmapConfig;
use fragmap_core::errors::{FragmapError, Result};
use fragmap_core::models::{Fragment, GenomicInterval};

use crate::peaks::{Peak, PeakDetector};
use crate::profile::PositionProfile;
use crate::reconstruct::FragmentReconstructor;

///
/// Fragment calling for a single precursor region.
///
/// Owns the region's profile; fragments are computed on first request and
/// replayed from a cache afterwards.
///
#[derive(Debug)]
pub struct FragmentFinder {
    region: GenomicInterval,
    profile: PositionProfile,
    detector: PeakDetector,
    reconstructor: FragmentReconstructor,
    fragments: OnceCell<Vec<Fragment>>,
}

impl FragmentFinder {
    pub fn new(
        region: GenomicInterval,
        profile: PositionProfile,
        config: &FragmapConfig,
    ) -> Result<Self> {
        if profile.len() != region.len() {
            return Err(FragmapError::ContractViolation(format!(
                "profile of {} positions does not match region {} ({} positions)",
                profile.len(),
                region,
                region.len()
            )));
        }

        Ok(FragmentFinder {
            region,
            profile,
            detector: PeakDetector::from_config(&config.peaks),
            reconstructor: FragmentReconstructor::from_config(&config.fragments),
            fragments: OnceCell::new(),
        })
    }

    pub fn region(&self) -> &GenomicInterval {
        &self.region
    }

    pub fn profile(&self) -> &PositionProfile {
        &self.profile
    }

    pub fn start_peaks(&self) -> Result<Vec<Peak>> {
        self.detector.detect(
            self.profile.start_counts(),
            self.profile.start_avg_length(),
        )
    }

    pub fn end_peaks(&self) -> Result<Vec<Peak>> {
        self.detector
            .detect(self.profile.end_counts(), self.profile.end_avg_length())
    }

    ///
    /// The region's fragments, ordered by start.
    ///
    pub fn fragments(&self) -> Result<&[Fragment]> {
        let fragments = self.fragments.get_or_try_init(|| {
            let start_peaks = self.start_peaks()?;
            let end_peaks = self.end_peaks()?;
            log::debug!(
                "{}: {} start peaks, {} end peaks",
                self.region,
                start_peaks.len(),
                end_peaks.len()
            );

            self.reconstructor.reconstruct(
                &start_peaks,
                &end_peaks,
                &self.profile,
                self.region.start(),
            )
        })?;

        Ok(fragments.as_slice())
    }

    pub fn iter(&self) -> Result<std::slice::Iter<'_, Fragment>> {
        Ok(self.fragments()?.iter())
    }

    ///
    /// Give up the cached fragments, computing them if needed.
    ///
    pub fn into_fragments(self) -> Result<Vec<Fragment>> {
        self.fragments()?;
        Ok(self.fragments.into_inner().unwrap_or_default())
    }
}
