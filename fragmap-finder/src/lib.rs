//! # Fragment calling for small RNA-seq alignments
//!
//! This crate turns aligned reads into precursor regions and, within each
//! region, into fragments: the recurring, well defined sub-sequences that
//! processed small non-coding RNAs leave behind.
//!
//! The steps, in order:
//! 1. [segment::RegionSegmenter] merges the read envelopes of a chromosome into padded regions.
//! 2. [profile::PositionProfile] counts read starts and ends at every position of a region.
//! 3. [peaks::PeakDetector] picks the dominant start and end positions.
//! 4. [reconstruct::FragmentReconstructor] pairs start peaks with end peaks.
//!
//! [finder::FragmentFinder] wraps steps 2 to 4 for one region and [annotate::Annotator]
//! runs them over many regions in parallel.
//!
//! ## Example
//! ```rust
//! use fragmap_core::FragmapConfig;
//! use fragmap_core::models::{GenomicInterval, ReadSpan};
//! use fragmap_finder::annotate::call_region;
//!
//! let region = GenomicInterval::new("chr1", 0, 99).unwrap();
//! let reads = vec![ReadSpan { start: 10, end: 31 }; 5];
//!
//! let fragments = call_region(&region, &reads, &FragmapConfig::default()).unwrap();
//! assert_eq!(fragments.len(), 1);
//! assert_eq!(fragments[0].len(), 22);
//! ```
pub mod annotate;
pub mod finder;
pub mod peaks;
pub mod profile;
pub mod reconstruct;
pub mod segment;

pub use annotate::{Annotator, RegionFragments};
pub use finder::FragmentFinder;
