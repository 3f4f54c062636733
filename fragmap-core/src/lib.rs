//! # Core models for fragmap
//!
//! Shared building blocks of the fragmap workspace: the genomic interval, read span and fragment
//! models, the run configuration, the error type and the capability traits the annotation
//! pipeline consumes ([traits::AlignmentSpanSource], [traits::ReferenceLookup]).
//!
pub mod config;
pub mod consts;
pub mod errors;
pub mod models;
pub mod traits;
pub mod utils;

pub use config::FragmapConfig;
pub use errors::{FragmapError, Result};
