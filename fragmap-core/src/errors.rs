use thiserror::Error;

///
/// Errors raised while annotating fragments.
///
/// Variants fall in three groups: input errors (bad files, unknown
/// chromosomes, malformed intervals), configuration errors (rejected before
/// any region is processed) and contract violations (internal bugs, never
/// recovered from).
///
#[derive(Error, Debug)]
pub enum FragmapError {
    #[error("Unknown reference sequence: {0}")]
    UnknownChromosome(String),

    #[error("Malformed interval {chrom}:{start}-{end}: end precedes start")]
    MalformedInterval { chrom: String, start: u32, end: u32 },

    #[error("Malformed read span {start}-{end}: end precedes start")]
    MalformedSpan { start: u32, end: u32 },

    #[error("No index found for {0}. Create one first (e.g. `samtools index` / `samtools faidx`)")]
    MissingIndex(String),

    #[error("Unsupported input file type: {0}")]
    UnsupportedInput(String),

    #[error("Error parsing line {line} of {path}: {reason}")]
    ParseError {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FragmapError {
    /// Errors that must abort the whole run instead of skipping a single region.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FragmapError::ContractViolation(_) | FragmapError::InvalidConfig(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FragmapError>;
