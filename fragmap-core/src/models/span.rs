use std::cmp::Ordering;

use crate::errors::{FragmapError, Result};

/// Outer envelope of one aligned read: first aligned base to last aligned
/// base, 0-based and inclusive. Gaps inside the alignment are ignored.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub struct ReadSpan {
    pub start: u32,
    pub end: u32,
}

impl ReadSpan {
    pub fn new(start: u32, end: u32) -> Result<Self> {
        if end < start {
            return Err(FragmapError::MalformedSpan { start, end });
        }
        Ok(ReadSpan { start, end })
    }

    /// Full read length on the reference (`end - start + 1`).
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check if the span overlaps the inclusive range `[start, end]`
    #[inline]
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        self.start <= end && self.end >= start
    }
}

impl Ord for ReadSpan {
    #[inline]
    fn cmp(&self, other: &ReadSpan) -> Ordering {
        match self.start.cmp(&other.start) {
            Ordering::Equal => self.end.cmp(&other.end),
            ordering => ordering,
        }
    }
}

impl PartialOrd for ReadSpan {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
