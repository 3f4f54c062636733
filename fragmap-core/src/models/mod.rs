pub mod fragment;
pub mod interval;
pub mod span;

// re-export for cleaner imports
pub use self::fragment::{Fragment, FragmentRecord, fragment_id};
pub use self::interval::GenomicInterval;
pub use self::span::ReadSpan;
