pub const FRAGMENT_ID_PREFIX: &str = "FM";

pub const DEFAULT_LEFT_PADDING: u32 = 8;
pub const DEFAULT_RIGHT_PADDING: u32 = 8;
pub const DEFAULT_MIN_COUNT: u32 = 3;
pub const DEFAULT_SUPPRESSION_WINDOW: usize = 3;
pub const DEFAULT_MIN_FRAGMENT_LENGTH: usize = 12;
pub const DEFAULT_MAX_FRAGMENT_LENGTH: usize = 200;
pub const DEFAULT_LENGTH_PENALTY: f64 = 1.0;

pub const DEFAULT_OFFSET_5P: u32 = 4;
pub const DEFAULT_OFFSET_3P: u32 = 4;
