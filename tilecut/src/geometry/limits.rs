// Centralized ingestion limits to harden against untrusted input (SVG/JSON)

// Document caps
pub const MAX_SOURCE_BYTES: usize = 64 * 1024 * 1024;
pub const MAX_ELEMENTS: usize = 200_000;

// Path data caps
pub const MAX_PATH_DATA_LEN: usize = 8 * 1024 * 1024; // 8 MB worth of characters in one 'd' string
pub const MAX_PATH_COMMANDS: usize = 200_000;
pub const MAX_PATH_SEGMENTS: usize = 500_000;

// Numeric bounds
pub const COORD_MIN: f64 = -10_000_000.0;
pub const COORD_MAX: f64 =  10_000_000.0;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }
