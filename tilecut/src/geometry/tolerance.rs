// Centralized tolerances and helpers for robust geometry

pub const EPS_POS: f64 = 1e-9;            // point coincidence threshold (user units)
pub const EPS_LEN: f64 = 1e-12;           // zero-length vector threshold
pub const EPS_DENOM: f64 = 1e-12;         // denominator guard for LS/ratios
pub const EPS_PARAM: f64 = 1e-9;          // two curve parameters closer than this are one hit
pub const EPS_CLOSED: f64 = 1e-6;         // start/end gap still treated as a closed curve

// Parameter bracket around each boundary crossing (normalized curve units)
pub const DEFAULT_BRACKET: f64 = 0.0002;

// Flattening
pub const DEFAULT_FLATTEN_TOL: f64 = 0.01;
pub const MAX_FLATTEN_DEPTH: u32 = 16;
pub const MIN_FLATTEN_SPLITS: u32 = 4;     // curved primitives start from this many pieces

// Bisection steps when refining a crossing on the exact curve
pub const REFINE_ITERS: u32 = 48;

// Written sizes and viewBox numbers are rounded to this many decimals
pub const OUTPUT_DECIMALS: i32 = 9;

#[inline] pub fn near_zero(x: f64, eps: f64) -> bool { x.abs() <= eps }

#[inline]
pub fn safe_div(num: f64, den: f64, fallback: f64) -> f64 {
    if den.abs() <= EPS_DENOM { fallback } else { num / den }
}

/// Drop float noise such as `33.10000000000001` before a number is written
/// back to markup. Magnitudes too large to carry the decimals pass through.
#[inline]
pub fn round_output(v: f64) -> f64 {
    let scale = 10f64.powi(OUTPUT_DECIMALS);
    let scaled = v * scale;
    if !scaled.is_finite() || scaled.abs() >= 2f64.powi(52) { v } else { scaled.round() / scale }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_output_removes_subtraction_noise() {
        let x = 10.3;
        assert_eq!(round_output((x + 33.1) - x), 33.1);
        assert_eq!(round_output(640.0 * (17.899999999999995 / 17.9)), 640.0);
        assert_eq!(round_output(0.1 + 0.2), 0.3);
        assert_eq!(round_output(479.9), 479.9);
        assert_eq!(round_output(1e300), 1e300);
    }
}
