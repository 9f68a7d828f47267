//! Physical length values such as `width="10.5cm"`.

use crate::error::DimensionError;
use crate::geometry::tolerance::round_output;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Units whose magnitude is written back with full precision.
pub const PHYSICAL_UNITS: [&str; 3] = ["cm", "in", "mm"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub magnitude: f64,
    pub unit: Option<String>,
}

impl Dimension {
    pub fn new(magnitude: f64, unit: Option<&str>) -> Self {
        Self { magnitude, unit: unit.map(str::to_owned) }
    }

    /// Same unit, magnitude multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self { magnitude: self.magnitude * factor, unit: self.unit.clone() }
    }
}

/// Split a length into magnitude and unit.
///
/// A value that is a plain number has no unit; otherwise the last two
/// characters are the unit.
pub fn parse(s: &str) -> Result<Dimension, DimensionError> {
    let s = s.trim();
    if let Ok(v) = s.parse::<f64>() {
        return Ok(Dimension { magnitude: v, unit: None });
    }
    let malformed = || DimensionError::Malformed { value: s.to_owned() };
    let split = s.char_indices().rev().nth(1).map(|(i, _)| i).ok_or_else(malformed)?;
    let (num, unit) = s.split_at(split);
    let magnitude = num.trim_end().parse::<f64>().map_err(|_| malformed())?;
    Ok(Dimension { magnitude, unit: Some(unit.to_owned()) })
}

/// Render a length back to attribute text.
///
/// Unit-less and `px` values are document pixels and are truncated to an
/// integer; `cm`, `in` and `mm` keep their decimals. Float noise from
/// scaling is rounded off first, so `479.99999999999994px` writes as
/// `480px`.
pub fn format(d: &Dimension) -> Result<String, DimensionError> {
    let m = round_output(d.magnitude);
    match d.unit.as_deref() {
        None => Ok(format!("{}", m.trunc() as i64)),
        Some("px") => Ok(format!("{}px", m.trunc() as i64)),
        Some(u) if PHYSICAL_UNITS.contains(&u) => Ok(format!("{}{}", m, u)),
        Some(u) => Err(DimensionError::UnsupportedUnit { unit: u.to_owned() }),
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unit {
            Some(u) => write!(f, "{}{}", self.magnitude, u),
            None => write!(f, "{}", self.magnitude),
        }
    }
}
