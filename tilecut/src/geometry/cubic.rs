//! Cubic Bézier curve utilities for evaluation, bounds and subdivision.
//!
//! These helpers are used by the clipper to cut curves at boundary
//! crossings and rebuild the retained pieces.

use super::flatten::flatten_cubic;
use super::math::unit_roots_quadratic;
use super::primitive::Primitive;
use crate::model::{BBox, Vec2};
use serde::{Deserialize, Serialize};

/// Control points of a cubic Bézier curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub p0: Vec2, // Start point
    pub p1: Vec2, // First control point
    pub p2: Vec2, // Second control point
    pub p3: Vec2, // End point
}

impl CubicBezier {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluate the curve at parameter t ∈ [0, 1].
    pub fn eval(&self, t: f64) -> Vec2 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        Vec2 {
            x: mt3 * self.p0.x + 3.0 * mt2 * t * self.p1.x + 3.0 * mt * t2 * self.p2.x + t3 * self.p3.x,
            y: mt3 * self.p0.y + 3.0 * mt2 * t * self.p1.y + 3.0 * mt * t2 * self.p2.y + t3 * self.p3.y,
        }
    }

    /// Split the curve at parameter t using de Casteljau subdivision.
    ///
    /// Returns two cubic curves: the first from 0..t, the second from t..1.
    pub fn split_at(&self, t: f64) -> (CubicBezier, CubicBezier) {
        let p01 = self.p0.lerp(self.p1, t);
        let p12 = self.p1.lerp(self.p2, t);
        let p23 = self.p2.lerp(self.p3, t);

        let p012 = p01.lerp(p12, t);
        let p123 = p12.lerp(p23, t);

        let p0123 = p012.lerp(p123, t); // The split point

        let first = CubicBezier::new(self.p0, p01, p012, p0123);
        let second = CubicBezier::new(p0123, p123, p23, self.p3);

        (first, second)
    }

    /// Extract a portion of the curve from t0 to t1.
    pub fn subcurve(&self, t0: f64, t1: f64) -> CubicBezier {
        if t0 >= t1 {
            let p = self.eval(t0);
            return CubicBezier::new(p, p, p, p);
        }
        if t1 <= 0.0 {
            return CubicBezier::new(self.p0, self.p0, self.p0, self.p0);
        }

        // First split at t1, take first part
        let (curve_to_t1, _) = self.split_at(t1);

        // Then split at t0 relative to [0, t1]
        let (_, result) = curve_to_t1.split_at(t0 / t1);

        // Pin the ends to the exact curve points
        CubicBezier { p0: self.eval(t0), p3: self.eval(t1), ..result }
    }

    /// Parameters in (0, 1) where x' or y' vanishes.
    fn extrema(&self) -> Vec<f64> {
        let axis = |a: f64, b: f64, c: f64, d: f64| {
            unit_roots_quadratic(3.0 * (-a + 3.0 * b - 3.0 * c + d), 6.0 * (a - 2.0 * b + c), 3.0 * (b - a))
        };
        let mut ts = axis(self.p0.x, self.p1.x, self.p2.x, self.p3.x);
        ts.extend(axis(self.p0.y, self.p1.y, self.p2.y, self.p3.y));
        ts
    }
}

impl Primitive for CubicBezier {
    fn start(&self) -> Vec2 { self.p0 }
    fn end(&self) -> Vec2 { self.p3 }
    fn point(&self, t: f64) -> Vec2 { self.eval(t) }

    fn bbox(&self) -> BBox {
        self.extrema()
            .into_iter()
            .fold(BBox::from_point(self.p0).include(self.p3), |b, t| b.include(self.eval(t)))
    }

    fn split(&self, t0: f64, t1: f64) -> Self {
        self.subcurve(t0, t1)
    }

    fn flatten(&self, tol: f64, out: &mut Vec<(f64, Vec2)>) {
        flatten_cubic(out, self, 0.0, 1.0, tol, 0);
    }

    fn write_path_data(&self, out: &mut String) {
        out.push_str(&format!(
            "C {} {} {} {} {} {}",
            self.p1.x, self.p1.y, self.p2.x, self.p2.y, self.p3.x, self.p3.y
        ));
    }
}
