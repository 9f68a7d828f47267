//! Curve-level geometry capability used by the clipper.
//!
//! The clipper only talks to [`GeometryEngine`]; [`FlatteningEngine`] is the
//! default implementation, working on parameter-tagged polylines and
//! refining crossings on the exact curve.

use crate::curve::Curve;
use crate::error::GeometryError;
use crate::geometry::intersect::{intersect_segments, SegIntersection};
use crate::geometry::math::orient;
use crate::geometry::primitive::Primitive;
use crate::geometry::tolerance::{DEFAULT_FLATTEN_TOL, EPS_DENOM, EPS_PARAM, EPS_POS, REFINE_ITERS};
use crate::geometry::winding::point_in_region_nonzero;
use crate::model::{BBox, Vec2};

pub trait GeometryEngine {
    fn bbox(&self, curve: &Curve) -> Option<BBox>;

    /// Crossings of `a` with `b` as `(param on a, param on b)`, ordered by
    /// the param on `a`.
    fn intersect(&self, a: &Curve, b: &Curve) -> Vec<(f64, f64)>;

    fn extract_subcurve(&self, curve: &Curve, start: f64, stop: f64) -> Result<Curve, GeometryError>;

    /// True when `curve` lies entirely inside the closed `boundary`.
    fn is_contained_by(&self, curve: &Curve, boundary: &Curve) -> bool;

    fn to_path_data(&self, curve: &Curve) -> String;
}

#[derive(Clone, Copy, Debug)]
pub struct FlatteningEngine {
    pub tolerance: f64,
}

impl Default for FlatteningEngine {
    fn default() -> Self {
        Self { tolerance: DEFAULT_FLATTEN_TOL }
    }
}

type Piece = ((f64, Vec2), (f64, Vec2));

fn piece_bbox(p: &Piece) -> BBox {
    BBox::from_point(p.0 .1).include(p.1 .1)
}

impl FlatteningEngine {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    // Bisect on the side of the b-piece's supporting line; the flattened
    // estimate is kept when the exact curve shows no sign change.
    fn refine(&self, curve: &Curve, t0: f64, t1: f64, estimate: f64, b0: Vec2, b1: Vec2) -> f64 {
        let side = |t: f64| curve.point(t).map_or(0.0, |p| orient(b0, b1, p));
        let (mut lo, mut hi) = (t0, t1);
        let mut f_lo = side(lo);
        let f_hi = side(hi);
        if f_lo == 0.0 {
            return lo;
        }
        if f_hi == 0.0 {
            return hi;
        }
        if f_lo.signum() == f_hi.signum() {
            return estimate;
        }
        for _ in 0..REFINE_ITERS {
            let mid = 0.5 * (lo + hi);
            let f_mid = side(mid);
            if f_mid == 0.0 {
                return mid;
            }
            if f_mid.signum() == f_lo.signum() {
                lo = mid;
                f_lo = f_mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }

    fn boundary_edges(&self, boundary: &Curve) -> Vec<(Vec2, Vec2)> {
        boundary.flat_pieces(self.tolerance).into_iter().map(|(a, b)| (a.1, b.1)).collect()
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

impl GeometryEngine for FlatteningEngine {
    fn bbox(&self, curve: &Curve) -> Option<BBox> {
        curve.bbox()
    }

    fn intersect(&self, a: &Curve, b: &Curve) -> Vec<(f64, f64)> {
        let pa = a.flat_pieces(self.tolerance);
        let pb = b.flat_pieces(self.tolerance);
        let pb_boxes: Vec<BBox> = pb.iter().map(piece_bbox).collect();

        let mut hits: Vec<(f64, f64)> = Vec::new();
        for ea in &pa {
            let ba = piece_bbox(ea);
            for (eb, bb) in pb.iter().zip(&pb_boxes) {
                if !ba.touches(bb, EPS_POS) {
                    continue;
                }
                let ((ta0, a0), (ta1, a1)) = *ea;
                let ((tb0, b0), (tb1, b1)) = *eb;
                match intersect_segments(a0, a1, b0, b1, EPS_POS, EPS_DENOM) {
                    SegIntersection::Proper { t, u, .. } | SegIntersection::Touch { t, u, .. } => {
                        let ta = self.refine(a, ta0, ta1, lerp(ta0, ta1, t), b0, b1);
                        hits.push((ta, lerp(tb0, tb1, u)));
                    }
                    SegIntersection::CollinearOverlap { t0, t1, u0, u1 } => {
                        hits.push((lerp(ta0, ta1, t0), lerp(tb0, tb1, u0)));
                        hits.push((lerp(ta0, ta1, t1), lerp(tb0, tb1, u1)));
                    }
                    SegIntersection::None => {}
                }
            }
        }

        hits.sort_by(|x, y| x.0.total_cmp(&y.0));
        hits.dedup_by(|next, kept| (next.0 - kept.0).abs() <= EPS_PARAM);
        hits
    }

    fn extract_subcurve(&self, curve: &Curve, start: f64, stop: f64) -> Result<Curve, GeometryError> {
        curve.subcurve(start, stop)
    }

    fn is_contained_by(&self, curve: &Curve, boundary: &Curve) -> bool {
        if curve.is_empty() || !boundary.is_closed() {
            return false;
        }
        match (curve.bbox(), boundary.bbox()) {
            (Some(cb), Some(bb)) if bb.contains_box(&cb, EPS_POS) => {}
            _ => return false,
        }
        if !self.intersect(curve, boundary).is_empty() {
            return false;
        }
        // No crossings, so each subpath is wholly on one side; probe its start.
        let edges = self.boundary_edges(boundary);
        let mut prev_end: Option<Vec2> = None;
        for seg in curve.segments() {
            let s = seg.start();
            if !prev_end.is_some_and(|p| p.approx_eq(s, EPS_POS)) && !point_in_region_nonzero(s, &edges) {
                return false;
            }
            prev_end = Some(seg.end());
        }
        true
    }

    fn to_path_data(&self, curve: &Curve) -> String {
        curve.to_path_data()
    }
}
