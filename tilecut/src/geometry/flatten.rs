// Adaptive flattening into parameter-tagged polylines.
//
// Every routine appends `(t, point)` pairs for the END of each flat piece;
// the caller owns the starting point at t = 0.

use super::cubic::CubicBezier;
use super::math::dist_point_to_seg_sq;
use super::primitive::Primitive;
use super::tolerance::{MAX_FLATTEN_DEPTH, MIN_FLATTEN_SPLITS};
use crate::model::Vec2;

pub fn flatten_cubic(out: &mut Vec<(f64, Vec2)>, c: &CubicBezier, t0: f64, t1: f64, tol: f64, depth: u32) {
    let d1 = dist_point_to_seg_sq(c.p1, c.p0, c.p3);
    let d2 = dist_point_to_seg_sq(c.p2, c.p0, c.p3);
    if d1.max(d2) <= tol * tol || depth > MAX_FLATTEN_DEPTH {
        out.push((t1, c.p3));
        return;
    }
    let tm = 0.5 * (t0 + t1);
    let (left, right) = c.split_at(0.5);
    flatten_cubic(out, &left, t0, tm, tol, depth + 1);
    flatten_cubic(out, &right, tm, t1, tol, depth + 1);
}

/// Flatten any primitive by bisecting its parameter range until the quarter
/// and mid samples sit within `tol` of the chord.
pub fn flatten_by_param<P: Primitive + ?Sized>(p: &P, tol: f64, out: &mut Vec<(f64, Vec2)>) {
    let n = MIN_FLATTEN_SPLITS;
    let mut prev = (0.0, p.start());
    for i in 1..=n {
        let t = i as f64 / n as f64;
        let next = (t, if i == n { p.end() } else { p.point(t) });
        subdivide(p, prev, next, tol, 0, out);
        prev = next;
    }
}

fn subdivide<P: Primitive + ?Sized>(
    p: &P,
    a: (f64, Vec2),
    b: (f64, Vec2),
    tol: f64,
    depth: u32,
    out: &mut Vec<(f64, Vec2)>,
) {
    let tol2 = tol * tol;
    let flat = [0.25, 0.5, 0.75].iter().all(|f| {
        let s = p.point(a.0 + f * (b.0 - a.0));
        dist_point_to_seg_sq(s, a.1, b.1) <= tol2
    });
    if flat || depth > MAX_FLATTEN_DEPTH {
        out.push(b);
        return;
    }
    let tm = 0.5 * (a.0 + b.0);
    let m = (tm, p.point(tm));
    subdivide(p, a, m, tol, depth + 1, out);
    subdivide(p, m, b, tol, depth + 1, out);
}
