use super::tolerance::{near_zero, EPS_DENOM};
use crate::model::Vec2;

pub fn seg_distance_sq(p: Vec2, a: Vec2, b: Vec2) -> (f64, f64) {
    let vx = b.x - a.x; let vy = b.y - a.y;
    let wx = p.x - a.x; let wy = p.y - a.y;
    let vv = vx*vx + vy*vy;
    let t = if vv > 0.0 { ((wx*vx + wy*vy) / vv).clamp(0.0, 1.0) } else { 0.0 };
    let dx = p.x - (a.x + t * vx); let dy = p.y - (a.y + t * vy);
    (dx*dx + dy*dy, t)
}

pub fn dist_point_to_seg_sq(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    seg_distance_sq(p, a, b).0
}

/// Signed area of the triangle (a, b, c), doubled.
#[inline]
pub fn orient(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Real roots of `a t^2 + b t + c` that fall strictly inside (0, 1).
///
/// Degrades to the linear case when `a` vanishes.
pub fn unit_roots_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(2);
    if near_zero(a, EPS_DENOM) {
        if !near_zero(b, EPS_DENOM) {
            out.push(-c / b);
        }
    } else {
        let disc = b * b - 4.0 * a * c;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            out.push((-b + sq) / (2.0 * a));
            out.push((-b - sq) / (2.0 * a));
        }
    }
    out.retain(|t| *t > 0.0 && *t < 1.0);
    out
}
