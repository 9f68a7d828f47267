// Robust segment-segment intersection with tolerances.
// Classifies proper crossings, endpoint touches, and collinear overlaps.

use super::math::orient;
use crate::model::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegIntersection {
    None,
    // Proper interior intersection (not at endpoints within tolerance)
    Proper { t: f64, u: f64, x: f64, y: f64 },
    // Touch at endpoints (may be both endpoints). t/u may be 0 or 1 within tolerance
    Touch { t: f64, u: f64, x: f64, y: f64 },
    // Collinear overlapping span: parameter ranges on each segment (inclusive, ordered)
    CollinearOverlap { t0: f64, t1: f64, u0: f64, u1: f64 },
}

#[inline]
fn within_eps(x: f64, eps: f64) -> bool { x.abs() <= eps }

#[inline]
fn clamp01f64(x: f64) -> f64 { x.clamp(0.0, 1.0) }

// Project segment AB and CD onto the dominant axis and compute parameter ranges for overlap.
fn collinear_overlap(a: Vec2, b: Vec2, c: Vec2, d: Vec2, eps: f64) -> SegIntersection {
    // Choose projection axis with larger extent on AB
    let x_major = (b.x - a.x).abs() >= (b.y - a.y).abs();
    let proj = |p: Vec2| if x_major { p.x } else { p.y };
    let (pa1, pa2, pc1, pc2) = (proj(a), proj(b), proj(c), proj(d));
    let len_ab = pa2 - pa1;
    let len_cd = pc2 - pc1;
    if within_eps(len_ab, eps) {
        // AB is a point: treat as touch if it lies on CD
        let u = if within_eps(len_cd, eps) { 0.0 } else { (pa1 - pc1) / len_cd };
        if !(-eps..=1.0 + eps).contains(&u) {
            return SegIntersection::None;
        }
        return SegIntersection::Touch { t: 0.0, u: clamp01f64(u), x: a.x, y: a.y };
    }
    let t_c1 = (pc1 - pa1) / len_ab; // where C/D project onto AB in t-space
    let t_c2 = (pc2 - pa1) / len_ab;
    let lo = t_c1.min(t_c2);
    let hi = t_c1.max(t_c2);
    // Intersect with [0,1]
    if hi < -eps || lo > 1.0 + eps { return SegIntersection::None; }
    let lo = lo.max(0.0);
    let hi = hi.min(1.0);
    if hi < lo { return SegIntersection::None; }
    // Map back to u-range linearly along CD
    let to_u = |t: f64| if within_eps(len_cd, eps) { 0.0 } else { (pa1 + t * len_ab - pc1) / len_cd };
    let (u0, u1) = (to_u(lo), to_u(hi));
    let (u0, u1) = if u0 <= u1 { (u0, u1) } else { (u1, u0) };
    SegIntersection::CollinearOverlap { t0: lo, t1: hi, u0: clamp01f64(u0), u1: clamp01f64(u1) }
}

pub fn intersect_segments(a: Vec2, b: Vec2, c: Vec2, d: Vec2, eps_pos: f64, eps_denom: f64) -> SegIntersection {
    let r_x = b.x - a.x; let r_y = b.y - a.y;
    let s_x = d.x - c.x; let s_y = d.y - c.y;
    let rxs = r_x * s_y - r_y * s_x;

    if within_eps(rxs, eps_denom) {
        // Parallel: only collinear spans can meet
        let scale = (r_x.abs() + r_y.abs()).max(s_x.abs() + s_y.abs()).max(1.0);
        if within_eps(orient(a, b, c), eps_pos * scale) && within_eps(orient(c, d, a), eps_pos * scale) {
            return collinear_overlap(a, b, c, d, eps_pos);
        }
        return SegIntersection::None;
    }

    let q_p_x = c.x - a.x; let q_p_y = c.y - a.y;
    let t = (q_p_x * s_y - q_p_y * s_x) / rxs;
    let u = (q_p_x * r_y - q_p_y * r_x) / rxs;
    if t < -eps_pos || t > 1.0 + eps_pos || u < -eps_pos || u > 1.0 + eps_pos {
        return SegIntersection::None;
    }
    let x = a.x + t * r_x;
    let y = a.y + t * r_y;

    // Classify as touch vs proper using endpoint tolerance
    let is_touch = within_eps(t, eps_pos) || within_eps(1.0 - t, eps_pos) || within_eps(u, eps_pos) || within_eps(1.0 - u, eps_pos);

    if is_touch {
        SegIntersection::Touch { t: clamp01f64(t), u: clamp01f64(u), x, y }
    } else {
        SegIntersection::Proper { t, u, x, y }
    }
}
