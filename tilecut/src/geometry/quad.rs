use super::cubic::CubicBezier;
use super::flatten::flatten_cubic;
use super::primitive::Primitive;
use super::tolerance::safe_div;
use crate::model::{BBox, Vec2};
use serde::{Deserialize, Serialize};

/// Quadratic Bézier: start, control, end.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuadBezier {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
}

impl QuadBezier {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2) -> Self {
        Self { p0, p1, p2 }
    }

    pub fn eval(&self, t: f64) -> Vec2 {
        let mt = 1.0 - t;
        Vec2 {
            x: mt * mt * self.p0.x + 2.0 * mt * t * self.p1.x + t * t * self.p2.x,
            y: mt * mt * self.p0.y + 2.0 * mt * t * self.p1.y + t * t * self.p2.y,
        }
    }

    pub fn split_at(&self, t: f64) -> (QuadBezier, QuadBezier) {
        let p01 = self.p0.lerp(self.p1, t);
        let p12 = self.p1.lerp(self.p2, t);
        let mid = p01.lerp(p12, t);
        (QuadBezier::new(self.p0, p01, mid), QuadBezier::new(mid, p12, self.p2))
    }

    /// Exact degree elevation.
    pub fn to_cubic(&self) -> CubicBezier {
        let c1 = self.p0.lerp(self.p1, 2.0 / 3.0);
        let c2 = self.p2.lerp(self.p1, 2.0 / 3.0);
        CubicBezier::new(self.p0, c1, c2, self.p2)
    }
}

impl Primitive for QuadBezier {
    fn start(&self) -> Vec2 { self.p0 }
    fn end(&self) -> Vec2 { self.p2 }
    fn point(&self, t: f64) -> Vec2 { self.eval(t) }

    fn bbox(&self) -> BBox {
        // derivative is linear; one candidate extremum per axis
        let axis = |a: f64, b: f64, c: f64| safe_div(a - b, a - 2.0 * b + c, -1.0);
        [axis(self.p0.x, self.p1.x, self.p2.x), axis(self.p0.y, self.p1.y, self.p2.y)]
            .into_iter()
            .filter(|t| *t > 0.0 && *t < 1.0)
            .fold(BBox::from_point(self.p0).include(self.p2), |b, t| b.include(self.eval(t)))
    }

    fn split(&self, t0: f64, t1: f64) -> Self {
        if t0 >= t1 {
            let p = self.eval(t0);
            return QuadBezier::new(p, p, p);
        }
        if t1 <= 0.0 {
            return QuadBezier::new(self.p0, self.p0, self.p0);
        }
        let (head, _) = self.split_at(t1);
        let (_, mid) = head.split_at(t0 / t1);
        QuadBezier { p0: self.eval(t0), p2: self.eval(t1), ..mid }
    }

    fn flatten(&self, tol: f64, out: &mut Vec<(f64, Vec2)>) {
        flatten_cubic(out, &self.to_cubic(), 0.0, 1.0, tol, 0);
    }

    fn write_path_data(&self, out: &mut String) {
        out.push_str(&format!("Q {} {} {} {}", self.p1.x, self.p1.y, self.p2.x, self.p2.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevation_matches_original() {
        let q = QuadBezier::new(Vec2::new(0.0, 0.0), Vec2::new(5.0, 10.0), Vec2::new(10.0, 0.0));
        let c = q.to_cubic();
        for i in 0..=8 {
            let t = i as f64 / 8.0;
            assert!(q.eval(t).approx_eq(c.eval(t), 1e-9));
        }
    }

    #[test]
    fn bbox_peak() {
        let q = QuadBezier::new(Vec2::new(0.0, 0.0), Vec2::new(5.0, 10.0), Vec2::new(10.0, 0.0));
        let b = q.bbox();
        assert!((b.ymax - 5.0).abs() < 1e-12);
        assert_eq!(b.xmax, 10.0);
    }

    #[test]
    fn split_keeps_points_on_curve() {
        let q = QuadBezier::new(Vec2::new(0.0, 0.0), Vec2::new(5.0, 10.0), Vec2::new(10.0, 0.0));
        let s = q.split(0.2, 0.6);
        assert!(s.p0.approx_eq(q.eval(0.2), 1e-12));
        assert!(s.p2.approx_eq(q.eval(0.6), 1e-12));
        assert!(s.eval(0.5).approx_eq(q.eval(0.4), 1e-9));
    }
}
