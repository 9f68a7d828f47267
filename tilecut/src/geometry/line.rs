use super::primitive::Primitive;
use crate::model::{BBox, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub p0: Vec2,
    pub p1: Vec2,
}

impl Line {
    pub fn new(p0: Vec2, p1: Vec2) -> Self {
        Self { p0, p1 }
    }
}

impl Primitive for Line {
    fn start(&self) -> Vec2 { self.p0 }
    fn end(&self) -> Vec2 { self.p1 }
    fn point(&self, t: f64) -> Vec2 { self.p0.lerp(self.p1, t) }
    fn bbox(&self) -> BBox { BBox::from_point(self.p0).include(self.p1) }

    fn split(&self, t0: f64, t1: f64) -> Self {
        Line::new(self.point(t0), self.point(t1))
    }

    // Already flat
    fn flatten(&self, _tol: f64, out: &mut Vec<(f64, Vec2)>) {
        out.push((1.0, self.p1));
    }

    fn write_path_data(&self, out: &mut String) {
        out.push_str(&format!("L {} {}", self.p1.x, self.p1.y));
    }
}
