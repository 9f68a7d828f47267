//! Per-primitive geometry capability and the segment sum type.

use super::arc::Arc;
use super::cubic::CubicBezier;
use super::line::Line;
use super::quad::QuadBezier;
use crate::model::{BBox, Vec2};
use serde::{Deserialize, Serialize};

/// Geometry every drawable primitive supports over its local `t ∈ [0, 1]`.
pub trait Primitive {
    fn start(&self) -> Vec2;
    fn end(&self) -> Vec2;
    fn point(&self, t: f64) -> Vec2;
    /// Tight axis-aligned bounds.
    fn bbox(&self) -> BBox;
    /// The piece between `t0` and `t1`; callers guarantee `t0 < t1`.
    fn split(&self, t0: f64, t1: f64) -> Self
    where
        Self: Sized;
    /// Append `(t, point)` for the end of each flat piece, excluding `t = 0`.
    fn flatten(&self, tol: f64, out: &mut Vec<(f64, Vec2)>);
    /// Append the drawing command that continues from `start()`.
    fn write_path_data(&self, out: &mut String);
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    Line(Line),
    Quad(QuadBezier),
    Cubic(CubicBezier),
    Arc(Arc),
}

macro_rules! dispatch {
    ($self:ident, $s:ident => $e:expr) => {
        match $self {
            Segment::Line($s) => $e,
            Segment::Quad($s) => $e,
            Segment::Cubic($s) => $e,
            Segment::Arc($s) => $e,
        }
    };
}

impl Primitive for Segment {
    fn start(&self) -> Vec2 { dispatch!(self, s => s.start()) }
    fn end(&self) -> Vec2 { dispatch!(self, s => s.end()) }
    fn point(&self, t: f64) -> Vec2 { dispatch!(self, s => s.point(t)) }
    fn bbox(&self) -> BBox { dispatch!(self, s => s.bbox()) }

    fn split(&self, t0: f64, t1: f64) -> Self {
        match self {
            Segment::Line(s) => Segment::Line(s.split(t0, t1)),
            Segment::Quad(s) => Segment::Quad(s.split(t0, t1)),
            Segment::Cubic(s) => Segment::Cubic(s.split(t0, t1)),
            Segment::Arc(s) => Segment::Arc(s.split(t0, t1)),
        }
    }

    fn flatten(&self, tol: f64, out: &mut Vec<(f64, Vec2)>) {
        dispatch!(self, s => s.flatten(tol, out))
    }

    fn write_path_data(&self, out: &mut String) {
        dispatch!(self, s => s.write_path_data(out))
    }
}

impl From<Line> for Segment {
    fn from(s: Line) -> Self { Segment::Line(s) }
}

impl From<QuadBezier> for Segment {
    fn from(s: QuadBezier) -> Self { Segment::Quad(s) }
}

impl From<CubicBezier> for Segment {
    fn from(s: CubicBezier) -> Self { Segment::Cubic(s) }
}

impl From<Arc> for Segment {
    fn from(s: Arc) -> Self { Segment::Arc(s) }
}
