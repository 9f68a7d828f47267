//! Curves: immutable segment sequences with a normalized global parameter.
//!
//! A curve with `n` segments maps `T ∈ [0, 1]` uniformly onto its segments,
//! segment `i` covering `[i/n, (i+1)/n]`.

use crate::error::GeometryError;
use crate::geometry::line::Line;
use crate::geometry::primitive::{Primitive, Segment};
use crate::geometry::tolerance::{EPS_CLOSED, EPS_PARAM};
use crate::model::{BBox, Vec2};
use crate::svg;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    segments: Vec<Segment>,
}

impl Curve {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Closed axis-aligned rectangle as four line segments.
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        let a = Vec2::new(x, y);
        let b = Vec2::new(x + width, y);
        let c = Vec2::new(x + width, y + height);
        let d = Vec2::new(x, y + height);
        Self::polygon(&[a, b, c, d])
    }

    /// Closed polygon through the given vertices.
    pub fn polygon(points: &[Vec2]) -> Self {
        let n = points.len();
        let segments = (0..n)
            .map(|i| Line::new(points[i], points[(i + 1) % n]).into())
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn start(&self) -> Option<Vec2> {
        self.segments.first().map(|s| s.start())
    }

    pub fn end(&self) -> Option<Vec2> {
        self.segments.last().map(|s| s.end())
    }

    /// True when every sub-path ends where it started.
    pub fn is_closed(&self) -> bool {
        if self.segments.is_empty() {
            return false;
        }
        let mut sub_start = self.segments[0].start();
        for w in self.segments.windows(2) {
            if !w[0].end().approx_eq(w[1].start(), EPS_CLOSED) {
                if !w[0].end().approx_eq(sub_start, EPS_CLOSED) {
                    return false;
                }
                sub_start = w[1].start();
            }
        }
        self.segments[self.segments.len() - 1].end().approx_eq(sub_start, EPS_CLOSED)
    }

    pub fn bbox(&self) -> Option<BBox> {
        self.segments.iter().map(|s| s.bbox()).reduce(BBox::union)
    }

    /// Map a global parameter to `(segment index, local t)`.
    pub fn locate(&self, t: f64) -> Option<(usize, f64)> {
        let n = self.segments.len();
        if n == 0 {
            return None;
        }
        let scaled = t.clamp(0.0, 1.0) * n as f64;
        let i = (scaled.floor() as usize).min(n - 1);
        Some((i, scaled - i as f64))
    }

    pub fn point(&self, t: f64) -> Option<Vec2> {
        self.locate(t).map(|(i, lt)| self.segments[i].point(lt))
    }

    /// The piece of the curve between global parameters `start < stop`.
    pub fn subcurve(&self, start: f64, stop: f64) -> Result<Curve, GeometryError> {
        let n = self.segments.len();
        if n == 0 {
            return Err(GeometryError::EmptyCurve);
        }
        if !(start >= -EPS_PARAM && stop <= 1.0 + EPS_PARAM && stop - start > EPS_PARAM) {
            return Err(GeometryError::EmptyRange { start, stop });
        }
        let nf = n as f64;
        let s = start.max(0.0) * nf;
        let e = stop.min(1.0) * nf;
        let first = (s.floor() as usize).min(n - 1);
        // An end landing exactly on a segment boundary belongs to the previous segment
        let last = ((e.ceil() as usize).max(1) - 1).min(n - 1).max(first);

        let mut segments = Vec::with_capacity(last - first + 1);
        for i in first..=last {
            let t0 = if i == first { s - i as f64 } else { 0.0 };
            let t1 = if i == last { (e - i as f64).min(1.0) } else { 1.0 };
            if t1 - t0 <= EPS_PARAM {
                continue;
            }
            let seg = &self.segments[i];
            if t0 <= 0.0 && t1 >= 1.0 {
                segments.push(*seg);
            } else {
                segments.push(seg.split(t0.max(0.0), t1));
            }
        }
        if segments.is_empty() {
            return Err(GeometryError::EmptyRange { start, stop });
        }
        Ok(Curve { segments })
    }

    /// Parameter-tagged polyline: `(T, point)` from `T = 0` to `T = 1`.
    ///
    /// A jump between sub-paths shows up as two consecutive entries with the
    /// same `T`; [`Curve::flat_pieces`] skips those.
    pub fn flatten(&self, tol: f64) -> Vec<(f64, Vec2)> {
        let n = self.segments.len() as f64;
        let mut out = Vec::new();
        let mut local = Vec::new();
        for (i, seg) in self.segments.iter().enumerate() {
            out.push((i as f64 / n, seg.start()));
            local.clear();
            seg.flatten(tol, &mut local);
            // drop the final point; the next segment start (or the tail push) covers it
            if let Some((_, last)) = local.pop() {
                out.extend(local.iter().map(|&(t, p)| ((i as f64 + t) / n, p)));
                if i + 1 == self.segments.len() {
                    out.push((1.0, last));
                } else if !last.approx_eq(self.segments[i + 1].start(), EPS_CLOSED) {
                    out.push(((i + 1) as f64 / n, last));
                }
            }
        }
        out
    }

    /// Flat line pieces `((T0, P0), (T1, P1))`, excluding sub-path jumps.
    pub fn flat_pieces(&self, tol: f64) -> Vec<((f64, Vec2), (f64, Vec2))> {
        self.flatten(tol)
            .windows(2)
            .filter(|w| w[1].0 > w[0].0)
            .map(|w| (w[0], w[1]))
            .collect()
    }

    pub fn to_path_data(&self) -> String {
        svg::write_path_data(self)
    }
}

impl From<Vec<Segment>> for Curve {
    fn from(segments: Vec<Segment>) -> Self {
        Curve::new(segments)
    }
}
