//! Elliptical arc segments in SVG endpoint form.
//!
//! The endpoint parameters are converted once to center form so the arc
//! can be evaluated, bounded and cut by parameter like any other primitive.

use super::flatten::flatten_by_param;
use super::primitive::Primitive;
use super::tolerance::{EPS_LEN, EPS_POS};
use crate::model::{BBox, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub p0: Vec2,
    pub p1: Vec2,
    /// Radii after out-of-range correction.
    pub rx: f64,
    pub ry: f64,
    /// x-axis rotation in degrees.
    pub rotation: f64,
    pub large_arc: bool,
    pub sweep: bool,
    pub center: Vec2,
    pub theta1: f64,
    pub delta: f64,
}

fn vec_angle(ux: f64, uy: f64, vx: f64, vy: f64) -> f64 {
    (ux * vy - uy * vx).atan2(ux * vx + uy * vy)
}

impl Arc {
    /// Build from SVG arc parameters.
    ///
    /// Returns `None` when the arc degenerates: coincident endpoints draw
    /// nothing and a zero radius draws a straight line, both of which the
    /// caller handles.
    pub fn from_endpoints(
        p0: Vec2,
        rx: f64,
        ry: f64,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        p1: Vec2,
    ) -> Option<Arc> {
        if p0.approx_eq(p1, EPS_POS) {
            return None;
        }
        let mut rx = rx.abs();
        let mut ry = ry.abs();
        if rx <= EPS_LEN || ry <= EPS_LEN {
            return None;
        }
        let (sin_phi, cos_phi) = rotation.to_radians().sin_cos();
        let hx = (p0.x - p1.x) * 0.5;
        let hy = (p0.y - p1.y) * 0.5;
        let x1p = cos_phi * hx + sin_phi * hy;
        let y1p = -sin_phi * hx + cos_phi * hy;

        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let s = lambda.sqrt();
            rx *= s;
            ry *= s;
        }

        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let den = rx2 * y1p * y1p + ry2 * x1p * x1p;
        let num = rx2 * ry2 - den;
        let mut coef = if den > 0.0 { (num / den).max(0.0).sqrt() } else { 0.0 };
        if large_arc == sweep {
            coef = -coef;
        }
        let cxp = coef * rx * y1p / ry;
        let cyp = -coef * ry * x1p / rx;

        let center = Vec2 {
            x: cos_phi * cxp - sin_phi * cyp + (p0.x + p1.x) * 0.5,
            y: sin_phi * cxp + cos_phi * cyp + (p0.y + p1.y) * 0.5,
        };

        let ux = (x1p - cxp) / rx;
        let uy = (y1p - cyp) / ry;
        let vx = (-x1p - cxp) / rx;
        let vy = (-y1p - cyp) / ry;
        let theta1 = vec_angle(1.0, 0.0, ux, uy);
        let mut delta = vec_angle(ux, uy, vx, vy) % TAU;
        if !sweep && delta > 0.0 {
            delta -= TAU;
        } else if sweep && delta < 0.0 {
            delta += TAU;
        }

        Some(Arc { p0, p1, rx, ry, rotation, large_arc, sweep, center, theta1, delta })
    }

    fn at_angle(&self, theta: f64) -> Vec2 {
        let (sin_phi, cos_phi) = self.rotation.to_radians().sin_cos();
        let (s, c) = theta.sin_cos();
        Vec2 {
            x: self.center.x + self.rx * cos_phi * c - self.ry * sin_phi * s,
            y: self.center.y + self.rx * sin_phi * c + self.ry * cos_phi * s,
        }
    }

    /// Parameters in (0, 1) at which the arc hits an axis extreme.
    fn extrema(&self) -> Vec<f64> {
        let (sin_phi, cos_phi) = self.rotation.to_radians().sin_cos();
        let ax = (-self.ry * sin_phi).atan2(self.rx * cos_phi);
        let ay = (self.ry * cos_phi).atan2(self.rx * sin_phi);
        let mut ts = Vec::new();
        for base in [ax, ax + PI, ay, ay + PI] {
            for k in -2..=2 {
                let t = (base + TAU * k as f64 - self.theta1) / self.delta;
                if t > 0.0 && t < 1.0 {
                    ts.push(t);
                }
            }
        }
        ts
    }
}

impl Primitive for Arc {
    fn start(&self) -> Vec2 { self.p0 }
    fn end(&self) -> Vec2 { self.p1 }

    fn point(&self, t: f64) -> Vec2 {
        if t <= 0.0 {
            return self.p0;
        }
        if t >= 1.0 {
            return self.p1;
        }
        self.at_angle(self.theta1 + t * self.delta)
    }

    fn bbox(&self) -> BBox {
        self.extrema()
            .into_iter()
            .fold(BBox::from_point(self.p0).include(self.p1), |b, t| b.include(self.point(t)))
    }

    fn split(&self, t0: f64, t1: f64) -> Self {
        let delta = self.delta * (t1 - t0);
        Arc {
            p0: self.point(t0),
            p1: self.point(t1),
            large_arc: delta.abs() > PI,
            theta1: self.theta1 + t0 * self.delta,
            delta,
            ..*self
        }
    }

    fn flatten(&self, tol: f64, out: &mut Vec<(f64, Vec2)>) {
        flatten_by_param(self, tol, out);
    }

    fn write_path_data(&self, out: &mut String) {
        out.push_str(&format!(
            "A {} {} {} {} {} {} {}",
            self.rx,
            self.ry,
            self.rotation,
            u8::from(self.large_arc),
            u8::from(self.sweep),
            self.p1.x,
            self.p1.y
        ));
    }
}
