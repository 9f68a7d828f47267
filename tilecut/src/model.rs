use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Per-element attribute mapping, kept in document order.
pub type Attributes = IndexMap<String, String>;

/// Attribute key holding a curve's path data.
pub const PATH_DATA_KEY: &str = "d";

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn lerp(self, other: Vec2, t: f64) -> Vec2 {
        Vec2 {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
        }
    }

    #[inline]
    pub fn approx_eq(self, other: Vec2, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

/// Axis-aligned bounding box in `[xmin, xmax, ymin, ymax]` order.
///
/// Constructors normalize so `xmin <= xmax` and `ymin <= ymax` always hold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl BBox {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin: xmin.min(xmax),
            xmax: xmin.max(xmax),
            ymin: ymin.min(ymax),
            ymax: ymin.max(ymax),
        }
    }

    pub fn from_point(p: Vec2) -> Self {
        Self { xmin: p.x, xmax: p.x, ymin: p.y, ymax: p.y }
    }

    pub fn include(self, p: Vec2) -> Self {
        Self {
            xmin: self.xmin.min(p.x),
            xmax: self.xmax.max(p.x),
            ymin: self.ymin.min(p.y),
            ymax: self.ymax.max(p.y),
        }
    }

    pub fn union(self, other: BBox) -> Self {
        Self {
            xmin: self.xmin.min(other.xmin),
            xmax: self.xmax.max(other.xmax),
            ymin: self.ymin.min(other.ymin),
            ymax: self.ymax.max(other.ymax),
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.xmin, self.xmax, self.ymin, self.ymax]
    }

    /// Inclusive containment test with slack, used by geometry prefilters.
    pub fn contains_box(&self, other: &BBox, eps: f64) -> bool {
        other.xmin >= self.xmin - eps
            && other.xmax <= self.xmax + eps
            && other.ymin >= self.ymin - eps
            && other.ymax <= self.ymax + eps
    }

    /// Inclusive overlap with slack. The crop decision uses the strict
    /// `overlap::overlaps` instead.
    pub fn touches(&self, other: &BBox, eps: f64) -> bool {
        self.xmin <= other.xmax + eps
            && self.xmax >= other.xmin - eps
            && self.ymin <= other.ymax + eps
            && self.ymax >= other.ymin - eps
    }
}

impl From<[f64; 4]> for BBox {
    fn from(a: [f64; 4]) -> Self {
        BBox::new(a[0], a[1], a[2], a[3])
    }
}

/// A document's visible coordinate window: min-x, min-y, width, height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn from_bbox(b: &BBox) -> Self {
        Self { min_x: b.xmin, min_y: b.ymin, width: b.width(), height: b.height() }
    }

    pub fn to_bbox(&self) -> BBox {
        BBox::new(self.min_x, self.min_x + self.width, self.min_y, self.min_y + self.height)
    }

    /// Parse four numbers separated by whitespace and/or commas.
    pub fn parse(s: &str) -> Option<Self> {
        let nums: Vec<f64> = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(|t| t.parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        match nums.as_slice() {
            [min_x, min_y, width, height] if nums.iter().all(|v| v.is_finite()) => Some(Self {
                min_x: *min_x,
                min_y: *min_y,
                width: *width,
                height: *height,
            }),
            _ => None,
        }
    }
}

impl std::fmt::Display for ViewBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} {}", self.min_x, self.min_y, self.width, self.height)
    }
}
