//! Per-curve clipping against a closed crop boundary.

use crate::curve::Curve;
use crate::engine::GeometryEngine;
use crate::model::{Attributes, BBox, PATH_DATA_KEY};
use crate::overlap::overlaps;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipKind {
    /// Bounding boxes do not overlap; nothing kept.
    Discarded,
    /// Fully inside; kept unchanged.
    Whole,
    /// Cut at the boundary; `pieces` holds the contained parts.
    Split,
    /// Boxes overlap but the curve neither crosses the boundary nor lies
    /// inside it; nothing kept.
    Inconsistent,
}

#[derive(Clone, Debug)]
pub struct Clip {
    pub kind: ClipKind,
    pub pieces: Vec<(Curve, Attributes)>,
    /// Parameter ranges whose sub-curve could not be extracted.
    pub failed_ranges: Vec<(f64, f64)>,
}

impl Clip {
    fn empty(kind: ClipKind) -> Self {
        Self { kind, pieces: Vec::new(), failed_ranges: Vec::new() }
    }

    pub fn extraction_failures(&self) -> usize {
        self.failed_ranges.len()
    }
}

/// Parameter ranges between sorted crossings, each crossing excluded by
/// `eps` on both sides: `[0, T1-eps], [T1+eps, T2-eps], ..., [Tn+eps, 1]`.
pub fn bracket_ranges(params: &[f64], eps: f64) -> Vec<(f64, f64)> {
    let mut ranges = Vec::with_capacity(params.len() + 1);
    let mut start = 0.0;
    for &t in params {
        ranges.push((start, t - eps));
        start = t + eps;
    }
    ranges.push((start, 1.0));
    ranges
}

/// Clip one curve against `crop`, whose bounding box is `crop_bbox`.
///
/// Every retained piece carries its own copy of `attrs` with the path data
/// rewritten; a curve kept whole carries an unchanged copy.
pub fn clip_curve<E: GeometryEngine + ?Sized>(
    engine: &E,
    curve: &Curve,
    attrs: &Attributes,
    crop: &Curve,
    crop_bbox: &BBox,
    bracket: f64,
) -> Clip {
    let Some(bbox) = engine.bbox(curve) else {
        return Clip::empty(ClipKind::Discarded);
    };
    if !overlaps(&bbox, crop_bbox) {
        return Clip::empty(ClipKind::Discarded);
    }

    if engine.is_contained_by(curve, crop) {
        return Clip {
            kind: ClipKind::Whole,
            pieces: vec![(curve.clone(), attrs.clone())],
            failed_ranges: Vec::new(),
        };
    }

    let mut params: Vec<f64> = engine.intersect(curve, crop).into_iter().map(|(t, _)| t).collect();
    params.sort_by(f64::total_cmp);
    if params.is_empty() {
        warn!(bbox = ?bbox.as_array(), "curve overlaps the crop box but has no boundary crossings; dropped");
        return Clip::empty(ClipKind::Inconsistent);
    }
    debug_assert!(overlaps(&bbox, crop_bbox));

    let mut clip = Clip::empty(ClipKind::Split);
    for (start, stop) in bracket_ranges(&params, bracket) {
        let piece = match engine.extract_subcurve(curve, start, stop) {
            Ok(piece) => piece,
            Err(err) => {
                debug!(start, stop, %err, "sub-curve extraction failed");
                clip.failed_ranges.push((start, stop));
                continue;
            }
        };
        if engine.is_contained_by(&piece, crop) {
            let mut piece_attrs = attrs.clone();
            piece_attrs.insert(PATH_DATA_KEY.to_owned(), engine.to_path_data(&piece));
            clip.pieces.push((piece, piece_attrs));
        }
    }
    debug!(crossings = params.len(), kept = clip.pieces.len(), "curve split at crop boundary");
    clip
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FlatteningEngine;
    use crate::svg::parse_path_data;

    fn attrs(d: &str) -> Attributes {
        let mut a = Attributes::new();
        a.insert("fill".into(), "none".into());
        a.insert("d".into(), d.into());
        a.insert("stroke".into(), "#123456".into());
        a
    }

    fn run(d: &str) -> Clip {
        let crop = Curve::rectangle(25.0, 25.0, 50.0, 50.0);
        let bbox = crop.bbox().unwrap();
        let curve = parse_path_data(d).unwrap();
        clip_curve(&FlatteningEngine::default(), &curve, &attrs(d), &crop, &bbox, 0.0002)
    }

    #[test]
    fn bracket_ranges_surround_each_crossing() {
        let r = bracket_ranges(&[0.25, 0.75], 0.125);
        assert_eq!(r, vec![(0.0, 0.125), (0.375, 0.625), (0.875, 1.0)]);
        assert_eq!(bracket_ranges(&[], 0.125), vec![(0.0, 1.0)]);
    }

    #[test]
    fn far_curve_is_discarded() {
        let c = run("M 200 200 L 300 300");
        assert_eq!(c.kind, ClipKind::Discarded);
        assert!(c.pieces.is_empty());
    }

    #[test]
    fn flush_curve_is_discarded() {
        // lies along x = 75 outside the crop; its box only touches the crop box
        let c = run("M 75 0 L 90 10");
        assert_eq!(c.kind, ClipKind::Discarded);
    }

    #[test]
    fn inner_curve_is_kept_with_identical_attributes() {
        let d = "M 30 30 L 70 40";
        let c = run(d);
        assert_eq!(c.kind, ClipKind::Whole);
        assert_eq!(c.pieces.len(), 1);
        assert_eq!(c.pieces[0].1, attrs(d));
    }

    #[test]
    fn single_crossing_keeps_inner_part() {
        let d = "M 50 50 L 100 50";
        let c = run(d);
        assert_eq!(c.kind, ClipKind::Split);
        assert_eq!(c.pieces.len(), 1);
        let (piece, a) = &c.pieces[0];
        assert_ne!(a["d"], d);
        assert_eq!(a["stroke"], "#123456");
        let end = piece.end().unwrap();
        assert!(end.x < 75.0 && end.x > 74.9, "end {:?}", end);
    }

    #[test]
    fn pieces_get_independent_attribute_copies() {
        // enters and leaves twice: two inner pieces
        let c = run("M 0 40 L 100 40 L 100 60 L 0 60");
        assert_eq!(c.kind, ClipKind::Split);
        assert_eq!(c.pieces.len(), 2);
        assert_ne!(c.pieces[0].1["d"], c.pieces[1].1["d"]);
        for (piece, a) in &c.pieces {
            assert_eq!(a["d"], piece.to_path_data());
        }
    }

    #[test]
    fn surrounding_outline_is_inconsistent() {
        let c = run("M 0 0 L 100 0 L 100 100 L 0 100 Z");
        assert_eq!(c.kind, ClipKind::Inconsistent);
        assert!(c.pieces.is_empty());
    }

    #[test]
    fn crossing_at_curve_start_counts_an_extraction_failure() {
        // starts on the boundary and runs inward: the range [0, -eps] is empty
        let c = run("M 25 50 L 50 50");
        assert_eq!(c.kind, ClipKind::Split);
        assert_eq!(c.extraction_failures(), 1);
        assert_eq!(c.failed_ranges[0], (0.0, -0.0002));
        assert_eq!(c.pieces.len(), 1);
    }
}
