use crate::model::BBox;

/// Coarse rejection test: true iff both the x-ranges and the y-ranges of
/// the boxes overlap with positive length.
///
/// Boxes that only share an edge do not overlap, so a curve lying flush
/// against the crop edge with no area inside is rejected here.
pub fn overlaps(a: &BBox, b: &BBox) -> bool {
    a.xmin < b.xmax && a.xmax > b.xmin && a.ymin < b.ymax && a.ymax > b.ymin
}
