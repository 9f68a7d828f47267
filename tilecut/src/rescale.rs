//! Document size metadata for a cropped region.

use crate::dimension::{self, Dimension};
use crate::error::{CropError, DimensionError};
use crate::geometry::tolerance::round_output;
use crate::model::{Attributes, BBox, ViewBox};
use serde::Serialize;
use tracing::warn;

pub const WIDTH_KEY: &str = "width";
pub const HEIGHT_KEY: &str = "height";
pub const VIEW_BOX_KEY: &str = "viewBox";

/// A width/height left out of the output because its unit cannot be
/// rescaled.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkippedDimension {
    pub attribute: String,
    pub unit: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rescaled {
    pub attributes: Attributes,
    pub skipped: Vec<SkippedDimension>,
}

/// The document's viewBox, or `0 0 width height` when it declares none.
pub fn source_view_box(attrs: &Attributes) -> Result<ViewBox, CropError> {
    if let Some(raw) = attrs.get(VIEW_BOX_KEY) {
        return ViewBox::parse(raw).ok_or_else(|| CropError::MalformedViewBox(raw.clone()));
    }
    match (attrs.get(WIDTH_KEY), attrs.get(HEIGHT_KEY)) {
        (Some(w), Some(h)) => Ok(ViewBox {
            min_x: 0.0,
            min_y: 0.0,
            width: dimension::parse(w)?.magnitude,
            height: dimension::parse(h)?.magnitude,
        }),
        _ => Err(CropError::MissingViewBox),
    }
}

/// New width, height and viewBox for the region `crop_bbox`.
///
/// width and height scale with the crop's share of the source viewBox and
/// keep their units; every other attribute is copied as is.
pub fn rescale(attrs: &Attributes, crop_bbox: &BBox) -> Result<Rescaled, CropError> {
    let vb = source_view_box(attrs)?;
    if vb.width <= 0.0 || vb.height <= 0.0 {
        return Err(CropError::DegenerateViewBox { view_box: vb.to_string() });
    }

    // box corners come from x + w, so the extents carry float noise
    let target = ViewBox::from_bbox(crop_bbox);
    let target = ViewBox {
        min_x: round_output(target.min_x),
        min_y: round_output(target.min_y),
        width: round_output(target.width),
        height: round_output(target.height),
    };

    let mut out = attrs.clone();
    let mut skipped = Vec::new();
    let axes = [
        (WIDTH_KEY, vb.width, target.width / vb.width),
        (HEIGHT_KEY, vb.height, target.height / vb.height),
    ];
    for (key, fallback, factor) in axes {
        let source = match attrs.get(key) {
            Some(raw) => dimension::parse(raw)?,
            None => Dimension::new(fallback, None),
        };
        match dimension::format(&source.scaled(factor)) {
            Ok(text) => {
                out.insert(key.to_owned(), text);
            }
            Err(DimensionError::UnsupportedUnit { unit }) => {
                warn!(attribute = key, %unit, "cannot rescale this unit; attribute left out");
                out.shift_remove(key);
                skipped.push(SkippedDimension { attribute: key.to_owned(), unit });
            }
            Err(e) => return Err(e.into()),
        }
    }
    out.insert(VIEW_BOX_KEY.to_owned(), target.to_string());

    Ok(Rescaled { attributes: out, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;

    fn doc(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn quarter_crop_of_pixel_document() {
        let a = doc(&[("width", "100"), ("height", "100"), ("viewBox", "0 0 100 100")]);
        let r = rescale(&a, &BBox::new(25.0, 75.0, 25.0, 75.0)).unwrap();
        assert_eq!(r.attributes["viewBox"], "25 25 50 50");
        assert_eq!(r.attributes["width"], "50");
        assert_eq!(r.attributes["height"], "50");
        assert!(r.skipped.is_empty());
    }

    #[test]
    fn min_y_comes_from_the_y_range_of_the_box() {
        // bbox slots are [xmin, xmax, ymin, ymax]; viewBox wants min-x min-y w h
        let a = doc(&[("width", "200"), ("height", "100"), ("viewBox", "0 0 200 100")]);
        let r = rescale(&a, &BBox::from([10.0, 110.0, 20.0, 70.0])).unwrap();
        assert_eq!(r.attributes["viewBox"], "10 20 100 50");
        assert_eq!(r.attributes["width"], "100");
        assert_eq!(r.attributes["height"], "50");
    }

    #[test]
    fn non_square_scale_uses_each_axis() {
        let a = doc(&[("width", "400px"), ("height", "100px"), ("viewBox", "0 0 200 50")]);
        let r = rescale(&a, &BBox::new(0.0, 50.0, 0.0, 25.0)).unwrap();
        assert_eq!(r.attributes["width"], "100px");
        assert_eq!(r.attributes["height"], "50px");
    }

    #[test]
    fn physical_units_are_preserved() {
        let a = doc(&[("width", "21cm"), ("height", "10in"), ("viewBox", "0 0 210 100")]);
        let r = rescale(&a, &BBox::new(0.0, 105.0, 0.0, 25.0)).unwrap();
        assert_eq!(r.attributes["width"], "10.5cm");
        assert_eq!(r.attributes["height"], "2.5in");
    }

    #[test]
    fn crop_equal_to_view_box_round_trips() {
        let a = doc(&[
            ("xmlns", "http://www.w3.org/2000/svg"),
            ("width", "297mm"),
            ("height", "210mm"),
            ("viewBox", "0 0 1122 793"),
        ]);
        let vb = ViewBox::parse(&a["viewBox"]).unwrap();
        let r = rescale(&a, &vb.to_bbox()).unwrap();
        assert_eq!(r.attributes, a);
    }

    #[test]
    fn fractional_off_origin_view_box_round_trips() {
        let a = doc(&[("width", "640px"), ("height", "480px"), ("viewBox", "10.3 20.7 33.1 17.9")]);
        // corners built as x + w, the way the rectangle boundary is
        let bbox = Curve::rectangle(10.3, 20.7, 33.1, 17.9).bbox().unwrap();
        let r = rescale(&a, &bbox).unwrap();
        assert_eq!(r.attributes["viewBox"], "10.3 20.7 33.1 17.9");
        assert_eq!(r.attributes["width"], "640px");
        assert_eq!(r.attributes["height"], "480px");
    }

    #[test]
    fn unsupported_unit_drops_only_that_attribute() {
        let a = doc(&[("width", "12pt"), ("height", "100"), ("viewBox", "0 0 100 100")]);
        let r = rescale(&a, &BBox::new(0.0, 50.0, 0.0, 50.0)).unwrap();
        assert!(!r.attributes.contains_key("width"));
        assert_eq!(r.attributes["height"], "50");
        assert_eq!(r.skipped, vec![SkippedDimension { attribute: "width".into(), unit: "pt".into() }]);
    }

    #[test]
    fn malformed_dimension_is_fatal() {
        let a = doc(&[("width", "wide"), ("height", "100"), ("viewBox", "0 0 100 100")]);
        assert!(matches!(
            rescale(&a, &BBox::new(0.0, 50.0, 0.0, 50.0)),
            Err(CropError::Dimension(DimensionError::Malformed { .. }))
        ));
    }

    #[test]
    fn degenerate_view_box_is_fatal() {
        for vb in ["0 0 0 100", "0 0 100 -100", "0 0 -5 100"] {
            let a = doc(&[("width", "100"), ("height", "100"), ("viewBox", vb)]);
            assert!(
                matches!(rescale(&a, &BBox::new(0.0, 50.0, 0.0, 50.0)), Err(CropError::DegenerateViewBox { .. })),
                "viewBox {vb}"
            );
        }
    }

    #[test]
    fn missing_view_box_falls_back_to_size() {
        let a = doc(&[("width", "100"), ("height", "80")]);
        let r = rescale(&a, &BBox::new(0.0, 50.0, 0.0, 40.0)).unwrap();
        assert_eq!(r.attributes["viewBox"], "0 0 50 40");
        assert_eq!(r.attributes["width"], "50");
        assert_eq!(r.attributes["height"], "40");
        assert!(matches!(rescale(&doc(&[]), &BBox::new(0.0, 1.0, 0.0, 1.0)), Err(CropError::MissingViewBox)));
    }

    #[test]
    fn missing_size_falls_back_to_view_box() {
        let a = doc(&[("viewBox", "0 0 100 100")]);
        let r = rescale(&a, &BBox::new(25.0, 75.0, 25.0, 75.0)).unwrap();
        assert_eq!(r.attributes["width"], "50");
        assert_eq!(r.attributes["height"], "50");
    }
}
