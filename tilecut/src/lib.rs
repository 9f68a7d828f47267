pub mod model;
pub mod geometry {
    pub mod arc;
    pub mod cubic;
    pub mod flatten;
    pub mod intersect;
    pub mod limits;
    pub mod line;
    pub mod math;
    pub mod primitive;
    pub mod quad;
    pub mod tolerance;
    pub mod winding;
}
pub mod clip;
pub mod crop;
pub mod curve;
pub mod dimension;
pub mod document;
pub mod engine;
pub mod error;
pub mod json;
pub mod overlap;
pub mod rescale;
pub mod svg;

pub use crop::{crop_document, crop_document_with, crop_to_rect, Anomaly, CropOptions, CropOutput, CropReport};
pub use curve::Curve;
pub use document::Document;
pub use engine::{FlatteningEngine, GeometryEngine};
pub use error::{CropError, DimensionError, DocumentError, GeometryError, PathDataError};
pub use model::{Attributes, BBox, Vec2, ViewBox};

/// Crop SVG source text to the rectangle at `(x, y)` of size
/// `width` x `height` in user units, returning the new SVG text.
pub fn crop_svg(
    source: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    options: &CropOptions,
) -> Result<(String, CropReport), CropError> {
    let doc = Document::parse(source)?;
    let out = crop_to_rect(&doc, x, y, width, height, options)?;
    Ok((out.document.to_svg_string(), out.report))
}

/// Crop SVG source text to an arbitrary closed boundary given as path data.
pub fn crop_svg_to_path(source: &str, boundary: &str, options: &CropOptions) -> Result<(String, CropReport), CropError> {
    let doc = Document::parse(source)?;
    let boundary = svg::parse_path_data(boundary)?;
    let out = crop_document(&doc, &boundary, options)?;
    Ok((out.document.to_svg_string(), out.report))
}
