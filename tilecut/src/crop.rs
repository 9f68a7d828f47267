//! Document-level cropping: rescale, then clip every curve.

use crate::clip::{clip_curve, ClipKind};
use crate::curve::Curve;
use crate::document::Document;
use crate::engine::{FlatteningEngine, GeometryEngine};
use crate::error::CropError;
use crate::geometry::tolerance::{DEFAULT_BRACKET, DEFAULT_FLATTEN_TOL};
use crate::rescale::rescale;
use serde::{Deserialize, Serialize};
use tracing::{debug_span, info};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropOptions {
    /// Parameter distance kept clear on each side of a boundary crossing.
    pub bracket: f64,
    /// Max chord deviation when flattening curves for intersection tests.
    pub flatten_tolerance: f64,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self { bracket: DEFAULT_BRACKET, flatten_tolerance: DEFAULT_FLATTEN_TOL }
    }
}

/// Something a crop recovered from instead of failing.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    /// Curve `curve` overlaps the crop box but neither crosses the boundary
    /// nor lies inside it.
    InconsistentIntersectionState { curve: usize },
    SubcurveExtractionFailure { curve: usize, start: f64, stop: f64 },
    UnsupportedUnit { attribute: String, unit: String },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CropReport {
    pub discarded: usize,
    pub whole: usize,
    pub split: usize,
    pub pieces: usize,
    pub extraction_failures: usize,
    pub inconsistent: usize,
    pub anomalies: Vec<Anomaly>,
}

#[derive(Clone, Debug)]
pub struct CropOutput {
    pub document: Document,
    pub report: CropReport,
}

pub fn crop_document(doc: &Document, boundary: &Curve, options: &CropOptions) -> Result<CropOutput, CropError> {
    let engine = FlatteningEngine::new(options.flatten_tolerance);
    crop_document_with(&engine, doc, boundary, options)
}

/// Crop `doc` to the closed `boundary`.
///
/// Fails only on document-level problems; a curve that cannot be clipped
/// is dropped and noted in the report.
pub fn crop_document_with<E: GeometryEngine + ?Sized>(
    engine: &E,
    doc: &Document,
    boundary: &Curve,
    options: &CropOptions,
) -> Result<CropOutput, CropError> {
    let crop_bbox = engine.bbox(boundary).ok_or(CropError::EmptyBoundary)?;
    if !boundary.is_closed() {
        return Err(CropError::OpenBoundary);
    }
    let rescaled = rescale(&doc.svg_attributes, &crop_bbox)?;

    let mut report = CropReport::default();
    for skipped in rescaled.skipped {
        report.anomalies.push(Anomaly::UnsupportedUnit { attribute: skipped.attribute, unit: skipped.unit });
    }

    let mut out = Document::new(rescaled.attributes);
    for (index, (curve, attrs)) in doc.curves.iter().zip(&doc.attributes).enumerate() {
        let _span = debug_span!("curve", index).entered();
        let clip = clip_curve(engine, curve, attrs, boundary, &crop_bbox, options.bracket);
        match clip.kind {
            ClipKind::Discarded => report.discarded += 1,
            ClipKind::Whole => report.whole += 1,
            ClipKind::Split => report.split += 1,
            ClipKind::Inconsistent => {
                report.inconsistent += 1;
                report.anomalies.push(Anomaly::InconsistentIntersectionState { curve: index });
            }
        }
        report.extraction_failures += clip.extraction_failures();
        for (start, stop) in clip.failed_ranges {
            report.anomalies.push(Anomaly::SubcurveExtractionFailure { curve: index, start, stop });
        }
        for (piece, piece_attrs) in clip.pieces {
            out.push(piece, piece_attrs);
        }
    }
    report.pieces = out.len();

    info!(
        curves = doc.curves.len(),
        kept = report.pieces,
        discarded = report.discarded,
        split = report.split,
        extraction_failures = report.extraction_failures,
        inconsistent = report.inconsistent,
        "crop finished"
    );
    Ok(CropOutput { document: out, report })
}

pub fn crop_to_rect(
    doc: &Document,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    options: &CropOptions,
) -> Result<CropOutput, CropError> {
    crop_document(doc, &Curve::rectangle(x, y, width, height), options)
}
