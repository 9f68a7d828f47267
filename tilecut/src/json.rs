use crate::crop::CropReport;
use crate::curve::Curve;
use crate::document::Document;
use crate::error::DocumentError;
use crate::geometry::arc::Arc;
use crate::geometry::cubic::CubicBezier;
use crate::geometry::limits;
use crate::geometry::line::Line;
use crate::geometry::primitive::{Primitive, Segment};
use crate::geometry::quad::QuadBezier;
use crate::geometry::tolerance::EPS_POS;
use crate::model::{Attributes, Vec2, PATH_DATA_KEY};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSON_VERSION: u32 = 1;

pub fn document_to_json(doc: &Document) -> Result<Value, DocumentError> {
    #[derive(Serialize)]
    struct CurveSer<'a> {
        segments: &'a [Segment],
        attributes: &'a Attributes,
    }
    #[derive(Serialize)]
    struct Doc<'a> {
        version: u32,
        svg_attributes: &'a Attributes,
        curves: Vec<CurveSer<'a>>,
    }
    let curves = doc
        .curves
        .iter()
        .zip(&doc.attributes)
        .map(|(c, a)| CurveSer { segments: c.segments(), attributes: a })
        .collect();
    Ok(serde_json::to_value(Doc { version: JSON_VERSION, svg_attributes: &doc.svg_attributes, curves })?)
}

/// Rebuild a document from [`document_to_json`] output.
///
/// Arcs are rebuilt from their endpoint parameters, so any derived center
/// or angles in the input are ignored. A curve without `d` gets one
/// generated from its segments.
pub fn document_from_json(v: Value) -> Result<Document, DocumentError> {
    #[derive(Deserialize)]
    #[serde(tag = "kind", rename_all = "lowercase")]
    enum SegmentDe {
        Line {
            p0: Vec2,
            p1: Vec2,
        },
        Quad {
            p0: Vec2,
            p1: Vec2,
            p2: Vec2,
        },
        Cubic {
            p0: Vec2,
            p1: Vec2,
            p2: Vec2,
            p3: Vec2,
        },
        Arc {
            p0: Vec2,
            p1: Vec2,
            rx: f64,
            ry: f64,
            #[serde(default)]
            rotation: f64,
            #[serde(default)]
            large_arc: bool,
            #[serde(default)]
            sweep: bool,
        },
    }
    #[derive(Deserialize)]
    struct CurveDe {
        segments: Vec<SegmentDe>,
        #[serde(default)]
        attributes: Attributes,
    }
    #[derive(Deserialize)]
    struct DocDe {
        version: Option<u32>,
        #[serde(default)]
        svg_attributes: Attributes,
        curves: Vec<CurveDe>,
    }
    let parsed: DocDe = serde_json::from_value(v)?;
    if let Some(version) = parsed.version {
        if version > JSON_VERSION {
            return Err(DocumentError::JsonVersion(version));
        }
    }
    if parsed.curves.len() > limits::MAX_ELEMENTS {
        return Err(DocumentError::TooLarge);
    }

    let mut doc = Document::new(parsed.svg_attributes);
    let mut total_segments = 0usize;
    for (index, c) in parsed.curves.into_iter().enumerate() {
        total_segments += c.segments.len();
        if total_segments > limits::MAX_PATH_SEGMENTS {
            return Err(DocumentError::TooLarge);
        }
        let mut segments = Vec::with_capacity(c.segments.len());
        for s in c.segments {
            let seg: Segment = match s {
                SegmentDe::Line { p0, p1 } => Line::new(p0, p1).into(),
                SegmentDe::Quad { p0, p1, p2 } => QuadBezier::new(p0, p1, p2).into(),
                SegmentDe::Cubic { p0, p1, p2, p3 } => CubicBezier::new(p0, p1, p2, p3).into(),
                SegmentDe::Arc { p0, p1, rx, ry, rotation, large_arc, sweep } => {
                    match Arc::from_endpoints(p0, rx, ry, rotation, large_arc, sweep, p1) {
                        Some(arc) => arc.into(),
                        None if p0.approx_eq(p1, EPS_POS) => continue,
                        None => Line::new(p0, p1).into(),
                    }
                }
            };
            let bb = seg.bbox();
            if !bb.as_array().into_iter().all(limits::in_coord_bounds) {
                return Err(DocumentError::BadNumber {
                    index,
                    tag: "path".to_owned(),
                    attribute: "segments".to_owned(),
                });
            }
            segments.push(seg);
        }
        let curve = Curve::new(segments);
        let mut attributes = c.attributes;
        if !attributes.contains_key(PATH_DATA_KEY) {
            attributes.insert(PATH_DATA_KEY.to_owned(), curve.to_path_data());
        }
        doc.push(curve, attributes);
    }
    Ok(doc)
}

pub fn report_to_json(report: &CropReport) -> Result<Value, DocumentError> {
    #[derive(Serialize)]
    struct ReportSer<'a> {
        version: u32,
        #[serde(flatten)]
        report: &'a CropReport,
    }
    Ok(serde_json::to_value(ReportSer { version: JSON_VERSION, report })?)
}
