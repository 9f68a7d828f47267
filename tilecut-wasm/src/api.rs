use crate::error;
use crate::interop::{arr_f64, new_obj, set_kv};
use serde::Serialize;
use tilecut::geometry::limits::{COORD_MAX, COORD_MIN};
use tilecut::{crop_document, crop_to_rect, CropError, CropOptions, CropOutput, Document, ViewBox};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Crop to the rectangle `(x, y, width, height)` with default options.
///
/// Returns `{ ok: true, value: { svg, view_box, report } }` or an error
/// envelope.
#[wasm_bindgen]
pub fn crop_svg(source: &str, x: f64, y: f64, width: f64, height: f64) -> JsValue {
    crop_rect(source, x, y, width, height, &CropOptions::default())
}

/// Like [`crop_svg`], with a partial options object such as
/// `{ bracket: 0.001 }`; missing fields take their defaults.
#[wasm_bindgen]
pub fn crop_svg_with_options(source: &str, x: f64, y: f64, width: f64, height: f64, options: JsValue) -> JsValue {
    let opts = if options.is_undefined() || options.is_null() {
        CropOptions::default()
    } else {
        match serde_wasm_bindgen::from_value::<CropOptions>(options) {
            Ok(o) => o,
            Err(e) => return error::invalid_options(e.to_string()),
        }
    };
    if let Some(bad) = check_options(&opts) {
        return bad;
    }
    crop_rect(source, x, y, width, height, &opts)
}

/// Crop to an arbitrary closed boundary given as path data.
#[wasm_bindgen]
pub fn crop_svg_to_path(source: &str, boundary: &str) -> JsValue {
    let run = || -> Result<CropOutput, CropError> {
        let doc = Document::parse(source)?;
        let boundary = tilecut::svg::parse_path_data(boundary)?;
        crop_document(&doc, &boundary, &CropOptions::default())
    };
    match run() {
        Ok(out) => error::ok(result_obj(&out)),
        Err(e) => error::crop_error(&e),
    }
}

/// `{ width, height }` as written in the document, or the viewBox extent.
#[wasm_bindgen]
pub fn svg_dimensions(source: &str) -> JsValue {
    #[derive(Serialize)]
    struct Dimensions {
        width: String,
        height: String,
    }
    let doc = match Document::parse(source) {
        Ok(d) => d,
        Err(e) => return error::crop_error(&e.into()),
    };
    match doc.dimensions() {
        Some((width, height)) => match serde_wasm_bindgen::to_value(&Dimensions { width, height }) {
            Ok(v) => error::ok(v),
            Err(e) => error::err("invalid_document", e.to_string(), None),
        },
        None => error::crop_error(&CropError::MissingViewBox),
    }
}

fn crop_rect(source: &str, x: f64, y: f64, width: f64, height: f64, opts: &CropOptions) -> JsValue {
    for (name, v) in [("x", x), ("y", y), ("width", width), ("height", height)] {
        if !v.is_finite() {
            return error::non_finite(name);
        }
        if !(COORD_MIN..=COORD_MAX).contains(&v) {
            return error::out_of_range(name, COORD_MIN, COORD_MAX, v);
        }
    }
    if width <= 0.0 {
        return error::out_of_range("width", 0.0, COORD_MAX, width);
    }
    if height <= 0.0 {
        return error::out_of_range("height", 0.0, COORD_MAX, height);
    }
    let run = || -> Result<CropOutput, CropError> {
        let doc = Document::parse(source)?;
        crop_to_rect(&doc, x, y, width, height, opts)
    };
    match run() {
        Ok(out) => error::ok(result_obj(&out)),
        Err(e) => error::crop_error(&e),
    }
}

fn check_options(opts: &CropOptions) -> Option<JsValue> {
    if !opts.bracket.is_finite() {
        return Some(error::non_finite("bracket"));
    }
    if !(0.0..0.5).contains(&opts.bracket) {
        return Some(error::out_of_range("bracket", 0.0, 0.5, opts.bracket));
    }
    if !opts.flatten_tolerance.is_finite() {
        return Some(error::non_finite("flatten_tolerance"));
    }
    if opts.flatten_tolerance <= 0.0 {
        return Some(error::out_of_range("flatten_tolerance", 0.0, f64::MAX, opts.flatten_tolerance));
    }
    None
}

fn result_obj(out: &CropOutput) -> JsValue {
    let obj = new_obj();
    set_kv(&obj, "svg", &JsValue::from_str(&out.document.to_svg_string()));
    if let Some(vb) = out.document.svg_attributes.get("viewBox").and_then(|s| ViewBox::parse(s)) {
        set_kv(&obj, "view_box", &arr_f64(&[vb.min_x, vb.min_y, vb.width, vb.height]).into());
    }
    set_kv(&obj, "report", &report_value(&out.report));
    if !out.report.anomalies.is_empty() {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "tilecut: crop finished with {} anomalies",
            out.report.anomalies.len()
        )));
    }
    obj.into()
}

fn report_value(report: &tilecut::CropReport) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    tilecut::json::report_to_json(report)
        .ok()
        .and_then(|v| v.serialize(&serializer).ok())
        .unwrap_or(JsValue::NULL)
}
