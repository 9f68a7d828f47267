use crate::interop::{new_obj, set_kv};
use tilecut::{CropError, DimensionError, DocumentError};
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn out_of_range(param: &str, min: f64, max: f64, got: f64) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "min", &JsValue::from_f64(min));
    set_kv(&d, "max", &JsValue::from_f64(max));
    set_kv(&d, "got", &JsValue::from_f64(got));
    err("out_of_range", format!("parameter '{}' out of range", param), Some(d.into()))
}

#[inline]
pub fn invalid_options(message: impl Into<String>) -> JsValue {
    err("invalid_options", message, None)
}

/// Map a failed crop to its error envelope.
pub fn crop_error(e: &CropError) -> JsValue {
    let message = e.to_string();
    match e {
        CropError::Dimension(DimensionError::Malformed { value }) => {
            let d = new_obj(); set_kv(&d, "value", &JsValue::from_str(value));
            err("malformed_dimension", message, Some(d.into()))
        }
        CropError::Dimension(DimensionError::UnsupportedUnit { unit }) => {
            let d = new_obj(); set_kv(&d, "unit", &JsValue::from_str(unit));
            err("unsupported_unit", message, Some(d.into()))
        }
        CropError::DegenerateViewBox { view_box } | CropError::MalformedViewBox(view_box) => {
            let code = if matches!(e, CropError::DegenerateViewBox { .. }) { "degenerate_view_box" } else { "malformed_view_box" };
            let d = new_obj(); set_kv(&d, "view_box", &JsValue::from_str(view_box));
            err(code, message, Some(d.into()))
        }
        CropError::MissingViewBox => err("missing_view_box", message, None),
        CropError::EmptyBoundary | CropError::OpenBoundary | CropError::PathData(_) => err("invalid_path_data", message, None),
        CropError::Document(DocumentError::PathData { index, tag, .. }) => {
            let d = new_obj();
            set_kv(&d, "index", &JsValue::from_f64(*index as f64));
            set_kv(&d, "tag", &JsValue::from_str(tag));
            err("invalid_path_data", message, Some(d.into()))
        }
        CropError::Document(_) => err("invalid_document", message, None),
    }
}
