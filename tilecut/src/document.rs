//! SVG documents as index-aligned curve and attribute lists.

use crate::curve::Curve;
use crate::error::DocumentError;
use crate::geometry::limits;
use crate::model::{Attributes, ViewBox, PATH_DATA_KEY};
use crate::svg::parse_path_data;
use std::fmt::Write as _;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Containers whose children are never drawn directly.
const NON_RENDERED: [&str; 7] = ["defs", "clipPath", "mask", "marker", "pattern", "symbol", "metadata"];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub curves: Vec<Curve>,
    /// One attribute map per curve, same order.
    pub attributes: Vec<Attributes>,
    /// Attributes of the root `<svg>` element.
    pub svg_attributes: Attributes,
}

impl Document {
    pub fn new(svg_attributes: Attributes) -> Self {
        Self { curves: Vec::new(), attributes: Vec::new(), svg_attributes }
    }

    pub fn push(&mut self, curve: Curve, attributes: Attributes) {
        self.curves.push(curve);
        self.attributes.push(attributes);
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Read the root attributes and every drawable element in document
    /// order. Basic shapes become paths: their geometry attributes are
    /// replaced by `d`. Each drawable takes over what its enclosing groups
    /// set: inherited paint properties (from attributes or `style`),
    /// `opacity` and the `transform` chain. Transforms are carried along
    /// but not applied.
    pub fn parse(source: &str) -> Result<Document, DocumentError> {
        if source.len() > limits::MAX_SOURCE_BYTES {
            return Err(DocumentError::TooLarge);
        }
        let xml = roxmltree::Document::parse(source)?;
        let root = xml.root_element();
        if root.tag_name().name() != "svg" {
            return Err(DocumentError::NotSvg { root: root.tag_name().name().to_owned() });
        }

        let mut svg_attributes = Attributes::new();
        for ns in root.namespaces() {
            if let Some(prefix) = ns.name().filter(|p| *p != "xml") {
                svg_attributes.insert(format!("xmlns:{prefix}"), ns.uri().to_owned());
            }
        }
        svg_attributes.extend(attributes_of(root));
        let mut doc = Document::new(svg_attributes);

        let mut elements = 0usize;
        for node in root.descendants().filter(|n| n.is_element()) {
            elements += 1;
            if elements > limits::MAX_ELEMENTS {
                return Err(DocumentError::TooLarge);
            }
            let tag = node.tag_name().name();
            if !DRAWABLE.contains(&tag) || node.ancestors().any(|a| NON_RENDERED.contains(&a.tag_name().name())) {
                continue;
            }
            let index = doc.len();
            let mut attrs = attributes_with_groups(node, root);
            let d = shape_path_data(tag, &mut attrs).map_err(|attribute| DocumentError::BadNumber {
                index,
                tag: tag.to_owned(),
                attribute,
            })?;
            let curve = parse_path_data(&d).map_err(|source| DocumentError::PathData {
                index,
                tag: tag.to_owned(),
                source,
            })?;
            attrs.insert(PATH_DATA_KEY.to_owned(), d);
            doc.push(curve, attrs);
        }
        Ok(doc)
    }

    /// Serialize as a standalone SVG with one `<path>` per curve.
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "<svg xmlns=\"{SVG_NAMESPACE}\"");
        for (k, v) in self.svg_attributes.iter().filter(|(k, _)| k.as_str() != "xmlns") {
            let _ = write!(out, " {}=\"{}\"", k, escape(v));
        }
        out.push_str(">\n");
        for attrs in &self.attributes {
            out.push_str("<path");
            for (k, v) in attrs {
                let _ = write!(out, " {}=\"{}\"", k, escape(v));
            }
            out.push_str("/>\n");
        }
        out.push_str("</svg>\n");
        out
    }

    /// `width` and `height` as written, or the viewBox extent when either
    /// is missing.
    pub fn dimensions(&self) -> Option<(String, String)> {
        if let (Some(w), Some(h)) = (self.svg_attributes.get("width"), self.svg_attributes.get("height")) {
            return Some((w.clone(), h.clone()));
        }
        let vb = ViewBox::parse(self.svg_attributes.get("viewBox")?)?;
        Some((vb.width.to_string(), vb.height.to_string()))
    }
}

const DRAWABLE: [&str; 7] = ["path", "rect", "line", "polyline", "polygon", "circle", "ellipse"];

fn attributes_of(node: roxmltree::Node<'_, '_>) -> Attributes {
    node.attributes()
        .map(|a| {
            let name = match a.namespace().and_then(|ns| node.lookup_prefix(ns)) {
                Some(prefix) => format!("{prefix}:{}", a.name()),
                None => a.name().to_owned(),
            };
            (name, a.value().to_owned())
        })
        .collect()
}

const TRANSFORM_KEY: &str = "transform";
const STYLE_KEY: &str = "style";
const OPACITY_KEY: &str = "opacity";

/// Properties a child takes from its group when it does not set them.
const INHERITED: [&str; 31] = [
    "clip-rule",
    "color",
    "color-interpolation",
    "color-rendering",
    "cursor",
    "direction",
    "fill",
    "fill-opacity",
    "fill-rule",
    "font",
    "font-family",
    "font-size",
    "font-style",
    "font-weight",
    "image-rendering",
    "marker",
    "marker-end",
    "marker-mid",
    "marker-start",
    "paint-order",
    "pointer-events",
    "shape-rendering",
    "stroke",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
    "visibility",
];

// The element's own attributes, plus what its groups below the root pass
// down. A group's `style` declarations beat its attributes and inner groups
// beat outer ones; resolved values land as plain attributes. Group
// transforms are prepended outermost first and group opacity is multiplied
// in.
fn attributes_with_groups(node: roxmltree::Node<'_, '_>, root: roxmltree::Node<'_, '_>) -> Attributes {
    let mut attrs = attributes_of(node);
    let groups: Vec<_> = node.ancestors().skip(1).take_while(|a| *a != root).filter(|a| a.is_element()).collect();
    if groups.is_empty() {
        return attrs;
    }

    let mut resolved = Attributes::new();
    let mut transforms = Vec::new();
    let mut opacity: Option<f64> = None;
    for group in groups.iter().rev() {
        let group_attrs = attributes_of(*group);
        let declarations = group_attrs.get(STYLE_KEY).map(|s| style_declarations(s)).unwrap_or_default();
        let mut group_opacity = None;
        for (k, v) in group_attrs.iter().map(|(k, v)| (k.clone(), v.clone())).chain(declarations) {
            match k.as_str() {
                TRANSFORM_KEY => transforms.push(v),
                OPACITY_KEY => group_opacity = v.trim().parse::<f64>().ok().or(group_opacity),
                name if INHERITED.contains(&name) => {
                    resolved.insert(name.to_owned(), v);
                }
                _ => {}
            }
        }
        if let Some(o) = group_opacity {
            opacity = Some(opacity.unwrap_or(1.0) * o);
        }
    }

    let own_style = attrs.get(STYLE_KEY).map(|s| style_declarations(s)).unwrap_or_default();
    for (k, v) in resolved {
        if !attrs.contains_key(&k) && !own_style.iter().any(|(p, _)| *p == k) {
            attrs.insert(k, v);
        }
    }
    if let Some(own) = attrs.get(TRANSFORM_KEY) {
        transforms.push(own.clone());
    }
    if !transforms.is_empty() {
        attrs.insert(TRANSFORM_KEY.to_owned(), transforms.join(" "));
    }
    if let Some(group_opacity) = opacity {
        let own = attrs.get(OPACITY_KEY).and_then(|o| o.trim().parse::<f64>().ok()).unwrap_or(1.0);
        attrs.insert(OPACITY_KEY.to_owned(), (own * group_opacity).to_string());
    }
    attrs
}

fn style_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim();
            (!prop.is_empty()).then(|| (prop.to_owned(), value.trim().to_owned()))
        })
        .collect()
}

fn escape(v: &str) -> String {
    let mut out = String::with_capacity(v.len());
    for c in v.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

// Removes the shape's geometry attributes and returns equivalent path data.
// Err carries the name of the attribute that is not a number.
fn shape_path_data(tag: &str, attrs: &mut Attributes) -> Result<String, String> {
    match tag {
        "path" => return Ok(attrs.get(PATH_DATA_KEY).cloned().unwrap_or_default()),
        "polyline" | "polygon" => return points_path(attrs.shift_remove("points"), tag == "polygon"),
        _ => {}
    }
    let radii = (attrs.contains_key("rx"), attrs.contains_key("ry"));
    let mut take = |name: &str| -> Result<f64, String> {
        match attrs.shift_remove(name) {
            None => Ok(0.0),
            Some(raw) => length(&raw).ok_or_else(|| name.to_owned()),
        }
    };
    let d = match tag {
        "line" => {
            let (x1, y1, x2, y2) = (take("x1")?, take("y1")?, take("x2")?, take("y2")?);
            format!("M {x1} {y1} L {x2} {y2}")
        }
        "rect" => {
            let (x, y, w, h) = (take("x")?, take("y")?, take("width")?, take("height")?);
            let (rx, ry) = (take("rx")?, take("ry")?);
            // a single radius applies to both axes
            let (rx, ry) = match radii {
                (true, false) => (rx, rx),
                (false, true) => (ry, ry),
                _ => (rx, ry),
            };
            rect_path(x, y, w, h, rx, ry)
        }
        "circle" => {
            let (cx, cy, r) = (take("cx")?, take("cy")?, take("r")?);
            ellipse_path(cx, cy, r, r)
        }
        "ellipse" => {
            let (cx, cy, rx, ry) = (take("cx")?, take("cy")?, take("rx")?, take("ry")?);
            ellipse_path(cx, cy, rx, ry)
        }
        _ => String::new(),
    };
    Ok(d)
}

fn points_path(raw: Option<String>, close: bool) -> Result<String, String> {
    let raw = raw.unwrap_or_default();
    let nums = raw
        .split(|c: char| c == ',' || c.is_ascii_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(|| "points".to_owned())?;
    let mut d = String::new();
    // an odd trailing coordinate is ignored
    for (i, p) in nums.chunks_exact(2).enumerate() {
        let _ = write!(d, "{}{} {} ", if i == 0 { "M " } else { "L " }, p[0], p[1]);
    }
    if close && !d.is_empty() {
        d.push('Z');
    }
    Ok(d.trim_end().to_owned())
}

fn length(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let s = s.strip_suffix("px").unwrap_or(s);
    s.trim_end().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn rect_path(x: f64, y: f64, w: f64, h: f64, rx: f64, ry: f64) -> String {
    if w <= 0.0 || h <= 0.0 {
        return String::new();
    }
    let (rx, ry) = (rx.clamp(0.0, w / 2.0), ry.clamp(0.0, h / 2.0));
    if rx <= 0.0 || ry <= 0.0 {
        return format!("M {x} {y} H {} V {} H {x} Z", x + w, y + h);
    }
    let (r, b) = (x + w, y + h);
    format!(
        "M {} {y} H {} A {rx} {ry} 0 0 1 {r} {} V {} A {rx} {ry} 0 0 1 {} {b} H {} A {rx} {ry} 0 0 1 {x} {} V {} A {rx} {ry} 0 0 1 {} {y} Z",
        x + rx,
        r - rx,
        y + ry,
        b - ry,
        r - rx,
        x + rx,
        b - ry,
        y + ry,
        x + rx,
    )
}

fn ellipse_path(cx: f64, cy: f64, rx: f64, ry: f64) -> String {
    if rx <= 0.0 || ry <= 0.0 {
        return String::new();
    }
    format!(
        "M {} {cy} A {rx} {ry} 0 1 0 {} {cy} A {rx} {ry} 0 1 0 {} {cy} Z",
        cx + rx,
        cx - rx,
        cx + rx
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitive::Primitive;

    const SAMPLE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"
        width="100" height="100" viewBox="0 0 100 100">
      <defs><path id="hidden" d="M 0 0 L 1 1"/></defs>
      <g transform="translate(1 2)">
        <path id="a" d="M 10 10 L 90 90" stroke="red"/>
        <rect id="b" x="10" y="20" width="30" height="40" fill="blue"/>
      </g>
      <circle id="c" cx="50" cy="50" r="10"/>
      <polygon id="d" points="0,0 10,0 10,10"/>
      <line id="e" x1="0" y1="0" x2="5px" y2="5"/>
      <use xlink:href="#hidden"/>
    </svg>"##;

    #[test]
    fn parse_collects_drawables_in_order() {
        let doc = Document::parse(SAMPLE).unwrap();
        let ids: Vec<&str> = doc.attributes.iter().map(|a| a["id"].as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "d", "e"]);
        assert_eq!(doc.curves.len(), doc.attributes.len());
        assert_eq!(doc.svg_attributes["viewBox"], "0 0 100 100");
        assert_eq!(doc.svg_attributes["xmlns:xlink"], "http://www.w3.org/1999/xlink");
    }

    #[test]
    fn group_transform_reaches_its_children_only() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(doc.attributes[0]["transform"], "translate(1 2)");
        assert_eq!(doc.attributes[1]["transform"], "translate(1 2)");
        assert!(!doc.attributes[2].contains_key("transform"));
        // geometry stays in the element's own coordinates
        assert_eq!(doc.curves[1].bbox().unwrap().as_array(), [10.0, 40.0, 20.0, 60.0]);
    }

    #[test]
    fn nested_groups_pass_down_paint_and_transforms() {
        let src = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
          <g id="outer" transform="translate(10 0)" fill="red" stroke="black" opacity="0.5" class="layer">
            <g transform="scale(2)" style="stroke: blue; stroke-width: 3">
              <path id="p" d="M 0 0 L 5 5" transform="rotate(45)" fill="green"/>
              <path id="q" d="M 0 0 L 5 5" style="stroke:none" opacity="0.5"/>
            </g>
          </g>
        </svg>"#;
        let doc = Document::parse(src).unwrap();
        let p = &doc.attributes[0];
        assert_eq!(p["id"], "p");
        assert_eq!(p["transform"], "translate(10 0) scale(2) rotate(45)");
        assert_eq!(p["fill"], "green");
        assert_eq!(p["stroke"], "blue");
        assert_eq!(p["stroke-width"], "3");
        assert_eq!(p["opacity"], "0.5");
        assert!(!p.contains_key("class"));

        let q = &doc.attributes[1];
        assert_eq!(q["id"], "q");
        assert_eq!(q["transform"], "translate(10 0) scale(2)");
        assert_eq!(q["fill"], "red");
        assert!(!q.contains_key("stroke"));
        assert_eq!(q["style"], "stroke:none");
        assert_eq!(q["opacity"], "0.25");
    }

    #[test]
    fn shapes_become_paths() {
        let doc = Document::parse(SAMPLE).unwrap();
        let rect = &doc.attributes[1];
        assert!(!rect.contains_key("x") && !rect.contains_key("width"));
        assert_eq!(rect["fill"], "blue");
        let bb = doc.curves[1].bbox().unwrap();
        assert_eq!(bb.as_array(), [10.0, 40.0, 20.0, 60.0]);
        assert!(doc.curves[1].is_closed());

        let circle = doc.curves[2].bbox().unwrap();
        assert!((circle.xmin - 40.0).abs() < 1e-9 && (circle.ymax - 60.0).abs() < 1e-9);
        assert!(doc.curves[3].is_closed());
        assert_eq!(doc.curves[4].segments()[0].end().x, 5.0);
    }

    #[test]
    fn rounded_rect_stays_in_its_box() {
        let src = r#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="20" height="10" rx="4"/></svg>"#;
        let doc = Document::parse(src).unwrap();
        let bb = doc.curves[0].bbox().unwrap();
        assert!(bb.xmin > -1e-9 && bb.xmax < 20.0 + 1e-9);
        assert!(bb.ymin > -1e-9 && bb.ymax < 10.0 + 1e-9);
        assert!(doc.curves[0].is_closed());
    }

    #[test]
    fn rejects_non_svg_and_bad_geometry() {
        assert!(matches!(Document::parse("<html/>"), Err(DocumentError::NotSvg { .. })));
        assert!(matches!(Document::parse("<svg"), Err(DocumentError::Xml(_))));
        let bad_d = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M 0 0 L x"/></svg>"#;
        assert!(matches!(Document::parse(bad_d), Err(DocumentError::PathData { index: 0, .. })));
        let bad_num = r#"<svg xmlns="http://www.w3.org/2000/svg"><circle r="big"/></svg>"#;
        match Document::parse(bad_num) {
            Err(DocumentError::BadNumber { attribute, .. }) => assert_eq!(attribute, "r"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn serializes_with_escaping_and_single_xmlns() {
        let mut svg = Attributes::new();
        svg.insert("xmlns".into(), SVG_NAMESPACE.into());
        svg.insert("viewBox".into(), "0 0 10 10".into());
        let mut doc = Document::new(svg);
        let mut a = Attributes::new();
        a.insert("d".into(), "M 0 0 L 1 1".into());
        a.insert("data-note".into(), "a<b & \"c\"".into());
        doc.push(parse_path_data("M 0 0 L 1 1").unwrap(), a);

        let s = doc.to_svg_string();
        assert_eq!(s.matches("xmlns=").count(), 1);
        assert!(s.contains(r#"data-note="a&lt;b &amp; &quot;c&quot;""#));
        let back = Document::parse(&s).unwrap();
        assert_eq!(back.attributes[0]["data-note"], "a<b & \"c\"");
        assert_eq!(back.curves, doc.curves);
    }

    #[test]
    fn dimensions_fall_back_to_view_box() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(doc.dimensions(), Some(("100".to_owned(), "100".to_owned())));
        let vb_only = Document::parse(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 640 480"/>"#).unwrap();
        assert_eq!(vb_only.dimensions(), Some(("640".to_owned(), "480".to_owned())));
        let bare = Document::parse(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#).unwrap();
        assert_eq!(bare.dimensions(), None);
    }
}
