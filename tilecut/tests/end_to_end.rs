use tilecut::{crop_svg, crop_svg_to_path, CropError, CropOptions, Document};

const DIAGONAL: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
  <path id="diag" d="M 0 0 L 100 100" stroke="black" fill="none"/>
</svg>"#;

#[test]
fn diagonal_cropped_to_center_tile() {
    let (out, report) = crop_svg(DIAGONAL, 25.0, 25.0, 50.0, 50.0, &CropOptions::default()).unwrap();
    let doc = Document::parse(&out).unwrap();
    assert_eq!(doc.svg_attributes["viewBox"], "25 25 50 50");
    assert_eq!(doc.svg_attributes["width"], "50");
    assert_eq!(doc.svg_attributes["height"], "50");
    assert_eq!(doc.curves.len(), 1);
    assert_eq!(report.split, 1);
    assert_eq!(report.pieces, 1);

    let bb = doc.curves[0].bbox().unwrap();
    for v in bb.as_array() {
        assert!((25.0..=75.0).contains(&v), "piece bbox {:?}", bb);
    }
    let a = &doc.attributes[0];
    assert_eq!(a["id"], "diag");
    assert_eq!(a["stroke"], "black");
    assert_ne!(a["d"], "M 0 0 L 100 100");
}

#[test]
fn crop_to_full_view_box_keeps_everything() {
    let src = r#"<svg xmlns="http://www.w3.org/2000/svg" width="210mm" height="297mm" viewBox="0 0 210 297">
      <path d="M 10 10 C 50 0 150 0 200 10"/>
      <circle cx="105" cy="150" r="40"/>
    </svg>"#;
    let (out, report) = crop_svg(src, -1.0, -1.0, 212.0, 299.0, &CropOptions::default()).unwrap();
    let doc = Document::parse(&out).unwrap();
    assert_eq!(report.whole, 2);
    assert_eq!(doc.curves.len(), 2);
    assert_eq!(doc.svg_attributes["viewBox"], "-1 -1 212 299");

    let (same, _) = crop_svg(src, 0.0, 0.0, 210.0, 297.0, &CropOptions::default()).unwrap();
    let doc = Document::parse(&same).unwrap();
    assert_eq!(doc.svg_attributes["width"], "210mm");
    assert_eq!(doc.svg_attributes["height"], "297mm");
    assert_eq!(doc.svg_attributes["viewBox"], "0 0 210 297");
}

#[test]
fn crop_to_fractional_view_box_keeps_size_text() {
    let src = r#"<svg xmlns="http://www.w3.org/2000/svg" width="640px" height="480px" viewBox="10.3 20.7 33.1 17.9">
      <path d="M 12 22 L 40 35"/>
    </svg>"#;
    let (out, report) = crop_svg(src, 10.3, 20.7, 33.1, 17.9, &CropOptions::default()).unwrap();
    let doc = Document::parse(&out).unwrap();
    assert_eq!(doc.svg_attributes["width"], "640px");
    assert_eq!(doc.svg_attributes["height"], "480px");
    assert_eq!(doc.svg_attributes["viewBox"], "10.3 20.7 33.1 17.9");
    assert_eq!(report.whole, 1);
}

#[test]
fn group_transform_and_paint_reach_the_cropped_path() {
    let src = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
      <g transform="translate(50 0)" fill="red">
        <path d="M 30 30 L 40 40"/>
      </g>
    </svg>"#;
    let (out, _) = crop_svg(src, 25.0, 25.0, 50.0, 50.0, &CropOptions::default()).unwrap();
    let doc = Document::parse(&out).unwrap();
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.attributes[0]["transform"], "translate(50 0)");
    assert_eq!(doc.attributes[0]["fill"], "red");
}

#[test]
fn tiles_cover_a_crossing_path() {
    let src = r#"<svg xmlns="http://www.w3.org/2000/svg" width="200px" height="100px" viewBox="0 0 200 100">
      <path d="M 10 50 L 190 50"/>
    </svg>"#;
    let mut pieces = 0;
    for x in [0.0, 100.0] {
        let (out, _) = crop_svg(src, x, 0.0, 100.0, 100.0, &CropOptions::default()).unwrap();
        let doc = Document::parse(&out).unwrap();
        assert_eq!(doc.svg_attributes["width"], "100px");
        pieces += doc.curves.len();
    }
    assert_eq!(pieces, 2);
}

#[test]
fn crop_to_a_triangle() {
    let src = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
      <path d="M 0 50 L 100 50"/>
      <path d="M 90 90 L 95 95"/>
    </svg>"#;
    let (out, report) = crop_svg_to_path(src, "M 10 10 L 90 10 L 50 90 Z", &CropOptions::default()).unwrap();
    let doc = Document::parse(&out).unwrap();
    assert_eq!(report.discarded, 1);
    assert_eq!(doc.curves.len(), 1);
    let bb = doc.curves[0].bbox().unwrap();
    assert!(bb.xmin > 29.9 && bb.xmax < 70.1, "piece bbox {:?}", bb);
    assert_eq!(doc.svg_attributes["viewBox"], "10 10 80 80");
}

#[test]
fn fatal_errors_surface() {
    let opts = CropOptions::default();
    assert!(matches!(crop_svg("<svg", 0.0, 0.0, 1.0, 1.0, &opts), Err(CropError::Document(_))));
    let degenerate = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 0 10"/>"#;
    assert!(matches!(
        crop_svg(degenerate, 0.0, 0.0, 1.0, 1.0, &opts),
        Err(CropError::DegenerateViewBox { .. })
    ));
    let bad_width = r#"<svg xmlns="http://www.w3.org/2000/svg" width="huge" height="10" viewBox="0 0 10 10"/>"#;
    assert!(matches!(crop_svg(bad_width, 0.0, 0.0, 1.0, 1.0, &opts), Err(CropError::Dimension(_))));
    let ok = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"/>"#;
    assert!(matches!(crop_svg_to_path(ok, "L 1 1", &opts), Err(CropError::PathData(_))));
    assert!(matches!(crop_svg_to_path(ok, "M 1 1 L 9 1 L 9 9", &opts), Err(CropError::OpenBoundary)));
}
