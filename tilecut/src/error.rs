use thiserror::Error;

/// Failures of the dimension codec.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DimensionError {
    #[error("malformed dimension {value:?}")]
    Malformed { value: String },
    #[error("unsupported unit {unit:?}")]
    UnsupportedUnit { unit: String },
}

/// Failures of sub-curve extraction.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("empty parameter range [{start}, {stop}]")]
    EmptyRange { start: f64, stop: f64 },
    #[error("curve has no segments")]
    EmptyCurve,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathDataError {
    #[error("path data is {len} bytes, over the ingestion cap")]
    TooLong { len: usize },
    #[error("path data has more commands or segments than the ingestion cap")]
    TooManyCommands,
    #[error("unexpected character {ch:?} at byte {pos}")]
    UnexpectedChar { pos: usize, ch: char },
    #[error("expected a number at byte {pos}")]
    MissingNumber { pos: usize },
    #[error("coordinate out of bounds at byte {pos}")]
    OutOfBounds { pos: usize },
    #[error("path data must start with a moveto")]
    MissingMoveTo,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("root element is <{root}>, expected <svg>")]
    NotSvg { root: String },
    #[error("document is over the ingestion cap")]
    TooLarge,
    #[error("element #{index} (<{tag}>) has invalid geometry: {source}")]
    PathData {
        index: usize,
        tag: String,
        #[source]
        source: PathDataError,
    },
    #[error("element #{index} (<{tag}>) has a non-numeric {attribute:?}")]
    BadNumber { index: usize, tag: String, attribute: String },
    #[error("document JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported document JSON version {0}")]
    JsonVersion(u32),
}

/// Fatal failures of a crop call.
#[derive(Debug, Error)]
pub enum CropError {
    #[error(transparent)]
    Dimension(#[from] DimensionError),
    #[error("source viewBox {view_box:?} has no positive extent")]
    DegenerateViewBox { view_box: String },
    #[error("malformed viewBox {0:?}")]
    MalformedViewBox(String),
    #[error("document has neither a viewBox nor width and height")]
    MissingViewBox,
    #[error("crop boundary has no geometry")]
    EmptyBoundary,
    #[error("crop boundary is not closed")]
    OpenBoundary,
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("invalid crop boundary: {0}")]
    PathData(#[from] PathDataError),
}
