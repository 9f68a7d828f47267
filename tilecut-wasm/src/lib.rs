mod api;
mod error;
mod interop;

pub use api::{crop_svg, crop_svg_to_path, crop_svg_with_options, set_panic_hook, svg_dimensions};
