pub mod image;
pub mod workbook;

pub use image::{render_png, save_chart_image, svg_document};
pub use workbook::{acid_formula, base_formula, write_workbook};
