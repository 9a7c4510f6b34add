use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use log::debug;
use resvg::{tiny_skia, usvg};

use crate::distribution::{Distribution, Species};
use crate::error::{AppError, Context, Result};
use crate::utils::escape_xml;

const ACID_STROKE: &str = "#1f77b4";
const BASE_STROKE: &str = "#ff7f0e";
const GRID_STROKE: &str = "#e0e0e0";
const FONT: &str = "DejaVu Sans, Arial, Helvetica, sans-serif";

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 60.0;

/// Pixel geometry of the plotting area inside the image.
struct Plot {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    ph_min: f64,
    ph_max: f64,
}

impl Plot {
    fn new(width: u32, height: u32, (ph_min, ph_max): (f64, f64)) -> Self {
        let ph_max = if ph_max > ph_min { ph_max } else { ph_min + 1.0 };
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: f64::from(width) - MARGIN_LEFT - MARGIN_RIGHT,
            height: f64::from(height) - MARGIN_TOP - MARGIN_BOTTOM,
            ph_min,
            ph_max,
        }
    }

    fn x(&self, ph: f64) -> f64 {
        self.left + (ph - self.ph_min) / (self.ph_max - self.ph_min) * self.width
    }

    fn y(&self, percent: f64) -> f64 {
        self.top + (100.0 - percent) / 100.0 * self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Tick positions on the pH axis: every unit, or every second unit on wide ranges.
    fn ph_ticks(&self) -> Vec<f64> {
        let span = self.ph_max - self.ph_min;
        let step = if span > 10.0 { 2.0 } else { 1.0 };
        let mut ticks = Vec::new();
        let mut tick = (self.ph_min / step).ceil() * step;
        while tick <= self.ph_max + 1e-9 {
            ticks.push(tick);
            tick += step;
        }
        ticks
    }
}

fn polyline(plot: &Plot, points: &[(f64, f64)], stroke: &str) -> String {
    let coords: Vec<String> = points
        .iter()
        .map(|&(ph, percent)| format!("{:.2},{:.2}", plot.x(ph), plot.y(percent)))
        .collect();
    format!(
        r#"<polyline points="{}" fill="none" stroke="{stroke}" stroke-width="2"/>"#,
        coords.join(" ")
    )
}

/// Build the diagram as a standalone SVG document.
pub fn svg_document(distribution: &Distribution, species: &Species, width: u32, height: u32) -> Result<String> {
    let mut svg = String::new();
    write_svg(&mut svg, distribution, species, width, height)
        .map_err(|err| AppError::Render(err.to_string()))?;
    Ok(svg)
}

fn write_svg(
    svg: &mut String,
    distribution: &Distribution,
    species: &Species,
    width: u32,
    height: u32,
) -> fmt::Result {
    let plot = Plot::new(width, height, distribution.ph_bounds());

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="{FONT}">"#
    )?;
    writeln!(svg, r#"<rect width="{width}" height="{height}" fill="white"/>"#)?;
    writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="18">{}</text>"#,
        plot.left,
        MARGIN_TOP / 2.0,
        escape_xml(&species.chart_title())
    )?;

    for tick in plot.ph_ticks() {
        let x = plot.x(tick);
        writeln!(
            svg,
            r#"<line x1="{x:.2}" y1="{:.2}" x2="{x:.2}" y2="{:.2}" stroke="{GRID_STROKE}"/>"#,
            plot.top,
            plot.bottom()
        )?;
        writeln!(
            svg,
            r#"<text x="{x:.2}" y="{:.2}" font-size="12" text-anchor="middle">{tick}</text>"#,
            plot.bottom() + 18.0
        )?;
    }
    for percent in (0..=100).step_by(10) {
        let y = plot.y(f64::from(percent));
        writeln!(
            svg,
            r#"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{GRID_STROKE}"/>"#,
            plot.left,
            plot.right()
        )?;
        writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" font-size="12" text-anchor="end">{percent}</text>"#,
            plot.left - 8.0,
            y + 4.0
        )?;
    }

    writeln!(
        svg,
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="black"/>"#,
        plot.left, plot.top, plot.width, plot.height
    )?;
    writeln!(
        svg,
        r#"<text x="{:.2}" y="{:.2}" font-size="14" text-anchor="middle">pH</text>"#,
        plot.left + plot.width / 2.0,
        plot.bottom() + 42.0
    )?;
    writeln!(
        svg,
        r#"<text transform="translate({:.2},{:.2}) rotate(-90)" font-size="14" text-anchor="middle">% species</text>"#,
        MARGIN_LEFT / 3.0,
        plot.top + plot.height / 2.0
    )?;

    writeln!(svg, "{}", polyline(&plot, &distribution.acid_series(), ACID_STROKE))?;
    writeln!(svg, "{}", polyline(&plot, &distribution.base_series(), BASE_STROKE))?;

    // Legend, vertically centered against the right edge of the plot.
    let legend_x = plot.right() - 160.0;
    let legend_y = plot.top + plot.height / 2.0 - 25.0;
    writeln!(
        svg,
        r##"<rect x="{legend_x:.2}" y="{legend_y:.2}" width="150" height="50" fill="white" stroke="#cccccc"/>"##
    )?;
    for (row, (label, stroke)) in [(&species.acid, ACID_STROKE), (&species.base, BASE_STROKE)]
        .into_iter()
        .enumerate()
    {
        let y = legend_y + 17.0 + row as f64 * 18.0;
        writeln!(
            svg,
            r#"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{stroke}" stroke-width="2"/>"#,
            legend_x + 10.0,
            legend_x + 35.0
        )?;
        writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" font-size="12">{}</text>"#,
            legend_x + 42.0,
            y + 4.0,
            escape_xml(label)
        )?;
    }

    svg.push_str("</svg>\n");
    Ok(())
}

/// Rasterize an SVG document into PNG bytes.
pub fn render_png(svg: &str) -> Result<Vec<u8>> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &options).map_err(|err| AppError::Render(err.to_string()))?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| AppError::Render(format!("invalid image size {}x{}", size.width(), size.height())))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    pixmap
        .encode_png()
        .map_err(|err| AppError::Render(err.to_string()))
}

/// Save the diagram as PNG, or as SVG when `path` ends in `.svg`.
pub fn save_chart_image(
    path: &Path,
    distribution: &Distribution,
    species: &Species,
    width: u32,
    height: u32,
) -> Result<()> {
    let svg = svg_document(distribution, species, width, height)?;
    let is_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    let bytes = if is_svg { svg.into_bytes() } else { render_png(&svg)? };
    fs::write(path, bytes).with_context(|| format!("failed to write chart to {}", path.display()))?;
    debug!("chart written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::ph_grid;

    fn sample() -> (Distribution, Species) {
        (
            Distribution::compute(4.75, &ph_grid(0.0, 14.0, 0.1)),
            Species::new("CH3COOH", "CH3COO<->"),
        )
    }

    #[test]
    fn document_contains_both_curves_and_escaped_labels() {
        let (distribution, species) = sample();
        let svg = svg_document(&distribution, &species, 1000, 600).expect("svg");

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains(ACID_STROKE) && svg.contains(BASE_STROKE));
        assert!(svg.contains("CH3COO&lt;-&gt;"));
        assert!(!svg.contains("CH3COO<->"));
    }

    #[test]
    fn ticks_cover_the_ph_range() {
        let plot = Plot::new(1000, 600, (0.0, 14.0));
        assert_eq!(plot.ph_ticks(), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0]);
        assert_eq!(plot.x(0.0), MARGIN_LEFT);
        assert_eq!(plot.x(14.0), plot.right());
        assert_eq!(plot.y(100.0), MARGIN_TOP);
        assert_eq!(plot.y(0.0), plot.bottom());
    }

    #[test]
    fn writes_png_file() {
        let (distribution, species) = sample();
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("diagram.png");

        save_chart_image(&path, &distribution, &species, 400, 300).expect("png written");
        let bytes = fs::read(&path).expect("read png");
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn svg_extension_writes_the_document() {
        let (distribution, species) = sample();
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("diagram.SVG");

        save_chart_image(&path, &distribution, &species, 400, 300).expect("svg written");
        let text = fs::read_to_string(&path).expect("read svg");
        assert!(text.starts_with("<svg"));
    }
}
