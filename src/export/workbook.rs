use std::path::Path;

use log::debug;
use rust_xlsxwriter::{Chart, ChartMarker, ChartMarkerType, ChartType, Format, Workbook};

use crate::distribution::Species;
use crate::error::Result;

const SHEET: &str = "Sheet1";

/// Column headings of the exported sheet.
pub fn headings(species: &Species) -> [String; 3] {
    [
        "pH".to_string(),
        format!("Acid {} (%)", species.acid),
        format!("Base {} (%)", species.base),
    ]
}

/// Acid percentage formula for the 1-based spreadsheet `row`.
pub fn acid_formula(row: u32, pka: f64) -> String {
    format!("=100/(1+10^(A{row}-{pka}))")
}

/// Base percentage formula for the 1-based spreadsheet `row`.
pub fn base_formula(row: u32) -> String {
    format!("=100-B{row}")
}

/// Write pH values, the two percentage formula columns and a scatter chart to `path`.
pub fn write_workbook(path: &Path, ph_values: &[f64], pka: f64, species: &Species) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let last_row = ph_values.len() as u32;

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET)?;
    for (col, heading) in headings(species).iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, heading, &bold)?;
    }

    for (offset, &ph) in ph_values.iter().enumerate() {
        let row = offset as u32 + 1;
        // Formulas use 1-based row numbers, the writer 0-based indices.
        let excel_row = row + 1;
        worksheet.write_number(row, 0, ph)?;
        worksheet.write_formula(row, 1, acid_formula(excel_row, pka).as_str())?;
        worksheet.write_formula(row, 2, base_formula(excel_row).as_str())?;
    }

    let mut marker = ChartMarker::new();
    marker.set_type(ChartMarkerType::X).set_size(2);
    let mut chart = Chart::new(ChartType::ScatterSmoothWithMarkers);
    for col in [1u16, 2] {
        chart
            .add_series()
            .set_name((SHEET, 0, col))
            .set_categories((SHEET, 1, 0, last_row, 0))
            .set_values((SHEET, 1, col, last_row, col))
            .set_marker(&marker);
    }
    chart.title().set_name(species.chart_title().as_str());
    chart.x_axis().set_name("pH");
    chart.y_axis().set_name("%");

    worksheet.insert_chart(0, 4, &chart)?;
    workbook.save(path)?;
    debug!("workbook written to {}", path.display());
    Ok(())
}
