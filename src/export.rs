//! Xlsx export with highlighted headers for changed columns

use log::debug;
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet, XlsxError};
use thiserror::Error;

use crate::flatten::FlattenedTable;
use crate::model::CellValue;

/// Sheet name used in the exported workbook
pub const SHEET_NAME: &str = "Differences";

/// Suggested download filename
pub const FILE_NAME: &str = "differences.xlsx";

/// MIME type of the exported workbook
pub const CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const HEADER_HIGHLIGHT: u32 = 0xFFEB9C;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to build workbook: {0}")]
    Xlsx(#[from] XlsxError),
}

/// An exported workbook held in memory, ready to hand to a download
#[derive(Debug)]
pub struct ExportedWorkbook {
    pub bytes: Vec<u8>,
    pub file_name: &'static str,
    pub content_type: &'static str,
}

/// Serialize the flattened table to a single-sheet workbook
///
/// Columns containing at least one non-null value get a bold, highlighted
/// header; the leading row-index column is never highlighted.
pub fn export_differences(table: &FlattenedTable) -> Result<ExportedWorkbook, ExportError> {
    let mut workbook = Workbook::new();
    let highlight = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_HIGHLIGHT));

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    sheet.write_string(0, 0, "Row")?;
    let highlighted = table.highlighted_columns();
    for (idx, name) in table.columns.iter().enumerate() {
        let col = (idx + 1) as u16;
        if highlighted[idx] {
            sheet.write_string_with_format(0, col, name, &highlight)?;
        } else {
            sheet.write_string(0, col, name)?;
        }
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let out_row = (row_idx + 1) as u32;
        sheet.write_number(out_row, 0, row_idx as f64)?;
        for (col_idx, value) in row.iter().enumerate() {
            write_cell(sheet, out_row, (col_idx + 1) as u16, value)?;
        }
    }

    let bytes = workbook.save_to_buffer()?;
    debug!(
        "exported {} ({} bytes, {} highlighted columns)",
        FILE_NAME,
        bytes.len(),
        highlighted.iter().filter(|h| **h).count()
    );

    Ok(ExportedWorkbook {
        bytes,
        file_name: FILE_NAME,
        content_type: CONTENT_TYPE,
    })
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
) -> Result<(), XlsxError> {
    match value {
        CellValue::Null => {}
        CellValue::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
        CellValue::Int(i) => {
            sheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Float(f) => {
            sheet.write_number(row, col, *f)?;
        }
        CellValue::String(s) => {
            sheet.write_string(row, col, s.as_ref())?;
        }
        CellValue::Date(d) => {
            sheet.write_string(row, col, d.to_string())?;
        }
        CellValue::DateTime(dt) => {
            sheet.write_string(row, col, dt.to_string())?;
        }
    }
    Ok(())
}
