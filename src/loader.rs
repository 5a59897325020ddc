//! Spreadsheet loading (xlsx, xls, ods)

use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Xlsx};
use log::debug;
use thiserror::Error;

use crate::config::Config;
use crate::model::{CellValue, Column, Table};

/// Errors raised while loading a spreadsheet into a [`Table`]
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open workbook: {0}")]
    Workbook(String),
    #[error("workbook contains no sheets")]
    NoSheets,
    #[error("failed to read sheet '{name}': {message}")]
    Sheet { name: String, message: String },
    #[error("sheet '{0}' has no columns")]
    NoColumns(String),
}

/// Load a table from a spreadsheet file on disk
pub fn load_path(path: &Path, config: &Config) -> Result<Table, LoadError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| LoadError::Workbook(e.to_string()))?;

    let sheet_name = if let Some(ref name) = config.sheet_name {
        name.clone()
    } else {
        let sheets = workbook.sheet_names();
        if sheets.is_empty() {
            return Err(LoadError::NoSheets);
        }
        sheets[0].clone()
    };

    let range: Range<Data> = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::Sheet {
            name: sheet_name.clone(),
            message: e.to_string(),
        })?;

    parse_range(range, &sheet_name)
}

/// Load a table from an in-memory upload buffer (xlsx)
pub fn load_bytes(bytes: &[u8], config: &Config) -> Result<Table, LoadError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| LoadError::Workbook(e.to_string()))?;

    let sheet_name = if let Some(ref name) = config.sheet_name {
        name.clone()
    } else {
        let sheets = workbook.sheet_names();
        if sheets.is_empty() {
            return Err(LoadError::NoSheets);
        }
        sheets[0].clone()
    };

    let range: Range<Data> = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::Sheet {
            name: sheet_name.clone(),
            message: e.to_string(),
        })?;

    parse_range(range, &sheet_name)
}

fn parse_range(range: Range<Data>, sheet_name: &str) -> Result<Table, LoadError> {
    let (_, col_count) = range.get_size();

    // First row is header
    let header_row = range
        .rows()
        .next()
        .ok_or_else(|| LoadError::NoColumns(sheet_name.to_string()))?;

    let columns: Vec<Column> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell_to_string(cell);
            Column::new(
                if name.is_empty() {
                    format!("Column{}", i + 1)
                } else {
                    name
                },
                i,
            )
        })
        .collect();

    if columns.is_empty() {
        return Err(LoadError::NoColumns(sheet_name.to_string()));
    }

    let mut table = Table::new(columns);

    for row in range.rows().skip(1) {
        let cells: Vec<CellValue> = row.iter().take(col_count).map(convert_cell).collect();
        table.add_row(cells);
    }

    debug!(
        "loaded sheet '{}': {} rows x {} columns",
        sheet_name,
        table.row_count(),
        table.column_count()
    );

    Ok(table)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => {
            // Whitespace-only strings normalize to null, same as empty cells
            if s.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::String(Cow::Owned(s.clone()))
            }
        }
        Data::Float(f) => {
            // Check if it's actually an integer
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(ref dt) => {
            let s = format!("{}", dt);
            if let Ok(datetime) =
                chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
            {
                CellValue::DateTime(datetime)
            } else if let Ok(datetime) =
                chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
            {
                CellValue::DateTime(datetime)
            } else if let Ok(date) = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
                CellValue::Date(date)
            } else {
                CellValue::String(Cow::Owned(s))
            }
        }
        Data::DateTimeIso(s) => {
            if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                CellValue::DateTime(dt)
            } else if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                CellValue::Date(d)
            } else {
                CellValue::String(Cow::Owned(s.clone()))
            }
        }
        Data::DurationIso(s) => CellValue::String(Cow::Owned(s.clone())),
        Data::Error(e) => CellValue::String(Cow::Owned(format!("#{:?}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn sample_workbook_bytes() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "id").unwrap();
        sheet.write_string(0, 1, "name").unwrap();
        sheet.write_string(0, 2, "score").unwrap();
        sheet.write_string(0, 3, "active").unwrap();
        sheet.write_number(1, 0, 1.0).unwrap();
        sheet.write_string(1, 1, "Alice").unwrap();
        sheet.write_number(1, 2, 2.5).unwrap();
        sheet.write_boolean(1, 3, true).unwrap();
        sheet.write_number(2, 0, 2.0).unwrap();
        sheet.write_string(2, 1, "   ").unwrap();
        // score left empty on row 2
        sheet.write_boolean(2, 3, false).unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_load_bytes_types() {
        let bytes = sample_workbook_bytes();
        let table = load_bytes(&bytes, &Config::default()).unwrap();

        let names: Vec<_> = table.column_names().collect();
        assert_eq!(names, vec!["id", "name", "score", "active"]);
        assert_eq!(table.row_count(), 2);

        // Whole numbers parse as ints, fractions as floats
        assert_eq!(table.get(0, "id"), Some(&CellValue::Int(1)));
        assert_eq!(table.get(0, "score"), Some(&CellValue::Float(2.5)));
        assert_eq!(table.get(0, "active"), Some(&CellValue::Bool(true)));
        // Whitespace-only and missing cells both normalize to null
        assert_eq!(table.get(1, "name"), Some(&CellValue::Null));
        assert_eq!(table.get(1, "score"), Some(&CellValue::Null));
    }

    #[test]
    fn test_load_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.xlsx");
        std::fs::write(&path, sample_workbook_bytes()).unwrap();

        let table = load_path(&path, &Config::default()).unwrap();
        assert_eq!(table.column_count(), 4);
        assert_eq!(table.get(1, "id"), Some(&CellValue::Int(2)));
    }

    #[test]
    fn test_empty_sheet_is_an_error() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        let bytes = workbook.save_to_buffer().unwrap();

        let err = load_bytes(&bytes, &Config::default()).unwrap_err();
        assert!(matches!(err, LoadError::NoColumns(_)));
    }

    #[test]
    fn test_garbage_bytes_are_an_error() {
        let err = load_bytes(b"not a workbook", &Config::default()).unwrap_err();
        assert!(matches!(err, LoadError::Workbook(_)));
    }

    #[test]
    fn test_missing_sheet_is_an_error() {
        let bytes = sample_workbook_bytes();
        let config = Config::default().with_sheet_name("NoSuchSheet".to_string());
        let err = load_bytes(&bytes, &config).unwrap_err();
        assert!(matches!(err, LoadError::Sheet { .. }));
    }
}
