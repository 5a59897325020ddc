//! Box-drawn text grid preview

use std::io::Write;

use anyhow::Result;

use crate::flatten::FlattenedTable;
use crate::model::Table;

use super::PreviewRenderer;

/// Aligned text-grid renderer
pub struct GridOutput;

impl GridOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GridOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewRenderer for GridOutput {
    fn render_table(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        let headers: Vec<String> = table.column_names().map(String::from).collect();
        let rows: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| row.iter().map(|c| c.display().into_owned()).collect())
            .collect();
        writeln!(writer, "{}", build_grid(&headers, &rows))?;
        Ok(())
    }

    fn render_flattened(&self, table: &FlattenedTable, writer: &mut dyn Write) -> Result<()> {
        let rows: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| row.iter().map(|c| c.display().into_owned()).collect())
            .collect();
        writeln!(writer, "{}", build_grid(&table.columns, &rows))?;
        Ok(())
    }
}

/// Build a box-drawn grid from headers and stringified rows
fn build_grid(headers: &[String], rows: &[Vec<String>]) -> String {
    if headers.is_empty() {
        return String::new();
    }

    let mut col_widths: Vec<usize> = headers.iter().map(String::len).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < col_widths.len() {
                col_widths[i] = col_widths[i].max(cell.len());
            }
        }
    }

    let border = |left: char, mid: char, right: char| {
        let mut line = String::new();
        line.push(left);
        for (i, width) in col_widths.iter().enumerate() {
            line.push_str(&"─".repeat(*width + 2));
            line.push(if i < col_widths.len() - 1 { mid } else { right });
        }
        line.push('\n');
        line
    };

    let render_row = |cells: &[String]| {
        let mut line = String::from('│');
        for (i, width) in col_widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            line.push_str(&format!(" {:width$} │", cell, width = width));
        }
        line.push('\n');
        line
    };

    let mut output = String::new();
    output.push_str(&border('┌', '┬', '┐'));
    output.push_str(&render_row(headers));
    output.push_str(&border('├', '┼', '┤'));
    for row in rows {
        output.push_str(&render_row(row));
    }
    output.push_str(&border('└', '┴', '┘'));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, Column};

    #[test]
    fn test_grid_contains_headers_and_values() {
        let mut table = Table::new(vec![Column::new("id", 0), Column::new("name", 1)]);
        table.add_row(vec![CellValue::Int(1), CellValue::from("Alice")]);

        let mut buf = Vec::new();
        GridOutput::new().render_table(&table, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("id"));
        assert!(text.contains("Alice"));
        assert!(text.contains('┌'));
    }

    #[test]
    fn test_null_cells_render_as_null() {
        let mut table = Table::new(vec![Column::new("x", 0)]);
        table.add_row(vec![CellValue::Null]);

        let mut buf = Vec::new();
        GridOutput::new().render_table(&table, &mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("NULL"));
    }
}
