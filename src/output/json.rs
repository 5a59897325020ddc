//! JSON preview format

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::flatten::FlattenedTable;
use crate::model::{CellValue, Table};

use super::PreviewRenderer;

/// JSON preview renderer
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    fn write<W: Write>(&self, output: &JsonTable, mut writer: W) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, output)?;
        } else {
            serde_json::to_writer(&mut writer, output)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable table for JSON output
#[derive(Serialize)]
struct JsonTable {
    columns: Vec<String>,
    rows: Vec<Vec<serde_json::Value>>,
}

fn cell_value_to_json(value: &CellValue) -> serde_json::Value {
    match value {
        CellValue::Null => serde_json::Value::Null,
        CellValue::Bool(b) => serde_json::Value::Bool(*b),
        CellValue::Int(i) => serde_json::json!(*i),
        CellValue::Float(f) => serde_json::json!(*f),
        CellValue::String(s) => serde_json::Value::String(s.to_string()),
        CellValue::Date(d) => serde_json::Value::String(d.to_string()),
        CellValue::DateTime(dt) => serde_json::Value::String(dt.to_string()),
    }
}

fn json_rows(rows: &[Vec<CellValue>]) -> Vec<Vec<serde_json::Value>> {
    rows.iter()
        .map(|row| row.iter().map(cell_value_to_json).collect())
        .collect()
}

impl PreviewRenderer for JsonOutput {
    fn render_table(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        let output = JsonTable {
            columns: table.column_names().map(String::from).collect(),
            rows: json_rows(&table.rows),
        };
        self.write(&output, writer)
    }

    fn render_flattened(&self, table: &FlattenedTable, writer: &mut dyn Write) -> Result<()> {
        let output = JsonTable {
            columns: table.columns.clone(),
            rows: json_rows(&table.rows),
        };
        self.write(&output, writer)
    }
}
