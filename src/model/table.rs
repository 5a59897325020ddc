//! Table and cell value data structures

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::schema::{CellType, Column};

/// A cell value with type information
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Cow<'static, str>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            // Cross-type numeric comparison
            (CellValue::Int(a), CellValue::Float(b)) => (*a as f64) == *b,
            (CellValue::Float(a), CellValue::Int(b)) => *a == (*b as f64),
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed("NULL"),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::String(s) => Cow::Borrowed(s.as_ref()),
            CellValue::Date(d) => Cow::Owned(d.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.to_string()),
        }
    }

    /// The type of this single value
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Null => CellType::Null,
            CellValue::Bool(_) => CellType::Bool,
            CellValue::Int(_) => CellType::Int,
            CellValue::Float(_) => CellType::Float,
            CellValue::String(_) => CellType::String,
            CellValue::Date(_) => CellType::Date,
            CellValue::DateTime(_) => CellType::DateTime,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(Cow::Owned(s.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(Cow::Owned(s))
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

/// A table parsed from one worksheet
///
/// Invariant: every row holds exactly `columns.len()` cells. Row order is
/// significant and preserved end-to-end.
#[derive(Debug, Clone)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Rows in source order, cells in column order
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create a new empty table with column definitions
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Add a row, padding with nulls so it matches the column count
    pub fn add_row(&mut self, mut cells: Vec<CellValue>) {
        cells.truncate(self.columns.len());
        if cells.len() < self.columns.len() {
            cells.resize(self.columns.len(), CellValue::Null);
        }

        for (column, cell) in self.columns.iter_mut().zip(&cells) {
            column.inferred_type = column.inferred_type.widen(cell.cell_type());
        }

        self.rows.push(cells);
    }

    /// Get a cell by row index and column name
    pub fn get(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
