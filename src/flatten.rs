//! Flattening a diff into an export-ready table

use log::debug;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::diff::DiffResult;
use crate::model::CellValue;

/// Flattening produced the same output column name twice
#[derive(Debug, Error)]
#[error("flattened column name '{name}' is produced more than once")]
pub struct NameCollisionError {
    pub name: String,
}

/// Export-ready table with a `<col>_self` / `<col>_other` pair per
/// original column
#[derive(Debug)]
pub struct FlattenedTable {
    /// Output column names, self-then-other per original column
    pub columns: Vec<String>,
    /// Rows in diff order; unchanged positions hold null in both halves
    pub rows: Vec<Vec<CellValue>>,
}

impl FlattenedTable {
    /// True when the column holds at least one non-null value
    pub fn column_has_values(&self, index: usize) -> bool {
        self.rows
            .iter()
            .any(|row| row.get(index).is_some_and(|c| !c.is_null()))
    }

    /// Per-column highlight decisions for the exporter, in column order
    pub fn highlighted_columns(&self) -> Vec<bool> {
        (0..self.columns.len())
            .map(|i| self.column_has_values(i))
            .collect()
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

/// Reshape a [`DiffResult`] into a single flat table
///
/// For each original column `C`, in order, the output gets adjacent
/// `C_self` and `C_other` columns. Row count and order are unchanged.
pub fn flatten(diff: &DiffResult) -> Result<FlattenedTable, NameCollisionError> {
    let mut columns = Vec::with_capacity(diff.columns.len() * 2);
    let mut seen = FxHashSet::default();

    for name in &diff.columns {
        for suffix in ["self", "other"] {
            let flat = format!("{}_{}", name, suffix);
            if !seen.insert(flat.clone()) {
                return Err(NameCollisionError { name: flat });
            }
            columns.push(flat);
        }
    }

    let rows = diff
        .rows
        .iter()
        .map(|row| {
            let mut cells = Vec::with_capacity(columns.len());
            for cell in row.values() {
                match cell {
                    Some(pair) => {
                        cells.push(pair.self_value.clone());
                        cells.push(pair.other_value.clone());
                    }
                    None => {
                        cells.push(CellValue::Null);
                        cells.push(CellValue::Null);
                    }
                }
            }
            cells
        })
        .collect();

    let table = FlattenedTable { columns, rows };
    debug!(
        "flattened diff: {} rows x {} columns",
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff_tables;
    use crate::model::{Column, Table};

    fn table(names: &[&str], rows: Vec<Vec<CellValue>>) -> Table {
        let columns = names
            .iter()
            .enumerate()
            .map(|(i, n)| Column::new(*n, i))
            .collect();
        let mut table = Table::new(columns);
        for row in rows {
            table.add_row(row);
        }
        table
    }

    #[test]
    fn test_shape_and_naming() {
        let old = table(
            &["id", "name"],
            vec![vec![CellValue::Int(1), CellValue::from("A")]],
        );
        let new = table(
            &["id", "name"],
            vec![vec![CellValue::Int(1), CellValue::from("B")]],
        );

        let diff = diff_tables(&new, &old).unwrap();
        let flat = flatten(&diff).unwrap();

        assert_eq!(
            flat.columns,
            vec!["id_self", "id_other", "name_self", "name_other"]
        );
        assert_eq!(flat.row_count(), diff.row_count());
        assert_eq!(flat.column_count(), 2 * diff.column_count());
        assert_eq!(
            flat.rows[0],
            vec![
                CellValue::Null,
                CellValue::Null,
                CellValue::from("B"),
                CellValue::from("A"),
            ]
        );
    }

    #[test]
    fn test_identical_tables_flatten_to_all_nulls() {
        let t = table(
            &["id", "name"],
            vec![vec![CellValue::Int(1), CellValue::from("A")]],
        );
        let flat = flatten(&diff_tables(&t, &t).unwrap()).unwrap();
        assert!(flat.rows[0].iter().all(CellValue::is_null));
        assert_eq!(flat.highlighted_columns(), vec![false; 4]);
    }

    #[test]
    fn test_highlight_iff_column_has_a_value() {
        let old = table(&["score"], vec![vec![CellValue::Null]]);
        let new = table(&["score"], vec![vec![CellValue::Int(5)]]);

        let flat = flatten(&diff_tables(&new, &old).unwrap()).unwrap();
        // score changed null -> 5: self column holds a value, other does not
        assert_eq!(flat.highlighted_columns(), vec![true, false]);
    }

    #[test]
    fn test_duplicate_headers_collide() {
        let old = table(
            &["a", "a"],
            vec![vec![CellValue::Int(1), CellValue::Int(2)]],
        );
        let new = old.clone();

        let diff = diff_tables(&new, &old).unwrap();
        let err = flatten(&diff).unwrap_err();
        assert_eq!(err.name, "a_self");
    }
}
