//! Positional diff engine for equally-shaped tables

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::model::{CellValue, Table};

/// The two halves of one changed cell
///
/// `self_value` comes from the new table, `other_value` from the old table.
/// A `ComparisonCell` exists only where the two values differ.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonCell {
    pub self_value: CellValue,
    pub other_value: CellValue,
}

/// The two input tables do not line up for positional comparison
#[derive(Debug, Error)]
pub enum ShapeMismatchError {
    #[error("row counts differ: old table has {old} rows, new table has {new}")]
    RowCount { old: usize, new: usize },
    #[error("column counts differ: old table has {old} columns, new table has {new}")]
    ColumnCount { old: usize, new: usize },
    #[error("column {index} differs: old table has '{old}', new table has '{new}'")]
    ColumnName {
        index: usize,
        old: String,
        new: String,
    },
}

/// Per-cell comparison of two tables, aligned purely by row position
#[derive(Debug)]
pub struct DiffResult {
    /// Column names shared by both inputs, in input order
    pub columns: Vec<String>,
    /// One ordered mapping per row from column name to the changed-cell
    /// pair, `None` where the two tables agree at that position
    pub rows: Vec<IndexMap<String, Option<ComparisonCell>>>,
}

impl DiffResult {
    /// Look up the comparison at (row index, column name)
    pub fn get(&self, row: usize, column: &str) -> Option<&ComparisonCell> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_ref())
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of logical columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Total number of populated comparison cells
    pub fn changed_cell_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.values().filter(|c| c.is_some()).count())
            .sum()
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.rows
            .iter()
            .any(|row| row.values().any(|c| c.is_some()))
    }
}

/// Compare two tables position by position
///
/// Rows are aligned strictly by index; there is no key-based matching.
/// Shape mismatches fail fast rather than padding or truncating.
pub fn diff_tables(
    new_table: &Table,
    old_table: &Table,
) -> Result<DiffResult, ShapeMismatchError> {
    check_shapes(old_table, new_table)?;

    let columns: Vec<String> = new_table.columns.iter().map(|c| c.name.clone()).collect();

    let rows = new_table
        .rows
        .iter()
        .zip(&old_table.rows)
        .map(|(new_row, old_row)| {
            columns
                .iter()
                .enumerate()
                .map(|(idx, name)| {
                    let new_value = &new_row[idx];
                    let old_value = &old_row[idx];
                    let cell = if new_value == old_value {
                        None
                    } else {
                        Some(ComparisonCell {
                            self_value: new_value.clone(),
                            other_value: old_value.clone(),
                        })
                    };
                    (name.clone(), cell)
                })
                .collect()
        })
        .collect();

    let result = DiffResult { columns, rows };
    debug!(
        "diff: {} changed cells across {} rows",
        result.changed_cell_count(),
        result.row_count()
    );
    Ok(result)
}

fn check_shapes(old_table: &Table, new_table: &Table) -> Result<(), ShapeMismatchError> {
    if old_table.column_count() != new_table.column_count() {
        return Err(ShapeMismatchError::ColumnCount {
            old: old_table.column_count(),
            new: new_table.column_count(),
        });
    }

    for (index, (old_col, new_col)) in old_table
        .columns
        .iter()
        .zip(&new_table.columns)
        .enumerate()
    {
        if old_col.name != new_col.name {
            return Err(ShapeMismatchError::ColumnName {
                index,
                old: old_col.name.clone(),
                new: new_col.name.clone(),
            });
        }
    }

    if old_table.row_count() != new_table.row_count() {
        return Err(ShapeMismatchError::RowCount {
            old: old_table.row_count(),
            new: new_table.row_count(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

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
    fn test_self_diff_is_empty() {
        let t = table(
            &["id", "name"],
            vec![
                vec![CellValue::Int(1), CellValue::from("A")],
                vec![CellValue::Int(2), CellValue::Null],
            ],
        );
        let diff = diff_tables(&t, &t).unwrap();
        assert!(!diff.has_changes());
        assert_eq!(diff.changed_cell_count(), 0);
        assert_eq!(diff.row_count(), 2);
    }

    #[test]
    fn test_single_cell_change() {
        let old = table(
            &["id", "name"],
            vec![vec![CellValue::Int(1), CellValue::from("A")]],
        );
        let new = table(
            &["id", "name"],
            vec![vec![CellValue::Int(1), CellValue::from("B")]],
        );

        let diff = diff_tables(&new, &old).unwrap();
        let cell = diff.get(0, "name").unwrap();
        assert_eq!(cell.self_value, CellValue::from("B"));
        assert_eq!(cell.other_value, CellValue::from("A"));
        assert!(diff.get(0, "id").is_none());
        assert_eq!(diff.changed_cell_count(), 1);
    }

    #[test]
    fn test_diff_is_symmetric_with_halves_swapped() {
        let a = table(
            &["x", "y"],
            vec![vec![CellValue::Int(1), CellValue::from("p")]],
        );
        let b = table(
            &["x", "y"],
            vec![vec![CellValue::Int(2), CellValue::from("p")]],
        );

        let forward = diff_tables(&a, &b).unwrap();
        let backward = diff_tables(&b, &a).unwrap();

        for row in 0..forward.row_count() {
            for col in &forward.columns {
                match (forward.get(row, col), backward.get(row, col)) {
                    (Some(f), Some(r)) => {
                        assert_eq!(f.self_value, r.other_value);
                        assert_eq!(f.other_value, r.self_value);
                    }
                    (None, None) => {}
                    other => panic!("changed positions diverge: {:?}", other),
                }
            }
        }
    }

    #[test]
    fn test_null_to_value_change() {
        let old = table(&["score"], vec![vec![CellValue::Null]]);
        let new = table(&["score"], vec![vec![CellValue::Int(5)]]);

        let diff = diff_tables(&new, &old).unwrap();
        let cell = diff.get(0, "score").unwrap();
        assert_eq!(cell.self_value, CellValue::Int(5));
        assert_eq!(cell.other_value, CellValue::Null);
    }

    #[test]
    fn test_numeric_coercion_is_not_a_change() {
        let old = table(&["n"], vec![vec![CellValue::Int(1)]]);
        let new = table(&["n"], vec![vec![CellValue::Float(1.0)]]);
        let diff = diff_tables(&new, &old).unwrap();
        assert!(!diff.has_changes());
    }

    #[test]
    fn test_row_count_mismatch_names_both_counts() {
        let old = table(
            &["id"],
            vec![vec![CellValue::Int(1)], vec![CellValue::Int(2)]],
        );
        let new = table(
            &["id"],
            vec![
                vec![CellValue::Int(1)],
                vec![CellValue::Int(2)],
                vec![CellValue::Int(3)],
            ],
        );

        let err = diff_tables(&new, &old).unwrap_err();
        match &err {
            ShapeMismatchError::RowCount { old, new } => {
                assert_eq!(*old, 2);
                assert_eq!(*new, 3);
            }
            other => panic!("expected RowCount, got {:?}", other),
        }
        assert!(err.to_string().contains('2') && err.to_string().contains('3'));
    }

    #[test]
    fn test_column_name_mismatch() {
        let old = table(&["id", "name"], vec![]);
        let new = table(&["id", "label"], vec![]);
        let err = diff_tables(&new, &old).unwrap_err();
        assert!(matches!(
            err,
            ShapeMismatchError::ColumnName { index: 1, .. }
        ));
    }

    #[test]
    fn test_column_count_mismatch() {
        let old = table(&["id"], vec![]);
        let new = table(&["id", "name"], vec![]);
        let err = diff_tables(&new, &old).unwrap_err();
        assert!(matches!(
            err,
            ShapeMismatchError::ColumnCount { old: 1, new: 2 }
        ));
    }
}
