//! sheetdiff - Cell-level diff for spreadsheet files
//!
//! Compares two equally-shaped spreadsheets position by position and exports
//! the differences as an xlsx workbook in which the headers of changed
//! columns are highlighted.

pub mod config;
pub mod diff;
pub mod export;
pub mod flatten;
pub mod loader;
pub mod model;
pub mod output;

pub use config::Config;
pub use diff::DiffResult;
pub use flatten::FlattenedTable;
pub use model::Table;
