//! Preview rendering for loaded tables and flattened diffs

mod grid;
mod json;

use std::io::Write;

use anyhow::Result;

use crate::config::OutputFormat;
use crate::flatten::FlattenedTable;
use crate::model::Table;

pub use grid::GridOutput;
pub use json::JsonOutput;

/// Trait for preview renderers
pub trait PreviewRenderer {
    /// Render a loaded input table
    fn render_table(&self, table: &Table, writer: &mut dyn Write) -> Result<()>;

    /// Render the flattened diff
    fn render_flattened(&self, table: &FlattenedTable, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating preview renderers
pub struct PreviewFactory;

impl PreviewFactory {
    /// Create a renderer based on format type
    pub fn create(format: OutputFormat) -> Box<dyn PreviewRenderer> {
        match format {
            OutputFormat::Grid => Box::new(GridOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}
