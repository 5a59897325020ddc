//! Configuration handling for sheetdiff

use std::path::PathBuf;

/// Preview output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Grid,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grid" => Ok(OutputFormat::Grid),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Configuration for one comparison run
///
/// All state is request-scoped: the pipeline never reads anything ambient.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the old/original file
    pub old_file: PathBuf,
    /// Path to the new file
    pub new_file: PathBuf,
    /// Which sheet to compare (defaults to the first sheet)
    pub sheet_name: Option<String>,
    /// Where the CLI writes the differences workbook
    pub output: PathBuf,
    /// Preview format
    pub output_format: OutputFormat,
    /// Print previews of both input tables before diffing
    pub preview: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            old_file: PathBuf::new(),
            new_file: PathBuf::new(),
            sheet_name: None,
            output: PathBuf::from(crate::export::FILE_NAME),
            output_format: OutputFormat::default(),
            preview: false,
        }
    }
}

impl Config {
    /// Create a new Config with file paths
    pub fn new(old_file: PathBuf, new_file: PathBuf) -> Self {
        Self {
            old_file,
            new_file,
            ..Default::default()
        }
    }

    /// Set the sheet to compare
    pub fn with_sheet_name(mut self, name: String) -> Self {
        self.sheet_name = Some(name);
        self
    }

    /// Set the output path for the differences workbook
    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = output;
        self
    }

    /// Set the preview format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Enable input-table previews
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }
}
