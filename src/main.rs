//! sheetdiff - cell-level diff for spreadsheet files

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use sheetdiff::config::{Config, OutputFormat};
use sheetdiff::diff::diff_tables;
use sheetdiff::export::export_differences;
use sheetdiff::flatten::flatten;
use sheetdiff::loader::load_path;
use sheetdiff::output::PreviewFactory;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Grid,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Grid => OutputFormat::Grid,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Cell-level diff for spreadsheet files with a highlighted xlsx export
#[derive(Parser, Debug)]
#[command(name = "sheetdiff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Old/original file to compare
    old_file: PathBuf,

    /// New file to compare
    new_file: PathBuf,

    /// Which sheet to compare (defaults to the first sheet)
    #[arg(long)]
    sheet: Option<String>,

    /// Where to write the differences workbook
    #[arg(short, long, default_value = sheetdiff::export::FILE_NAME)]
    output: PathBuf,

    /// Preview format
    #[arg(short, long, value_enum, default_value = "grid")]
    format: CliOutputFormat,

    /// Print previews of both input tables before the diff
    #[arg(long)]
    preview: bool,

    /// Skip writing the differences workbook
    #[arg(long)]
    no_export: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    match run() {
        Ok(has_changes) => {
            if has_changes {
                ExitCode::from(1) // Differences found
            } else {
                ExitCode::SUCCESS // No differences
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();

    let mut config = Config::new(cli.old_file, cli.new_file)
        .with_output(cli.output)
        .with_output_format(cli.format.into())
        .with_preview(cli.preview);
    if let Some(sheet) = cli.sheet {
        config = config.with_sheet_name(sheet);
    }

    let old_table = load_path(&config.old_file, &config)
        .with_context(|| format!("Failed to load old file: {}", config.old_file.display()))?;
    let new_table = load_path(&config.new_file, &config)
        .with_context(|| format!("Failed to load new file: {}", config.new_file.display()))?;

    let renderer = PreviewFactory::create(config.output_format);
    let mut stdout = std::io::stdout();

    if config.preview {
        println!("New file: {}", config.new_file.display());
        renderer.render_table(&new_table, &mut stdout)?;
        println!("Old file: {}", config.old_file.display());
        renderer.render_table(&old_table, &mut stdout)?;
    }

    let diff = diff_tables(&new_table, &old_table)?;
    let flattened = flatten(&diff)?;

    println!("Differences ({} changed cells):", diff.changed_cell_count());
    renderer.render_flattened(&flattened, &mut stdout)?;

    if !cli.no_export {
        let export = export_differences(&flattened)?;
        fs::write(&config.output, &export.bytes)
            .with_context(|| format!("Failed to write {}", config.output.display()))?;
        log::info!(
            "wrote {} ({} bytes, {})",
            config.output.display(),
            export.bytes.len(),
            export.content_type
        );
    }

    Ok(diff.has_changes())
}
