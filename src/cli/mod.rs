//! Command-line interface for bdcut.
//!
//! The tool is single-purpose, so there are no subcommands: it takes a format
//! file, an optional output path, and an optional CSV path, and runs the
//! two-phase pipeline end to end.
//!
//! # Usage
//!
//! ```bash
//! # Generate postgres.sql from the default CSV
//! bdcut formatos/postgres.json postgres.sql
//!
//! # Explicit CSV input
//! bdcut formatos/mysql.json mysql.sql BD/CSV_utf8/BDCUT_CL__CSV_UTF8.csv
//!
//! # Verbose run (equivalent to RUST_LOG=debug)
//! bdcut --verbose formatos/postgres.json
//! ```
//!
//! # Execution Flow
//!
//! 1. Load and parse the format file (configuration errors fail here)
//! 2. Compile the renderer, surfacing escape-table errors before any I/O on
//!    the data
//! 3. Read the CSV line by line into the [`HierarchyBuilder`]
//! 4. Render the hierarchy to fragments and write them, in order, to the
//!    output file
//!
//! The pipeline is a synchronous batch: it runs to completion or fails
//! outright, with no retries and no partial-result recovery.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use crate::constants::DEFAULT_OUTPUT_PATH;
use crate::core::BdcutError;
use crate::format::Format;
use crate::hierarchy::HierarchyBuilder;
use crate::templating::Renderer;

/// Default CSV input shipped with the territorial-codes database.
const DEFAULT_CSV_PATH: &str = "BD/CSV_utf8/BDCUT_CL__CSV_UTF8.csv";

/// Main CLI application structure for bdcut.
#[derive(Parser, Debug)]
#[command(
    name = "bdcut",
    about = "Generate SQL/text artifacts from the Chilean territorial codes CSV",
    version,
    long_about = "bdcut applies a declarative JSON format to the deduplicated \
                  region/province/commune hierarchy of the territorial codes CSV \
                  and writes the rendered artifact (typically SQL statements)."
)]
pub struct Cli {
    /// Path to the JSON format file describing the output.
    format: PathBuf,

    /// Path of the generated artifact.
    #[arg(default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Path to the territorial-codes CSV input.
    #[arg(default_value = DEFAULT_CSV_PATH)]
    csv: PathBuf,

    /// Enable verbose output (equivalent to RUST_LOG=debug).
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Log level implied by the verbosity flags, if any.
    ///
    /// `None` leaves the decision to the `RUST_LOG` environment variable.
    pub fn log_level(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }

    /// Run the pipeline: load format, build hierarchy, render, write.
    pub fn execute(self) -> Result<()> {
        let format = Format::load(&self.format)?;
        debug!(path = %self.format.display(), "format loaded");

        // Compiles the escape rule; a bad table fails before the CSV is read.
        let renderer = Renderer::new(&format)?;

        info!(path = %self.csv.display(), "reading CSV input");
        let input = File::open(&self.csv)
            .map_err(|source| io_error("read CSV input", &self.csv, source))?;

        let mut builder = HierarchyBuilder::new();
        for line in BufReader::new(input).lines() {
            let line = line.map_err(|source| io_error("read CSV input", &self.csv, source))?;
            builder.add_line(&line);
        }
        let hierarchy = builder.finish();
        info!(
            regiones = hierarchy.regiones.len(),
            provincias = hierarchy.provincias.len(),
            comunas = hierarchy.comunas.len(),
            "hierarchy built"
        );

        let fragments = renderer.render(&hierarchy);

        info!(path = %self.output.display(), "writing output");
        let mut writer = BufWriter::new(
            File::create(&self.output)
                .map_err(|source| io_error("write output", &self.output, source))?,
        );
        for fragment in &fragments {
            writer
                .write_all(fragment.as_bytes())
                .map_err(|source| io_error("write output", &self.output, source))?;
        }
        writer
            .flush()
            .map_err(|source| io_error("write output", &self.output, source))?;

        info!(path = %self.output.display(), "artifact generated");
        Ok(())
    }
}

fn io_error(operation: &str, path: &Path, source: std::io::Error) -> BdcutError {
    BdcutError::Io {
        operation: operation.to_string(),
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_and_csv_default() {
        let cli = Cli::parse_from(["bdcut", "formatos/postgres.json"]);
        assert_eq!(cli.format, PathBuf::from("formatos/postgres.json"));
        assert_eq!(cli.output, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(cli.csv, PathBuf::from(DEFAULT_CSV_PATH));
    }

    #[test]
    fn positional_order_is_format_output_csv() {
        let cli = Cli::parse_from(["bdcut", "f.json", "out.sql", "data.csv"]);
        assert_eq!(cli.output, PathBuf::from("out.sql"));
        assert_eq!(cli.csv, PathBuf::from("data.csv"));
    }

    #[test]
    fn format_argument_is_required() {
        assert!(Cli::try_parse_from(["bdcut"]).is_err());
    }

    #[test]
    fn verbosity_flags_map_to_levels() {
        let verbose = Cli::parse_from(["bdcut", "-v", "f.json"]);
        assert_eq!(verbose.log_level(), Some("debug"));
        let quiet = Cli::parse_from(["bdcut", "--quiet", "f.json"]);
        assert_eq!(quiet.log_level(), Some("error"));
        let default = Cli::parse_from(["bdcut", "f.json"]);
        assert_eq!(default.log_level(), None);
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["bdcut", "-v", "-q", "f.json"]).is_err());
    }
}
