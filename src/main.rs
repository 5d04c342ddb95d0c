//! bdcut CLI entry point
//!
//! Parses command-line arguments, initializes logging, runs the generation
//! pipeline, and renders failures as user-friendly errors.

use anyhow::Result;
use bdcut::cli::Cli;
use bdcut::core::user_friendly_error;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    init_tracing(cli.log_level());

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}

/// Initialize the tracing subscriber.
///
/// An explicit level from the verbosity flags wins; otherwise `RUST_LOG` is
/// honored, falling back to `info` so the phase messages are visible.
fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
