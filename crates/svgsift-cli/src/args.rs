//! Command-line argument definitions for the svgsift CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, output form, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the svgsift extraction tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input document batch (JSON)
    #[arg(help = "Path to the document batch file")]
    pub input: String,

    /// Path to the output records file (JSON)
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Write normalized presentation markup instead of the stored form
    #[arg(long)]
    pub presentation: bool,
}
