//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// Analyzer - generate HTML documentation for a UiPath project
#[derive(Parser)]
#[command(name = "analyzer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project directory containing project.json [default: parent of the current directory]
    pub project_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
