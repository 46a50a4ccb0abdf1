use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "genrescope")]
#[command(author, version, about = "Movie synopsis genre classifier")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the desktop interface
    Gui {
        /// Configuration file path (YAML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Force CPU inference
        #[arg(long)]
        cpu: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run a one-shot prediction and print the ranked genres
    Predict {
        /// Movie synopsis to classify
        text: String,

        /// Configuration file path (YAML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Also render the probability chart to this path
        #[arg(long)]
        chart: Option<PathBuf>,

        /// Number of rows to print
        #[arg(long)]
        top: Option<usize>,

        /// Force CPU inference
        #[arg(long)]
        cpu: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}
