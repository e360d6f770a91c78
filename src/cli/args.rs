//! Command line argument parsing for the tfcat CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// tfcat - term-frequency message categorizer
#[derive(Parser, Debug, Clone)]
#[command(name = "tfcat")]
#[command(about = "Classify short messages with a term-frequency model")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TfcatArgs {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// JSON configuration file
    #[arg(long, value_name = "FILE", env = "TFCAT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TfcatArgs {
    /// Effective verbosity: 0 quiet, 1 default, 2 verbose, 3+ debug.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a model from labeled CSV data
    Build(BuildArgs),

    /// Classify a message
    Classify(ClassifyArgs),

    /// Sweep classification parameters over labeled CSV data
    Evaluate(EvaluateArgs),
}

/// Arguments for building a model
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// CSV file with Category and message columns
    #[arg(value_name = "LABELED_CSV")]
    pub input: PathBuf,

    /// Output directory for the model files
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Minimum within-category term frequency
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Analyze documents on the rayon thread pool
    #[arg(long)]
    pub parallel: bool,
}

/// Arguments for classifying a message
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Message text
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Model directory
    #[arg(short, long, value_name = "DIR")]
    pub model: Option<PathBuf>,

    /// Similarity backend: none, table:PATH or vectors:PATH
    #[arg(short, long, value_name = "SPEC")]
    pub similarity: Option<String>,

    /// Leave document terms unstemmed (the default for word vectors)
    #[arg(long, conflicts_with = "stemmed")]
    pub unstemmed: bool,

    /// Stem document terms (the default for tables and no backend)
    #[arg(long)]
    pub stemmed: bool,

    /// Split concatenated words before scoring
    #[arg(long)]
    pub segment: bool,

    /// Similar terms consulted per unmatched term
    #[arg(short, long)]
    pub num_similar: Option<usize>,

    /// Minimum similarity for a neighbour to count
    #[arg(long)]
    pub min_similarity: Option<f64>,
}

/// Arguments for evaluating parameters
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    /// CSV file with Category and message columns
    #[arg(value_name = "LABELED_CSV")]
    pub input: PathBuf,

    /// Similarity backend: none, table:PATH or vectors:PATH
    #[arg(short, long, value_name = "SPEC")]
    pub similarity: Option<String>,

    /// Leave document terms unstemmed (the default for word vectors)
    #[arg(long, conflicts_with = "stemmed")]
    pub unstemmed: bool,

    /// Stem document terms (the default for tables and no backend)
    #[arg(long)]
    pub stemmed: bool,

    /// Split concatenated words before scoring
    #[arg(long)]
    pub segment: bool,

    /// Minimum within-category term frequency
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Inclusive num_similar range
    #[arg(long, value_name = "A..B", default_value = "1..10")]
    pub num_similar_range: String,

    /// Inclusive min_similarity range with optional step
    #[arg(long, value_name = "A..B:STEP", default_value = "0.70..0.90:0.01")]
    pub min_similarity_range: String,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
