pub mod report;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for ecgdicom
#[derive(Parser, Debug)]
#[command(name = "ecgdicom")]
#[command(about = "Convert resting ECG XML exports to DICOM 12-lead ECG waveform files")]
#[command(version)]
pub struct Cli {
    /// Path to the ECG XML file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Directory receiving the .dcm file
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// CSV table overriding the default annotation codes
    #[arg(short, long, value_name = "CSV")]
    pub annotations: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Read "+" in amplitude factors as "-" (older converter behaviour)
    #[arg(long)]
    pub legacy_plus_sign: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}
