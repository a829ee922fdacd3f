//! Command-line parsing for the phospho-site GPS pipeline.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the parsing/resolution/filtering code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "pgps",
    version,
    about = "Phospho-site window extraction and kinase-prediction post-processing"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a proteomics export, resolve sequences from UniProt, extract
    /// site windows, and write the prediction-tool input file.
    Prepare(PrepareArgs),
    /// Normalize, merge, and filter prediction-tool output files.
    Process(ProcessArgs),
}

/// Options for `pgps prepare`.
#[derive(Debug, Parser, Clone)]
pub struct PrepareArgs {
    /// Proteomics export CSV (requires the "Master Protein Descriptions",
    /// "Modifications in Master Proteins", and "Annotated Sequence" columns).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Prediction-tool input text file to write.
    #[arg(long, default_value = "gps_input.txt")]
    pub gps_out: PathBuf,

    /// Export the windowed records to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the sequence-resolution report (missing/renamed accessions) to JSON.
    #[arg(long)]
    pub report_json: Option<PathBuf>,

    /// Accessions per batch lookup.
    #[arg(long, default_value_t = crate::data::uniprot::DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Residues kept on each side of a modification site.
    #[arg(long, default_value_t = crate::window::DEFAULT_FLANK)]
    pub flank: usize,

    /// Per-request timeout (seconds) for remote lookups.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

/// Options for `pgps process`.
#[derive(Debug, Parser, Clone)]
pub struct ProcessArgs {
    /// Prediction-tool output files (TSV); multiple files are merged after
    /// normalization.
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<PathBuf>,

    /// Minimum score - cutoff a row must exceed.
    #[arg(long, default_value_t = 0.0)]
    pub abs_cutoff: f64,

    /// Minimum (score - cutoff) / (1 - cutoff) a row must exceed.
    #[arg(long, default_value_t = 0.0)]
    pub rel_cutoff: f64,

    /// Keep only the top-k scores per peptide (ties at the k-th rank retained).
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Export the surviving rows to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}
