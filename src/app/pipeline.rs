//! Shared pipeline logic behind the CLI subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflows:
//!
//! - prepare: ingest -> parse sites -> resolve sequences -> window -> GPS input
//! - process: normalize -> merge -> classify -> filter -> distributions
//!
//! The CLI focuses on presentation (printing summaries, writing exports).

use crate::data::uniprot::{UniprotClient, attach_sequences};
use crate::domain::{
    PredictionRow, PrepareConfig, ProcessConfig, ResolutionOutcome, ResolvedRecord, ScoredRow,
    WindowedRecord,
};
use crate::error::AppError;
use crate::gps::{
    ClassLevel, apply_score_cutoffs, class_distribution, filter_top_k_per_peptide,
    format_gps_input, read_gps_output, score_rows,
};
use crate::io::ingest::{IngestedSites, load_site_records};
use crate::window::window_records;

/// All computed outputs of a `pgps prepare` run.
#[derive(Debug, Clone)]
pub struct PrepareOutput {
    pub ingest: IngestedSites,
    pub outcome: ResolutionOutcome,
    pub resolved: Vec<ResolvedRecord>,
    pub windowed: Vec<WindowedRecord>,
    pub gps_text: String,
}

/// Execute the preparation pipeline and return the computed outputs.
pub fn run_prepare(config: &PrepareConfig) -> Result<PrepareOutput, AppError> {
    let ingest = load_site_records(&config.input)?;
    if ingest.records.is_empty() {
        return Err(AppError::new(3, "No phospho-site records parsed from input."));
    }

    let client = UniprotClient::from_env(config.timeout_secs)?;
    let outcome = client.resolve_sequences(&ingest.records, config.batch_size);

    let resolved = attach_sequences(ingest.records.clone(), &outcome);
    let windowed = window_records(&resolved, config.flank);
    let gps_text = format_gps_input(&windowed);

    Ok(PrepareOutput {
        ingest,
        outcome,
        resolved,
        windowed,
        gps_text,
    })
}

/// All computed outputs of a `pgps process` run.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Center-matched rows merged across all input files, gene-sorted.
    pub normalized: Vec<PredictionRow>,
    /// Data rows dropped during the scans.
    pub skipped: usize,
    /// Rows surviving the score (and optional top-k) filters.
    pub filtered: Vec<ScoredRow>,
    pub group_counts: Vec<(String, usize)>,
    pub subgroup_counts: Vec<(String, usize)>,
}

/// Execute the post-processing pipeline and return the computed outputs.
pub fn run_process(config: &ProcessConfig) -> Result<ProcessOutput, AppError> {
    let mut normalized: Vec<PredictionRow> = Vec::new();
    let mut skipped = 0usize;

    for path in &config.inputs {
        let out = read_gps_output(path)?;
        normalized.extend(out.rows);
        skipped += out.skipped;
    }
    // Re-sort after merging; stable sort keeps per-file order within a gene.
    normalized.sort_by(|a, b| a.gene.cmp(&b.gene));

    if normalized.is_empty() {
        return Err(AppError::new(
            3,
            "No prediction rows matched their window centers.",
        ));
    }

    let scored = score_rows(normalized.clone());
    let mut filtered = apply_score_cutoffs(&scored, config.abs_cutoff, config.rel_cutoff);
    if let Some(k) = config.top_k {
        filtered = filter_top_k_per_peptide(&filtered, k);
    }

    let group_counts = class_distribution(&filtered, ClassLevel::Group);
    let subgroup_counts = class_distribution(&filtered, ClassLevel::Subgroup);

    Ok(ProcessOutput {
        normalized,
        skipped,
        filtered,
        group_counts,
        subgroup_counts,
    })
}
