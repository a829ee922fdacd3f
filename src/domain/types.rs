//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory as pipeline stages enrich them
//! - exported to CSV/JSON
//! - constructed directly in tests
//!
//! Every type is an immutable value record: a stage never mutates its input,
//! it produces a richer record for the next stage.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use serde::Serialize;

/// One phosphorylation site parsed from a modification-annotation cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModificationRecord {
    /// Protein accession as it appears in the export (e.g. `Q62261`).
    pub accession: String,
    /// One-letter residue code (e.g. `S`, `T`, `Y`). Not validated against
    /// any alphabet; any uppercase letter the annotation carries is accepted.
    pub residue: char,
    /// 1-based position of the modified residue on the full protein.
    pub position: usize,
    /// Localization confidence in `[0, 100]`, absent when the annotation
    /// carries no parenthesized value.
    pub confidence: Option<f64>,
    /// Gene name from the `GN=` marker, or the literal `"gene"` fallback.
    pub gene_name: String,
}

/// A site record enriched with the full protein sequence, when resolvable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRecord {
    pub site: ModificationRecord,
    /// Absent when the accession could not be resolved via the primary batch
    /// query. Fallback-resolved sequences are deliberately NOT attached here;
    /// they live in `ResolutionOutcome::fallback` for review.
    pub sequence: Option<String>,
}

/// A resolved record with its extracted window.
///
/// Invariant: `center_index < window.len()` whenever `window` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowedRecord {
    pub site: ModificationRecord,
    /// Full protein sequence the window was cut from.
    pub sequence: String,
    /// At most `2 * flank + 1` residues centered on the site; shrinks (never
    /// pads) near either end of the protein.
    pub window: String,
    /// 0-based offset of the modified residue within `window`.
    pub center_index: usize,
}

/// A sequence resolved only through the per-accession fallback lookup,
/// possibly under a different canonical accession (renamed/merged entries).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackMatch {
    /// Accession the entry is published under today.
    pub canonical: String,
    pub sequence: String,
}

/// A non-fatal remote request failure, kept for the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct RequestFailure {
    /// What was being fetched, e.g. `batch 2/4` or `fallback Q62261`.
    pub scope: String,
    pub message: String,
}

/// Everything the resolver learned about one set of accessions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolutionOutcome {
    /// Number of distinct accessions requested.
    pub requested: usize,
    /// Authoritative results from the batch queries.
    pub sequences: HashMap<String, String>,
    /// Fallback results keyed by the ORIGINALLY requested accession. An
    /// accession in this map was absent from `sequences`.
    pub fallback: BTreeMap<String, FallbackMatch>,
    /// Accessions resolved by neither tier, sorted for stable output.
    pub missing: Vec<String>,
    pub failures: Vec<RequestFailure>,
}

/// One data row from the prediction tool's output, tagged with the gene and
/// window center recovered from the preceding `>gene|Center = N` header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRow {
    pub gene: String,
    /// 0-based center index echoed from the GPS input header.
    pub center: usize,
    /// 1-based residue position within the submitted window.
    pub position: usize,
    /// Residue code column, when the tool emits one.
    pub code: Option<String>,
    /// Raw `Group/Subgroup` classification string.
    pub kinase: String,
    pub peptide: String,
    pub score: f64,
    pub cutoff: f64,
}

/// A `/`-delimited classification split into its hierarchy levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KinaseClass {
    pub group: String,
    /// Absent when the label has no `/` delimiter.
    pub subgroup: Option<String>,
}

/// A prediction row with its classification and score margins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRow {
    pub row: PredictionRow,
    pub class: KinaseClass,
    /// `score - cutoff`.
    pub abs_diff: f64,
    /// `(score - cutoff) / (1 - cutoff)`; `None` when `cutoff == 1`, where
    /// the ratio is undefined and the relative threshold is waived.
    pub rel_diff: Option<f64>,
}

/// Configuration for `pgps prepare`.
#[derive(Debug, Clone)]
pub struct PrepareConfig {
    /// Spreadsheet export (CSV) with the required annotation columns.
    pub input: PathBuf,
    /// Where the prediction-tool input text is written.
    pub gps_out: PathBuf,
    /// Optional CSV export of the windowed records.
    pub export: Option<PathBuf>,
    /// Optional JSON export of the resolution outcome (for review of
    /// renamed/missing accessions).
    pub report_json: Option<PathBuf>,
    /// Accessions per batch query. UniProt tolerates ~100 OR-terms per
    /// stream request before queries get unwieldy.
    pub batch_size: usize,
    /// Residues kept on each side of the modification site.
    pub flank: usize,
    /// Request timeout for remote lookups.
    pub timeout_secs: u64,
}

/// Configuration for `pgps process`.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    /// One or more prediction-tool output files; rows are merged after
    /// normalization.
    pub inputs: Vec<PathBuf>,
    /// Minimum `score - cutoff` a row must exceed to survive.
    pub abs_cutoff: f64,
    /// Minimum `(score - cutoff) / (1 - cutoff)` a row must exceed.
    pub rel_cutoff: f64,
    /// Keep only rows within the top-k scores per peptide (ties at the k-th
    /// rank retained). `None` disables the filter.
    pub top_k: Option<usize>,
    /// Optional CSV export of the surviving rows.
    pub export: Option<PathBuf>,
}
