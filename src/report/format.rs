//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline stages stay clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{PrepareConfig, ProcessConfig, ResolutionOutcome, ScoredRow, WindowedRecord};
use crate::io::ingest::IngestedSites;

/// Summary for a `pgps prepare` run: ingest accounting, resolution outcome,
/// and what ended up in the GPS input.
pub fn format_prepare_summary(
    ingest: &IngestedSites,
    outcome: &ResolutionOutcome,
    windowed: &[WindowedRecord],
    config: &PrepareConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== pgps - phospho-site window extraction ===\n");
    out.push_str(&format!("Input: {}\n", config.input.display()));
    out.push_str(&format!(
        "Rows: read={} | with sites={} | skipped={}\n",
        ingest.rows_read, ingest.rows_with_sites, ingest.rows_skipped
    ));
    out.push_str(&format!(
        "Sites: {} | window: +/-{} residues\n",
        ingest.records.len(),
        config.flank
    ));

    out.push_str("\nSequence resolution:\n");
    out.push_str(&format!(
        "- accessions: requested={} resolved={} fallback={} missing={}\n",
        outcome.requested,
        outcome.sequences.len(),
        outcome.fallback.len(),
        outcome.missing.len()
    ));

    if !outcome.fallback.is_empty() {
        out.push_str("- resolved under a different canonical accession (review; not merged):\n");
        for (requested, m) in &outcome.fallback {
            out.push_str(&format!("    {requested} -> {}\n", m.canonical));
        }
    }
    if !outcome.missing.is_empty() {
        out.push_str(&format!("- unresolved: {}\n", outcome.missing.join(", ")));
    }
    for failure in &outcome.failures {
        out.push_str(&format!("- request failure ({}): {}\n", failure.scope, failure.message));
    }

    out.push_str(&format!(
        "\nGPS input: {} record(s) -> {}\n",
        windowed.len(),
        config.gps_out.display()
    ));

    out
}

/// Summary for a `pgps process` run: merge/filter accounting plus the
/// classification distribution tables.
pub fn format_process_summary(
    n_normalized: usize,
    n_skipped: usize,
    filtered: &[ScoredRow],
    group_counts: &[(String, usize)],
    subgroup_counts: &[(String, usize)],
    config: &ProcessConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== pgps - kinase prediction post-processing ===\n");
    out.push_str(&format!("Files: {}\n", config.inputs.len()));
    out.push_str(&format!(
        "Rows: matched center={n_normalized} | skipped during scan={n_skipped}\n"
    ));
    out.push_str(&format!(
        "Filters: abs>{} rel>{}{}\n",
        config.abs_cutoff,
        config.rel_cutoff,
        config
            .top_k
            .map(|k| format!(" top-{k}/peptide"))
            .unwrap_or_default()
    ));
    out.push_str(&format!("Surviving rows: {}\n", filtered.len()));

    out.push_str("\nKinase group distribution:\n");
    out.push_str(&format_distribution(group_counts, filtered.len()));

    out.push_str("\nKinase subgroup distribution:\n");
    out.push_str(&format_distribution(subgroup_counts, filtered.len()));

    out
}

fn format_distribution(counts: &[(String, usize)], total: usize) -> String {
    if counts.is_empty() {
        return "  (no data)\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("{:<20} {:>8} {:>8}\n", "label", "count", "share"));
    out.push_str(&format!("{:-<20} {:-<8} {:-<8}\n", "", "", ""));
    for (label, n) in counts {
        let share = if total > 0 {
            100.0 * *n as f64 / total as f64
        } else {
            0.0
        };
        out.push_str(&format!("{:<20} {:>8} {:>7.1}%\n", truncate(label, 20), n, share));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FallbackMatch;
    use std::path::PathBuf;

    #[test]
    fn prepare_summary_lists_fallback_and_missing() {
        let ingest = IngestedSites {
            records: Vec::new(),
            rows_read: 10,
            rows_with_sites: 8,
            rows_skipped: 2,
        };
        let mut outcome = ResolutionOutcome {
            requested: 3,
            ..ResolutionOutcome::default()
        };
        outcome
            .sequences
            .insert("A".to_string(), "MSEQ".to_string());
        outcome.fallback.insert(
            "B".to_string(),
            FallbackMatch {
                canonical: "B2".to_string(),
                sequence: "AA".to_string(),
            },
        );
        outcome.missing = vec!["C".to_string()];

        let config = PrepareConfig {
            input: PathBuf::from("sites.csv"),
            gps_out: PathBuf::from("gps_input.txt"),
            export: None,
            report_json: None,
            batch_size: 100,
            flank: 10,
            timeout_secs: 30,
        };

        let summary = format_prepare_summary(&ingest, &outcome, &[], &config);
        assert!(summary.contains("requested=3 resolved=1 fallback=1 missing=1"));
        assert!(summary.contains("B -> B2"));
        assert!(summary.contains("unresolved: C"));
    }

    #[test]
    fn distribution_shares_sum_to_total() {
        let counts = vec![("CMGC".to_string(), 3), ("AGC".to_string(), 1)];
        let table = format_distribution(&counts, 4);
        assert!(table.contains("CMGC"));
        assert!(table.contains("75.0%"));
        assert!(table.contains("25.0%"));
    }
}
