//! Classification splitting and survival filters for normalized predictions.

use std::collections::HashMap;

use crate::domain::{KinaseClass, PredictionRow, ScoredRow};

/// Split a `/`-delimited classification into (group, subgroup).
///
/// Only the first two segments matter: `CAMK/RAD53/extra` yields group
/// `CAMK`, subgroup `RAD53`. A label with no delimiter has no subgroup.
pub fn split_kinase_hierarchy(kinase: &str) -> KinaseClass {
    let mut segments = kinase.split('/');
    let group = segments.next().unwrap_or("").to_string();
    let subgroup = segments.next().map(str::to_string);
    KinaseClass { group, subgroup }
}

/// Attach classification and score margins to each row.
///
/// `rel_diff = (score - cutoff) / (1 - cutoff)` is undefined at
/// `cutoff == 1`; such rows carry `rel_diff = None`, and the relative
/// threshold is waived for them (the absolute threshold still applies).
pub fn score_rows(rows: Vec<PredictionRow>) -> Vec<ScoredRow> {
    rows.into_iter()
        .map(|row| {
            let class = split_kinase_hierarchy(&row.kinase);
            let abs_diff = row.score - row.cutoff;
            let rel_diff = if row.cutoff == 1.0 {
                None
            } else {
                Some((row.score - row.cutoff) / (1.0 - row.cutoff))
            };
            ScoredRow {
                row,
                class,
                abs_diff,
                rel_diff,
            }
        })
        .collect()
}

/// Retain rows strictly exceeding both thresholds.
pub fn apply_score_cutoffs(rows: &[ScoredRow], abs_cutoff: f64, rel_cutoff: f64) -> Vec<ScoredRow> {
    rows.iter()
        .filter(|r| r.abs_diff > abs_cutoff && r.rel_diff.is_none_or(|d| d > rel_cutoff))
        .cloned()
        .collect()
}

/// Keep rows whose score is within the top-k scores of their peptide group.
///
/// The threshold is the k-th largest score counting multiplicity, so ties at
/// the k-th rank are all retained. Output is sorted by score descending.
/// `k == 0` keeps nothing.
pub fn filter_top_k_per_peptide(rows: &[ScoredRow], k: usize) -> Vec<ScoredRow> {
    if k == 0 {
        return Vec::new();
    }

    let mut scores_by_peptide: HashMap<&str, Vec<f64>> = HashMap::new();
    for r in rows {
        scores_by_peptide
            .entry(r.row.peptide.as_str())
            .or_default()
            .push(r.row.score);
    }

    let mut thresholds: HashMap<&str, f64> = HashMap::new();
    for (peptide, mut scores) in scores_by_peptide {
        scores.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        let kth = scores[(k - 1).min(scores.len() - 1)];
        thresholds.insert(peptide, kth);
    }

    let mut kept: Vec<ScoredRow> = rows
        .iter()
        .filter(|r| {
            thresholds
                .get(r.row.peptide.as_str())
                .is_some_and(|kth| r.row.score >= *kth)
        })
        .cloned()
        .collect();

    kept.sort_by(|a, b| {
        b.row
            .score
            .partial_cmp(&a.row.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    kept
}

/// Which hierarchy level to aggregate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassLevel {
    Group,
    Subgroup,
}

/// Count rows per classification label at the given level.
///
/// Rows without a subgroup are excluded from subgroup counts. Output is
/// sorted by count descending, then label ascending for stable display.
pub fn class_distribution(rows: &[ScoredRow], level: ClassLevel) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for r in rows {
        let label = match level {
            ClassLevel::Group => Some(r.class.group.as_str()),
            ClassLevel::Subgroup => r.class.subgroup.as_deref(),
        };
        if let Some(label) = label {
            *counts.entry(label).or_insert(0) += 1;
        }
    }

    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, n)| (label.to_string(), n))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(peptide: &str, kinase: &str, score: f64, cutoff: f64) -> PredictionRow {
        PredictionRow {
            gene: "G".to_string(),
            center: 10,
            position: 11,
            code: Some("S".to_string()),
            kinase: kinase.to_string(),
            peptide: peptide.to_string(),
            score,
            cutoff,
        }
    }

    #[test]
    fn splits_group_and_subgroup() {
        let class = split_kinase_hierarchy("CAMK/RAD53");
        assert_eq!(class.group, "CAMK");
        assert_eq!(class.subgroup.as_deref(), Some("RAD53"));
    }

    #[test]
    fn label_without_delimiter_has_no_subgroup() {
        let class = split_kinase_hierarchy("Atypical");
        assert_eq!(class.group, "Atypical");
        assert_eq!(class.subgroup, None);
    }

    #[test]
    fn only_second_segment_becomes_subgroup() {
        let class = split_kinase_hierarchy("TKL/MLK/MLK3");
        assert_eq!(class.group, "TKL");
        assert_eq!(class.subgroup.as_deref(), Some("MLK"));
    }

    #[test]
    fn score_margins_are_computed() {
        let scored = score_rows(vec![row("P", "AGC/PKA", 3.0, 2.0)]);
        assert!((scored[0].abs_diff - 1.0).abs() < 1e-12);
        assert!((scored[0].rel_diff.unwrap() - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn saturated_cutoff_waives_the_relative_test() {
        let scored = score_rows(vec![row("P", "AGC/PKA", 1.5, 1.0)]);
        assert_eq!(scored[0].rel_diff, None);

        // Passes any relative threshold; still subject to the absolute one.
        assert_eq!(apply_score_cutoffs(&scored, 0.4, 100.0).len(), 1);
        assert_eq!(apply_score_cutoffs(&scored, 0.6, 0.0).len(), 0);
    }

    #[test]
    fn cutoffs_are_strict_inequalities() {
        let scored = score_rows(vec![row("P", "AGC/PKA", 3.0, 2.0)]);
        assert_eq!(apply_score_cutoffs(&scored, 1.0, -10.0).len(), 0);
        assert_eq!(apply_score_cutoffs(&scored, 0.9, -10.0).len(), 1);
    }

    #[test]
    fn top_k_keeps_kth_rank_ties() {
        let scored = score_rows(vec![
            row("PEP1", "A/B", 5.0, 0.0),
            row("PEP1", "A/B", 4.0, 0.0),
            row("PEP1", "A/B", 4.0, 0.0),
            row("PEP1", "A/B", 3.0, 0.0),
            row("PEP2", "A/B", 1.0, 0.0),
        ]);

        let kept = filter_top_k_per_peptide(&scored, 2);
        // PEP1: threshold is the 2nd-largest score (4.0); both 4.0 rows stay.
        let pep1: Vec<f64> = kept
            .iter()
            .filter(|r| r.row.peptide == "PEP1")
            .map(|r| r.row.score)
            .collect();
        assert_eq!(pep1, vec![5.0, 4.0, 4.0]);
        // PEP2 has fewer rows than k; everything survives.
        assert_eq!(kept.iter().filter(|r| r.row.peptide == "PEP2").count(), 1);
    }

    #[test]
    fn top_k_zero_keeps_nothing() {
        let scored = score_rows(vec![row("PEP1", "A/B", 5.0, 0.0)]);
        assert!(filter_top_k_per_peptide(&scored, 0).is_empty());
    }

    #[test]
    fn distribution_counts_and_orders_labels() {
        let scored = score_rows(vec![
            row("P", "CMGC/CDK", 1.0, 0.0),
            row("P", "CMGC/MAPK", 1.0, 0.0),
            row("P", "AGC/PKA", 1.0, 0.0),
            row("P", "Atypical", 1.0, 0.0),
        ]);

        let groups = class_distribution(&scored, ClassLevel::Group);
        assert_eq!(groups[0], ("CMGC".to_string(), 2));
        assert_eq!(groups.len(), 3);

        // The subgroup-less row drops out of subgroup counts.
        let subgroups = class_distribution(&scored, ClassLevel::Subgroup);
        assert_eq!(subgroups.len(), 3);
        assert!(subgroups.iter().all(|(_, n)| *n == 1));
    }
}
