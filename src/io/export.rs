//! Result exports.
//!
//! The CSV exports are meant to be easy to consume in spreadsheets or
//! downstream scripts; the JSON resolution report is the machine-readable
//! record of what could and could not be resolved, for manual review of
//! renamed/missing accessions.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::{RequestFailure, ResolutionOutcome, ScoredRow, WindowedRecord};
use crate::error::AppError;

/// Write the GPS input document produced by `gps::format_gps_input`.
pub fn write_gps_input(path: &Path, text: &str) -> Result<(), AppError> {
    std::fs::write(path, text).map_err(|e| {
        AppError::new(2, format!("Failed to write GPS input '{}': {e}", path.display()))
    })
}

/// Write windowed site records to a CSV file.
pub fn write_windowed_csv(path: &Path, records: &[WindowedRecord]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writeln!(
        file,
        "accession,gene_name,residue,position,confidence,extracted_sequence,center_index,sequence"
    )
    .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in records {
        writeln!(
            file,
            "{},{},{},{},{},{},{},{}",
            r.site.accession,
            r.site.gene_name,
            r.site.residue,
            r.site.position,
            r.site.confidence.map(|c| format!("{c}")).unwrap_or_default(),
            r.window,
            r.center_index,
            r.sequence,
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Write filtered prediction rows to a CSV file.
pub fn write_scored_csv(path: &Path, rows: &[ScoredRow]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writeln!(
        file,
        "gene,center,position,code,kinase,group,subgroup,peptide,score,cutoff,abs_diff,rel_diff"
    )
    .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in rows {
        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{:.4},{:.4},{:.4},{}",
            r.row.gene,
            r.row.center,
            r.row.position,
            r.row.code.as_deref().unwrap_or(""),
            r.row.kinase,
            r.class.group,
            r.class.subgroup.as_deref().unwrap_or(""),
            r.row.peptide,
            r.row.score,
            r.row.cutoff,
            r.abs_diff,
            r.rel_diff.map(|v| format!("{v:.4}")).unwrap_or_default(),
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Serializable review form of a `ResolutionOutcome`.
///
/// The full sequence map is deliberately omitted: the report exists so a
/// reviewer can act on renamed and unresolved accessions, not to duplicate
/// megabytes of sequence data.
#[derive(Debug, Serialize)]
struct ResolutionReport<'a> {
    requested: usize,
    resolved: usize,
    missing: &'a [String],
    fallback: Vec<FallbackReportEntry<'a>>,
    failures: &'a [RequestFailure],
}

#[derive(Debug, Serialize)]
struct FallbackReportEntry<'a> {
    requested: &'a str,
    canonical: &'a str,
    sequence_length: usize,
}

/// Write the resolution review report as pretty-printed JSON.
pub fn write_resolution_json(path: &Path, outcome: &ResolutionOutcome) -> Result<(), AppError> {
    let report = ResolutionReport {
        requested: outcome.requested,
        resolved: outcome.sequences.len(),
        missing: &outcome.missing,
        fallback: outcome
            .fallback
            .iter()
            .map(|(requested, m)| FallbackReportEntry {
                requested,
                canonical: &m.canonical,
                sequence_length: m.sequence.len(),
            })
            .collect(),
        failures: &outcome.failures,
    };

    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, &report)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModificationRecord;

    #[test]
    fn windowed_csv_round_trips_through_the_csv_reader() {
        let records = vec![WindowedRecord {
            site: ModificationRecord {
                accession: "Q62261".to_string(),
                residue: 'S',
                position: 5,
                confidence: None,
                gene_name: "Sptbn1".to_string(),
            },
            sequence: "ABCDEFGHIJ".to_string(),
            window: "ABCDEFGHIJ".to_string(),
            center_index: 4,
        }];

        let mut path = std::env::temp_dir();
        path.push(format!("pgps_export_test_{}.csv", std::process::id()));
        write_windowed_csv(&path, &records).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let row = reader.records().next().unwrap().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(row.get(0), Some("Q62261"));
        assert_eq!(row.get(3), Some("5"));
        // Unset confidence exports as an empty field, not a zero.
        assert_eq!(row.get(4), Some(""));
        assert_eq!(row.get(6), Some("4"));
    }
}
