//! Spreadsheet CSV ingest and site extraction.
//!
//! This module turns a proteomics-software export into a clean list of
//! `ModificationRecord`s that are safe to resolve and window.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level tolerance** (rows that parse to no sites are counted, not fatal)
//! - **Separation of concerns**: no remote lookups or windowing here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::ModificationRecord;
use crate::error::AppError;
use crate::sites::parse_modifications;

/// Column with the packed phospho-site annotations.
pub const COL_MODIFICATIONS: &str = "Modifications in Master Proteins";
/// Column with the protein description (carries the `GN=` marker).
pub const COL_DESCRIPTIONS: &str = "Master Protein Descriptions";
/// Column with the identified peptide. Required by the schema contract even
/// though this pipeline does not consume it.
pub const COL_ANNOTATED_SEQ: &str = "Annotated Sequence";

/// Ingest output: parsed site records + row accounting for the summary.
#[derive(Debug, Clone)]
pub struct IngestedSites {
    pub records: Vec<ModificationRecord>,
    pub rows_read: usize,
    /// Rows that produced at least one site record.
    pub rows_with_sites: usize,
    /// Rows with an empty/missing annotation cell or an annotation that did
    /// not match the expected shape.
    pub rows_skipped: usize,
}

/// Load the export CSV and extract every parseable site record.
pub fn load_site_records(path: &Path) -> Result<IngestedSites, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open input CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mod_idx = header_map[&normalize_header_name(COL_MODIFICATIONS)];
    let desc_idx = header_map[&normalize_header_name(COL_DESCRIPTIONS)];

    let mut out = IngestedSites {
        records: Vec::new(),
        rows_read: 0,
        rows_with_sites: 0,
        rows_skipped: 0,
    };

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(_) => {
                out.rows_read += 1;
                out.rows_skipped += 1;
                continue;
            }
        };
        out.rows_read += 1;

        let mod_str = record.get(mod_idx).map(str::trim).unwrap_or("");
        let desc_str = record.get(desc_idx).map(str::trim).unwrap_or("");

        let parsed = parse_modifications(mod_str, desc_str);
        if parsed.is_empty() {
            out.rows_skipped += 1;
        } else {
            out.rows_with_sites += 1;
            out.records.extend(parsed);
        }
    }

    Ok(out)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let missing: Vec<&str> = [COL_DESCRIPTIONS, COL_MODIFICATIONS, COL_ANNOTATED_SEQ]
        .into_iter()
        .filter(|name| !header_map.contains_key(&normalize_header_name(name)))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::new(
            2,
            format!("Input file must contain the following columns: {}", missing.join(", ")),
        ))
    }
}
