//! GPS output normalization.
//!
//! The tool's tabular output interleaves two kinds of rows:
//!
//! - header rows whose first field is the `>gene|Center = N` line echoed
//!   from the input
//! - data rows scoring every candidate residue of the submitted window
//!
//! The scan is order-dependent: a header row sets the (gene, center) context
//! for all data rows until the next header. Only the data row whose 1-based
//! `Position` equals `center + 1` describes the originally centered site;
//! everything else is discarded. Matching on the echoed center (rather than a
//! fixed position 11) keeps edge-clamped short windows correct.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::PredictionRow;
use crate::error::AppError;

/// Gene/center context recovered from a header row.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderContext {
    pub gene: String,
    pub center: usize,
}

/// The explicit scan state: either no context yet (rows are skipped) or
/// inside the block opened by the last parseable header row.
#[derive(Debug, Default)]
pub struct RowScanner {
    context: Option<HeaderContext>,
}

impl RowScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the first field of a row. Returns `true` when the row was a
    /// header row (parseable or not); an unparseable header clears the
    /// context so following data rows are not attributed to the wrong gene.
    pub fn observe(&mut self, first_field: &str) -> bool {
        if !first_field.starts_with('>') {
            return false;
        }
        self.context = parse_header(first_field);
        true
    }

    pub fn context(&self) -> Option<&HeaderContext> {
        self.context.as_ref()
    }
}

/// Parse `>gene|Center = N`.
pub fn parse_header(first_field: &str) -> Option<HeaderContext> {
    let header = first_field.strip_prefix('>')?;
    let mut parts = header.split('|');
    let gene = parts.next()?.to_string();
    let center_part = parts.next()?;
    let center_str = center_part.split('=').nth(1)?.trim();
    let center = center_str.parse().ok()?;
    Some(HeaderContext { gene, center })
}

/// Normalized output of one GPS file.
#[derive(Debug, Clone, Default)]
pub struct NormalizedOutput {
    /// Rows matching their block's center, sorted by gene ascending.
    pub rows: Vec<PredictionRow>,
    /// Data rows dropped during the scan: no context yet, unparseable
    /// fields, or a position other than the centered one.
    pub skipped: usize,
}

/// Read and normalize one GPS output file (tab-separated).
pub fn read_gps_output(path: &Path) -> Result<NormalizedOutput, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open GPS output '{}': {e}", path.display()))
    })?;

    let reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    normalize_from_reader(reader)
}

/// Normalize from any CSV reader (tests feed in-memory TSV text).
pub fn normalize_from_reader<R: std::io::Read>(
    mut reader: csv::Reader<R>,
) -> Result<NormalizedOutput, AppError> {
    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read GPS output headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    ensure_required_columns(&header_map)?;

    let mut scanner = RowScanner::new();
    let mut out = NormalizedOutput::default();

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(_) => {
                out.skipped += 1;
                continue;
            }
        };

        let first_field = record.get(0).unwrap_or("");
        if scanner.observe(first_field) {
            continue;
        }

        let Some(context) = scanner.context() else {
            out.skipped += 1;
            continue;
        };

        match parse_data_row(&record, &header_map, context) {
            Some(row) if row.position == context.center + 1 => out.rows.push(row),
            _ => out.skipped += 1,
        }
    }

    // Stable sort keeps file order within a gene.
    out.rows.sort_by(|a, b| a.gene.cmp(&b.gene));

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
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let missing: Vec<&str> = ["position", "score", "cutoff", "kinase", "peptide"]
        .into_iter()
        .filter(|name| !header_map.contains_key(*name))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::new(
            2,
            format!("GPS output is missing required columns: {}", missing.join(", ")),
        ))
    }
}

fn parse_data_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    context: &HeaderContext,
) -> Option<PredictionRow> {
    let get = |name: &str| -> Option<&str> {
        let idx = header_map.get(name)?;
        record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
    };

    let position = get("position")?.parse::<usize>().ok()?;
    let score = get("score")?.parse::<f64>().ok()?;
    let cutoff = get("cutoff")?.parse::<f64>().ok()?;
    let kinase = get("kinase")?.to_string();
    let peptide = get("peptide")?.to_string();
    let code = get("code").map(str::to_string);

    Some(PredictionRow {
        gene: context.gene.clone(),
        center: context.center,
        position,
        code,
        kinase,
        peptide,
        score,
        cutoff,
    })
}
