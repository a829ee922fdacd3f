//! Fixed-width sequence windows around a modification site.
//!
//! Windowing is pure index arithmetic, not biological alignment: given a
//! 1-based site position, take up to `flank` residues on each side. Near
//! either end of the protein the window shrinks rather than pads, and the
//! center index shifts with it — the prediction-tool output is later matched
//! back against exactly this convention, so the clamping must not change.

use crate::domain::{ResolvedRecord, WindowedRecord};

/// Default flank width; yields 21-mers away from the sequence ends.
pub const DEFAULT_FLANK: usize = 10;

/// A window and the 0-based offset of the site within it.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceWindow {
    pub window: String,
    pub center_index: usize,
}

/// Extract the window around `position` (1-based).
///
/// Returns `None` when the position does not index into the sequence
/// (`position == 0` or past the end); upstream never validates this, so it
/// must be tolerated here rather than panic.
pub fn extract_window(sequence: &str, position: usize, flank: usize) -> Option<SequenceWindow> {
    let residues: Vec<char> = sequence.chars().collect();
    if position == 0 || position > residues.len() {
        return None;
    }

    let p = position - 1;
    let l = p.saturating_sub(flank);
    let r = (p + flank + 1).min(residues.len());

    Some(SequenceWindow {
        window: residues[l..r].iter().collect(),
        center_index: p - l,
    })
}

/// Window every resolved record that carries a sequence.
///
/// Records without a sequence, and records whose position falls outside
/// their sequence, are dropped here; both conditions are already visible in
/// the resolution outcome / skip counts.
pub fn window_records(records: &[ResolvedRecord], flank: usize) -> Vec<WindowedRecord> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        let Some(sequence) = record.sequence.as_deref() else {
            continue;
        };
        let Some(w) = extract_window(sequence, record.site.position, flank) else {
            continue;
        };
        out.push(WindowedRecord {
            site: record.site.clone(),
            sequence: sequence.to_string(),
            window: w.window,
            center_index: w.center_index,
        });
    }
    out
}
