//! GPS input rendering.
//!
//! One FASTA-like record per site:
//!
//! ```text
//! >gene|Center = 4
//! MSEQWENCEAGAIN
//! ```
//!
//! The center annotation is how the output normalizer later re-identifies
//! which row of the tool's per-residue scores belongs to the original site,
//! so the exact `|Center = N` spelling is load-bearing.

use crate::domain::WindowedRecord;

/// Render the full GPS input document.
pub fn format_gps_input(records: &[WindowedRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            ">{}|Center = {}\n{}\n",
            record.site.gene_name, record.center_index, record.window
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModificationRecord;

    fn windowed(gene: &str, center_index: usize, window: &str) -> WindowedRecord {
        WindowedRecord {
            site: ModificationRecord {
                accession: "P12345".to_string(),
                residue: 'S',
                position: 20,
                confidence: Some(99.0),
                gene_name: gene.to_string(),
            },
            sequence: "IRRELEVANTHERE".to_string(),
            window: window.to_string(),
            center_index,
        }
    }

    #[test]
    fn renders_header_and_window_per_record() {
        let text = format_gps_input(&[
            windowed("Sptbn1", 10, "ABCDEFGHIJKLMNOPQRSTU"),
            windowed("Tp53", 3, "MSEQWENCE"),
        ]);
        assert_eq!(
            text,
            ">Sptbn1|Center = 10\nABCDEFGHIJKLMNOPQRSTU\n>Tp53|Center = 3\nMSEQWENCE\n"
        );
    }

    #[test]
    fn empty_input_renders_empty_document() {
        assert_eq!(format_gps_input(&[]), "");
    }
}
