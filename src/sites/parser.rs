//! Annotation-cell parser.
//!
//! The export format packs every phospho site of a protein into one free-text
//! cell, e.g.:
//!
//! ```text
//! Q62261 3xPhospho [S2315(97.6); S2318(100); S2322(97.6)]
//! ```
//!
//! with the gene name hidden in a separate description cell as `GN=Sptbn1`.
//! Parsing is deliberately shape-based: any token matching the pattern is
//! accepted, with no check that the accession or residue letter is
//! biologically meaningful.

use lazy_static::lazy_static;
use regex::Regex;

use crate::domain::ModificationRecord;

lazy_static! {
    /// `ACCESSION <N>xPhospho [ ... ]` with the site list captured raw.
    static ref ANNOTATION_RE: Regex =
        Regex::new(r"^(?P<accession>\w+)\s\d+xPhospho\s+\[(?P<sites>[^\]]+)\]").unwrap();
    /// Gene-name marker inside the protein description.
    static ref GENE_RE: Regex = Regex::new(r"GN=([\w\-.]+)").unwrap();
    /// `S2315(97.6)` — residue, 1-based position, localization confidence.
    static ref SITE_CONF_RE: Regex =
        Regex::new(r"^(?P<residue>[A-Z])(?P<position>\d+)\((?P<conf>[\d.]+)\)").unwrap();
    /// `T45` — same, without a confidence value.
    static ref SITE_RE: Regex = Regex::new(r"^(?P<residue>[A-Z])(?P<position>\d+)").unwrap();
}

/// Parse one annotation/description cell pair into site records.
///
/// Returns an empty list when the annotation does not match the expected
/// shape; individual sites that fail to parse are dropped without aborting
/// the rest of the list. Parsing the same input twice yields identical
/// output.
pub fn parse_modifications(mod_str: &str, desc_str: &str) -> Vec<ModificationRecord> {
    if mod_str.is_empty() || desc_str.is_empty() {
        return Vec::new();
    }

    let Some(caps) = ANNOTATION_RE.captures(mod_str) else {
        return Vec::new();
    };

    let accession = caps["accession"].to_string();
    let sites_str = &caps["sites"];

    let gene_name = GENE_RE
        .captures(desc_str)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| "gene".to_string());

    let mut parsed = Vec::new();
    for site in sites_str.split(';') {
        let site = site.trim();

        let (residue_str, position_str, confidence) = if let Some(c) = SITE_CONF_RE.captures(site) {
            let Ok(conf) = c["conf"].parse::<f64>() else {
                continue;
            };
            (
                c["residue"].to_string(),
                c["position"].to_string(),
                Some(conf),
            )
        } else if let Some(c) = SITE_RE.captures(site) {
            (c["residue"].to_string(), c["position"].to_string(), None)
        } else {
            continue;
        };

        let Ok(position) = position_str.parse::<usize>() else {
            continue;
        };
        let Some(residue) = residue_str.chars().next() else {
            continue;
        };

        parsed.push(ModificationRecord {
            accession: accession.clone(),
            residue,
            position,
            confidence,
            gene_name: gene_name.clone(),
        });
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multi_site_annotation_with_gene() {
        let records = parse_modifications(
            "Q62261 3xPhospho [S2315(97.6); S2318(100); S2322(97.6)]",
            "Spectrin beta chain OS=Mus musculus GN=ABC1 PE=1 SV=2",
        );

        assert_eq!(records.len(), 3);
        for r in &records {
            assert_eq!(r.accession, "Q62261");
            assert_eq!(r.residue, 'S');
            assert_eq!(r.gene_name, "ABC1");
        }
        assert_eq!(records[0].position, 2315);
        assert_eq!(records[1].position, 2318);
        assert_eq!(records[2].position, 2322);
        assert_eq!(records[0].confidence, Some(97.6));
        assert_eq!(records[1].confidence, Some(100.0));
        assert_eq!(records[2].confidence, Some(97.6));
    }

    #[test]
    fn site_without_confidence_is_unset_not_zero() {
        let records = parse_modifications("P12345 1xPhospho [T45]", "something GN=Tp53");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].residue, 'T');
        assert_eq!(records[0].position, 45);
        assert_eq!(records[0].confidence, None);
        assert_eq!(records[0].gene_name, "Tp53");
    }

    #[test]
    fn missing_gene_marker_falls_back_to_literal() {
        let records = parse_modifications("P12345 1xPhospho [S9(88.1)]", "no marker here");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].gene_name, "gene");
    }

    #[test]
    fn malformed_site_is_dropped_without_aborting_the_rest() {
        let records = parse_modifications(
            "P12345 3xPhospho [S10(90); ???; Y20(80.5)]",
            "desc GN=Gsk3b",
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].position, 10);
        assert_eq!(records[1].position, 20);
        assert_eq!(records[1].residue, 'Y');
    }

    #[test]
    fn non_matching_annotation_yields_empty() {
        assert!(parse_modifications("1xAcetyl [K12]", "GN=Foo").is_empty());
        assert!(parse_modifications("", "GN=Foo").is_empty());
        assert!(parse_modifications("Q62261 Phospho S10", "GN=Foo").is_empty());
        assert!(parse_modifications("P12345 1xPhospho [S1]", "").is_empty());
    }

    #[test]
    fn parsing_is_idempotent() {
        let a = parse_modifications("Q62261 2xPhospho [S1(50); T2]", "GN=Abc-1.2");
        let b = parse_modifications("Q62261 2xPhospho [S1(50); T2]", "GN=Abc-1.2");
        assert_eq!(a, b);
        assert_eq!(a[0].gene_name, "Abc-1.2");
    }

    #[test]
    fn gene_token_stops_at_whitespace() {
        let records = parse_modifications(
            "A0A140 1xPhospho [S3(99)]",
            "Protein X GN=Mapk1 PE=1",
        );
        assert_eq!(records[0].gene_name, "Mapk1");
    }
}
