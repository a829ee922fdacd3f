//! FASTA text parsing.
//!
//! UniProt responses come back as newline-delimited FASTA. Headers vary:
//! the stream endpoint emits `sp|Q62261|SPTB2_MOUSE ...` style headers, the
//! per-accession endpoint can return bare accessions. We take the first
//! pipe-segment word as the accession in either shape.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `sp|Q62261|...` or `Q62261|...` or `Q62261` — capture the accession.
    static ref ACCESSION_RE: Regex = Regex::new(r"^(?:\w+\|)?(\w+)\|?").unwrap();
}

/// One parsed FASTA entry. `sequence` may be empty when the upstream record
/// carried a header but no residues; such entries still count as "returned"
/// for reconciliation purposes.
#[derive(Debug, Clone, PartialEq)]
pub struct FastaEntry {
    pub accession: String,
    pub sequence: String,
}

/// Pull the accession token out of a FASTA header line.
pub fn extract_accession(header: &str) -> Option<String> {
    ACCESSION_RE.captures(header).map(|c| c[1].to_string())
}

/// Parse a single entry (header line + sequence lines, no leading `>`).
pub fn parse_entry(entry: &str) -> Option<FastaEntry> {
    let mut lines = entry.lines();
    let header = lines.next()?;
    let accession = extract_accession(header)?;
    let sequence: String = lines.collect();
    Some(FastaEntry { accession, sequence })
}

/// Split a FASTA document into entries. Tolerates leading whitespace and
/// empty segments from consecutive `>` markers.
pub fn parse_stream(text: &str) -> Vec<FastaEntry> {
    text.trim()
        .split('>')
        .filter(|e| !e.trim().is_empty())
        .filter_map(parse_entry)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_accession_from_pipe_delimited_header() {
        assert_eq!(
            extract_accession("sp|Q62261|SPTB2_MOUSE Spectrin beta chain"),
            Some("Q62261".to_string())
        );
    }

    #[test]
    fn extracts_accession_from_bare_header() {
        assert_eq!(extract_accession("P12345 some text"), Some("P12345".to_string()));
        assert_eq!(extract_accession("P12345"), Some("P12345".to_string()));
    }

    #[test]
    fn parses_multi_entry_stream_and_joins_sequence_lines() {
        let text = ">sp|P11111|ONE_HUMAN first\nMSEQ\nWENCE\n>sp|P22222|TWO_HUMAN second\nAAAA\n";
        let entries = parse_stream(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].accession, "P11111");
        assert_eq!(entries[0].sequence, "MSEQWENCE");
        assert_eq!(entries[1].accession, "P22222");
        assert_eq!(entries[1].sequence, "AAAA");
    }

    #[test]
    fn header_only_entry_is_kept_with_empty_sequence() {
        let entries = parse_stream(">sp|P33333|X_HUMAN nothing follows");
        assert_eq!(entries.len(), 1);
        assert!(entries[0].sequence.is_empty());
    }

    #[test]
    fn empty_stream_yields_no_entries() {
        assert!(parse_stream("").is_empty());
        assert!(parse_stream("\n\n").is_empty());
    }
}
