//! UniProt REST integration: batched sequence resolution with an obsolete-
//! accession fallback.
//!
//! Resolution runs in two tiers:
//!
//! 1. batch queries against the `stream` endpoint, OR-combining up to
//!    `batch_size` accessions per request
//! 2. one direct `{accession}.fasta` lookup (following redirects) for every
//!    accession the batch tier did not return — this catches renamed and
//!    merged entries, which come back under their current canonical accession
//!
//! Remote failures are never fatal here: a failed batch leaves its accessions
//! in the missing set, a failed fallback leaves the accession unresolved, and
//! every failure is recorded on the outcome for the run summary.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use reqwest::blocking::Client;

use crate::data::fasta::{self, FastaEntry};
use crate::domain::{
    FallbackMatch, ModificationRecord, RequestFailure, ResolutionOutcome, ResolvedRecord,
};
use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://rest.uniprot.org/uniprotkb";

/// Accessions per batch query. The stream endpoint takes the accessions as
/// one OR-combined query string, which stops being practical much beyond this.
pub const DEFAULT_BATCH_SIZE: usize = 100;

pub struct UniprotClient {
    client: Client,
    base_url: String,
}

impl UniprotClient {
    /// Build a client with the given per-request timeout.
    ///
    /// `UNIPROT_BASE_URL` (env or `.env`) overrides the endpoint, which is
    /// how system tests point the resolver at a local stub server.
    pub fn from_env(timeout_secs: u64) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var("UNIPROT_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Resolve every distinct accession among `records`.
    ///
    /// Always returns an outcome; partial failure shows up as entries in
    /// `missing` and `failures` rather than as an error.
    pub fn resolve_sequences(
        &self,
        records: &[ModificationRecord],
        batch_size: usize,
    ) -> ResolutionOutcome {
        let requested: BTreeSet<String> =
            records.iter().map(|r| r.accession.clone()).collect();
        let accessions: Vec<String> = requested.iter().cloned().collect();

        let mut outcome = ResolutionOutcome {
            requested: accessions.len(),
            ..ResolutionOutcome::default()
        };

        // Tier 1: batched OR-queries. A failed batch is logged and skipped;
        // the other batches still run.
        let mut entries: Vec<FastaEntry> = Vec::new();
        let chunks: Vec<&[String]> = accessions.chunks(batch_size.max(1)).collect();
        let n_chunks = chunks.len();
        for (idx, chunk) in chunks.into_iter().enumerate() {
            match self.fetch_batch(chunk) {
                Ok(text) => entries.extend(fasta::parse_stream(&text)),
                Err(message) => {
                    eprintln!("warning: batch {}/{} failed: {message}", idx + 1, n_chunks);
                    outcome.failures.push(RequestFailure {
                        scope: format!("batch {}/{}", idx + 1, n_chunks),
                        message,
                    });
                }
            }
        }

        outcome.sequences = sequence_map(&entries);

        // Tier 2: direct lookups for whatever the batches did not return.
        // Reconciliation uses the accessions actually present in the FASTA
        // entries, so a header-only record still counts as returned.
        for accession in missing_accessions(&requested, &entries) {
            match self.fetch_single(&accession) {
                Ok(text) => {
                    if let Some(entry) = fasta::parse_stream(&text).into_iter().next() {
                        if !entry.sequence.is_empty() {
                            outcome.fallback.insert(
                                accession.clone(),
                                FallbackMatch {
                                    canonical: entry.accession,
                                    sequence: entry.sequence,
                                },
                            );
                        }
                    }
                }
                Err(message) => {
                    eprintln!("warning: fallback lookup for {accession} failed: {message}");
                    outcome.failures.push(RequestFailure {
                        scope: format!("fallback {accession}"),
                        message,
                    });
                }
            }
        }

        outcome.missing = requested
            .iter()
            .filter(|a| !outcome.sequences.contains_key(*a) && !outcome.fallback.contains_key(*a))
            .cloned()
            .collect();

        outcome
    }

    fn fetch_batch(&self, accessions: &[String]) -> Result<String, String> {
        let query = or_query(accessions);
        let resp = self
            .client
            .get(format!("{}/stream", self.base_url))
            .query(&[("format", "fasta"), ("query", query.as_str())])
            .send()
            .map_err(|e| format!("request failed: {e}"))?;

        if !resp.status().is_success() {
            return Err(format!("request failed with status {}", resp.status()));
        }

        resp.text().map_err(|e| format!("failed to read response body: {e}"))
    }

    fn fetch_single(&self, accession: &str) -> Result<String, String> {
        // Redirects are followed (reqwest default), which is what resolves
        // renamed entries to their current accession.
        let resp = self
            .client
            .get(format!("{}/{accession}.fasta", self.base_url))
            .send()
            .map_err(|e| format!("request failed: {e}"))?;

        if !resp.status().is_success() {
            return Err(format!("request failed with status {}", resp.status()));
        }

        resp.text().map_err(|e| format!("failed to read response body: {e}"))
    }
}

/// `accession:A OR accession:B OR ...`
fn or_query(accessions: &[String]) -> String {
    let terms: Vec<String> = accessions.iter().map(|a| format!("accession:{a}")).collect();
    terms.join(" OR ")
}

/// Authoritative accession → sequence map. Entries without residues are
/// excluded here but still count as returned during reconciliation.
fn sequence_map(entries: &[FastaEntry]) -> HashMap<String, String> {
    entries
        .iter()
        .filter(|e| !e.sequence.is_empty())
        .map(|e| (e.accession.clone(), e.sequence.clone()))
        .collect()
}

/// Requested accessions with no corresponding FASTA entry, sorted.
fn missing_accessions(requested: &BTreeSet<String>, entries: &[FastaEntry]) -> Vec<String> {
    let returned: BTreeSet<&str> = entries.iter().map(|e| e.accession.as_str()).collect();
    requested
        .iter()
        .filter(|a| !returned.contains(a.as_str()))
        .cloned()
        .collect()
}

/// Attach sequences to site records via the primary map only.
///
/// Fallback results are intentionally left off the records: a sequence that
/// resolved under a different canonical accession needs review before it can
/// be trusted for windowing, so it is surfaced in the outcome instead.
pub fn attach_sequences(
    records: Vec<ModificationRecord>,
    outcome: &ResolutionOutcome,
) -> Vec<ResolvedRecord> {
    records
        .into_iter()
        .map(|site| {
            let sequence = outcome.sequences.get(&site.accession).cloned();
            ResolvedRecord { site, sequence }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(accession: &str, sequence: &str) -> FastaEntry {
        FastaEntry {
            accession: accession.to_string(),
            sequence: sequence.to_string(),
        }
    }

    fn record(accession: &str) -> ModificationRecord {
        ModificationRecord {
            accession: accession.to_string(),
            residue: 'S',
            position: 1,
            confidence: None,
            gene_name: "gene".to_string(),
        }
    }

    #[test]
    fn or_query_combines_accessions() {
        let q = or_query(&["A1".to_string(), "B2".to_string(), "C3".to_string()]);
        assert_eq!(q, "accession:A1 OR accession:B2 OR accession:C3");
    }

    #[test]
    fn or_query_single_accession_has_no_separator() {
        assert_eq!(or_query(&["A1".to_string()]), "accession:A1");
    }

    #[test]
    fn chunking_respects_batch_size() {
        let accessions: Vec<String> = (0..205).map(|i| format!("P{i:05}")).collect();
        let chunks: Vec<&[String]> = accessions.chunks(100).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 100);
        assert_eq!(chunks[2].len(), 5);
    }

    #[test]
    fn missing_set_is_requested_minus_returned() {
        let requested: BTreeSet<String> =
            ["A".to_string(), "B".to_string(), "C".to_string()].into();
        let entries = vec![entry("A", "MSEQ"), entry("B", "WENCE")];
        assert_eq!(missing_accessions(&requested, &entries), vec!["C".to_string()]);
    }

    #[test]
    fn header_only_entry_counts_as_returned_but_not_resolved() {
        let requested: BTreeSet<String> = ["A".to_string(), "B".to_string()].into();
        let entries = vec![entry("A", "MSEQ"), entry("B", "")];

        // B was returned, so it is not a candidate for fallback lookup...
        assert!(missing_accessions(&requested, &entries).is_empty());
        // ...but it has no usable sequence either.
        let map = sequence_map(&entries);
        assert!(map.contains_key("A"));
        assert!(!map.contains_key("B"));
    }

    #[test]
    fn attach_uses_primary_map_only() {
        let mut outcome = ResolutionOutcome {
            requested: 2,
            ..ResolutionOutcome::default()
        };
        outcome
            .sequences
            .insert("A".to_string(), "MSEQWENCE".to_string());
        outcome.fallback.insert(
            "B".to_string(),
            FallbackMatch {
                canonical: "B2NEW".to_string(),
                sequence: "AAAA".to_string(),
            },
        );

        let resolved = attach_sequences(vec![record("A"), record("B")], &outcome);
        assert_eq!(resolved[0].sequence.as_deref(), Some("MSEQWENCE"));
        // Fallback-resolved sequences stay off the record for caller review.
        assert_eq!(resolved[1].sequence, None);
    }
}
