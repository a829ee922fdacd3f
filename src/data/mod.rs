//! Remote sequence data.
//!
//! - FASTA text parsing (`fasta`)
//! - UniProt REST client + accession resolution (`uniprot`)

pub mod fasta;
pub mod uniprot;

pub use fasta::*;
pub use uniprot::*;
