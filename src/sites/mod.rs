//! Phospho-site extraction from annotation text.
//!
//! Responsibilities:
//!
//! - parse `ACCESSION <N>xPhospho [SITE; SITE; ...]` annotation cells
//! - recover the gene name from the protein-description cell (`GN=` marker)
//! - drop malformed sites individually without losing the rest of the row

pub mod parser;

pub use parser::*;
