//! Input/output helpers.
//!
//! - spreadsheet CSV ingest + schema validation (`ingest`)
//! - result exports: CSV tables, GPS input text, resolution JSON (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
