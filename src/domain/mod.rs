//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - parsed phospho-site records (`ModificationRecord`) and their enriched
//!   forms (`ResolvedRecord`, `WindowedRecord`)
//! - sequence-resolution results (`ResolutionOutcome`, `FallbackMatch`)
//! - normalized prediction rows (`PredictionRow`, `ScoredRow`)
//! - run configuration (`PrepareConfig`, `ProcessConfig`)

pub mod types;

pub use types::*;
