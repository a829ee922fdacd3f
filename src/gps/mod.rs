//! Prediction-tool (GPS) text formats and post-processing.
//!
//! Responsibilities:
//!
//! - render windowed records as GPS input (`input`)
//! - re-parse GPS output, recovering gene/center context from the embedded
//!   `>gene|Center = N` header convention (`output`)
//! - classification splitting and score/top-k filtering (`filter`)

pub mod filter;
pub mod input;
pub mod output;

pub use filter::*;
pub use input::*;
pub use output::*;
