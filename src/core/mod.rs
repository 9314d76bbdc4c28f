//! Core engine.
//!
//! - `data`: units, candidates and run-level collections
//! - `extract`: dialect extractors
//! - `validate`: natural-language classification
//! - `keygen`: key synthesis (deterministic and AI-assisted)
//! - `resource`: locale resource store
//! - `rewrite`: source rewrite rules
//! - `snapshot`: backups and revert
//! - `pipeline`: run orchestration

pub mod data;
pub mod error;
pub mod extract;
pub mod file_scanner;
pub mod keygen;
pub mod parsers;
pub mod pipeline;
pub mod resource;
pub mod rewrite;
pub mod snapshot;
pub mod validate;

pub use data::*;
pub use error::PipelineError;
pub use pipeline::{Pipeline, ScanReport, TransformReport, UpdateReport, merged_config};
pub use validate::is_natural_language;
