//! Core data types used across all pipeline phases.
//!
//! - `source`: Source code location types (SourceContext, SourceLocation)
//! - `unit`: Source units, dialects, candidates and run-level collections

pub mod source;
pub mod unit;

pub use source::{SourceContext, SourceLocation};
pub use unit::{
    Candidate, ContextKind, Dialect, KeyMap, Progress, ProgressListener, ResourceEntry,
    SourceUnit, TextSet,
};
