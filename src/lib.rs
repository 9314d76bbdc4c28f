//! trnow - extract hardcoded Chinese text from front-end sources and replace it
//! with i18n lookups.
//!
//! Sources in three dialects are supported: plain scripts (`.js`, `.ts`), JSX
//! components (`.jsx`, `.tsx`) and Vue single-file components (`.vue`).
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction, key synthesis, resource merge, rewrite and snapshots
//! - `issues`: Issue type definitions and reporting
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod utils;
