//! Dialect extractors.
//!
//! Each extractor finds raw candidate text in one [`SourceUnit`]. Candidates are
//! not validated here; see [`crate::core::validate`].
//!
//! - `component`: swc visitor for `.jsx` / `.tsx` component markup
//! - `sfc`: block locator for single-file components (`.vue`)
//! - `template`: regex scan of a `<template>` block
//! - `script`: lexical sieve for plain scripts and `<script>` blocks

pub mod component;
pub mod script;
pub mod sfc;
pub mod template;

use anyhow::Result;

use crate::core::{Candidate, ContextKind, Dialect, SourceUnit};
use crate::utils::{build_line_index, offset_to_line_col};

pub use script::{EXCLUSION_RULES, ExclusionRule};
pub use sfc::{Block, BlockKind, locate_blocks};

/// Find every candidate text in a unit.
///
/// An `Err` means the unit could not be parsed; the caller reports it and moves on.
pub fn extract_unit(unit: &SourceUnit) -> Result<Vec<Candidate<'_>>> {
    match unit.dialect {
        Dialect::Script => {
            let positioner = Positioner::new(unit);
            Ok(script::extract_script(&positioner, &unit.content, 0))
        }
        Dialect::ComponentMarkup => component::extract_component(unit),
        Dialect::TemplateMarkup => {
            let positioner = Positioner::new(unit);
            let mut candidates = Vec::new();
            for block in locate_blocks(&unit.content) {
                let found = match block.kind {
                    BlockKind::Template => {
                        template::extract_template(&positioner, block.content, block.offset)
                    }
                    BlockKind::Script => {
                        script::extract_script(&positioner, block.content, block.offset)
                    }
                };
                candidates.extend(found);
            }
            Ok(candidates)
        }
    }
}

/// Turns byte offsets of a unit into positioned candidates.
pub struct Positioner<'u> {
    unit: &'u SourceUnit,
    line_index: Vec<usize>,
}

impl<'u> Positioner<'u> {
    pub fn new(unit: &'u SourceUnit) -> Self {
        Self {
            unit,
            line_index: build_line_index(&unit.content),
        }
    }

    /// Build a candidate located at `offset` bytes into the unit.
    pub fn candidate(&self, text: impl Into<String>, kind: ContextKind, offset: usize) -> Candidate<'u> {
        let (line, col) = offset_to_line_col(&self.unit.content, &self.line_index, offset);
        Candidate {
            unit: self.unit,
            text: text.into(),
            kind,
            line,
            col,
        }
    }
}
