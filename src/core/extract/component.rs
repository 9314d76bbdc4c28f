//! swc-based extraction for JSX/TSX component markup.

use swc_common::{BytePos, SourceMap};
use swc_ecma_ast::{JSXAttr, JSXAttrValue, JSXText, Str};
use swc_ecma_visit::{Visit, VisitWith};

use anyhow::Result;

use crate::core::parsers::jsx::parse_jsx_source;
use crate::core::{Candidate, ContextKind, SourceUnit};
use crate::utils::contains_target_script;

/// Parse a component unit and collect target-script text from attribute
/// values, JSX text runs and string literals.
pub fn extract_component(unit: &SourceUnit) -> Result<Vec<Candidate<'_>>> {
    let parsed = parse_jsx_source(unit.content.clone(), &unit.path)?;

    let mut collector = ComponentTextCollector {
        unit,
        source_map: &parsed.source_map,
        candidates: Vec::new(),
    };
    parsed.module.visit_with(&mut collector);

    Ok(collector.candidates)
}

struct ComponentTextCollector<'a, 'u> {
    unit: &'u SourceUnit,
    source_map: &'a SourceMap,
    candidates: Vec<Candidate<'u>>,
}

impl<'a, 'u> ComponentTextCollector<'a, 'u> {
    fn push(&mut self, text: &str, kind: ContextKind, pos: BytePos) {
        if !contains_target_script(text) {
            return;
        }
        let loc = self.source_map.lookup_char_pos(pos);
        self.candidates.push(Candidate {
            unit: self.unit,
            text: text.to_owned(),
            kind,
            line: loc.line,
            col: loc.col_display + 1,
        });
    }
}

/// Decoded value of a literal, when the source spells it the same way.
///
/// Literals with escapes are skipped: the text could not be found verbatim
/// in the source when rewriting.
fn verbatim_value(node: &Str) -> Option<&str> {
    let value = node.value.as_str()?;
    match &node.raw {
        Some(raw) if raw.get(1..raw.len().saturating_sub(1)) != Some(value) => None,
        _ => Some(value),
    }
}

impl<'a, 'u> Visit for ComponentTextCollector<'a, 'u> {
    fn visit_jsx_attr(&mut self, node: &JSXAttr) {
        if let Some(JSXAttrValue::Str(s)) = &node.value {
            if let Some(value) = verbatim_value(s) {
                self.push(value, ContextKind::AttributeValue, s.span.lo);
            }
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_jsx_text(&mut self, node: &JSXText) {
        let raw_value = &node.value;
        let trimmed = raw_value.trim();
        if trimmed.is_empty() {
            return;
        }

        let trim_start_offset = raw_value.len() - raw_value.trim_start().len();
        let actual_pos = node.span.lo + BytePos(trim_start_offset as u32);
        self.push(trimmed, ContextKind::TextNode, actual_pos);
    }

    fn visit_str(&mut self, node: &Str) {
        if let Some(value) = verbatim_value(node) {
            self.push(value, ContextKind::StringLiteral, node.span.lo);
        }
    }
}
