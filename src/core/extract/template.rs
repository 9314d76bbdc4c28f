//! Regex scan of a `<template>` block.

use std::sync::LazyLock;

use regex::Regex;

use super::Positioner;
use crate::core::{Candidate, ContextKind};
use crate::utils::contains_target_script;

/// Attributes known to carry user-facing text.
pub const TEXT_ATTRIBUTES: &[&str] = &[
    "label",
    "message",
    "placeholder",
    "title",
    "tooltip",
    "alt",
    "aria-label",
];

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r#"\s(?:{})="([^"]*)""#, TEXT_ATTRIBUTES.join("|"))).unwrap()
});

/// `v-text` / `v-html` holding a literal, optionally quoted.
static CONTENT_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"v-(?:text|html)="'?([^"']*)'?""#).unwrap());

/// `:title` / `:label` / `:placeholder` bound to a quoted literal.
static BOUND_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#":(?:title|label|placeholder)="'?([^"']*)'?""#).unwrap());

/// A whole tag (quoted attribute values may hold `>`) and the text after it.
static TEXT_NODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<[A-Za-z/!][^>"']*(?:(?:"[^"]*"|'[^']*')[^>"']*)*>([^<]*)"#).unwrap()
});

/// Extract candidates from template markup starting `base` bytes into the unit.
pub fn extract_template<'u>(
    positioner: &Positioner<'u>,
    template: &str,
    base: usize,
) -> Vec<Candidate<'u>> {
    let mut candidates = Vec::new();

    let literal_rules: [(&Regex, ContextKind); 3] = [
        (&ATTRIBUTE, ContextKind::AttributeValue),
        (&CONTENT_DIRECTIVE, ContextKind::DirectiveValue),
        (&BOUND_ATTRIBUTE, ContextKind::DirectiveValue),
    ];

    for (pattern, kind) in literal_rules {
        for value in pattern.captures_iter(template).filter_map(|caps| caps.get(1)) {
            if contains_target_script(value.as_str()) {
                candidates.push(positioner.candidate(value.as_str(), kind, base + value.start()));
            }
        }
    }

    for raw in TEXT_NODE.captures_iter(template).filter_map(|caps| caps.get(1)) {
        let value = raw.as_str();
        if !contains_target_script(value) {
            continue;
        }
        let trimmed = value.trim();
        let leading = value.len() - value.trim_start().len();
        candidates.push(positioner.candidate(
            trimmed,
            ContextKind::TextNode,
            base + raw.start() + leading,
        ));
    }

    candidates.sort_by_key(|c| (c.line, c.col));
    candidates
}
