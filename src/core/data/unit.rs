use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use super::source::{SourceContext, SourceLocation};
use crate::utils::line_at;

/// Source dialect of a file, decided once from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Imperative script without markup (`.js`, `.ts`, `.mjs`, `.cjs`).
    Script,
    /// JSX-like component markup (`.jsx`, `.tsx`).
    ComponentMarkup,
    /// Single-file component with a `<template>` block (`.vue`).
    TemplateMarkup,
}

impl Dialect {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str())? {
            "js" | "ts" | "mjs" | "cjs" => Some(Dialect::Script),
            "jsx" | "tsx" => Some(Dialect::ComponentMarkup),
            "vue" => Some(Dialect::TemplateMarkup),
            _ => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Script => write!(f, "script"),
            Dialect::ComponentMarkup => write!(f, "jsx"),
            Dialect::TemplateMarkup => write!(f, "template"),
        }
    }
}

/// Syntactic position a candidate text was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    AttributeValue,
    TextNode,
    DirectiveValue,
    StringLiteral,
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextKind::AttributeValue => write!(f, "attribute"),
            ContextKind::TextNode => write!(f, "text"),
            ContextKind::DirectiveValue => write!(f, "directive"),
            ContextKind::StringLiteral => write!(f, "string"),
        }
    }
}

/// One source file as read at scan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: String,
    pub dialect: Dialect,
    pub content: String,
}

impl SourceUnit {
    pub fn new(path: impl Into<String>, dialect: Dialect, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            dialect,
            content: content.into(),
        }
    }
}

/// Raw text found by an extractor, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'u> {
    pub unit: &'u SourceUnit,
    pub text: String,
    pub kind: ContextKind,
    /// 1-based line in the unit.
    pub line: usize,
    /// 1-based column (characters) in the unit.
    pub col: usize,
}

impl<'u> Candidate<'u> {
    pub fn dialect(&self) -> Dialect {
        self.unit.dialect
    }

    pub fn context(&self) -> SourceContext {
        SourceContext::new(
            SourceLocation::new(self.unit.path.as_str(), self.line, self.col),
            line_at(&self.unit.content, self.line),
        )
    }
}

/// Distinct validated texts in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct TextSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl TextSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a text, returning false if it was already present.
    pub fn insert(&mut self, text: &str) -> bool {
        if self.seen.contains(text) {
            return false;
        }
        self.seen.insert(text.to_string());
        self.order.push(text.to_string());
        true
    }

    pub fn contains(&self, text: &str) -> bool {
        self.seen.contains(text)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for TextSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = TextSet::new();
        for text in iter {
            set.insert(text);
        }
        set
    }
}

/// Resolved text -> key mapping for one run, in insertion order.
///
/// The first key assigned to a text wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mapping, returning false if the text already had a key.
    pub fn insert(&mut self, text: impl Into<String>, key: impl Into<String>) -> bool {
        let text = text.into();
        if self.index.contains_key(&text) {
            return false;
        }
        self.index.insert(text.clone(), self.entries.len());
        self.entries.push((text, key.into()));
        true
    }

    pub fn get(&self, text: &str) -> Option<&str> {
        self.index
            .get(text)
            .map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains_text(&self, text: &str) -> bool {
        self.index.contains_key(text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(text, key)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, k)| (t.as_str(), k.as_str()))
    }
}

impl<T: Into<String>, K: Into<String>> FromIterator<(T, K)> for KeyMap {
    fn from_iter<I: IntoIterator<Item = (T, K)>>(iter: I) -> Self {
        let mut map = KeyMap::new();
        for (text, key) in iter {
            map.insert(text, key);
        }
        map
    }
}

/// One entry added to a locale resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pub key: String,
    pub text: String,
    pub namespace: String,
}

/// Progress event emitted while a pipeline phase runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub text: String,
    pub current: usize,
    pub total: usize,
}

/// Receiver of progress events. Implemented for any `Fn(&Progress)`.
pub trait ProgressListener: Sync {
    fn on_progress(&self, progress: &Progress);
}

impl<F> ProgressListener for F
where
    F: Fn(&Progress) + Sync,
{
    fn on_progress(&self, progress: &Progress) {
        self(progress)
    }
}
