//! Flat key -> text locale resource for one language.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

use crate::core::{KeyMap, ResourceEntry};

/// Owner of one `<lang>.json` file during a run.
///
/// Keys keep their file order; new keys are appended.
pub struct ResourceStore {
    path: PathBuf,
    data: Map<String, Value>,
    by_text: HashMap<String, String>,
}

impl ResourceStore {
    /// Load a resource file. A missing file is an empty resource; malformed
    /// JSON or a non-object root is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let data = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            let value: Value = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;
            match value {
                Value::Object(map) => map,
                _ => bail!("Root of JSON file must be an object: {}", path.display()),
            }
        } else {
            Map::new()
        };

        let mut by_text = HashMap::new();
        for (key, value) in &data {
            if let Some(text) = value.as_str() {
                by_text.entry(text.to_string()).or_insert_with(|| key.clone());
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            data,
            by_text,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Existing key for a text, if the resource already holds it.
    pub fn key_for_text(&self, text: &str) -> Option<&str> {
        self.by_text.get(text).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Add every mapping whose key is not present yet. Existing keys are never
    /// overwritten. Returns the entries that were added.
    pub fn merge(&mut self, keys: &KeyMap) -> Vec<ResourceEntry> {
        let mut added = Vec::new();
        for (text, key) in keys.iter() {
            if self.data.contains_key(key) {
                continue;
            }
            self.data
                .insert(key.to_string(), Value::String(text.to_string()));
            self.by_text
                .entry(text.to_string())
                .or_insert_with(|| key.to_string());
            added.push(ResourceEntry {
                key: key.to_string(),
                text: text.to_string(),
                namespace: namespace_of(key).to_string(),
            });
        }
        added
    }

    /// Add an empty value for each missing key. Returns how many were added.
    pub fn add_placeholders<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) -> usize {
        let mut count = 0;
        for key in keys {
            if !self.data.contains_key(key) {
                self.data.insert(key.to_string(), Value::String(String::new()));
                count += 1;
            }
        }
        count
    }

    /// Write the whole resource with 2-space indentation and a trailing newline.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(&self.data).context("Failed to serialize JSON")?;

        fs::write(&self.path, format!("{}\n", content))
            .with_context(|| format!("Failed to write file: {}", self.path.display()))?;

        Ok(())
    }
}

fn namespace_of(key: &str) -> &str {
    key.split_once('.').map_or("", |(namespace, _)| namespace)
}
