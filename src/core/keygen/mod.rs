//! Key synthesis for new texts.
//!
//! Texts are named in sequential batches. When an AI namer is configured it is
//! asked first; every text it does not name gets a deterministic key from
//! [`generate_key`]. Keys are made unique against keys already in use.

pub mod ai;
pub mod deterministic;
pub mod namespace;

use std::collections::{HashMap, HashSet};

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::core::{KeyMap, Progress, ProgressListener};

pub use ai::{AiKeyNamer, BatchNamer, CompletionClient, HttpCompletionClient};
pub use deterministic::{generate_key, key_body};
pub use namespace::{DEFAULT_NAMESPACE, infer_namespace};

/// Default number of texts per naming batch.
pub const DEFAULT_BATCH_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
pub enum KeyStyle {
    #[serde(rename = "snake_case")]
    #[value(name = "snake_case")]
    SnakeCase,
    #[default]
    #[serde(rename = "camelCase")]
    #[value(name = "camelCase")]
    CamelCase,
}

impl KeyStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyStyle::SnakeCase => "snake_case",
            KeyStyle::CamelCase => "camelCase",
        }
    }

    /// Separator placed before a uniqueness suffix.
    fn suffix_separator(&self) -> &'static str {
        match self {
            KeyStyle::SnakeCase => "_",
            KeyStyle::CamelCase => "",
        }
    }
}

pub struct KeySynthesizer<'n> {
    style: KeyStyle,
    batch_size: usize,
    namer: Option<&'n dyn BatchNamer>,
    verbose: bool,
}

impl<'n> KeySynthesizer<'n> {
    pub fn new(style: KeyStyle, batch_size: usize) -> Self {
        Self {
            style,
            batch_size: batch_size.max(1),
            namer: None,
            verbose: false,
        }
    }

    pub fn with_namer(mut self, namer: Option<&'n dyn BatchNamer>) -> Self {
        self.namer = namer;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Assign a key to every text, in order.
    ///
    /// `taken` holds keys already in use; assigned keys are added to it.
    /// One progress event is emitted per batch.
    pub fn synthesize(
        &self,
        texts: &[String],
        taken: &mut HashSet<String>,
        listener: Option<&dyn ProgressListener>,
    ) -> KeyMap {
        let mut keys = KeyMap::new();
        let total = texts.len().div_ceil(self.batch_size);

        for (index, batch) in texts.chunks(self.batch_size).enumerate() {
            let named = self.name_with_ai(batch);

            for text in batch {
                let proposed = named
                    .get(text)
                    .cloned()
                    .unwrap_or_else(|| generate_key(text, self.style));
                let key = unique_key(proposed, self.style, taken);
                taken.insert(key.clone());
                keys.insert(text.as_str(), key);
            }

            if let Some(listener) = listener {
                listener.on_progress(&Progress {
                    text: format!("batch of {} texts", batch.len()),
                    current: index + 1,
                    total,
                });
            }
        }

        keys
    }

    fn name_with_ai(&self, batch: &[String]) -> HashMap<String, String> {
        let Some(namer) = self.namer else {
            return Default::default();
        };
        match namer.name_batch(batch, self.style) {
            Ok(named) => named,
            Err(e) => {
                if self.verbose {
                    eprintln!(
                        "{} AI key naming failed, using generated keys: {}",
                        "warning:".bold().yellow(),
                        e
                    );
                }
                Default::default()
            }
        }
    }
}

/// Append `2`, `3`, ... (with `_` in snake_case) until the key is unused.
fn unique_key(key: String, style: KeyStyle, taken: &HashSet<String>) -> String {
    if !taken.contains(&key) {
        return key;
    }
    (2..)
        .map(|n| format!("{key}{}{n}", style.suffix_separator()))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::{Result, anyhow};
    use pretty_assertions::assert_eq;

    use super::*;

    struct FixedNamer(HashMap<String, String>);

    impl BatchNamer for FixedNamer {
        fn name_batch(&self, texts: &[String], _style: KeyStyle) -> Result<HashMap<String, String>> {
            Ok(texts
                .iter()
                .filter_map(|t| self.0.get(t).map(|k| (t.clone(), k.clone())))
                .collect())
        }
    }

    struct FailingNamer;

    impl BatchNamer for FailingNamer {
        fn name_batch(&self, _texts: &[String], _style: KeyStyle) -> Result<HashMap<String, String>> {
            Err(anyhow!("connection refused"))
        }
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_deterministic_without_namer() {
        let synth = KeySynthesizer::new(KeyStyle::SnakeCase, 20);
        let keys = synth.synthesize(&texts(&["用户管理", "操作成功"]), &mut HashSet::new(), None);

        assert_eq!(keys.get("用户管理"), Some("common.yonghu_guanli"));
        assert_eq!(keys.get("操作成功"), Some("success.caozuo_chenggong"));
    }

    #[test]
    fn test_ai_keys_with_fallback_for_missing() {
        let namer = FixedNamer(HashMap::from([(
            "用户管理".to_string(),
            "common.label.userManage".to_string(),
        )]));
        let synth = KeySynthesizer::new(KeyStyle::SnakeCase, 20).with_namer(Some(&namer));
        let keys = synth.synthesize(&texts(&["用户管理", "操作成功"]), &mut HashSet::new(), None);

        assert_eq!(keys.get("用户管理"), Some("common.label.userManage"));
        assert_eq!(keys.get("操作成功"), Some("success.caozuo_chenggong"));
    }

    #[test]
    fn test_failed_batch_falls_back() {
        let synth = KeySynthesizer::new(KeyStyle::SnakeCase, 1).with_namer(Some(&FailingNamer));
        let keys = synth.synthesize(&texts(&["用户管理", "操作成功"]), &mut HashSet::new(), None);

        assert_eq!(keys.len(), 2);
        assert_eq!(keys.get("用户管理"), Some("common.yonghu_guanli"));
    }

    #[test]
    fn test_colliding_keys_get_suffix() {
        let mut taken = HashSet::from(["common.yonghu_guanli".to_string()]);
        let synth = KeySynthesizer::new(KeyStyle::SnakeCase, 20);
        let keys = synth.synthesize(&texts(&["用户管理", "用户-管理"]), &mut taken, None);

        assert_eq!(keys.get("用户管理"), Some("common.yonghu_guanli_2"));
        assert_eq!(keys.get("用户-管理"), Some("common.yonghu_guanli_3"));
        assert!(taken.contains("common.yonghu_guanli_3"));
    }

    #[test]
    fn test_camel_case_suffix_has_no_separator() {
        let mut taken = HashSet::from(["common.yonghuGuanli".to_string()]);
        let synth = KeySynthesizer::new(KeyStyle::CamelCase, 20);
        let keys = synth.synthesize(&texts(&["用户管理"]), &mut taken, None);
        assert_eq!(keys.get("用户管理"), Some("common.yonghuGuanli2"));
    }

    #[test]
    fn test_progress_per_batch() {
        let seen = Mutex::new(Vec::new());
        let listener = |p: &Progress| seen.lock().unwrap().push((p.current, p.total));
        let synth = KeySynthesizer::new(KeyStyle::CamelCase, 2);
        synth.synthesize(
            &texts(&["用户管理", "操作成功", "删除确认"]),
            &mut HashSet::new(),
            Some(&listener),
        );

        assert_eq!(*seen.lock().unwrap(), vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn test_key_style_serde_names() {
        assert_eq!(serde_json::to_string(&KeyStyle::CamelCase).unwrap(), "\"camelCase\"");
        let style: KeyStyle = serde_json::from_str("\"snake_case\"").unwrap();
        assert_eq!(style, KeyStyle::SnakeCase);
    }
}
