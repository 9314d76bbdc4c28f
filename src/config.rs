use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::keygen::{DEFAULT_BATCH_SIZE, KeyStyle};

pub const CONFIG_FILE_NAME: &str = ".trnowrc.json";
pub const YAML_CONFIG_FILE_NAME: &str = ".trnow.yml";

/// Config file names, in lookup order within one directory.
pub const CONFIG_FILE_NAMES: &[&str] = &[CONFIG_FILE_NAME, YAML_CONFIG_FILE_NAME];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
    #[serde(default = "default_locale_dir")]
    pub locale_dir: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_langs")]
    pub target_langs: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub key_generation: KeyGenerationConfig,
    #[serde(default)]
    pub backup: BackupConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyGenerationConfig {
    #[serde(default)]
    pub style: KeyStyle,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub ai: AiConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url", rename = "baseURL")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupConfig {
    #[serde(default = "default_backup_dir")]
    pub dir: String,
    #[serde(default = "default_keep")]
    pub keep: usize,
}

fn default_source_dir() -> String {
    "./src".to_string()
}

fn default_locale_dir() -> String {
    "./src/locales".to_string()
}

fn default_source_lang() -> String {
    "zh-CN".to_string()
}

fn default_target_langs() -> Vec<String> {
    vec!["en-US".to_string()]
}

fn default_ignores() -> Vec<String> {
    [
        "**/node_modules/**",
        "**/dist/**",
        "**/.git/**",
        "**/*.test.*",
    ]
    .map(String::from)
    .to_vec()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_provider() -> String {
    "deepseek".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_backup_dir() -> String {
    "./.trnow-backup".to_string()
}

fn default_keep() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            locale_dir: default_locale_dir(),
            source_lang: default_source_lang(),
            target_langs: default_target_langs(),
            ignores: default_ignores(),
            key_generation: KeyGenerationConfig::default(),
            backup: BackupConfig::default(),
        }
    }
}

impl Default for KeyGenerationConfig {
    fn default() -> Self {
        Self {
            style: KeyStyle::default(),
            batch_size: default_batch_size(),
            ai: AiConfig::default(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_provider(),
            model: default_model(),
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            dir: default_backup_dir(),
            keep: default_keep(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Rejects invalid glob patterns in `ignores`, a zero batch size and a
    /// zero snapshot retention count.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        if self.key_generation.batch_size == 0 {
            bail!("'keyGeneration.batchSize' must be at least 1");
        }

        if self.backup.keep == 0 {
            bail!("'backup.keep' must be at least 1");
        }

        Ok(())
    }

    /// Path of the resource file for a language tag.
    pub fn locale_file(&self, lang: &str) -> PathBuf {
        Path::new(&self.locale_dir).join(format!("{lang}.json"))
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn default_config_yaml() -> Result<String> {
    let config = Config::default();
    serde_yaml::to_string(&config).context("Failed to generate default config.")
}

/// Search for a config file from `start_dir` upward, stopping at the
/// repository root (a directory containing `.git`).
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        for name in CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                return Some(config_path);
            }
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let config = parse_config_file(&path)?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}

fn parse_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yml" | "yaml")
    );

    let config = if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?
    };
    Ok(config)
}
