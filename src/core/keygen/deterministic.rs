//! Deterministic key derivation: word segmentation plus plain pinyin.

use std::sync::LazyLock;

use jieba_rs::Jieba;
use pinyin::ToPinyin;
use regex::Regex;

use super::KeyStyle;
use super::namespace::infer_namespace;
use crate::utils::is_target_char;

/// Body used when a text yields no tokens at all.
const EMPTY_BODY: &str = "text";

static JIEBA: LazyLock<Jieba> = LazyLock::new(Jieba::new);

/// Runs of anything other than target-script chars, ASCII alphanumerics and whitespace.
static NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\x{4e00}-\x{9fa5}A-Za-z0-9\s]+").unwrap());

static CAMEL_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());

static ASCII_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_-]+").unwrap());

/// Generate a namespaced key for a text.
///
/// # Examples
///
/// ```
/// use trnow::core::keygen::{KeyStyle, generate_key};
///
/// assert_eq!(generate_key("用户管理", KeyStyle::SnakeCase), "common.yonghu_guanli");
/// assert_eq!(generate_key("导入CSV文件", KeyStyle::CamelCase), "common.daoruCSVWenjian");
/// ```
pub fn generate_key(text: &str, style: KeyStyle) -> String {
    format!("{}.{}", infer_namespace(text), key_body(text, style))
}

/// Key without namespace.
pub fn key_body(text: &str, style: KeyStyle) -> String {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return EMPTY_BODY.to_string();
    }
    join_tokens(&tokens, style)
}

/// Split text into key tokens: pinyin words for target-script runs, words for ASCII runs.
fn tokenize(text: &str) -> Vec<String> {
    let cleaned = NOISE.replace_all(text.trim(), " ");

    let mut tokens = Vec::new();
    for (is_target, run) in script_runs(cleaned.trim()) {
        if is_target {
            tokens.extend(
                JIEBA
                    .cut(run, false)
                    .into_iter()
                    .map(transliterate)
                    .filter(|word| !word.is_empty()),
            );
        } else {
            let split = CAMEL_BOUNDARY.replace_all(run, "$1 $2");
            tokens.extend(
                ASCII_SEPARATOR
                    .split(&split)
                    .filter(|word| !word.is_empty())
                    .map(str::to_string),
            );
        }
    }
    tokens
}

/// Split text into maximal runs of target-script and non-target-script characters.
fn script_runs(text: &str) -> Vec<(bool, &str)> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;

    for (i, c) in text.char_indices() {
        let is_target = is_target_char(c);
        match current {
            Some(kind) if kind != is_target => {
                runs.push((kind, &text[start..i]));
                start = i;
                current = Some(is_target);
            }
            None => current = Some(is_target),
            _ => {}
        }
    }
    if let Some(kind) = current {
        runs.push((kind, &text[start..]));
    }
    runs
}

/// Plain (toneless) pinyin of a word, lower-cased. Characters without a
/// reading are dropped.
fn transliterate(word: &str) -> String {
    word.to_pinyin()
        .flatten()
        .map(|p| p.plain())
        .collect::<String>()
        .to_lowercase()
}

fn join_tokens(tokens: &[String], style: KeyStyle) -> String {
    match style {
        KeyStyle::SnakeCase => tokens
            .iter()
            .map(|t| t.to_lowercase())
            .collect::<Vec<_>>()
            .join("_"),
        KeyStyle::CamelCase => tokens
            .iter()
            .enumerate()
            .map(|(i, t)| if i == 0 { t.to_lowercase() } else { capitalize(t) })
            .collect(),
    }
}

/// Upper-case the first character, keep the rest verbatim so acronyms survive.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
