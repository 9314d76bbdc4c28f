//! AI-assisted key naming over an OpenAI-compatible chat completion API.
//!
//! The namer is best effort: any transport or parse failure yields no keys for
//! the batch and the caller falls back to [`super::generate_key`].

use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Result, anyhow};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::KeyStyle;
use crate::config::AiConfig;

const PROMPT_TEMPLATE: &str = r#"Generate i18n keys for the Chinese UI texts below.

1. Use a dot-separated namespace chosen from the meaning of the text:
   - common: generic text (common.input, common.button, common.label)
   - message: notifications (message.success, message.error, message.warning)
   - form: form text (form.validation, form.placeholder)
   - table: table text (table.title, table.empty)
   - action: operations (action.create, action.delete, action.update)
   Short action words of 2-3 characters are usually buttons.
2. The last segment names the concrete action or noun.
3. Use {style} naming.
4. Answer with exactly one line per text, in this format:
   Text: "<original text>" => Key: `namespace.type.name`

Texts:
{texts}"#;

static LIST_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+\.\s*").unwrap());

static KEY_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)Key:\s*[`'"]([^`'"]+)[`'"]"#).unwrap());

static KEY_NOISE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s.]").unwrap());

static WORD_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_-]+").unwrap());

static SNAKE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s-]+").unwrap());

/// Something that turns a prompt into a completion.
pub trait CompletionClient {
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Names a batch of texts at once.
pub trait BatchNamer {
    /// Keys for as many of `texts` as could be named. Missing texts are left
    /// to the caller.
    fn name_batch(&self, texts: &[String], style: KeyStyle) -> Result<HashMap<String, String>>;
}

pub struct AiKeyNamer<C> {
    client: C,
}

impl<C: CompletionClient> AiKeyNamer<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl AiKeyNamer<HttpCompletionClient> {
    /// Build a namer from configuration. `None` when AI naming is disabled or
    /// the endpoint is not fully configured.
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        HttpCompletionClient::from_config(config).map(Self::new)
    }
}

impl<C: CompletionClient> BatchNamer for AiKeyNamer<C> {
    fn name_batch(&self, texts: &[String], style: KeyStyle) -> Result<HashMap<String, String>> {
        let prompt = build_prompt(texts, style);
        let content = self.client.complete(&prompt)?;
        Ok(parse_ai_response(&content, texts, style))
    }
}

pub fn build_prompt(texts: &[String], style: KeyStyle) -> String {
    PROMPT_TEMPLATE
        .replace("{style}", style.as_str())
        .replace("{texts}", &texts.join("\n"))
}

/// Pick out one key per text from a completion.
///
/// A line belongs to a text only if it quotes the text exactly; list numbering
/// in front of the line is ignored.
pub fn parse_ai_response(
    content: &str,
    texts: &[String],
    style: KeyStyle,
) -> HashMap<String, String> {
    let lines: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| LIST_NUMBER.find(line).map_or(line, |m| &line[m.end()..]))
        .collect();

    let mut keys = HashMap::new();
    for text in texts {
        let double = format!("Text: \"{text}\"");
        let single = format!("Text: '{text}'");
        let Some(line) = lines
            .iter()
            .find(|line| line.contains(&double) || line.contains(&single))
        else {
            continue;
        };
        let Some(raw_key) = KEY_FIELD.captures(line).and_then(|caps| caps.get(1)) else {
            continue;
        };
        let key = normalize_key(raw_key.as_str(), style);
        if !key.is_empty() {
            keys.insert(text.clone(), key);
        }
    }
    keys
}

/// Normalize a model-proposed key: dots are kept as namespace separators and
/// the style is applied to each segment.
pub fn normalize_key(key: &str, style: KeyStyle) -> String {
    let unquoted: String = key.chars().filter(|c| *c != '\'' && *c != '"').collect();
    let cleaned = KEY_NOISE.replace_all(unquoted.trim(), "_");

    cleaned
        .split('.')
        .map(|segment| normalize_segment(segment, style))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

fn normalize_segment(segment: &str, style: KeyStyle) -> String {
    match style {
        KeyStyle::CamelCase => WORD_SEPARATOR
            .split(segment)
            .filter(|word| !word.is_empty())
            .enumerate()
            .map(|(i, word)| {
                if i == 0 {
                    word.to_lowercase()
                } else {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first
                            .to_uppercase()
                            .chain(chars.as_str().to_lowercase().chars())
                            .collect(),
                        None => String::new(),
                    }
                }
            })
            .collect(),
        KeyStyle::SnakeCase => SNAKE_SEPARATOR
            .replace_all(&segment.trim().to_lowercase(), "_")
            .into_owned(),
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    n: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

/// Blocking client for `POST {base_url}/chat/completions`.
pub struct HttpCompletionClient {
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl HttpCompletionClient {
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        if !config.enabled
            || config.api_key.is_empty()
            || config.base_url.is_empty()
            || config.model.is_empty()
        {
            return None;
        }
        Some(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    async fn request(&self, prompt: &str) -> Result<String> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.3,
            max_tokens: 1000,
            n: 1,
        };

        let response: ChatResponse = client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("completion response has no choices"))
    }
}

impl CompletionClient for HttpCompletionClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        rt.block_on(self.request(prompt))
    }
}
