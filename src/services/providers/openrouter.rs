// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! OpenRouter backend: unified access to 100+ models (OpenAI, Anthropic,
//! Google, Mistral, Cohere, ...) through one API key and an
//! OpenAI-compatible interface.
//!
//! Model identifiers take the form `vendor/model-name`
//! (e.g. `openai/gpt-4o`, `anthropic/claude-3-haiku`) and are validated at
//! construction so misconfiguration surfaces before any network I/O.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{AiProvider, SYSTEM_PROMPT, classify_status, transport_error};
use crate::config::Config;
use crate::domain::{CommitMessage, GitDiff};
use crate::error::{Error, Result};
use crate::services::{parser, prompt};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const KEY_URL: &str = "https://openrouter.ai/keys";
const ENV_VAR: &str = "OPENROUTER_API_KEY";

/// `vendor/model-name`: lowercase letters, digits and hyphens for the
/// vendor; dots also allowed in the model segment.
static MODEL_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+/[a-z0-9.-]+$").unwrap());

pub struct OpenRouterProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl OpenRouterProvider {
    /// Fails fast on a malformed model identifier, before any network
    /// activity.
    pub fn new(config: &Config) -> Result<Self> {
        if !MODEL_FORMAT.is_match(&config.model) {
            return Err(Error::Config(format!(
                "invalid model format '{}'. Must be 'vendor/model-name' (e.g. 'openai/gpt-4o')",
                config.model
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Ok(Self {
            client,
            base_url: config
                .openrouter_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl AiProvider for OpenRouterProvider {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    fn validate_config(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.api_key.len() < 10 {
            errors.push(format!(
                "OpenRouter API key is required. Get yours at: {KEY_URL}"
            ));
        }

        if !MODEL_FORMAT.is_match(&self.model) {
            errors.push(format!(
                "invalid model format '{}'. Use 'vendor/model-name' (e.g. 'openai/gpt-4o')",
                self.model
            ));
        }

        errors
    }

    async fn generate_commit_message(&self, diff: &GitDiff) -> Result<CommitMessage> {
        let prompt = prompt::for_diff(diff);
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", "https://github.com/Sephyi/commitgen")
            .header("X-Title", "commitgen")
            .json(&ChatRequest {
                model: self.model.clone(),
                messages: vec![
                    Message {
                        role: "system".into(),
                        content: SYSTEM_PROMPT.into(),
                    },
                    Message {
                        role: "user".into(),
                        content: prompt,
                    },
                ],
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            })
            .send()
            .await
            .map_err(|e| transport_error("openrouter", self.timeout_secs, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status("openrouter", KEY_URL, ENV_VAR, status, &body));
        }

        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| transport_error("openrouter", self.timeout_secs, e))?;

        let text = data
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Provider {
                provider: "openrouter".into(),
                status: status.as_u16(),
                message: "response contained no choices".into(),
            })?;

        Ok(parser::parse_commit_text(&text))
    }
}
