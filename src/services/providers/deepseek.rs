// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! DeepSeek backend. OpenAI-compatible chat completions API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{AiProvider, SYSTEM_PROMPT, classify_status, transport_error};
use crate::config::Config;
use crate::domain::{CommitMessage, GitDiff};
use crate::error::{Error, Result};
use crate::services::{parser, prompt};

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";
const KEY_URL: &str = "https://platform.deepseek.com/api_keys";
const ENV_VAR: &str = "DEEPSEEK_API_KEY";

pub struct DeepSeekProvider {
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

impl DeepSeekProvider {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config
                .deepseek_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
        }
    }
}

#[async_trait]
impl AiProvider for DeepSeekProvider {
    fn name(&self) -> &'static str {
        "deepseek"
    }

    fn validate_config(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.api_key.is_empty() {
            errors.push(format!(
                "DeepSeek API key is required. Get yours at: {KEY_URL}"
            ));
        }

        if self.model.is_empty() {
            errors.push("model cannot be empty".to_string());
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
            .map_err(|e| transport_error("deepseek", self.timeout_secs, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status("deepseek", KEY_URL, ENV_VAR, status, &body));
        }

        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| transport_error("deepseek", self.timeout_secs, e))?;

        let text = data
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Provider {
                provider: "deepseek".into(),
                status: status.as_u16(),
                message: "response contained no choices".into(),
            })?;

        Ok(parser::parse_commit_text(&text))
    }
}
