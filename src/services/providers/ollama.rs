// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! Ollama backend for local models. No API key involved; a refused
//! connection maps to a dedicated "not running" error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{AiProvider, SYSTEM_PROMPT, error_message};
use crate::config::Config;
use crate::domain::{CommitMessage, GitDiff};
use crate::error::{Error, Result};
use crate::services::{parser, prompt};

pub struct OllamaProvider {
    client: Client,
    host: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    system: String,
    prompt: String,
    stream: bool,
    options: Options,
}

#[derive(Serialize)]
struct Options {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaProvider {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            // Sanitize: remove trailing slashes to avoid //api/generate
            host: config.ollama_host.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
        }
    }
}

#[async_trait]
impl AiProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn validate_config(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.host.is_empty() {
            errors.push("ollama_host cannot be empty".to_string());
        } else if !self.host.starts_with("http://") && !self.host.starts_with("https://") {
            errors.push(format!(
                "ollama_host must start with http:// or https://, got '{}'",
                self.host
            ));
        }

        if self.model.is_empty() {
            errors.push("model cannot be empty".to_string());
        }

        errors
    }

    async fn generate_commit_message(&self, diff: &GitDiff) -> Result<CommitMessage> {
        let prompt = prompt::for_diff(diff);
        let url = format!("{}/api/generate", self.host);

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: self.model.clone(),
                system: SYSTEM_PROMPT.into(),
                prompt,
                stream: false,
                options: Options {
                    temperature: self.temperature,
                    num_predict: self.max_tokens,
                },
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    Error::OllamaNotRunning {
                        host: self.host.clone(),
                    }
                } else if e.is_timeout() {
                    Error::Timeout {
                        provider: "ollama".into(),
                        secs: self.timeout_secs,
                    }
                } else {
                    Error::Network {
                        provider: "ollama".into(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            // No API keys involved; the credential-oriented classification
            // would only mislead here
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider {
                provider: "ollama".into(),
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let data: GenerateResponse = response.json().await.map_err(|e| Error::Network {
            provider: "ollama".into(),
            message: e.to_string(),
        })?;

        Ok(parser::parse_commit_text(&data.response))
    }
}
