// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! Google Gemini backend via the `generateContent` REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{AiProvider, SYSTEM_PROMPT, classify_status, transport_error};
use crate::config::Config;
use crate::domain::{CommitMessage, GitDiff};
use crate::error::{Error, Result};
use crate::services::{parser, prompt};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const KEY_URL: &str = "https://aistudio.google.com/apikey";
const ENV_VAR: &str = "GEMINI_API_KEY";

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
    timeout_secs: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiProvider {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config
                .gemini_base_url
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
impl AiProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn validate_config(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.api_key.is_empty() {
            errors.push(format!(
                "Gemini API key is required. Get yours at: {KEY_URL} (GEMINI_API_KEY or GOOGLE_API_KEY)"
            ));
        }

        if self.model.is_empty() {
            errors.push("model cannot be empty".to_string());
        }

        errors
    }

    async fn generate_commit_message(&self, diff: &GitDiff) -> Result<CommitMessage> {
        let prompt = prompt::for_diff(diff);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                system_instruction: Content {
                    parts: vec![Part {
                        text: SYSTEM_PROMPT.into(),
                    }],
                },
                contents: vec![Content {
                    parts: vec![Part { text: prompt }],
                }],
                generation_config: GenerationConfig {
                    temperature: self.temperature,
                    max_output_tokens: self.max_tokens,
                },
            })
            .send()
            .await
            .map_err(|e| transport_error("gemini", self.timeout_secs, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status("gemini", KEY_URL, ENV_VAR, status, &body));
        }

        let data: GenerateResponse = response
            .json()
            .await
            .map_err(|e| transport_error("gemini", self.timeout_secs, e))?;

        let text = data
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| Error::Provider {
                provider: "gemini".into(),
                status: status.as_u16(),
                message: "response contained no candidates".into(),
            })?;

        Ok(parser::parse_commit_text(&text))
    }
}
