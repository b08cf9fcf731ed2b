// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use async_trait::async_trait;
use reqwest::StatusCode;

pub mod anthropic;
pub mod deepseek;
pub mod gemini;
pub mod ollama;
pub mod openai;
pub mod openrouter;
pub mod registry;

use crate::config::{Config, Provider};
use crate::domain::{CommitMessage, GitDiff};
use crate::error::{Error, Result};

pub(crate) const SYSTEM_PROMPT: &str =
    "You are a commit message generator. Generate concise conventional commit messages.";

/// Providers the error path suggests when a backend reports 503. Kept as a
/// static catalog rather than derived from live registry state, so the
/// suggestion is stable even when the environment probe is slow or flaky.
const FALLBACK_PROVIDERS: &[&str] = &["openai", "anthropic", "deepseek", "ollama"];

/// The capability contract every backend implements.
#[async_trait]
pub trait AiProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Inspect held credentials/configuration; one string per defect.
    /// Never performs I/O and never fails.
    fn validate_config(&self) -> Vec<String>;

    /// Perform exactly one outbound request and return a fully populated
    /// message, or fail with a classified error.
    async fn generate_commit_message(&self, diff: &GitDiff) -> Result<CommitMessage>;
}

pub fn create_provider(config: &Config) -> Result<Box<dyn AiProvider>> {
    match config.provider {
        Provider::Ollama => Ok(Box::new(ollama::OllamaProvider::new(config))),
        Provider::OpenAI => Ok(Box::new(openai::OpenAiProvider::new(config))),
        Provider::Anthropic => Ok(Box::new(anthropic::AnthropicProvider::new(config))),
        Provider::Gemini => Ok(Box::new(gemini::GeminiProvider::new(config))),
        Provider::DeepSeek => Ok(Box::new(deepseek::DeepSeekProvider::new(config))),
        Provider::OpenRouter => Ok(Box::new(openrouter::OpenRouterProvider::new(config)?)),
    }
}

/// Pull a human-readable message out of an error response body.
/// Most backends use the OpenAI-style `{"error": {"message": ...}}` shape;
/// Ollama puts a bare string in `error`.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            let err = v.get("error")?;
            err.as_str().map(ToString::to_string).or_else(|| {
                err.get("message")?.as_str().map(ToString::to_string)
            })
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "Unknown error".to_string()
            } else {
                body.trim().to_string()
            }
        })
}

/// Translate a non-2xx status into the classified provider error.
pub(crate) fn classify_status(
    provider: &'static str,
    key_url: &'static str,
    env_var: &'static str,
    status: StatusCode,
    body: &str,
) -> Error {
    let message = error_message(body);

    match status.as_u16() {
        401 => Error::Unauthorized {
            provider: provider.into(),
            message,
            key_url: key_url.into(),
            env_var: env_var.into(),
        },
        429 => Error::RateLimited {
            provider: provider.into(),
            message,
        },
        503 => Error::Unavailable {
            provider: provider.into(),
            message,
            alternatives: FALLBACK_PROVIDERS
                .iter()
                .filter(|p| **p != provider)
                .map(ToString::to_string)
                .collect(),
        },
        s => Error::Provider {
            provider: provider.into(),
            status: s,
            message,
        },
    }
}

/// Map a reqwest transport error, distinguishing the bounded timeout.
pub(crate) fn transport_error(provider: &'static str, timeout_secs: u64, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout {
            provider: provider.into(),
            secs: timeout_secs,
        }
    } else {
        Error::Network {
            provider: provider.into(),
            message: e.to_string(),
        }
    }
}
