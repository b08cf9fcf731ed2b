// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! Static catalog of known providers and their live configuration status.
//!
//! The registry holds no state: every query re-inspects the environment,
//! so a key exported between two calls is picked up by the second one.

use std::process::{Command, Stdio};

/// Environment access the registry depends on. Injectable so tests can
/// substitute a fake instead of touching process globals.
pub trait Environment: Send + Sync {
    /// Value of an environment variable; empty strings count as unset.
    fn var(&self, key: &str) -> Option<String>;

    /// Run a probe subprocess; true only on a zero exit. A missing
    /// executable is "false", never an error.
    fn probe(&self, program: &str, args: &[&str]) -> bool;
}

pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }

    fn probe(&self, program: &str, args: &[&str]) -> bool {
        Command::new(program)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub struct ProviderInfo {
    pub name: &'static str,
    pub configured: bool,
    pub models: Vec<&'static str>,
    pub description: &'static str,
}

pub struct ProviderRegistry;

impl ProviderRegistry {
    pub fn list_providers(env: &dyn Environment) -> Vec<ProviderInfo> {
        vec![
            ProviderInfo {
                name: "openai",
                configured: env.var("OPENAI_API_KEY").is_some(),
                models: vec!["gpt-4o", "gpt-4o-mini"],
                description: "OpenAI GPT models",
            },
            ProviderInfo {
                name: "anthropic",
                configured: env.var("ANTHROPIC_API_KEY").is_some(),
                models: vec!["claude-3-opus", "claude-3-sonnet", "claude-3-haiku"],
                description: "Anthropic Claude models",
            },
            ProviderInfo {
                name: "gemini",
                configured: env.var("GEMINI_API_KEY").is_some()
                    || env.var("GOOGLE_API_KEY").is_some(),
                models: vec!["gemini-2.0-flash-001", "gemini-2.5-flash", "gemini-2.5-pro"],
                description: "Google Gemini models",
            },
            ProviderInfo {
                name: "deepseek",
                configured: env.var("DEEPSEEK_API_KEY").is_some(),
                models: vec!["deepseek-chat", "deepseek-coder"],
                description: "DeepSeek models (cheapest: $0.27/1M tokens)",
            },
            ProviderInfo {
                name: "openrouter",
                configured: env.var("OPENROUTER_API_KEY").is_some(),
                models: vec![
                    "openai/gpt-4o",
                    "openai/gpt-4o-mini",
                    "anthropic/claude-3-5-sonnet",
                    "anthropic/claude-3-haiku",
                    "google/gemini-2.0-flash-exp",
                    "mistralai/mistral-small",
                    "cohere/command-r-plus",
                ],
                description: "OpenRouter (unified access to 100+ models)",
            },
            ProviderInfo {
                name: "ollama",
                configured: env.probe("ollama", &["--version"]),
                models: vec!["qwen2.5:7b", "qwen2.5:3b", "llama3.2", "codellama"],
                description: "Ollama (local AI models)",
            },
        ]
    }

    pub fn provider_names(env: &dyn Environment) -> Vec<&'static str> {
        Self::list_providers(env).iter().map(|p| p.name).collect()
    }

    pub fn configured_providers(env: &dyn Environment) -> Vec<&'static str> {
        Self::list_providers(env)
            .iter()
            .filter(|p| p.configured)
            .map(|p| p.name)
            .collect()
    }
}
