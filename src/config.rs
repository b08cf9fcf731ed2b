// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Ollama,
    OpenAI,
    Anthropic,
    Gemini,
    DeepSeek,
    OpenRouter,
}

impl Provider {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai" => Some(Self::OpenAI),
            "anthropic" => Some(Self::Anthropic),
            "gemini" => Some(Self::Gemini),
            "deepseek" => Some(Self::DeepSeek),
            "openrouter" => Some(Self::OpenRouter),
            _ => None,
        }
    }

    /// Environment variable consulted when no api_key is configured.
    pub fn key_env_var(&self) -> Option<&'static str> {
        match self {
            Self::Ollama => None,
            Self::OpenAI => Some("OPENAI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Gemini => Some("GEMINI_API_KEY"),
            Self::DeepSeek => Some("DEEPSEEK_API_KEY"),
            Self::OpenRouter => Some("OPENROUTER_API_KEY"),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::OpenAI => write!(f, "openai"),
            Self::Anthropic => write!(f, "anthropic"),
            Self::Gemini => write!(f, "gemini"),
            Self::DeepSeek => write!(f, "deepseek"),
            Self::OpenRouter => write!(f, "openrouter"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: Provider,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_ollama_host")]
    pub ollama_host: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in seconds (default 60)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature (0.0-2.0, default 0.7)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate (default 500)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Maximum lines of diff content kept per file
    #[serde(default = "default_max_file_lines")]
    pub max_file_lines: usize,

    /// Base URL overrides for OpenAI-compatible and vendor APIs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic_base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepseek_base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openrouter_base_url: Option<String>,
}

fn default_model() -> String {
    "qwen2.5:7b".into()
}
fn default_ollama_host() -> String {
    "http://localhost:11434".into()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    500
}
fn default_max_file_lines() -> usize {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: default_model(),
            ollama_host: default_ollama_host(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_file_lines: default_max_file_lines(),
            openai_base_url: None,
            anthropic_base_url: None,
            gemini_base_url: None,
            deepseek_base_url: None,
            openrouter_base_url: None,
        }
    }
}

impl Config {
    /// Load with priority: CLI > ENV > user config > project config > defaults
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Project-level config (.commitgen.toml in repo root)
        if let Ok(cwd) = std::env::current_dir() {
            let project_config = cwd.join(".commitgen.toml");
            if project_config.exists() {
                figment = figment.merge(Toml::file(&project_config));
            }
        }

        // User-level config
        if let Some(path) = Self::config_path() {
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
            }
        }

        // Environment variables (COMMITGEN_MODEL, COMMITGEN_PROVIDER, etc.)
        figment = figment.merge(Env::prefixed("COMMITGEN_").split("__"));

        let mut config: Config = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        // CLI overrides (highest priority)
        config.apply_cli(cli)?;

        // Provider-specific API key fallback
        if config.api_key.is_none() {
            if let Some(var) = config.provider.key_env_var() {
                config.api_key = std::env::var(var).ok().filter(|v| !v.is_empty());
            }
            // Gemini also honors the generic Google credential
            if config.api_key.is_none() && config.provider == Provider::Gemini {
                config.api_key = std::env::var("GOOGLE_API_KEY").ok().filter(|v| !v.is_empty());
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "commitgen").map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    fn apply_cli(&mut self, cli: &Cli) -> Result<()> {
        if let Some(ref p) = cli.provider {
            self.provider = Provider::parse(p).ok_or_else(|| {
                Error::Config(format!(
                    "unknown provider '{p}'. Known: ollama, openai, anthropic, gemini, deepseek, openrouter"
                ))
            })?;
        }
        if let Some(ref m) = cli.model {
            self.model = m.clone();
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(1..=3600).contains(&self.timeout_secs) {
            return Err(Error::Config(format!(
                "timeout_secs must be 1-3600, got {}",
                self.timeout_secs
            )));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Config(format!(
                "temperature must be 0.0-2.0, got {}",
                self.temperature
            )));
        }

        if !(1..=32_768).contains(&self.max_tokens) {
            return Err(Error::Config(format!(
                "max_tokens must be 1-32768, got {}",
                self.max_tokens
            )));
        }

        if !(10..=10_000).contains(&self.max_file_lines) {
            return Err(Error::Config(format!(
                "max_file_lines must be 10-10000, got {}",
                self.max_file_lines
            )));
        }

        if self.ollama_host.is_empty() {
            return Err(Error::Config("ollama_host cannot be empty".into()));
        }

        if !self.ollama_host.starts_with("http://") && !self.ollama_host.starts_with("https://") {
            return Err(Error::Config(format!(
                "ollama_host must start with http:// or https://, got '{}'",
                self.ollama_host
            )));
        }

        Ok(())
    }

    /// Create default config file with secure permissions
    pub fn create_default() -> Result<PathBuf> {
        let Some(dir) = Self::config_dir() else {
            return Err(Error::Config("Cannot determine config directory".into()));
        };

        fs::create_dir_all(&dir)?;

        let path = dir.join("config.toml");
        let content = r#"# commitgen configuration

# AI provider: ollama, openai, anthropic, gemini, deepseek, openrouter
provider = "ollama"

# Model name (for Ollama, use `ollama list` to see available;
# for OpenRouter, use vendor/model-name, e.g. "openai/gpt-4o-mini")
model = "qwen2.5:7b"

# Ollama server URL
ollama_host = "http://localhost:11434"

# API key for cloud providers. Falls back to the provider's usual
# environment variable (OPENAI_API_KEY, ANTHROPIC_API_KEY, ...)
# api_key = ""

# Request timeout in seconds
timeout_secs = 60

# Sampling temperature
temperature = 0.7

# Maximum tokens to generate
max_tokens = 500
"#;

        fs::write(&path, content)?;

        // Set secure permissions (0600)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(path)
    }
}
