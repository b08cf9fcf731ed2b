// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

// miette's Diagnostic derive generates code that triggers this false positive
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("No staged changes found")]
    #[diagnostic(
        code(commitgen::git::no_staged),
        help("Stage files with: git add <files>")
    )]
    NoStagedChanges,

    #[error("Not a git repository")]
    #[diagnostic(
        code(commitgen::git::not_repo),
        help("Run this command inside a git repository")
    )]
    NotAGitRepo,

    #[error("Merge in progress")]
    #[diagnostic(
        code(commitgen::git::merge),
        help("Complete or abort the merge: git merge --abort")
    )]
    MergeInProgress,

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error("Cannot connect to Ollama at {host}")]
    #[diagnostic(
        code(commitgen::ollama::not_running),
        help("Start Ollama with: ollama serve")
    )]
    OllamaNotRunning { host: String },

    #[error("{provider} API error (401 Unauthorized): {message}. Get your API key at: {key_url}")]
    #[diagnostic(
        code(commitgen::provider::unauthorized),
        help("Export the key, e.g.: export {env_var}=\"...\"")
    )]
    Unauthorized {
        provider: String,
        message: String,
        key_url: String,
        env_var: String,
    },

    #[error("{provider} API error (429 Rate Limit): {message}")]
    #[diagnostic(
        code(commitgen::provider::rate_limited),
        help("Rate limit exceeded. Try again later; requests are never retried automatically")
    )]
    RateLimited { provider: String, message: String },

    #[error("{provider} API error (503 Service Unavailable): {message}. Try an alternative provider: {}", alternatives.join(", "))]
    #[diagnostic(
        code(commitgen::provider::unavailable),
        help("Pass --provider <name> to switch backends")
    )]
    Unavailable {
        provider: String,
        message: String,
        alternatives: Vec<String>,
    },

    #[error("{provider} API error ({status}): {message}")]
    #[diagnostic(code(commitgen::provider::error))]
    Provider {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("{provider} network error: {message}")]
    #[diagnostic(code(commitgen::provider::network))]
    Network { provider: String, message: String },

    #[error("{provider} request timed out after {secs}s")]
    #[diagnostic(
        code(commitgen::provider::timeout),
        help("Increase timeout_secs in the config if the backend is just slow")
    )]
    Timeout { provider: String, secs: u64 },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(commitgen::config::error))]
    Config(String),

    #[error("Git error: {0}")]
    #[diagnostic(code(commitgen::git::error))]
    Git(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        Error::Dialog(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
