// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "commitgen")]
#[command(version)]
#[command(about = "AI-powered conventional commit message generator", long_about = None)]
pub struct Cli {
    /// AI provider (ollama, openai, anthropic, gemini, deepseek, openrouter)
    #[arg(short, long, env = "COMMITGEN_PROVIDER")]
    pub provider: Option<String>,

    /// Model name (for openrouter: vendor/model-name)
    #[arg(short, long, env = "COMMITGEN_MODEL")]
    pub model: Option<String>,

    /// Auto-confirm and commit without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Print message only, don't commit
    #[arg(long)]
    pub dry_run: bool,

    /// Show the prompt sent to the provider
    #[arg(long)]
    pub show_prompt: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Initialize config file
    Init,
    /// Show current configuration
    Config,
    /// List known providers and their configuration status
    Providers,
}
