// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::io::IsTerminal;

use console::style;
use dialoguer::Confirm;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::services::git::GitService;
use crate::services::providers::{
    self,
    registry::{ProviderRegistry, SystemEnvironment},
};

pub struct App {
    cli: Cli,
    config: Config,
    cancel_token: CancellationToken,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        let config = Config::load(&cli)?;
        debug!(
            provider = %config.provider,
            model = %config.model,
            timeout_secs = config.timeout_secs,
            "config loaded"
        );
        Ok(Self {
            cli,
            config,
            cancel_token: CancellationToken::new(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Ctrl+C drives the cancellation token
        let cancel = self.cancel_token.clone();
        tokio::spawn(async move {
            signal::ctrl_c().await.ok();
            cancel.cancel();
        });

        if let Some(ref cmd) = self.cli.command {
            return self.handle_command(cmd);
        }

        self.generate_commit().await
    }

    fn handle_command(&self, cmd: &Commands) -> Result<()> {
        match cmd {
            Commands::Init => {
                let path = Config::create_default()?;
                println!("Config written to {}", path.display());
                Ok(())
            }
            Commands::Config => {
                let rendered = toml::to_string_pretty(&self.config)
                    .map_err(|e| Error::Config(e.to_string()))?;
                println!("{rendered}");
                Ok(())
            }
            Commands::Providers => {
                let env = SystemEnvironment;
                for info in ProviderRegistry::list_providers(&env) {
                    let status = if info.configured {
                        style("configured").green()
                    } else {
                        style("not configured").dim()
                    };
                    println!("{:<12} {:<16} {}", info.name, status, info.description);
                    println!("             models: {}", info.models.join(", "));
                }
                Ok(())
            }
        }
    }

    async fn generate_commit(&mut self) -> Result<()> {
        if self.cancel_token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        self.print_status("Analyzing staged changes...");

        let git = GitService::discover()?;
        let diff = git.staged_diff(self.config.max_file_lines)?;

        self.print_info(&format!(
            "{} files with changes detected (+{} -{})",
            diff.files.len(),
            diff.total_additions,
            diff.total_deletions
        ));

        let provider = providers::create_provider(&self.config)?;

        let config_errors = provider.validate_config();
        if !config_errors.is_empty() {
            for err in &config_errors {
                eprintln!("{} {}", style("error:").red(), err);
            }
            return Err(Error::Config(format!(
                "{} is not ready: {}",
                provider.name(),
                config_errors.join("; ")
            )));
        }

        if self.cli.show_prompt {
            eprintln!("{}", style("--- PROMPT ---").dim());
            eprintln!("{}", crate::services::prompt::for_diff(&diff));
            eprintln!("{}", style("--- END PROMPT ---").dim());
        }

        self.print_status(&format!(
            "Contacting {} ({})...",
            self.config.provider, self.config.model
        ));

        let message = tokio::select! {
            _ = self.cancel_token.cancelled() => return Err(Error::Cancelled),
            result = provider.generate_commit_message(&diff) => result?,
        };

        let rendered = message.render();

        println!("\n{rendered}\n");

        if self.cli.dry_run {
            return Ok(());
        }

        let interactive = std::io::stdout().is_terminal() && std::io::stdin().is_terminal();

        // Never commit behind the user's back when there is no terminal to
        // confirm on
        if !interactive && !self.cli.yes {
            self.print_info(
                "Not committing in non-interactive mode. Use --yes to auto-confirm in scripts/hooks.",
            );
            return Ok(());
        }

        let confirmed = self.cli.yes
            || Confirm::new()
                .with_prompt("Commit with this message?")
                .default(true)
                .interact()?;

        if !confirmed {
            return Err(Error::Cancelled);
        }

        git.commit(&rendered)?;
        self.print_info("Committed.");

        Ok(())
    }

    fn print_status(&self, msg: &str) {
        eprintln!("{} {}", style("::").cyan(), msg);
    }

    fn print_info(&self, msg: &str) {
        eprintln!("{} {}", style("info:").cyan(), msg);
    }
}
