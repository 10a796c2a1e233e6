pub mod args;
pub mod flags;

use crate::commands::{MigrateCommand, Outcome};
use crate::config::Config;
use crate::github::GhCli;
use crate::prompt::{AutoConfirm, Confirm, TerminalPrompt};
use anyhow::{bail, Result};
use args::{MigrateArgs, ParsedCommand};

/// Routes a parsed command line to the migration workflow
pub struct CommandDispatcher {
    config: Config,
}

impl CommandDispatcher {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn dispatch(&self, command: &ParsedCommand) -> Result<Outcome> {
        let tracker = self.tracker(command)?;
        let mut confirm = self.confirmer(command);

        MigrateCommand::new(MigrateArgs::from(command))
            .execute(&tracker, confirm.as_mut())
            .await
    }

    /// Build the gh client, letting `--limit` override the configured limit
    fn tracker(&self, command: &ParsedCommand) -> Result<GhCli> {
        let limit = match command.limit()? {
            Some(limit) => limit,
            None if self.config.github.issue_limit == 0 => {
                bail!("invalid configuration: github.issue_limit must be greater than 0")
            }
            None => self.config.github.issue_limit,
        };

        Ok(GhCli::new(self.config.github.binary.clone(), limit))
    }

    fn confirmer(&self, command: &ParsedCommand) -> Box<dyn Confirm> {
        if self.skips_confirmation(command) {
            Box::new(AutoConfirm)
        } else {
            Box::new(TerminalPrompt::stdio())
        }
    }

    fn skips_confirmation(&self, command: &ParsedCommand) -> bool {
        command.is_set(flags::YES) || self.config.behavior.no_confirm
    }
}
