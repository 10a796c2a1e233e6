use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Yes/no gate in front of destructive batch operations
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Returns true for `y` or `yes` in any case, ignoring surrounding whitespace
pub fn is_affirmative(response: &str) -> bool {
    let response = response.trim().to_lowercase();
    response == "y" || response == "yes"
}

/// Asks the operator on a terminal (or any reader/writer pair)
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalPrompt<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        write!(self.output, "{} [y/N]: ", question)?;
        self.output.flush()?;

        let mut response = String::new();
        // End of input reads as an empty answer, which declines
        self.input
            .read_line(&mut response)
            .context("Failed to read confirmation from stdin")?;

        Ok(is_affirmative(&response))
    }
}

/// Approves every question, for `--yes`
#[derive(Debug, Default)]
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        tracing::debug!("Auto-confirmed: {}", question);
        Ok(true)
    }
}
