mod cli;
mod commands;
mod config;
mod github;
mod prompt;
mod title;

use anyhow::Result;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli::args::{ParseError, ParsedCommand, Parser};
use cli::flags::{self, FlagRegistry};
use cli::CommandDispatcher;
use commands::Outcome;
use config::Config;

/// Exit status for failures while talking to gh or loading configuration
const EXIT_FAILURE: u8 = 1;
/// Exit status for malformed command lines
const EXIT_USAGE: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let registry = FlagRegistry::default();
    let program = program_name(&args);

    if let Some(text) = special_command(&registry, &args, &program) {
        print!("{}", text);
        return ExitCode::SUCCESS;
    }

    let command = match parse_command(&registry, &args) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("Error: could not parse command line arguments: {}", err);
            eprintln!();
            eprint!("{}", registry.usage(&program));
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let config = match load_config(&command) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    init_logging(command.is_set(flags::VERBOSE) || config.behavior.verbose);
    tracing::debug!(
        "Migrating from {} to {} with flags {:?}",
        command.origin,
        command.destination,
        command.flags
    );

    let result = CommandDispatcher::new(config).dispatch(&command).await;
    match &result {
        Ok(Outcome::Aborted(message)) => tracing::info!("{}", message),
        Ok(Outcome::DryRun) => tracing::info!("Dry run finished, nothing was changed"),
        Ok(Outcome::Migrated(count)) => {
            tracing::debug!("Run complete after {} transfers", count)
        }
        Ok(Outcome::NothingToMigrate) => {}
        Err(err) => tracing::error!("{:#}", err),
    }

    ExitCode::from(exit_status(&result))
}

/// Text for `--help` or `--version`, which win over everything else on the line
fn special_command(registry: &FlagRegistry, args: &[String], program: &str) -> Option<String> {
    if registry.mentions(args, flags::HELP) {
        return Some(registry.usage(program));
    }

    if registry.mentions(args, flags::VERSION) {
        return Some(format!(
            "{} {}\n",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ));
    }

    None
}

/// Parse arguments and validate flag values that need more than presence
fn parse_command(registry: &FlagRegistry, args: &[String]) -> Result<ParsedCommand, ParseError> {
    let command = Parser::new(registry).parse(args)?;
    command.limit()?;
    Ok(command)
}

/// Load configuration from `--config`, or from the standard config paths
fn load_config(command: &ParsedCommand) -> Result<Config> {
    match command.config_path() {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "shepherd=debug"
    } else {
        "shepherd=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_status(result: &Result<Outcome>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(err) if err.downcast_ref::<ParseError>().is_some() => EXIT_USAGE,
        Err(_) => EXIT_FAILURE,
    }
}

fn program_name(args: &[String]) -> String {
    args.first()
        .and_then(|arg| Path::new(arg).file_name())
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}
