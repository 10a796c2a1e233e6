use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use super::flags::{self, is_flag_token, FlagRegistry};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing argument for origin repository")]
    MissingOrigin,

    #[error("missing argument for destination repository")]
    MissingDestination,

    #[error("unknown flag {0} passed")]
    UnknownFlag(String),

    #[error("missing value for flag {0}")]
    MissingFlagValue(String),

    #[error("unexpected argument {0}")]
    UnexpectedArgument(String),

    #[error("invalid value {value:?} for flag --{flag}")]
    InvalidFlagValue { flag: String, value: String },
}

/// Repositories and flags given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Repository issues are migrated from
    pub origin: String,
    /// Repository issues are migrated to
    pub destination: String,
    /// Canonical flag name to value; boolean flags hold "true"
    pub flags: HashMap<String, String>,
}

impl ParsedCommand {
    pub fn modify_prepend(&self) -> Option<&str> {
        self.flags.get(flags::MODIFY_PREPEND).map(String::as_str)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.flags.get(flags::CONFIG).map(Path::new)
    }

    /// Issue limit from `--limit`, if given
    pub fn limit(&self) -> Result<Option<u32>, ParseError> {
        let Some(value) = self.flags.get(flags::LIMIT) else {
            return Ok(None);
        };

        match value.parse::<u32>() {
            Ok(limit) if limit > 0 => Ok(Some(limit)),
            _ => Err(ParseError::InvalidFlagValue {
                flag: flags::LIMIT.to_string(),
                value: value.clone(),
            }),
        }
    }
}

/// Arguments specific to the migrate command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateArgs {
    pub origin: String,
    pub destination: String,
    /// New label for every issue title, if relabelling was requested
    pub prepend: Option<String>,
    pub dry_run: bool,
}

impl From<&ParsedCommand> for MigrateArgs {
    fn from(command: &ParsedCommand) -> Self {
        Self {
            origin: command.origin.clone(),
            destination: command.destination.clone(),
            prepend: command.modify_prepend().map(str::to_string),
            dry_run: command.is_set(flags::DRY_RUN),
        }
    }
}

/// Parses raw arguments against a flag registry
pub struct Parser<'a> {
    registry: &'a FlagRegistry,
}

impl<'a> Parser<'a> {
    pub fn new(registry: &'a FlagRegistry) -> Self {
        Self { registry }
    }

    /// Parse the full argument list, program token included
    pub fn parse<S: AsRef<str>>(&self, args: &[S]) -> Result<ParsedCommand, ParseError> {
        let args: Vec<&str> = args.iter().map(|arg| arg.as_ref()).collect();

        let (origin, destination) = self.positionals(&args)?;
        let flags = self.parse_flags(&args[3..])?;

        Ok(ParsedCommand {
            origin: origin.to_string(),
            destination: destination.to_string(),
            flags,
        })
    }

    /// Origin and destination, checked by arity first. A registered flag in
    /// either slot counts as that positional missing; an unregistered one is
    /// an unknown flag.
    fn positionals<'t>(&self, args: &[&'t str]) -> Result<(&'t str, &'t str), ParseError> {
        if args.len() < 2 {
            return Err(ParseError::MissingOrigin);
        }
        if args.len() < 3 {
            return Err(ParseError::MissingDestination);
        }

        let origin = self.positional(args[1], ParseError::MissingOrigin)?;
        let destination = self.positional(args[2], ParseError::MissingDestination)?;
        Ok((origin, destination))
    }

    fn positional<'t>(&self, token: &'t str, missing: ParseError) -> Result<&'t str, ParseError> {
        if !is_flag_token(token) {
            return Ok(token);
        }
        match self.registry.lookup(token) {
            Some(_) => Err(missing),
            None => Err(ParseError::UnknownFlag(token.to_string())),
        }
    }

    /// Walk the tokens after the positionals, consuming a value after each
    /// flag that requires one
    fn parse_flags(&self, tokens: &[&str]) -> Result<HashMap<String, String>, ParseError> {
        let mut flags = HashMap::new();
        let mut tokens = tokens.iter();

        while let Some(&token) = tokens.next() {
            if !is_flag_token(token) {
                return Err(ParseError::UnexpectedArgument(token.to_string()));
            }

            let spec = self
                .registry
                .lookup(token)
                .ok_or_else(|| ParseError::UnknownFlag(token.to_string()))?;

            let value = if spec.requires_value {
                match tokens.next() {
                    Some(&value) if !is_flag_token(value) => value.to_string(),
                    _ => return Err(ParseError::MissingFlagValue(token.to_string())),
                }
            } else {
                "true".to_string()
            };

            flags.insert(spec.name.to_string(), value);
        }

        Ok(flags)
    }
}

/// Parse with the built-in flag registry
#[cfg(test)]
pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<ParsedCommand, ParseError> {
    Parser::new(&FlagRegistry::default()).parse(args)
}
