/// Canonical name of the title prefix flag
pub const MODIFY_PREPEND: &str = "modify-prepend";
pub const LIMIT: &str = "limit";
pub const CONFIG: &str = "config";
pub const YES: &str = "yes";
pub const DRY_RUN: &str = "dry-run";
pub const VERBOSE: &str = "verbose";
pub const HELP: &str = "help";
pub const VERSION: &str = "version";

/// Marker that distinguishes a flag token from a positional argument
pub const FLAG_MARKER: char = '-';

/// Static description of a recognized flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    /// Long name without the leading dashes
    pub name: &'static str,
    /// Short alias without the leading dash
    pub short: Option<&'static str>,
    pub requires_value: bool,
    pub description: &'static str,
}

/// Every flag shepherd understands
pub const FLAGS: &[FlagSpec] = &[
    FlagSpec {
        name: MODIFY_PREPEND,
        short: Some("p"),
        requires_value: true,
        description: "Replace (or add) the label before the first `:` of every issue title",
    },
    FlagSpec {
        name: LIMIT,
        short: Some("l"),
        requires_value: true,
        description: "Maximum number of open issues to fetch from the origin",
    },
    FlagSpec {
        name: CONFIG,
        short: Some("c"),
        requires_value: true,
        description: "Read configuration from this file",
    },
    FlagSpec {
        name: YES,
        short: Some("y"),
        requires_value: false,
        description: "Answer yes to every confirmation prompt",
    },
    FlagSpec {
        name: DRY_RUN,
        short: Some("n"),
        requires_value: false,
        description: "Show what would be changed without editing or transferring",
    },
    FlagSpec {
        name: VERBOSE,
        short: Some("v"),
        requires_value: false,
        description: "Show verbose output for debugging",
    },
    FlagSpec {
        name: HELP,
        short: Some("h"),
        requires_value: false,
        description: "Print this help",
    },
    FlagSpec {
        name: VERSION,
        short: Some("V"),
        requires_value: false,
        description: "Print version",
    },
];

/// Returns true if the token should be read as a flag rather than a positional
pub fn is_flag_token(token: &str) -> bool {
    token.starts_with(FLAG_MARKER)
}

/// Read-only lookup table over a set of flag specs
#[derive(Debug, Clone, Copy)]
pub struct FlagRegistry {
    specs: &'static [FlagSpec],
}

impl Default for FlagRegistry {
    fn default() -> Self {
        Self::new(FLAGS)
    }
}

impl FlagRegistry {
    pub const fn new(specs: &'static [FlagSpec]) -> Self {
        Self { specs }
    }

    /// Resolve a raw token (`--name` or `-s`) to its spec
    pub fn lookup(&self, token: &str) -> Option<&'static FlagSpec> {
        if let Some(long) = token.strip_prefix("--") {
            return self.specs.iter().find(|spec| spec.name == long);
        }

        let short = token.strip_prefix(FLAG_MARKER)?;
        self.specs.iter().find(|spec| spec.short == Some(short))
    }

    /// True when any token after the program name spells the named flag
    pub fn mentions<S: AsRef<str>>(&self, args: &[S], name: &str) -> bool {
        args.iter()
            .skip(1)
            .filter_map(|arg| self.lookup(arg.as_ref()))
            .any(|spec| spec.name == name)
    }

    /// Render the usage text shown by `--help` and after parse errors
    pub fn usage(&self, program: &str) -> String {
        let mut usage = format!(
            "Usage: {} <origin-repo> <destination-repo> [flags...]\n\nFlags:\n",
            program
        );

        for spec in self.specs {
            let mut spelling = match spec.short {
                Some(short) => format!("-{}, --{}", short, spec.name),
                None => format!("    --{}", spec.name),
            };
            if spec.requires_value {
                spelling.push_str(" <value>");
            }
            usage.push_str(&format!("  {:<32} {}\n", spelling, spec.description));
        }

        usage
    }
}
