//! Command-line argument parsing.
//!
//! Hand-rolled: there are only a few flags and no subcommands.

use std::fmt;
use std::path::PathBuf;

pub const USAGE: &str =
    "usage: pseudocode [--show-ast] [--show-st] [--config <file.toml>] <program.json>";

/// Parsed command-line options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// JSON-serialized program tree
    pub input: PathBuf,
    /// Print the syntax tree dump
    pub show_ast: bool,
    /// Print the symbol table dump
    pub show_st: bool,
    /// Analyzer settings file
    pub config: Option<PathBuf>,
}

/// What the command line asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Options),
    PrintHelp,
}

/// Malformed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    MissingInput,
    MissingValue(&'static str),
    UnknownFlag(String),
    UnexpectedArgument(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingInput => f.write_str("no input file given"),
            ArgsError::MissingValue(flag) => write!(f, "{flag} expects a value"),
            ArgsError::UnknownFlag(flag) => write!(f, "unknown flag '{flag}'"),
            ArgsError::UnexpectedArgument(arg) => write!(f, "unexpected argument '{arg}'"),
        }
    }
}

impl std::error::Error for ArgsError {}

/// Parse the arguments following the program name.
pub fn parse_args<I>(args: I) -> Result<Command, ArgsError>
where
    I: IntoIterator<Item = String>,
{
    let mut options = Options::default();
    let mut input = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::PrintHelp),
            "--show-ast" => options.show_ast = true,
            "--show-st" => options.show_st = true,
            "--config" => {
                let path = args.next().ok_or(ArgsError::MissingValue("--config"))?;
                options.config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => return Err(ArgsError::UnknownFlag(flag.to_string())),
            other if input.is_some() => {
                return Err(ArgsError::UnexpectedArgument(other.to_string()))
            }
            other => input = Some(PathBuf::from(other)),
        }
    }

    options.input = input.ok_or(ArgsError::MissingInput)?;
    Ok(Command::Run(options))
}
