//! Command-line argument parsing for the `pge` binary.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::ComparisonLevel;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Log in; the password is prompted for
    Login { email: String },
    Logout,
    /// Show the user behind the stored token
    WhoAmI,
    Dashboard {
        dependency: Option<i64>,
        month: Option<u32>,
        year: Option<i32>,
    },
    Dependencies,
    Budgets {
        dependency: i64,
        year: Option<i32>,
    },
    /// Raw form input, validated by the budget controller
    BudgetCreate {
        dependency: i64,
        year: String,
        quarter: String,
        amount: String,
    },
    Upload { path: PathBuf },
    Public {
        level: ComparisonLevel,
        year: Option<i32>,
        sector: Option<i64>,
        dependency: Option<i64>,
    },
    Projection(PredictionArgs),
    Strategy(PredictionArgs),
}

/// Flags shared by `projection` and `strategy`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PredictionArgs {
    pub months: Option<u32>,
    pub history: bool,
    pub dependency: Option<i64>,
}

/// Error type for argument parsing.
#[derive(Debug, Error, PartialEq)]
pub enum ArgsError {
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("Unknown option '{option}' for '{command}'")]
    UnknownOption { command: String, option: String },

    #[error("Missing {0}")]
    Missing(&'static str),

    #[error("Option '{0}' needs a value")]
    MissingValue(String),

    #[error("Invalid value '{value}' for {name}")]
    InvalidValue { name: String, value: String },

    #[error("Unexpected argument '{0}'")]
    Unexpected(String),
}

pub const USAGE: &str = "\
Usage: pge <command> [options]

Commands:
  login <email>                         Sign in (password is prompted)
  logout                                Forget the stored session
  whoami                                Show the signed-in user
  dashboard [--dependency N] [--month M] [--year Y]
  dependencies                          List your dependencies
  budgets <dependency-id> [--year Y]    Budgets of one year, with total and average
  budget-create <dependency-id> <year> <quarter-label> <amount>
  upload <file.csv>                     Bulk consumption import
  public [--level sectors|dependencies|buildings] [--year Y] [--sector N] [--dependency N]
  projection [--months N] [--history] [--dependency N]
  strategy [--months N] [--history] [--dependency N]
  help, --help, -h
  --version, -V

Environment:
  PGE_API_URL, PGE_ANALYTICS_URL, PGE_HOST_OVERRIDE, PGE_TIMEOUT_SECS,
  PGE_TOKEN_PATH, PGE_LOG";

/// Parse command-line arguments (program name first) into a command.
///
/// No arguments at all means [`CliCommand::Help`].
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut args = args.skip(1);
    let command = match args.next() {
        Some(command) => command,
        None => return Ok(CliCommand::Help),
    };
    let rest: Vec<String> = args.collect();
    let mut rest = rest.into_iter();

    let parsed = match command.as_str() {
        "--version" | "-V" | "version" => CliCommand::Version,
        "--help" | "-h" | "help" => CliCommand::Help,
        "login" => CliCommand::Login {
            email: rest.next().ok_or(ArgsError::Missing("email"))?,
        },
        "logout" => CliCommand::Logout,
        "whoami" => CliCommand::WhoAmI,
        "dependencies" => CliCommand::Dependencies,
        "dashboard" => {
            let mut dependency = None;
            let mut month = None;
            let mut year = None;
            while let Some(flag) = rest.next() {
                match flag.as_str() {
                    "--dependency" => dependency = Some(value(&mut rest, &flag)?),
                    "--month" => month = Some(value(&mut rest, &flag)?),
                    "--year" => year = Some(value(&mut rest, &flag)?),
                    _ => return Err(unknown_option(&command, flag)),
                }
            }
            CliCommand::Dashboard {
                dependency,
                month,
                year,
            }
        }
        "budgets" => {
            let dependency = positional(&mut rest, "dependency id")?;
            let mut year = None;
            while let Some(flag) = rest.next() {
                match flag.as_str() {
                    "--year" => year = Some(value(&mut rest, &flag)?),
                    _ => return Err(unknown_option(&command, flag)),
                }
            }
            CliCommand::Budgets { dependency, year }
        }
        "budget-create" => CliCommand::BudgetCreate {
            dependency: positional(&mut rest, "dependency id")?,
            year: rest.next().ok_or(ArgsError::Missing("year"))?,
            quarter: rest.next().ok_or(ArgsError::Missing("quarter label"))?,
            amount: rest.next().ok_or(ArgsError::Missing("amount"))?,
        },
        "upload" => CliCommand::Upload {
            path: rest.next().map(PathBuf::from).ok_or(ArgsError::Missing("file"))?,
        },
        "public" => {
            let mut level = ComparisonLevel::default();
            let mut year = None;
            let mut sector = None;
            let mut dependency = None;
            while let Some(flag) = rest.next() {
                match flag.as_str() {
                    "--level" => {
                        let raw = rest.next().ok_or_else(|| ArgsError::MissingValue(flag.clone()))?;
                        level = ComparisonLevel::parse(&raw).ok_or(ArgsError::InvalidValue {
                            name: flag.clone(),
                            value: raw,
                        })?;
                    }
                    "--year" => year = Some(value(&mut rest, &flag)?),
                    "--sector" => sector = Some(value(&mut rest, &flag)?),
                    "--dependency" => dependency = Some(value(&mut rest, &flag)?),
                    _ => return Err(unknown_option(&command, flag)),
                }
            }
            CliCommand::Public {
                level,
                year,
                sector,
                dependency,
            }
        }
        "projection" => CliCommand::Projection(prediction_args(&command, &mut rest)?),
        "strategy" => CliCommand::Strategy(prediction_args(&command, &mut rest)?),
        _ => return Err(ArgsError::UnknownCommand(command)),
    };

    match rest.next() {
        Some(extra) => Err(ArgsError::Unexpected(extra)),
        None => Ok(parsed),
    }
}

fn prediction_args<I>(command: &str, rest: &mut I) -> Result<PredictionArgs, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut parsed = PredictionArgs::default();
    while let Some(flag) = rest.next() {
        match flag.as_str() {
            "--months" => parsed.months = Some(value(rest, &flag)?),
            "--history" => parsed.history = true,
            "--dependency" => parsed.dependency = Some(value(rest, &flag)?),
            _ => return Err(unknown_option(command, flag)),
        }
    }
    Ok(parsed)
}

/// Value following `flag`, parsed.
fn value<T, I>(rest: &mut I, flag: &str) -> Result<T, ArgsError>
where
    T: std::str::FromStr,
    I: Iterator<Item = String>,
{
    let raw = rest
        .next()
        .ok_or_else(|| ArgsError::MissingValue(flag.to_string()))?;
    raw.parse().map_err(|_| ArgsError::InvalidValue {
        name: flag.to_string(),
        value: raw,
    })
}

fn positional<T, I>(rest: &mut I, name: &'static str) -> Result<T, ArgsError>
where
    T: std::str::FromStr,
    I: Iterator<Item = String>,
{
    let raw = rest.next().ok_or(ArgsError::Missing(name))?;
    raw.parse().map_err(|_| ArgsError::InvalidValue {
        name: name.to_string(),
        value: raw,
    })
}

fn unknown_option(command: &str, option: String) -> ArgsError {
    ArgsError::UnknownOption {
        command: command.to_string(),
        option,
    }
}
