//! CLI module for pge.
//!
//! This module provides the command-line front end over the state
//! controllers:
//! - Argument parsing
//! - Version display
//! - One handler per command, printing the resulting state
//!
//! # Usage
//!
//! ```ignore
//! use pge_client::cli::{parse_args, run_cli_command};
//! use pge_client::config::ClientConfig;
//!
//! let command = parse_args(std::env::args())?;
//! let config = ClientConfig::from_env()?;
//! run_cli_command(command, &config, &CancellationToken::new()).await?;
//! ```

pub mod args;
mod commands;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, PredictionArgs, USAGE};
pub use version::{handle_version_command, VERSION};

use color_eyre::Result;
use tokio_util::sync::CancellationToken;

use crate::api::ApiClients;
use crate::config::ClientConfig;
use crate::models::DashboardQuery;
use crate::repository::Repositories;

/// Run a parsed command against the backends described by `config`.
///
/// `Version` and `Help` never touch the network.
pub async fn run_cli_command(
    command: CliCommand,
    config: &ClientConfig,
    cancel: &CancellationToken,
) -> Result<()> {
    let repos = match command {
        CliCommand::Version => {
            handle_version_command();
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        _ => Repositories::new(&ApiClients::from_config(config)?),
    };

    match command {
        CliCommand::Version | CliCommand::Help => Ok(()),
        CliCommand::Login { email } => commands::login(&repos, &email, cancel).await,
        CliCommand::Logout => commands::logout(&repos).await,
        CliCommand::WhoAmI => commands::whoami(&repos, cancel).await,
        CliCommand::Dashboard {
            dependency,
            month,
            year,
        } => {
            let query = DashboardQuery::new()
                .with_dependency(dependency)
                .with_month(month)
                .with_year(year);
            commands::dashboard(&repos, query, cancel).await
        }
        CliCommand::Dependencies => commands::dependencies(&repos, cancel).await,
        CliCommand::Budgets { dependency, year } => {
            commands::budgets(&repos, dependency, year, cancel).await
        }
        CliCommand::BudgetCreate {
            dependency,
            year,
            quarter,
            amount,
        } => commands::create_budget(&repos, dependency, &year, &quarter, &amount, cancel).await,
        CliCommand::Upload { path } => commands::upload(&repos, &path, cancel).await,
        CliCommand::Public {
            level,
            year,
            sector,
            dependency,
        } => commands::public(&repos, level, year, sector, dependency, cancel).await,
        CliCommand::Projection(args) => commands::projection(&repos, args, cancel).await,
        CliCommand::Strategy(args) => commands::strategy(&repos, args, cancel).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_help_needs_no_backend() {
        let config = ClientConfig::default().with_api_base_url("http://127.0.0.1:9");
        let result = run_cli_command(CliCommand::Help, &config, &CancellationToken::new()).await;
        assert!(result.is_ok());
    }
}
