//! CLI module graph and command dispatch.

pub mod analyze;
pub mod command;
pub mod config;
pub mod context;
pub mod diagnostic;
pub mod export;
pub mod models;
pub mod output;
pub mod paths;
pub mod providers;
pub mod recommend;
pub mod render;
pub mod values;

use command::{Commands, ConfigCommand};

use crate::error::Result;

/// Run one parsed subcommand.
#[allow(clippy::result_large_err)]
pub fn execute(command: &Commands) -> Result<()> {
    match command {
        Commands::Analyze(args) => analyze::execute(args),
        Commands::Recommend(args) => recommend::execute(args),
        Commands::Export(args) => export::execute(args),
        Commands::Values(args) => values::execute(args),
        Commands::Providers(args) => providers::execute(args),
        Commands::Models(args) => models::execute(args),
        Commands::Config(ConfigCommand::Init(args)) => config::execute_init(&args.path, args.force),
        Commands::Config(ConfigCommand::Show(args)) => config::execute_show(args),
        Commands::Config(ConfigCommand::Validate(args)) => config::execute_validate(&args.config),
    }
}
