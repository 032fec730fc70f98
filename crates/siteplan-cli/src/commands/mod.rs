//! Command implementations

mod chat;
mod config;
mod inspect;
mod select;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use siteplan_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::Path;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    let model = match &cli.command {
        Commands::Chat(args) => args.model.clone(),
        _ => None,
    };
    let config = load_config(cli.config.as_deref(), cli.data, model)?;

    match cli.command {
        Commands::Inspect => inspect::execute(&config, &output).await,
        Commands::Select(args) => select::execute(args, &config, &output).await,
        Commands::Chat(args) => chat::execute(args, &config, &output).await,
        Commands::Config => config::execute(&config, &output),
    }
}

/// Defaults, then the config file, then the environment, then flags
fn load_config(
    file: Option<&Path>,
    data_path: Option<std::path::PathBuf>,
    model: Option<String>,
) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();
    if let Some(path) = file {
        config = config
            .load_from_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(CliConfigOverrides { data_path, model });

    Ok(config)
}
