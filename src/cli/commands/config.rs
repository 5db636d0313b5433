use crate::cli::formatter::print_success;
use crate::core::config::{load_or_default, save_config, Config};
use crate::core::paths;
use anyhow::Context;
use clap::{Args, Subcommand};
use std::path::Path;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: ConfigArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommands::Show => {
            let config = load_or_default(config_path)?;
            let rendered =
                toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
            print!("{}", rendered);
        }
        ConfigCommands::Init { force } => {
            let path = config_path
                .map(Path::to_path_buf)
                .unwrap_or_else(paths::default_config_path);
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists; use --force to overwrite it",
                    path.display()
                );
            }
            save_config(&path, &Config::default())?;
            print_success(&format!("Wrote default configuration to {}", path.display()));
        }
    }
    Ok(())
}
