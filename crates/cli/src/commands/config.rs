//! Configuration management

use anyhow::{bail, Result};
use clap::Subcommand;

use mtnav_common::ApplicationConfig;

use super::GlobalOptions;
use crate::output::{print_success, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration (file, environment and flags)
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

/// Render a configuration without its password
pub fn render(config: &ApplicationConfig, format: OutputFormat) -> Result<String> {
    let mut shown = config.clone();
    if shown.password.is_some() {
        shown.password = Some("<redacted>".to_string());
    }
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&shown)?,
        OutputFormat::Yaml => serde_yaml::to_string(&shown)?,
        OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(&shown)?,
    })
}

pub fn execute(cmd: ConfigCommands, options: &GlobalOptions, format: OutputFormat) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let config = options.load_config()?;
            println!("{}", render(&config, format)?);
        }

        ConfigCommands::Init { force } => {
            let path = options.config_path();
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            ApplicationConfig::default().save(&path)?;
            print_success(&format!("Wrote {}", path.display()));
        }

        ConfigCommands::Path => {
            println!("{}", options.config_path().display());
        }
    }
    Ok(())
}
