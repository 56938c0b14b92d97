//! CLI Commands

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

use mtnav_app::{Application, Registry};
use mtnav_common::{default_config_path, ApplicationConfig, Scheme};
use mtnav_navigate::NavArgs;

pub mod call;
pub mod config;
pub mod destinations;
pub mod navigate;

/// Flags shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub hostname: Option<String>,
    pub scheme: Option<Scheme>,
}

impl GlobalOptions {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }

    /// Configuration file, then `MTNAV_*` environment, then flags
    pub fn load_config(&self) -> Result<ApplicationConfig> {
        let path = self.config_path();
        let mut config = ApplicationConfig::load(&path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        config.apply_env()?;
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut ApplicationConfig) {
        if let Some(hostname) = &self.hostname {
            config.hostname = Some(hostname.clone());
        }
        if let Some(scheme) = self.scheme {
            config.scheme = scheme;
        }
    }
}

/// Build the application against the standard registry
pub fn connect(config: &ApplicationConfig) -> Result<Application> {
    let registry = Arc::new(Registry::standard()?);
    let app = Application::new(config, registry).context("failed to set up application")?;
    Ok(app)
}

/// clap value parser for `key=value` arguments
pub fn parse_nav_arg(pair: &str) -> std::result::Result<(String, Value), String> {
    NavArgs::parse_pair(pair).ok_or_else(|| format!("expected key=value, got '{pair}'"))
}
