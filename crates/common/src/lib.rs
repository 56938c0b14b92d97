//! mtnav Common Library
//!
//! Shared error taxonomy, configuration and small utilities used by the
//! navigation core and the application implementations.

pub mod config;
pub mod error;
pub mod types;
pub mod wait;

// Re-export commonly used types
pub use config::{
    ApplicationConfig, BrowserConfig, Capabilities, NavigationConfig, RestConfig, WebDriverKind,
};
pub use error::{Error, ErrorKind, Result};
pub use types::{Credentials, Scheme};
pub use wait::{wait_for, WaitOptions};

/// mtnav version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file path
pub fn default_config_path() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".mtnav")
        .join("config.toml")
}

/// Home directory helper
mod dirs {
    pub fn home_dir() -> Option<std::path::PathBuf> {
        std::env::var_os("HOME").map(std::path::PathBuf::from)
    }
}
