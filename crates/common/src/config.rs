//! Application and browser configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::types::{Credentials, Scheme};
use crate::wait::WaitOptions;

/// Configuration for the application under test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Host the application is served from
    pub hostname: Option<String>,

    /// Path prefix appended after the host
    pub path: String,

    /// URL scheme
    pub scheme: Scheme,

    /// Login user
    pub username: Option<String>,

    /// Login password
    pub password: Option<String>,

    /// Browser session configuration
    pub browser: BrowserConfig,

    /// Navigation tuning
    pub navigation: NavigationConfig,

    /// REST implementation configuration
    pub rest: RestConfig,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            hostname: None,
            path: String::new(),
            scheme: Scheme::Https,
            username: None,
            password: None,
            browser: BrowserConfig::default(),
            navigation: NavigationConfig::default(),
            rest: RestConfig::default(),
        }
    }
}

/// Which driver backs the browser session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebDriverKind {
    /// A remote WebDriver endpoint (Selenium, geckodriver, chromedriver)
    #[default]
    Remote,
}

/// Browser session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Driver type
    pub webdriver: WebDriverKind,

    /// WebDriver endpoint
    pub url: String,

    /// Requested session capabilities
    pub capabilities: Capabilities,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver: WebDriverKind::Remote,
            url: "http://127.0.0.1:4444".to_string(),
            capabilities: Capabilities::default(),
        }
    }
}

/// WebDriver capabilities requested for a new session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub browser_name: String,
    pub accept_insecure_certs: bool,
    pub marionette: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            browser_name: "firefox".to_string(),
            accept_insecure_certs: true,
            marionette: true,
        }
    }
}

/// Navigation tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Attempts per destination before the last failure is surfaced
    pub tries: usize,

    /// How long to wait for a view to report displayed
    pub wait_timeout_ms: u64,

    /// Delay between presence polls
    pub wait_delay_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            tries: 3,
            wait_timeout_ms: 30_000,
            wait_delay_ms: 500,
        }
    }
}

impl NavigationConfig {
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout: Duration::from_millis(self.wait_timeout_ms),
            delay: Duration::from_millis(self.wait_delay_ms),
        }
    }
}

/// REST implementation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    /// Path (relative to the application address) used to verify credentials
    pub login_path: String,

    /// Per-request timeout
    pub timeout_ms: u64,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            login_path: "api/".to_string(),
            timeout_ms: 30_000,
        }
    }
}

impl ApplicationConfig {
    /// Load configuration from file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `MTNAV_*` overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(hostname) = lookup("MTNAV_HOSTNAME") {
            self.hostname = Some(hostname);
        }
        if let Some(path) = lookup("MTNAV_PATH") {
            self.path = path;
        }
        if let Some(scheme) = lookup("MTNAV_SCHEME") {
            self.scheme = scheme.parse()?;
        }
        if let Some(username) = lookup("MTNAV_USERNAME") {
            self.username = Some(username);
        }
        if let Some(password) = lookup("MTNAV_PASSWORD") {
            self.password = Some(password);
        }
        if let Some(url) = lookup("MTNAV_WEBDRIVER_URL") {
            self.browser.url = url;
        }
        Ok(())
    }

    /// Credentials, when both halves are configured
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(Credentials::new(user.clone(), pass.clone())),
            _ => None,
        }
    }
}
