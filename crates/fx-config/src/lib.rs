//! Configuration management for fxchangelog.
//!
//! Parses an optional `fxchangelog.toml` with serde and provides
//! auto-discovery of the file in parent directories. Every value can also
//! be supplied on the command line via [`CliSettings`], which take
//! precedence over the file.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `confluence.base_url`
//! - `confluence.email`
//! - `confluence.api_token`
//! - `monitor.include`
//! - `monitor.exclude`
//! - `monitor.log_page`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "fxchangelog.toml";

/// Confluence Cloud site the tool was written for.
pub const DEFAULT_BASE_URL: &str = "https://factory-x.atlassian.net/wiki";

/// Versions requested per call to the version history endpoint.
pub const DEFAULT_VERSION_PAGE_SIZE: usize = 500;

/// Children requested per call to the child page endpoint.
pub const DEFAULT_CHILD_PAGE_SIZE: usize = 50;

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Confluence base URL.
    pub base_url: Option<String>,
    /// Override account email.
    pub email: Option<String>,
    /// Override API token.
    pub api_token: Option<String>,
    /// Override include root page ID.
    pub include: Option<String>,
    /// Override exclude root page ID.
    pub exclude: Option<String>,
    /// Override log page ID.
    pub log_page: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Confluence connection settings.
    pub confluence: ConfluenceConfig,
    /// Page tree monitoring settings.
    pub monitor: MonitorConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Confluence connection configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConfluenceConfig {
    /// Confluence base URL (including the `/wiki` context path on Cloud).
    pub base_url: String,
    /// Account email used for Basic authentication.
    pub email: String,
    /// API token used for Basic authentication.
    pub api_token: String,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ConfluenceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            email: String::new(),
            api_token: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ConfluenceConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "confluence.base_url")?;
        require_http_url(&self.base_url, "confluence.base_url")?;
        require_non_empty(&self.email, "confluence.email")?;
        require_non_empty(&self.api_token, "confluence.api_token")?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "confluence.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Page tree monitoring configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Root page whose descendants are monitored.
    pub include: String,
    /// Root page whose descendants are removed from monitoring.
    pub exclude: Option<String>,
    /// Page that receives the change log table.
    pub log_page: String,
    /// Page size for version history requests.
    pub version_page_size: usize,
    /// Page size for child page requests.
    pub child_page_size: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            include: String::new(),
            exclude: None,
            log_page: String::new(),
            version_page_size: DEFAULT_VERSION_PAGE_SIZE,
            child_page_size: DEFAULT_CHILD_PAGE_SIZE,
        }
    }
}

impl MonitorConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a page ID is missing or a page size is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.include, "monitor.include")?;
        require_non_empty(&self.log_page, "monitor.log_page")?;
        if let Some(exclude) = &self.exclude {
            require_non_empty(exclude, "monitor.exclude")?;
        }
        self.validate_page_sizes()
    }

    fn validate_page_sizes(&self) -> Result<(), ConfigError> {
        if self.version_page_size == 0 {
            return Err(ConfigError::Validation(
                "monitor.version_page_size must be greater than 0".to_owned(),
            ));
        }
        if self.child_page_size == 0 {
            return Err(ConfigError::Validation(
                "monitor.child_page_size must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`confluence.api_token`").
        field: String,
        /// Error message (e.g., "${`CONFLUENCE_API_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `fxchangelog.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(base_url) = &settings.base_url {
            self.confluence.base_url.clone_from(base_url);
        }
        if let Some(email) = &settings.email {
            self.confluence.email.clone_from(email);
        }
        if let Some(api_token) = &settings.api_token {
            self.confluence.api_token.clone_from(api_token);
        }
        if let Some(include) = &settings.include {
            self.monitor.include.clone_from(include);
        }
        if let Some(exclude) = &settings.exclude {
            self.monitor.exclude = Some(exclude.clone());
        }
        if let Some(log_page) = &settings.log_page {
            self.monitor.log_page.clone_from(log_page);
        }
    }

    /// Get validated Confluence configuration.
    ///
    /// Use this instead of accessing the `confluence` field directly once
    /// CLI settings have been applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if credentials or the base URL are missing or invalid.
    pub fn require_confluence(&self) -> Result<&ConfluenceConfig, ConfigError> {
        self.confluence.validate()?;
        Ok(&self.confluence)
    }

    /// Get validated monitoring configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the include root or log page is missing.
    pub fn require_monitor(&self) -> Result<&MonitorConfig, ConfigError> {
        self.monitor.validate()?;
        Ok(&self.monitor)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        expand::expand_confluence(&mut config.confluence)?;
        expand::expand_monitor(&mut config.monitor)?;
        config.config_path = Some(path.to_path_buf());

        // Required values may still arrive from the CLI, so only check formats here
        config.validate()?;

        Ok(config)
    }

    /// Validate the format of values present in the file.
    ///
    /// Missing credentials and page IDs are not errors here; they are checked by
    /// [`Config::require_confluence`] and [`Config::require_monitor`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_http_url(&self.confluence.base_url, "confluence.base_url")?;
        if self.confluence.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "confluence.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        self.monitor.validate_page_sizes()
    }
}
