//! Configuration parser for loading and layering configuration.
//!
//! Precedence, lowest first: built-in defaults, YAML file, `.env` file and
//! `CAP_SYNC_*` environment variables, CLI flags (applied by the caller).

use crate::error::{ConfigError, Result, SyncError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::settings::SyncConfig;

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["cap-sync.yaml", "cap-sync.yml"];

/// Configuration parser.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving `.env`.
    base_path: Option<PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path used to locate `.env`.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<SyncConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(SyncError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path)?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<SyncConfig> {
        debug!("Parsing YAML configuration");

        serde_yaml::from_str(content).map_err(|e| {
            SyncError::Config(ConfigError::Parse {
                message: format!("YAML parse error: {e}"),
                location: source.map(|p| p.display().to_string()),
            })
        })
    }

    /// Loads the configuration file if one is given, otherwise starts from
    /// defaults, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a given file cannot be read or parsed.
    pub fn load(&self, path: Option<&Path>) -> Result<SyncConfig> {
        let mut config = match path {
            Some(path) => self.load_file(path)?,
            None => SyncConfig::default(),
        };

        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies `CAP_SYNC_*` overrides using the given variable lookup.
    pub fn apply_env_overrides(config: &mut SyncConfig, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("CAP_SYNC_PROJECT_DEPLOYMENT_TYPE") {
            debug!("Overriding capacity_planner.project_deployment_type from environment");
            config.capacity_planner.project_deployment_type = value;
        }

        if let Some(value) = lookup("CAP_SYNC_TIMEOUT_SECS") {
            match value.parse() {
                Ok(secs) => {
                    debug!("Overriding capacity_planner.timeout_secs from environment");
                    config.capacity_planner.timeout_secs = secs;
                }
                Err(_) => warn!("Ignoring non-numeric CAP_SYNC_TIMEOUT_SECS '{value}'"),
            }
        }

        if let Some(value) = lookup("CAP_SYNC_POD_PROJECT") {
            debug!("Overriding pods.credentials.project from environment");
            config.pods.credentials.project = value;
        }

        if let Some(value) = lookup("CAP_SYNC_POD_USERNAME") {
            debug!("Overriding pods.credentials.username from environment");
            config.pods.credentials.username = value;
        }

        if let Some(value) = lookup("CAP_SYNC_POD_PASSWORD") {
            debug!("Overriding pods.credentials.password from environment");
            config.pods.credentials.password = value;
        }
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                SyncError::Config(ConfigError::Parse {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

/// Finds a configuration file in the given directory or its parents.
#[must_use]
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Option<PathBuf> {
    let mut current = start_dir.as_ref().to_path_buf();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found configuration file: {}", config_path.display());
                return Some(config_path);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}
