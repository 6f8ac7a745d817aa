//! Configuration module for the capacity planner sync.
//!
//! This module handles all configuration-related functionality:
//! - Layering defaults, the YAML file, `.env` and environment variables
//! - Validation of required values and URLs

mod settings;
mod parser;
mod validator;

pub use settings::{
    CapacityPlannerConfig, MeteoConfig, PodCredentials, PodSettings, SyncConfig,
    DEFAULT_METEO_BASE_URL, DEFAULT_POD_NAME_PREFIX, DEFAULT_PROJECT_DEPLOYMENT_TYPE,
    DEFAULT_TIMEOUT_SECS,
};
pub use parser::{ConfigParser, find_config_file, DEFAULT_CONFIG_FILES};
pub use validator::{ConfigValidator, ValidationResult};
