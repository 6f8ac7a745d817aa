//! Configuration validation.
//!
//! Runs after every configuration layer has been applied and before any
//! network call is made.

use crate::error::{ConfigError, Result, SyncError};
use reqwest::Url;
use tracing::debug;

use super::settings::SyncConfig;

/// Validator for sync configurations.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing all problems found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ConfigError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a sync configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self, config: &SyncConfig) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();
        let cap = &config.capacity_planner;

        match cap.base_url.as_deref() {
            Some(url) => check_url("capacity_planner.base_url", url, &mut result),
            None => result
                .errors
                .push(ConfigError::missing("capacity_planner.base_url")),
        }

        if cap.default_team_name.as_deref().is_none_or(str::is_empty) {
            result
                .errors
                .push(ConfigError::missing("capacity_planner.default_team_name"));
        }

        if cap
            .default_deployment_type_name
            .as_deref()
            .is_none_or(str::is_empty)
        {
            result.errors.push(ConfigError::missing(
                "capacity_planner.default_deployment_type_name",
            ));
        }

        if cap.project_deployment_type.is_empty() {
            result.errors.push(ConfigError::missing(
                "capacity_planner.project_deployment_type",
            ));
        }

        if cap.timeout_secs == 0 {
            result
                .warnings
                .push(String::from("capacity_planner.timeout_secs is 0, requests will fail immediately"));
        }

        check_url("meteo.base_url", &config.meteo.base_url, &mut result);

        if config.pods.credentials.password.is_empty() {
            result.warnings.push(String::from(
                "pods.credentials.password is empty, created pods will carry no password",
            ));
        }

        if result.errors.is_empty() {
            debug!("Configuration validation passed");
            Ok(result)
        } else {
            Err(SyncError::Config(result.errors.swap_remove(0)))
        }
    }
}

fn check_url(field: &str, value: &str, result: &mut ValidationResult) {
    let valid = Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false);

    if !valid {
        result.errors.push(ConfigError::InvalidUrl {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}
