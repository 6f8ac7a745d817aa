//! Meteo inventory client.

use tracing::{debug, info};

use crate::config::MeteoConfig;
use crate::error::Result;
use crate::http::{decode, RestBackend};

use super::types::{CloudList, MeteoCloud, MeteoProject, ProjectList};

/// Read-only client for the Meteo inventory API.
#[derive(Debug)]
pub struct MeteoClient<B> {
    /// REST backend rooted at the Meteo base URL.
    backend: B,
    /// Path of the project list endpoint.
    projects_path: String,
    /// Path of the cloud list endpoint.
    clouds_path: String,
}

impl<B: RestBackend> MeteoClient<B> {
    /// Creates a client using the endpoint paths from configuration.
    #[must_use]
    pub fn new(backend: B, config: &MeteoConfig) -> Self {
        Self {
            backend,
            projects_path: config.projects_path.clone(),
            clouds_path: config.clouds_path.clone(),
        }
    }

    /// Fetches every project known to Meteo.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the body does not decode.
    pub async fn projects(&self) -> Result<Vec<MeteoProject>> {
        info!("Getting project data from Meteo");
        let value = self.backend.get(&self.projects_path, &[]).await?;
        let list: ProjectList = decode(value, "Meteo project list")?;
        debug!("Meteo reported {} projects", list.projects.len());
        Ok(list.projects)
    }

    /// Fetches every cloud known to Meteo.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the body does not decode.
    pub async fn clouds(&self) -> Result<Vec<MeteoCloud>> {
        info!("Getting cloud data from Meteo");
        let value = self.backend.get(&self.clouds_path, &[]).await?;
        let list: CloudList = decode(value, "Meteo cloud list")?;
        debug!("Meteo reported {} clouds", list.clouds.len());
        Ok(list.clouds)
    }
}
