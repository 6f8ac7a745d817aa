//! JSON REST client shared by the Capacity Planner and Meteo integrations.
//!
//! Every call is awaited to completion before the caller continues. A non-2xx
//! status is turned into [`HttpError::Status`] carrying the response body;
//! nothing is retried.

use async_trait::async_trait;
use reqwest::{header, Client, Method, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::error::{ConfigError, HttpError, Result, SyncError};

/// Minimal JSON REST interface used by the sync.
///
/// Paths are joined onto the backend's base URL. Implementations must fail on
/// any non-2xx response.
#[async_trait]
pub trait RestBackend: Send + Sync {
    /// Issues a GET, optionally with query parameters.
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value>;

    /// Issues a POST with a JSON body.
    async fn post(&self, path: &str, body: &Value) -> Result<Value>;

    /// Issues a PUT with a JSON body.
    async fn put(&self, path: &str, body: &Value) -> Result<Value>;

    /// Issues a DELETE.
    async fn delete(&self, path: &str) -> Result<Value>;
}

/// `reqwest`-backed [`RestBackend`].
#[derive(Debug, Clone)]
pub struct RestClient {
    /// HTTP client.
    client: Client,
    /// Base URL every path is joined onto.
    base_url: Url,
}

impl RestClient {
    /// Creates a client with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be created.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a client with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be created.
    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|_| ConfigError::InvalidUrl {
            field: String::from("base_url"),
            value: base_url.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| HttpError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Joins a path onto the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the result is not a valid URL.
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|e| {
            SyncError::Config(ConfigError::InvalidUrl {
                field: format!("path ({e})"),
                value: path.to_string(),
            })
        })
    }

    /// Sends a single request and decodes the JSON response.
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.url(path)?;

        if query.is_empty() {
            info!("Running {method} REST call towards {url}");
        } else {
            info!("Running {method} REST call towards {url} with query {query:?}");
        }
        if let Some(body) = body {
            debug!("Payload: {}", redacted(body));
        }

        let mut request = self.client.request(method.clone(), url.clone());

        if !query.is_empty() {
            request = request.query(query);
        }

        if method != Method::GET {
            request = request.header(header::CONTENT_TYPE, "application/json");
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::network(format!("{method} {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Http(HttpError::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body,
            }));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| HttpError::network(format!("Failed to read response body: {e}")))?;

        debug!("REST call completed ({status})");

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| SyncError::Http(HttpError::decode(format!("{url}: {e}"))))
    }
}

#[async_trait]
impl RestBackend for RestClient {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.send(Method::GET, path, query, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        self.send(Method::DELETE, path, &[], None).await
    }
}

/// Decodes a JSON value into a typed response.
///
/// # Errors
///
/// Returns [`HttpError::Decode`] if the value does not match `T`.
pub fn decode<T: serde::de::DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| SyncError::Http(HttpError::decode(format!("{what}: {e}"))))
}

/// Copies a payload with any top-level `password` masked.
fn redacted(body: &Value) -> Value {
    let mut body = body.clone();
    if let Some(password) = body.get_mut("password") {
        *password = Value::String(String::from("[REDACTED]"));
    }
    body
}
