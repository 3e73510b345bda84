//! Grades API HTTP client.

use super::GradeSource;
use crate::config::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};
use crate::error::{FetchErrorKind, GradesError, Result};
use crate::model::{GradeSet, GradesResponse, Meta};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Grades API client configuration.
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL, without the `/api` suffix
    pub api_base: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// HTTP client for `/api/grades` and `/api/meta`.
pub struct ApiClient {
    client: Client,
    config: ApiClientConfig,
}

/// Helper to convert reqwest errors to fetch errors
fn network_error(context: &str, err: reqwest::Error) -> GradesError {
    GradesError::fetch(context, FetchErrorKind::Network(err.to_string()))
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(config: ApiClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| network_error("Failed to create HTTP client", e))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.config.api_base.trim_end_matches('/'))
    }

    /// `GET /api/grades`
    pub fn fetch_grades(&self) -> Result<GradesResponse> {
        self.get_json("grades", "Grades")
    }

    /// `GET /api/meta`
    pub fn fetch_meta(&self) -> Result<Meta> {
        self.get_json("meta", "Meta")
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, endpoint: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| network_error(&format!("GET {url}"), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GradesError::status(endpoint, status.as_u16()));
        }

        response.json().map_err(|e| {
            GradesError::fetch(
                format!("parsing {endpoint} response"),
                FetchErrorKind::InvalidBody(e.to_string()),
            )
        })
    }
}

impl GradeSource for ApiClient {
    fn describe(&self) -> String {
        self.config.api_base.clone()
    }

    /// Fetch grades and meta concurrently; both must succeed.
    fn load(&self) -> Result<GradeSet> {
        let (grades, meta) = rayon::join(|| self.fetch_grades(), || self.fetch_meta());
        let grades = grades?;
        let meta = meta?;
        tracing::debug!(
            "Fetched {} rows from {}",
            grades.flattened.len(),
            self.config.api_base
        );
        Ok(GradeSet {
            rows: grades.flattened,
            meta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_defaults() {
        let config = ApiClientConfig::default();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ApiClient::new(ApiClientConfig {
            api_base: "http://grades.local/".to_string(),
            ..ApiClientConfig::default()
        })
        .unwrap();
        assert_eq!(client.url("meta"), "http://grades.local/api/meta");
        assert_eq!(client.describe(), "http://grades.local/");
    }
}
